#![cfg_attr(not(test), no_std)]

//! C bridge over the santrace capture engine.
//!
//! Pure marshalling: opaque boxed handles in, raw machine words out, no
//! logic of its own. The embedder provides the global allocator the handles
//! come from and links the platform unwind runtime.
//!
//! Handles are created by [`santrace_new`], must be released exactly once
//! with [`santrace_free`], and must not be shared across threads while an
//! unwind is in flight.

extern crate alloc;

use alloc::boxed::Box;
use core::{ffi::c_void, ptr::NonNull};

use santrace::{StackTrace, UnwindRequest};

/// Allocates an empty trace handle.
#[unsafe(no_mangle)]
pub extern "C" fn santrace_new() -> *mut StackTrace {
    Box::into_raw(Box::new(StackTrace::new()))
}

/// Releases a handle from [`santrace_new`]. Null is accepted and ignored.
///
/// # Safety
///
/// `trace` must be null or a handle from [`santrace_new`] not yet freed;
/// any use of the handle afterwards is undefined behavior.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn santrace_free(trace: *mut StackTrace) {
    if !trace.is_null() {
        drop(unsafe { Box::from_raw(trace) });
    }
}

/// Captures a trace into `trace`. A null `context` means "no
/// signal-handler execution context".
///
/// # Safety
///
/// `trace` must be a live handle from [`santrace_new`]. The bounds, seed
/// registers, and preference follow the contract of
/// [`StackTrace::unwind`]; `request_fast` must come from
/// `santrace::will_use_fast_unwind` or the capture aborts the process.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn santrace_unwind(
    trace: *mut StackTrace,
    max_depth: u32,
    pc: usize,
    bp: usize,
    context: *mut c_void,
    stack_top: usize,
    stack_bottom: usize,
    request_fast: bool,
) {
    let trace = unsafe { &mut *trace };
    let req = UnwindRequest {
        max_depth,
        pc,
        bp,
        context: NonNull::new(context),
        stack_top,
        stack_bottom,
        request_fast,
    };
    unsafe { trace.unwind(&req) };
}

/// Returns the frame buffer of a handle; valid for
/// [`santrace_size`] entries until the next unwind or free.
///
/// # Safety
///
/// `trace` must be a live handle from [`santrace_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn santrace_frames(trace: *const StackTrace) -> *const usize {
    unsafe { &*trace }.frames().as_ptr()
}

/// Returns the number of captured frames in a handle.
///
/// # Safety
///
/// `trace` must be a live handle from [`santrace_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn santrace_size(trace: *const StackTrace) -> usize {
    unsafe { &*trace }.len()
}

/// Writes the caller's resume address and the current frame pointer, the
/// pair that seeds a self-capture through [`santrace_unwind`].
///
/// # Safety
///
/// `pc` and `bp` must be writable. Frame pointers must be live in the
/// calling code.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn santrace_caller_pc_bp(pc: *mut usize, bp: *mut usize) {
    let (caller_pc, caller_bp) = unsafe { santrace::caller_pc_bp() };
    unsafe {
        *pc = caller_pc;
        *bp = caller_bp;
    }
}

/// Maps a return address to an address inside the call that produced it.
#[unsafe(no_mangle)]
pub extern "C" fn santrace_previous_pc(pc: usize) -> usize {
    santrace::previous_instruction_pc(pc)
}
