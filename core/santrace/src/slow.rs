//! Table-driven stack walk over the platform unwind runtime.

use core::{ffi::c_void, ptr::NonNull};

use crate::{
    config::PC_MATCH_THRESHOLD,
    trace::{STACK_TRACE_MAX, StackTrace},
};

/// A table-driven walker the capture state machine can invoke.
///
/// Implementations fill `trace` innermost-first with at most `max_depth`
/// frames (via [`StackTrace::set_frames`] or equivalent) and put the
/// requested `pc` in front whenever anything was captured at all.
/// [`CfiUnwinder`] is the platform implementation; embedders and tests may
/// substitute their own.
pub trait SlowUnwinder {
    /// Walks the current call chain using unwind metadata.
    fn unwind(&mut self, trace: &mut StackTrace, pc: usize, max_depth: u32);

    /// Walks from a signal-handler execution context.
    fn unwind_with_context(
        &mut self,
        trace: &mut StackTrace,
        pc: usize,
        context: NonNull<c_void>,
        max_depth: u32,
    );
}

// Unwind ABI of libgcc_s / LLVM libunwind. Hosted Rust binaries already
// link it through the panic runtime; bare embedders must provide it.
const URC_NO_REASON: i32 = 0;
const URC_NORMAL_STOP: i32 = 4;

unsafe extern "C" {
    fn _Unwind_Backtrace(
        trace: extern "C" fn(*mut c_void, *mut c_void) -> i32,
        arg: *mut c_void,
    ) -> i32;
    fn _Unwind_GetIP(ctx: *mut c_void) -> usize;
}

struct Collector {
    frames: *mut usize,
    cap: usize,
    len: usize,
    min_pc: usize,
}

extern "C" fn collect_frame(ctx: *mut c_void, arg: *mut c_void) -> i32 {
    let collector = unsafe { &mut *(arg as *mut Collector) };
    fatal::check_lt!(collector.len, collector.cap);
    let ip = unsafe { _Unwind_GetIP(ctx) };
    // Zero-page values mark the end of the usable chain.
    if ip < collector.min_pc {
        return URC_NORMAL_STOP;
    }
    unsafe { *collector.frames.add(collector.len) = ip };
    collector.len += 1;
    if collector.len == collector.cap {
        URC_NORMAL_STOP
    } else {
        URC_NO_REASON
    }
}

/// The platform walker: `_Unwind_Backtrace` over the call-frame tables
/// shipped in the binary.
pub struct CfiUnwinder;

impl CfiUnwinder {
    fn walk(trace: &mut StackTrace, pc: usize, max_depth: u32) {
        fatal::check_ge!(max_depth, 2);
        trace.len = 0;
        let mut collector = Collector {
            frames: trace.frames.as_mut_ptr(),
            // One extra raw frame: the walk starts inside this crate and
            // the trim below removes at least that frame again.
            cap: (max_depth as usize + 1).min(STACK_TRACE_MAX),
            len: 0,
            min_pc: mempage::page_size_cached(),
        };
        unsafe {
            _Unwind_Backtrace(
                collect_frame,
                &mut collector as *mut Collector as *mut c_void,
            );
        }
        trace.len = collector.len;

        // Frames above the requested pc belong to the capture machinery,
        // not the traced program.
        let mut to_pop = locate_pc(trace, pc);
        if to_pop == 0 && trace.len > 1 {
            to_pop = 1;
        }
        if to_pop > 0 {
            pop_frames(trace, to_pop);
        }
        if trace.len > 0 {
            trace.frames[0] = pc;
        }
    }
}

impl SlowUnwinder for CfiUnwinder {
    fn unwind(&mut self, trace: &mut StackTrace, pc: usize, max_depth: u32) {
        Self::walk(trace, pc, max_depth);
    }

    fn unwind_with_context(
        &mut self,
        trace: &mut StackTrace,
        pc: usize,
        _context: NonNull<c_void>,
        max_depth: u32,
    ) {
        // The walk covers the live chain either way; the pc trim aligns the
        // result to the faulting frame the context describes.
        Self::walk(trace, pc, max_depth);
    }
}

/// Index of the first frame matching `pc` within the byte tolerance, zero
/// when absent.
fn locate_pc(trace: &StackTrace, pc: usize) -> usize {
    for (i, &frame) in trace.frames().iter().enumerate() {
        if matches_pc(pc, frame) {
            return i;
        }
    }
    0
}

fn matches_pc(requested: usize, recorded: usize) -> bool {
    requested.abs_diff(recorded) <= PC_MATCH_THRESHOLD
}

fn pop_frames(trace: &mut StackTrace, count: usize) {
    fatal::check_lt!(count, trace.len);
    let remaining = trace.len - count;
    trace.frames.copy_within(count..count + remaining, 0);
    trace.len = remaining;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_of(frames: &[usize]) -> StackTrace {
        let mut trace = StackTrace::new();
        trace.set_frames(frames);
        trace
    }

    #[test]
    fn locate_finds_exact_pc() {
        let trace = trace_of(&[0x9000, 0x5000, 0x6000]);
        assert_eq!(locate_pc(&trace, 0x5000), 1);
    }

    #[test]
    fn locate_tolerates_nearby_pc() {
        let trace = trace_of(&[0x9000, 0x5000, 0x6000]);
        assert_eq!(locate_pc(&trace, 0x5000 + PC_MATCH_THRESHOLD), 1);
        assert_eq!(locate_pc(&trace, 0x5000 - 100), 1);
    }

    #[test]
    fn locate_defaults_to_zero_when_absent() {
        let trace = trace_of(&[0x9000, 0x5000]);
        assert_eq!(locate_pc(&trace, 0x100_0000), 0);
    }

    #[test]
    fn pop_shifts_remaining_frames_forward() {
        let mut trace = trace_of(&[1, 2, 3, 4]);
        pop_frames(&mut trace, 2);
        assert_eq!(trace.frames(), &[3, 4]);
    }
}
