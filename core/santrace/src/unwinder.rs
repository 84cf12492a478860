//! The capture state machine: depth short-circuits, mode validation, the
//! table-driven attempt, and the frame-pointer fallback.

use core::{ffi::c_void, ptr::NonNull};

use crate::{
    caps::UnwindCaps,
    config, fast,
    slow::{CfiUnwinder, SlowUnwinder},
    trace::{STACK_TRACE_MAX, StackTrace},
};

/// One capture request.
///
/// `stack_top`/`stack_bottom` delimit the readable stack window for the
/// frame-pointer walk; zero in either marks the bounds as unknown.
#[derive(Debug, Clone, Copy)]
pub struct UnwindRequest {
    /// Maximum number of frames to record; clamped to
    /// [`STACK_TRACE_MAX`](crate::STACK_TRACE_MAX).
    pub max_depth: u32,
    /// Program counter the trace starts at.
    pub pc: usize,
    /// Base pointer of the frame `pc` executes in.
    pub bp: usize,
    /// Execution-context token from a signal handler, when present.
    pub context: Option<NonNull<c_void>>,
    /// Upper stack bound (exclusive); zero when unknown.
    pub stack_top: usize,
    /// Lower stack bound; zero when unknown.
    pub stack_bottom: usize,
    /// Caller preference for the fast walk, resolved through
    /// [`will_use_fast_unwind`](crate::will_use_fast_unwind).
    pub request_fast: bool,
}

impl StackTrace {
    /// Captures a trace for `req` with the host platform's capabilities.
    ///
    /// Degraded outcomes (short or empty traces) are ordinary results.
    /// An inconsistent `request_fast`, or a slow request on a platform
    /// without slow support, is a fatal invariant violation.
    ///
    /// # Safety
    ///
    /// When both bounds are nonzero, every aligned slot in
    /// `(req.stack_bottom, req.stack_top)` must be readable for the whole
    /// call, and `req.bp` must root a frame chain the caller owns (the
    /// live stack or a synthetic chain inside the bounds).
    pub unsafe fn unwind(&mut self, req: &UnwindRequest) {
        unsafe { self.unwind_with(req, &mut CfiUnwinder, UnwindCaps::HOST) }
    }

    /// Same as [`unwind`](Self::unwind) with an explicit slow walker and
    /// capability set.
    ///
    /// # Safety
    ///
    /// As for [`unwind`](Self::unwind).
    pub unsafe fn unwind_with(
        &mut self,
        req: &UnwindRequest,
        slow: &mut dyn SlowUnwinder,
        caps: UnwindCaps,
    ) {
        let max_depth = req.max_depth.min(STACK_TRACE_MAX as u32);

        self.top_frame_bp = if max_depth > 0 { req.bp } else { 0 };
        self.len = 0;
        if max_depth == 0 {
            return;
        }
        if max_depth == 1 {
            self.frames[0] = req.pc;
            self.len = 1;
            return;
        }

        // Callers derive the preference once via will_use_fast_unwind and
        // reuse it; a value the platform would override means two parts of
        // the caller disagree about the capture mode.
        fatal::check_eq!(req.request_fast, caps.will_use_fast(req.request_fast));

        if !caps.will_use_fast(req.request_fast) {
            if !caps.slow {
                fatal::fatal!("slow unwind requested on a platform without it");
            }
            match req.context {
                Some(ctx) => slow.unwind_with_context(self, req.pc, ctx, max_depth),
                None => slow.unwind(self, req.pc, max_depth),
            }
            // A deep-enough result stands. A near-empty one below the
            // requested depth usually means the binary carries no unwind
            // tables, so the frame-pointer walk gets a try.
            let threshold = config::fallback_frame_threshold();
            if !caps.fast
                || self.len as u32 > threshold
                || self.len as u32 >= max_depth
            {
                return;
            }
            log::warn!(
                "table unwind produced {} frame(s) for depth {}, retrying with frame pointers",
                self.len,
                max_depth
            );
        }

        unsafe {
            fast::unwind_fast(
                self,
                req.pc,
                req.bp,
                req.stack_top,
                req.stack_bottom,
                max_depth,
            )
        };
    }

    /// Captures the calling thread's own stack.
    ///
    /// Host-side convenience: seeds from the caller's frame, leaves the
    /// bounds unknown, and prefers the table walk where the platform
    /// trusts it. Seeding needs live frame pointers
    /// (`-Cforce-frame-pointers=yes` in builds that optimize them out).
    #[inline(never)]
    pub fn capture(max_depth: u32) -> Self {
        // This frame is never inlined away, so its record is in place for
        // the seed read.
        let (pc, bp) = unsafe { crate::arch::caller_pc_bp() };
        log::debug!("self-capture from pc={:#x} bp={:#x}", pc, bp);
        let mut trace = Self::new();
        let req = UnwindRequest {
            max_depth,
            pc,
            bp,
            context: None,
            stack_top: 0,
            stack_bottom: 0,
            request_fast: crate::caps::will_use_fast_unwind(false),
        };
        // Bounds are zero: the fast walk stops at the seed frame and the
        // table walk only touches the live stack.
        unsafe { trace.unwind(&req) };
        trace
    }
}
