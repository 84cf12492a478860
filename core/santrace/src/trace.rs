//! Fixed-capacity captured stack trace.

use core::fmt;

/// Compile-time capacity of a captured trace.
pub const STACK_TRACE_MAX: usize = 256;

/// A captured call stack, innermost frame first.
///
/// Constructed empty, filled by exactly one unwind call, read-only
/// afterwards. The buffer is inline, so the type allocates nothing and can
/// live on the stack or inside an opaque handle.
pub struct StackTrace {
    pub(crate) frames: [usize; STACK_TRACE_MAX],
    pub(crate) len: usize,
    pub(crate) top_frame_bp: usize,
}

impl StackTrace {
    /// Creates an empty trace.
    pub const fn new() -> Self {
        Self {
            frames: [0; STACK_TRACE_MAX],
            len: 0,
            top_frame_bp: 0,
        }
    }

    /// Captured return addresses, innermost first.
    pub fn frames(&self) -> &[usize] {
        &self.frames[..self.len]
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the trace holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base pointer of the outermost requested frame; zero when none was
    /// recorded (depth-zero captures).
    pub fn top_frame_bp(&self) -> usize {
        self.top_frame_bp
    }

    /// Replaces the captured frames, truncating at the capacity.
    ///
    /// For [`SlowUnwinder`](crate::SlowUnwinder) implementations; the
    /// built-in walkers fill the buffer directly.
    pub fn set_frames(&mut self, frames: &[usize]) {
        let n = frames.len().min(STACK_TRACE_MAX);
        self.frames[..n].copy_from_slice(&frames[..n]);
        self.len = n;
    }
}

impl Default for StackTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "<empty stack trace>");
        }
        for (i, pc) in self.frames().iter().enumerate() {
            writeln!(f, "#{} {:#x}", i, pc)?;
        }
        Ok(())
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
