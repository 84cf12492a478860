//! Runtime tunables for the unwinder.

use core::sync::atomic::{AtomicU32, Ordering};

/// Byte tolerance when locating a requested pc inside a table-driven walk.
/// The pc handed in may sit a few instructions away from the recorded
/// return address.
pub const PC_MATCH_THRESHOLD: usize = 350;

const DEFAULT_FALLBACK_FRAMES: u32 = 2;

/// Slow-path results at or below this frame count (while still short of the
/// requested depth) are treated as missing-unwind-table artifacts and
/// retried with the fast walk.
static FALLBACK_FRAMES: AtomicU32 = AtomicU32::new(DEFAULT_FALLBACK_FRAMES);

/// Sets the fallback threshold. Zero confines the fallback to completely
/// empty slow-path results.
pub fn set_fallback_frame_threshold(frames: u32) {
    FALLBACK_FRAMES.store(frames, Ordering::Relaxed);
}

/// Returns the current fallback threshold.
pub fn fallback_frame_threshold() -> u32 {
    FALLBACK_FRAMES.load(Ordering::Relaxed)
}
