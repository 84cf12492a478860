//! Frame-pointer stack walk.

use crate::{
    arch::{ArchUnwind, CurrentArch, FrameRecord, record_slot},
    trace::StackTrace,
};

const WORD_SIZE: usize = size_of::<usize>();

/// A slot is usable when it lies strictly inside the window and leaves room
/// for a whole record below the top. `bottom` rises as the walk advances,
/// so this check also enforces monotonic progress.
fn is_valid_slot(slot: usize, stack_top: usize, bottom: usize) -> bool {
    slot > bottom && slot < stack_top - 2 * WORD_SIZE
}

/// Walks the frame-pointer chain rooted at `bp`.
///
/// Records `pc` as the innermost frame, then follows saved frame records
/// while they stay inside `[stack_bottom, stack_top)`, are aligned, move
/// strictly toward the stack's far end, and carry plausible return
/// addresses. Any violation ends the walk with the frames captured so far.
///
/// # Safety
///
/// When `stack_top` holds at least one page, every aligned slot inside
/// `(stack_bottom, stack_top)` must be readable. Callers with unknown
/// bounds pass zero and get the single-frame result.
pub(crate) unsafe fn unwind_fast(
    trace: &mut StackTrace,
    pc: usize,
    bp: usize,
    stack_top: usize,
    stack_bottom: usize,
    max_depth: u32,
) {
    fatal::check_ge!(max_depth, 2);
    trace.frames[0] = pc;
    trace.len = 1;
    // A top below the first page means the bounds are unknown or absurd;
    // one honest frame, no memory touched.
    if stack_top < mempage::PAGE_SIZE_4K {
        return;
    }
    let page_size = mempage::page_size_cached();
    let max_depth = max_depth as usize;

    let mut slot = record_slot(bp);
    let mut bottom = stack_bottom;
    while is_valid_slot(slot, stack_top, bottom)
        && mempage::aligned_to(slot, CurrentArch::FP_ALIGNMENT)
        && trace.len < max_depth
    {
        let record = unsafe { (slot as *const FrameRecord).read() };
        // Return addresses never live in the zero page.
        if record.ret < page_size {
            break;
        }
        if record.ret != pc {
            trace.frames[trace.len] = record.ret;
            trace.len += 1;
        }
        bottom = slot;
        slot = record_slot(record.fp);
    }
}
