//! LoongArch64 architecture support.

use core::arch::asm;

use super::ArchUnwind;

/// LoongArch64 architecture implementation.
pub struct LoongArch64;

impl ArchUnwind for LoongArch64 {
    const FP_ALIGNMENT: usize = 8;
    // $fp points one record past the saved {fp, ra} pair.
    const FRAME_OFFSET: usize = 1;
    // Fixed 4-byte instruction encoding.
    const CALL_INSN_BACKOFF: usize = 4;

    fn current_fp() -> usize {
        let fp: usize;
        unsafe { asm!("move {}, $fp", out(reg) fp, options(nomem, nostack)) };
        fp
    }
}
