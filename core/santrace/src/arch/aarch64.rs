//! AArch64 (ARM64) architecture support.

use core::arch::asm;

use super::ArchUnwind;

/// AArch64 architecture implementation.
pub struct AArch64;

impl ArchUnwind for AArch64 {
    const FP_ALIGNMENT: usize = 8;
    const FRAME_OFFSET: usize = 0;
    // Fixed 4-byte instruction encoding.
    const CALL_INSN_BACKOFF: usize = 4;

    fn current_fp() -> usize {
        let fp: usize;
        unsafe { asm!("mov {}, x29", out(reg) fp, options(nomem, nostack)) };
        fp
    }
}
