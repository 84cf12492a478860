//! RISC-V architecture support.

use core::arch::asm;

use super::ArchUnwind;

/// RISC-V architecture implementation.
pub struct RiscV;

impl ArchUnwind for RiscV {
    const FP_ALIGNMENT: usize = 8;
    // s0 points one record past the saved {fp, ra} pair.
    const FRAME_OFFSET: usize = 1;
    // Compressed instructions are 2 bytes.
    const CALL_INSN_BACKOFF: usize = 2;

    fn current_fp() -> usize {
        let fp: usize;
        unsafe { asm!("addi {}, s0, 0", out(reg) fp, options(nomem, nostack)) };
        fp
    }
}
