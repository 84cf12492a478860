//! x86_64 architecture support.

use core::arch::asm;

use super::ArchUnwind;

/// x86_64 architecture implementation.
pub struct X86_64;

impl ArchUnwind for X86_64 {
    const FP_ALIGNMENT: usize = 8;
    const FRAME_OFFSET: usize = 0;
    // Call opcodes are at least one byte long.
    const CALL_INSN_BACKOFF: usize = 1;

    fn current_fp() -> usize {
        let fp: usize;
        unsafe { asm!("mov {}, rbp", out(reg) fp, options(nomem, nostack)) };
        fp
    }
}
