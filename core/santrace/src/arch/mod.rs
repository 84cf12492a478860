//! Architecture-specific unwind support: frame-record geometry and register
//! access.

/// Architecture-specific unwind operations.
pub trait ArchUnwind {
    /// Minimum alignment of a frame-record address.
    const FP_ALIGNMENT: usize;

    /// Whole records between the frame pointer and the record it reaches;
    /// zero when the frame pointer addresses the record directly.
    const FRAME_OFFSET: usize;

    /// Bytes to step back from a return address to land inside the call
    /// instruction that produced it.
    const CALL_INSN_BACKOFF: usize;

    /// Get the current frame pointer.
    fn current_fp() -> usize;
}

// Architecture-specific implementations
#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "loongarch64")]
mod loongarch64;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
mod riscv;
#[cfg(target_arch = "x86_64")]
mod x86_64;

// Re-export current architecture
#[cfg(target_arch = "aarch64")]
pub use aarch64::AArch64 as CurrentArch;
#[cfg(target_arch = "loongarch64")]
pub use loongarch64::LoongArch64 as CurrentArch;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use riscv::RiscV as CurrentArch;
#[cfg(target_arch = "x86_64")]
pub use x86_64::X86_64 as CurrentArch;

/// One saved frame record: the caller's frame pointer and the return
/// address, in memory order.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct FrameRecord {
    pub(crate) fp: usize,
    pub(crate) ret: usize,
}

/// Address of the frame record reachable from `bp` on this architecture.
pub(crate) fn record_slot(bp: usize) -> usize {
    bp.wrapping_sub(CurrentArch::FRAME_OFFSET * size_of::<FrameRecord>())
}

/// Return-address/frame-pointer pair describing the function that calls
/// this.
///
/// Always inlined so the pair stays anchored to the calling frame: the
/// returned pc resumes in that frame's caller and the returned bp is that
/// frame's own.
///
/// # Safety
///
/// Reads the calling frame's saved record through the frame-pointer
/// register, so frame pointers must be live in the calling code
/// (`-Cforce-frame-pointers=yes` in builds that optimize them out).
#[inline(always)]
pub unsafe fn caller_pc_bp() -> (usize, usize) {
    let bp = CurrentArch::current_fp();
    let record = unsafe { (record_slot(bp) as *const FrameRecord).read() };
    (record.ret, bp)
}

/// Maps a return address to an address inside the call that produced it,
/// attributing a frame to its call site rather than the resume point.
pub const fn previous_instruction_pc(pc: usize) -> usize {
    pc.saturating_sub(CurrentArch::CALL_INSN_BACKOFF)
}
