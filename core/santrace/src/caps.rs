//! Platform capability selection for the two unwind strategies.

use cfg_if::cfg_if;

/// Which unwind strategies the platform trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwindCaps {
    /// Frame-pointer walking works here.
    pub fast: bool,
    /// Table-driven (call-frame-information) unwinding works here.
    pub slow: bool,
}

cfg_if! {
    if #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd"
    ))] {
        const HOST_CAPS: UnwindCaps = UnwindCaps { fast: true, slow: true };
    } else if #[cfg(target_vendor = "apple")] {
        // The in-process table walk is not trusted on Apple targets; the
        // platform ABI keeps frame pointers live instead.
        const HOST_CAPS: UnwindCaps = UnwindCaps { fast: true, slow: false };
    } else {
        const HOST_CAPS: UnwindCaps = UnwindCaps { fast: true, slow: false };
    }
}

impl UnwindCaps {
    /// Capabilities of the build target.
    pub const HOST: Self = HOST_CAPS;

    /// Resolves a caller preference against these capabilities.
    ///
    /// Idempotent: feeding the result back in returns the same answer, so a
    /// caller may derive the preference once and reuse it for every related
    /// decision.
    pub const fn will_use_fast(self, request_fast: bool) -> bool {
        if !self.fast {
            false
        } else if !self.slow {
            true
        } else {
            request_fast
        }
    }
}

/// Resolves a preference against [`UnwindCaps::HOST`].
pub const fn will_use_fast_unwind(request_fast: bool) -> bool {
    UnwindCaps::HOST.will_use_fast(request_fast)
}
