#![cfg_attr(not(test), no_std)]

//! Process-wide page size and page alignment helpers.
//!
//! The page size is queried from the operating system once and kept in a
//! relaxed atomic. Concurrent first use may query more than once; every
//! racer computes the same value, so the last store wins harmlessly. A zero
//! page size is nonsensical and aborts instead of propagating.

use core::sync::atomic::{AtomicUsize, Ordering};

use cfg_if::cfg_if;

pub const PAGE_SIZE_4K: usize = 0x1000;

/// Cached page size; zero means "not queried yet".
static PAGE_SIZE_CACHED: AtomicUsize = AtomicUsize::new(0);

cfg_if! {
    if #[cfg(target_os = "android")] {
        /// Android mandates 4 KiB pages; querying libc from early process
        /// initialization is not safe there.
        pub fn page_size() -> usize {
            PAGE_SIZE_4K
        }
    } else if #[cfg(any(target_os = "freebsd", target_os = "netbsd"))] {
        /// Reads the page size with `sysctl`, which stays inside the kernel
        /// interface; `sysconf` may route through interposed libc machinery.
        pub fn page_size() -> usize {
            let mut mib = [libc::CTL_HW, libc::HW_PAGESIZE];
            let mut size: libc::c_int = 0;
            let mut len = core::mem::size_of::<libc::c_int>();
            let rv = unsafe {
                libc::sysctl(
                    mib.as_mut_ptr(),
                    mib.len() as libc::c_uint,
                    &mut size as *mut libc::c_int as *mut libc::c_void,
                    &mut len,
                    core::ptr::null_mut(),
                    0,
                )
            };
            fatal::check_eq!(rv, 0);
            size as usize
        }
    } else if #[cfg(target_os = "linux")] {
        /// Reads the page size from the startup auxiliary vector.
        pub fn page_size() -> usize {
            unsafe { libc::getauxval(libc::AT_PAGESZ) as usize }
        }
    } else {
        /// Reads the page size with `sysconf`.
        pub fn page_size() -> usize {
            unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
        }
    }
}

/// Returns the page size, querying the operating system on first use.
pub fn page_size_cached() -> usize {
    let cached = PAGE_SIZE_CACHED.load(Ordering::Relaxed);
    if cached != 0 {
        return cached;
    }
    let size = page_size();
    fatal::check_ne!(size, 0);
    PAGE_SIZE_CACHED.store(size, Ordering::Relaxed);
    size
}

pub const fn floor_align(addr: usize, align: usize) -> usize {
    let mask = align - 1;
    addr & !mask
}

pub const fn ceil_align(addr: usize, align: usize) -> usize {
    let mask = align - 1;
    (addr + mask) & !mask
}

pub const fn align_rem(addr: usize, align: usize) -> usize {
    addr & (align - 1)
}

pub const fn aligned_to(addr: usize, align: usize) -> bool {
    align_rem(addr, align) == 0
}

pub use align_rem as align_offset;
pub use aligned_to as is_aligned;
pub use ceil_align as align_up;
pub use floor_align as align_down;
