#![cfg_attr(not(test), no_std)]

//! Fatal invariant checks.
//!
//! A tripped check prints one diagnostic line to stderr and aborts the
//! process. There is no recovery channel and no panic machinery: every
//! caller treats a failed check as an unrecoverable internal inconsistency,
//! and the reporting path must stay usable from signal handlers, so the
//! message is rendered into a stack buffer and written straight to the
//! file descriptor.
//!
//! ## Quick Start
//!
//! ```no_run
//! let frames = 3usize;
//! let requested = 8usize;
//! fatal::check!(frames <= requested, frames, requested);
//! fatal::check_ne!(requested, 0);
//! ```

use core::fmt::Write;

use heapless::String;

/// Capacity of the rendered diagnostic line; longer lines are truncated.
const MSG_CAPACITY: usize = 512;

/// Strips the directory part of a source path, keeping the file name.
///
/// Accepts both `/` and `\` separators; when both appear, the later one
/// wins.
pub fn strip_path(file: &str) -> &str {
    let cut = match (file.rfind('/'), file.rfind('\\')) {
        (Some(s), Some(b)) => Some(s.max(b)),
        (s, b) => s.or(b),
    };
    match cut {
        Some(i) => &file[i + 1..],
        None => file,
    }
}

/// Best-effort write to stderr, usable from crash paths.
pub fn raw_write(s: &str) {
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            s.as_ptr() as *const libc::c_void,
            s.len(),
        );
    }
}

/// Reports a failed check and terminates the process.
///
/// The line has the shape `CHECK failed: file:line "cond" (0x.., 0x..)`,
/// with `file` stripped to its last path component. Never returns and never
/// unwinds.
pub fn check_failed(file: &str, line: u32, cond: &str, v1: u64, v2: u64) -> ! {
    let mut msg: String<MSG_CAPACITY> = String::new();
    let _ = writeln!(
        msg,
        "CHECK failed: {}:{} \"{}\" ({:#x}, {:#x})",
        strip_path(file),
        line,
        cond,
        v1,
        v2
    );
    raw_write(&msg);
    die();
}

/// Terminates the process immediately, without cleanup.
pub fn die() -> ! {
    unsafe { libc::abort() }
}

/// Aborts unless `cond` holds; the optional values are reported in hex.
#[macro_export]
macro_rules! check {
    ($cond:expr) => {
        $crate::check!($cond, 0u64, 0u64)
    };
    ($cond:expr, $v1:expr, $v2:expr) => {
        if !($cond) {
            $crate::check_failed(
                file!(),
                line!(),
                stringify!($cond),
                ($v1) as u64,
                ($v2) as u64,
            );
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! check_impl {
    ($a:expr, $op:tt, $b:expr) => {{
        let (lhs, rhs) = (($a) as u64, ($b) as u64);
        if !(lhs $op rhs) {
            $crate::check_failed(
                file!(),
                line!(),
                concat!(
                    "(", stringify!($a), ") ", stringify!($op), " (", stringify!($b), ")"
                ),
                lhs,
                rhs,
            );
        }
    }};
}

/// Aborts unless the two values are equal.
#[macro_export]
macro_rules! check_eq {
    ($a:expr, $b:expr) => { $crate::check_impl!($a, ==, $b) };
}

/// Aborts unless the two values differ.
#[macro_export]
macro_rules! check_ne {
    ($a:expr, $b:expr) => { $crate::check_impl!($a, !=, $b) };
}

/// Aborts unless `$a >= $b`.
#[macro_export]
macro_rules! check_ge {
    ($a:expr, $b:expr) => { $crate::check_impl!($a, >=, $b) };
}

/// Aborts unless `$a < $b`.
#[macro_export]
macro_rules! check_lt {
    ($a:expr, $b:expr) => { $crate::check_impl!($a, <, $b) };
}

/// Reports a configuration that must never be reached and terminates.
#[macro_export]
macro_rules! fatal {
    ($msg:expr) => {
        $crate::check_failed(file!(), line!(), $msg, 0, 0)
    };
}
