#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

//! ## Quick Start
//!
//! ```no_run
//! use santrace::StackTrace;
//!
//! let trace = StackTrace::capture(32);
//! for pc in trace.frames() {
//!     println!("{:#x}", santrace::previous_instruction_pc(*pc));
//! }
//! ```
//!
//! For explicit control (the shape sanitizer runtimes use), fill an
//! [`UnwindRequest`] and call [`StackTrace::unwind`]; the preference passed
//! in `request_fast` must come from [`will_use_fast_unwind`] so that it is
//! consistent with what the platform supports.

pub mod arch;
pub mod caps;
pub mod config;
mod fast;
mod slow;
mod trace;
mod unwinder;

pub use arch::{caller_pc_bp, previous_instruction_pc};
pub use caps::{UnwindCaps, will_use_fast_unwind};
pub use slow::{CfiUnwinder, SlowUnwinder};
pub use trace::{STACK_TRACE_MAX, StackTrace};
pub use unwinder::UnwindRequest;
