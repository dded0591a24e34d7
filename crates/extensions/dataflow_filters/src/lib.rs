//! Decorators filtering the messages offered to a dataflow target block.
//!
//! A filter wraps a [TargetBlock](dataflow_target::TargetBlock),
//! deciding for each offer whether the message is forwarded to the wrapped target,
//! silently absorbed or declined. No filter buffers messages:
//! a forwarded message is handed over to the wrapped target in the same call.

mod accept_or_pass;
mod auto_complete;
mod changed;
mod config;
mod decorator;
mod distinct;
mod errors;
mod extensions;
mod filter;

pub use accept_or_pass::*;
pub use auto_complete::*;
pub use changed::*;
pub use config::*;
pub use decorator::*;
pub use distinct::*;
pub use errors::*;
pub use extensions::*;
pub use filter::*;

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Lock a filter state, even if a thread panicked while holding the lock
///
/// The state of a filter is always left consistent by the critical sections.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
