//! The protocol spoken between dataflow producers and the target blocks they push messages to.
//!
//! A producer offers values one at a time to a [TargetBlock],
//! which synchronously accepts, declines or postpones each offer.
//! A target block also exposes a [Completion] signal,
//! resolved once the block has been completed or faulted.

mod completion;
mod extensions;
mod fault;
mod message;
mod null_target;
mod target;
pub mod test_helpers;

pub use completion::*;
pub use extensions::*;
pub use fault::*;
pub use message::*;
pub use null_target::*;
pub use target::*;
