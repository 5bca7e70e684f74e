//! Channel implementations
//!
//! Contains LogChannel, QueueChannel, and the AnyChannel enum used for
//! configuration-driven wiring.

mod any;
mod log;
mod queue;

pub use self::any::{AnyChannel, QueueReceiver};
pub use self::log::LogChannel;
pub use self::queue::QueueChannel;
