//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Message Model
//! - A value enters through a dispatcher and leaves as a [`Message`]
//! - [`MessageChannel`] is the outbound side, [`Converter`] the optional transform
//! - [`Classify`] decides whether a value is a failure and may take the error route

mod channel;
mod classify;
mod consumer_config;
mod converter;
mod error;
mod message;
pub mod metric_names;

pub use channel::*;
pub use classify::Classify;
pub use consumer_config::*;
pub use converter::{Converter, SharedConverter};
pub use error::*;
pub use message::{Message, MessageHeaders};
