//! MessageChannel trait - Dispatcher output interface
//!
//! Defines the abstract interface for outbound channels.

use std::sync::Arc;

use crate::{ContractError, Message};

/// Outbound message channel
///
/// All channel implementations must implement this trait. `send` takes `&self`
/// so one channel can be shared by concurrent senders; implementations own
/// their concurrency discipline.
#[trait_variant::make(MessageChannel: Send)]
pub trait LocalMessageChannel<P> {
    /// Channel name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Send one message
    ///
    /// # Errors
    /// Returns send error (should include channel name)
    async fn send(&self, message: Message<P>) -> Result<(), ContractError>;
}

impl<P, C> MessageChannel<P> for Arc<C>
where
    P: Send,
    C: MessageChannel<P> + Send + Sync,
{
    fn name(&self) -> &str {
        MessageChannel::name(&**self)
    }

    async fn send(&self, message: Message<P>) -> Result<(), ContractError> {
        MessageChannel::send(&**self, message).await
    }
}
