//! QueueChannel - forwards messages into an in-process queue

use contracts::{ContractError, Message, MessageChannel};
use tokio::sync::mpsc;
use tracing::trace;

/// Channel backed by an unbounded tokio queue
///
/// Sending never waits. It fails with `ChannelClosed` once the receiving
/// side has been dropped.
#[derive(Debug)]
pub struct QueueChannel<P> {
    name: String,
    tx: mpsc::UnboundedSender<Message<P>>,
}

impl<P> QueueChannel<P> {
    /// Create a channel and the receiver that drains it
    pub fn new(name: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<Message<P>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                name: name.into(),
                tx,
            },
            rx,
        )
    }

    /// Whether the receiving side is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<P> Clone for QueueChannel<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<P> MessageChannel<P> for QueueChannel<P>
where
    P: Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, message: Message<P>) -> Result<(), ContractError> {
        self.tx
            .send(message)
            .map_err(|_| ContractError::channel_closed(&self.name))?;
        trace!(channel = %self.name, "Message queued");
        Ok(())
    }
}
