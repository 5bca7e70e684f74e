//! LogChannel - logs message summary via tracing

use std::fmt::Debug;

use contracts::{ContractError, Message, MessageChannel};
use tracing::{info, instrument};

/// Channel that logs every message for debugging
#[derive(Debug, Clone)]
pub struct LogChannel {
    name: String,
}

impl LogChannel {
    /// Create a new LogChannel with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<P> MessageChannel<P> for LogChannel
where
    P: Debug + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_channel_send", skip(self, message), fields(channel = %self.name))]
    async fn send(&self, message: Message<P>) -> Result<(), ContractError> {
        info!(
            channel = %self.name,
            payload = ?message.payload(),
            headers = message.headers.len(),
            "Message received"
        );
        Ok(())
    }
}
