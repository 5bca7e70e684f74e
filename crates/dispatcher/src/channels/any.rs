//! AnyChannel - enum dispatch over the built-in channels

use std::fmt::Debug;

use contracts::{ChannelConfig, ChannelType, ContractError, Message, MessageChannel};
use tokio::sync::mpsc;

use super::{LogChannel, QueueChannel};

/// Receiving side of a configured queue channel
pub type QueueReceiver<P> = mpsc::UnboundedReceiver<Message<P>>;

/// One of the built-in channels, selected by configuration
#[derive(Debug, Clone)]
pub enum AnyChannel<P> {
    Log(LogChannel),
    Queue(QueueChannel<P>),
}

impl<P> AnyChannel<P> {
    /// Create the channel described by `config`
    ///
    /// Queue channels also hand back their receiver.
    pub fn from_config(config: &ChannelConfig) -> (Self, Option<QueueReceiver<P>>) {
        match config.channel_type {
            ChannelType::Log => (Self::Log(LogChannel::new(&config.name)), None),
            ChannelType::Queue => {
                let (channel, rx) = QueueChannel::new(&config.name);
                (Self::Queue(channel), Some(rx))
            }
        }
    }

    /// Channel type
    pub fn channel_type(&self) -> ChannelType {
        match self {
            Self::Log(_) => ChannelType::Log,
            Self::Queue(_) => ChannelType::Queue,
        }
    }
}

impl<P> MessageChannel<P> for AnyChannel<P>
where
    P: Debug + Send,
{
    fn name(&self) -> &str {
        match self {
            Self::Log(c) => MessageChannel::<P>::name(c),
            Self::Queue(c) => c.name(),
        }
    }

    async fn send(&self, message: Message<P>) -> Result<(), ContractError> {
        match self {
            Self::Log(c) => c.send(message).await,
            Self::Queue(c) => c.send(message).await,
        }
    }
}
