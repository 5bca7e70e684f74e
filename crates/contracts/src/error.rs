//! Layered error definitions
//!
//! Categorized by source: argument / conversion / channel / config

use thiserror::Error;

/// Unified error type
///
/// Converters and channels raise this type directly, so a dispatcher can hand
/// their failures back to the caller without re-wrapping them.
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Argument Errors =====
    /// Rejected argument at construction or configuration time
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    // ===== Conversion Errors =====
    /// Converter could not turn a value into a message
    #[error("conversion error: {message}")]
    Conversion {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Channel Errors =====
    /// Channel send error
    #[error("channel '{channel}' send error: {message}")]
    ChannelSend { channel: String, message: String },

    /// Channel receiver is gone
    #[error("channel '{channel}' is closed")]
    ChannelClosed { channel: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create conversion error without an underlying cause
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
            source: None,
        }
    }

    /// Create channel send error
    pub fn channel_send(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelSend {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create channel closed error
    pub fn channel_closed(channel: impl Into<String>) -> Self {
        Self::ChannelClosed {
            channel: channel.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
