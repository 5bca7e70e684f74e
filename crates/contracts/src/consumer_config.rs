//! ConsumerConfig - Config Loader output
//!
//! Declares which channels a dispatcher publishes to.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ContractError;

/// Dispatcher wiring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Channel receiving ordinary values
    #[serde(alias = "channel")]
    pub primary: ChannelConfig,

    /// Channel receiving failure values (None = failures go to primary)
    #[serde(default)]
    pub errors: Option<ChannelConfig>,
}

impl ConsumerConfig {
    /// Check the wiring rules
    ///
    /// Channel names must be non-empty, and the error channel must not share
    /// the primary channel's name. Returns the first violation found.
    ///
    /// # Errors
    /// `ConfigValidation` naming the offending field
    pub fn check(&self) -> Result<(), ContractError> {
        self.primary.check("primary")?;
        if let Some(errors) = &self.errors {
            errors.check("errors")?;
            if errors.name == self.primary.name {
                return Err(ContractError::config_validation(
                    "errors.name",
                    format!(
                        "duplicate channel name '{}': error channel must differ from primary",
                        errors.name
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Single channel configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChannelConfig {
    /// Channel name
    #[validate(length(min = 1, message = "channel name must not be empty"))]
    pub name: String,

    /// Channel type
    #[serde(default)]
    pub channel_type: ChannelType,
}

impl ChannelConfig {
    /// Create a channel configuration
    pub fn new(name: impl Into<String>, channel_type: ChannelType) -> Self {
        Self {
            name: name.into(),
            channel_type,
        }
    }

    // Field rules come from the derive; `path` prefixes the reported field.
    fn check(&self, path: &str) -> Result<(), ContractError> {
        self.validate().map_err(|errors| {
            let (field, message) = errors
                .field_errors()
                .into_iter()
                .next()
                .map(|(field, errs)| {
                    let message = errs
                        .first()
                        .and_then(|e| e.message.as_ref())
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "invalid value".to_string());
                    (format!("{path}.{field}"), message)
                })
                .unwrap_or_else(|| (path.to_string(), errors.to_string()));
            ContractError::config_validation(field, message)
        })
    }
}

/// Channel type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// Log every message through tracing
    #[default]
    Log,
    /// Forward into an in-process queue
    Queue,
}
