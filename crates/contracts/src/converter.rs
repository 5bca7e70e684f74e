//! Converter trait - value to message transform
//!
//! Converters are optional; without one a dispatcher wraps the value verbatim.

use std::sync::Arc;

use crate::{ContractError, Message};

/// Shared converter handle, as stored by a dispatcher
pub type SharedConverter<T, P> = Arc<dyn Converter<T, P>>;

/// Turns a raw value into an outbound message
///
/// A failing conversion is returned to whoever asked for it. The dispatcher
/// does not catch it and does not fall back to the generic wrapper.
///
/// Any `Fn(T) -> Result<Message<P>, ContractError>` closure is a converter.
pub trait Converter<T, P>: Send + Sync {
    /// Convert one value
    ///
    /// # Errors
    /// Returns the conversion failure unchanged to the caller of `accept`
    fn convert(&self, value: T) -> Result<Message<P>, ContractError>;
}

impl<T, P, F> Converter<T, P> for F
where
    F: Fn(T) -> Result<Message<P>, ContractError> + Send + Sync,
{
    fn convert(&self, value: T) -> Result<Message<P>, ContractError> {
        self(value)
    }
}
