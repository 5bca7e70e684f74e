//! ValueDispatcher - routes accepted values to a primary or error channel

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace};

use contracts::{
    Classify, ConsumerConfig, ContractError, Converter, Message, MessageChannel, SharedConverter,
};

use crate::channels::{AnyChannel, QueueReceiver};
use crate::metrics::{DispatchMetrics, MetricsSnapshot};

/// Which configured channel a value is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Ordinary values, and failures when no error channel exists
    Primary,
    /// Failures, when an error channel is configured
    Error,
}

impl Route {
    /// Label used in logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Error => "error",
        }
    }
}

/// Builder for creating a ValueDispatcher
pub struct ValueDispatcherBuilder<T, P, C> {
    primary: Option<C>,
    errors: Option<C>,
    converter: Option<SharedConverter<T, P>>,
}

impl<T, P, C> ValueDispatcherBuilder<T, P, C> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            primary: None,
            errors: None,
            converter: None,
        }
    }

    /// Channel receiving ordinary values (required)
    pub fn primary(mut self, channel: C) -> Self {
        self.primary = Some(channel);
        self
    }

    /// Channel receiving failure values
    pub fn errors(mut self, channel: C) -> Self {
        self.errors = Some(channel);
        self
    }

    /// Initial converter
    pub fn converter<V>(mut self, converter: V) -> Self
    where
        V: Converter<T, P> + 'static,
    {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Build the dispatcher
    ///
    /// # Errors
    /// `InvalidArgument` when no primary channel was given
    pub fn build(self) -> Result<ValueDispatcher<T, P, C>, ContractError> {
        let primary = self
            .primary
            .ok_or_else(|| ContractError::invalid_argument("primary channel is required"))?;

        Ok(ValueDispatcher {
            primary,
            errors: self.errors,
            converter: RwLock::new(self.converter),
            metrics: DispatchMetrics::new(),
        })
    }
}

impl<T, P, C> Default for ValueDispatcherBuilder<T, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards every accepted value to exactly one channel
///
/// Failure values (see [`Classify`]) go to the error channel when one is
/// configured, everything else goes to the primary channel. Channels are fixed
/// for the life of the dispatcher.
///
/// The converter can be replaced at any time, also while other tasks are
/// dispatching. Each dispatch uses whichever converter was current when it
/// started. A converter can be replaced but never cleared.
pub struct ValueDispatcher<T, P, C> {
    primary: C,
    errors: Option<C>,
    converter: RwLock<Option<SharedConverter<T, P>>>,
    metrics: DispatchMetrics,
}

impl<T, P, C> ValueDispatcher<T, P, C> {
    /// Create a dispatcher with a primary and an optional error channel
    pub fn new(primary: C, errors: Option<C>) -> Self {
        Self {
            primary,
            errors,
            converter: RwLock::new(None),
            metrics: DispatchMetrics::new(),
        }
    }

    /// Start a builder
    pub fn builder() -> ValueDispatcherBuilder<T, P, C> {
        ValueDispatcherBuilder::new()
    }

    /// Primary channel
    pub fn primary(&self) -> &C {
        &self.primary
    }

    /// Error channel, if configured
    pub fn errors(&self) -> Option<&C> {
        self.errors.as_ref()
    }

    /// Replace the active converter
    pub fn set_converter<V>(&self, converter: V)
    where
        V: Converter<T, P> + 'static,
    {
        self.set_shared_converter(Arc::new(converter));
    }

    /// Replace the active converter with an already shared one
    pub fn set_shared_converter(&self, converter: SharedConverter<T, P>) {
        *self
            .converter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(converter);
    }

    /// Replace the active converter from an optional handle
    ///
    /// # Errors
    /// `InvalidArgument` on `None`; the previous converter stays active
    pub fn try_set_converter(
        &self,
        converter: Option<SharedConverter<T, P>>,
    ) -> Result<(), ContractError> {
        let converter =
            converter.ok_or_else(|| ContractError::invalid_argument("converter cannot be empty"))?;
        self.set_shared_converter(converter);
        Ok(())
    }

    /// Whether a converter is configured
    pub fn has_converter(&self) -> bool {
        self.current_converter().is_some()
    }

    /// Get dispatch metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Channel for a route
    pub fn channel(&self, route: Route) -> &C {
        match (route, &self.errors) {
            (Route::Error, Some(errors)) => errors,
            _ => &self.primary,
        }
    }

    // Clone under the read lock; convert and send run without it.
    fn current_converter(&self) -> Option<SharedConverter<T, P>> {
        self.converter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T, P, C> ValueDispatcher<T, P, C>
where
    T: Classify + Into<P>,
    C: MessageChannel<P>,
{
    /// Decide where `value` goes
    ///
    /// Depends only on the value's kind and whether an error channel exists.
    pub fn route(&self, value: &T) -> Route {
        if self.errors.is_some() && value.is_failure() {
            Route::Error
        } else {
            Route::Primary
        }
    }

    /// Dispatch one value
    ///
    /// Exactly one message is sent to exactly one channel.
    ///
    /// # Errors
    /// Converter and channel failures are returned as raised, with no retry
    /// and no fallback to the generic wrapper.
    pub async fn accept(&self, value: T) -> Result<(), ContractError> {
        let route = self.route(&value);
        let channel = self.channel(route);

        let message = self.create_message(value).inspect_err(|_| {
            self.metrics.record_conversion_failure(route);
        })?;

        trace!(
            channel = %channel.name(),
            route = route.as_str(),
            "Dispatching message"
        );

        channel
            .send(message)
            .await
            .inspect_err(|_| self.metrics.record_send_failure(route))?;
        self.metrics.record_sent(route);
        Ok(())
    }

    fn create_message(&self, value: T) -> Result<Message<P>, ContractError> {
        match self.current_converter() {
            Some(converter) => converter.convert(value),
            None => Ok(Message::new(value.into())),
        }
    }

    /// Accept every value from `source` until it closes
    ///
    /// Returns the number of values accepted. The first failed accept stops
    /// the loop and is returned unchanged; the remaining values stay in the
    /// source.
    #[instrument(
        name = "value_dispatcher_run",
        skip(self, source),
        fields(primary = %self.primary.name(), has_errors = self.errors.is_some())
    )]
    pub async fn run(&self, source: &mut mpsc::Receiver<T>) -> Result<u64, ContractError> {
        info!("Dispatcher started");

        let mut accepted: u64 = 0;

        while let Some(value) = source.recv().await {
            self.accept(value).await?;
            accepted += 1;

            if accepted.is_multiple_of(100) {
                debug!(accepted, "Dispatcher progress");
            }
        }

        info!(accepted, "Source closed, dispatcher stopped");
        Ok(accepted)
    }
}

impl<T, P, C> ValueDispatcher<T, P, C>
where
    T: Classify + Into<P> + Send + 'static,
    P: Send + 'static,
    C: MessageChannel<P> + Send + Sync + 'static,
{
    /// Spawn [`run`](Self::run) as a background task
    pub fn spawn(
        self: Arc<Self>,
        mut source: mpsc::Receiver<T>,
    ) -> JoinHandle<Result<u64, ContractError>> {
        tokio::spawn(async move { self.run(&mut source).await })
    }
}

/// Receivers for every queue channel created from configuration, by name
pub type QueueReceivers<P> = HashMap<String, QueueReceiver<P>>;

/// Create a dispatcher over built-in channels from configuration
///
/// Values are sent as-is (`P = T`); set a converter afterwards if needed.
///
/// The configuration is checked with [`ConsumerConfig::check`] first, the
/// same rules loaded config files pass through.
///
/// # Errors
/// `ConfigValidation` for an empty channel name, or when the primary and
/// error channel share a name
#[instrument(
    name = "dispatcher_create",
    skip(config),
    fields(primary = %config.primary.name, errors = ?config.errors.as_ref().map(|c| &c.name))
)]
pub fn create_dispatcher<T>(
    config: &ConsumerConfig,
) -> Result<(ValueDispatcher<T, T, AnyChannel<T>>, QueueReceivers<T>), ContractError>
where
    T: Debug + Send,
{
    config.check()?;

    let mut receivers = HashMap::new();

    let (primary, rx) = AnyChannel::from_config(&config.primary);
    if let Some(rx) = rx {
        receivers.insert(config.primary.name.clone(), rx);
    }

    let errors = config.errors.as_ref().map(|errors_config| {
        let (channel, rx) = AnyChannel::from_config(errors_config);
        if let Some(rx) = rx {
            receivers.insert(errors_config.name.clone(), rx);
        }
        channel
    });

    debug!(queues = receivers.len(), "Dispatcher channels created");

    Ok((ValueDispatcher::new(primary, errors), receivers))
}
