//! Classify - failure-kind capability
//!
//! Routing to an error channel depends only on this capability. Producers
//! should hand over a closed set of cases (`Ok` / `Err`, or their own enum)
//! rather than rely on an open-ended runtime type test.

use bytes::Bytes;

use crate::{ContractError, Message};

/// Tells a dispatcher whether a value is a failure
///
/// # Contract
/// - Must be pure: the same value always classifies the same way
/// - Must not block; it runs on every dispatch
///
/// # Example
///
/// ```
/// use contracts::Classify;
///
/// enum Reading {
///     Sample(f64),
///     SensorFault(String),
/// }
///
/// impl Classify for Reading {
///     fn is_failure(&self) -> bool {
///         matches!(self, Reading::SensorFault(_))
///     }
/// }
///
/// assert!(Reading::SensorFault("offline".into()).is_failure());
/// assert!(!Reading::Sample(1.0).is_failure());
/// ```
pub trait Classify {
    /// Whether this value belongs on the error route
    fn is_failure(&self) -> bool;
}

impl<T, E> Classify for Result<T, E> {
    fn is_failure(&self) -> bool {
        self.is_err()
    }
}

impl Classify for ContractError {
    fn is_failure(&self) -> bool {
        true
    }
}

impl Classify for Box<dyn std::error::Error + Send + Sync> {
    fn is_failure(&self) -> bool {
        true
    }
}

impl<P: Classify> Classify for Message<P> {
    fn is_failure(&self) -> bool {
        self.payload.is_failure()
    }
}

impl<T: Classify + ?Sized> Classify for std::sync::Arc<T> {
    fn is_failure(&self) -> bool {
        (**self).is_failure()
    }
}

/// Plain payload types never take the error route
macro_rules! impl_plain_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Classify for $ty {
                fn is_failure(&self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_plain_value!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &'static str,
    Vec<u8>,
    Bytes,
);
