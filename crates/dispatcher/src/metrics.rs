//! Dispatch metrics for observability
//!
//! Counters live on the dispatcher as atomics and are mirrored into the
//! `metrics` facade, which is a no-op until a recorder is installed.

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::metric_names::{DISPATCH_FAILURES_TOTAL, MESSAGES_DISPATCHED_TOTAL};
use metrics::counter;

use crate::dispatcher::Route;

/// Metrics for a single dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Messages delivered to the primary channel
    primary_count: AtomicU64,
    /// Messages delivered to the error channel
    error_count: AtomicU64,
    /// Converter failures
    conversion_failures: AtomicU64,
    /// Channel send failures
    send_failures: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get primary channel delivery count
    pub fn primary_count(&self) -> u64 {
        self.primary_count.load(Ordering::Relaxed)
    }

    /// Get error channel delivery count
    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Get converter failure count
    pub fn conversion_failures(&self) -> u64 {
        self.conversion_failures.load(Ordering::Relaxed)
    }

    /// Get send failure count
    pub fn send_failures(&self) -> u64 {
        self.send_failures.load(Ordering::Relaxed)
    }

    /// Record a delivered message
    pub fn record_sent(&self, route: Route) {
        match route {
            Route::Primary => self.primary_count.fetch_add(1, Ordering::Relaxed),
            Route::Error => self.error_count.fetch_add(1, Ordering::Relaxed),
        };
        counter!(
            MESSAGES_DISPATCHED_TOTAL,
            "route" => route.as_str()
        )
        .increment(1);
    }

    /// Record a converter failure
    pub fn record_conversion_failure(&self, route: Route) {
        self.conversion_failures.fetch_add(1, Ordering::Relaxed);
        counter!(
            DISPATCH_FAILURES_TOTAL,
            "stage" => "convert",
            "route" => route.as_str()
        )
        .increment(1);
    }

    /// Record a channel send failure
    pub fn record_send_failure(&self, route: Route) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
        counter!(
            DISPATCH_FAILURES_TOTAL,
            "stage" => "send",
            "route" => route.as_str()
        )
        .increment(1);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            primary_count: self.primary_count(),
            error_count: self.error_count(),
            conversion_failures: self.conversion_failures(),
            send_failures: self.send_failures(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub primary_count: u64,
    pub error_count: u64,
    pub conversion_failures: u64,
    pub send_failures: u64,
}

impl MetricsSnapshot {
    /// Total messages delivered on either route
    pub fn delivered(&self) -> u64 {
        self.primary_count + self.error_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };

    /// Recorder that keeps the name and labels of every counter touched
    #[derive(Default)]
    struct KeyRecorder {
        counters: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl Recorder for KeyRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let labels = key
                .labels()
                .map(|l| (l.key().to_string(), l.value().to_string()))
                .collect();
            self.counters
                .lock()
                .unwrap()
                .push((key.name().to_string(), labels));
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_failure_counters_carry_stage_and_route() {
        let recorder = KeyRecorder::default();
        let dispatch = DispatchMetrics::new();

        metrics::with_local_recorder(&recorder, || {
            dispatch.record_conversion_failure(Route::Error);
            dispatch.record_send_failure(Route::Primary);
        });

        let label = |k: &str, v: &str| (k.to_string(), v.to_string());
        let counters = recorder.counters.lock().unwrap();
        assert_eq!(
            counters.as_slice(),
            &[
                (
                    DISPATCH_FAILURES_TOTAL.to_string(),
                    vec![label("stage", "convert"), label("route", "error")]
                ),
                (
                    DISPATCH_FAILURES_TOTAL.to_string(),
                    vec![label("stage", "send"), label("route", "primary")]
                ),
            ]
        );
    }

    #[test]
    fn test_record_sent_by_route() {
        let metrics = DispatchMetrics::new();
        metrics.record_sent(Route::Primary);
        metrics.record_sent(Route::Primary);
        metrics.record_sent(Route::Error);

        let snap = metrics.snapshot();
        assert_eq!(snap.primary_count, 2);
        assert_eq!(snap.error_count, 1);
        assert_eq!(snap.delivered(), 3);
    }

    #[test]
    fn test_failures_do_not_count_as_delivered() {
        let metrics = DispatchMetrics::new();
        metrics.record_conversion_failure(Route::Primary);
        metrics.record_send_failure(Route::Error);

        let snap = metrics.snapshot();
        assert_eq!(snap.conversion_failures, 1);
        assert_eq!(snap.send_failures, 1);
        assert_eq!(snap.delivered(), 0);
    }
}
