//! Metric names shared by the dispatcher and the exporter

/// Messages delivered, labelled by `route`
pub const MESSAGES_DISPATCHED_TOTAL: &str = "channel_consumer_messages_dispatched_total";

/// Failed dispatches, labelled by `stage` (convert / send) and `route`
pub const DISPATCH_FAILURES_TOTAL: &str = "channel_consumer_dispatch_failures_total";
