//! Dispatch 指标描述模块
//!
//! 为 dispatcher 发出的计数器注册描述信息，便于 Prometheus 端展示。

use contracts::metric_names::{DISPATCH_FAILURES_TOTAL, MESSAGES_DISPATCHED_TOTAL};
use metrics::{describe_counter, Unit};

/// 所有已知指标名称
pub const ALL_METRICS: [&str; 2] = [MESSAGES_DISPATCHED_TOTAL, DISPATCH_FAILURES_TOTAL];

/// 注册 dispatcher 指标描述
///
/// 无 recorder 时为空操作，可重复调用。
pub fn describe_dispatch_metrics() {
    describe_counter!(
        MESSAGES_DISPATCHED_TOTAL,
        Unit::Count,
        "Messages delivered to a channel, by route"
    );
    describe_counter!(
        DISPATCH_FAILURES_TOTAL,
        Unit::Count,
        "Dispatches that failed, by stage and route"
    );
}
