//! # Dispatcher
//!
//! 值分发模块。
//!
//! 负责：
//! - 接收上游产生的值
//! - 按值类型选择主通道或错误通道
//! - 可选地通过 Converter 构造消息，否则原样包装
//!
//! 失败从不在此处吞掉：转换错误与通道错误原样返回给调用方。

pub mod channels;
pub mod dispatcher;
pub mod metrics;

pub use channels::{AnyChannel, LogChannel, QueueChannel, QueueReceiver};
pub use contracts::{Classify, ContractError, Converter, Message, MessageChannel};
pub use dispatcher::{
    create_dispatcher, QueueReceivers, Route, ValueDispatcher, ValueDispatcherBuilder,
};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
