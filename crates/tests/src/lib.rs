//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> 分发器 -> 通道 的 e2e 测试

#[cfg(test)]
mod contract_tests {
    use contracts::{ChannelType, Classify, Message};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = ChannelType::Queue;
        assert!(Message::new(()).headers.is_empty());
        assert!(Err::<(), ()>(()).is_failure());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Classify, ContractError, Message};
    use dispatcher::{create_dispatcher, Route};
    use tokio::sync::mpsc;

    /// Value type produced by an upstream reactive source
    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Text(String),
        Failure(String),
    }

    impl Classify for Event {
        fn is_failure(&self) -> bool {
            matches!(self, Event::Failure(_))
        }
    }

    const QUEUE_CONFIG: &str = r#"
[primary]
name = "out"
channel_type = "queue"

[errors]
name = "failures"
channel_type = "queue"
"#;

    /// End-to-end test: config -> ValueDispatcher -> queue channels
    ///
    /// 验证完整的数据流：
    /// 1. ConfigLoader 解析并校验配置
    /// 2. create_dispatcher 按配置创建通道
    /// 3. 上游 mpsc 源的值按类型分流到两个队列
    #[tokio::test]
    async fn test_e2e_config_to_queues() {
        let config = ConfigLoader::load_from_str(QUEUE_CONFIG, ConfigFormat::Toml).unwrap();
        let (dispatcher, mut receivers) = create_dispatcher::<Event>(&config).unwrap();
        let mut out = receivers.remove("out").unwrap();
        let mut failures = receivers.remove("failures").unwrap();

        let (tx, rx) = mpsc::channel(16);
        let handle = Arc::new(dispatcher).spawn(rx);

        tx.send(Event::Text("hello".into())).await.unwrap();
        tx.send(Event::Failure("x".into())).await.unwrap();
        tx.send(Event::Text("world".into())).await.unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap().unwrap(), 3);

        assert_eq!(out.recv().await.unwrap().into_payload(), Event::Text("hello".into()));
        assert_eq!(out.recv().await.unwrap().into_payload(), Event::Text("world".into()));
        assert_eq!(
            failures.recv().await.unwrap(),
            Message::new(Event::Failure("x".into()))
        );
        assert!(out.try_recv().is_err());
        assert!(failures.try_recv().is_err());
    }

    /// 无错误通道时，失败值回落到主通道
    #[tokio::test]
    async fn test_e2e_failures_fall_back_to_primary() {
        let content = r#"
[primary]
name = "out"
channel_type = "queue"
"#;
        let config = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        let (dispatcher, mut receivers) = create_dispatcher::<Event>(&config).unwrap();
        let mut out = receivers.remove("out").unwrap();

        let failure = Event::Failure("boom".into());
        assert_eq!(dispatcher.route(&failure), Route::Primary);
        dispatcher.accept(failure.clone()).await.unwrap();

        assert_eq!(out.recv().await.unwrap().into_payload(), failure);
    }

    /// Converter 输出原样投递
    #[tokio::test]
    async fn test_e2e_uppercase_converter() {
        let content = r#"
[primary]
name = "out"
channel_type = "queue"
"#;
        let config = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        let (dispatcher, mut receivers) = create_dispatcher::<String>(&config).unwrap();
        let mut out = receivers.remove("out").unwrap();

        dispatcher.set_converter(|s: String| -> Result<Message<String>, ContractError> {
            Ok(Message::new(s.to_uppercase()))
        });
        dispatcher.accept("hi".to_string()).await.unwrap();

        assert_eq!(out.recv().await.unwrap(), Message::new("HI".to_string()));
    }

    /// 接收端关闭时，发送错误原样返回
    #[tokio::test]
    async fn test_e2e_closed_queue_surfaces_error() {
        let config = ConfigLoader::load_from_str(QUEUE_CONFIG, ConfigFormat::Toml).unwrap();
        let (dispatcher, receivers) = create_dispatcher::<Event>(&config).unwrap();
        drop(receivers);

        let err = dispatcher
            .accept(Event::Failure("lost".into()))
            .await
            .unwrap_err();

        assert!(
            matches!(err, ContractError::ChannelClosed { ref channel } if channel == "failures")
        );
        assert_eq!(dispatcher.metrics().send_failures, 1);
    }

    /// 多个生产者并发投递，不丢失、不重复
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_concurrent_producers() {
        let config = ConfigLoader::load_from_str(QUEUE_CONFIG, ConfigFormat::Toml).unwrap();
        let (dispatcher, mut receivers) = create_dispatcher::<Event>(&config).unwrap();
        let mut out = receivers.remove("out").unwrap();
        let mut failures = receivers.remove("failures").unwrap();
        let dispatcher = Arc::new(dispatcher);

        let mut producers = Vec::new();
        for p in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            producers.push(tokio::spawn(async move {
                for i in 0..25 {
                    let event = if i % 5 == 0 {
                        Event::Failure(format!("{p}-{i}"))
                    } else {
                        Event::Text(format!("{p}-{i}"))
                    };
                    dispatcher.accept(event).await.unwrap();
                }
            }));
        }
        for producer in producers {
            producer.await.unwrap();
        }

        let mut texts = 0;
        while let Ok(msg) = out.try_recv() {
            assert!(!msg.payload.is_failure());
            texts += 1;
        }
        let mut errs = 0;
        while let Ok(msg) = failures.try_recv() {
            assert!(msg.payload.is_failure());
            errs += 1;
        }

        assert_eq!(texts, 80);
        assert_eq!(errs, 20);
        let metrics = dispatcher.metrics();
        assert_eq!(metrics.primary_count, 80);
        assert_eq!(metrics.error_count, 20);
    }

    /// 日志通道可作为主通道使用
    #[tokio::test]
    async fn test_e2e_log_channel() {
        let _ = observability::init_with_config(observability::ObservabilityConfig {
            log_format: observability::LogFormat::Compact,
            ..Default::default()
        });

        let content = r#"
[primary]
name = "debug"
"#;
        let config = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        let (dispatcher, receivers) = create_dispatcher::<Event>(&config).unwrap();
        assert!(receivers.is_empty());

        dispatcher.accept(Event::Text("logged".into())).await.unwrap();
        assert_eq!(dispatcher.metrics().primary_count, 1);
    }
}
