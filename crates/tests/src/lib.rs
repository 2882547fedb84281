//! # Integration Tests
//!
//! End-to-end tests across crates.
//!
//! Covers:
//! - Config file -> dispatcher defaults
//! - Dispatcher against a real HTTP server (success, failure, cancellation)
//! - Reader -> batcher -> dispatcher pipeline

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::Notifier;

    #[test]
    fn test_loaded_config_resolves_in_notifier() {
        let config = ConfigLoader::load_from_str(
            r#"
url = "http://127.0.0.1:9/notify"
num_workers = 3

[client]
request_timeout_ms = 2000
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let notifier = Notifier::new(config).unwrap();
        let resolved = notifier.config();
        assert_eq!(resolved.num_workers, 3);
        assert_eq!(resolved.intake_queue_capacity, 15);
        assert_eq!(resolved.error_queue_capacity, 30);
        assert_eq!(resolved.send_interval_ms, 5000);
        assert_eq!(resolved.client.request_timeout_ms, 2000);
        assert_eq!(resolved.client.connect_timeout_ms, 5000);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use contracts::{DeliveryError, Message, NotifyConfig};
    use dispatcher::Notifier;
    use ingestion::{Batcher, BatcherConfig, LineReader};
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_status(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    fn config(server: &MockServer, workers: usize) -> NotifyConfig {
        let mut config = NotifyConfig::new(format!("{}/notify", server.uri()));
        config.num_workers = workers;
        config
    }

    async fn received_bodies(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }

    fn sorted(mut bodies: Vec<String>) -> Vec<String> {
        bodies.sort();
        bodies
    }

    /// Every message reaches the server exactly once and nothing lands on the error queue
    #[tokio::test]
    async fn test_all_messages_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .and(header("content-type", "text/plain"))
            .respond_with(ResponseTemplate::new(200))
            .expect(50)
            .mount(&server)
            .await;

        let mut notifier = Notifier::new(config(&server, 4)).unwrap();
        let errors = notifier.error_channel();
        notifier.start().unwrap();

        let expected: Vec<String> = (0..50).map(|i| format!("message {i}")).collect();
        notifier
            .send(expected.iter().map(|b| Message::new(b.as_str())).collect())
            .await
            .unwrap();

        let summary = notifier.stop().await.unwrap();

        assert_eq!(summary.delivered, 50);
        assert_eq!(summary.failed, 0);
        assert!(errors.recv().await.is_err());
        assert_eq!(sorted(received_bodies(&server).await), sorted(expected));
    }

    /// Two workers, two messages
    #[tokio::test]
    async fn test_two_workers_two_messages() {
        let server = server_with_status(200).await;

        let mut notifier = Notifier::new(config(&server, 2)).unwrap();
        notifier.start().unwrap();
        notifier
            .send(vec![Message::new("m1"), Message::new("m2")])
            .await
            .unwrap();
        notifier.stop().await.unwrap();

        assert_eq!(
            sorted(received_bodies(&server).await),
            vec!["m1".to_string(), "m2".to_string()]
        );
    }

    /// A non-200 response routes each message to the error queue with its error
    #[tokio::test]
    async fn test_failed_messages_reach_error_queue() {
        let server = server_with_status(503).await;

        let mut notifier = Notifier::new(config(&server, 3)).unwrap();
        let errors = notifier.error_channel();
        notifier.start().unwrap();

        let bodies: Vec<String> = (0..10).map(|i| format!("fail-{i}")).collect();
        notifier
            .send(bodies.iter().map(|b| Message::new(b.as_str())).collect())
            .await
            .unwrap();

        let mut failed = Vec::new();
        for _ in 0..bodies.len() {
            let message = tokio::time::timeout(Duration::from_secs(5), errors.recv())
                .await
                .expect("error queue timed out")
                .unwrap();
            assert_eq!(message.error, Some(DeliveryError::status(503)));
            failed.push(message.body);
        }

        let summary = notifier.stop().await.unwrap();
        assert_eq!(summary.failed, 10);
        assert_eq!(summary.discarded_errors, 0);
        assert_eq!(sorted(failed), sorted(bodies));
    }

    /// Unreachable target fails with a connect error, not a status
    #[tokio::test]
    async fn test_unreachable_target() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut notifier =
            Notifier::new(NotifyConfig::new(format!("http://127.0.0.1:{port}/notify"))).unwrap();
        let errors = notifier.error_channel();
        notifier.start().unwrap();
        notifier.send(vec![Message::new("lost")]).await.unwrap();

        let message = tokio::time::timeout(Duration::from_secs(5), errors.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(message.error, Some(DeliveryError::Connect { .. })));
        notifier.stop().await.unwrap();
    }

    /// Cancellation accounts for every message exactly once
    #[tokio::test]
    async fn test_cancellation_accounts_for_every_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut config = NotifyConfig::new(server.uri());
        config.num_workers = 2;
        config.intake_queue_capacity = 20;
        let mut notifier = Notifier::with_cancellation(config, cancel.clone()).unwrap();
        notifier.start().unwrap();

        notifier
            .send((0..20).map(|i| Message::new(format!("c{i}"))).collect())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let summary = tokio::time::timeout(Duration::from_secs(5), notifier.stop())
            .await
            .expect("stop did not return after cancellation")
            .unwrap();

        assert!(summary.delivered < 20);
        assert!(summary.cancelled > 0);
        assert_eq!(summary.delivered + summary.failed + summary.cancelled, 20);
    }

    /// stdin-like input through reader, batcher and dispatcher
    #[tokio::test]
    async fn test_reader_batcher_dispatcher_pipeline() {
        let server = server_with_status(200).await;

        let lines: Vec<String> = (0..120).map(|i| format!("line {i}")).collect();
        let mut input = lines.join("\n\n").into_bytes();
        input.push(b'\n');

        let mut config = config(&server, 5);
        config.send_interval_ms = 10;
        config.send_interval_buffer_capacity = 16;

        let cancel = CancellationToken::new();
        let batcher_config = BatcherConfig::from(&config);
        let mut notifier = Notifier::new(config).unwrap();
        let errors = notifier.error_channel();
        notifier.start().unwrap();

        let (tx, rx) = async_channel::bounded(batcher_config.input_capacity);
        let reader = tokio::spawn(
            LineReader::new(std::io::Cursor::new(input), cancel.clone()).run(tx),
        );

        let report = Batcher::new(notifier, batcher_config, cancel)
            .run(rx)
            .await
            .unwrap();

        assert_eq!(reader.await.unwrap().unwrap(), 120);
        assert!(!report.cancelled);
        assert_eq!(report.messages_flushed, 120);
        assert_eq!(report.shutdown.delivered, 120);
        assert!(errors.recv().await.is_err());

        let bodies = received_bodies(&server).await;
        let unique: HashSet<&String> = bodies.iter().collect();
        assert_eq!(unique.len(), bodies.len(), "duplicate deliveries");
        assert_eq!(sorted(bodies), sorted(lines));
    }
}
