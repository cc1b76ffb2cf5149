//! Configuration-driven wiring tests

#[cfg(test)]
mod tests {
    use crate::assert_err;
    use crate::assert_ok;
    use crate::common::{ChannelFactory, ErrorFactory, InMemoryChannelStore};
    use litellm_channel_health::{
        ChannelHealthController, ChannelStatus, Config, GatewayError, Notify, TransitionOutcome,
        WebhookError, WebhookNotifier, WebhookSender,
    };
    use serde_json::Value;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn load(yaml: &str) -> Config {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        assert_ok!(Config::from_file(file.path()).await)
    }

    #[tokio::test]
    async fn test_worker_mode_from_file() {
        let worker = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&worker)
            .await;

        let config = load(&format!(
            "webhook:\n  notify_url: \"https://hooks.example.com/ops\"\n  notify_secret: \"s3\"\n  worker:\n    enabled: true\n    url: \"{}\"\n    valid_key: \"wk\"\n",
            worker.uri()
        ))
        .await;

        let notifier = assert_ok!(WebhookNotifier::from_config(&config, reqwest::Client::new()));
        assert_eq!(notifier.url(), "https://hooks.example.com/ops");

        let store = Arc::new(InMemoryChannelStore::default().with_channel(
            5,
            "",
            ChannelStatus::Enabled,
        ));
        let controller = ChannelHealthController::from_config(&config, store, Arc::new(notifier));
        let outcome = controller
            .process_error(&ChannelFactory::openai(5), &ErrorFactory::unauthorized())
            .await;
        assert_eq!(outcome, TransitionOutcome::Applied { notified: true });

        let requests = worker.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let descriptor: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(descriptor["url"], "https://hooks.example.com/ops");
        assert_eq!(descriptor["key"], "wk");
        assert_eq!(descriptor["method"], "POST");
        assert_eq!(descriptor["headers"]["Authorization"], "Bearer s3");
        assert!(descriptor["headers"]["X-Webhook-Signature"].is_string());
        assert_eq!(descriptor["body"]["type"], "channel_update_5_3");
    }

    #[tokio::test]
    async fn test_worker_refuses_plain_http_target() {
        let worker = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&worker)
            .await;

        let config = load(&format!(
            "webhook:\n  worker:\n    enabled: true\n    url: \"{}\"\n",
            worker.uri()
        ))
        .await;
        let sender = assert_ok!(WebhookSender::from_config(&config, reqwest::Client::new()));
        assert_eq!(sender.mode(), "worker");

        let err = sender
            .send("http://hooks.example.com/ops", None, &Notify::new("test", "t", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::RejectedByEgressPolicy(_)));
    }

    #[tokio::test]
    async fn test_ssrf_protection_blocks_loopback_destination() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = load("fetch:\n  enable_ssrf_protection: true\n  allow_private_ip: false\n").await;
        let sender = assert_ok!(WebhookSender::from_config(&config, reqwest::Client::new()));
        assert_eq!(sender.mode(), "direct");

        let err = sender
            .send(&server.uri(), Some("s"), &Notify::new("test", "t", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::RejectedByEgressPolicy(_)));
    }

    #[tokio::test]
    async fn test_private_ips_allowed_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let config = load(
            "fetch:\n  allow_private_ip: true\n  allowed_ports: []\n",
        )
        .await;
        let sender = assert_ok!(WebhookSender::from_config(&config, reqwest::Client::new()));
        assert_ok!(
            sender
                .send(&server.uri(), None, &Notify::new("test", "t", "c"))
                .await
        );
    }

    #[tokio::test]
    async fn test_custom_keywords_and_switches() {
        let config = load(
            "channel:\n  automatic_disable_enabled: true\n  automatic_enable_enabled: false\n  disable_keywords:\n    - \"suspended\"\n",
        )
        .await;
        let store = Arc::new(InMemoryChannelStore::default().with_channel(
            1,
            "",
            ChannelStatus::Enabled,
        ));
        let router = Arc::new(crate::common::RecordingRouter::default());
        let controller = ChannelHealthController::from_config(&config, store.clone(), router);

        // 403 from a non-Gemini channel falls through to the keyword rule
        let outcome = controller
            .process_error(&ChannelFactory::openai(1), &ErrorFactory::forbidden())
            .await;
        assert!(outcome.is_applied());

        let recovered = controller
            .process_success(1, "", "openai-1", ChannelStatus::AutoDisabled)
            .await;
        assert_eq!(recovered, TransitionOutcome::Skipped);
        assert_eq!(store.status(1, ""), Some(ChannelStatus::AutoDisabled));
    }

    #[test]
    fn test_notifier_requires_notify_url() {
        let err = assert_err!(WebhookNotifier::from_config(
            &Config::default(),
            reqwest::Client::new()
        ));
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(Config::from_yaml_str("webhook:\n  timeout_seconds: 0\n").is_err());
        assert!(Config::from_yaml_str("webhook:\n  worker:\n    enabled: true\n").is_err());
        assert!(Config::from_yaml_str("fetch:\n  ip_list: [\"not-an-ip\"]\n").is_err());
    }
}
