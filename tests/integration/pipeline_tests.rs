//! Failure → transition → notification tests

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::{ChannelFactory, ErrorFactory, InMemoryChannelStore, RecordingRouter};
    use litellm_channel_health::core::health::notify_type_key;
    use litellm_channel_health::core::webhooks::webhook_signature;
    use litellm_channel_health::{
        ChannelHealthController, ChannelStatus, Config, DirectDelivery, ErrorClassifier,
        TransitionOutcome, WebhookNotifier, WebhookSender,
    };
    use litellm_channel_health::config::FetchSetting;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "ops-secret";

    fn notifier(url: String) -> WebhookNotifier {
        let delivery =
            assert_ok!(DirectDelivery::new(FetchSetting::disabled(), Duration::from_secs(5)));
        WebhookNotifier::new(
            WebhookSender::new(Arc::new(delivery)),
            url,
            Some(SECRET.to_string()),
        )
    }

    fn controller(
        store: Arc<InMemoryChannelStore>,
        router: Arc<dyn litellm_channel_health::NotificationRouter>,
    ) -> ChannelHealthController {
        ChannelHealthController::from_config(&Config::default(), store, router)
    }

    fn enabled_store(ids: &[i64]) -> Arc<InMemoryChannelStore> {
        let store = ids.iter().fold(InMemoryChannelStore::default(), |store, id| {
            store.with_channel(*id, "", ChannelStatus::Enabled)
        });
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_disable_delivers_one_signed_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ops"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = enabled_store(&[5]);
        let controller = controller(
            store.clone(),
            Arc::new(notifier(format!("{}/ops", server.uri()))),
        );

        let outcome = controller
            .process_error(&ChannelFactory::openai(5), &ErrorFactory::unauthorized())
            .await;
        assert_eq!(outcome, TransitionOutcome::Applied { notified: true });
        assert_eq!(store.status(5, ""), Some(ChannelStatus::AutoDisabled));
        assert_eq!(store.reason(5, "").as_deref(), Some("Incorrect API key provided"));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        let body: Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body["type"], notify_type_key(5, ChannelStatus::AutoDisabled));
        assert_eq!(body["title"], "[Channel Alert] - openai-5 (#5)");
        assert!(body["content"].as_str().unwrap().contains("Incorrect API key provided"));
        assert!(body.get("values").is_none());
        assert!(body["timestamp"].as_i64().unwrap() > 0);

        let signature = req.headers.get("X-Webhook-Signature").unwrap().to_str().unwrap();
        assert_eq!(signature, webhook_signature(SECRET, &req.body).unwrap());
    }

    #[tokio::test]
    async fn test_forbidden_only_disables_gemini() {
        let store = enabled_store(&[1, 2]);
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());

        let openai = controller
            .process_error(&ChannelFactory::openai(1), &ErrorFactory::forbidden())
            .await;
        let gemini = controller
            .process_error(&ChannelFactory::gemini(2), &ErrorFactory::forbidden())
            .await;

        assert_eq!(openai, TransitionOutcome::Skipped);
        assert!(gemini.is_applied());
        assert_eq!(store.status(1, ""), Some(ChannelStatus::Enabled));
        assert_eq!(store.status(2, ""), Some(ChannelStatus::AutoDisabled));
        assert_eq!(router.routed().len(), 1);
    }

    #[tokio::test]
    async fn test_transient_error_keeps_channel() {
        let store = enabled_store(&[1]);
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());

        let outcome = controller
            .process_error(&ChannelFactory::openai(1), &ErrorFactory::transient())
            .await;
        assert_eq!(outcome, TransitionOutcome::Skipped);
        assert_eq!(store.status(1, ""), Some(ChannelStatus::Enabled));
        assert!(router.routed().is_empty());
    }

    #[tokio::test]
    async fn test_protected_channel_is_never_disabled() {
        let store = enabled_store(&[8]);
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());

        let outcome = controller
            .process_error(&ChannelFactory::protected(8), &ErrorFactory::quota_exceeded())
            .await;
        assert_eq!(outcome, TransitionOutcome::Skipped);
        assert_eq!(store.status(8, ""), Some(ChannelStatus::Enabled));
        assert!(router.routed().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_disable_notifies_once() {
        let store = enabled_store(&[3]);
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());
        let channel = ChannelFactory::openai(3);

        let first = controller.disable(&channel, "quota").await;
        let second = controller.disable(&channel, "quota").await;
        assert!(first.is_applied());
        assert_eq!(second, TransitionOutcome::Unchanged);
        assert_eq!(router.routed().len(), 1);
    }

    #[tokio::test]
    async fn test_multi_key_disables_only_that_key() {
        let store = Arc::new(
            InMemoryChannelStore::default()
                .with_channel(4, "key-a", ChannelStatus::Enabled)
                .with_channel(4, "key-b", ChannelStatus::Enabled),
        );
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());

        controller
            .process_error(&ChannelFactory::multi_key(4, "key-b"), &ErrorFactory::unauthorized())
            .await;
        assert_eq!(store.status(4, "key-a"), Some(ChannelStatus::Enabled));
        assert_eq!(store.status(4, "key-b"), Some(ChannelStatus::AutoDisabled));
    }

    #[tokio::test]
    async fn test_recovery_round_trip() {
        let store = enabled_store(&[5]);
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());

        controller
            .process_error(&ChannelFactory::openai(5), &ErrorFactory::unauthorized())
            .await;
        let stored = store.status(5, "").unwrap();
        let outcome = controller.process_success(5, "", "openai-5", stored).await;
        assert!(outcome.is_applied());
        assert_eq!(store.status(5, ""), Some(ChannelStatus::Enabled));

        let keys: Vec<_> = router.routed().into_iter().map(|r| r.notify_type).collect();
        assert_eq!(keys, ["channel_update_5_3", "channel_update_5_1"]);
    }

    #[tokio::test]
    async fn test_router_failure_does_not_roll_back() {
        let store = enabled_store(&[10]);
        let router = Arc::new(RecordingRouter::failing());
        let controller = controller(store.clone(), router.clone());

        let outcome = controller.disable(&ChannelFactory::openai(10), "quota").await;
        assert_eq!(outcome, TransitionOutcome::Applied { notified: false });
        assert_eq!(store.status(10, ""), Some(ChannelStatus::AutoDisabled));

        let routed = router.routed();
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].subject, "[Channel Alert] - openai-10 (#10)");
        assert!(routed[0].content.contains("quota"));
    }

    #[tokio::test]
    async fn test_manual_disable_is_not_recovered() {
        let store = Arc::new(InMemoryChannelStore::default().with_channel(
            6,
            "",
            ChannelStatus::ManuallyDisabled,
        ));
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());

        let outcome = controller
            .process_success(6, "", "openai-6", ChannelStatus::ManuallyDisabled)
            .await;
        assert_eq!(outcome, TransitionOutcome::Skipped);
        assert_eq!(store.status(6, ""), Some(ChannelStatus::ManuallyDisabled));
    }

    #[tokio::test]
    async fn test_concurrent_disables_have_one_winner() {
        let store = enabled_store(&[9]);
        let router = Arc::new(RecordingRouter::default());
        let controller = controller(store.clone(), router.clone());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller
                        .process_error(&ChannelFactory::openai(9), &ErrorFactory::unauthorized())
                        .await
                })
            })
            .collect();

        let mut applied = 0;
        for handle in handles {
            if handle.await.unwrap().is_applied() {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
        assert_eq!(router.routed().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_webhook_keeps_transition() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = enabled_store(&[7]);
        let controller = controller(store.clone(), Arc::new(notifier(server.uri())));

        let outcome = controller.disable(&ChannelFactory::openai(7), "quota").await;
        assert_eq!(outcome, TransitionOutcome::Applied { notified: false });
        assert_eq!(store.status(7, ""), Some(ChannelStatus::AutoDisabled));
    }

    #[tokio::test]
    async fn test_dingtalk_operator_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oapi.dingtalk.com/robot/send"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = enabled_store(&[5]);
        let url = format!("{}/oapi.dingtalk.com/robot/send?access_token=t", server.uri());
        let controller = controller(store, Arc::new(notifier(url)));
        controller.disable(&ChannelFactory::openai(5), "quota").await;

        let requests = server.received_requests().await.unwrap();
        let req = &requests[0];
        let params: Vec<(String, String)> = req
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(params.iter().filter(|(k, _)| k == "timestamp").count(), 1);
        assert_eq!(params.iter().filter(|(k, _)| k == "sign").count(), 1);
        assert!(params.iter().any(|(k, v)| k == "access_token" && v == "t"));
        assert!(req.headers.get("X-Webhook-Signature").is_none());

        let body: Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body["msgtype"], "markdown");
        assert_eq!(body["markdown"]["title"], "[Channel Alert] - openai-5 (#5)");
        let text = body["markdown"]["text"].as_str().unwrap();
        assert!(!text.starts_with("###"));
        assert!(text.contains("  \n"));
    }

    #[test]
    fn test_classifier_from_config_keywords() {
        let config = Config::from_yaml_str(
            "channel:\n  disable_keywords:\n    - \"organization has been disabled\"\n",
        )
        .unwrap();
        let classifier = ErrorClassifier::new(config.channel().clone());
        let err = litellm_channel_health::UpstreamError::new(400, "This Organization Has Been Disabled.");
        assert!(classifier.should_disable(litellm_channel_health::ChannelType::OPENAI, Some(&err)));
    }
}
