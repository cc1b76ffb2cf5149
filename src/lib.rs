//! # LiteLLM Channel Health
//!
//! Channel health management for the LiteLLM-RS gateway.
//!
//! ## Features
//!
//! - **Error Classification**: Ordered rule table deciding whether an upstream
//!   error should take a channel out of rotation
//! - **Guarded Transitions**: Auto-disable and re-enable through a pluggable
//!   channel store, with one operator notification per applied transition
//! - **Webhook Notifications**: Generic signed JSON webhooks and DingTalk robots,
//!   delivered directly behind SSRF protection or through a worker relay
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use litellm_channel_health::{
//!     ChannelError, ChannelHealthController, ChannelStatus, ChannelStore, ChannelType, Config,
//!     UpstreamError, WebhookNotifier,
//! };
//! use std::sync::Arc;
//!
//! struct MyStore;
//!
//! #[async_trait::async_trait]
//! impl ChannelStore for MyStore {
//!     async fn update_channel_status(
//!         &self,
//!         _channel_id: i64,
//!         _using_key: &str,
//!         _status: ChannelStatus,
//!         _reason: &str,
//!     ) -> bool {
//!         true
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/channel_health.yaml").await?;
//!     let notifier = WebhookNotifier::from_config(&config, reqwest::Client::new())?;
//!     let controller =
//!         ChannelHealthController::from_config(&config, Arc::new(MyStore), Arc::new(notifier));
//!
//!     let channel = ChannelError::new(5, ChannelType::OPENAI, "openai-main", false, "", true, None);
//!     let err = UpstreamError::new(401, "Incorrect API key provided");
//!     controller.process_error(&channel, &err).await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result, WebhookError};

pub use core::channel::{ChannelError, ChannelStatus, ChannelType, UpstreamError};
pub use core::health::{
    ChannelHealthController, ChannelStore, ErrorClassifier, KeywordMatcher, NotificationRouter,
    SubstringMatcher, TransitionOutcome, Verdict,
};
pub use core::webhooks::{
    DeliveryStrategy, DirectDelivery, HttpWorkerClient, Notify, WebhookNotifier, WebhookSender,
    WorkerClient, WorkerRelayDelivery,
};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
