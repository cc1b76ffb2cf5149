//! Guarded channel status transitions with operator notification

use super::classifier::ErrorClassifier;
use super::traits::{ChannelStore, NotificationRouter};
use crate::config::Config;
use crate::core::channel::{ChannelError, ChannelStatus, UpstreamError};
use crate::core::webhooks::NOTIFY_TYPE_CHANNEL_UPDATE;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a transition request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Nothing was attempted (auto-ban off, or no rule asked for it)
    Skipped,
    /// The store reported the transition as not applied
    Unchanged,
    /// The status changed; `notified` is false when routing the notification failed
    Applied { notified: bool },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Dedup key for a status-change notification
pub fn notify_type_key(channel_id: i64, status: ChannelStatus) -> String {
    format!("{}_{}_{}", NOTIFY_TYPE_CHANNEL_UPDATE, channel_id, status.code())
}

/// Applies classifier verdicts to the channel store and notifies operators
#[derive(Clone)]
pub struct ChannelHealthController {
    classifier: Arc<ErrorClassifier>,
    store: Arc<dyn ChannelStore>,
    router: Arc<dyn NotificationRouter>,
}

impl ChannelHealthController {
    pub fn new(
        classifier: Arc<ErrorClassifier>,
        store: Arc<dyn ChannelStore>,
        router: Arc<dyn NotificationRouter>,
    ) -> Self {
        Self {
            classifier,
            store,
            router,
        }
    }

    /// Controller with a classifier built from the channel settings
    pub fn from_config(
        config: &Config,
        store: Arc<dyn ChannelStore>,
        router: Arc<dyn NotificationRouter>,
    ) -> Self {
        let classifier = ErrorClassifier::new(config.channel().clone());
        Self::new(Arc::new(classifier), store, router)
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Auto-disable the channel named in `channel_error`
    pub async fn disable(&self, channel_error: &ChannelError, reason: &str) -> TransitionOutcome {
        info!(
            channel_id = channel_error.channel_id,
            channel_name = %channel_error.channel_name,
            reason = %reason,
            "Channel failed, preparing to disable"
        );

        if !channel_error.auto_ban {
            info!(
                channel_id = channel_error.channel_id,
                channel_name = %channel_error.channel_name,
                "Automatic disable is off for this channel, skipping"
            );
            return TransitionOutcome::Skipped;
        }

        let applied = self
            .store
            .update_channel_status(
                channel_error.channel_id,
                &channel_error.using_key,
                ChannelStatus::AutoDisabled,
                reason,
            )
            .await;
        if !applied {
            debug!(
                channel_id = channel_error.channel_id,
                "Channel status unchanged by store"
            );
            return TransitionOutcome::Unchanged;
        }

        let subject = format!(
            "[Channel Alert] - {} (#{})",
            channel_error.channel_name, channel_error.channel_id
        );
        let content = disabled_body(
            &channel_error.channel_name,
            channel_error.channel_id,
            &Local::now().format(TIME_FORMAT).to_string(),
            reason,
        );
        let notified = self
            .route(
                notify_type_key(channel_error.channel_id, ChannelStatus::AutoDisabled),
                &subject,
                &content,
            )
            .await;
        TransitionOutcome::Applied { notified }
    }

    /// Restore an auto-disabled channel
    pub async fn enable(
        &self,
        channel_id: i64,
        using_key: &str,
        channel_name: &str,
    ) -> TransitionOutcome {
        let applied = self
            .store
            .update_channel_status(channel_id, using_key, ChannelStatus::Enabled, "")
            .await;
        if !applied {
            debug!(channel_id, "Channel status unchanged by store");
            return TransitionOutcome::Unchanged;
        }

        info!(channel_id, channel_name = %channel_name, "Channel re-enabled");
        let subject = format!("[Channel Recovered] - {} (#{})", channel_name, channel_id);
        let content = recovered_body(
            channel_name,
            channel_id,
            &Local::now().format(TIME_FORMAT).to_string(),
        );
        let notified = self
            .route(
                notify_type_key(channel_id, ChannelStatus::Enabled),
                &subject,
                &content,
            )
            .await;
        TransitionOutcome::Applied { notified }
    }

    /// Classify a failed call and disable the channel when a rule says so
    pub async fn process_error(
        &self,
        channel_error: &ChannelError,
        err: &UpstreamError,
    ) -> TransitionOutcome {
        let verdict = self
            .classifier
            .classify(channel_error.channel_type, Some(err));
        if !verdict.is_disable() {
            debug!(
                channel_id = channel_error.channel_id,
                ?verdict,
                "Upstream error does not disable channel"
            );
            return TransitionOutcome::Skipped;
        }
        self.disable(channel_error, &err.to_string()).await
    }

    /// Re-enable after a successful call when the stored status allows it
    pub async fn process_success(
        &self,
        channel_id: i64,
        using_key: &str,
        channel_name: &str,
        stored_status: ChannelStatus,
    ) -> TransitionOutcome {
        if !self.classifier.should_enable(None, stored_status) {
            return TransitionOutcome::Skipped;
        }
        self.enable(channel_id, using_key, channel_name).await
    }

    async fn route(&self, notify_type: String, subject: &str, content: &str) -> bool {
        match self.router.notify(&notify_type, subject, content).await {
            Ok(()) => {
                debug!(notify_type = %notify_type, "Channel notification routed");
                true
            }
            Err(e) => {
                warn!(notify_type = %notify_type, error = %e, "Failed to route channel notification");
                false
            }
        }
    }
}

impl std::fmt::Debug for ChannelHealthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHealthController")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

fn disabled_body(name: &str, id: i64, time: &str, reason: &str) -> String {
    format!(
        "**[Channel Alert] - Channel Monitor 🚨**\n\
         **📡 Channel:** {name}\n\
         **🆔 Channel ID:** #{id}\n\
         **🔄 Status: Enabled → Auto-disabled**\n\
         **🕘 Disabled at:** {time}\n\
         **⚠️ Severity: Critical**\n\
         **📝 Reason:** {reason}"
    )
}

fn recovered_body(name: &str, id: i64, time: &str) -> String {
    format!(
        "**[Channel Recovered] - Channel Monitor ✅**\n\
         **📡 Channel:** {name}\n\
         **🆔 Channel ID:** #{id}\n\
         **🔄 Status: Auto-disabled → Enabled**\n\
         **🕘 Recovered at:** {time}\n\
         **✨ Channel is back to normal**"
    )
}
