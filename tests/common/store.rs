//! In-memory collaborators for the health controller

use async_trait::async_trait;
use litellm_channel_health::{ChannelStatus, ChannelStore, GatewayError, NotificationRouter, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Channel store with compare-and-set transitions.
///
/// Auto-disable applies only to an enabled channel and re-enable only to an
/// auto-disabled one, so two racing transitions cannot both win.
#[derive(Debug, Default)]
pub struct InMemoryChannelStore {
    statuses: Mutex<HashMap<(i64, String), ChannelStatus>>,
    reasons: Mutex<HashMap<(i64, String), String>>,
}

impl InMemoryChannelStore {
    pub fn with_channel(self, channel_id: i64, using_key: &str, status: ChannelStatus) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert((channel_id, using_key.to_string()), status);
        self
    }

    pub fn status(&self, channel_id: i64, using_key: &str) -> Option<ChannelStatus> {
        self.statuses
            .lock()
            .unwrap()
            .get(&(channel_id, using_key.to_string()))
            .copied()
    }

    pub fn reason(&self, channel_id: i64, using_key: &str) -> Option<String> {
        self.reasons
            .lock()
            .unwrap()
            .get(&(channel_id, using_key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn update_channel_status(
        &self,
        channel_id: i64,
        using_key: &str,
        status: ChannelStatus,
        reason: &str,
    ) -> bool {
        let key = (channel_id, using_key.to_string());
        let mut statuses = self.statuses.lock().unwrap();
        let Some(current) = statuses.get_mut(&key) else {
            return false;
        };
        let allowed = matches!(
            (*current, status),
            (ChannelStatus::Enabled, ChannelStatus::AutoDisabled)
                | (ChannelStatus::AutoDisabled, ChannelStatus::Enabled)
        );
        if !allowed {
            return false;
        }
        *current = status;
        self.reasons.lock().unwrap().insert(key, reason.to_string());
        true
    }
}

/// A routed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    pub notify_type: String,
    pub subject: String,
    pub content: String,
}

/// Router that records every notification and optionally fails
#[derive(Debug, Default)]
pub struct RecordingRouter {
    fail: bool,
    routed: Mutex<Vec<Routed>>,
}

impl RecordingRouter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn routed(&self) -> Vec<Routed> {
        self.routed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRouter for RecordingRouter {
    async fn notify(&self, notify_type: &str, subject: &str, content: &str) -> Result<()> {
        self.routed.lock().unwrap().push(Routed {
            notify_type: notify_type.to_string(),
            subject: subject.to_string(),
            content: content.to_string(),
        });
        if self.fail {
            return Err(GatewayError::notification("router unavailable"));
        }
        Ok(())
    }
}
