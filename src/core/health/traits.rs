//! Collaborators the health controller depends on

use crate::core::channel::ChannelStatus;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence for channel status.
///
/// The update must be atomic per `(channel_id, using_key)`: of two racing
/// transitions against the same precondition, at most one may report `true`.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Move the channel (or the given key of a multi-key channel) to `status`.
    ///
    /// Returns whether the transition was applied.
    async fn update_channel_status(
        &self,
        channel_id: i64,
        using_key: &str,
        status: ChannelStatus,
        reason: &str,
    ) -> bool;
}

/// Operator notification fan-out.
///
/// Deduplication and throttling by `notify_type` are the router's job.
#[async_trait]
pub trait NotificationRouter: Send + Sync {
    async fn notify(&self, notify_type: &str, subject: &str, content: &str) -> Result<()>;
}
