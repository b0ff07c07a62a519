//! Notification sink port
//!
//! Real-time delivery is a collaborator concern; the domain only pushes
//! events into this sink and never awaits delivery confirmation.

use async_trait::async_trait;

use crate::events::DomainEvent;

/// Fire-and-forget event sink
///
/// Implementations must not block the caller on downstream delivery;
/// failures are theirs to log and swallow.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: DomainEvent);
}

/// Sink that drops every event, for tests and offline tooling
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotificationSink;

#[async_trait]
impl NotificationSink for NullNotificationSink {
    async fn notify(&self, _event: DomainEvent) {}
}
