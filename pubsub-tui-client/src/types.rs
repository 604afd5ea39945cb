use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic name a subscription reports once its topic has been deleted.
pub const DELETED_TOPIC: &str = "_deleted-topic_";

/// Default flow-control bound and hand-off channel capacity.
pub const DEFAULT_MAX_OUTSTANDING_MESSAGES: usize = 100;
/// Payload bytes a stream may hold before pulling pauses (10 MiB).
pub const DEFAULT_MAX_OUTSTANDING_BYTES: usize = 10 * 1024 * 1024;

/// A topic as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    /// Short name (`orders`).
    pub name: String,
    /// Fully-qualified name (`projects/p/topics/orders`).
    pub full_name: String,
}

/// A subscription as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub name: String,
    pub full_name: String,
    /// Short name of the attached topic, or [`DELETED_TOPIC`].
    pub topic: String,
    pub ack_deadline_seconds: u32,
}

/// One message as returned by a pull, before any capability is bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulledMessage {
    /// Opaque token used to acknowledge or reject this delivery.
    pub ack_id: String,
    pub message_id: String,
    pub data: Vec<u8>,
    pub attributes: BTreeMap<String, String>,
    pub publish_time: DateTime<Utc>,
    /// 1 on first delivery, incremented by the service on redelivery.
    pub delivery_attempt: u32,
}

/// Flow control for a subscription stream.
///
/// `max_outstanding_messages` bounds both the pull size and the hand-off
/// channel; anything beyond it stays with the service.
/// `max_outstanding_bytes` bounds the payload bytes waiting in the hand-off
/// channel. A single message larger than the bound still passes once the
/// channel is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveSettings {
    pub max_outstanding_messages: usize,
    pub max_outstanding_bytes: usize,
}

impl Default for ReceiveSettings {
    fn default() -> Self {
        Self {
            max_outstanding_messages: DEFAULT_MAX_OUTSTANDING_MESSAGES,
            max_outstanding_bytes: DEFAULT_MAX_OUTSTANDING_BYTES,
        }
    }
}
