//! Intents returned by a region's local key handling

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicAction {
    Select(String),
    Create(String),
    Delete(String),
    Refresh,
    /// Rejected input, reported to the activity log.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionAction {
    Connect { name: String, topic: String },
    Disconnect,
    Create { name: String, topic: String },
    Delete(String),
    Refresh,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherAction {
    Publish { topic: String, payload: Vec<u8> },
    LoadFile(PathBuf),
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriberAction {
    /// Carries the message's short id.
    Acknowledged(String),
    Rejected(String),
    /// Reject asked for after the message was acknowledged.
    AlreadyAcknowledged(String),
    AutoAck(bool),
    Invalid(String),
}
