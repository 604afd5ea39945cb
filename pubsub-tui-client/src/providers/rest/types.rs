//! Wire types of the REST v1 surface

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTopicsResponse {
    #[serde(default)]
    pub topics: Vec<TopicResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopicResource {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubscriptionsResponse {
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResource {
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub ack_deadline_seconds: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest<'a> {
    pub topic: &'a str,
    pub ack_deadline_seconds: u32,
}

#[derive(Debug, Serialize)]
pub struct PublishRequest {
    pub messages: Vec<OutgoingMessage>,
}

#[derive(Debug, Serialize)]
pub struct OutgoingMessage {
    /// Base64 payload.
    pub data: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    #[serde(default)]
    pub message_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub max_messages: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    #[serde(default)]
    pub received_messages: Vec<WireReceivedMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReceivedMessage {
    pub ack_id: String,
    pub message: WireMessage,
    pub delivery_attempt: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub message_id: String,
    pub publish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest<'a> {
    pub ack_ids: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyAckDeadlineRequest<'a> {
    pub ack_ids: &'a [String],
    pub ack_deadline_seconds: u32,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}
