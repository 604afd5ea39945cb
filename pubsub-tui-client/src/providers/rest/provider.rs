//! `PubSubClient` implementation for the REST surface

use std::collections::BTreeMap;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use reqwest::Method;

use crate::error::{PubSubError, ResourceKind, Result};
use crate::traits::PubSubClient;
use crate::types::{PulledMessage, SubscriptionInfo, TopicInfo};
use crate::validation::{extract_name, subscription_path, topic_path, validate_resource_id};

use super::error::ErrorContext;
use super::types::{
    AcknowledgeRequest, CreateSubscriptionRequest, ListSubscriptionsResponse, ListTopicsResponse,
    ModifyAckDeadlineRequest, OutgoingMessage, PublishRequest, PublishResponse, PullRequest,
    PullResponse,
};
use super::RestPubSub;

/// Ack deadline for subscriptions created from the UI.
const DEFAULT_ACK_DEADLINE_SECS: u32 = 10;

impl RestPubSub {
    fn topic_path(&self, name: &str) -> String {
        topic_path(&self.project_id, name)
    }

    fn subscription_path(&self, name: &str) -> String {
        subscription_path(&self.project_id, name)
    }

    fn page_suffix(token: Option<&str>) -> String {
        token.map_or_else(String::new, |t| {
            format!("?pageToken={}", urlencoding::encode(t))
        })
    }
}

fn to_pulled(wire: super::types::WireReceivedMessage) -> Result<PulledMessage> {
    let data = BASE64
        .decode(wire.message.data.as_bytes())
        .map_err(|e| PubSubError::parse(format!("message {}: {e}", wire.message.message_id)))?;
    Ok(PulledMessage {
        ack_id: wire.ack_id,
        message_id: wire.message.message_id,
        data,
        attributes: wire.message.attributes,
        publish_time: wire.message.publish_time.unwrap_or_else(Utc::now),
        delivery_attempt: wire.delivery_attempt.unwrap_or(1),
    })
}

#[async_trait]
impl PubSubClient for RestPubSub {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn list_topics(&self) -> Result<Vec<TopicInfo>> {
        let mut topics = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let path = format!(
                "projects/{}/topics{}",
                self.project_id,
                Self::page_suffix(page_token.as_deref())
            );
            let page: ListTopicsResponse = self.get(&path, ErrorContext::default()).await?;
            topics.extend(page.topics.into_iter().map(|t| TopicInfo {
                name: extract_name(&t.name).to_string(),
                full_name: t.name,
            }));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(topics)
    }

    async fn create_topic(&self, name: &str) -> Result<()> {
        validate_resource_id(ResourceKind::Topic, name)?;
        if self.topic_exists(name).await? {
            return Err(PubSubError::AlreadyExists {
                resource: ResourceKind::Topic,
                name: name.to_string(),
            });
        }
        self.send_unit(
            Method::PUT,
            &self.topic_path(name),
            Some(&serde_json::json!({})),
            ErrorContext::topic(name),
        )
        .await
    }

    async fn delete_topic(&self, name: &str) -> Result<()> {
        if !self.topic_exists(name).await? {
            return Err(PubSubError::NotFound {
                resource: ResourceKind::Topic,
                name: name.to_string(),
            });
        }
        self.send_unit::<()>(
            Method::DELETE,
            &self.topic_path(name),
            None,
            ErrorContext::topic(name),
        )
        .await
    }

    async fn topic_exists(&self, name: &str) -> Result<bool> {
        match self
            .get::<serde_json::Value>(&self.topic_path(name), ErrorContext::topic(name))
            .await
        {
            Ok(_) => Ok(true),
            Err(PubSubError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn list_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        let mut subscriptions = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let path = format!(
                "projects/{}/subscriptions{}",
                self.project_id,
                Self::page_suffix(page_token.as_deref())
            );
            let page: ListSubscriptionsResponse =
                self.get(&path, ErrorContext::default()).await?;
            subscriptions.extend(page.subscriptions.into_iter().map(|s| SubscriptionInfo {
                name: extract_name(&s.name).to_string(),
                topic: extract_name(&s.topic).to_string(),
                full_name: s.name,
                ack_deadline_seconds: s.ack_deadline_seconds,
            }));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        subscriptions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subscriptions)
    }

    async fn create_subscription(&self, name: &str, topic: &str) -> Result<()> {
        validate_resource_id(ResourceKind::Subscription, name)?;
        if self.subscription_exists(name).await? {
            return Err(PubSubError::AlreadyExists {
                resource: ResourceKind::Subscription,
                name: name.to_string(),
            });
        }
        if !self.topic_exists(topic).await? {
            return Err(PubSubError::NotFound {
                resource: ResourceKind::Topic,
                name: topic.to_string(),
            });
        }
        let topic_path = self.topic_path(topic);
        self.send_unit(
            Method::PUT,
            &self.subscription_path(name),
            Some(&CreateSubscriptionRequest {
                topic: &topic_path,
                ack_deadline_seconds: DEFAULT_ACK_DEADLINE_SECS,
            }),
            ErrorContext::subscription(name),
        )
        .await
    }

    async fn delete_subscription(&self, name: &str) -> Result<()> {
        if !self.subscription_exists(name).await? {
            return Err(PubSubError::NotFound {
                resource: ResourceKind::Subscription,
                name: name.to_string(),
            });
        }
        self.send_unit::<()>(
            Method::DELETE,
            &self.subscription_path(name),
            None,
            ErrorContext::subscription(name),
        )
        .await
    }

    async fn subscription_exists(&self, name: &str) -> Result<bool> {
        match self
            .get::<serde_json::Value>(
                &self.subscription_path(name),
                ErrorContext::subscription(name),
            )
            .await
        {
            Ok(_) => Ok(true),
            Err(PubSubError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn publish(
        &self,
        topic: &str,
        data: Vec<u8>,
        attributes: BTreeMap<String, String>,
    ) -> Result<String> {
        let body = PublishRequest {
            messages: vec![OutgoingMessage {
                data: BASE64.encode(data),
                attributes,
            }],
        };
        let response: PublishResponse = self
            .send_json(
                Method::POST,
                &format!("{}:publish", self.topic_path(topic)),
                &body,
                ErrorContext::topic(topic),
            )
            .await?;
        response
            .message_ids
            .into_iter()
            .next()
            .ok_or_else(|| PubSubError::parse("publish response has no message id"))
    }

    async fn pull(&self, subscription: &str, max_messages: usize) -> Result<Vec<PulledMessage>> {
        let response: PullResponse = self
            .send_json(
                Method::POST,
                &format!("{}:pull", self.subscription_path(subscription)),
                &PullRequest {
                    max_messages: max_messages.max(1),
                },
                ErrorContext::subscription(subscription),
            )
            .await?;
        response.received_messages.into_iter().map(to_pulled).collect()
    }

    async fn acknowledge(&self, subscription: &str, ack_ids: &[String]) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("{}:acknowledge", self.subscription_path(subscription)),
            Some(&AcknowledgeRequest { ack_ids }),
            ErrorContext::subscription(subscription),
        )
        .await
    }

    async fn modify_ack_deadline(
        &self,
        subscription: &str,
        ack_ids: &[String],
        seconds: u32,
    ) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("{}:modifyAckDeadline", self.subscription_path(subscription)),
            Some(&ModifyAckDeadlineRequest {
                ack_ids,
                ack_deadline_seconds: seconds,
            }),
            ErrorContext::subscription(subscription),
        )
        .await
    }
}
