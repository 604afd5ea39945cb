use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PulledMessage, SubscriptionInfo, TopicInfo};

/// Messaging-service client.
///
/// Resource names passed in and returned are short names; implementations
/// qualify them with their project.
///
/// # Shared behaviour
///
/// - create validates the id and fails with `AlreadyExists` if the resource is present
/// - delete fails with `NotFound` if the resource is absent
/// - creating a subscription requires its topic to exist
/// - lists are sorted by name
#[async_trait]
pub trait PubSubClient: Send + Sync {
    /// Project every resource belongs to.
    fn project_id(&self) -> &str;

    async fn list_topics(&self) -> Result<Vec<TopicInfo>>;

    async fn create_topic(&self, name: &str) -> Result<()>;

    async fn delete_topic(&self, name: &str) -> Result<()>;

    async fn topic_exists(&self, name: &str) -> Result<bool>;

    async fn list_subscriptions(&self) -> Result<Vec<SubscriptionInfo>>;

    async fn create_subscription(&self, name: &str, topic: &str) -> Result<()>;

    async fn delete_subscription(&self, name: &str) -> Result<()>;

    async fn subscription_exists(&self, name: &str) -> Result<bool>;

    /// Publishes one message and returns the id assigned by the service.
    async fn publish(
        &self,
        topic: &str,
        data: Vec<u8>,
        attributes: BTreeMap<String, String>,
    ) -> Result<String>;

    /// Pulls up to `max_messages` deliveries.
    ///
    /// May wait for messages to become available; callers race it against
    /// their cancellation token.
    async fn pull(&self, subscription: &str, max_messages: usize) -> Result<Vec<PulledMessage>>;

    async fn acknowledge(&self, subscription: &str, ack_ids: &[String]) -> Result<()>;

    /// Changes the ack deadline of outstanding deliveries. `0` rejects them.
    async fn modify_ack_deadline(
        &self,
        subscription: &str,
        ack_ids: &[String],
        seconds: u32,
    ) -> Result<()>;
}
