//! In-process broker
//!
//! Implements [`PubSubClient`] entirely in memory. Used by tests and by the
//! demo mode, so it follows the service's observable behaviour closely:
//! fan-out per topic, an outstanding set per subscription, redelivery on
//! reject. Ack deadlines are not tracked; an unacknowledged message stays
//! outstanding until it is acknowledged or rejected.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use crate::error::{PubSubError, ResourceKind, Result};
use crate::traits::PubSubClient;
use crate::types::{PulledMessage, SubscriptionInfo, TopicInfo, DELETED_TOPIC};
use crate::validation::{subscription_path, topic_path, validate_resource_id};

/// Ack deadline reported for subscriptions created here.
const DEFAULT_ACK_DEADLINE_SECS: u32 = 10;

#[derive(Debug)]
struct SubscriptionQueue {
    topic: String,
    pending: VecDeque<PulledMessage>,
    outstanding: HashMap<String, PulledMessage>,
    notify: Arc<Notify>,
}

#[derive(Debug, Default)]
struct Broker {
    topics: BTreeSet<String>,
    subscriptions: BTreeMap<String, SubscriptionQueue>,
}

/// In-memory [`PubSubClient`].
#[derive(Debug)]
pub struct InMemoryPubSub {
    project_id: String,
    broker: Mutex<Broker>,
    next_id: AtomicU64,
}

impl InMemoryPubSub {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            broker: Mutex::new(Broker::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Broker> {
        self.broker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Messages waiting to be pulled.
    pub fn pending_count(&self, subscription: &str) -> usize {
        self.lock()
            .subscriptions
            .get(subscription)
            .map_or(0, |q| q.pending.len())
    }

    /// Messages delivered but neither acknowledged nor rejected.
    pub fn outstanding_count(&self, subscription: &str) -> usize {
        self.lock()
            .subscriptions
            .get(subscription)
            .map_or(0, |q| q.outstanding.len())
    }
}

fn not_found(resource: ResourceKind, name: &str) -> PubSubError {
    PubSubError::NotFound {
        resource,
        name: name.to_string(),
    }
}

fn already_exists(resource: ResourceKind, name: &str) -> PubSubError {
    PubSubError::AlreadyExists {
        resource,
        name: name.to_string(),
    }
}

#[async_trait]
impl PubSubClient for InMemoryPubSub {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn list_topics(&self) -> Result<Vec<TopicInfo>> {
        Ok(self
            .lock()
            .topics
            .iter()
            .map(|name| TopicInfo {
                name: name.clone(),
                full_name: topic_path(&self.project_id, name),
            })
            .collect())
    }

    async fn create_topic(&self, name: &str) -> Result<()> {
        validate_resource_id(ResourceKind::Topic, name)?;
        if !self.lock().topics.insert(name.to_string()) {
            return Err(already_exists(ResourceKind::Topic, name));
        }
        log::debug!("[memory] created topic {name}");
        Ok(())
    }

    async fn delete_topic(&self, name: &str) -> Result<()> {
        let mut broker = self.lock();
        if !broker.topics.remove(name) {
            return Err(not_found(ResourceKind::Topic, name));
        }
        for queue in broker.subscriptions.values_mut() {
            if queue.topic == name {
                queue.topic = DELETED_TOPIC.to_string();
            }
        }
        log::debug!("[memory] deleted topic {name}");
        Ok(())
    }

    async fn topic_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock().topics.contains(name))
    }

    async fn list_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        Ok(self
            .lock()
            .subscriptions
            .iter()
            .map(|(name, queue)| SubscriptionInfo {
                name: name.clone(),
                full_name: subscription_path(&self.project_id, name),
                topic: queue.topic.clone(),
                ack_deadline_seconds: DEFAULT_ACK_DEADLINE_SECS,
            })
            .collect())
    }

    async fn create_subscription(&self, name: &str, topic: &str) -> Result<()> {
        validate_resource_id(ResourceKind::Subscription, name)?;
        let mut broker = self.lock();
        if broker.subscriptions.contains_key(name) {
            return Err(already_exists(ResourceKind::Subscription, name));
        }
        if !broker.topics.contains(topic) {
            return Err(not_found(ResourceKind::Topic, topic));
        }
        broker.subscriptions.insert(
            name.to_string(),
            SubscriptionQueue {
                topic: topic.to_string(),
                pending: VecDeque::new(),
                outstanding: HashMap::new(),
                notify: Arc::new(Notify::new()),
            },
        );
        log::debug!("[memory] created subscription {name} on {topic}");
        Ok(())
    }

    async fn delete_subscription(&self, name: &str) -> Result<()> {
        let removed = self.lock().subscriptions.remove(name);
        match removed {
            Some(queue) => {
                // Wake a blocked pull so it observes the deletion.
                queue.notify.notify_one();
                log::debug!("[memory] deleted subscription {name}");
                Ok(())
            }
            None => Err(not_found(ResourceKind::Subscription, name)),
        }
    }

    async fn subscription_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock().subscriptions.contains_key(name))
    }

    async fn publish(
        &self,
        topic: &str,
        data: Vec<u8>,
        attributes: BTreeMap<String, String>,
    ) -> Result<String> {
        let message_id = self.next_id().to_string();
        let publish_time = Utc::now();

        let mut broker = self.lock();
        if !broker.topics.contains(topic) {
            return Err(not_found(ResourceKind::Topic, topic));
        }
        for queue in broker
            .subscriptions
            .values_mut()
            .filter(|q| q.topic == topic)
        {
            queue.pending.push_back(PulledMessage {
                ack_id: format!("ack-{}", self.next_id()),
                message_id: message_id.clone(),
                data: data.clone(),
                attributes: attributes.clone(),
                publish_time,
                delivery_attempt: 1,
            });
            queue.notify.notify_one();
        }

        log::debug!("[memory] published {message_id} to {topic}");
        Ok(message_id)
    }

    async fn pull(&self, subscription: &str, max_messages: usize) -> Result<Vec<PulledMessage>> {
        loop {
            let notify = {
                let mut broker = self.lock();
                let queue = broker
                    .subscriptions
                    .get_mut(subscription)
                    .ok_or_else(|| not_found(ResourceKind::Subscription, subscription))?;

                if !queue.pending.is_empty() {
                    let take = max_messages.max(1).min(queue.pending.len());
                    let batch: Vec<PulledMessage> = queue.pending.drain(..take).collect();
                    for msg in &batch {
                        queue.outstanding.insert(msg.ack_id.clone(), msg.clone());
                    }
                    return Ok(batch);
                }
                queue.notify.clone()
            };
            notify.notified().await;
        }
    }

    async fn acknowledge(&self, subscription: &str, ack_ids: &[String]) -> Result<()> {
        let mut broker = self.lock();
        let queue = broker
            .subscriptions
            .get_mut(subscription)
            .ok_or_else(|| not_found(ResourceKind::Subscription, subscription))?;
        for id in ack_ids {
            queue.outstanding.remove(id);
        }
        Ok(())
    }

    async fn modify_ack_deadline(
        &self,
        subscription: &str,
        ack_ids: &[String],
        seconds: u32,
    ) -> Result<()> {
        if seconds > 0 {
            return Ok(());
        }

        let mut broker = self.lock();
        let queue = broker
            .subscriptions
            .get_mut(subscription)
            .ok_or_else(|| not_found(ResourceKind::Subscription, subscription))?;

        let mut redeliver = false;
        for id in ack_ids.iter().rev() {
            if let Some(mut msg) = queue.outstanding.remove(id) {
                msg.delivery_attempt += 1;
                msg.ack_id = format!("ack-{}", self.next_id());
                queue.pending.push_front(msg);
                redeliver = true;
            }
        }
        if redeliver {
            queue.notify.notify_one();
        }
        Ok(())
    }
}
