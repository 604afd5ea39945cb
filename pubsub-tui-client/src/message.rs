//! Delivered messages and their acknowledgment state

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::types::PulledMessage;

/// Acknowledge/reject capabilities bound to one delivery.
///
/// Implementations must not block: the streaming connection hands the
/// request off and performs the network call elsewhere.
pub trait AckReply: Send + Sync {
    fn ack(&self);
    fn nack(&self);
}

/// Lifecycle of a delivered message. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStatus {
    Pending,
    Acknowledged,
}

impl AckStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Acknowledged => "Acknowledged",
        }
    }
}

/// Per-message guarded acknowledgment state.
pub struct AckState {
    acked: Mutex<bool>,
    reply: Box<dyn AckReply>,
}

impl AckState {
    pub fn new(reply: impl AckReply + 'static) -> Self {
        Self {
            acked: Mutex::new(false),
            reply: Box::new(reply),
        }
    }

    /// Acknowledges the message if it is still pending.
    ///
    /// Returns `true` if this call performed the transition. The bound
    /// capability runs at most once for the lifetime of the message, no
    /// matter how many callers race here.
    pub fn acknowledge(&self) -> bool {
        let mut acked = self.acked.lock().unwrap_or_else(PoisonError::into_inner);
        if *acked {
            return false;
        }
        self.reply.ack();
        *acked = true;
        true
    }

    /// Rejects the message if it is still pending.
    ///
    /// Returns `true` if the reject capability was invoked. The state stays
    /// `Pending`; whether the message comes back is up to the service.
    pub fn reject(&self) -> bool {
        let acked = self.acked.lock().unwrap_or_else(PoisonError::into_inner);
        if *acked {
            return false;
        }
        self.reply.nack();
        true
    }

    pub fn status(&self) -> AckStatus {
        if *self.acked.lock().unwrap_or_else(PoisonError::into_inner) {
            AckStatus::Acknowledged
        } else {
            AckStatus::Pending
        }
    }
}

impl std::fmt::Debug for AckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AckState")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// A message delivered by a subscription stream.
///
/// Clones share the same [`AckState`].
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub id: String,
    pub data: Vec<u8>,
    pub attributes: BTreeMap<String, String>,
    pub publish_time: DateTime<Utc>,
    pub delivery_attempt: u32,
    ack: Arc<AckState>,
}

impl ReceivedMessage {
    pub fn new(
        id: impl Into<String>,
        data: impl Into<Vec<u8>>,
        attributes: BTreeMap<String, String>,
        publish_time: DateTime<Utc>,
        reply: impl AckReply + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            attributes,
            publish_time,
            delivery_attempt: 1,
            ack: Arc::new(AckState::new(reply)),
        }
    }

    /// Binds capabilities to a raw pulled message.
    pub fn from_pulled(pulled: PulledMessage, reply: impl AckReply + 'static) -> Self {
        Self {
            id: pulled.message_id,
            data: pulled.data,
            attributes: pulled.attributes,
            publish_time: pulled.publish_time,
            delivery_attempt: pulled.delivery_attempt,
            ack: Arc::new(AckState::new(reply)),
        }
    }

    pub fn acknowledge(&self) -> bool {
        self.ack.acknowledge()
    }

    pub fn reject(&self) -> bool {
        self.ack.reject()
    }

    pub fn status(&self) -> AckStatus {
        self.ack.status()
    }

    pub fn is_acknowledged(&self) -> bool {
        self.status() == AckStatus::Acknowledged
    }

    /// Payload as text, lossy for non-UTF-8 data.
    pub fn data_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// First 8 characters of the id, for compact display.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counts {
        acks: AtomicUsize,
        nacks: AtomicUsize,
    }

    struct CountingReply(Arc<Counts>);

    impl AckReply for CountingReply {
        fn ack(&self) {
            self.0.acks.fetch_add(1, Ordering::SeqCst);
        }
        fn nack(&self) {
            self.0.nacks.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn message(id: &str) -> (ReceivedMessage, Arc<Counts>) {
        let counts = Arc::new(Counts::default());
        let msg = ReceivedMessage::new(
            id,
            b"{}".to_vec(),
            BTreeMap::new(),
            Utc::now(),
            CountingReply(counts.clone()),
        );
        (msg, counts)
    }

    #[test]
    fn acknowledge_is_idempotent() {
        let (msg, counts) = message("m1");
        assert_eq!(msg.status(), AckStatus::Pending);

        assert!(msg.acknowledge());
        assert_eq!(msg.status(), AckStatus::Acknowledged);
        assert!(!msg.acknowledge());

        assert_eq!(counts.acks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reject_is_ignored_after_acknowledge() {
        let (msg, counts) = message("m1");
        msg.acknowledge();

        assert!(!msg.reject());
        assert_eq!(counts.nacks.load(Ordering::SeqCst), 0);
        assert_eq!(msg.status(), AckStatus::Acknowledged);
    }

    #[test]
    fn reject_leaves_message_pending() {
        let (msg, counts) = message("m1");

        assert!(msg.reject());
        assert_eq!(msg.status(), AckStatus::Pending);
        assert_eq!(counts.nacks.load(Ordering::SeqCst), 1);

        // A later acknowledge still goes through.
        assert!(msg.acknowledge());
        assert_eq!(counts.acks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_state() {
        let (msg, counts) = message("m1");
        let copy = msg.clone();

        assert!(copy.acknowledge());
        assert!(msg.is_acknowledged());
        assert!(!msg.acknowledge());
        assert_eq!(counts.acks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mixed_sequences_ack_at_most_once() {
        let (msg, counts) = message("m1");
        for step in [true, false, true, true, false, false, true] {
            if step {
                msg.acknowledge();
            } else {
                msg.reject();
            }
        }
        assert_eq!(counts.acks.load(Ordering::SeqCst), 1);
        // Every reject arrived after the acknowledge.
        assert_eq!(counts.nacks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn concurrent_acknowledge_changes_exactly_once() {
        let (msg, counts) = message("m1");
        let threads: Vec<_> = (0..16)
            .map(|_| {
                let msg = msg.clone();
                std::thread::spawn(move || msg.acknowledge())
            })
            .collect();

        let changed = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|changed| *changed)
            .count();

        assert_eq!(changed, 1);
        assert_eq!(counts.acks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn short_id_truncates_to_eight_chars() {
        let (msg, _) = message("1234567890abc");
        assert_eq!(msg.short_id(), "12345678");
        let (msg, _) = message("m1");
        assert_eq!(msg.short_id(), "m1");
    }
}
