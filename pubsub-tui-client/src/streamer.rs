//! Subscription streaming
//!
//! A [`SubscriptionHandle`] owns one streaming connection. Starting it yields
//! a [`StreamWorker`] (the producer: pulls from the service and relays into a
//! bounded queue) and makes a [`StreamPoller`] available (the consumer:
//! receives exactly one item per call). Both are meant to run inside
//! independently scheduled tasks; the handle itself never blocks.
//!
//! Messages still sitting in the queue when a stream ends are rejected, so
//! the service redelivers them instead of waiting out their ack deadline.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, Notify};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::PubSubError;
use crate::message::{AckReply, ReceivedMessage};
use crate::traits::PubSubClient;
use crate::types::{PulledMessage, ReceiveSettings};

/// Capacity of the error queue.
const ERROR_QUEUE_CAPACITY: usize = 10;
/// Pause between pulls that returned nothing.
const IDLE_PULL_DELAY: Duration = Duration::from_millis(500);
/// Ack deadline that makes the service redeliver immediately.
const REJECT_DEADLINE_SECS: u32 = 0;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`SubscriptionHandle`].
///
/// Events produced for a stream carry it so a consumer can tell a live
/// stream's events from leftovers of one it already stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    fn next() -> Self {
        Self(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StreamState {
    Idle = 0,
    Starting = 1,
    Running = 2,
    Stopped = 3,
}

impl StreamState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Starting,
            2 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

/// State shared between a handle and its worker.
#[derive(Debug, Clone)]
struct Phase(Arc<AtomicU8>);

impl Phase {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(StreamState::Idle as u8)))
    }

    fn get(&self) -> StreamState {
        StreamState::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: StreamState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }

    fn advance(&self, from: StreamState, to: StreamState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Payload bytes waiting in the delivery queue.
#[derive(Debug, Default)]
struct ByteBudget {
    queued: AtomicUsize,
    freed: Notify,
}

impl ByteBudget {
    /// An empty queue always has room, so one oversized message can pass.
    fn has_room(&self, size: usize, limit: usize) -> bool {
        let queued = self.queued();
        queued == 0 || queued.saturating_add(size) <= limit
    }

    fn take(&self, size: usize) {
        self.queued.fetch_add(size, Ordering::SeqCst);
    }

    fn release(&self, size: usize) {
        let _ = self
            .queued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |q| {
                Some(q.saturating_sub(size))
            });
        self.freed.notify_one();
    }

    fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }
}

/// One item received from a stream.
#[derive(Debug)]
pub enum StreamItem {
    Delivery(ReceivedMessage),
    /// Non-fatal for the consumer; the stream may still have items queued.
    Error(PubSubError),
    /// Both queues are drained and the producer is gone.
    Closed,
    /// The stream's token was cancelled while waiting.
    Cancelled,
}

/// Why a [`StreamWorker`] stopped relaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamExit {
    Cancelled,
    Failed(PubSubError),
    /// Every receiver was dropped.
    ConsumerGone,
}

#[derive(Debug)]
struct StreamReceivers {
    messages: mpsc::Receiver<ReceivedMessage>,
    errors: mpsc::Receiver<PubSubError>,
    budget: Arc<ByteBudget>,
}

impl StreamReceivers {
    fn recv_delivered(&self, msg: ReceivedMessage) -> StreamItem {
        self.budget.release(msg.data.len());
        StreamItem::Delivery(msg)
    }

    /// Closes the delivery queue and rejects every message still in it.
    fn reject_queued(&mut self) -> usize {
        self.messages.close();
        let mut rejected = 0;
        while let Ok(msg) = self.messages.try_recv() {
            self.budget.release(msg.data.len());
            if msg.reject() {
                rejected += 1;
            }
        }
        rejected
    }
}

impl Drop for StreamReceivers {
    fn drop(&mut self) {
        let rejected = self.reject_queued();
        if rejected > 0 {
            log::debug!("rejected {rejected} queued message(s) on close");
        }
    }
}

/// The live resource representing one subscription stream.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: HandleId,
    subscription: String,
    settings: ReceiveSettings,
    phase: Phase,
    tracker: TaskTracker,
    token: Option<CancellationToken>,
    receivers: Option<Arc<Mutex<StreamReceivers>>>,
}

impl SubscriptionHandle {
    pub fn new(subscription: impl Into<String>, settings: ReceiveSettings) -> Self {
        Self {
            id: HandleId::next(),
            subscription: subscription.into(),
            settings,
            phase: Phase::new(),
            tracker: TaskTracker::new(),
            token: None,
            receivers: None,
        }
    }

    /// Spawns the stream's ack flusher on `tracker`, so a caller can wait
    /// for pending acks and rejects before exiting.
    #[must_use]
    pub fn with_tracker(mut self, tracker: TaskTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    pub fn state(&self) -> StreamState {
        self.phase.get()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state(), StreamState::Starting | StreamState::Running)
    }

    /// Moves an idle handle to `Starting` and returns the relay worker.
    ///
    /// The stream's token is a child of `scope`, so cancelling the scope
    /// stops it too. Cancelling the scope also makes the ack flusher send
    /// what it has queued and exit. Returns `None` if the handle was
    /// already started.
    pub fn start(&mut self, scope: &CancellationToken) -> Option<StreamWorker> {
        if self.state() != StreamState::Idle {
            return None;
        }

        let capacity = self.settings.max_outstanding_messages.max(1);
        let (messages_tx, messages_rx) = mpsc::channel(capacity);
        let (errors_tx, errors_rx) = mpsc::channel(ERROR_QUEUE_CAPACITY);
        let budget = Arc::new(ByteBudget::default());
        let token = scope.child_token();

        self.token = Some(token.clone());
        self.receivers = Some(Arc::new(Mutex::new(StreamReceivers {
            messages: messages_rx,
            errors: errors_rx,
            budget: budget.clone(),
        })));
        self.phase.set(StreamState::Starting);
        log::info!("[stream {}] starting '{}'", self.id, self.subscription);

        Some(StreamWorker {
            id: self.id,
            subscription: self.subscription.clone(),
            settings: self.settings,
            phase: self.phase.clone(),
            scope: scope.clone(),
            tracker: self.tracker.clone(),
            token,
            budget,
            messages: messages_tx,
            errors: errors_tx,
        })
    }

    /// Cancels the connection and marks the handle stopped.
    ///
    /// Returns `true` if this call cancelled the stream's token. The token is
    /// released on the first call, so cancellation happens at most once.
    /// Messages queued but never polled are rejected.
    pub fn stop(&mut self) -> bool {
        self.phase.set(StreamState::Stopped);
        let Some(token) = self.token.take() else {
            return false;
        };
        token.cancel();

        if let Some(receivers) = self.receivers.take() {
            // A poller holding the lock drains on its way out.
            if let Ok(mut receivers) = receivers.try_lock() {
                let rejected = receivers.reject_queued();
                if rejected > 0 {
                    log::info!("[stream {}] returned {rejected} queued message(s)", self.id);
                }
            }
        }
        log::info!("[stream {}] stopped '{}'", self.id, self.subscription);
        true
    }

    /// Consumer side of the stream, available once started.
    pub fn poller(&self) -> Option<StreamPoller> {
        Some(StreamPoller {
            id: self.id,
            token: self.token.clone()?,
            receivers: self.receivers.clone()?,
        })
    }

    /// Token of a started, not yet stopped stream.
    pub fn token(&self) -> Option<&CancellationToken> {
        self.token.as_ref()
    }
}

/// Receives one item at a time from a started stream.
#[derive(Debug, Clone)]
pub struct StreamPoller {
    id: HandleId,
    token: CancellationToken,
    receivers: Arc<Mutex<StreamReceivers>>,
}

impl StreamPoller {
    pub fn handle_id(&self) -> HandleId {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Waits for the next delivery or error.
    ///
    /// Deliveries are preferred over errors, and cancellation over both.
    pub async fn next(&self) -> StreamItem {
        let mut guard = tokio::select! {
            biased;
            () = self.token.cancelled() => {
                if let Ok(mut receivers) = self.receivers.try_lock() {
                    receivers.reject_queued();
                }
                return StreamItem::Cancelled;
            }
            guard = self.receivers.lock() => guard,
        };
        let receivers = &mut *guard;

        let mut messages_open = true;
        let mut errors_open = true;
        loop {
            if !messages_open && !errors_open {
                return StreamItem::Closed;
            }
            tokio::select! {
                biased;
                () = self.token.cancelled() => {
                    receivers.reject_queued();
                    return StreamItem::Cancelled;
                }
                msg = receivers.messages.recv(), if messages_open => match msg {
                    Some(msg) => return receivers.recv_delivered(msg),
                    None => messages_open = false,
                },
                err = receivers.errors.recv(), if errors_open => match err {
                    Some(err) => return StreamItem::Error(err),
                    None => errors_open = false,
                },
            }
        }
    }
}

/// Producer side of a started stream.
#[derive(Debug)]
pub struct StreamWorker {
    id: HandleId,
    subscription: String,
    settings: ReceiveSettings,
    phase: Phase,
    scope: CancellationToken,
    tracker: TaskTracker,
    token: CancellationToken,
    budget: Arc<ByteBudget>,
    messages: mpsc::Sender<ReceivedMessage>,
    errors: mpsc::Sender<PubSubError>,
}

impl StreamWorker {
    pub fn handle_id(&self) -> HandleId {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Pulls from the service and relays deliveries until cancelled or failed.
    ///
    /// Pulling waits until the queue has a free slot and room for more
    /// payload bytes, so undelivered messages stay with the service. A pull
    /// failure is terminal: it is queued as [`PubSubError::StreamTerminal`]
    /// and the worker exits, closing both queues.
    pub async fn run(self, client: Arc<dyn PubSubClient>) -> StreamExit {
        let Self {
            id,
            subscription,
            settings,
            phase,
            scope,
            tracker,
            token,
            budget,
            messages,
            errors,
        } = self;

        if !phase.advance(StreamState::Starting, StreamState::Running) {
            return StreamExit::Cancelled;
        }
        log::info!("[stream {id}] receiving from '{subscription}'");

        let acks = spawn_ack_flusher(&tracker, scope, client.clone(), subscription.clone());
        let max = settings.max_outstanding_messages.max(1);
        let max_bytes = settings.max_outstanding_bytes.max(1);

        let exit = 'relay: loop {
            if messages.capacity() == 0 {
                let slot = tokio::select! {
                    biased;
                    () = token.cancelled() => break 'relay StreamExit::Cancelled,
                    slot = messages.reserve() => slot,
                };
                // The permit is dropped again; only this worker sends, so the slot stays free.
                if slot.is_err() {
                    break 'relay StreamExit::ConsumerGone;
                }
            }
            if !budget.has_room(1, max_bytes) {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break 'relay StreamExit::Cancelled,
                    () = budget.freed.notified() => continue 'relay,
                }
            }

            let room = messages.capacity().min(max);
            let pulled = tokio::select! {
                biased;
                () = token.cancelled() => break 'relay StreamExit::Cancelled,
                pulled = client.pull(&subscription, room) => pulled,
            };

            let batch = match pulled {
                Ok(batch) => batch,
                Err(err) => {
                    let terminal = PubSubError::StreamTerminal {
                        subscription: subscription.clone(),
                        detail: err.to_string(),
                    };
                    log::error!("[stream {id}] {terminal}");
                    phase.set(StreamState::Stopped);
                    if errors.try_send(terminal.clone()).is_err() {
                        log::warn!("[stream {id}] error queue full, dropping terminal error");
                    }
                    break 'relay StreamExit::Failed(terminal);
                }
            };

            if batch.is_empty() {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break 'relay StreamExit::Cancelled,
                    () = tokio::time::sleep(IDLE_PULL_DELAY) => continue 'relay,
                }
            }
            log::debug!("[stream {id}] pulled {} message(s)", batch.len());

            let mut batch = VecDeque::from(batch);
            while let Some(pulled) = batch.pop_front() {
                let reply = ChannelReply {
                    ack_id: pulled.ack_id.clone(),
                    tx: acks.clone(),
                };
                let msg = ReceivedMessage::from_pulled(pulled, reply);
                let size = msg.data.len();

                let admitted = loop {
                    if budget.has_room(size, max_bytes) {
                        break true;
                    }
                    tokio::select! {
                        biased;
                        () = token.cancelled() => break false,
                        () = budget.freed.notified() => {}
                    }
                };
                let permit = if admitted {
                    tokio::select! {
                        biased;
                        () = token.cancelled() => None,
                        permit = messages.reserve() => Some(permit),
                    }
                } else {
                    None
                };

                match permit {
                    Some(Ok(permit)) => {
                        budget.take(size);
                        permit.send(msg);
                    }
                    Some(Err(_)) => {
                        msg.reject();
                        reject_remaining(&acks, batch.drain(..));
                        break 'relay StreamExit::ConsumerGone;
                    }
                    None => {
                        msg.reject();
                        reject_remaining(&acks, batch.drain(..));
                        break 'relay StreamExit::Cancelled;
                    }
                }
            }
        };

        phase.set(StreamState::Stopped);
        log::info!("[stream {id}] relay for '{subscription}' exited: {exit:?}");
        exit
    }
}

fn reject_remaining(
    acks: &mpsc::UnboundedSender<AckCommand>,
    rest: impl Iterator<Item = PulledMessage>,
) {
    for pulled in rest {
        let _ = acks.send(AckCommand::Nack(pulled.ack_id));
    }
}

#[derive(Debug)]
enum AckCommand {
    Ack(String),
    Nack(String),
}

/// Capability pair handed to each delivery; forwards to the ack flusher.
struct ChannelReply {
    ack_id: String,
    tx: mpsc::UnboundedSender<AckCommand>,
}

impl AckReply for ChannelReply {
    fn ack(&self) {
        if self.tx.send(AckCommand::Ack(self.ack_id.clone())).is_err() {
            log::warn!("ack for {} dropped: flusher gone", self.ack_id);
        }
    }

    fn nack(&self) {
        if self.tx.send(AckCommand::Nack(self.ack_id.clone())).is_err() {
            log::warn!("nack for {} dropped: flusher gone", self.ack_id);
        }
    }
}

/// Sends acks and rejects to the service in batches.
///
/// Lives as long as any delivery still holds a capability, so messages kept
/// on screen can be acknowledged after their stream stopped. Cancelling
/// `scope` flushes whatever is already queued and ends it.
fn spawn_ack_flusher(
    tracker: &TaskTracker,
    scope: CancellationToken,
    client: Arc<dyn PubSubClient>,
    subscription: String,
) -> mpsc::UnboundedSender<AckCommand> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AckCommand>();

    tracker.spawn(async move {
        loop {
            let first = tokio::select! {
                biased;
                cmd = rx.recv() => match cmd {
                    Some(cmd) => cmd,
                    None => break,
                },
                () = scope.cancelled() => {
                    rx.close();
                    let (ack_ids, nack_ids) = collect_batch(&mut rx, None);
                    flush(client.as_ref(), &subscription, &ack_ids, &nack_ids).await;
                    break;
                }
            };
            let (ack_ids, nack_ids) = collect_batch(&mut rx, Some(first));
            flush(client.as_ref(), &subscription, &ack_ids, &nack_ids).await;
        }
        log::debug!("ack flusher for '{subscription}' finished");
    });

    tx
}

/// Takes `first` plus everything already queued, split into acks and rejects.
fn collect_batch(
    rx: &mut mpsc::UnboundedReceiver<AckCommand>,
    first: Option<AckCommand>,
) -> (Vec<String>, Vec<String>) {
    let mut ack_ids = Vec::new();
    let mut nack_ids = Vec::new();
    let mut next = first.or_else(|| rx.try_recv().ok());
    while let Some(cmd) = next {
        match cmd {
            AckCommand::Ack(id) => ack_ids.push(id),
            AckCommand::Nack(id) => nack_ids.push(id),
        }
        next = rx.try_recv().ok();
    }
    (ack_ids, nack_ids)
}

async fn flush(
    client: &dyn PubSubClient,
    subscription: &str,
    ack_ids: &[String],
    nack_ids: &[String],
) {
    if !ack_ids.is_empty() {
        if let Err(e) = client.acknowledge(subscription, ack_ids).await {
            log_flush_failure("acknowledge", subscription, &e);
        }
    }
    if !nack_ids.is_empty() {
        if let Err(e) = client
            .modify_ack_deadline(subscription, nack_ids, REJECT_DEADLINE_SECS)
            .await
        {
            log_flush_failure("reject", subscription, &e);
        }
    }
}

fn log_flush_failure(op: &str, subscription: &str, e: &PubSubError) {
    if e.is_expected() {
        log::warn!("{op} on '{subscription}' failed: {e}");
    } else {
        log::error!("{op} on '{subscription}' failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::providers::InMemoryPubSub;

    fn queued_message(
        id: &str,
        ack_id: &str,
        tx: &mpsc::UnboundedSender<AckCommand>,
    ) -> ReceivedMessage {
        ReceivedMessage::new(
            id,
            b"{}".to_vec(),
            BTreeMap::new(),
            chrono::Utc::now(),
            ChannelReply {
                ack_id: ack_id.to_string(),
                tx: tx.clone(),
            },
        )
    }

    async fn eventually(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[test]
    fn new_handle_is_idle() {
        let handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        assert_eq!(handle.state(), StreamState::Idle);
        assert!(!handle.is_running());
        assert!(handle.poller().is_none());
    }

    #[test]
    fn handle_ids_are_unique() {
        let a = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        let b = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn start_moves_to_starting_once() {
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());

        let worker = handle.start(&scope);
        assert!(worker.is_some());
        assert_eq!(handle.state(), StreamState::Starting);
        assert!(handle.is_running());
        assert!(handle.start(&scope).is_none());
    }

    #[tokio::test]
    async fn stop_cancels_exactly_once() {
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        let worker = handle.start(&scope).unwrap();

        assert!(handle.stop());
        assert!(worker.token().is_cancelled());
        assert!(!handle.is_running());
        assert_eq!(handle.state(), StreamState::Stopped);

        assert!(!handle.stop());
        assert!(!scope.is_cancelled());
    }

    #[tokio::test]
    async fn cancelling_scope_cancels_stream() {
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        let worker = handle.start(&scope).unwrap();
        let poller = handle.poller().unwrap();

        scope.cancel();

        assert!(worker.token().is_cancelled());
        assert!(matches!(poller.next().await, StreamItem::Cancelled));
    }

    #[tokio::test]
    async fn poller_reports_closed_when_worker_dropped() {
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        let worker = handle.start(&scope).unwrap();
        let poller = handle.poller().unwrap();

        drop(worker);

        assert!(matches!(poller.next().await, StreamItem::Closed));
    }

    #[tokio::test]
    async fn poller_prefers_deliveries_over_errors() {
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        let worker = handle.start(&scope).unwrap();
        let poller = handle.poller().unwrap();

        worker
            .errors
            .try_send(PubSubError::transport("boom"))
            .unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        worker.messages.try_send(queued_message("m1", "a1", &tx)).unwrap();

        assert!(matches!(poller.next().await, StreamItem::Delivery(m) if m.id == "m1"));
        assert!(matches!(poller.next().await, StreamItem::Error(_)));
    }

    #[tokio::test]
    async fn stop_rejects_messages_nobody_polled() {
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        let worker = handle.start(&scope).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        worker.messages.try_send(queued_message("m1", "a1", &tx)).unwrap();
        worker.messages.try_send(queued_message("m2", "a2", &tx)).unwrap();

        assert!(handle.stop());

        let mut rejected = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            match cmd {
                AckCommand::Nack(id) => rejected.push(id),
                AckCommand::Ack(id) => panic!("unexpected ack for {id}"),
            }
        }
        assert_eq!(rejected, ["a1", "a2"]);
        assert!(worker.messages.is_closed());
    }

    #[tokio::test]
    async fn cancelled_poll_rejects_what_is_left() {
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("sub-a", ReceiveSettings::default());
        let worker = handle.start(&scope).unwrap();
        let poller = handle.poller().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        worker.messages.try_send(queued_message("m1", "a1", &tx)).unwrap();

        // Holding the queue lock makes the stop leave the draining to the poller.
        let guard = poller.receivers.lock().await;
        assert!(handle.stop());
        assert!(rx.try_recv().is_err());
        drop(guard);

        assert!(matches!(poller.next().await, StreamItem::Cancelled));
        assert!(matches!(rx.try_recv(), Ok(AckCommand::Nack(id)) if id == "a1"));
    }

    #[test]
    fn byte_budget_lets_one_oversized_message_through() {
        let budget = ByteBudget::default();
        assert!(budget.has_room(64, 10));

        budget.take(64);
        assert!(!budget.has_room(1, 10));

        budget.release(64);
        assert_eq!(budget.queued(), 0);
        assert!(budget.has_room(4, 10));
    }

    #[tokio::test]
    async fn queued_bytes_stay_within_the_bound() {
        let broker = Arc::new(InMemoryPubSub::new("test"));
        broker.create_topic("orders").await.unwrap();
        broker.create_subscription("orders-sub", "orders").await.unwrap();
        for _ in 0..5 {
            broker
                .publish("orders", b"abcd".to_vec(), BTreeMap::new())
                .await
                .unwrap();
        }

        let settings = ReceiveSettings {
            max_outstanding_bytes: 10,
            ..ReceiveSettings::default()
        };
        let scope = CancellationToken::new();
        let mut handle = SubscriptionHandle::new("orders-sub", settings);
        let worker = handle.start(&scope).unwrap();
        let poller = handle.poller().unwrap();
        let budget = worker.budget.clone();
        let client: Arc<dyn PubSubClient> = broker.clone();
        tokio::spawn(worker.run(client));

        // Two 4-byte messages fit under 10 bytes; a third would not.
        eventually(|| budget.queued() == 8).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(budget.queued(), 8);

        let mut received = 0;
        while received < 5 {
            match tokio::time::timeout(Duration::from_secs(5), poller.next()).await {
                Ok(StreamItem::Delivery(msg)) => {
                    assert!(budget.queued() <= 10);
                    msg.acknowledge();
                    received += 1;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        handle.stop();
    }
}
