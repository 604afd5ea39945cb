//! # pubsub-tui-client
//!
//! Client side of the Pub/Sub terminal UI: a uniform [`PubSubClient`] over
//! the real service (or its emulator) and an in-process broker, plus the
//! pieces that turn a subscription into a stream of individually
//! acknowledgeable messages.
//!
//! ## Implementations
//!
//! | Client | Use |
//! |--------|-----|
//! | [`RestPubSub`] | Cloud Pub/Sub REST v1, or the emulator via [`Endpoint::Emulator`] |
//! | [`InMemoryPubSub`] | Tests and offline demos |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pubsub_tui_client::{
//!     InMemoryPubSub, PubSubClient, ReceiveSettings, StreamItem, SubscriptionHandle,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() {
//! let client: Arc<dyn PubSubClient> = Arc::new(InMemoryPubSub::new("demo"));
//! let scope = CancellationToken::new();
//!
//! let mut handle = SubscriptionHandle::new("orders-sub", ReceiveSettings::default());
//! let worker = handle.start(&scope).expect("fresh handle");
//! let poller = handle.poller().expect("started");
//! tokio::spawn(worker.run(client));
//!
//! if let StreamItem::Delivery(msg) = poller.next().await {
//!     msg.acknowledge();
//! }
//! handle.stop();
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`] with [`PubSubError`]. Use
//! [`PubSubError::kind`] for the coarse class shown to users and
//! [`PubSubError::is_expected`] to pick a log level.

mod error;
mod factory;
mod message;
mod providers;
mod streamer;
mod traits;
mod types;
mod validation;

pub use error::{ErrorKind, PubSubError, ResourceKind, Result};
pub use factory::{create_client, ClientConfig};
pub use message::{AckReply, AckState, AckStatus, ReceivedMessage};
pub use providers::{create_http_client, Endpoint, InMemoryPubSub, RestPubSub};
pub use streamer::{
    HandleId, StreamExit, StreamItem, StreamPoller, StreamState, StreamWorker, SubscriptionHandle,
};
pub use traits::PubSubClient;
pub use types::{
    PulledMessage, ReceiveSettings, SubscriptionInfo, TopicInfo, DEFAULT_MAX_OUTSTANDING_BYTES,
    DEFAULT_MAX_OUTSTANDING_MESSAGES, DELETED_TOPIC,
};
pub use validation::{extract_name, subscription_path, topic_path, validate_resource_id};
