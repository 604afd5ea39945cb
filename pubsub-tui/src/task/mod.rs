//!
//! src/task/mod.rs
//! Task layer: side effects described as data
//!
//! update::update() never performs I/O. It returns `Vec<Task>`; the main
//! loop hands each one to the TaskExecutor, and every Task comes back as
//! exactly one AppMessage::Result.
//!
//!
//!     update(app, msg) ──▶ Vec<Task> ──▶ TaskExecutor::spawn(task)
//!            ▲                                    │
//!            │                                    ▼ tokio task
//!            └──────── AppMessage::Result ◀── execute(task, client)
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Cancellation
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     Stream tasks (RunStream, PollStream) carry their handle's token and
//!     observe it themselves; stopping a handle turns them into
//!     `WorkerExited(Cancelled)` / `Cancelled` results.
//!
//!     A stream task that panics comes back as `StreamEvent::Failed` tagged
//!     with its HandleId, so a failure of a replaced stream is dropped like
//!     any other stale event.
//!
//!     Every other task races a child of the executor's root token. On
//!     shutdown the in-flight call is aborted and the task reports
//!     `TaskResult::Cancelled(kind)`.
//!

mod executor;

use std::collections::BTreeMap;
use std::path::PathBuf;

use pubsub_tui_client::{HandleId, StreamPoller, StreamWorker};

use crate::message::TaskKind;

pub use executor::TaskExecutor;

#[derive(Debug)]
pub enum Task {
    LoadTopics,
    CreateTopic(String),
    DeleteTopic(String),
    LoadSubscriptions,
    CreateSubscription {
        name: String,
        topic: String,
    },
    DeleteSubscription(String),
    Publish {
        topic: String,
        payload: Vec<u8>,
        attributes: BTreeMap<String, String>,
    },
    /// List `*.json` in a directory.
    LoadTemplates(PathBuf),
    ReadTemplate(PathBuf),
    /// Relay loop of a freshly started stream.
    RunStream(StreamWorker),
    /// Wait for the stream's next item. Re-armed after every delivery.
    PollStream(StreamPoller),
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::LoadTopics => TaskKind::LoadTopics,
            Self::CreateTopic(_) => TaskKind::CreateTopic,
            Self::DeleteTopic(_) => TaskKind::DeleteTopic,
            Self::LoadSubscriptions => TaskKind::LoadSubscriptions,
            Self::CreateSubscription { .. } => TaskKind::CreateSubscription,
            Self::DeleteSubscription(_) => TaskKind::DeleteSubscription,
            Self::Publish { .. } => TaskKind::Publish,
            Self::LoadTemplates(_) => TaskKind::LoadTemplates,
            Self::ReadTemplate(_) => TaskKind::ReadTemplate,
            Self::RunStream(_) => TaskKind::RunStream,
            Self::PollStream(_) => TaskKind::PollStream,
        }
    }

    /// Handle a stream task belongs to.
    pub fn stream_handle(&self) -> Option<HandleId> {
        match self {
            Self::RunStream(worker) => Some(worker.handle_id()),
            Self::PollStream(poller) => Some(poller.handle_id()),
            _ => None,
        }
    }

    /// Stream tasks watch their own handle's token.
    pub fn observes_cancellation(&self) -> bool {
        matches!(self, Self::RunStream(_) | Self::PollStream(_))
    }
}
