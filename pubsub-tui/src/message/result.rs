//! Task outcomes

use std::fmt;
use std::path::PathBuf;

use pubsub_tui_client::{
    HandleId, PubSubError, ReceivedMessage, StreamExit, StreamItem, SubscriptionInfo, TopicInfo,
};

use crate::backend::TemplateFile;

/// What a task was doing, for cancellation and failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    LoadTopics,
    CreateTopic,
    DeleteTopic,
    LoadSubscriptions,
    CreateSubscription,
    DeleteSubscription,
    Publish,
    LoadTemplates,
    ReadTemplate,
    RunStream,
    PollStream,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LoadTopics => "Loading topics",
            Self::CreateTopic => "Creating topic",
            Self::DeleteTopic => "Deleting topic",
            Self::LoadSubscriptions => "Loading subscriptions",
            Self::CreateSubscription => "Creating subscription",
            Self::DeleteSubscription => "Deleting subscription",
            Self::Publish => "Publishing",
            Self::LoadTemplates => "Loading templates",
            Self::ReadTemplate => "Reading template",
            Self::RunStream => "Streaming",
            Self::PollStream => "Receiving",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
pub enum TopicResult {
    Listed(Result<Vec<TopicInfo>, PubSubError>),
    Created {
        name: String,
        result: Result<(), PubSubError>,
    },
    Deleted {
        name: String,
        result: Result<(), PubSubError>,
    },
}

#[derive(Debug)]
pub enum SubscriptionResult {
    Listed(Result<Vec<SubscriptionInfo>, PubSubError>),
    Created {
        name: String,
        result: Result<(), PubSubError>,
    },
    Deleted {
        name: String,
        result: Result<(), PubSubError>,
    },
}

/// File-system results carry the error text; `io::Error` is not `Clone`.
#[derive(Debug)]
pub enum TemplateResult {
    Listed(Result<Vec<TemplateFile>, String>),
    Loaded {
        path: PathBuf,
        result: Result<String, String>,
    },
}

#[derive(Debug)]
pub enum StreamEvent {
    Delivery(ReceivedMessage),
    Error(PubSubError),
    /// Both queues drained and closed: the stream is over.
    Closed,
    Cancelled,
    /// The relay worker finished.
    WorkerExited(StreamExit),
    /// A stream task panicked or was aborted.
    Failed(String),
}

impl From<StreamItem> for StreamEvent {
    fn from(item: StreamItem) -> Self {
        match item {
            StreamItem::Delivery(msg) => Self::Delivery(msg),
            StreamItem::Error(err) => Self::Error(err),
            StreamItem::Closed => Self::Closed,
            StreamItem::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug)]
pub enum TaskResult {
    Topics(TopicResult),
    Subscriptions(SubscriptionResult),
    Published(Result<String, PubSubError>),
    Templates(TemplateResult),
    Stream { handle: HandleId, event: StreamEvent },
    /// Cancelled before completion.
    Cancelled(TaskKind),
    /// Panicked or was aborted. Stream tasks report this as
    /// [`StreamEvent::Failed`] instead.
    Failed { task: TaskKind, detail: String },
}
