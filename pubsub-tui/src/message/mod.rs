//!
//! src/message/mod.rs
//! Message layer: everything the dispatcher can be told
//!
//! A message is pure data. It describes something that happened (a key
//! press, a resize, a finished API call) and never does anything itself.
//! The update layer is the only consumer.
//!
//!
//! Module structure:
//!     src/message/mod.rs
//!         mod result;     // outcomes of asynchronous tasks
//!         mod region;     // intents produced by a region's local key handling
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 1. AppMessage
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     The closed set of events fed to update::update():
//!
//!         AppMessage::Input(KeyEvent)          // keyboard, from the input thread
//!         AppMessage::Resize { width, height } // terminal resized
//!         AppMessage::Tick                     // periodic, drives spinners
//!         AppMessage::Result(TaskResult)       // one per finished Task
//!         AppMessage::Noop                     // terminal events we ignore
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 2. TaskResult
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     Each Task yields exactly one TaskResult. Stream results carry the
//!     HandleId of the stream that produced them; the dispatcher drops any
//!     whose id no longer matches the active stream.
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 3. Region actions
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     A focused region interprets its own keys and, when the key means
//!     something beyond the region, returns an action:
//!
//!         Topics         → TopicAction::Select("orders")
//!             ↓
//!         update/topics.rs fans the selection out to the sibling regions
//!

mod region;
mod result;

use crossterm::event::KeyEvent;

pub use region::{PublisherAction, SubscriberAction, SubscriptionAction, TopicAction};
pub use result::{
    StreamEvent, SubscriptionResult, TaskKind, TaskResult, TemplateResult, TopicResult,
};

/// Event delivered to the dispatcher
#[derive(Debug)]
pub enum AppMessage {
    /// Key press
    Input(KeyEvent),

    /// Terminal resized
    Resize { width: u16, height: u16 },

    /// Periodic tick
    Tick,

    /// A task finished
    Result(TaskResult),

    /// Nothing to do
    Noop,
}

impl From<TaskResult> for AppMessage {
    fn from(result: TaskResult) -> Self {
        Self::Result(result)
    }
}
