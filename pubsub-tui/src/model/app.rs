//! Application state

use std::path::PathBuf;

use pubsub_tui_client::{ReceiveSettings, SubscriptionHandle};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::focus::FocusPanel;
use super::state::{
    ActivityLog, PublisherState, SubscriberState, SubscriptionsState, TopicsState,
};

/// Startup values resolved from CLI, environment and config file.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub project_id: String,
    pub emulator_host: Option<String>,
    pub templates_dir: PathBuf,
    pub auto_ack: bool,
    pub receive_settings: ReceiveSettings,
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub focus: FocusPanel,
    pub width: u16,
    pub height: u16,

    pub project_id: String,
    pub emulator_host: Option<String>,

    /// Topic every region is currently scoped to.
    pub selected_topic: Option<String>,

    /// At most one subscription stream exists at a time.
    pub stream: Option<SubscriptionHandle>,
    /// Parent of every stream token; cancelled on shutdown.
    pub stream_scope: CancellationToken,
    /// Ack flushers of every stream started so far.
    pub ack_flushers: TaskTracker,
    pub receive_settings: ReceiveSettings,

    pub ticks: u64,

    pub topics: TopicsState,
    pub subscriptions: SubscriptionsState,
    pub publisher: PublisherState,
    pub subscriber: SubscriberState,
    pub activity: ActivityLog,
}

impl App {
    pub fn new(options: AppOptions, stream_scope: CancellationToken) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            focus: FocusPanel::default(),
            width: 0,
            height: 0,
            project_id: options.project_id,
            emulator_host: options.emulator_host,
            selected_topic: None,
            stream: None,
            stream_scope,
            ack_flushers: TaskTracker::new(),
            receive_settings: options.receive_settings,
            ticks: 0,
            topics: TopicsState::new(),
            subscriptions: SubscriptionsState::new(),
            publisher: PublisherState::new(options.templates_dir),
            subscriber: SubscriberState::new(options.auto_ack),
            activity: ActivityLog::new(),
        }
    }

    /// Whether the focused region is capturing text, which disables the
    /// single-letter global keys.
    pub fn is_input_active(&self) -> bool {
        match self.focus {
            FocusPanel::Topics => self.topics.is_input_active(),
            FocusPanel::Subscriptions => self.subscriptions.is_input_active(),
            FocusPanel::Publisher => self.publisher.is_input_active(),
            FocusPanel::Subscriber => self.subscriber.is_input_active(),
        }
    }

    /// Name of the subscription being streamed, if its handle is live.
    pub fn active_subscription(&self) -> Option<&str> {
        self.stream
            .as_ref()
            .filter(|h| h.is_running())
            .map(SubscriptionHandle::subscription)
    }

    /// Footer label: the emulator endpoint or the project.
    pub fn connection_label(&self) -> String {
        match &self.emulator_host {
            Some(host) => format!("{} (emulator {host})", self.project_id),
            None => self.project_id.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_app() -> App {
        App::new(
            AppOptions {
                project_id: "test-project".into(),
                emulator_host: None,
                templates_dir: PathBuf::from("."),
                auto_ack: false,
                receive_settings: ReceiveSettings::default(),
            },
            CancellationToken::new(),
        )
    }

    #[test]
    fn starts_focused_on_topics_with_no_stream() {
        let app = test_app();
        assert_eq!(app.focus, FocusPanel::Topics);
        assert!(app.active_subscription().is_none());
        assert!(!app.is_input_active());
        assert_eq!(app.connection_label(), "test-project");
    }
}
