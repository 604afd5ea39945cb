//!
//! src/update/mod.rs
//! Update layer: the dispatcher
//!
//!     update(&mut App, AppMessage) -> Vec<Task>
//!
//! This is the only place the model changes. It never blocks and never
//! performs I/O: anything that has to touch the network or the file
//! system is returned as a Task, and its outcome comes back later as
//! AppMessage::Result.
//!
//!
//! Module structure:
//!     src/update/mod.rs
//!         mod focus;          // focus_region(), mode resets
//!         mod topics;         // topic keys, selection fan-out, CRUD results
//!         mod subscriptions;  // subscription keys, connect/disconnect
//!         mod publisher;      // template keys, publish
//!         mod subscriber;     // message keys, ack / reject
//!         mod stream;         // the single stream's lifecycle
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Key routing
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     1. Help overlay open          any key closes it
//!     2. Ctrl-C                     quit, always
//!     3. No text input active       q quit, ? help, 1-4 jump to region
//!     4. Tab / Shift-Tab            cycle regions
//!     5. Otherwise                  the focused region's on_key()
//!
//!     While a region captures text, q and the digits are typed into the
//!     input instead of acting globally.
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Topic selection fan-out
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     Selecting a topic updates, in this order:
//!
//!         App.selected_topic
//!         TopicsState.selected            (● marker)
//!         SubscriptionsState.topic_filter (only that topic's subscriptions)
//!         PublisherState.target_topic     (where Enter publishes)
//!         ActivityLog                     ("Selected topic: ...")
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Stream events
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     Stream results carry the id of the handle that produced them. An id
//!     other than the current handle's is stale and is dropped. Every
//!     delivery or error from the current handle re-arms the poll, so at
//!     most one PollStream is ever outstanding.
//!

mod focus;
mod publisher;
mod stream;
mod subscriber;
mod subscriptions;
mod topics;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::keymap::DefaultKeymap;
use crate::message::{AppMessage, TaskKind, TaskResult};
use crate::model::{App, FocusPanel};
use crate::task::Task;

pub use stream::shutdown;

/// Tasks to run once at startup.
pub fn init(app: &mut App) -> Vec<Task> {
    app.activity
        .network(format!("Connected to {}", app.connection_label()));
    vec![
        Task::LoadTopics,
        Task::LoadSubscriptions,
        Task::LoadTemplates(app.publisher.templates_dir.clone()),
    ]
}

/// Applies one message and returns the side effects it asks for.
pub fn update(app: &mut App, msg: AppMessage) -> Vec<Task> {
    match msg {
        AppMessage::Input(key) => handle_key(app, key),
        AppMessage::Resize { width, height } => {
            app.width = width;
            app.height = height;
            Vec::new()
        }
        AppMessage::Tick => {
            app.ticks = app.ticks.wrapping_add(1);
            app.subscriber.tick();
            Vec::new()
        }
        AppMessage::Result(result) => on_result(app, result),
        AppMessage::Noop => Vec::new(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Task> {
    if app.show_help {
        app.show_help = false;
        return Vec::new();
    }

    if DefaultKeymap::FORCE_QUIT.matches(&key) {
        return quit(app);
    }

    if !app.is_input_active() {
        if DefaultKeymap::QUIT.matches(&key) {
            return quit(app);
        }
        if DefaultKeymap::HELP.matches(&key) {
            app.show_help = true;
            return Vec::new();
        }
        if let Some(target) = digit_target(&key) {
            focus::focus_region(app, target);
            return Vec::new();
        }
    }

    if DefaultKeymap::NEXT_PANEL.matches(&key) {
        focus::focus_region(app, app.focus.next());
        return Vec::new();
    }
    if DefaultKeymap::PREV_PANEL.matches(&key) {
        focus::focus_region(app, app.focus.prev());
        return Vec::new();
    }

    match app.focus {
        FocusPanel::Topics => topics::on_key(app, key),
        FocusPanel::Subscriptions => subscriptions::on_key(app, key),
        FocusPanel::Publisher => publisher::on_key(app, key),
        FocusPanel::Subscriber => subscriber::on_key(app, key),
    }
}

fn digit_target(key: &KeyEvent) -> Option<FocusPanel> {
    if !(key.modifiers - KeyModifiers::SHIFT).is_empty() {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => FocusPanel::from_digit(c),
        _ => None,
    }
}

fn quit(app: &mut App) -> Vec<Task> {
    stream::shutdown(app);
    app.should_quit = true;
    Vec::new()
}

fn on_result(app: &mut App, result: TaskResult) -> Vec<Task> {
    match result {
        TaskResult::Topics(result) => topics::on_result(app, result),
        TaskResult::Subscriptions(result) => subscriptions::on_result(app, result),
        TaskResult::Published(result) => publisher::on_published(app, result),
        TaskResult::Templates(result) => publisher::on_templates(app, result),
        TaskResult::Stream { handle, event } => stream::on_event(app, handle, event),
        TaskResult::Cancelled(kind) => {
            log::debug!("{kind} cancelled");
            clear_pending(app, kind);
            Vec::new()
        }
        TaskResult::Failed { task, detail } => {
            clear_pending(app, task);
            app.activity.error(format!("{task} failed: {detail}"));
            Vec::new()
        }
    }
}

/// Drops the busy flag a task of `kind` would have cleared on completion.
fn clear_pending(app: &mut App, kind: TaskKind) {
    match kind {
        TaskKind::LoadTopics => app.topics.loading = false,
        TaskKind::LoadSubscriptions => app.subscriptions.loading = false,
        TaskKind::LoadTemplates => app.publisher.loading = false,
        TaskKind::Publish => app.publisher.set_publishing(false),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use chrono::Utc;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pubsub_tui_client::{
        AckReply, PubSubError, ReceivedMessage, StreamExit, SubscriptionInfo, TopicInfo,
    };

    use super::*;
    use crate::backend::TemplateFile;
    use crate::message::{StreamEvent, SubscriptionResult, TemplateResult, TopicResult};
    use crate::model::state::{ListMode, MAX_RETAINED_MESSAGES};
    use crate::model::test_app;

    struct NoopReply;

    impl AckReply for NoopReply {
        fn ack(&self) {}
        fn nack(&self) {}
    }

    fn key(code: KeyCode) -> AppMessage {
        AppMessage::Input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppMessage {
        AppMessage::Input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn press(app: &mut App, code: KeyCode) -> Vec<Task> {
        update(app, key(code))
    }

    fn message(id: &str, data: &str) -> ReceivedMessage {
        ReceivedMessage::new(id, data.as_bytes(), BTreeMap::new(), Utc::now(), NoopReply)
    }

    fn topic(name: &str) -> TopicInfo {
        TopicInfo {
            name: name.to_string(),
            full_name: format!("projects/test-project/topics/{name}"),
        }
    }

    fn subscription(name: &str, topic: &str) -> SubscriptionInfo {
        SubscriptionInfo {
            name: name.to_string(),
            full_name: format!("projects/test-project/subscriptions/{name}"),
            topic: topic.to_string(),
            ack_deadline_seconds: 10,
        }
    }

    fn result(app: &mut App, result: TaskResult) -> Vec<Task> {
        update(app, AppMessage::Result(result))
    }

    /// Starts `name` and returns the current handle id.
    fn connect(app: &mut App, name: &str) -> pubsub_tui_client::HandleId {
        let tasks = stream::start_subscription(app, name.to_string(), "orders".to_string());
        assert_eq!(tasks.len(), 2);
        app.stream.as_ref().map(|h| h.id()).unwrap()
    }

    fn deliver(app: &mut App, id: pubsub_tui_client::HandleId, msg: ReceivedMessage) -> Vec<Task> {
        result(
            app,
            TaskResult::Stream {
                handle: id,
                event: StreamEvent::Delivery(msg),
            },
        )
    }

    #[test]
    fn init_loads_everything() {
        let mut app = test_app();
        let tasks = init(&mut app);
        assert!(matches!(
            tasks.as_slice(),
            [Task::LoadTopics, Task::LoadSubscriptions, Task::LoadTemplates(_)]
        ));
    }

    #[test]
    fn unbound_key_changes_nothing() {
        let mut app = test_app();
        let before = format!("{app:?}");
        let tasks = press(&mut app, KeyCode::F(5));
        assert!(tasks.is_empty());
        assert_eq!(format!("{app:?}"), before);
    }

    #[test]
    fn tab_cycles_and_digits_jump() {
        let mut app = test_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, FocusPanel::Subscriptions);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, FocusPanel::Topics);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, FocusPanel::Subscriber);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.focus, FocusPanel::Publisher);
    }

    #[test]
    fn leaving_a_region_resets_its_mode() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.topics.mode, ListMode::Filter);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.topics.mode, ListMode::Normal);
    }

    #[test]
    fn digits_and_q_are_typed_while_filtering() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('q'));

        assert_eq!(app.focus, FocusPanel::Topics);
        assert!(!app.should_quit);
        assert_eq!(app.topics.input.value(), "2q");
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        update(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn help_swallows_the_next_key() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn tick_advances_without_focus() {
        let mut app = test_app();
        update(&mut app, AppMessage::Tick);
        update(&mut app, AppMessage::Tick);
        assert_eq!(app.ticks, 2);
        assert_eq!(app.focus, FocusPanel::Topics);
    }

    #[test]
    fn selecting_a_topic_fans_out() {
        let mut app = test_app();
        result(
            &mut app,
            TaskResult::Topics(TopicResult::Listed(Ok(vec![topic("orders"), topic("users")]))),
        );
        result(
            &mut app,
            TaskResult::Subscriptions(SubscriptionResult::Listed(Ok(vec![
                subscription("orders-sub", "orders"),
                subscription("users-sub", "users"),
            ]))),
        );

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.selected_topic.as_deref(), Some("orders"));
        assert!(app.topics.is_selected("orders"));
        assert_eq!(app.subscriptions.topic_filter.as_deref(), Some("orders"));
        let visible: Vec<_> = app
            .subscriptions
            .visible()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(visible, ["orders-sub"]);
        assert_eq!(app.publisher.target_topic.as_deref(), Some("orders"));
        assert!(app.activity.contains("Selected topic: orders"));
    }

    #[test]
    fn starting_a_second_subscription_stops_the_first() {
        let mut app = test_app();
        connect(&mut app, "sub-a");
        let first_token = app.stream.as_ref().and_then(|h| h.token()).cloned().unwrap();

        connect(&mut app, "sub-b");

        assert!(first_token.is_cancelled());
        assert_eq!(app.active_subscription(), Some("sub-b"));
        assert_eq!(app.subscriptions.active.as_deref(), Some("sub-b"));
        assert!(app.activity.contains("Stopped previous subscription: sub-a"));
    }

    #[test]
    fn reselecting_the_running_subscription_is_a_no_op() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");
        let tasks = stream::start_subscription(&mut app, "sub-a".into(), "orders".into());
        assert!(tasks.is_empty());
        assert_eq!(app.stream.as_ref().map(|h| h.id()), Some(id));
    }

    #[test]
    fn delivery_rearms_the_poll() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");

        let tasks = deliver(&mut app, id, message("m1", "{}"));

        assert!(matches!(tasks.as_slice(), [Task::PollStream(p)] if p.handle_id() == id));
        assert_eq!(app.subscriber.messages.len(), 1);
    }

    #[test]
    fn stale_events_are_discarded() {
        let mut app = test_app();
        let old = connect(&mut app, "sub-a");
        connect(&mut app, "sub-b");

        let tasks = deliver(&mut app, old, message("late", "{}"));

        assert!(tasks.is_empty());
        assert!(app.subscriber.messages.is_empty());
    }

    #[test]
    fn retention_keeps_the_newest_hundred() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");
        for i in 1..=101 {
            deliver(&mut app, id, message(&format!("m{i}"), "{}"));
        }

        assert_eq!(app.subscriber.messages.len(), MAX_RETAINED_MESSAGES);
        assert_eq!(app.subscriber.messages.front().map(|m| m.id.as_str()), Some("m2"));
        assert_eq!(app.subscriber.selected().map(|m| m.id.as_str()), Some("m101"));
    }

    #[test]
    fn ack_then_reject_warns() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");
        deliver(&mut app, id, message("m1", "{}"));
        app.focus = FocusPanel::Subscriber;

        press(&mut app, KeyCode::Char('a'));
        assert!(app.subscriber.messages[0].is_acknowledged());
        assert!(app.activity.contains("Acknowledged message: m1"));

        press(&mut app, KeyCode::Char('x'));
        assert!(app.activity.contains("Message m1 is already acknowledged"));
        assert!(app.subscriber.messages[0].is_acknowledged());
    }

    #[test]
    fn acknowledging_twice_reports_no_change() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");
        deliver(&mut app, id, message("m1", "{}"));
        app.focus = FocusPanel::Subscriber;

        press(&mut app, KeyCode::Char('a'));
        let logged = app.activity.len();
        press(&mut app, KeyCode::Char('a'));

        assert_eq!(app.activity.len(), logged + 1);
        assert!(app.activity.contains("Message m1 is already acknowledged"));
        assert!(app.subscriber.messages[0].is_acknowledged());
    }

    #[test]
    fn auto_ack_acknowledges_on_arrival() {
        let mut app = test_app();
        app.focus = FocusPanel::Subscriber;
        press(&mut app, KeyCode::Char('A'));
        assert!(app.activity.contains("Auto-ack enabled"));

        let id = connect(&mut app, "sub-a");
        deliver(&mut app, id, message("m2", "{}"));

        assert!(app.subscriber.messages[0].is_acknowledged());
    }

    #[test]
    fn stream_error_is_reported_and_rearmed() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");

        let tasks = result(
            &mut app,
            TaskResult::Stream {
                handle: id,
                event: StreamEvent::Error(PubSubError::transport("connection reset")),
            },
        );

        assert_eq!(tasks.len(), 1);
        assert!(app.subscriber.last_error.is_some());
        assert_eq!(app.active_subscription(), Some("sub-a"));
    }

    #[test]
    fn closed_stream_keeps_messages_but_disconnects() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");
        deliver(&mut app, id, message("m1", "{}"));

        let tasks = result(
            &mut app,
            TaskResult::Stream {
                handle: id,
                event: StreamEvent::Closed,
            },
        );

        assert!(tasks.is_empty());
        assert!(app.stream.is_none());
        assert!(app.subscriptions.active.is_none());
        assert!(!app.subscriber.connected);
        assert_eq!(app.subscriber.messages.len(), 1);
        assert!(app
            .activity
            .contains("Stream ended for sub-a; select the subscription to restart"));
    }

    #[test]
    fn failed_stream_task_ends_the_live_stream() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");

        let tasks = result(
            &mut app,
            TaskResult::Stream {
                handle: id,
                event: StreamEvent::Failed("task panicked".into()),
            },
        );

        assert!(tasks.is_empty());
        assert!(app.stream.is_none());
        assert!(!app.subscriber.connected);
        assert!(app.activity.contains("Subscription stream failed: task panicked"));
    }

    #[test]
    fn failure_of_a_replaced_stream_is_ignored() {
        let mut app = test_app();
        let old = connect(&mut app, "sub-a");
        connect(&mut app, "sub-b");
        let logged = app.activity.len();

        let tasks = result(
            &mut app,
            TaskResult::Stream {
                handle: old,
                event: StreamEvent::Failed("task panicked".into()),
            },
        );

        assert!(tasks.is_empty());
        assert_eq!(app.active_subscription(), Some("sub-b"));
        assert_eq!(app.subscriptions.active.as_deref(), Some("sub-b"));
        assert_eq!(app.activity.len(), logged);
    }

    #[test]
    fn worker_exit_is_quiet() {
        let mut app = test_app();
        let id = connect(&mut app, "sub-a");
        let logged = app.activity.len();

        let tasks = result(
            &mut app,
            TaskResult::Stream {
                handle: id,
                event: StreamEvent::WorkerExited(StreamExit::Cancelled),
            },
        );

        assert!(tasks.is_empty());
        assert_eq!(app.activity.len(), logged);
    }

    #[test]
    fn quit_stops_the_stream() {
        let mut app = test_app();
        connect(&mut app, "sub-a");
        let token = app.stream.as_ref().and_then(|h| h.token()).cloned().unwrap();

        press(&mut app, KeyCode::Char('q'));

        assert!(app.should_quit);
        assert!(token.is_cancelled());
        assert!(app.stream.is_none());
    }

    fn with_template(app: &mut App, content: &str) {
        let path = PathBuf::from("order.json");
        result(
            app,
            TaskResult::Templates(TemplateResult::Listed(Ok(vec![TemplateFile {
                name: "order.json".into(),
                path: path.clone(),
                size: content.len() as u64,
            }]))),
        );
        result(
            app,
            TaskResult::Templates(TemplateResult::Loaded {
                path,
                result: Ok(content.to_string()),
            }),
        );
    }

    #[test]
    fn listing_templates_reads_the_first_one() {
        let mut app = test_app();
        let tasks = result(
            &mut app,
            TaskResult::Templates(TemplateResult::Listed(Ok(vec![TemplateFile {
                name: "a.json".into(),
                path: PathBuf::from("a.json"),
                size: 2,
            }]))),
        );
        assert!(matches!(tasks.as_slice(), [Task::ReadTemplate(p)] if p == &PathBuf::from("a.json")));
    }

    #[test]
    fn publish_needs_a_topic() {
        let mut app = test_app();
        with_template(&mut app, r#"{"id": 1}"#);
        app.focus = FocusPanel::Publisher;

        let tasks = press(&mut app, KeyCode::Enter);

        assert!(tasks.is_empty());
        assert_eq!(
            app.publisher.status.as_ref().map(|s| s.text.as_str()),
            Some("No topic selected")
        );
    }

    #[test]
    fn publish_round_trip_updates_status() {
        let mut app = test_app();
        with_template(&mut app, r#"{"id": "${id}"}"#);
        topics::select_topic(&mut app, Some("orders".into()));
        app.focus = FocusPanel::Publisher;

        press(&mut app, KeyCode::Char('v'));
        for c in "id=7".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let tasks = press(&mut app, KeyCode::Enter);

        match tasks.as_slice() {
            [Task::Publish { topic, payload, .. }] => {
                assert_eq!(topic, "orders");
                assert_eq!(payload.as_slice(), br#"{"id": "7"}"#);
            }
            other => panic!("unexpected tasks: {other:?}"),
        }
        assert!(app.publisher.publishing);
        assert_eq!(
            app.publisher.status.as_ref().map(|s| s.text.as_str()),
            Some("Publishing...")
        );

        result(&mut app, TaskResult::Published(Ok("4711".into())));
        assert!(!app.publisher.publishing);
        assert_eq!(
            app.publisher.status.as_ref().map(|s| s.text.as_str()),
            Some("Published: 4711")
        );
        assert!(app.activity.contains("Published message: 4711"));
    }

    #[test]
    fn blank_template_is_not_published() {
        let mut app = test_app();
        with_template(&mut app, "   \n");
        topics::select_topic(&mut app, Some("orders".into()));
        app.focus = FocusPanel::Publisher;

        assert!(press(&mut app, KeyCode::Enter).is_empty());
        assert_eq!(
            app.publisher.status.as_ref().map(|s| s.text.as_str()),
            Some("No content to publish")
        );
    }

    #[test]
    fn created_topic_triggers_reload() {
        let mut app = test_app();
        let tasks = result(
            &mut app,
            TaskResult::Topics(TopicResult::Created {
                name: "orders".into(),
                result: Ok(()),
            }),
        );
        assert!(matches!(tasks.as_slice(), [Task::LoadTopics]));
    }

    #[test]
    fn failed_delete_keeps_the_list() {
        let mut app = test_app();
        result(
            &mut app,
            TaskResult::Topics(TopicResult::Listed(Ok(vec![topic("orders")]))),
        );
        let tasks = result(
            &mut app,
            TaskResult::Topics(TopicResult::Deleted {
                name: "orders".into(),
                result: Err(PubSubError::transport("permission denied")),
            }),
        );
        assert!(tasks.is_empty());
        assert_eq!(app.topics.topics.len(), 1);
        assert!(app.topics.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn cancelled_load_clears_the_spinner() {
        let mut app = test_app();
        assert!(app.topics.loading);
        result(&mut app, TaskResult::Cancelled(TaskKind::LoadTopics));
        assert!(!app.topics.loading);
    }
}
