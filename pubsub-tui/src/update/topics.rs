//! Topics region: key handling, selection fan-out, CRUD results

use crossterm::event::KeyEvent;
use pubsub_tui_client::{validate_resource_id, ResourceKind};

use crate::event::keymap::DefaultKeymap;
use crate::message::{TopicAction, TopicResult};
use crate::model::state::{ListMode, RegionStatus, TopicsState};
use crate::model::App;
use crate::task::Task;

pub fn on_key(app: &mut App, key: KeyEvent) -> Vec<Task> {
    match interpret(&mut app.topics, &key) {
        Some(action) => apply(app, action),
        None => Vec::new(),
    }
}

fn interpret(state: &mut TopicsState, key: &KeyEvent) -> Option<TopicAction> {
    match state.mode {
        ListMode::Normal => normal_key(state, key),
        ListMode::Filter => filter_key(state, key),
        ListMode::Create => create_key(state, key),
        ListMode::ConfirmDelete => confirm_key(state, key),
    }
}

fn normal_key(state: &mut TopicsState, key: &KeyEvent) -> Option<TopicAction> {
    if DefaultKeymap::is_up(key) {
        state.select_previous();
    } else if DefaultKeymap::is_down(key) {
        state.select_next();
    } else if DefaultKeymap::CONFIRM.matches(key) {
        return state.current().map(|t| TopicAction::Select(t.name.clone()));
    } else if DefaultKeymap::FILTER.matches(key) {
        state.mode = ListMode::Filter;
        state.input.set(state.filter.text());
    } else if DefaultKeymap::CREATE.matches(key) {
        state.mode = ListMode::Create;
        state.input.clear();
    } else if DefaultKeymap::DELETE.matches(key) {
        let name = state.current()?.name.clone();
        state.pending_delete = Some(name);
        state.mode = ListMode::ConfirmDelete;
    } else if DefaultKeymap::REFRESH.matches(key) {
        state.loading = true;
        return Some(TopicAction::Refresh);
    } else if DefaultKeymap::CANCEL.matches(key) && !state.filter.text().is_empty() {
        state.clear_filter();
    }
    None
}

fn filter_key(state: &mut TopicsState, key: &KeyEvent) -> Option<TopicAction> {
    if DefaultKeymap::CANCEL.matches(key) {
        state.clear_filter();
        state.reset_mode();
    } else if DefaultKeymap::CONFIRM.matches(key) {
        state.reset_mode();
        if let Some(err) = state.filter.error() {
            return Some(TopicAction::Invalid(err.to_string()));
        }
    } else if state.input.handle_key(key) {
        let text = state.input.value().to_string();
        state.set_filter(&text);
    }
    None
}

fn create_key(state: &mut TopicsState, key: &KeyEvent) -> Option<TopicAction> {
    if DefaultKeymap::CANCEL.matches(key) {
        state.reset_mode();
    } else if DefaultKeymap::CONFIRM.matches(key) {
        let name = state.input.value().trim().to_string();
        if let Err(e) = validate_resource_id(ResourceKind::Topic, &name) {
            state.set_status(RegionStatus::error(e.to_string()));
            return Some(TopicAction::Invalid(e.to_string()));
        }
        state.reset_mode();
        state.set_status(RegionStatus::info(format!("Creating {name}...")));
        return Some(TopicAction::Create(name));
    } else {
        state.input.handle_key(key);
    }
    None
}

fn confirm_key(state: &mut TopicsState, key: &KeyEvent) -> Option<TopicAction> {
    if DefaultKeymap::YES.matches(key) {
        let name = state.pending_delete.take();
        state.reset_mode();
        let name = name?;
        state.set_status(RegionStatus::info(format!("Deleting {name}...")));
        return Some(TopicAction::Delete(name));
    }
    if DefaultKeymap::NO.matches(key) || DefaultKeymap::CANCEL.matches(key) {
        state.reset_mode();
    }
    None
}

fn apply(app: &mut App, action: TopicAction) -> Vec<Task> {
    match action {
        TopicAction::Select(name) => {
            select_topic(app, Some(name));
            Vec::new()
        }
        TopicAction::Create(name) => {
            app.activity.network(format!("Creating topic: {name}"));
            vec![Task::CreateTopic(name)]
        }
        TopicAction::Delete(name) => {
            app.activity.network(format!("Deleting topic: {name}"));
            vec![Task::DeleteTopic(name)]
        }
        TopicAction::Refresh => vec![Task::LoadTopics],
        TopicAction::Invalid(detail) => {
            app.activity.error(detail);
            Vec::new()
        }
    }
}

/// Scopes the UI to a topic, in a fixed order: topics region, subscription
/// filter, publisher target, then the activity log.
pub fn select_topic(app: &mut App, name: Option<String>) {
    app.selected_topic.clone_from(&name);
    app.topics.set_selected(name.clone());
    app.subscriptions.set_topic_filter(name.clone());
    app.publisher.set_target_topic(name.clone());
    match name {
        Some(name) => app.activity.info(format!("Selected topic: {name}")),
        None => app.activity.info("Topic selection cleared"),
    }
}

pub fn on_result(app: &mut App, result: TopicResult) -> Vec<Task> {
    match result {
        TopicResult::Listed(Ok(topics)) => {
            let count = topics.len();
            app.topics.set_topics(topics);
            app.activity.success(format!("Loaded {count} topics"));

            let selected_gone = app
                .selected_topic
                .as_ref()
                .is_some_and(|sel| !app.topics.topics.iter().any(|t| &t.name == sel));
            if selected_gone {
                select_topic(app, None);
            }
            Vec::new()
        }
        TopicResult::Listed(Err(e)) => {
            app.topics.loading = false;
            app.topics.set_status(RegionStatus::error(e.to_string()));
            app.activity.error(format!("Failed to load topics: {e}"));
            Vec::new()
        }
        TopicResult::Created { name, result } => match result {
            Ok(()) => {
                app.topics
                    .set_status(RegionStatus::info(format!("Created topic: {name}")));
                app.activity.success(format!("Created topic: {name}"));
                app.topics.loading = true;
                vec![Task::LoadTopics]
            }
            Err(e) => {
                app.topics
                    .set_status(RegionStatus::error(format!("Create failed: {e}")));
                app.activity.error(format!("Failed to create topic: {e}"));
                Vec::new()
            }
        },
        TopicResult::Deleted { name, result } => match result {
            Ok(()) => {
                app.topics
                    .set_status(RegionStatus::info(format!("Deleted topic: {name}")));
                app.activity.success(format!("Deleted topic: {name}"));
                if app.selected_topic.as_deref() == Some(name.as_str()) {
                    select_topic(app, None);
                }
                app.topics.loading = true;
                app.subscriptions.loading = true;
                vec![Task::LoadTopics, Task::LoadSubscriptions]
            }
            Err(e) => {
                app.topics
                    .set_status(RegionStatus::error(format!("Delete failed: {e}")));
                app.activity.error(format!("Failed to delete topic: {e}"));
                Vec::new()
            }
        },
    }
}
