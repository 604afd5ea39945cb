//! Subscriptions region

use crossterm::event::KeyEvent;
use pubsub_tui_client::{validate_resource_id, ResourceKind};

use super::stream;
use crate::event::keymap::DefaultKeymap;
use crate::message::{SubscriptionAction, SubscriptionResult};
use crate::model::state::{ListMode, RegionStatus, SubscriptionsState};
use crate::model::App;
use crate::task::Task;

const NEED_TOPIC: &str = "Select a topic first";

pub fn on_key(app: &mut App, key: KeyEvent) -> Vec<Task> {
    let streaming = app.active_subscription().map(str::to_string);
    match interpret(&mut app.subscriptions, &key, streaming.as_deref()) {
        Some(action) => apply(app, action),
        None => Vec::new(),
    }
}

fn interpret(
    state: &mut SubscriptionsState,
    key: &KeyEvent,
    streaming: Option<&str>,
) -> Option<SubscriptionAction> {
    match state.mode {
        ListMode::Normal => normal_key(state, key, streaming),
        ListMode::Filter => filter_key(state, key),
        ListMode::Create => create_key(state, key),
        ListMode::ConfirmDelete => confirm_key(state, key),
    }
}

fn normal_key(
    state: &mut SubscriptionsState,
    key: &KeyEvent,
    streaming: Option<&str>,
) -> Option<SubscriptionAction> {
    if DefaultKeymap::is_up(key) {
        state.select_previous();
    } else if DefaultKeymap::is_down(key) {
        state.select_next();
    } else if DefaultKeymap::CONFIRM.matches(key) {
        let sub = state.current()?;
        // Enter on the subscription being streamed toggles it off.
        if streaming == Some(sub.name.as_str()) {
            return Some(SubscriptionAction::Disconnect);
        }
        return Some(SubscriptionAction::Connect {
            name: sub.name.clone(),
            topic: sub.topic.clone(),
        });
    } else if DefaultKeymap::CANCEL.matches(key) {
        if streaming.is_some() {
            return Some(SubscriptionAction::Disconnect);
        }
        if !state.filter.text().is_empty() {
            state.clear_filter();
        }
    } else if DefaultKeymap::FILTER.matches(key) {
        state.mode = ListMode::Filter;
        state.input.set(state.filter.text());
    } else if DefaultKeymap::CREATE.matches(key) {
        if state.topic_filter.is_none() {
            state.set_status(RegionStatus::error(NEED_TOPIC));
            return None;
        }
        state.mode = ListMode::Create;
        state.input.clear();
    } else if DefaultKeymap::DELETE.matches(key) {
        let name = state.current()?.name.clone();
        state.pending_delete = Some(name);
        state.mode = ListMode::ConfirmDelete;
    } else if DefaultKeymap::REFRESH.matches(key) {
        state.loading = true;
        return Some(SubscriptionAction::Refresh);
    } else if DefaultKeymap::CLEAR_TOPIC.matches(key) && state.topic_filter.is_some() {
        state.set_topic_filter(None);
    }
    None
}

fn filter_key(state: &mut SubscriptionsState, key: &KeyEvent) -> Option<SubscriptionAction> {
    if DefaultKeymap::CANCEL.matches(key) {
        state.clear_filter();
        state.reset_mode();
    } else if DefaultKeymap::CONFIRM.matches(key) {
        state.reset_mode();
        if let Some(err) = state.filter.error() {
            return Some(SubscriptionAction::Invalid(err.to_string()));
        }
    } else if state.input.handle_key(key) {
        let text = state.input.value().to_string();
        state.set_filter(&text);
    }
    None
}

fn create_key(state: &mut SubscriptionsState, key: &KeyEvent) -> Option<SubscriptionAction> {
    if DefaultKeymap::CANCEL.matches(key) {
        state.reset_mode();
    } else if DefaultKeymap::CONFIRM.matches(key) {
        let Some(topic) = state.topic_filter.clone() else {
            state.reset_mode();
            state.set_status(RegionStatus::error(NEED_TOPIC));
            return None;
        };
        let name = state.input.value().trim().to_string();
        if let Err(e) = validate_resource_id(ResourceKind::Subscription, &name) {
            state.set_status(RegionStatus::error(e.to_string()));
            return Some(SubscriptionAction::Invalid(e.to_string()));
        }
        state.reset_mode();
        state.set_status(RegionStatus::info(format!("Creating {name}...")));
        return Some(SubscriptionAction::Create { name, topic });
    } else {
        state.input.handle_key(key);
    }
    None
}

fn confirm_key(state: &mut SubscriptionsState, key: &KeyEvent) -> Option<SubscriptionAction> {
    if DefaultKeymap::YES.matches(key) {
        let name = state.pending_delete.take();
        state.reset_mode();
        let name = name?;
        state.set_status(RegionStatus::info(format!("Deleting {name}...")));
        return Some(SubscriptionAction::Delete(name));
    }
    if DefaultKeymap::NO.matches(key) || DefaultKeymap::CANCEL.matches(key) {
        state.reset_mode();
    }
    None
}

fn apply(app: &mut App, action: SubscriptionAction) -> Vec<Task> {
    match action {
        SubscriptionAction::Connect { name, topic } => stream::start_subscription(app, name, topic),
        SubscriptionAction::Disconnect => stream::stop_subscription(app),
        SubscriptionAction::Create { name, topic } => {
            app.activity
                .network(format!("Creating subscription: {name}"));
            vec![Task::CreateSubscription { name, topic }]
        }
        SubscriptionAction::Delete(name) => {
            let mut tasks = Vec::new();
            if app.active_subscription() == Some(name.as_str()) {
                tasks.extend(stream::stop_subscription(app));
            }
            app.activity
                .network(format!("Deleting subscription: {name}"));
            tasks.push(Task::DeleteSubscription(name));
            tasks
        }
        SubscriptionAction::Refresh => vec![Task::LoadSubscriptions],
        SubscriptionAction::Invalid(detail) => {
            app.activity.error(detail);
            Vec::new()
        }
    }
}

pub fn on_result(app: &mut App, result: SubscriptionResult) -> Vec<Task> {
    match result {
        SubscriptionResult::Listed(Ok(subscriptions)) => {
            let count = subscriptions.len();
            app.subscriptions.set_subscriptions(subscriptions);
            app.activity
                .success(format!("Loaded {count} subscriptions"));
            Vec::new()
        }
        SubscriptionResult::Listed(Err(e)) => {
            app.subscriptions.loading = false;
            app.subscriptions
                .set_status(RegionStatus::error(e.to_string()));
            app.activity
                .error(format!("Failed to load subscriptions: {e}"));
            Vec::new()
        }
        SubscriptionResult::Created { name, result } => match result {
            Ok(()) => {
                app.subscriptions
                    .set_status(RegionStatus::info(format!("Created subscription: {name}")));
                app.activity
                    .success(format!("Created subscription: {name}"));
                app.subscriptions.loading = true;
                vec![Task::LoadSubscriptions]
            }
            Err(e) => {
                app.subscriptions
                    .set_status(RegionStatus::error(format!("Create failed: {e}")));
                app.activity
                    .error(format!("Failed to create subscription: {e}"));
                Vec::new()
            }
        },
        SubscriptionResult::Deleted { name, result } => match result {
            Ok(()) => {
                app.subscriptions
                    .set_status(RegionStatus::info(format!("Deleted subscription: {name}")));
                app.activity
                    .success(format!("Deleted subscription: {name}"));
                app.subscriptions.loading = true;
                vec![Task::LoadSubscriptions]
            }
            Err(e) => {
                app.subscriptions
                    .set_status(RegionStatus::error(format!("Delete failed: {e}")));
                app.activity
                    .error(format!("Failed to delete subscription: {e}"));
                Vec::new()
            }
        },
    }
}
