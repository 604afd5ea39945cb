//! Subscriber region

use crossterm::event::KeyEvent;
use pubsub_tui_client::ReceivedMessage;

use crate::event::keymap::DefaultKeymap;
use crate::message::SubscriberAction;
use crate::model::state::SubscriberState;
use crate::model::App;
use crate::task::Task;

const DETAIL_SCROLL_STEP: u16 = 3;

pub fn on_key(app: &mut App, key: KeyEvent) -> Vec<Task> {
    if let Some(action) = interpret(&mut app.subscriber, &key) {
        apply(app, action);
    }
    Vec::new()
}

fn interpret(state: &mut SubscriberState, key: &KeyEvent) -> Option<SubscriberAction> {
    if state.filtering {
        if DefaultKeymap::CANCEL.matches(key) {
            state.filtering = false;
            state.clear_filter();
        } else if DefaultKeymap::CONFIRM.matches(key) {
            state.filtering = false;
            if let Some(err) = state.filter.error() {
                return Some(SubscriberAction::Invalid(err.to_string()));
            }
        } else if state.filter_input.handle_key(key) {
            let text = state.filter_input.value().to_string();
            state.set_filter(&text);
        }
        return None;
    }

    if DefaultKeymap::ACK.matches(key) {
        let msg = state.selected()?.clone();
        if msg.acknowledge() {
            state.select_next();
            return Some(SubscriberAction::Acknowledged(display_id(&msg)));
        }
        return Some(SubscriberAction::AlreadyAcknowledged(display_id(&msg)));
    } else if DefaultKeymap::REJECT.matches(key) {
        let msg = state.selected()?.clone();
        if msg.reject() {
            return Some(SubscriberAction::Rejected(display_id(&msg)));
        }
        return Some(SubscriberAction::AlreadyAcknowledged(display_id(&msg)));
    } else if DefaultKeymap::AUTO_ACK.matches(key) {
        return Some(SubscriberAction::AutoAck(state.toggle_auto_ack()));
    } else if DefaultKeymap::FILTER.matches(key) {
        state.filtering = true;
        state.filter_input.set(state.filter.text());
    } else if DefaultKeymap::is_up(key) {
        state.select_previous();
    } else if DefaultKeymap::is_down(key) {
        state.select_next();
    } else if DefaultKeymap::SCROLL_UP.matches(key) {
        state.scroll_detail_up(DETAIL_SCROLL_STEP);
    } else if DefaultKeymap::SCROLL_DOWN.matches(key) {
        state.scroll_detail_down(DETAIL_SCROLL_STEP);
    } else if DefaultKeymap::CANCEL.matches(key) && !state.filter.text().is_empty() {
        state.clear_filter();
    }
    None
}

fn apply(app: &mut App, action: SubscriberAction) {
    match action {
        SubscriberAction::Acknowledged(id) => {
            app.activity.info(format!("Acknowledged message: {id}"));
        }
        SubscriberAction::Rejected(id) => {
            app.activity.info(format!("Rejected message: {id}"));
        }
        SubscriberAction::AlreadyAcknowledged(id) => {
            app.activity
                .warning(format!("Message {id} is already acknowledged"));
        }
        SubscriberAction::AutoAck(on) => {
            app.activity
                .info(format!("Auto-ack {}", if on { "enabled" } else { "disabled" }));
        }
        SubscriberAction::Invalid(detail) => app.activity.error(detail),
    }
}

/// `abcdefgh...` for long ids, the id itself otherwise.
fn display_id(msg: &ReceivedMessage) -> String {
    let short = msg.short_id();
    if short.len() < msg.id.len() {
        format!("{short}...")
    } else {
        short.to_string()
    }
}
