//! Subscriber region state

use std::collections::VecDeque;

use pubsub_tui_client::ReceivedMessage;

use super::input::TextInput;
use super::list::{clamp, step_down, step_up};
use crate::util::Filter;

/// Display retention. The oldest message is evicted first, whatever its
/// acknowledgment state.
pub const MAX_RETAINED_MESSAGES: usize = 100;

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

#[derive(Debug, Default)]
pub struct SubscriberState {
    pub subscription: Option<String>,
    pub topic: Option<String>,
    pub connected: bool,
    pub messages: VecDeque<ReceivedMessage>,
    /// Index into [`Self::visible`].
    pub cursor: usize,
    pub auto_ack: bool,
    pub filter: Filter,
    pub filtering: bool,
    pub filter_input: TextInput,
    pub detail_scroll: u16,
    pub last_error: Option<String>,
    /// Total deliveries since attaching, including evicted ones.
    pub received: u64,
    spinner: usize,
}

impl SubscriberState {
    pub fn new(auto_ack: bool) -> Self {
        Self {
            auto_ack,
            ..Self::default()
        }
    }

    /// Binds to a new subscription, dropping messages from the previous one.
    pub fn attach(&mut self, subscription: &str, topic: &str) {
        self.subscription = Some(subscription.to_string());
        self.topic = Some(topic.to_string());
        self.connected = true;
        self.clear_messages();
    }

    /// Unbinds after an explicit stop.
    pub fn detach(&mut self) {
        self.subscription = None;
        self.topic = None;
        self.connected = false;
        self.clear_messages();
    }

    /// The stream ended on its own; received messages stay readable.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Appends a delivery, auto-acknowledging first when enabled.
    pub fn push(&mut self, msg: ReceivedMessage) {
        if self.auto_ack {
            msg.acknowledge();
        }
        self.messages.push_back(msg);
        while self.messages.len() > MAX_RETAINED_MESSAGES {
            self.messages.pop_front();
        }
        self.received += 1;
        self.select_newest();
    }

    pub fn visible(&self) -> Vec<&ReceivedMessage> {
        self.messages
            .iter()
            .filter(|m| self.filter.matches(&m.id) || self.filter.matches(&m.data_str()))
            .collect()
    }

    pub fn selected(&self) -> Option<&ReceivedMessage> {
        self.visible().get(self.cursor).copied()
    }

    pub fn select_previous(&mut self) {
        step_up(&mut self.cursor);
        self.detail_scroll = 0;
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        step_down(&mut self.cursor, len);
        self.detail_scroll = 0;
    }

    pub fn select_newest(&mut self) {
        self.cursor = self.visible().len().saturating_sub(1);
        self.detail_scroll = 0;
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter.set(text);
        let len = self.visible().len();
        clamp(&mut self.cursor, len);
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.filter_input.clear();
        let len = self.visible().len();
        clamp(&mut self.cursor, len);
    }

    pub fn toggle_auto_ack(&mut self) -> bool {
        self.auto_ack = !self.auto_ack;
        self.auto_ack
    }

    pub fn scroll_detail_up(&mut self, lines: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(lines);
    }

    pub fn scroll_detail_down(&mut self, lines: u16) {
        self.detail_scroll = self.detail_scroll.saturating_add(lines);
    }

    pub fn set_error(&mut self, detail: String) {
        self.last_error = Some(detail);
    }

    /// Advances the spinner. Runs on every tick, focused or not.
    pub fn tick(&mut self) {
        if self.connected {
            self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner_frame(&self) -> char {
        SPINNER_FRAMES[self.spinner]
    }

    pub fn reset_mode(&mut self) {
        self.filtering = false;
    }

    pub fn is_input_active(&self) -> bool {
        self.filtering
    }

    fn clear_messages(&mut self) {
        self.messages.clear();
        self.cursor = 0;
        self.detail_scroll = 0;
        self.last_error = None;
        self.received = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use pubsub_tui_client::{AckReply, AckStatus};

    use super::*;

    struct NoopReply;

    impl AckReply for NoopReply {
        fn ack(&self) {}
        fn nack(&self) {}
    }

    fn message(id: &str, data: &str) -> ReceivedMessage {
        ReceivedMessage::new(id, data.as_bytes(), BTreeMap::new(), Utc::now(), NoopReply)
    }

    #[test]
    fn push_evicts_oldest_and_selects_newest() {
        let mut state = SubscriberState::new(false);
        state.attach("s", "t");
        for i in 1..=101 {
            state.push(message(&format!("m{i}"), "{}"));
        }
        assert_eq!(state.messages.len(), MAX_RETAINED_MESSAGES);
        assert_eq!(state.messages.front().map(|m| m.id.as_str()), Some("m2"));
        assert_eq!(state.selected().map(|m| m.id.as_str()), Some("m101"));
        assert_eq!(state.received, 101);
    }

    #[test]
    fn auto_ack_acknowledges_before_append() {
        let mut state = SubscriberState::new(true);
        state.push(message("m1", "{}"));
        assert_eq!(state.messages[0].status(), AckStatus::Acknowledged);

        state.toggle_auto_ack();
        state.push(message("m2", "{}"));
        assert_eq!(state.messages[1].status(), AckStatus::Pending);
    }

    #[test]
    fn filter_matches_id_or_data() {
        let mut state = SubscriberState::new(false);
        state.push(message("abc", r#"{"kind":"order"}"#));
        state.push(message("def", r#"{"kind":"refund"}"#));
        state.set_filter("refund");
        assert_eq!(state.visible().len(), 1);
        state.set_filter("^ab");
        assert_eq!(state.selected().map(|m| m.id.as_str()), Some("abc"));
    }

    #[test]
    fn attach_clears_previous_messages() {
        let mut state = SubscriberState::new(false);
        state.attach("a", "t");
        state.push(message("m1", "{}"));
        state.attach("b", "t");
        assert!(state.messages.is_empty());
        assert_eq!(state.subscription.as_deref(), Some("b"));
    }

    #[test]
    fn tick_spins_only_while_connected() {
        let mut state = SubscriberState::new(false);
        let idle = state.spinner_frame();
        state.tick();
        assert_eq!(state.spinner_frame(), idle);

        state.attach("s", "t");
        state.tick();
        assert_ne!(state.spinner_frame(), idle);
    }
}
