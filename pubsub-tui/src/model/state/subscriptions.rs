//! Subscriptions region state

use pubsub_tui_client::SubscriptionInfo;

use super::input::TextInput;
use super::list::{clamp, step_down, step_up, ListMode, RegionStatus};
use crate::util::Filter;

#[derive(Debug, Default)]
pub struct SubscriptionsState {
    pub subscriptions: Vec<SubscriptionInfo>,
    pub cursor: usize,
    /// Only subscriptions attached to this topic are listed.
    pub topic_filter: Option<String>,
    /// Subscription currently being streamed.
    pub active: Option<String>,
    pub mode: ListMode,
    pub input: TextInput,
    pub filter: Filter,
    pub loading: bool,
    pub status: Option<RegionStatus>,
    pub pending_delete: Option<String>,
}

impl SubscriptionsState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn visible(&self) -> Vec<&SubscriptionInfo> {
        self.subscriptions
            .iter()
            .filter(|s| self.topic_filter.as_ref().is_none_or(|t| &s.topic == t))
            .filter(|s| self.filter.matches(&s.name))
            .collect()
    }

    pub fn current(&self) -> Option<&SubscriptionInfo> {
        self.visible().get(self.cursor).copied()
    }

    pub fn select_previous(&mut self) {
        step_up(&mut self.cursor);
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        step_down(&mut self.cursor, len);
    }

    pub fn set_subscriptions(&mut self, subscriptions: Vec<SubscriptionInfo>) {
        self.subscriptions = subscriptions;
        self.loading = false;
        self.refit_cursor();
    }

    pub fn set_topic_filter(&mut self, topic: Option<String>) {
        self.topic_filter = topic;
        self.cursor = 0;
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter.set(text);
        self.refit_cursor();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.refit_cursor();
    }

    pub fn set_active(&mut self, name: Option<String>) {
        self.active = name;
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.as_deref() == Some(name)
    }

    pub fn reset_mode(&mut self) {
        self.mode = ListMode::Normal;
        self.input.clear();
        self.pending_delete = None;
    }

    pub fn is_input_active(&self) -> bool {
        self.mode.takes_text()
    }

    pub fn set_status(&mut self, status: RegionStatus) {
        self.status = Some(status);
    }

    fn refit_cursor(&mut self) {
        let len = self.visible().len();
        clamp(&mut self.cursor, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(name: &str, topic: &str) -> SubscriptionInfo {
        SubscriptionInfo {
            name: name.to_string(),
            full_name: format!("projects/p/subscriptions/{name}"),
            topic: topic.to_string(),
            ack_deadline_seconds: 10,
        }
    }

    #[test]
    fn topic_filter_and_regex_combine() {
        let mut state = SubscriptionsState::new();
        state.set_subscriptions(vec![
            sub("orders-audit", "orders"),
            sub("orders-mail", "orders"),
            sub("billing-audit", "billing"),
        ]);
        assert_eq!(state.visible().len(), 3);

        state.set_topic_filter(Some("orders".into()));
        assert_eq!(state.visible().len(), 2);

        state.set_filter("audit$");
        let names: Vec<_> = state.visible().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["orders-audit"]);

        state.set_topic_filter(None);
        assert_eq!(state.visible().len(), 2);
    }
}
