//! Topics region state

use pubsub_tui_client::TopicInfo;

use super::input::TextInput;
use super::list::{clamp, step_down, step_up, ListMode, RegionStatus};
use crate::util::Filter;

#[derive(Debug, Default)]
pub struct TopicsState {
    pub topics: Vec<TopicInfo>,
    /// Index into [`Self::visible`].
    pub cursor: usize,
    /// Short name of the topic the rest of the UI is scoped to.
    pub selected: Option<String>,
    pub mode: ListMode,
    pub input: TextInput,
    pub filter: Filter,
    pub loading: bool,
    pub status: Option<RegionStatus>,
    pub pending_delete: Option<String>,
}

impl TopicsState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn visible(&self) -> Vec<&TopicInfo> {
        self.topics
            .iter()
            .filter(|t| self.filter.matches(&t.name))
            .collect()
    }

    pub fn current(&self) -> Option<&TopicInfo> {
        self.visible().get(self.cursor).copied()
    }

    pub fn select_previous(&mut self) {
        step_up(&mut self.cursor);
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        step_down(&mut self.cursor, len);
    }

    pub fn set_topics(&mut self, topics: Vec<TopicInfo>) {
        self.topics = topics;
        self.loading = false;
        self.refit_cursor();
    }

    pub fn set_selected(&mut self, name: Option<String>) {
        self.selected = name;
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.as_deref() == Some(name)
    }

    /// Updates the live filter; the cursor follows the shrinking list.
    pub fn set_filter(&mut self, text: &str) {
        self.filter.set(text);
        self.refit_cursor();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.refit_cursor();
    }

    /// Leaves any sub-mode. The committed filter stays.
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
