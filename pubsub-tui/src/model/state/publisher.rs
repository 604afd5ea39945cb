//! Publisher region state

use std::path::{Path, PathBuf};

use super::input::TextInput;
use super::list::{clamp, step_down, step_up, RegionStatus};
use crate::backend::TemplateFile;
use crate::util::{find_variables, parse_variables, substitute};

/// A template file read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct PublisherState {
    pub templates_dir: PathBuf,
    pub files: Vec<TemplateFile>,
    pub cursor: usize,
    pub loaded: Option<LoadedTemplate>,
    /// `key=value key2=value2`
    pub variables: TextInput,
    pub editing_variables: bool,
    pub target_topic: Option<String>,
    pub publishing: bool,
    pub loading: bool,
    pub status: Option<RegionStatus>,
    pub preview_scroll: u16,
}

impl PublisherState {
    pub fn new(templates_dir: PathBuf) -> Self {
        Self {
            templates_dir,
            loading: true,
            ..Self::default()
        }
    }

    pub fn current_file(&self) -> Option<&TemplateFile> {
        self.files.get(self.cursor)
    }

    /// Moves the cursor; returns whether it moved.
    pub fn select_previous(&mut self) -> bool {
        let before = self.cursor;
        step_up(&mut self.cursor);
        before != self.cursor
    }

    pub fn select_next(&mut self) -> bool {
        let before = self.cursor;
        step_down(&mut self.cursor, self.files.len());
        before != self.cursor
    }

    pub fn set_files(&mut self, files: Vec<TemplateFile>) {
        self.files = files;
        self.loading = false;
        clamp(&mut self.cursor, self.files.len());
        let still_listed = self
            .loaded
            .as_ref()
            .is_some_and(|t| self.files.iter().any(|f| f.path == t.path));
        if !still_listed {
            self.loaded = None;
        }
    }

    pub fn set_loaded(&mut self, path: PathBuf, content: String) {
        self.loaded = Some(LoadedTemplate { path, content });
        self.preview_scroll = 0;
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.as_ref().is_some_and(|t| t.path == path)
    }

    pub fn set_target_topic(&mut self, topic: Option<String>) {
        self.target_topic = topic;
    }

    /// Template content with the current variables substituted.
    pub fn preview(&self) -> Option<String> {
        let template = self.loaded.as_ref()?;
        Some(substitute(
            &template.content,
            &parse_variables(self.variables.value()),
        ))
    }

    /// Placeholders the current variables leave unresolved.
    pub fn unresolved_variables(&self) -> Vec<String> {
        self.preview()
            .map(|p| find_variables(&p))
            .unwrap_or_default()
    }

    pub fn set_publishing(&mut self, publishing: bool) {
        self.publishing = publishing;
    }

    pub fn reset_mode(&mut self) {
        self.editing_variables = false;
    }

    pub fn is_input_active(&self) -> bool {
        self.editing_variables
    }

    pub fn set_status(&mut self, status: RegionStatus) {
        self.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_substitutes_variables() {
        let mut state = PublisherState::new(PathBuf::from("."));
        assert_eq!(state.preview(), None);

        state.set_loaded(
            PathBuf::from("order.json"),
            r#"{"user":"${user}","env":"${env}"}"#.to_string(),
        );
        state.variables.set("user=ana");
        assert_eq!(
            state.preview().as_deref(),
            Some(r#"{"user":"ana","env":"${env}"}"#)
        );
        assert_eq!(state.unresolved_variables(), vec!["env".to_string()]);
    }

    #[test]
    fn loaded_template_dropped_when_file_disappears() {
        let mut state = PublisherState::new(PathBuf::from("."));
        state.set_loaded(PathBuf::from("gone.json"), "{}".into());
        state.set_files(vec![TemplateFile {
            name: "other.json".into(),
            path: PathBuf::from("other.json"),
            size: 2,
        }]);
        assert!(state.loaded.is_none());
    }
}
