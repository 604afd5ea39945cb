//! Publisher region

use std::collections::BTreeMap;

use crossterm::event::KeyEvent;
use pubsub_tui_client::PubSubError;

use crate::event::keymap::DefaultKeymap;
use crate::message::{PublisherAction, TemplateResult};
use crate::model::state::{PublisherState, RegionStatus};
use crate::model::App;
use crate::task::Task;

pub fn on_key(app: &mut App, key: KeyEvent) -> Vec<Task> {
    match interpret(&mut app.publisher, &key) {
        Some(action) => apply(app, action),
        None => Vec::new(),
    }
}

fn interpret(state: &mut PublisherState, key: &KeyEvent) -> Option<PublisherAction> {
    if state.editing_variables {
        if DefaultKeymap::CONFIRM.matches(key) {
            return trigger_publish(state);
        }
        if DefaultKeymap::CANCEL.matches(key) {
            state.editing_variables = false;
        } else {
            state.variables.handle_key(key);
        }
        return None;
    }

    if DefaultKeymap::VARIABLES.matches(key) {
        state.editing_variables = true;
    } else if DefaultKeymap::CONFIRM.matches(key) {
        return trigger_publish(state);
    } else if DefaultKeymap::LOAD_FILE.matches(key) {
        return state
            .current_file()
            .map(|f| PublisherAction::LoadFile(f.path.clone()));
    } else if DefaultKeymap::is_up(key) {
        if state.select_previous() {
            return state
                .current_file()
                .map(|f| PublisherAction::LoadFile(f.path.clone()));
        }
    } else if DefaultKeymap::is_down(key) {
        if state.select_next() {
            return state
                .current_file()
                .map(|f| PublisherAction::LoadFile(f.path.clone()));
        }
    } else if DefaultKeymap::REFRESH.matches(key) {
        state.loading = true;
        return Some(PublisherAction::Reload);
    } else if DefaultKeymap::SCROLL_UP.matches(key) {
        state.preview_scroll = state.preview_scroll.saturating_sub(1);
    } else if DefaultKeymap::SCROLL_DOWN.matches(key) {
        state.preview_scroll = state.preview_scroll.saturating_add(1);
    }
    None
}

/// Checks, in order: target topic, loaded file, in-flight publish, content.
fn trigger_publish(state: &mut PublisherState) -> Option<PublisherAction> {
    let Some(topic) = state.target_topic.clone() else {
        state.set_status(RegionStatus::error("No topic selected"));
        return None;
    };
    if state.loaded.is_none() {
        state.set_status(RegionStatus::error("No file selected"));
        return None;
    }
    if state.publishing {
        return None;
    }
    let content = state.preview().unwrap_or_default();
    if content.trim().is_empty() {
        state.set_status(RegionStatus::error("No content to publish"));
        return None;
    }

    state.set_publishing(true);
    state.set_status(RegionStatus::info("Publishing..."));
    Some(PublisherAction::Publish {
        topic,
        payload: content.into_bytes(),
    })
}

fn apply(app: &mut App, action: PublisherAction) -> Vec<Task> {
    match action {
        PublisherAction::Publish { topic, payload } => {
            app.activity
                .network(format!("Publishing {} bytes to {topic}", payload.len()));
            vec![Task::Publish {
                topic,
                payload,
                attributes: BTreeMap::new(),
            }]
        }
        PublisherAction::LoadFile(path) => vec![Task::ReadTemplate(path)],
        PublisherAction::Reload => vec![Task::LoadTemplates(app.publisher.templates_dir.clone())],
    }
}

pub fn on_published(app: &mut App, result: Result<String, PubSubError>) -> Vec<Task> {
    app.publisher.set_publishing(false);
    match result {
        Ok(id) => {
            app.publisher
                .set_status(RegionStatus::info(format!("Published: {id}")));
            app.activity.success(format!("Published message: {id}"));
        }
        Err(e) => {
            app.publisher
                .set_status(RegionStatus::error(format!("Publish failed: {e}")));
            app.activity.error(format!("Publish failed: {e}"));
        }
    }
    Vec::new()
}

pub fn on_templates(app: &mut App, result: TemplateResult) -> Vec<Task> {
    let state = &mut app.publisher;
    match result {
        TemplateResult::Listed(Ok(files)) => {
            log::debug!("Found {} templates in {}", files.len(), state.templates_dir.display());
            state.set_files(files);
            if state.files.is_empty() {
                state.set_status(RegionStatus::info(format!(
                    "No JSON files found in {}",
                    state.templates_dir.display()
                )));
                return Vec::new();
            }
            // Load whatever the cursor is on so the preview is never blank.
            match state.current_file() {
                Some(file) if !state.is_loaded(&file.path) => {
                    vec![Task::ReadTemplate(file.path.clone())]
                }
                _ => Vec::new(),
            }
        }
        TemplateResult::Listed(Err(e)) => {
            state.loading = false;
            state.set_status(RegionStatus::error(format!("Error loading files: {e}")));
            app.activity.error(format!("Error loading files: {e}"));
            Vec::new()
        }
        TemplateResult::Loaded { path, result } => {
            // A read for a file the cursor has since left is stale.
            if state.current_file().is_none_or(|f| f.path != path) {
                return Vec::new();
            }
            match result {
                Ok(content) => state.set_loaded(path, content),
                Err(e) => {
                    let msg = format!("Failed to read {}: {e}", path.display());
                    state.set_status(RegionStatus::error(msg.clone()));
                    app.activity.error(msg);
                }
            }
            Vec::new()
        }
    }
}
