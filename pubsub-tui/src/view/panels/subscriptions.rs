//! [2] Subscriptions

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::model::state::ListMode;
use crate::model::{App, FocusPanel};
use crate::util::truncate;
use crate::view::components::panel::{input_line, region_block, split_bottom, status_line};
use crate::view::theme::{colors, Styles};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.subscriptions;
    let focused = app.focus == FocusPanel::Subscriptions;

    let mut suffix = match &state.topic_filter {
        Some(topic) => format!("({topic})"),
        None => "(all)".to_string(),
    };
    if state.filter.is_active() {
        suffix.push_str(&format!(" /{}/", state.filter.text()));
    }

    let block = region_block(FocusPanel::Subscriptions, focused, &suffix);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (list_area, footer_area) = split_bottom(inner, 1);
    let c = colors();

    let footer = match state.mode {
        ListMode::Filter => input_line("/", &state.input),
        ListMode::Create => input_line("New subscription:", &state.input),
        ListMode::ConfirmDelete => Line::styled(
            format!(
                "Delete {}? (y/n)",
                state.pending_delete.as_deref().unwrap_or_default()
            ),
            Style::default().fg(c.error),
        ),
        ListMode::Normal => state.status.as_ref().map(status_line).unwrap_or_default(),
    };
    frame.render_widget(Paragraph::new(footer), footer_area);

    let visible = state.visible();
    if visible.is_empty() {
        let text = if state.loading {
            "Loading subscriptions..."
        } else if state.topic_filter.is_some() {
            "No subscriptions for this topic"
        } else {
            "No subscriptions"
        };
        frame.render_widget(Paragraph::new(Line::styled(text, Styles::muted())), list_area);
        return;
    }

    let width = usize::from(list_area.width.saturating_sub(2));
    let items: Vec<ListItem> = visible
        .iter()
        .map(|sub| {
            let active = state.is_active(&sub.name);
            let marker = if active { "● " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(c.success)),
                Span::styled(truncate(&sub.name, width), Style::default().fg(c.fg)),
            ];
            // The topic is implied while a topic is selected.
            if state.topic_filter.is_none() {
                spans.push(Span::styled(format!(" → {}", sub.topic), Styles::muted()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).highlight_style(if focused {
        Styles::selected()
    } else {
        Style::default()
    });
    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor));
    frame.render_stateful_widget(list, list_area, &mut list_state);
}
