//! [3] Publisher: template list and substituted preview

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::model::{App, FocusPanel};
use crate::util::truncate;
use crate::view::components::panel::{input_line, region_block, split_bottom, status_line};
use crate::view::theme::{colors, Styles};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.publisher;
    let focused = app.focus == FocusPanel::Publisher;
    let suffix = match &state.target_topic {
        Some(topic) => format!("→ {topic}"),
        None => "(no topic selected)".to_string(),
    };

    let block = region_block(FocusPanel::Publisher, focused, &suffix);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (body, footer_area) = split_bottom(inner, 2);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(body);

    render_files(app, frame, columns[0], focused);
    render_preview(app, frame, columns[1]);
    render_footer(app, frame, footer_area);
}

fn render_files(app: &App, frame: &mut Frame, area: Rect, focused: bool) {
    let state = &app.publisher;
    let c = colors();
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Styles::border(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.files.is_empty() {
        let text = if state.loading {
            "Loading..."
        } else {
            "No JSON files"
        };
        frame.render_widget(Paragraph::new(Line::styled(text, Styles::muted())), inner);
        return;
    }

    let width = usize::from(inner.width.saturating_sub(2));
    let items: Vec<ListItem> = state
        .files
        .iter()
        .map(|file| {
            let marker = if state.is_loaded(&file.path) { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(c.success)),
                Span::styled(truncate(&file.name, width), Style::default().fg(c.fg)),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(if focused {
        Styles::selected()
    } else {
        Style::default()
    });
    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor));
    frame.render_stateful_widget(list, inner, &mut list_state);
}

fn render_preview(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.publisher;
    let Some(preview) = state.preview() else {
        frame.render_widget(
            Paragraph::new(Line::styled(" Space to load a template", Styles::muted())),
            area,
        );
        return;
    };

    let paragraph = Paragraph::new(preview)
        .style(Style::default().fg(colors().fg))
        .wrap(Wrap { trim: false })
        .scroll((state.preview_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.publisher;
    let c = colors();

    let variables = if state.editing_variables {
        input_line("Variables:", &state.variables)
    } else if state.variables.is_empty() {
        Line::styled("Variables: none (v to edit)", Styles::muted())
    } else {
        Line::from(vec![
            Span::styled("Variables: ", Styles::muted()),
            Span::raw(state.variables.value().to_string()),
        ])
    };

    let unresolved = state.unresolved_variables();
    let second = if state.publishing {
        Line::styled("Publishing...", Style::default().fg(c.network))
    } else if let Some(status) = &state.status {
        status_line(status)
    } else if !unresolved.is_empty() {
        Line::styled(
            format!("Unresolved: {}", unresolved.join(", ")),
            Style::default().fg(c.warning),
        )
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(vec![variables, second]), area);
}
