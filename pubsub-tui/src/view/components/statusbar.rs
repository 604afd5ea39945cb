//! Footer: key hints for the focused region and the connection summary

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::state::ListMode;
use crate::model::{App, FocusPanel};
use crate::view::theme::Styles;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (i, (key, desc)) in hints(app).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Styles::hint_key()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*desc, Styles::hint_desc()));
    }

    let topic = app.selected_topic.as_deref().unwrap_or("none");
    let stream = match app.active_subscription() {
        Some(name) => format!("streaming {name}"),
        None => "not streaming".to_string(),
    };
    let summary = format!(
        " {} │ topic: {topic} │ {stream} │ ? help",
        app.connection_label()
    );

    let paragraph = Paragraph::new(vec![Line::from(spans), Line::from(summary)])
        .style(Styles::statusbar());
    frame.render_widget(paragraph, area);
}

fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.is_input_active() {
        return vec![("Enter", "Confirm"), ("Esc", "Cancel")];
    }

    let list_mode = match app.focus {
        FocusPanel::Topics => Some(app.topics.mode),
        FocusPanel::Subscriptions => Some(app.subscriptions.mode),
        _ => None,
    };
    if list_mode == Some(ListMode::ConfirmDelete) {
        return vec![("y", "Delete"), ("n/Esc", "Keep")];
    }

    let mut hints = vec![("Tab", "Region")];
    match app.focus {
        FocusPanel::Topics => {
            hints.push(("Enter", "Select"));
            hints.push(("/", "Filter"));
            hints.push(("n", "New"));
            hints.push(("d", "Delete"));
            hints.push(("r", "Refresh"));
        }
        FocusPanel::Subscriptions => {
            hints.push(("Enter", "Start/Stop"));
            hints.push(("/", "Filter"));
            hints.push(("n", "New"));
            hints.push(("d", "Delete"));
            hints.push(("c", "All topics"));
        }
        FocusPanel::Publisher => {
            hints.push(("Space", "Load"));
            hints.push(("v", "Variables"));
            hints.push(("Enter", "Publish"));
            hints.push(("r", "Reload"));
        }
        FocusPanel::Subscriber => {
            hints.push(("a", "Ack"));
            hints.push(("x", "Reject"));
            hints.push(("A", "Auto-ack"));
            hints.push(("/", "Filter"));
        }
    }
    hints.push(("q", "Quit"));
    hints
}
