//! [4] Subscriber: received messages and the selected message's details

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use pubsub_tui_client::{AckStatus, ReceivedMessage};

use crate::model::state::MAX_RETAINED_MESSAGES;
use crate::model::{App, FocusPanel};
use crate::util::{pretty_json, truncate};
use crate::view::components::panel::{input_line, region_block, split_bottom};
use crate::view::theme::{colors, Styles};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.subscriber;
    let focused = app.focus == FocusPanel::Subscriber;
    let suffix = state
        .subscription
        .as_deref()
        .map(|s| format!("← {s}"))
        .unwrap_or_default();

    let block = region_block(FocusPanel::Subscriber, focused, &suffix);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (body, footer_area) = split_bottom(inner, 1);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(45),
            Constraint::Min(3),
        ])
        .split(body);

    render_header(app, frame, rows[0]);
    render_messages(app, frame, rows[1], focused);
    render_detail(app, frame, rows[2]);

    let c = colors();
    let footer = if state.filtering {
        input_line("/", &state.filter_input)
    } else if let Some(err) = &state.last_error {
        Line::styled(err.clone(), Style::default().fg(c.error))
    } else if state.filter.is_active() {
        Line::styled(format!("Filter: /{}/", state.filter.text()), Styles::muted())
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.subscriber;
    let c = colors();

    let connection = match (&state.subscription, state.connected) {
        (Some(_), true) => Span::styled(
            format!("{} connected", state.spinner_frame()),
            Style::default().fg(c.success),
        ),
        (Some(_), false) => Span::styled("disconnected", Style::default().fg(c.warning)),
        (None, _) => Span::styled("no subscription (Enter on one to start)", Styles::muted()),
    };

    let auto_ack = if state.auto_ack {
        Span::styled(" │ auto-ack ON", Style::default().fg(c.warning))
    } else {
        Span::styled(" │ auto-ack off", Styles::muted())
    };

    let counts = Span::styled(
        format!(
            " │ {}/{} shown, {} received",
            state.messages.len(),
            MAX_RETAINED_MESSAGES,
            state.received
        ),
        Styles::muted(),
    );

    frame.render_widget(Paragraph::new(Line::from(vec![connection, auto_ack, counts])), area);
}

fn render_messages(app: &App, frame: &mut Frame, area: Rect, focused: bool) {
    let state = &app.subscriber;
    let c = colors();
    let visible = state.visible();

    if visible.is_empty() {
        let text = if state.connected {
            "Waiting for messages..."
        } else {
            "No messages"
        };
        frame.render_widget(Paragraph::new(Line::styled(text, Styles::muted())), area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(24));
    let items: Vec<ListItem> = visible
        .iter()
        .map(|msg| {
            let (mark, color) = match msg.status() {
                AckStatus::Acknowledged => ("✓", c.success),
                AckStatus::Pending => ("○", c.warning),
            };
            let preview = msg.data_str().replace('\n', " ");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{mark} "), Style::default().fg(color)),
                Span::styled(format!("{:<9}", msg.short_id()), Style::default().fg(c.fg)),
                Span::styled(
                    format!("{} ", msg.publish_time.format("%H:%M:%S")),
                    Styles::muted(),
                ),
                Span::raw(truncate(&preview, width)),
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
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.subscriber;
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Styles::border(false))
        .title(" Details ")
        .title_style(Styles::muted());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(msg) = state.selected() else {
        return;
    };
    let paragraph = Paragraph::new(detail_lines(msg))
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0));
    frame.render_widget(paragraph, inner);
}

fn detail_lines(msg: &ReceivedMessage) -> Vec<Line<'static>> {
    let c = colors();
    let label = |name: &str| Span::styled(format!("{name:<10}"), Styles::muted());
    let status_color = if msg.is_acknowledged() { c.success } else { c.warning };

    let mut lines = vec![
        Line::from(vec![label("ID"), Span::raw(msg.id.clone())]),
        Line::from(vec![
            label("Published"),
            Span::raw(msg.publish_time.to_rfc3339()),
        ]),
        Line::from(vec![
            label("Status"),
            Span::styled(
                msg.status().label(),
                Style::default().fg(status_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![label("Attempt"), Span::raw(msg.delivery_attempt.to_string())]),
    ];
    for (key, value) in &msg.attributes {
        lines.push(Line::from(vec![label("Attr"), Span::raw(format!("{key}={value}"))]));
    }
    lines.push(Line::from(""));
    lines.extend(
        pretty_json(&msg.data)
            .lines()
            .map(|l| Line::styled(l.to_string(), Style::default().fg(c.fg))),
    );
    lines
}
