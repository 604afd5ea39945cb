//! Key reference overlay

use ratatui::{
    layout::Alignment,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::panel::centered_rect;
use crate::view::theme::{colors, Styles};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Tab / Shift-Tab", "Next / previous region"),
            ("1-4", "Jump to region"),
            ("?", "This help"),
            ("q / Ctrl-C", "Quit"),
        ],
    ),
    (
        "Topics & Subscriptions",
        &[
            ("↑↓ / j k", "Move"),
            ("Enter", "Select topic / start or stop subscription"),
            ("/", "Filter (regex)"),
            ("n", "Create"),
            ("d", "Delete"),
            ("r", "Refresh"),
            ("c", "Show subscriptions of all topics"),
        ],
    ),
    (
        "Publisher",
        &[
            ("↑↓ / Space", "Choose / load template"),
            ("v", "Edit variables (key=value ...)"),
            ("Enter", "Publish to the selected topic"),
            ("r", "Reload templates"),
        ],
    ),
    (
        "Subscriber",
        &[
            ("a", "Acknowledge"),
            ("x", "Reject"),
            ("A", "Toggle auto-ack"),
            ("/", "Filter messages"),
            ("Ctrl-U / Ctrl-D", "Scroll details"),
        ],
    ),
];

pub fn render(frame: &mut Frame) {
    let c = colors();
    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(Line::styled(*title, Styles::title(true)));
        for (key, desc) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<16}"), Styles::hint_key()),
                Span::styled(*desc, Style::default().fg(c.fg)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::styled("Press any key to close", Styles::muted()));

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area = centered_rect(64, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Styles::border(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
