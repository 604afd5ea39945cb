//! Building blocks shared by the panels

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::model::state::{RegionStatus, TextInput};
use crate::model::FocusPanel;
use crate::view::theme::{colors, Styles};

/// Bordered block titled `[n] Title`, highlighted when focused.
pub fn region_block(panel: FocusPanel, focused: bool, suffix: &str) -> Block<'static> {
    let title = if suffix.is_empty() {
        format!(" [{}] {} ", panel.number(), panel.title())
    } else {
        format!(" [{}] {} {suffix} ", panel.number(), panel.title())
    };
    Block::default()
        .title(title)
        .title_style(Styles::title(focused))
        .borders(Borders::ALL)
        .border_style(Styles::border(focused))
}

/// Text input with a block cursor.
pub fn input_line(label: &str, input: &TextInput) -> Line<'static> {
    let c = colors();
    let value = input.value();
    let split = value
        .char_indices()
        .nth(input.cursor())
        .map_or(value.len(), |(idx, _)| idx);
    let (before, rest) = value.split_at(split);
    let mut chars = rest.chars();
    let at_cursor = chars.next().map_or_else(|| " ".to_string(), String::from);
    let after: String = chars.collect();

    Line::from(vec![
        Span::styled(format!("{label} "), Style::default().fg(c.highlight)),
        Span::raw(before.to_string()),
        Span::styled(at_cursor, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(after),
    ])
}

pub fn status_line(status: &RegionStatus) -> Line<'static> {
    Line::styled(status.text.clone(), Styles::status(status.is_error))
}

/// Splits off the bottom `rows` of `area`, returning `(body, footer)`.
pub fn split_bottom(area: Rect, rows: u16) -> (Rect, Rect) {
    let rows = rows.min(area.height);
    let body = Rect::new(area.x, area.y, area.width, area.height - rows);
    let footer = Rect::new(area.x, area.y + area.height - rows, area.width, rows);
    (body, footer)
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
