//! Activity log, newest at the bottom

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::App;
use crate::view::theme::{colors, Styles};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    let block = Block::default()
        .title(" Activity ")
        .title_style(Styles::title(false))
        .borders(Borders::ALL)
        .border_style(Styles::border(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = usize::from(inner.height);
    let entries = app.activity.entries();
    let skip = entries.len().saturating_sub(rows);

    let lines: Vec<Line> = entries
        .skip(skip)
        .map(|entry| {
            let color = c.log_level(entry.level);
            Line::from(vec![
                Span::styled(format!("{} ", entry.timestamp()), Styles::muted()),
                Span::styled(
                    format!("{:<4} ", entry.level.label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
