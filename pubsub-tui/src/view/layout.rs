//! Screen layout

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::model::App;

use super::components;
use super::panels;

/// Narrowest the left column gets before taking a third of the width.
const MIN_LEFT_WIDTH: u16 = 25;

/// Areas of the six screen parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub topics: Rect,
    pub subscriptions: Rect,
    pub activity: Rect,
    pub publisher: Rect,
    pub subscriber: Rect,
    pub footer: Rect,
}

/// Left column: Topics, Subscriptions, Activity stacked.
/// Right column: Publisher above Subscriber. Footer: two lines.
pub fn areas(size: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(size);

    let left_width = (size.width / 3).max(MIN_LEFT_WIDTH).min(size.width);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(left_width), Constraint::Min(0)])
        .split(rows[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(67)])
        .split(columns[1]);

    Areas {
        topics: left[0],
        subscriptions: left[1],
        activity: left[2],
        publisher: right[0],
        subscriber: right[1],
        footer: rows[1],
    }
}

pub fn render(app: &App, frame: &mut Frame) {
    let areas = areas(frame.area());

    panels::topics::render(app, frame, areas.topics);
    panels::subscriptions::render(app, frame, areas.subscriptions);
    panels::activity::render(app, frame, areas.activity);
    panels::publisher::render(app, frame, areas.publisher);
    panels::subscriber::render(app, frame, areas.subscriber);
    components::statusbar::render(app, frame, areas.footer);

    if app.show_help {
        components::help::render(frame);
    }
}
