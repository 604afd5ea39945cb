//! Focus changes

use crate::model::{App, FocusPanel};

/// Moves focus to `target`. Both the region being left and the one being
/// entered drop back to their normal mode.
pub fn focus_region(app: &mut App, target: FocusPanel) {
    reset_mode(app, app.focus);
    app.focus = target;
    reset_mode(app, target);
}

fn reset_mode(app: &mut App, panel: FocusPanel) {
    match panel {
        FocusPanel::Topics => app.topics.reset_mode(),
        FocusPanel::Subscriptions => app.subscriptions.reset_mode(),
        FocusPanel::Publisher => app.publisher.reset_mode(),
        FocusPanel::Subscriber => app.subscriber.reset_mode(),
    }
}
