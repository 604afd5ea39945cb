//! Terminal event translation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc::UnboundedSender;

use crate::message::AppMessage;

/// Input polling interval of the reader thread.
const INPUT_POLL: Duration = Duration::from_millis(100);

pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Translates a terminal event into a message.
pub fn handle_event(event: Event) -> AppMessage {
    match event {
        // Press only: Windows terminals also report Release and Repeat.
        Event::Key(key) if key.kind == KeyEventKind::Press => AppMessage::Input(key),
        Event::Resize(width, height) => AppMessage::Resize { width, height },
        _ => AppMessage::Noop,
    }
}

/// Reads terminal input on a dedicated thread until `stop` is set or the
/// inbox closes. crossterm's reader is blocking, so it stays off the
/// runtime.
pub fn spawn_input_reader(
    inbox: UnboundedSender<AppMessage>,
    stop: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                match poll_event(INPUT_POLL) {
                    Ok(Some(event)) => {
                        let msg = handle_event(event);
                        if matches!(msg, AppMessage::Noop) {
                            continue;
                        }
                        if inbox.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Reading terminal input failed: {e}");
                        break;
                    }
                }
            }
            log::debug!("Input reader stopped");
        })
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    use super::*;

    #[test]
    fn only_presses_become_input() {
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(matches!(handle_event(Event::Key(press)), AppMessage::Input(_)));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(matches!(handle_event(Event::Key(release)), AppMessage::Noop));
    }

    #[test]
    fn resize_carries_dimensions() {
        assert!(matches!(
            handle_event(Event::Resize(120, 40)),
            AppMessage::Resize {
                width: 120,
                height: 40
            }
        ));
        assert!(matches!(handle_event(Event::FocusGained), AppMessage::Noop));
    }
}
