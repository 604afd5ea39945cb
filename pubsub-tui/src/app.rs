//!
//! app.rs
//! Main loop
//!
//! Every input reaches the loop through one channel, the inbox:
//!
//!     input thread ──▶ AppMessage::Input / Resize ──┐
//!     task results ──▶ AppMessage::Result ──────────┼──▶ inbox
//!     100 ms interval ─▶ AppMessage::Tick ──────────┘
//!
//! loop {
//!
//!     terminal.draw(|f| view::render(&app, f))       // draw
//!     if app.should_quit { break }
//!     msg = inbox.recv() or the next tick             // wait
//!     tasks = update::update(&mut app, msg)           // the only mutation
//!     executor.spawn(task) for each task              // side effects
//! }
//!
//! Messages are handled strictly one at a time, in arrival order.
//!
//! On the way out the stream scope is cancelled and the loop waits briefly
//! for the ack flushers, so acks and rejects issued just before quitting
//! still reach the service.
//!

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::message::AppMessage;
use crate::model::App;
use crate::task::TaskExecutor;
use crate::update;
use crate::util::Term;
use crate::view;

const TICK_RATE: Duration = Duration::from_millis(100);
const FLUSH_GRACE: Duration = Duration::from_secs(2);

pub async fn run(
    terminal: &mut Term,
    app: &mut App,
    inbox: &mut UnboundedReceiver<AppMessage>,
    executor: &TaskExecutor,
) -> Result<()> {
    let mut ticker = interval(TICK_RATE);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    for task in update::init(app) {
        executor.spawn(task);
    }

    loop {
        terminal.draw(|frame| view::render(app, frame))?;

        if app.should_quit {
            break;
        }

        let msg = tokio::select! {
            msg = inbox.recv() => match msg {
                Some(msg) => msg,
                // Every sender is gone; nothing can wake us again.
                None => break,
            },
            _ = ticker.tick() => AppMessage::Tick,
        };

        let tasks = update::update(app, msg);
        if app.should_quit {
            // Work requested on the way out would only be cancelled.
            continue;
        }
        for task in tasks {
            executor.spawn(task);
        }
    }

    update::shutdown(app);
    executor.shutdown();

    app.ack_flushers.close();
    if timeout(FLUSH_GRACE, app.ack_flushers.wait()).await.is_err() {
        log::warn!(
            "Gave up on {} ack flusher(s) after {FLUSH_GRACE:?}",
            app.ack_flushers.len()
        );
    }
    Ok(())
}
