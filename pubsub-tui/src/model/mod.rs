//!
//! src/model/mod.rs
//! Model layer: application state
//!
//! The model is the single source of truth for what the screen shows. It
//! holds plain data and small mutators; deciding *when* to mutate is the
//! update layer's job, and reading it is the view layer's.
//!
//!
//! Module structure:
//!     src/model/mod.rs
//!         mod app;        // App, the root of all state
//!         mod focus;      // FocusPanel, the four focusable regions
//!         pub mod state;  // per-region state
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 1. App
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     pub struct App {
//!         focus: FocusPanel,                      // exactly one region
//!         selected_topic: Option<String>,         // scopes every region
//!         stream: Option<SubscriptionHandle>,     // the single live stream
//!
//!         topics, subscriptions, publisher, subscriber, activity
//!     }
//!
//!     Created once in main.rs, mutated only by update::update(), read
//!     by view::render().
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 2. Regions
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     ┌──────────────┬────────────────────────────┐
//!     │ 1 Topics     │ 3 Publisher                │
//!     ├──────────────┤                            │
//!     │ 2 Subs       ├────────────────────────────┤
//!     ├──────────────┤ 4 Subscriber               │
//!     │ Activity     │                            │
//!     └──────────────┴────────────────────────────┘
//!
//!     Each region keeps its own sub-mode (filter, create, confirm,
//!     variables). Focusing a region always starts it in its normal mode.
//!
//!     The subscriber keeps at most 100 messages. The activity log keeps
//!     the most recent 500 entries.
//!

mod app;
mod focus;
pub mod state;

pub use app::{App, AppOptions};
pub use focus::FocusPanel;

#[cfg(test)]
pub(crate) use app::tests::test_app;
