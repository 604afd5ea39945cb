//!
//! src/view/mod.rs
//! View layer: rendering
//!
//! view::render() reads the model and draws one frame. It never mutates
//! state and is called once per main-loop iteration.
//!
//!
//! Module structure:
//!     src/view/mod.rs
//!         mod layout;         // areas(), the screen split
//!         mod theme;          // Theme, colors(), Styles
//!         mod components;     // region block, input line, footer, help
//!         mod panels;         // one file per region
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Layout
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     ┌ [1] Topics ──────┐┌ [3] Publisher → orders ──────────────────┐
//!     │ ● orders         ││ order.json   │ { "id": "7" }            │
//!     │   users          ││              │                          │
//!     └──────────────────┘│ Variables: id=7                          │
//!     ┌ [2] Subscriptions┐└──────────────────────────────────────────┘
//!     │ ● orders-sub     │┌ [4] Subscriber ← orders-sub ─────────────┐
//!     └──────────────────┘│ ⠋ connected │ auto-ack off │ 3/100 ...   │
//!     ┌ Activity ────────┐│ ✓ 4711     12:00:01 {"id": "7"}          │
//!     │ 12:00:01 OK  ... ││ ── Details ──                            │
//!     └──────────────────┘└──────────────────────────────────────────┘
//!      Tab Region │ Enter Select │ / Filter │ ...
//!      test-project │ topic: orders │ streaming orders-sub │ ? help
//!
//!     The focused region's border and title use the highlight color.
//!     The activity log never takes focus.
//!

mod components;
mod layout;
mod panels;
mod theme;

pub use layout::render;
pub use theme::{set_theme, Theme};
