//!
//! src/event/mod.rs
//! Event layer: terminal input to messages
//!
//!
//! Module structure:
//!     src/event/mod.rs
//!         mod handler;    // polling, translation, the input thread
//!         pub mod keymap; // KeyBinding + DefaultKeymap
//!
//!
//!     crossterm's event reader blocks, so input is read on its own thread:
//!
//!         input thread                          async main loop
//!         ─────────────                         ───────────────
//!         poll_event(100ms)
//!             ↓ Some(Event)
//!         handle_event(event) ─▶ AppMessage ─▶ inbox.recv()
//!                                                   ↓
//!                                               update::update()
//!
//!     Only key presses and resizes are forwarded. Interpreting keys is
//!     left to the update layer, which knows which region has focus.
//!

mod handler;
pub mod keymap;

pub use handler::{handle_event, poll_event, spawn_input_reader};
