//!
//! src/util/mod.rs
//! Util layer: infrastructure with no knowledge of the application
//!
//!
//! Module structure:
//!     src/util/mod.rs
//!         mod terminal;   // raw mode + alternate screen, and the way back
//!         mod logging;    // tracing subscriber writing to a rolling file
//!         mod filter;     // user-typed regex filters
//!         mod json;       // pretty-printing of payloads
//!         mod template;   // `${KEY}` substitution for the publisher
//!         mod text;       // width-aware truncation
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Terminal
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     pub type Term = Terminal<CrosstermBackend<Stdout>>;
//!
//!     init_terminal() enables raw mode and switches to the alternate
//!     screen. restore_terminal() undoes both and is called by main.rs
//!     whether or not the loop returned an error.
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Logging
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     stdout belongs to the TUI, so log records go to
//!
//!         {data_dir}/pubsub-tui/logs/pubsub-tui.log.YYYY-MM-DD
//!
//!     init_logging() returns a WorkerGuard. Dropping it flushes the
//!     background writer, so main.rs keeps it alive until exit.
//!

mod filter;
mod json;
mod logging;
mod template;
mod terminal;
mod text;

pub use filter::{compile_filter, Filter};
pub use json::pretty_json;
pub use logging::{default_log_dir, init_logging};
pub use template::{find_variables, parse_variables, substitute, Variable};
pub use terminal::{init_terminal, restore_terminal, Term};
pub use text::truncate;
