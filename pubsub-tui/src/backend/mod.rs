//!
//! src/backend/mod.rs
//! Backend layer: everything the UI needs from outside the process
//!
//!
//! Module structure:
//!     src/backend/mod.rs
//!         mod bootstrap;          // CLI + env + file → Settings → ClientConfig
//!         mod config_service;     // config.json
//!         mod templates;          // *.json message templates
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Startup
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     Cli::parse()
//!         ↓
//!     JsonConfigService::load()           {config_dir}/pubsub-tui/config.json
//!         ↓
//!     Settings::resolve(cli, file, env)   CLI > environment > file > defaults
//!         ↓
//!     connect(&settings).await            gcloud fills a missing project/token
//!         ↓
//!     pubsub_tui_client::create_client(connection.client)
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! Templates
//! ═══════════════════════════════════════════════════════════════════════════
//!
//!     The publisher lists *.json files in the templates directory and reads
//!     the highlighted one. Both run as tasks; the UI thread never touches
//!     the file system.
//!

mod bootstrap;
mod config_service;
mod templates;

pub use bootstrap::{connect, Settings};
pub use config_service::{ConfigService, JsonConfigService};
pub use templates::{list_json_files, read_template, TemplateFile};
