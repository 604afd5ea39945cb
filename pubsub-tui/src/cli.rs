//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Default, Parser)]
#[command(
    name = "pubsub-tui",
    version,
    about = "Terminal UI for Google Cloud Pub/Sub",
    long_about = "Browse topics and subscriptions, publish JSON templates and stream \
                  messages from a subscription.\n\n\
                  The project is taken from --project, PUBSUB_PROJECT_ID, \
                  GOOGLE_CLOUD_PROJECT, GCLOUD_PROJECT, the config file, or \
                  `gcloud config get-value project`, in that order."
)]
pub struct Cli {
    /// Project to operate on.
    #[arg(long, short = 'p', value_name = "PROJECT_ID")]
    pub project: Option<String>,

    /// Talk to a local emulator instead of the cloud service (host:port).
    #[arg(long, value_name = "HOST:PORT", env = "PUBSUB_EMULATOR_HOST")]
    pub emulator_host: Option<String>,

    /// Directory listed by the publisher panel (default: current directory).
    #[arg(long, short = 't', value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Acknowledge every message as soon as it arrives.
    #[arg(long)]
    pub auto_ack: bool,

    /// Run against an in-process broker; nothing leaves the machine.
    #[arg(long)]
    pub in_memory: bool,

    /// Log filter written to the log file (e.g. `debug`, `pubsub_tui_client=trace`).
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Config file to read instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "pubsub-tui",
            "--project",
            "demo",
            "--auto-ack",
            "--templates-dir",
            "msgs",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.project.as_deref(), Some("demo"));
        assert!(cli.auto_ack);
        assert!(!cli.in_memory);
        assert_eq!(cli.templates_dir, Some(PathBuf::from("msgs")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
