//! Startup resolution: CLI, environment, config file, then gcloud.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pubsub_tui_client::{ClientConfig, Endpoint, ReceiveSettings};
use tokio::process::Command;

use super::config_service::AppConfig;
use crate::cli::Cli;
use crate::view::Theme;

/// Environment variables consulted for the project, in order.
pub const PROJECT_ENV_VARS: [&str; 3] = ["PUBSUB_PROJECT_ID", "GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];
pub const ACCESS_TOKEN_ENV_VAR: &str = "PUBSUB_ACCESS_TOKEN";
const IN_MEMORY_PROJECT: &str = "local";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Everything known before any external command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_id: Option<String>,
    pub emulator_host: Option<String>,
    pub access_token: Option<String>,
    pub templates_dir: PathBuf,
    pub auto_ack: bool,
    pub in_memory: bool,
    pub log_level: String,
    pub theme: Theme,
    pub receive_settings: ReceiveSettings,
}

impl Settings {
    /// Merges sources with precedence CLI > environment > file > defaults.
    ///
    /// `env` is the variable lookup, `std::env::var(..).ok()` in production.
    pub fn resolve(cli: &Cli, file: AppConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let project_id = non_empty(cli.project.clone())
            .or_else(|| PROJECT_ENV_VARS.iter().find_map(|k| non_empty(env(k))))
            .or_else(|| non_empty(file.project_id));

        // clap already folds PUBSUB_EMULATOR_HOST into the flag.
        let emulator_host =
            non_empty(cli.emulator_host.clone()).or_else(|| non_empty(file.emulator_host));

        let mut receive_settings = ReceiveSettings::default();
        if let Some(max) = file.max_outstanding_messages.filter(|m| *m > 0) {
            receive_settings.max_outstanding_messages = max;
        }

        Self {
            project_id,
            emulator_host,
            access_token: non_empty(env(ACCESS_TOKEN_ENV_VAR)),
            templates_dir: cli
                .templates_dir
                .clone()
                .or(file.templates_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            auto_ack: cli.auto_ack || file.auto_ack,
            in_memory: cli.in_memory,
            log_level: cli
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            theme: file.theme,
            receive_settings,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match &self.emulator_host {
            Some(host) => Endpoint::Emulator(host.clone()),
            None => Endpoint::Cloud,
        }
    }
}

/// Project and client configuration ready to build a client from.
#[derive(Debug, Clone)]
pub struct Connection {
    pub project_id: String,
    pub client: ClientConfig,
}

/// Fills in whatever the settings lack by asking `gcloud`.
///
/// The emulator needs no token; the in-memory broker needs neither.
pub async fn connect(settings: &Settings) -> Result<Connection> {
    if settings.in_memory {
        let project_id = settings
            .project_id
            .clone()
            .unwrap_or_else(|| IN_MEMORY_PROJECT.to_string());
        return Ok(Connection {
            client: ClientConfig::InMemory {
                project_id: project_id.clone(),
            },
            project_id,
        });
    }

    let project_id = match &settings.project_id {
        Some(p) => p.clone(),
        None => match gcloud(&["config", "get-value", "project"]).await {
            Some(p) => p,
            None => bail!(
                "no project configured\n\n\
                 Set one of:\n  \
                 1. --project YOUR_PROJECT_ID\n  \
                 2. GOOGLE_CLOUD_PROJECT=YOUR_PROJECT_ID\n  \
                 3. gcloud config set project YOUR_PROJECT_ID"
            ),
        },
    };

    let endpoint = settings.endpoint();
    let access_token = if endpoint.is_emulator() {
        None
    } else {
        match &settings.access_token {
            Some(t) => Some(t.clone()),
            None => Some(
                gcloud(&["auth", "print-access-token"])
                    .await
                    .context(
                        "no access token available\n\n\
                         Authenticate with `gcloud auth login` or set PUBSUB_ACCESS_TOKEN",
                    )?,
            ),
        }
    };

    Ok(Connection {
        client: ClientConfig::Rest {
            project_id: project_id.clone(),
            endpoint,
            access_token,
        },
        project_id,
    })
}

/// Runs `gcloud` and returns its trimmed stdout, or `None` on any failure.
async fn gcloud(args: &[&str]) -> Option<String> {
    let output = match Command::new("gcloud").args(args).output().await {
        Ok(output) => output,
        Err(e) => {
            log::debug!("gcloud {} failed to start: {e}", args.join(" "));
            return None;
        }
    };
    if !output.status.success() {
        log::debug!("gcloud {} exited with {}", args.join(" "), output.status);
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty() && value != "(unset)").then_some(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = AppConfig {
            project_id: Some("from-file".into()),
            ..AppConfig::default()
        };
        let env = env_of(&[("GOOGLE_CLOUD_PROJECT", "from-env")]);

        let cli = Cli {
            project: Some("from-cli".into()),
            ..Cli::default()
        };
        assert_eq!(
            Settings::resolve(&cli, file.clone(), &env).project_id.as_deref(),
            Some("from-cli")
        );

        let cli = Cli::default();
        assert_eq!(
            Settings::resolve(&cli, file.clone(), &env).project_id.as_deref(),
            Some("from-env")
        );

        assert_eq!(
            Settings::resolve(&cli, file, env_of(&[])).project_id.as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn project_env_vars_checked_in_order() {
        let env = env_of(&[
            ("GCLOUD_PROJECT", "third"),
            ("GOOGLE_CLOUD_PROJECT", "second"),
            ("PUBSUB_PROJECT_ID", ""),
        ]);
        let settings = Settings::resolve(&Cli::default(), AppConfig::default(), env);
        assert_eq!(settings.project_id.as_deref(), Some("second"));
    }

    #[test]
    fn defaults() {
        let settings = Settings::resolve(&Cli::default(), AppConfig::default(), env_of(&[]));
        assert_eq!(settings.templates_dir, PathBuf::from("."));
        assert_eq!(settings.log_level, "info");
        assert!(!settings.auto_ack);
        assert_eq!(settings.endpoint(), Endpoint::Cloud);
        assert_eq!(settings.receive_settings, ReceiveSettings::default());
    }

    #[test]
    fn file_supplies_flow_control_and_emulator() {
        let file = AppConfig {
            emulator_host: Some("localhost:8085".into()),
            max_outstanding_messages: Some(10),
            auto_ack: true,
            ..AppConfig::default()
        };
        let settings = Settings::resolve(&Cli::default(), file, env_of(&[]));
        assert_eq!(settings.receive_settings.max_outstanding_messages, 10);
        assert_eq!(settings.endpoint(), Endpoint::Emulator("localhost:8085".into()));
        assert!(settings.auto_ack);
    }

    #[tokio::test]
    async fn emulator_needs_no_token() {
        let cli = Cli {
            project: Some("local".into()),
            emulator_host: Some("localhost:8085".into()),
            ..Cli::default()
        };
        let settings = Settings::resolve(&cli, AppConfig::default(), env_of(&[]));
        let conn = connect(&settings).await.unwrap();
        assert_eq!(conn.project_id, "local");
        assert!(matches!(
            conn.client,
            ClientConfig::Rest {
                access_token: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn in_memory_defaults_project() {
        let cli = Cli {
            in_memory: true,
            ..Cli::default()
        };
        let settings = Settings::resolve(&cli, AppConfig::default(), env_of(&[]));
        let conn = connect(&settings).await.unwrap();
        assert_eq!(conn.project_id, "local");
        assert!(matches!(conn.client, ClientConfig::InMemory { .. }));
    }

    #[tokio::test]
    async fn explicit_token_is_used_for_cloud() {
        let cli = Cli {
            project: Some("p".into()),
            ..Cli::default()
        };
        let env = env_of(&[("PUBSUB_ACCESS_TOKEN", "tok")]);
        let settings = Settings::resolve(&cli, AppConfig::default(), env);
        let conn = connect(&settings).await.unwrap();
        assert!(matches!(
            conn.client,
            ClientConfig::Rest { access_token: Some(ref t), .. } if t == "tok"
        ));
    }
}
