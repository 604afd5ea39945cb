//! REST v1 implementation

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::create_http_client;

/// Production API root.
pub const CLOUD_API_BASE: &str = "https://pubsub.googleapis.com/v1";

/// Where requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Cloud,
    /// Local emulator, `host:port` as in `PUBSUB_EMULATOR_HOST`.
    Emulator(String),
}

impl Endpoint {
    pub fn base_url(&self) -> String {
        match self {
            Self::Cloud => CLOUD_API_BASE.to_string(),
            Self::Emulator(host) => {
                let host = host.trim_end_matches('/');
                if host.starts_with("http://") || host.starts_with("https://") {
                    format!("{host}/v1")
                } else {
                    format!("http://{host}/v1")
                }
            }
        }
    }

    pub fn is_emulator(&self) -> bool {
        matches!(self, Self::Emulator(_))
    }
}

/// Pub/Sub client over the REST surface.
pub struct RestPubSub {
    pub(crate) client: Client,
    pub(crate) project_id: String,
    pub(crate) base_url: String,
    pub(crate) access_token: Option<String>,
}

impl RestPubSub {
    /// The token is only attached for [`Endpoint::Cloud`].
    pub fn new(
        project_id: impl Into<String>,
        endpoint: &Endpoint,
        access_token: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            project_id: project_id.into(),
            base_url: endpoint.base_url(),
            access_token: if endpoint.is_emulator() {
                None
            } else {
                access_token
            },
        })
    }
}

impl std::fmt::Debug for RestPubSub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPubSub")
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emulator_base_url() {
        assert_eq!(
            Endpoint::Emulator("localhost:8085".to_string()).base_url(),
            "http://localhost:8085/v1"
        );
        assert_eq!(
            Endpoint::Emulator("http://10.0.0.2:8085/".to_string()).base_url(),
            "http://10.0.0.2:8085/v1"
        );
        assert_eq!(Endpoint::Cloud.base_url(), CLOUD_API_BASE);
    }

    #[test]
    fn token_is_dropped_for_emulator() {
        let client = RestPubSub::new(
            "p",
            &Endpoint::Emulator("localhost:8085".to_string()),
            Some("secret".to_string()),
        )
        .unwrap();
        assert!(client.access_token.is_none());
    }
}
