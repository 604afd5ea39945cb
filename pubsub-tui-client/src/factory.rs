use std::sync::Arc;

use crate::error::Result;
use crate::providers::{Endpoint, InMemoryPubSub, RestPubSub};
use crate::traits::PubSubClient;

/// How to reach the messaging service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientConfig {
    Rest {
        project_id: String,
        endpoint: Endpoint,
        access_token: Option<String>,
    },
    /// In-process broker, nothing leaves the process.
    InMemory { project_id: String },
}

/// Creates a client instance from its configuration.
pub fn create_client(config: ClientConfig) -> Result<Arc<dyn PubSubClient>> {
    match config {
        ClientConfig::Rest {
            project_id,
            endpoint,
            access_token,
        } => {
            log::info!("Using {} for project {project_id}", endpoint.base_url());
            Ok(Arc::new(RestPubSub::new(
                project_id,
                &endpoint,
                access_token,
            )?))
        }
        ClientConfig::InMemory { project_id } => {
            log::info!("Using in-memory broker for project {project_id}");
            Ok(Arc::new(InMemoryPubSub::new(project_id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_in_memory_client() {
        let client = create_client(ClientConfig::InMemory {
            project_id: "demo".to_string(),
        })
        .unwrap();
        assert_eq!(client.project_id(), "demo");
    }

    #[test]
    fn creates_emulator_client() {
        let client = create_client(ClientConfig::Rest {
            project_id: "local".to_string(),
            endpoint: Endpoint::Emulator("localhost:8085".to_string()),
            access_token: None,
        })
        .unwrap();
        assert_eq!(client.project_id(), "local");
    }
}
