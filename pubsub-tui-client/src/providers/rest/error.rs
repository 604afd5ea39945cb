//! REST error mapping

use crate::error::{PubSubError, ResourceKind};

use super::types::ErrorEnvelope;

/// What a request was about, for turning status codes into specific variants.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext<'a> {
    pub resource: Option<(ResourceKind, &'a str)>,
}

impl<'a> ErrorContext<'a> {
    pub fn topic(name: &'a str) -> Self {
        Self {
            resource: Some((ResourceKind::Topic, name)),
        }
    }

    pub fn subscription(name: &'a str) -> Self {
        Self {
            resource: Some((ResourceKind::Subscription, name)),
        }
    }
}

/// Maps a non-success HTTP status to a [`PubSubError`].
///
/// Reference: <https://cloud.google.com/pubsub/docs/reference/error-codes>
pub fn map_status(status: u16, body: &str, ctx: ErrorContext<'_>) -> PubSubError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| match env.error.status {
            Some(code) if !env.error.message.is_empty() => format!("{code}: {}", env.error.message),
            Some(code) => code,
            None => env.error.message,
        })
        .unwrap_or_else(|_| body.trim().to_string());

    match (status, ctx.resource) {
        // NOT_FOUND
        (404, Some((resource, name))) => PubSubError::NotFound {
            resource,
            name: name.to_string(),
        },
        // ALREADY_EXISTS
        (409, Some((resource, name))) => PubSubError::AlreadyExists {
            resource,
            name: name.to_string(),
        },
        // INVALID_ARGUMENT
        (400, _) => PubSubError::Validation {
            field: "request".to_string(),
            detail: message,
        },
        _ => PubSubError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_uses_context() {
        let err = map_status(404, "{}", ErrorContext::topic("orders"));
        assert_eq!(
            err,
            PubSubError::NotFound {
                resource: ResourceKind::Topic,
                name: "orders".to_string()
            }
        );
    }

    #[test]
    fn conflict_maps_to_already_exists() {
        let err = map_status(409, "", ErrorContext::subscription("sub-a"));
        assert!(matches!(err, PubSubError::AlreadyExists { .. }));
    }

    #[test]
    fn bad_request_is_validation() {
        let body = r#"{"error":{"code":400,"message":"Invalid resource name","status":"INVALID_ARGUMENT"}}"#;
        let err = map_status(400, body, ErrorContext::default());
        assert_eq!(
            err,
            PubSubError::Validation {
                field: "request".to_string(),
                detail: "INVALID_ARGUMENT: Invalid resource name".to_string()
            }
        );
    }

    #[test]
    fn other_status_keeps_raw_body() {
        let err = map_status(503, "upstream unavailable\n", ErrorContext::default());
        assert_eq!(
            err,
            PubSubError::Api {
                status: 503,
                message: "upstream unavailable".to_string()
            }
        );
    }

    #[test]
    fn not_found_without_context_is_api_error() {
        let err = map_status(404, "", ErrorContext::default());
        assert!(matches!(err, PubSubError::Api { status: 404, .. }));
    }
}
