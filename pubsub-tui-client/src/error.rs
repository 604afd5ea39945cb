use serde::{Deserialize, Serialize};

/// Which kind of resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Topic,
    Subscription,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic => f.write_str("topic"),
            Self::Subscription => f.write_str("subscription"),
        }
    }
}

/// Coarse error classes surfaced to the UI.
///
/// Every [`PubSubError`] maps onto exactly one of these via [`PubSubError::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or API failure.
    Transport,
    /// Malformed resource name or filter pattern.
    Validation,
    /// The streaming connection ended unexpectedly.
    StreamTerminal,
}

/// Unified error type for all messaging-service operations.
///
/// All variants are serializable for structured error reporting.
/// None of them is retried automatically; the operator re-triggers the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum PubSubError {
    /// The request never produced a response (connection refused, timeout, DNS, ...).
    Transport {
        /// Error details.
        detail: String,
    },

    /// The service answered with a non-success status not mapped to a specific variant.
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// The addressed topic or subscription does not exist.
    NotFound {
        /// Kind of the missing resource.
        resource: ResourceKind,
        /// Short name of the missing resource.
        name: String,
    },

    /// A topic or subscription with this name already exists.
    AlreadyExists {
        /// Kind of the conflicting resource.
        resource: ResourceKind,
        /// Short name of the conflicting resource.
        name: String,
    },

    /// A resource identifier or filter pattern is malformed.
    Validation {
        /// What was being validated.
        field: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to decode the service's response.
    Parse {
        /// Details about the parse failure.
        detail: String,
    },

    /// The streaming connection for a subscription ended and must be restarted explicitly.
    StreamTerminal {
        /// Subscription whose stream ended.
        subscription: String,
        /// Underlying cause.
        detail: String,
    },
}

impl PubSubError {
    /// Maps the variant onto the three error classes shown to the operator.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::StreamTerminal { .. } => ErrorKind::StreamTerminal,
            Self::Transport { .. }
            | Self::Api { .. }
            | Self::NotFound { .. }
            | Self::AlreadyExists { .. }
            | Self::Parse { .. } => ErrorKind::Transport,
        }
    }

    /// Whether the error is caused by operator input rather than the environment.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Keep this in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::AlreadyExists { .. } | Self::Validation { .. }
        )
    }

    pub fn validation(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl ToString) -> Self {
        Self::Transport {
            detail: detail.to_string(),
        }
    }

    pub fn parse(detail: impl ToString) -> Self {
        Self::Parse {
            detail: detail.to_string(),
        }
    }
}

impl std::fmt::Display for PubSubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { detail } => write!(f, "Transport error: {detail}"),
            Self::Api { status, message } => write!(f, "API error ({status}): {message}"),
            Self::NotFound { resource, name } => {
                write!(f, "{resource} '{name}' does not exist")
            }
            Self::AlreadyExists { resource, name } => {
                write!(f, "{resource} '{name}' already exists")
            }
            Self::Validation { field, detail } => write!(f, "Invalid {field}: {detail}"),
            Self::Parse { detail } => write!(f, "Parse error: {detail}"),
            Self::StreamTerminal {
                subscription,
                detail,
            } => write!(f, "Stream for '{subscription}' ended: {detail}"),
        }
    }
}

impl std::error::Error for PubSubError {}

/// Convenience type alias for `Result<T, PubSubError>`.
pub type Result<T> = std::result::Result<T, PubSubError>;
