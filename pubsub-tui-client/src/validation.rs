//! Resource identifier rules and name helpers

use crate::error::{PubSubError, ResourceKind, Result};

const MIN_ID_LEN: usize = 3;
const MAX_ID_LEN: usize = 255;

/// Checks a topic or subscription id against the service naming rules.
///
/// An id is 3-255 characters, starts with a letter, contains only
/// `[A-Za-z0-9-._~]` and must not start with `goog`.
pub fn validate_resource_id(kind: ResourceKind, id: &str) -> Result<()> {
    let field = format!("{kind} name");
    let len = id.chars().count();

    if len < MIN_ID_LEN {
        return Err(PubSubError::validation(
            field,
            format!("must be at least {MIN_ID_LEN} characters"),
        ));
    }
    if len > MAX_ID_LEN {
        return Err(PubSubError::validation(
            field,
            format!("must be at most {MAX_ID_LEN} characters"),
        ));
    }
    if !id.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(PubSubError::validation(field, "must start with a letter"));
    }
    if let Some(bad) = id.chars().find(|c| !is_id_char(*c)) {
        return Err(PubSubError::validation(
            field,
            format!("contains invalid character '{bad}'"),
        ));
    }
    if id.to_ascii_lowercase().starts_with("goog") {
        return Err(PubSubError::validation(field, "must not start with 'goog'"));
    }

    Ok(())
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Returns the last path segment of a fully-qualified resource name.
pub fn extract_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn topic_path(project: &str, topic: &str) -> String {
    format!("projects/{project}/topics/{topic}")
}

pub fn subscription_path(project: &str, subscription: &str) -> String {
    format!("projects/{project}/subscriptions/{subscription}")
}
