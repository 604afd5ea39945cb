//! `${KEY}` templates for the publisher

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

/// Parses whitespace-separated `key=value` pairs.
///
/// Entries without `=`, with an empty key, or with a key outside
/// `[A-Za-z0-9_]` are skipped.
pub fn parse_variables(input: &str) -> Vec<Variable> {
    input
        .split_whitespace()
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            let valid = !key.is_empty()
                && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            valid.then(|| Variable {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

pub fn substitute(content: &str, vars: &[Variable]) -> String {
    vars.iter().fold(content.to_string(), |acc, var| {
        acc.replace(&format!("${{{}}}", var.key), &var.value)
    })
}

/// Placeholder names in order of first appearance.
pub fn find_variables(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = caps[1].to_string();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}
