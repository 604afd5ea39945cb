//! Regex filters typed by the user

use pubsub_tui_client::PubSubError;
use regex::Regex;

/// Compiles a filter pattern. An empty pattern means "no filter".
pub fn compile_filter(pattern: &str) -> Result<Option<Regex>, PubSubError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern).map(Some).map_err(|e| {
        // The regex crate renders a multi-line diagnostic; the last line
        // carries the actual complaint.
        let text = e.to_string();
        let detail = text
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or(&text)
            .trim()
            .trim_start_matches("error: ")
            .to_string();
        PubSubError::validation("filter", detail)
    })
}

/// A live filter: the text being typed and its compiled form.
///
/// While the text does not compile every item matches and `error` holds
/// the reason.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    text: String,
    regex: Option<Regex>,
    error: Option<PubSubError>,
}

impl Filter {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        match compile_filter(&self.text) {
            Ok(regex) => {
                self.regex = regex;
                self.error = None;
            }
            Err(err) => {
                self.regex = None;
                self.error = Some(err);
            }
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.regex = None;
        self.error = None;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&PubSubError> {
        self.error.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.regex.is_some()
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.regex.as_ref().is_none_or(|re| re.is_match(haystack))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsub_tui_client::ErrorKind;

    #[test]
    fn empty_pattern_is_no_filter() {
        assert!(compile_filter("").unwrap().is_none());
    }

    #[test]
    fn invalid_pattern_is_a_validation_error() {
        let err = compile_filter("orders(").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().starts_with("Invalid filter:"));
    }

    #[test]
    fn invalid_filter_matches_everything() {
        let mut filter = Filter::default();
        filter.set("[a-");
        assert!(filter.error().is_some());
        assert!(!filter.is_active());
        assert!(filter.matches("anything"));
    }

    #[test]
    fn valid_filter_narrows() {
        let mut filter = Filter::default();
        filter.set("^ord");
        assert!(filter.matches("orders"));
        assert!(!filter.matches("billing"));

        filter.clear();
        assert!(filter.matches("billing"));
        assert_eq!(filter.text(), "");
    }
}
