/// Pretty-prints JSON payloads; anything else is returned as lossy text.
pub fn pretty_json(data: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(data)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(data).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_json() {
        let out = pretty_json(br#"{"a":1,"b":[true]}"#);
        assert!(out.contains("\n  \"a\": 1"));
    }

    #[test]
    fn falls_back_to_raw_text() {
        assert_eq!(pretty_json(b"not json {"), "not json {");
    }
}
