use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::ExtractionError;

const FENCE: &str = "```";

/// Remove a surrounding Markdown code fence (and its `json` language tag)
/// from a model reply. Text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix(FENCE) {
        s = rest;
        if s.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            s = &s[4..];
        }
    }
    if let Some(rest) = s.trim_end().strip_suffix(FENCE) {
        s = rest;
    }
    s.trim()
}

/// The substring from the first `{` to the last `}`, inclusive.
pub fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Extract one JSON object of type `T` from a model reply.
///
/// The reply may be wrapped in a code fence or surrounded by prose; only the
/// span between the first `{` and the last `}` is parsed.
#[instrument(target = "apptitude::json", skip(text), fields(text_len = text.len()))]
pub fn extract_object<T: DeserializeOwned>(text: &str) -> Result<T, ExtractionError> {
    let body = strip_code_fences(text);
    let span = object_span(body).ok_or(ExtractionError::NoObject)?;
    debug!(target: "apptitude::json", span_len = span.len(), "located JSON object");
    Ok(serde_json::from_str(span)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_language_tag() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```JSON {\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn span_needs_both_braces_in_order() {
        assert_eq!(object_span("x {\"a\":{\"b\":2}} y"), Some("{\"a\":{\"b\":2}}"));
        assert_eq!(object_span("no braces"), None);
        assert_eq!(object_span("} backwards {"), None);
        assert_eq!(object_span("{ unterminated"), None);
    }
}
