//! Best-effort JSON extraction from model replies.

use serde::de::DeserializeOwned;

/// A model reply, classified by whether it carried a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    /// A JSON object was found and parsed.
    Json(serde_json::Value),
    /// No parseable JSON object; the raw text.
    Text(String),
}

impl AgentReply {
    /// Returns true when no JSON could be extracted.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns the parsed JSON, if any.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Reads a string field of the JSON object.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.as_json()?.get(key)?.as_str()
    }

    /// Deserializes the JSON object into `T`.
    #[must_use]
    pub fn parse<T: DeserializeOwned>(&self) -> Option<T> {
        self.as_json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Extracts the span from the first `{` to the last `}` and parses it.
///
/// Anything that does not yield a JSON object falls back to
/// [`AgentReply::Text`] with the untouched reply.
#[must_use]
pub fn extract_json_reply(text: &str) -> AgentReply {
    let span = text
        .find('{')
        .zip(text.rfind('}'))
        .filter(|(start, end)| start < end)
        .map(|(start, end)| &text[start..=end]);

    match span.map(serde_json::from_str::<serde_json::Value>) {
        Some(Ok(value)) if value.is_object() => AgentReply::Json(value),
        _ => AgentReply::Text(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_extracts_embedded_object() {
        let reply = extract_json_reply(
            "Here is the post:\n```json\n{\"title\": \"Intro\", \"content\": \"# Intro\\n{body}\"}\n```",
        );

        assert!(!reply.is_degraded());
        assert_eq!(reply.str_field("title"), Some("Intro"));
        assert_eq!(reply.str_field("content"), Some("# Intro\n{body}"));
    }

    #[test]
    fn test_plain_text_is_degraded() {
        let reply = extract_json_reply("Sorry, I could not do that.");
        assert_eq!(reply, AgentReply::Text("Sorry, I could not do that.".to_string()));
        assert!(reply.is_degraded());
    }

    #[test]
    fn test_invalid_json_keeps_raw_text() {
        let raw = "{not json} trailing";
        assert_eq!(extract_json_reply(raw), AgentReply::Text(raw.to_string()));
        assert!(extract_json_reply("} backwards {").is_degraded());
    }

    #[test]
    fn test_parse_into_type() {
        #[derive(Deserialize)]
        struct Post {
            title: String,
        }

        let reply = extract_json_reply(r#"{"title": "Deep Dive"}"#);
        let post: Post = reply.parse().unwrap();
        assert_eq!(post.title, "Deep Dive");
        assert!(reply.parse::<Vec<u8>>().is_none());
    }
}
