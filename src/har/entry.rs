//! serde model of a HAR (HTTP Archive) document.
//!
//! Only the fields the pipeline reads are modeled; everything else in the
//! capture is ignored. Absent fields default so partial captures from
//! older browsers still parse.

use serde::Deserialize;

/// Top-level HAR document: `{"log": {"entries": [...]}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarDocument {
    #[serde(default)]
    pub log: HarLog,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<RawEntry>,
}

/// One captured request/response pair. Immutable input — never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub request: HarRequest,
    #[serde(default)]
    pub response: HarResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarRequest {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
    #[serde(default, rename = "queryString")]
    pub query_string: Vec<HarParam>,
    #[serde(default, rename = "postData")]
    pub post_data: Option<HarPostData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
    #[serde(default)]
    pub content: Option<HarContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarHeader {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarParam {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarPostData {
    #[serde(default, rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub params: Vec<HarParam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarContent {
    #[serde(default)]
    pub text: Option<String>,
}

impl RawEntry {
    /// The response's content-type header value, matched case-insensitively.
    pub fn response_content_type(&self) -> Option<&str> {
        self.response
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case("content-type"))
            .map(|h| h.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let doc: HarDocument = serde_json::from_str(
            r#"{"log":{"entries":[{"request":{"method":"GET","url":"https://x.com/api/a"},"response":{"status":200,"headers":[{"name":"Content-Type","value":"application/json"}]}}]}}"#,
        )
        .unwrap();
        assert_eq!(doc.log.entries.len(), 1);
        let entry = &doc.log.entries[0];
        assert_eq!(entry.request.method, "GET");
        assert_eq!(entry.response.status, 200);
        assert_eq!(
            entry.response_content_type(),
            Some("application/json")
        );
    }

    #[test]
    fn missing_log_defaults_to_no_entries() {
        let doc: HarDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.log.entries.is_empty());
    }

    #[test]
    fn content_type_lookup_is_case_insensitive() {
        let entry: RawEntry = serde_json::from_str(
            r#"{"response":{"headers":[{"name":"content-TYPE","value":"text/html"}]}}"#,
        )
        .unwrap();
        assert_eq!(entry.response_content_type(), Some("text/html"));
    }

    #[test]
    fn no_content_type_header_returns_none() {
        let entry: RawEntry = serde_json::from_str(
            r#"{"response":{"headers":[{"name":"Server","value":"nginx"}]}}"#,
        )
        .unwrap();
        assert_eq!(entry.response_content_type(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let doc: HarDocument = serde_json::from_str(
            r#"{"log":{"version":"1.2","creator":{"name":"browser"},"entries":[]}}"#,
        )
        .unwrap();
        assert!(doc.log.entries.is_empty());
    }
}
