//! Descriptor: semantic description of a reconciled request's contract.
//!
//! The inference is delegated to the reasoning service over a
//! size-bounded projection of the request. This stage never fails: any
//! parse or service failure degrades to a sentinel "unknown" structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::prompt::{build_describe_prompt, DESCRIBE_SYSTEM_PROMPT};
use crate::har::classify::truncate_chars;
use crate::reason::extract_json::parse_json_lenient;
use crate::reason::Reasoner;

/// Response samples shown to the descriptor are cut to this many chars.
const RESPONSE_SAMPLE_CAP: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(default = "unknown", rename = "type")]
    pub auth_type: String,
    #[serde(default = "unknown")]
    pub location: String,
    #[serde(default = "unknown")]
    pub key: String,
}

fn unknown() -> String {
    "unknown".to_string()
}

impl Default for Authentication {
    fn default() -> Self {
        Self {
            auth_type: unknown(),
            location: unknown(),
            key: unknown(),
        }
    }
}

/// Structured semantic description of one API request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiDescription {
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,
    #[serde(default)]
    pub authentication: Authentication,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub usage_notes: String,
    #[serde(default)]
    pub response_format: String,
}

impl ApiDescription {
    /// Sentinel returned when no description could be produced.
    pub fn unavailable() -> Self {
        Self {
            parameters: vec![],
            authentication: Authentication::default(),
            description: "No description available".into(),
            usage_notes: "No usage notes available".into(),
            response_format: "Unknown response format".into(),
        }
    }
}

/// Describe one (reconciled) API request. Never raises to the caller.
pub fn describe_api(reasoner: &dyn Reasoner, api_request: &Value) -> ApiDescription {
    let projection = build_projection(api_request);
    let projection_json = match serde_json::to_string_pretty(&projection) {
        Ok(json) => json,
        Err(_) => return ApiDescription::unavailable(),
    };

    let reply = match reasoner.complete(
        DESCRIBE_SYSTEM_PROMPT,
        &build_describe_prompt(&projection_json),
    ) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "description judgment unavailable");
            return ApiDescription::unavailable();
        }
    };

    parse_json_lenient(&reply)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_else(ApiDescription::unavailable)
}

/// Size-bounded projection of the request for the describe prompt: the
/// request side verbatim, the response side sampled.
fn build_projection(api_request: &Value) -> Value {
    let mut projection = serde_json::Map::new();

    for key in ["method", "url", "headers", "query_params", "body"] {
        if let Some(v) = api_request.get(key) {
            if !v.is_null() {
                projection.insert(key.to_string(), v.clone());
            }
        }
    }

    if let Some(sample) = api_request.get("response_body").and_then(Value::as_str) {
        projection.insert(
            "response_sample".to_string(),
            Value::String(truncate_chars(sample, RESPONSE_SAMPLE_CAP)),
        );
    }
    for key in ["response_parsed", "response_content_type"] {
        if let Some(v) = api_request.get(key) {
            if !v.is_null() {
                projection.insert(key.to_string(), v.clone());
            }
        }
    }

    Value::Object(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reason::MockReasoner;

    fn request_value() -> Value {
        serde_json::json!({
            "method": "GET",
            "url": "https://x.com/api/items/42",
            "headers": {"X-Api-Key": "k"},
            "query_params": {"expand": "details"},
            "response_status": 200,
            "response_content_type": "application/json",
            "response_body": "{\"id\": 42, \"name\": \"widget\"}",
            "relevance_score": 23
        })
    }

    #[test]
    fn well_formed_reply_parses_fully() {
        let reasoner = MockReasoner::new(
            r#"{
                "parameters": [{"name": "expand", "description": "detail level", "required": false, "type": "string", "location": "query"}],
                "authentication": {"type": "api_key", "location": "header", "key": "X-Api-Key"},
                "description": "Fetches one item by ID",
                "usage_notes": "None detected",
                "response_format": "JSON object with id and name"
            }"#,
        );
        let desc = describe_api(&reasoner, &request_value());
        assert_eq!(desc.parameters.len(), 1);
        assert_eq!(desc.parameters[0].name, "expand");
        assert_eq!(desc.parameters[0].location, "query");
        assert_eq!(desc.authentication.auth_type, "api_key");
        assert_eq!(desc.authentication.key, "X-Api-Key");
        assert!(desc.description.contains("item"));
    }

    #[test]
    fn reply_with_surrounding_prose_still_parses() {
        let reasoner = MockReasoner::new(
            "Here is my analysis:\n{\"description\": \"Item lookup\", \"parameters\": [], \"authentication\": {\"type\": \"none\", \"location\": \"none\", \"key\": \"none\"}, \"usage_notes\": \"\", \"response_format\": \"JSON\"}\nHope that helps!",
        );
        let desc = describe_api(&reasoner, &request_value());
        assert_eq!(desc.description, "Item lookup");
        assert_eq!(desc.authentication.auth_type, "none");
    }

    #[test]
    fn partial_reply_fills_defaults() {
        let reasoner = MockReasoner::new(r#"{"description": "Just a description"}"#);
        let desc = describe_api(&reasoner, &request_value());
        assert_eq!(desc.description, "Just a description");
        assert!(desc.parameters.is_empty());
        assert_eq!(desc.authentication.auth_type, "unknown");
    }

    #[test]
    fn garbage_reply_yields_sentinel() {
        let reasoner = MockReasoner::new("I don't know what this API does.");
        let desc = describe_api(&reasoner, &request_value());
        assert_eq!(desc.description, "No description available");
        assert_eq!(desc.authentication.auth_type, "unknown");
    }

    #[test]
    fn service_failure_yields_sentinel() {
        let reasoner = MockReasoner::failing();
        let desc = describe_api(&reasoner, &request_value());
        assert_eq!(desc.description, "No description available");
        assert_eq!(desc.response_format, "Unknown response format");
    }

    #[test]
    fn projection_caps_response_sample() {
        let mut value = request_value();
        value["response_body"] = Value::String("r".repeat(5000));
        let projection = build_projection(&value);
        let sample = projection["response_sample"].as_str().unwrap();
        assert!(sample.chars().count() <= RESPONSE_SAMPLE_CAP + "... [truncated]".len());
        assert!(sample.ends_with("... [truncated]"));
    }

    #[test]
    fn projection_keeps_body_verbatim_and_drops_score() {
        let mut value = request_value();
        value["body"] = serde_json::json!({"mime_type": "application/json", "text": "x".repeat(4000), "format": "text"});
        let projection = build_projection(&value);
        assert_eq!(projection["body"]["text"].as_str().unwrap().len(), 4000);
        assert!(projection.get("relevance_score").is_none());
    }
}
