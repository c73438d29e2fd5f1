// Payload and responses types for the generateContent endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Part {
    pub text: String,
}

// Sampling settings sent with every request. Not user-controlled.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    pub const FIXED: GenerationConfig = GenerationConfig {
        temperature: 0.9,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 1024,
    };
}

impl GenerateContentRequest {
    // Wrap the message, untouched, as the only part of the only content entry.
    pub fn from_message(message: &str) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
            generation_config: GenerationConfig::FIXED,
        }
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================
//
// Field names are matched after folding every object key to lowercase, so the
// struct fields below are the lowercase spelling of the wire names.

// Piece of response content, usually contains text.
#[derive(Deserialize, Serialize, Debug)]
pub struct ResponsePart {
    pub text: Option<String>,

    // Catch-all for any other unexpected fields.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

// Content wrapper in a candidate.
#[derive(Deserialize, Serialize, Debug)]
pub struct ResponseContent {
    pub parts: Option<Vec<ResponsePart>>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

// Candidate from the model (one of possible completions).
#[derive(Deserialize, Serialize, Debug)]
pub struct Candidate {
    pub content: Option<ResponseContent>,

    // Candidate-level extras (finishReason, safetyRatings, ...).
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

// Top-level response for generateContent.
#[derive(Deserialize, Serialize, Debug)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,

    // Usage metadata, model version, prompt feedback.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

// =============================================================================
// HELPER IMPLEMENTATIONS
// =============================================================================

/// Parse a raw generateContent body. A literal `null` body parses to `None`.
pub fn parse_response(body: &str) -> Result<Option<GenerateContentResponse>, serde_json::Error> {
    let raw: Value = serde_json::from_str(body)?;
    serde_json::from_value(fold_keys(raw))
}

// Lowercase every object key, recursively. String values are left alone.
fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), fold_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

impl GenerateContentResponse {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.as_ref().and_then(|c| c.first())
    }
}

impl Candidate {
    // First part of this candidate's content, if the content has any parts.
    pub fn first_part(&self) -> Option<&ResponsePart> {
        self.content
            .as_ref()
            .and_then(|c| c.parts.as_ref())
            .and_then(|p| p.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_matches_wire_shape() {
        let req = GenerateContentRequest::from_message("  hi there ");
        let v = serde_json::to_value(&req).unwrap();

        assert_eq!(
            v,
            json!({
                "contents": [{ "parts": [{ "text": "  hi there " }] }],
                "generationConfig": {
                    "temperature": 0.9,
                    "topK": 40,
                    "topP": 0.95,
                    "maxOutputTokens": 1024
                }
            })
        );
    }

    #[test]
    fn parse_ignores_unknown_fields() {
        let body = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "ok" }], "role": "model" },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": { "totalTokenCount": 7 },
            "modelVersion": "gemini-1.5-pro-002"
        }"#;

        let parsed = parse_response(body).unwrap().unwrap();
        let part = parsed.first_candidate().unwrap().first_part().unwrap();
        assert_eq!(part.text.as_deref(), Some("ok"));
        assert!(parsed.other.contains_key("modelversion"));
    }

    #[test]
    fn parse_is_case_insensitive_on_keys() {
        let body = r#"{"Candidates":[{"CONTENT":{"Parts":[{"Text":"MiXeD"}]}}]}"#;

        let parsed = parse_response(body).unwrap().unwrap();
        let part = parsed.first_candidate().unwrap().first_part().unwrap();
        // only keys are folded, never values
        assert_eq!(part.text.as_deref(), Some("MiXeD"));
    }

    #[test]
    fn parse_tolerates_missing_levels() {
        let parsed = parse_response("{}").unwrap().unwrap();
        assert!(parsed.first_candidate().is_none());

        let parsed = parse_response(r#"{"candidates":[{}]}"#).unwrap().unwrap();
        assert!(parsed.first_candidate().unwrap().first_part().is_none());

        let parsed = parse_response(r#"{"candidates":[{"content":{"parts":[]}}]}"#)
            .unwrap()
            .unwrap();
        assert!(parsed.first_candidate().unwrap().first_part().is_none());
    }

    #[test]
    fn parse_null_body_is_none() {
        assert!(parse_response("null").unwrap().is_none());
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(parse_response("not json").is_err());
        assert!(parse_response(r#"{"candidates":"nope"}"#).is_err());
        assert!(parse_response(r#"{"candidates":[{"content":{"parts":[{"text":5}]}}]}"#).is_err());
    }

    #[test]
    fn serialized_response_parses_back() {
        let resp = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(ResponseContent {
                    parts: Some(vec![ResponsePart {
                        text: Some("hello".into()),
                        other: Map::new(),
                    }]),
                    other: Map::new(),
                }),
                other: Map::new(),
            }]),
            other: Map::new(),
        };

        let body = serde_json::to_string(&resp).unwrap();
        let parsed = parse_response(&body).unwrap().unwrap();
        let part = parsed.first_candidate().unwrap().first_part().unwrap();
        assert_eq!(part.text.as_deref(), Some("hello"));
    }
}
