pub mod types;

use crate::{config::GeminiConfig, error::RelayError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use types::{GenerateContentRequest, parse_response};

pub const MODEL_ID: &str = "gemini-1.5-pro";

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatResult {
    pub response: String,
}

/// Stateless relay to the generateContent endpoint. Safe to share across tasks.
pub struct Gemini {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    log_payloads: bool,
}

impl Gemini {
    pub fn new(config: &GeminiConfig) -> Gemini {
        Gemini {
            client: Client::new(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            endpoint: format!(
                "{}/v1/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                MODEL_ID
            ),
            log_payloads: config.log_payloads,
        }
    }

    pub async fn relay(&self, message: Option<&str>) -> Result<ChatResult, RelayError> {
        info!("Received chat request");

        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => {
                info!("Rejecting chat request: empty message");
                return Err(RelayError::empty_message());
            }
        };

        let Some(api_key) = self.api_key.as_deref() else {
            error!("Gemini API key is not configured");
            return Err(RelayError::MisconfiguredService);
        };

        let request_body = GenerateContentRequest::from_message(message);
        if self.log_payloads {
            if let Ok(json_request) = serde_json::to_string(&request_body) {
                info!("Request body: {json_request}");
            }
        } else {
            debug!("Request body: {} byte message", message.len());
        }

        // The key travels in the query string, so errors are logged without the URL.
        info!(endpoint = %self.endpoint, "Sending request to Gemini API");
        let res = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("HTTP request error: {e}");
                RelayError::UpstreamUnavailable(e.to_string())
            })?;

        let status = res.status();
        let body_text = res.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Error reading response body text: {e}");
            RelayError::UpstreamUnavailable(e.to_string())
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Gemini API error: {body_text}");
            return Err(RelayError::UpstreamError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        if self.log_payloads {
            info!("Raw Gemini API response: {body_text}");
        } else {
            debug!("Raw Gemini API response: {} bytes", body_text.len());
        }

        let parsed = match parse_response(&body_text) {
            Ok(p) => p,
            Err(e) => {
                error!("Error deserializing response: {e}");
                return Err(RelayError::parse_failure(&e));
            }
        };
        if self.log_payloads {
            debug!("Deserialized response: {parsed:?}");
        }

        let Some(candidate) = parsed.as_ref().and_then(|p| p.first_candidate()) else {
            error!("No candidates in Gemini API response");
            return Err(RelayError::EmptyUpstreamResponse);
        };

        // Only the first part of the first candidate is returned.
        let Some(part) = candidate.first_part() else {
            error!("No content parts in Gemini API response");
            return Err(RelayError::invalid_format());
        };

        info!("Successfully processed chat request");
        Ok(ChatResult {
            response: part.text.clone().unwrap_or_default(),
        })
    }
}
