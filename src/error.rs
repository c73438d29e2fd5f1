use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Every way a chat relay can fail. Each variant maps to one HTTP response.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("API key is not configured")]
    MisconfiguredService,
    /// Non-success status from the provider, forwarded as-is.
    #[error("upstream returned {status}: {body}")]
    UpstreamError { status: u16, body: String },
    #[error("Failed to reach Gemini API: {0}")]
    UpstreamUnavailable(String),
    #[error("{0}")]
    MalformedUpstreamResponse(String),
    #[error("No response from Gemini API")]
    EmptyUpstreamResponse,
}

impl RelayError {
    pub fn empty_message() -> Self {
        RelayError::InvalidInput("Message cannot be empty".into())
    }

    pub fn invalid_format() -> Self {
        RelayError::MalformedUpstreamResponse("Invalid response format from Gemini API".into())
    }

    pub fn parse_failure(err: &serde_json::Error) -> Self {
        RelayError::MalformedUpstreamResponse(format!("Error processing response: {err}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            RelayError::MisconfiguredService
            | RelayError::MalformedUpstreamResponse(_)
            | RelayError::EmptyUpstreamResponse => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            RelayError::UpstreamError { body, .. } => (status, body).into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: RelayError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn upstream_error_is_passed_through() {
        let (status, body) = body_of(RelayError::UpstreamError {
            status: 429,
            body: "rate limited".into(),
        })
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body, "rate limited");
    }

    #[tokio::test]
    async fn local_errors_carry_plain_text_reason() {
        assert_eq!(
            body_of(RelayError::empty_message()).await,
            (StatusCode::BAD_REQUEST, "Message cannot be empty".into())
        );
        assert_eq!(
            body_of(RelayError::MisconfiguredService).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key is not configured".into()
            )
        );
        assert_eq!(
            body_of(RelayError::EmptyUpstreamResponse).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No response from Gemini API".into()
            )
        );
        assert_eq!(
            body_of(RelayError::invalid_format()).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid response format from Gemini API".into()
            )
        );
    }

    #[test]
    fn unknown_upstream_status_falls_back_to_bad_gateway() {
        let err = RelayError::UpstreamError {
            status: 1000,
            body: String::new(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
