//! Unified error types for gcprobe.
//! Used by: encode, endpoint, handlers, state.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Construction-time: the endpoint was built without an encoder.
    /// Never reaches a request.
    #[error("an encoder is required")]
    MissingEncoder,

    /// Request-time: the injected encoder failed to serialize a sample.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_error_returns_500() {
        let err: serde_json::Error = serde::ser::Error::custom("broken");
        let response = Error::Encode(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_encoder_returns_500() {
        let response = Error::MissingEncoder.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_messages_are_descriptive() {
        assert_eq!(Error::MissingEncoder.to_string(), "an encoder is required");
        let err: serde_json::Error = serde::ser::Error::custom("broken");
        assert_eq!(Error::Encode(err).to_string(), "encoding error: broken");
    }
}
