use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::web::models::ErrorResponse;

/// Failures reported back to the chat client.
///
/// The `Display` text is what the client sees; anything carried inside a
/// variant stays in the server log.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid or missing message")]
    InvalidInput,

    #[error("Message cannot be empty")]
    EmptyInput,

    #[error("Message is too long")]
    PayloadTooLarge,

    #[error("Service temporarily unavailable")]
    UpstreamUnavailable(String),
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChatError::InvalidInput | ChatError::EmptyInput => StatusCode::BAD_REQUEST,
            ChatError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ChatError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ChatError::UpstreamUnavailable(detail) = self {
            error!("Error in chat API: {}", detail);
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_detail_is_not_displayed() {
        let err = ChatError::UpstreamUnavailable("task 7 panicked: secret stack".to_string());
        assert_eq!(err.to_string(), "Service temporarily unavailable");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(ChatError::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ChatError::EmptyInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ChatError::EmptyInput.to_string(), "Message cannot be empty");
        assert_eq!(ChatError::PayloadTooLarge.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
