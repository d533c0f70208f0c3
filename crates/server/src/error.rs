use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use lectern_common::LecternError;
use std::fmt;
use tracing::{error, warn};

use crate::types::ErrorResponse;

/// Handler error rendered as JSON `{error, details}`
#[derive(Debug)]
pub struct ApiError(pub LecternError);

impl From<LecternError> for ApiError {
    fn from(error: LecternError) -> Self {
        Self(error)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ApiError {
    /// Short category shown as `error`
    fn category(&self) -> &'static str {
        match &self.0 {
            LecternError::InvalidInput(_) | LecternError::Json(_) => "Invalid request",
            LecternError::ModelUnavailable(_) => "Model unavailable",
            LecternError::ModelTimeout(_) => "Model timed out",
            LecternError::QuotaExceeded(_) => "Quota exceeded",
            LecternError::MalformedQuizResponse(_) => "Failed to parse quiz response. Please try again.",
            LecternError::SummarizationFailed(_) => "Summarization failed",
            LecternError::SourceExtraction(_) => "Could not extract text",
            LecternError::Cancelled => "Request cancelled",
            LecternError::Config(_) | LecternError::Io(_) | LecternError::Other(_) => "Internal server error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.category().to_string(),
            details: Some(self.0.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(LecternError::invalid_input("bad")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(LecternError::quota_exceeded("429")).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError(LecternError::ModelTimeout(60)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(ApiError(LecternError::Cancelled).status_code().as_u16(), 499);
    }
}
