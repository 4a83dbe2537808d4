//! API error responses

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Errors a handler replies with. Internal detail stays in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field is missing or unusable
    #[error("{0}")]
    InvalidInput(String),

    /// The vision model call failed or its reply was unusable
    #[error("Failed to analyze image")]
    Analysis,

    /// Token exchange or catalog query failed
    #[error("Failed to get recommendations")]
    Recommendations { message: String },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis | ApiError::Recommendations { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Recommendations { message } => Some(message.as_str()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            message,
        })
    }
}
