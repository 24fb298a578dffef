use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::roi::ValidationError;

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
pub const NEGATIVE_FIELDS: &str = "Numeric fields cannot be negative";
pub const NOT_CONFIGURED: &str =
    "Email service not configured. Please check EMAIL_SETUP.md for setup instructions.";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Delivery(String),
    #[error("unexpected failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl DeliveryError {
    pub fn missing_fields() -> Self {
        Self::Validation(MISSING_REQUIRED_FIELDS.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Delivery(_) => "delivery",
            Self::Unexpected(_) => "unexpected",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Delivery(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a visitor. Unexpected failures never leak detail.
    pub fn public_message(&self) -> String {
        match self {
            Self::Unexpected(_) => "Unexpected error while processing the report".to_string(),
            other => other.to_string(),
        }
    }

    /// Wording for the calculator page notification.
    pub fn notice(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Configuration(_) => {
                "Email service not configured. Please contact support for report delivery."
                    .to_string()
            }
            Self::Delivery(_) | Self::Unexpected(_) => {
                "Email service temporarily unavailable. Please try again later.".to_string()
            }
        }
    }
}

impl From<ValidationError> for DeliveryError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for DeliveryError {
    fn into_response(self) -> Response {
        if let Self::Unexpected(err) = &self {
            error!(?err, "unexpected report delivery failure");
        }
        let body = ErrorBody {
            error: self.public_message(),
            kind: self.kind(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
