use crate::domain::errors::{ApiError, INVALID_JSON_MESSAGE};
use crate::domain::nutrition::{FieldErrors, PredictionResult};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
}

impl Default for HelloResponse {
    fn default() -> Self {
        Self {
            message: "hello world",
        }
    }
}

/// `{"status": true, "calories": 110.25, "currency": "cal"}`
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub status: bool,
    pub calories: f64,
    pub currency: &'static str,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            status: true,
            calories: result.calories(),
            currency: result.currency(),
        }
    }
}

/// Either a parser message or the per-field violation map.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail<'a> {
    Message(&'a str),
    Fields(&'a FieldErrors),
}

/// `{"status": false, "error"?: ..., "detail"?: ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ErrorDetail<'a>>,
}

impl<'a> From<&'a ApiError> for ErrorResponse<'a> {
    fn from(error: &'a ApiError) -> Self {
        match error {
            ApiError::MalformedInput { detail } => Self {
                status: false,
                error: Some(INVALID_JSON_MESSAGE),
                detail: Some(ErrorDetail::Message(detail.as_str())),
            },
            ApiError::ValidationFailure(fields) => Self {
                status: false,
                error: None,
                detail: Some(ErrorDetail::Fields(fields)),
            },
            ApiError::PredictionFailure { message } => Self {
                status: false,
                error: Some(message.as_str()),
                detail: None,
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput { .. } | ApiError::ValidationFailure(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PredictionFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(self))
    }
}
