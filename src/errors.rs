// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum StylistError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Empty model response: {0}")]
    EmptyResponse(String),

    #[error("Model provider error: {0}")]
    Provider(String),

    #[error("Model call failed after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last: Box<StylistError>,
    },

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StylistError {
    fn category(&self) -> &'static str {
        match self {
            StylistError::Validation(_) => "Validation error",
            StylistError::EmptyResponse(_) => "Empty model response",
            StylistError::Provider(_) => "AI service error",
            StylistError::ExhaustedRetries { .. } => "AI service unavailable",
            StylistError::GenerationFailed(_) => "Generation failed",
            StylistError::Config(_) => "Configuration error",
        }
    }
}

impl ResponseError for StylistError {
    fn status_code(&self) -> StatusCode {
        match self {
            StylistError::Validation(_) => StatusCode::BAD_REQUEST,
            StylistError::EmptyResponse(_)
            | StylistError::Provider(_)
            | StylistError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            StylistError::ExhaustedRetries { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StylistError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "error": self.category(),
            "message": self.to_string()
        });
        if let StylistError::Validation(err) = self {
            body["issues"] = serde_json::json!(err.issues());
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
