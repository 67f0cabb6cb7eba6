// src/config.rs
use dotenvy::dotenv;
use std::env;

use crate::errors::StylistError;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub request_timeout_secs: u64,
    /// Replaces the built-in transient-error keywords when set (comma separated).
    pub retry_keywords: Option<Vec<String>>,
}

impl Settings {
    pub fn from_env() -> Result<Self, StylistError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, StylistError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = var("GEMINI_API_KEY")
            .or_else(|| var("GOOGLE_API_KEY"))
            .ok_or_else(|| {
                StylistError::Config("GEMINI_API_KEY (or GOOGLE_API_KEY) must be set".into())
            })?;
        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".into());
        let gemini_api_base =
            var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.into());
        let text_model = var("GEMINI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.into());
        let image_model = var("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into());
        let request_timeout_secs = var("MODEL_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(120);
        let retry_keywords = var("MODEL_RETRY_KEYWORDS").map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            bind_addr,
            gemini_api_key,
            gemini_api_base,
            text_model,
            image_model,
            request_timeout_secs,
            retry_keywords,
        })
    }
}
