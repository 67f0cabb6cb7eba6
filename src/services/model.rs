// src/services/model.rs
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StylistError;
use crate::models::DataUri;
use crate::validation::Schema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Media(DataUri),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Image,
}

/// A prompt whose answer must come back as JSON in the shape of `output_schema`.
#[derive(Debug, Clone)]
pub struct StructuredCall {
    pub name: &'static str,
    pub parts: Vec<PromptPart>,
    pub output_schema: &'static Schema,
}

#[derive(Debug, Clone)]
pub struct MediaCall {
    pub name: &'static str,
    pub parts: Vec<PromptPart>,
    pub modalities: Vec<Modality>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedMedia {
    pub data_uri: Option<String>,
    pub text: Option<String>,
}

/// The hosted model endpoint the flows orchestrate.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_structured(&self, call: &StructuredCall) -> Result<Value, StylistError>;

    async fn generate_media(&self, call: &MediaCall) -> Result<GeneratedMedia, StylistError>;
}
