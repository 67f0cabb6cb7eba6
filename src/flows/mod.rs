// src/flows/mod.rs
//! The five request/response flows. Each one validates its input, renders a
//! prompt, calls the model through the retry policy and validates the result
//! before handing it back.

pub mod clothing_analysis;
pub mod color_analysis;
pub mod outfit_inspiration;
pub mod outfit_suggestion;
pub mod outfit_visualization;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::StylistError;
use crate::models::DataUri;
use crate::services::{GeneratedMedia, GenerativeModel, MediaCall, RetryPolicy, StructuredCall};
use crate::validation::{Contract, FieldIssue, IssueKind, ValidationError};

#[derive(Clone)]
pub struct Stylist {
    model: Arc<dyn GenerativeModel>,
    retry: RetryPolicy,
}

impl Stylist {
    pub fn new(model: Arc<dyn GenerativeModel>, retry: RetryPolicy) -> Self {
        Self { model, retry }
    }

    /// Wraps one flow invocation with start/finish logging.
    async fn observe<T, Fut>(&self, flow: &str, work: Fut) -> Result<T, StylistError>
    where
        Fut: Future<Output = Result<T, StylistError>>,
    {
        let invocation = Uuid::new_v4();
        let start = Instant::now();
        info!("[{flow} {invocation}] started");

        let outcome = work.await;
        let elapsed = start.elapsed().as_millis();
        match &outcome {
            Ok(_) => info!("[{flow} {invocation}] succeeded in {elapsed}ms"),
            Err(err) => warn!("[{flow} {invocation}] failed after {elapsed}ms: {err}"),
        }
        outcome
    }

    async fn call_structured(&self, call: &StructuredCall) -> Result<Value, StylistError> {
        self.retry
            .run(call.name, || self.model.generate_structured(call))
            .await
    }

    /// Structured call whose output must satisfy `T`'s schema.
    async fn structured<T: Contract>(&self, call: &StructuredCall) -> Result<T, StylistError> {
        let value = self.call_structured(call).await?;
        Ok(T::parse(value)?)
    }

    async fn media(&self, call: &MediaCall) -> Result<GeneratedMedia, StylistError> {
        self.retry
            .run(call.name, || self.model.generate_media(call))
            .await
    }
}

/// The generated image of a media call, or why there is none.
fn require_image(media: GeneratedMedia, what: &str) -> Result<String, StylistError> {
    media.data_uri.ok_or_else(|| {
        let detail = media
            .text
            .map(|text| format!(" (model replied: {})", text.trim()))
            .unwrap_or_default();
        StylistError::GenerationFailed(format!("no image returned for {what}{detail}"))
    })
}

/// Parses a data URI field that has already passed schema validation.
fn data_uri_field(raw: &str, path: &str) -> Result<DataUri, StylistError> {
    DataUri::parse(raw).ok_or_else(|| {
        StylistError::Validation(ValidationError::new(vec![FieldIssue::new(
            path,
            IssueKind::InvalidDataUri,
        )]))
    })
}
