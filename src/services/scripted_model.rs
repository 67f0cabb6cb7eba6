// src/services/scripted_model.rs
// In-memory model that replays queued responses and records what it was asked.
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StylistError;
use crate::services::model::{
    GenerativeModel, GeneratedMedia, MediaCall, PromptPart, StructuredCall,
};

#[derive(Default)]
pub struct ScriptedModel {
    structured: Mutex<VecDeque<Result<Value, StylistError>>>,
    media: Mutex<VecDeque<Result<GeneratedMedia, StylistError>>>,
    structured_calls: Mutex<Vec<Vec<PromptPart>>>,
    media_calls: Mutex<Vec<Vec<PromptPart>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structured(self, response: Result<Value, StylistError>) -> Self {
        self.structured.lock().unwrap().push_back(response);
        self
    }

    pub fn with_media(self, response: Result<GeneratedMedia, StylistError>) -> Self {
        self.media.lock().unwrap().push_back(response);
        self
    }

    pub fn structured_call_count(&self) -> usize {
        self.structured_calls.lock().unwrap().len()
    }

    pub fn media_call_count(&self) -> usize {
        self.media_calls.lock().unwrap().len()
    }

    pub fn structured_parts(&self, index: usize) -> Vec<PromptPart> {
        self.structured_calls.lock().unwrap()[index].clone()
    }

    pub fn media_parts(&self, index: usize) -> Vec<PromptPart> {
        self.media_calls.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_structured(&self, call: &StructuredCall) -> Result<Value, StylistError> {
        self.structured_calls.lock().unwrap().push(call.parts.clone());
        self.structured
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StylistError::Provider("no scripted structured response".into())))
    }

    async fn generate_media(&self, call: &MediaCall) -> Result<GeneratedMedia, StylistError> {
        self.media_calls.lock().unwrap().push(call.parts.clone());
        self.media
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StylistError::Provider("no scripted media response".into())))
    }
}

pub fn image(data_uri: &str) -> GeneratedMedia {
    GeneratedMedia {
        data_uri: Some(data_uri.to_string()),
        text: None,
    }
}
