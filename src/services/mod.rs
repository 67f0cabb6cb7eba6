// src/services/mod.rs
pub mod llm_service;
pub mod model;
pub mod retry;
#[cfg(test)]
pub mod scripted_model;

pub use llm_service::LLMService;
pub use model::{GenerativeModel, GeneratedMedia, MediaCall, Modality, PromptPart, StructuredCall};
pub use retry::{KeywordClassifier, RetryPolicy};
