// src/services/llm_service.rs
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};

use crate::config::Settings;
use crate::errors::StylistError;
use crate::services::model::{
    GenerativeModel, GeneratedMedia, MediaCall, PromptPart, StructuredCall,
};

/// Gemini `generateContent` client.
pub struct LLMService {
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
    client: Client,
}

impl LLMService {
    pub fn new(settings: &Settings) -> Result<Self, StylistError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| StylistError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: settings.gemini_api_key.clone(),
            base_url: settings.gemini_api_base.trim_end_matches('/').to_string(),
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
            client,
        })
    }

    async fn generate_content(&self, model: &str, body: Value) -> Result<Value, StylistError> {
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StylistError::Provider(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StylistError::Provider(format!(
                "Gemini error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StylistError::Provider(format!("Failed to parse Gemini response: {}", e)))
    }
}

#[async_trait]
impl GenerativeModel for LLMService {
    async fn generate_structured(&self, call: &StructuredCall) -> Result<Value, StylistError> {
        let start = Instant::now();
        let result = self
            .generate_content(
                &self.text_model,
                json!({
                    "contents": contents(&call.parts),
                    "generationConfig": {
                        "responseMimeType": "application/json",
                        "responseSchema": call.output_schema.to_response_schema()
                    }
                }),
            )
            .await?;
        debug!(
            "{}: structured response in {}ms",
            call.name,
            start.elapsed().as_millis()
        );

        let content = extract_text(&result).ok_or_else(|| {
            StylistError::EmptyResponse(format!(
                "No content in Gemini response for {}{}",
                call.name,
                block_reason(&result)
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            StylistError::EmptyResponse(format!(
                "Gemini returned unparseable JSON for {}: {}",
                call.name, e
            ))
        })
    }

    async fn generate_media(&self, call: &MediaCall) -> Result<GeneratedMedia, StylistError> {
        let start = Instant::now();
        let result = self
            .generate_content(
                &self.image_model,
                json!({
                    "contents": contents(&call.parts),
                    "generationConfig": {
                        "responseModalities": call.modalities
                    }
                }),
            )
            .await?;
        debug!(
            "{}: media response in {}ms",
            call.name,
            start.elapsed().as_millis()
        );

        Ok(extract_media(&result))
    }
}

fn contents(parts: &[PromptPart]) -> Value {
    let parts: Vec<Value> = parts
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => json!({ "text": text }),
            PromptPart::Media(uri) => json!({
                "inlineData": {
                    "mimeType": uri.mime_type,
                    "data": uri.payload
                }
            }),
        })
        .collect();
    json!([{ "role": "user", "parts": parts }])
}

fn candidate_parts(result: &Value) -> &[Value] {
    result["candidates"][0]["content"]["parts"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn extract_text(result: &Value) -> Option<String> {
    let text: String = candidate_parts(result)
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn extract_media(result: &Value) -> GeneratedMedia {
    let parts = candidate_parts(result);
    let data_uri = parts.iter().find_map(|p| {
        let inline = &p["inlineData"];
        let mime_type = inline["mimeType"].as_str()?;
        let data = inline["data"].as_str().filter(|d| !d.is_empty())?;
        Some(format!("data:{};base64,{}", mime_type, data))
    });
    GeneratedMedia {
        data_uri,
        text: extract_text(result),
    }
}

fn block_reason(result: &Value) -> String {
    result["promptFeedback"]["blockReason"]
        .as_str()
        .or_else(|| result["candidates"][0]["finishReason"].as_str())
        .map(|reason| format!(" (reason: {})", reason))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataUri;

    #[test]
    fn contents_inline_media_parts() {
        let uri = DataUri::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        let rendered = contents(&[
            PromptPart::Text("Describe this garment".into()),
            PromptPart::Media(uri),
        ]);
        assert_eq!(rendered[0]["role"], "user");
        assert_eq!(rendered[0]["parts"][0]["text"], "Describe this garment");
        assert_eq!(rendered[0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(rendered[0]["parts"][1]["inlineData"]["data"], "iVBORw0KGgo=");
    }

    #[test]
    fn extracts_concatenated_text() {
        let result = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        });
        assert_eq!(extract_text(&result).as_deref(), Some("{\"a\":1}"));
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn extracts_first_inline_image_as_data_uri() {
        let result = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is the outfit." },
                { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
            ] } }]
        });
        let media = extract_media(&result);
        assert_eq!(
            media.data_uri.as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
        assert_eq!(media.text.as_deref(), Some("Here is the outfit."));
    }

    #[test]
    fn media_without_image_part_has_no_uri() {
        let result = json!({
            "candidates": [{ "content": { "parts": [{ "text": "I cannot draw that." }] } }]
        });
        assert_eq!(extract_media(&result).data_uri, None);
    }

    #[test]
    fn block_reason_is_reported() {
        let result = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(block_reason(&result), " (reason: SAFETY)");
        assert_eq!(block_reason(&json!({})), "");
    }
}
