// src/flows/outfit_inspiration.rs
use super::Stylist;
use crate::errors::StylistError;
use crate::models::{OutfitInspirationRequest, OutfitInspirationResult};
use crate::prompts;
use crate::services::StructuredCall;
use crate::validation::Contract;

impl Stylist {
    pub async fn inspire_outfits(
        &self,
        request: OutfitInspirationRequest,
    ) -> Result<OutfitInspirationResult, StylistError> {
        self.observe("outfit_inspiration", async {
            request.check()?;

            let call = StructuredCall {
                name: "outfit_inspiration",
                parts: prompts::outfit_inspiration(&request),
                output_schema: OutfitInspirationResult::schema(),
            };
            self.structured(&call).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::errors::StylistError;
    use crate::flows::fixtures::stylist;
    use crate::models::OutfitInspirationRequest;
    use crate::services::scripted_model::ScriptedModel;

    fn request() -> OutfitInspirationRequest {
        OutfitInspirationRequest {
            body_type: "hourglass".into(),
            style_preferences: "romantic, soft colors".into(),
            owned_items: vec!["wrap dress".into(), "denim jacket".into()],
        }
    }

    #[tokio::test]
    async fn returns_suggested_outfits() {
        let model = Arc::new(ScriptedModel::new().with_structured(Ok(json!({
            "outfitSuggestions": [
                "Wrap dress with the denim jacket and white sneakers",
                "Blush blouse tucked into a midi skirt"
            ]
        }))));

        let result = stylist(&model).inspire_outfits(request()).await.unwrap();
        assert_eq!(result.outfit_suggestions.len(), 2);
    }

    #[tokio::test]
    async fn empty_suggestion_list_is_rejected() {
        let model = Arc::new(
            ScriptedModel::new().with_structured(Ok(json!({ "outfitSuggestions": [] }))),
        );

        let err = stylist(&model).inspire_outfits(request()).await.unwrap_err();
        assert!(matches!(err, StylistError::Validation(ref e) if e.has_issue_at("outfitSuggestions")));
    }

    #[tokio::test]
    async fn blank_body_type_is_rejected_up_front() {
        let model = Arc::new(ScriptedModel::new());
        let mut request = request();
        request.body_type = " ".into();

        let err = stylist(&model).inspire_outfits(request).await.unwrap_err();
        assert!(matches!(err, StylistError::Validation(ref e) if e.has_issue_at("bodyType")));
        assert_eq!(model.structured_call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn overloaded_model_is_retried() {
        let model = Arc::new(
            ScriptedModel::new()
                .with_structured(Err(StylistError::Provider(
                    "Gemini error (503 Service Unavailable): The model is overloaded.".into(),
                )))
                .with_structured(Ok(json!({ "outfitSuggestions": ["Wrap dress and loafers"] }))),
        );

        let result = stylist(&model).inspire_outfits(request()).await.unwrap();
        assert_eq!(result.outfit_suggestions, vec!["Wrap dress and loafers"]);
        assert_eq!(model.structured_call_count(), 2);
    }
}
