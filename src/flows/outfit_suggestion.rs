// src/flows/outfit_suggestion.rs
use log::debug;

use super::{Stylist, require_image};
use crate::errors::StylistError;
use crate::models::{
    OutfitSuggestionDraft, OutfitSuggestionRequest, OutfitSuggestionResult,
};
use crate::prompts;
use crate::services::{MediaCall, Modality, StructuredCall};
use crate::validation::Contract;

impl Stylist {
    /// Two stages: the text suggestion first, then an image of it. The image is
    /// only requested once the text stage is complete.
    pub async fn suggest_outfit(
        &self,
        request: OutfitSuggestionRequest,
    ) -> Result<OutfitSuggestionResult, StylistError> {
        self.observe("outfit_suggestion", async {
            request.check()?;

            let text_call = StructuredCall {
                name: "outfit_suggestion",
                parts: prompts::outfit_suggestion(&request),
                output_schema: OutfitSuggestionDraft::schema(),
            };
            let draft: OutfitSuggestionDraft = self.structured(&text_call).await?;
            debug!("outfit_suggestion: draft ready, requesting image");

            let image_call = MediaCall {
                name: "outfit_suggestion_image",
                parts: prompts::outfit_image(&draft, &request),
                modalities: vec![Modality::Text, Modality::Image],
            };
            let media = self.media(&image_call).await?;
            let image_data_uri = require_image(media, "the outfit suggestion")?;

            let result = OutfitSuggestionResult::from_draft(draft, image_data_uri);
            result.check()?;
            Ok(result)
        })
        .await
    }
}
