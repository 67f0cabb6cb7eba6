// src/flows/outfit_visualization.rs
use log::debug;

use super::{Stylist, require_image};
use crate::errors::StylistError;
use crate::models::{
    DataUri, OutfitVisualizationRequest, OutfitVisualizationResult, VisualizationBrief,
};
use crate::prompts;
use crate::services::{MediaCall, Modality, StructuredCall};
use crate::validation::Contract;

impl Stylist {
    pub async fn visualize_outfit(
        &self,
        request: OutfitVisualizationRequest,
    ) -> Result<OutfitVisualizationResult, StylistError> {
        self.observe("outfit_visualization", async {
            request.check()?;

            let brief_call = StructuredCall {
                name: "outfit_visualization_brief",
                parts: prompts::visualization_brief(&request),
                output_schema: VisualizationBrief::schema(),
            };
            let brief: VisualizationBrief = self.structured(&brief_call).await?;

            let image_call = MediaCall {
                name: "outfit_visualization_image",
                parts: prompts::visualization_image(
                    &brief.image_prompt,
                    item_references(&request),
                ),
                modalities: vec![Modality::Text, Modality::Image],
            };
            let media = self.media(&image_call).await?;
            let image_data_uri = require_image(media, "the outfit visualization")?;

            let result = OutfitVisualizationResult { image_data_uri };
            result.check()?;
            Ok(result)
        })
        .await
    }
}

/// Item photos usable as model context. Anything that is not a proper data URI is left out.
fn item_references(request: &OutfitVisualizationRequest) -> Vec<(String, DataUri)> {
    request
        .items
        .iter()
        .filter_map(|item| {
            let raw = item.image_data_uri.as_deref()?;
            match DataUri::parse(raw) {
                Some(uri) => Some((item.description.clone(), uri)),
                None => {
                    debug!(
                        "outfit_visualization: ignoring invalid image reference for '{}'",
                        item.description
                    );
                    None
                }
            }
        })
        .collect()
}
