// src/flows/clothing_analysis.rs
use super::{Stylist, data_uri_field};
use crate::errors::StylistError;
use crate::models::{ClothingItemAnalysisRequest, ClothingItemAnalysisResult};
use crate::prompts;
use crate::services::StructuredCall;
use crate::validation::Contract;

impl Stylist {
    pub async fn analyze_clothing_item(
        &self,
        request: ClothingItemAnalysisRequest,
    ) -> Result<ClothingItemAnalysisResult, StylistError> {
        self.observe("clothing_item_analysis", async {
            request.check()?;
            let photo = data_uri_field(&request.photo_data_uri, "photoDataUri")?;

            let call = StructuredCall {
                name: "clothing_item_analysis",
                parts: prompts::clothing_analysis(photo),
                output_schema: ClothingItemAnalysisResult::schema(),
            };
            self.structured(&call).await
        })
        .await
    }
}
