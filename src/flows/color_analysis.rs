// src/flows/color_analysis.rs
use std::sync::LazyLock;

use log::info;
use serde_json::Value;

use super::{Stylist, data_uri_field};
use crate::errors::StylistError;
use crate::models::{ColorAnalysisRequest, ColorAnalysisResult, Season, UNDETERMINED};
use crate::prompts;
use crate::services::StructuredCall;
use crate::validation::{
    Contract, Field, FieldIssue, IssueKind, Schema, ValidationError, validate,
};

/// Phrases (lowercase) in a season label that mean the model could not classify the photo.
pub const UNDETERMINED_KEYWORDS: [&str; 5] = [
    "niet te bepalen",
    "onvoldoende informatie",
    "kan niet analyseren",
    "geen gezicht",
    "onmogelijk te bepalen",
];

pub const UNDETERMINED_EXPLANATION: &str = "Er is onvoldoende informatie in deze foto om een \
seizoenstype te bepalen. Gebruik een goed belichte foto waarop je gezicht duidelijk en zonder \
filters zichtbaar is.";

/// Shape requested from the model. Looser than the final contract: the season is
/// free text so the model can say it cannot decide, and normalization runs first.
static RAW_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let swatch = || {
        Schema::object(vec![
            Field::required("name", Schema::string()),
            Field::required("hex", Schema::string()),
        ])
    };
    Schema::object(vec![
        Field::required("season", Schema::string()),
        Field::required("explanation", Schema::string()),
        Field::required("skinTone", Schema::string()),
        Field::required("hairColor", Schema::string()),
        Field::required("eyeColor", Schema::string()),
        Field::required("recommendedColors", Schema::array(swatch(), 0)),
        Field::required("avoidColors", Schema::array(swatch(), 0)),
        Field::required("paletteDescription", Schema::string()),
    ])
});

fn mentions_undetermined(text: &str) -> bool {
    let lowered = text.to_lowercase();
    UNDETERMINED_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Makes an "undetermined" answer internally consistent: no colors, sentinel
/// descriptors, and an explanation that says why. Determined answers pass through
/// untouched; too-short color lists are left for validation to reject.
pub fn normalize_season_analysis(mut raw: ColorAnalysisResult) -> ColorAnalysisResult {
    if !mentions_undetermined(&raw.season) {
        return raw;
    }

    raw.season = Season::Undetermined.as_str().to_string();
    raw.recommended_colors.clear();
    raw.avoid_colors.clear();
    raw.skin_tone = UNDETERMINED.to_string();
    raw.hair_color = UNDETERMINED.to_string();
    raw.eye_color = UNDETERMINED.to_string();
    raw.palette_description = UNDETERMINED.to_string();
    if !mentions_undetermined(&raw.explanation) {
        raw.explanation = UNDETERMINED_EXPLANATION.to_string();
    }
    raw
}

/// Reads the raw model answer. An undetermined season only needs its season and
/// explanation text since normalization discards the rest, so nothing else in the
/// answer can fail it. Any other answer must match `RAW_SCHEMA` field by field.
fn from_raw(value: Value) -> Result<ColorAnalysisResult, ValidationError> {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let season = text("season");
    if mentions_undetermined(&season) {
        return Ok(ColorAnalysisResult {
            season,
            explanation: text("explanation"),
            ..ColorAnalysisResult::default()
        });
    }

    validate(&value, &RAW_SCHEMA)?;
    serde_json::from_value(value).map_err(|e| {
        ValidationError::new(vec![FieldIssue::new(
            "$",
            IssueKind::Malformed {
                detail: e.to_string(),
            },
        )])
    })
}

impl Stylist {
    pub async fn analyze_colors(
        &self,
        request: ColorAnalysisRequest,
    ) -> Result<ColorAnalysisResult, StylistError> {
        self.observe("color_analysis", async {
            request.check()?;
            let photo = data_uri_field(&request.photo_data_uri, "photoDataUri")?;

            let call = StructuredCall {
                name: "color_analysis",
                parts: prompts::color_analysis(photo),
                output_schema: &RAW_SCHEMA,
            };
            let raw = from_raw(self.call_structured(&call).await?)?;

            let result = normalize_season_analysis(raw);
            if result.season == UNDETERMINED {
                info!("color_analysis: season could not be determined from the photo");
            }
            result.check()?;
            Ok(result)
        })
        .await
    }
}
