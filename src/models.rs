// src/models.rs
use std::fmt;
use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::{Contract, Field, FieldIssue, IssueKind, Schema};

/// Literal used for every descriptive field when no season can be determined.
pub const UNDETERMINED: &str = "Undetermined";

pub const MIN_RECOMMENDED_COLORS: usize = 5;
pub const MIN_AVOID_COLORS: usize = 3;

pub static SEASON_LABELS: [&str; 5] = ["Spring", "Summer", "Autumn", "Winter", UNDETERMINED];

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^#[0-9A-Fa-f]{6}$").expect("hex color pattern compiles"));

/// Inline media in the form `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub payload: String,
}

impl DataUri {
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix("data:")?;
        let (mime_type, payload) = rest.split_once(";base64,")?;
        if mime_type.is_empty()
            || !mime_type.contains('/')
            || mime_type.contains([',', ';', ' '])
            || payload.is_empty()
        {
            return None;
        }
        general_purpose::STANDARD.decode(payload).ok()?;
        Some(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    Undetermined,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::Undetermined => UNDETERMINED,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Spring" => Some(Season::Spring),
            "Summer" => Some(Season::Summer),
            "Autumn" => Some(Season::Autumn),
            "Winter" => Some(Season::Winter),
            UNDETERMINED => Some(Season::Undetermined),
            _ => None,
        }
    }
}

// Clothing item analysis

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItemAnalysisRequest {
    pub photo_data_uri: String,
}

impl Contract for ClothingItemAnalysisRequest {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![Field::required("photoDataUri", Schema::data_uri())])
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItemAnalysisResult {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub color: String,
    pub style: String,
    pub description: String,
}

impl Contract for ClothingItemAnalysisResult {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![
                Field::required("name", Schema::text()),
                Field::required("type", Schema::text()),
                Field::required("color", Schema::text()),
                Field::required("style", Schema::text()),
                Field::required("description", Schema::text()),
            ])
        });
        &SCHEMA
    }
}

// Outfit suggestion

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSuggestionRequest {
    pub closet_description: String,
    pub weather: String,
    pub style_preference: String,
    pub trends: String,
}

impl Contract for OutfitSuggestionRequest {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![
                Field::required("closetDescription", Schema::text()),
                Field::required("weather", Schema::text()),
                Field::required("stylePreference", Schema::text()),
                Field::required("trends", Schema::string()),
            ])
        });
        &SCHEMA
    }
}

/// Text half of an outfit suggestion, produced before the image is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSuggestionDraft {
    pub outfit_suggestion: String,
    pub reasoning: String,
    pub suggested_shoes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_socks: Option<String>,
}

impl Contract for OutfitSuggestionDraft {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![
                Field::required("outfitSuggestion", Schema::text()),
                Field::required("reasoning", Schema::text()),
                Field::required("suggestedShoes", Schema::text()),
                Field::optional("suggestedSocks", Schema::string()),
            ])
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSuggestionResult {
    pub outfit_suggestion: String,
    pub reasoning: String,
    pub suggested_shoes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_socks: Option<String>,
    pub outfit_image_data_uri: String,
}

impl OutfitSuggestionResult {
    pub fn from_draft(draft: OutfitSuggestionDraft, outfit_image_data_uri: String) -> Self {
        Self {
            outfit_suggestion: draft.outfit_suggestion,
            reasoning: draft.reasoning,
            suggested_shoes: draft.suggested_shoes,
            suggested_socks: draft.suggested_socks,
            outfit_image_data_uri,
        }
    }
}

impl Contract for OutfitSuggestionResult {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![
                Field::required("outfitSuggestion", Schema::text()),
                Field::required("reasoning", Schema::text()),
                Field::required("suggestedShoes", Schema::text()),
                Field::optional("suggestedSocks", Schema::string()),
                Field::required("outfitImageDataUri", Schema::data_uri()),
            ])
        });
        &SCHEMA
    }
}

// Outfit inspiration

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitInspirationRequest {
    pub body_type: String,
    pub style_preferences: String,
    pub owned_items: Vec<String>,
}

impl Contract for OutfitInspirationRequest {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![
                Field::required("bodyType", Schema::text()),
                Field::required("stylePreferences", Schema::text()),
                Field::required("ownedItems", Schema::array(Schema::text(), 0)),
            ])
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitInspirationResult {
    pub outfit_suggestions: Vec<String>,
}

impl Contract for OutfitInspirationResult {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![Field::required(
                "outfitSuggestions",
                Schema::array(Schema::text(), 1),
            )])
        });
        &SCHEMA
    }
}

// Outfit visualization

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitItemReference {
    pub description: String,
    /// Invalid references are dropped from the model context, not rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitVisualizationRequest {
    pub outfit_description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OutfitItemReference>,
}

impl Contract for OutfitVisualizationRequest {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![
                Field::required("outfitDescription", Schema::text()),
                Field::optional(
                    "items",
                    Schema::array(
                        Schema::object(vec![
                            Field::required("description", Schema::text()),
                            Field::optional("imageDataUri", Schema::string()),
                        ]),
                        0,
                    ),
                ),
            ])
        });
        &SCHEMA
    }
}

/// Image prompt written by the text model for the visualization step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationBrief {
    pub image_prompt: String,
}

impl Contract for VisualizationBrief {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![Field::required("imagePrompt", Schema::text())])
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitVisualizationResult {
    pub image_data_uri: String,
}

impl Contract for OutfitVisualizationResult {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![Field::required("imageDataUri", Schema::data_uri())])
        });
        &SCHEMA
    }
}

// Seasonal color analysis

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAnalysisRequest {
    pub photo_data_uri: String,
}

impl Contract for ColorAnalysisRequest {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::object(vec![Field::required("photoDataUri", Schema::data_uri())])
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSwatch {
    pub name: String,
    pub hex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorAnalysisResult {
    pub season: String,
    pub explanation: String,
    pub skin_tone: String,
    pub hair_color: String,
    pub eye_color: String,
    pub recommended_colors: Vec<ColorSwatch>,
    pub avoid_colors: Vec<ColorSwatch>,
    pub palette_description: String,
}

impl ColorAnalysisResult {
    pub fn season(&self) -> Option<Season> {
        Season::from_label(&self.season)
    }
}

impl Contract for ColorAnalysisResult {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            let swatch = || {
                Schema::object(vec![
                    Field::required("name", Schema::text()),
                    Field::required("hex", Schema::matching(HEX_COLOR.clone())),
                ])
            };
            Schema::object(vec![
                Field::required("season", Schema::one_of(&SEASON_LABELS)),
                Field::required("explanation", Schema::text()),
                Field::required("skinTone", Schema::text()),
                Field::required("hairColor", Schema::text()),
                Field::required("eyeColor", Schema::text()),
                // Minimum counts depend on the season, see cross_field_issues.
                Field::required("recommendedColors", Schema::array(swatch(), 0)),
                Field::required("avoidColors", Schema::array(swatch(), 0)),
                Field::required("paletteDescription", Schema::text()),
            ])
        });
        &SCHEMA
    }

    fn cross_field_issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match self.season() {
            Some(Season::Undetermined) => {
                for (path, list) in [
                    ("recommendedColors", &self.recommended_colors),
                    ("avoidColors", &self.avoid_colors),
                ] {
                    if !list.is_empty() {
                        issues.push(FieldIssue::new(
                            path,
                            IssueKind::MustBeEmpty { actual: list.len() },
                        ));
                    }
                }
                for (path, value) in [
                    ("skinTone", &self.skin_tone),
                    ("hairColor", &self.hair_color),
                    ("eyeColor", &self.eye_color),
                    ("paletteDescription", &self.palette_description),
                ] {
                    if value != UNDETERMINED {
                        issues.push(FieldIssue::new(
                            path,
                            IssueKind::ExpectedValue {
                                expected: UNDETERMINED.to_string(),
                            },
                        ));
                    }
                }
            }
            Some(_) => {
                for (path, list, min) in [
                    (
                        "recommendedColors",
                        &self.recommended_colors,
                        MIN_RECOMMENDED_COLORS,
                    ),
                    ("avoidColors", &self.avoid_colors, MIN_AVOID_COLORS),
                ] {
                    if list.len() < min {
                        issues.push(FieldIssue::new(
                            path,
                            IssueKind::TooFewItems {
                                min,
                                actual: list.len(),
                            },
                        ));
                    }
                }
            }
            // Unknown labels are already reported by the schema.
            None => {}
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PHOTO: &str = "data:image/jpeg;base64,iVBORw0KGgo=";

    fn swatches(count: usize) -> Vec<ColorSwatch> {
        (0..count)
            .map(|i| ColorSwatch {
                name: format!("Tone {i}"),
                hex: format!("#A0B0C{i}"),
            })
            .collect()
    }

    fn determined_result(recommended: usize, avoid: usize) -> ColorAnalysisResult {
        ColorAnalysisResult {
            season: "Autumn".into(),
            explanation: "Warm undertones with deep contrast.".into(),
            skin_tone: "Warm olive".into(),
            hair_color: "Chestnut".into(),
            eye_color: "Hazel".into(),
            recommended_colors: swatches(recommended),
            avoid_colors: swatches(avoid),
            palette_description: "Earthy, muted and warm.".into(),
        }
    }

    #[test]
    fn data_uri_parses_prefix_and_payload() {
        let uri = DataUri::parse(PHOTO).expect("valid");
        assert_eq!(uri.mime_type, "image/jpeg");
        assert_eq!(uri.payload, "iVBORw0KGgo=");
        assert_eq!(uri.to_string(), PHOTO);
    }

    #[test]
    fn data_uri_rejects_other_shapes() {
        for raw in [
            "https://example.com/shirt.jpg",
            "data:image/png,iVBORw0KGgo=",
            "data:;base64,iVBORw0KGgo=",
            "data:image/png;base64,",
            "data:image/png;base64,not base64!",
            "DATA:image/png;base64,iVBORw0KGgo=",
        ] {
            assert!(DataUri::parse(raw).is_none(), "{raw} should be rejected");
        }
    }

    #[test]
    fn clothing_result_maps_type_field() {
        let parsed = ClothingItemAnalysisResult::parse(json!({
            "name": "Denim jacket",
            "type": "Jacket",
            "color": "Blue",
            "style": "Casual",
            "description": "A washed denim trucker jacket."
        }))
        .expect("valid");
        assert_eq!(parsed.item_type, "Jacket");
    }

    #[test]
    fn request_parse_collects_all_missing_fields() {
        let err = OutfitSuggestionRequest::parse(json!({ "weather": "" })).unwrap_err();
        assert!(err.has_issue_at("closetDescription"));
        assert!(err.has_issue_at("weather"));
        assert!(err.has_issue_at("stylePreference"));
        assert!(err.has_issue_at("trends"));
    }

    #[test]
    fn determined_season_requires_minimum_palettes() {
        determined_result(5, 3).check().expect("valid");

        let err = determined_result(4, 3).check().unwrap_err();
        assert_eq!(
            err.issues(),
            &[FieldIssue::new(
                "recommendedColors",
                IssueKind::TooFewItems { min: 5, actual: 4 }
            )]
        );
        let err = determined_result(5, 2).check().unwrap_err();
        assert!(err.has_issue_at("avoidColors"));
    }

    #[test]
    fn swatch_codes_must_be_six_hex_digits() {
        let mut result = determined_result(5, 3);
        result.recommended_colors[1].hex = "#ABC".into();
        result.avoid_colors[0].hex = "#GGGGGG".into();
        let err = result.check().unwrap_err();
        assert!(err.has_issue_at("recommendedColors[1].hex"));
        assert!(err.has_issue_at("avoidColors[0].hex"));
    }

    #[test]
    fn undetermined_season_requires_sentinels_and_empty_lists() {
        let mut result = ColorAnalysisResult {
            season: UNDETERMINED.into(),
            explanation: "Geen gezicht zichtbaar.".into(),
            skin_tone: UNDETERMINED.into(),
            hair_color: UNDETERMINED.into(),
            eye_color: UNDETERMINED.into(),
            recommended_colors: Vec::new(),
            avoid_colors: Vec::new(),
            palette_description: UNDETERMINED.into(),
        };
        result.check().expect("valid");

        result.hair_color = "Brown".into();
        result.avoid_colors = swatches(1);
        let err = result.check().unwrap_err();
        assert!(err.has_issue_at("hairColor"));
        assert!(err.has_issue_at("avoidColors"));
    }

    #[test]
    fn season_outside_closed_set_is_rejected() {
        let mut result = determined_result(5, 3);
        result.season = "Deep Autumn".into();
        let err = result.check().unwrap_err();
        assert!(err.has_issue_at("season"));
        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn visualization_request_tolerates_bad_item_images() {
        let parsed = OutfitVisualizationRequest::parse(json!({
            "outfitDescription": "Camel coat over a cream knit",
            "items": [
                { "description": "Camel coat", "imageDataUri": "not-a-uri" },
                { "description": "Cream knit" }
            ]
        }))
        .expect("valid");
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[1].image_data_uri, None);
    }
}
