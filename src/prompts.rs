// src/prompts.rs
//! Prompt templates for each flow. Images are attached as media parts, never
//! inlined into the text.

use crate::models::{
    DataUri, OutfitInspirationRequest, OutfitSuggestionDraft, OutfitSuggestionRequest,
    OutfitVisualizationRequest,
};
use crate::services::PromptPart;

pub const CLOTHING_ANALYSIS_PROMPT: &str = r#"
You are a fashion expert cataloguing a wardrobe. Analyze the clothing item in the attached photo.

Return JSON with:
- "name": a short catalogue name for the item (e.g. "Light-wash denim jacket")
- "type": one of Top, Bottom, Dress, Outerwear, Shoes, Accessory, Bag, Other
- "color": the dominant color, in plain words
- "style": one of Casual, Formal, Business, Sporty, Bohemian, Streetwear, Vintage, Minimalist, Other
- "description": two or three sentences on material, fit and notable details

Describe only the garment, not the person or background.
"#;

pub const OUTFIT_SUGGESTION_PROMPT: &str = r#"
You are a personal stylist. Put together one outfit using only items from the closet below.

Closet: {{closet}}
Weather: {{weather}}
Style preference: {{style}}
Current trends: {{trends}}

Return JSON with:
- "outfitSuggestion": the outfit, naming each closet item used
- "reasoning": why it suits the weather, the style preference and the trends
- "suggestedShoes": the shoes to wear with it
- "suggestedSocks": socks to wear, or omit when none are needed
"#;

pub const OUTFIT_IMAGE_PROMPT: &str = r#"
Generate a photorealistic full-length fashion image of a model wearing this outfit on a plain studio background.

Outfit: {{outfit}}
Shoes: {{shoes}}
{{socks}}Setting weather: {{weather}}
"#;

pub const OUTFIT_INSPIRATION_PROMPT: &str = r#"
You are a fashion consultant. Suggest complete outfits for this person.

Body type: {{body_type}}
Style preferences: {{style}}
Items they already own:
{{items}}

Return JSON with "outfitSuggestions": a list of three to five outfit descriptions.
Prefer outfits that reuse owned items and explain in each description how it flatters the body type.
"#;

pub const VISUALIZATION_BRIEF_PROMPT: &str = r#"
You write prompts for an image generation model. Turn this outfit into one detailed image prompt
for a photorealistic full-length fashion photo on a neutral background.

Outfit: {{outfit}}
{{items}}
Mention fabric, fit, colors and how the pieces are layered.
Return JSON with "imagePrompt".
"#;

pub const COLOR_ANALYSIS_PROMPT: &str = r##"
You are an expert in seasonal color analysis. Study the face in the attached photo: skin undertone,
hair color, eye color and overall contrast. Write all descriptive text in Dutch.

Return JSON with:
- "season": exactly one of Spring, Summer, Autumn, Winter
- "explanation": why this season fits
- "skinTone", "hairColor", "eyeColor": short descriptions
- "recommendedColors": at least 5 colors, each { "name", "hex" } with hex like "#A1B2C3"
- "avoidColors": at least 3 colors in the same format
- "paletteDescription": a short description of the overall palette

If no face is visible or the photo does not allow a reliable analysis, set "season" to
"Niet te bepalen", explain why in "explanation", and return empty color lists.
"##;

/// Fills `{{key}}` placeholders in one pass over the template, so substituted
/// text is never scanned for placeholders again.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template.trim();
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

pub fn clothing_analysis(photo: DataUri) -> Vec<PromptPart> {
    vec![
        PromptPart::Text(CLOTHING_ANALYSIS_PROMPT.trim().to_string()),
        PromptPart::Media(photo),
    ]
}

pub fn outfit_suggestion(request: &OutfitSuggestionRequest) -> Vec<PromptPart> {
    let trends = if request.trends.trim().is_empty() {
        "none specified"
    } else {
        request.trends.as_str()
    };
    vec![PromptPart::Text(render(
        OUTFIT_SUGGESTION_PROMPT,
        &[
            ("closet", request.closet_description.as_str()),
            ("weather", request.weather.as_str()),
            ("style", request.style_preference.as_str()),
            ("trends", trends),
        ],
    ))]
}

pub fn outfit_image(draft: &OutfitSuggestionDraft, request: &OutfitSuggestionRequest) -> Vec<PromptPart> {
    let socks = draft
        .suggested_socks
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("Socks: {s}\n"))
        .unwrap_or_default();
    vec![PromptPart::Text(render(
        OUTFIT_IMAGE_PROMPT,
        &[
            ("outfit", draft.outfit_suggestion.as_str()),
            ("shoes", draft.suggested_shoes.as_str()),
            ("socks", socks.as_str()),
            ("weather", request.weather.as_str()),
        ],
    ))]
}

pub fn outfit_inspiration(request: &OutfitInspirationRequest) -> Vec<PromptPart> {
    let items = if request.owned_items.is_empty() {
        "- (none listed)".to_string()
    } else {
        request
            .owned_items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    vec![PromptPart::Text(render(
        OUTFIT_INSPIRATION_PROMPT,
        &[
            ("body_type", request.body_type.as_str()),
            ("style", request.style_preferences.as_str()),
            ("items", items.as_str()),
        ],
    ))]
}

pub fn visualization_brief(request: &OutfitVisualizationRequest) -> Vec<PromptPart> {
    let items = if request.items.is_empty() {
        String::new()
    } else {
        let listed = request
            .items
            .iter()
            .map(|item| format!("- {}", item.description))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Pieces:\n{listed}\n")
    };
    vec![PromptPart::Text(render(
        VISUALIZATION_BRIEF_PROMPT,
        &[("outfit", request.outfit_description.as_str()), ("items", items.as_str())],
    ))]
}

/// Image prompt followed by each item's reference photo, labelled with its description.
pub fn visualization_image(image_prompt: &str, references: Vec<(String, DataUri)>) -> Vec<PromptPart> {
    let mut parts = vec![PromptPart::Text(image_prompt.to_string())];
    for (description, uri) in references {
        parts.push(PromptPart::Text(format!("Reference photo for: {description}")));
        parts.push(PromptPart::Media(uri));
    }
    parts
}

pub fn color_analysis(photo: DataUri) -> Vec<PromptPart> {
    vec![
        PromptPart::Text(COLOR_ANALYSIS_PROMPT.trim().to_string()),
        PromptPart::Media(photo),
    ]
}
