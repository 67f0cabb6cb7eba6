// src/handlers.rs
use actix_web::{HttpResponse, web};
use serde_json::Value;

use crate::{AppState, errors::StylistError, models::*, validation::Contract};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/clothing/analyze", web::post().to(analyze_clothing_item))
            .route("/outfits/suggest", web::post().to(suggest_outfit))
            .route("/outfits/inspire", web::post().to(inspire_outfits))
            .route("/outfits/visualize", web::post().to(visualize_outfit))
            .route("/colors/analyze", web::post().to(analyze_colors)),
    );
}

pub async fn analyze_clothing_item(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, StylistError> {
    let request = ClothingItemAnalysisRequest::parse(body.into_inner())?;
    let result = data.stylist.analyze_clothing_item(request).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn suggest_outfit(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, StylistError> {
    let request = OutfitSuggestionRequest::parse(body.into_inner())?;
    let result = data.stylist.suggest_outfit(request).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn inspire_outfits(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, StylistError> {
    let request = OutfitInspirationRequest::parse(body.into_inner())?;
    let result = data.stylist.inspire_outfits(request).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn visualize_outfit(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, StylistError> {
    let request = OutfitVisualizationRequest::parse(body.into_inner())?;
    let result = data.stylist.visualize_outfit(request).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn analyze_colors(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, StylistError> {
    let request = ColorAnalysisRequest::parse(body.into_inner())?;
    let result = data.stylist.analyze_colors(request).await?;
    Ok(HttpResponse::Ok().json(result))
}
