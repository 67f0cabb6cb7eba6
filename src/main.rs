// src/main.rs
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::info;
use std::sync::Arc;

mod config;
mod errors;
mod flows;
mod handlers;
mod models;
mod prompts;
mod services;
mod validation;

use crate::config::Settings;
use crate::flows::Stylist;
use crate::services::{GenerativeModel, KeywordClassifier, LLMService, RetryPolicy};

#[derive(Clone)]
pub struct AppState {
    stylist: Arc<Stylist>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Stylist service...");

    let settings = Settings::from_env()?;
    let llm_service: Arc<dyn GenerativeModel> = Arc::new(LLMService::new(&settings)?);
    info!(
        "Using text model {} and image model {}",
        settings.text_model, settings.image_model
    );

    let mut retry = RetryPolicy::default();
    if let Some(keywords) = &settings.retry_keywords {
        info!("Retrying model calls on: {}", keywords.join(", "));
        retry = retry.with_classifier(KeywordClassifier::new(keywords));
    }

    let app_state = AppState {
        stylist: Arc::new(Stylist::new(llm_service, retry)),
    };

    info!("Starting HTTP server on {}", settings.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().limit(20 * 1024 * 1024))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
            .route("/health", web::get().to(health_check))
    })
    .bind(&settings.bind_addr)?
    .run()
    .await?;

    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "stylist",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
