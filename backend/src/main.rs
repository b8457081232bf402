mod cache;
mod catalog;
mod chat;
mod inference;
mod report;
mod routes;

use std::env;
use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use cache::ResultCache;
use catalog::Catalog;
use chat::ChatRelay;
use inference::model::OnnxClassifier;
use inference::resolver::InferenceResolver;
use routes::configure_routes;
use shared::Language;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let static_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        format!("{}/static", manifest_dir)
    } else {
        "/usr/src/app/static".to_string()
    };

    let catalog = Catalog::builtin();
    if let Err(e) = catalog.validate() {
        log::error!("Remedy catalog failed startup validation: {e}");
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("Catalog validation failed: {e}"),
        ));
    }
    log::info!(
        "Catalog validated: {} labels x {} languages",
        catalog.len(),
        Language::ALL.len()
    );

    let model_path =
        env::var("MODEL_PATH").unwrap_or_else(|_| "plant_disease_model.onnx".to_string());
    let classifier = match OnnxClassifier::load(Path::new(&model_path)) {
        Ok(classifier) => classifier,
        Err(e) => {
            log::error!("Failed to preload model at startup: {e:?}");
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Model loading failed: {e:?}"),
            ));
        }
    };
    log::info!("Loaded classifier from {}", model_path);

    let cache = ResultCache::new();
    let resolver = InferenceResolver::new(Arc::new(classifier), Arc::new(catalog), cache.clone());

    let chat_relay = ChatRelay::from_env();
    if !chat_relay.has_credential() {
        log::warn!(
            "OPENAI_API_KEY is not set; chat requests will be answered with the fallback reply."
        );
    }

    let port = env::var("PORT").unwrap_or_else(|_| "10000".to_string());
    let bind_address = format!("0.0.0.0:{}", port);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(resolver.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(chat_relay.clone()))
            .configure(|cfg| configure_routes(cfg, static_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
