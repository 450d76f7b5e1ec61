pub mod api;
pub mod health;
pub mod modules;
pub mod shared;
pub use modules::multimedia;

use crate::api::openapi::ApiDoc;
use crate::multimedia::adapter::outgoing::cloud_storage::object_store_http::{
    HttpObjectStore, ObjectStoreConfig,
};
use crate::multimedia::adapter::outgoing::db::media_collection_repository_postgres::MediaCollectionRepositoryPostgres;
use crate::multimedia::adapter::outgoing::observer::TracingCollectionObserver;
use crate::multimedia::application::domain::policies::gallery_policy::GalleryPolicy;
use crate::multimedia::application::media_use_cases::MultimediaUseCases;
use crate::multimedia::application::ports::incoming::services::{
    LoadMediaCollectionService, SaveMediaCollectionService, UploadMediaBatchService,
};
use crate::multimedia::application::ports::outgoing::CollectionObserver;
use crate::shared::api::custom_json_config;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sea_orm::{ConnectOptions, Database};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub multimedia: MultimediaUseCases,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    // Try .env.{environment} first, then fall back to .env
    let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{}", env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    let db_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let host = env::var("HOST").context("HOST is not set")?;
    let port = env::var("PORT").context("PORT is not set")?;
    let server_url = format!("{host}:{port}");

    let policy = GalleryPolicy::from_env().context("Invalid gallery policy")?;
    let store_config = ObjectStoreConfig::from_env().context("Invalid object store config")?;
    let object_store = HttpObjectStore::new(store_config).context("Failed to build object store")?;
    info!(
        max_items = policy.max_items,
        max_file_size_bytes = policy.max_file_size_bytes,
        "Gallery policy loaded"
    );

    // Database connection
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    let db_arc = Arc::new(conn);

    let collection_repo = MediaCollectionRepositoryPostgres::new(Arc::clone(&db_arc));
    let observer: Arc<dyn CollectionObserver> = Arc::new(TracingCollectionObserver::default());

    let multimedia = MultimediaUseCases {
        load_collection: Arc::new(LoadMediaCollectionService::new(
            collection_repo.clone(),
            policy.clone(),
        )),
        save_collection: Arc::new(SaveMediaCollectionService::new(
            collection_repo,
            policy.clone(),
        )),
        upload_batch: Arc::new(UploadMediaBatchService::new(
            object_store,
            policy.clone(),
            observer,
        )),
    };

    let state = AppState { multimedia };
    let json_limit = policy.request_body_limit();

    info!("Server run on: {}", server_url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&db_arc)))
            .app_data(custom_json_config(json_limit))
            .configure(init_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(server_url)?
    .run()
    .await?;

    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Media
    cfg.service(crate::multimedia::adapter::incoming::web::routes::get_collection_handler);
    cfg.service(crate::multimedia::adapter::incoming::web::routes::save_collection_handler);
    cfg.service(crate::multimedia::adapter::incoming::web::routes::upload_batch_handler);
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e:#}");
    }
}
