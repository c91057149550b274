use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use compat_engine::config::Settings;
use compat_engine::core::Matcher;
use compat_engine::routes::{self, compatibility::AppState};
use compat_engine::services::{
    AppwriteClient, AppwriteCollections, CompatibilityService, PostgresClient, ResultCache,
};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

fn io_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration errors are returned from main before logging exists
    let settings = Settings::load().map_err(|e| io_error("Failed to load configuration", e))?;

    // Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format =
        std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting compatibility service...");

    let compat_config = settings
        .scoring
        .to_compatibility_config()
        .map_err(|e| io_error("Invalid scoring configuration", e))?;

    info!("Configuration loaded successfully");

    let appwrite = Arc::new(
        AppwriteClient::new(
            settings.appwrite.endpoint,
            settings.appwrite.api_key,
            settings.appwrite.project_id,
            settings.appwrite.database_id,
            AppwriteCollections {
                user_profiles: settings.collection.user_profiles,
                user_basic_info: settings.collection.user_basic_info,
            },
        )
        .map_err(|e| io_error("Failed to create Appwrite client", e))?,
    );

    info!("Appwrite client initialized");

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| io_error("Failed to connect to PostgreSQL", e))?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let matcher = Matcher::new(compat_config, settings.matching.suppress_dealbreakers);

    info!("Matcher initialized with weights: {:?}", matcher.config().weights);

    let mut service = CompatibilityService::new(appwrite.clone(), appwrite, postgres, matcher);

    // Cache is optional: results are always persisted in PostgreSQL
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    match ResultCache::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(cache) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            service = service.with_cache(Arc::new(cache));
        }
        Err(e) => {
            warn!("Failed to connect to Redis ({}), running without cache", e);
        }
    }

    let app_state = AppState {
        service: Arc::new(service),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
