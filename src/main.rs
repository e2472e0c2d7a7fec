use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roommate_match::config::{LoggingSettings, Settings, StorageBackend};
use roommate_match::core::{ProfileStore, RecommendationEngine};
use roommate_match::routes::{self, AppState};
use roommate_match::services::{
    CachedProfileRepository, InMemoryProfileRepository, PostgresProfileRepository, ProfileRepository,
};

/// Initialize tracing; RUST_LOG takes precedence over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };

    init_tracing(&settings.logging);
    info!("Starting roommate matching service...");
    info!("Configuration loaded successfully");

    let (repository, postgres): (Arc<dyn ProfileRepository>, Option<Arc<PostgresProfileRepository>>) =
        match settings.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory profile repository");
                (Arc::new(InMemoryProfileRepository::new()), None)
            }
            StorageBackend::Postgres => {
                let postgres = PostgresProfileRepository::from_settings(
                    &settings.database.url,
                    settings.database.max_connections,
                    settings.database.min_connections,
                    settings.database.acquire_timeout_secs,
                    settings.database.idle_timeout_secs,
                )
                .await
                .map_err(|e| {
                    error!("Failed to connect to PostgreSQL: {}", e);
                    io::Error::new(io::ErrorKind::ConnectionRefused, e)
                })?;
                let postgres = Arc::new(postgres);

                let cache_ttl = settings.cache.ttl_secs.unwrap_or(60);
                let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(10_000);
                info!("Profile cache initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);

                let cached = CachedProfileRepository::new(postgres.clone(), l1_cache_size, cache_ttl);
                (Arc::new(cached), Some(postgres))
            }
        };

    let engine = RecommendationEngine::new(settings.recommendation_limit());
    info!("Recommendation engine initialized (limit: {})", engine.limit());

    let app_state = AppState {
        store: ProfileStore::new(repository),
        engine,
        max_limit: settings.matching.max_limit.max(1),
        postgres,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
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
