use axum::Router;
use health_ingest_rs::{config, routes, state};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "health_ingest_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let state = state::AppState::new(config.clone());

    // Start batch eviction task
    let eviction_state = state.clone();
    tokio::spawn(async move {
        let ttl = eviction_state.config.cache_ttl;
        loop {
            tokio::time::sleep(eviction_state.config.eviction_interval).await;
            eviction_state.evict_expired(ttl);
        }
    });

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::upload::router())
        .merge(routes::records::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(config.max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("health-ingest-rs listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Upload: POST http://{}/api/upload", addr);
    tracing::info!("Records: GET http://{}/api/records/:batch_id", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
