// alertd web backend
// HTTP boundary in front of the alert lifecycle engine

pub mod config;
pub mod database;
pub mod error_handling;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod validation;

pub use config::WebConfig;
pub use database::Database;
pub use error_handling::{AppError, AppResult};

use alertd_core::{create_notifier, AlertEngine, EngineConfig};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: AlertEngine,
    pub config: WebConfig,
}

impl AppState {
    pub async fn new(config: WebConfig) -> anyhow::Result<Self> {
        // Initialize database
        let db = Database::new(&config.database_url).await?;
        db.migrate().await?;

        let notifier = create_notifier(
            &config.notifier,
            config.webhook_url.as_deref(),
            config.notifier_timeout(),
        )?;

        let engine = AlertEngine::new(Arc::new(db.alert_store()), Arc::from(notifier))
            .with_config(EngineConfig {
                dispatch_timeout: config.dispatch_timeout(),
            });

        Ok(Self::with_engine(db, engine, config))
    }

    /// Assemble state around an engine built by the caller.
    pub fn with_engine(db: Database, engine: AlertEngine, config: WebConfig) -> Self {
        Self { db, engine, config }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .fallback(error_handling::route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the state, bind the configured port and serve until Ctrl-C.
pub async fn serve(config: WebConfig) -> anyhow::Result<()> {
    let state = AppState::new(config.clone()).await?;
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        "alertd listening on http://{} (notifier: {}, dispatch timeout: {:?})",
        addr,
        config.notifier,
        config.dispatch_timeout()
    );

    let listener = TcpListener::bind(&addr).await?;
    serve_on(listener, app).await?;

    tracing::info!("alertd stopped");
    Ok(())
}

/// Serve an already-built router on a bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
