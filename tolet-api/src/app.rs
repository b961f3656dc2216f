/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tolet_api::{app::AppState, config::Config, uploads::DiskImageStore};
/// use tolet_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     max_connections: config.database.max_connections,
///     ..Default::default()
/// })
/// .await?;
/// let images = Arc::new(DiskImageStore::new(config.uploads.dir.clone()));
/// let state = AppState::new(pool, config, images);
/// let app = tolet_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, uploads::{ImageStore, UPLOAD_ROUTE}};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Destination for uploaded listing images
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config, images: Arc<dyn ImageStore>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            images,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /uploads/*                     # Stored listing images (public)
/// └── /api/
///     ├── GET  /properties           # Search available listings
///     ├── POST /properties           # Create listing (bearer token)
///     ├── GET  /properties/featured  # Featured listings
///     ├── GET  /properties/:id       # Listing detail
///     ├── POST /register
///     ├── POST /login
///     ├── POST /inquiries
///     ├── POST /contact
///     └── GET  /stats
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Request body limit
/// 4. Authentication (listing creation only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let require_auth =
        axum::middleware::from_fn_with_state(state.clone(), crate::middleware::require_account);

    let api_routes = Router::new()
        .route(
            "/properties",
            post(routes::properties::create_property)
                .route_layer(require_auth)
                .get(routes::properties::list_properties),
        )
        .route("/properties/featured", get(routes::properties::featured_properties))
        .route("/properties/:id", get(routes::properties::get_property))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/inquiries", post(routes::inquiries::create_inquiry))
        .route("/contact", post(routes::contact::send_message))
        .route("/stats", get(routes::stats::get_stats));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .nest_service(UPLOAD_ROUTE, ServeDir::new(&state.config.uploads.dir))
        .layer(DefaultBodyLimit::max(state.config.uploads.max_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
