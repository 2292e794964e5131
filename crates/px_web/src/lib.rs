use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::info;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

fn cors_layer(origins: &[String]) -> px_core::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim()).map_err(|e| {
                px_core::Error::External(anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
        })
        .collect::<px_core::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn create_app(state: AppState, cors_origins: &[String]) -> px_core::Result<Router> {
    let cors = cors_layer(cors_origins)?;

    Ok(Router::new()
        .route("/search", get(handlers::search_by_query))
        .route("/search/:query", get(handlers::search_by_path))
        .route("/save", post(handlers::save_articles))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state)))
}

pub async fn serve(app: Router, bind: &str) -> px_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use px_core::{Article, Result, Error};
    pub use crate::AppState;
}
