use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use tower_http::cors::{self, CorsLayer};

mod error;
mod ingest;
mod readback;

pub use error::{IngestError, ReadbackError};
pub use ingest::ReadingPayload;

/// Shared state for API handlers.
pub struct App {
    pub pool: sqlx::PgPool,
    pub alert_tx: crate::alerts::Tx,
}

/// Build the service's API router.
pub fn build_router(app: Arc<App>, cors: CorsLayer) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/fill-level", post(ingest::store_fill_level))
        .route("/fill-weight", post(ingest::store_fill_weight))
        .route("/fill-level-data/:bin_id", get(readback::fill_level_data))
        .route(
            "/fill-weight-data/bins/:bin_id",
            get(readback::bin_fill_weight_data),
        )
        .route(
            "/fill-weight-data/trucks/:truck_id",
            get(readback::truck_fill_weight_data),
        )
        .route("/residents", get(readback::residents))
        .route("/healthz", get(readback::healthz))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app)
}

/// CORS policy for the resident-facing dashboard: browsers may GET and POST
/// from the configured origins.
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    if allowed_origins == ["*"] {
        Ok(layer.allow_origin(cors::Any))
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("parsing allowed CORS origin '{origin}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(layer.allow_origin(origins))
    }
}
