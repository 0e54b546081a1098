//! Error responders preserving the service's historical wire contract:
//! ingestion failures answer 500 with plain text, read-back failures answer
//! 500 with `{"msg": "Error fetching data"}`.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

/// Failure of a primary ingestion write.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("reading does not name a binID")]
    MissingBinId,

    #[error("database error")]
    Sqlx(#[from] sqlx::Error),

    #[error("json serialization error")]
    Serde(#[from] serde_json::Error),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> axum::response::Response {
        error!(error = ?self, "error storing data");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Failure of a read-back query.
#[derive(Debug, thiserror::Error)]
pub enum ReadbackError {
    #[error("database error")]
    Sqlx(#[from] sqlx::Error),
}

impl IntoResponse for ReadbackError {
    fn into_response(self) -> axum::response::Response {
        error!(error = ?self, "error fetching data");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"msg": "Error fetching data"})),
        )
            .into_response()
    }
}
