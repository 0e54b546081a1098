use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use binwatch_sql::readings::ReadingRecord;
use binwatch_sql::residents::Resident;
use std::sync::Arc;

use super::{App, ReadbackError};

pub async fn fill_level_data(
    State(app): State<Arc<App>>,
    Path(bin_id): Path<String>,
) -> Result<Json<Vec<ReadingRecord>>, ReadbackError> {
    let records = binwatch_sql::readings::recent_fill_levels(&app.pool, &bin_id).await?;
    Ok(Json(records))
}

pub async fn bin_fill_weight_data(
    State(app): State<Arc<App>>,
    Path(bin_id): Path<String>,
) -> Result<Json<Vec<ReadingRecord>>, ReadbackError> {
    let records = binwatch_sql::readings::recent_bin_fill_weights(&app.pool, &bin_id).await?;
    Ok(Json(records))
}

pub async fn truck_fill_weight_data(
    State(app): State<Arc<App>>,
    Path(truck_id): Path<String>,
) -> Result<Json<Vec<ReadingRecord>>, ReadbackError> {
    let records = binwatch_sql::readings::recent_truck_fill_weights(&app.pool, &truck_id).await?;
    Ok(Json(records))
}

pub async fn residents(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<Resident>>, ReadbackError> {
    let residents = binwatch_sql::residents::recently_created(&app.pool).await?;
    Ok(Json(residents))
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
