use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{App, IngestError};
use crate::alerts::{self, WeightReading};

/// An inbound sensor document. The identifying fields are pulled out and
/// validated here; any other fields the sensor sends ride along in `extra`
/// and are stored verbatim with the reading.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadingPayload {
    #[serde(rename = "binID", default, skip_serializing_if = "Option::is_none")]
    pub bin_id: Option<String>,
    #[serde(rename = "truckID", default, skip_serializing_if = "Option::is_none")]
    pub truck_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn stored() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Data received and stored successfully"}))
}

pub async fn store_fill_level(
    State(app): State<Arc<App>>,
    Json(payload): Json<ReadingPayload>,
) -> Result<Json<serde_json::Value>, IngestError> {
    let bin_id = payload.bin_id.as_deref().ok_or(IngestError::MissingBinId)?;
    let document = serde_json::to_value(&payload)?;

    binwatch_sql::readings::insert_fill_level(&app.pool, bin_id, &document).await?;

    Ok(stored())
}

pub async fn store_fill_weight(
    State(app): State<Arc<App>>,
    Json(payload): Json<ReadingPayload>,
) -> Result<Json<serde_json::Value>, IngestError> {
    let document = serde_json::to_value(&payload)?;

    if let Some(bin_id) = payload.bin_id.as_deref() {
        binwatch_sql::readings::insert_bin_fill_weight(&app.pool, bin_id, &document).await?;

        // Fire-and-forget: the response neither waits on nor reflects the
        // alerting outcome.
        alerts::dispatch(
            &app.alert_tx,
            WeightReading {
                bin_id: bin_id.to_string(),
                load: payload.load.clone(),
            },
        );
    } else if let Some(truck_id) = payload.truck_id.as_deref() {
        binwatch_sql::readings::insert_truck_fill_weight(&app.pool, truck_id, &document).await?;
    } else {
        // The original service accepted such readings without storing them.
        tracing::debug!("fill-weight reading names neither a bin nor a truck; nothing stored");
    }

    Ok(stored())
}

#[cfg(test)]
mod tests {
    use super::ReadingPayload;

    #[test]
    fn payload_extracts_ids_and_keeps_extra_fields() {
        let payload: ReadingPayload = serde_json::from_value(serde_json::json!({
            "binID": "B1",
            "load": "25",
            "battery_pct": 87,
            "firmware": "2.1.0",
        }))
        .unwrap();

        assert_eq!(payload.bin_id.as_deref(), Some("B1"));
        assert!(payload.truck_id.is_none());
        assert_eq!(payload.load, Some(serde_json::json!("25")));
        assert_eq!(payload.extra["battery_pct"], 87);
        assert_eq!(payload.extra["firmware"], "2.1.0");
    }

    #[test]
    fn payload_round_trips_to_the_stored_document() {
        let body = serde_json::json!({
            "truckID": "T7",
            "load": 142.5,
            "route": "north-9",
        });
        let payload: ReadingPayload = serde_json::from_value(body.clone()).unwrap();
        let document = serde_json::to_value(&payload).unwrap();
        assert_eq!(document, body);
    }

    #[test]
    fn numeric_loads_survive_the_boundary_untouched() {
        let payload: ReadingPayload =
            serde_json::from_value(serde_json::json!({"binID": "B1", "load": 25})).unwrap();
        assert_eq!(payload.load, Some(serde_json::json!(25)));
    }
}
