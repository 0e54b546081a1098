use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// A stored sensor reading, as returned by the read-back endpoints. The
/// payload is the full document the sensor posted; it is flattened into the
/// response so clients see `{id, timestamp, ...fields}` as they always have.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReadingRecord {
    pub id: Uuid,
    #[serde(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: Json<serde_json::Value>,
}

pub async fn insert_fill_level(
    pool: &PgPool,
    bin_id: &str,
    payload: &serde_json::Value,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        insert into fill_level_readings (id, bin_id, payload)
        values ($1, $2, $3)
        "#,
    )
    .bind(id)
    .bind(bin_id)
    .bind(Json(payload))
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn insert_bin_fill_weight(
    pool: &PgPool,
    bin_id: &str,
    payload: &serde_json::Value,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        insert into fill_weight_readings (id, bin_id, payload)
        values ($1, $2, $3)
        "#,
    )
    .bind(id)
    .bind(bin_id)
    .bind(Json(payload))
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn insert_truck_fill_weight(
    pool: &PgPool,
    truck_id: &str,
    payload: &serde_json::Value,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        insert into fill_weight_readings (id, truck_id, payload)
        values ($1, $2, $3)
        "#,
    )
    .bind(id)
    .bind(truck_id)
    .bind(Json(payload))
    .execute(pool)
    .await?;
    Ok(id)
}

/// Last ten fill-level readings for a bin, newest first.
pub async fn recent_fill_levels(
    pool: &PgPool,
    bin_id: &str,
) -> Result<Vec<ReadingRecord>, sqlx::Error> {
    sqlx::query_as::<_, ReadingRecord>(
        r#"
        select id, recorded_at, payload
        from fill_level_readings
        where bin_id = $1
        order by recorded_at desc
        limit 10
        "#,
    )
    .bind(bin_id)
    .fetch_all(pool)
    .await
}

/// Last ten fill-weight readings for a bin, newest first.
pub async fn recent_bin_fill_weights(
    pool: &PgPool,
    bin_id: &str,
) -> Result<Vec<ReadingRecord>, sqlx::Error> {
    sqlx::query_as::<_, ReadingRecord>(
        r#"
        select id, recorded_at, payload
        from fill_weight_readings
        where bin_id = $1
        order by recorded_at desc
        limit 10
        "#,
    )
    .bind(bin_id)
    .fetch_all(pool)
    .await
}

/// Last ten fill-weight readings for a collection truck, newest first.
pub async fn recent_truck_fill_weights(
    pool: &PgPool,
    truck_id: &str,
) -> Result<Vec<ReadingRecord>, sqlx::Error> {
    sqlx::query_as::<_, ReadingRecord>(
        r#"
        select id, recorded_at, payload
        from fill_weight_readings
        where truck_id = $1
        order by recorded_at desc
        limit 10
        "#,
    )
    .bind(truck_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::ReadingRecord;
    use sqlx::types::Json;

    #[test]
    fn reading_record_flattens_the_stored_document() {
        let record = ReadingRecord {
            id: uuid::Uuid::nil(),
            recorded_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            payload: Json(serde_json::json!({
                "binID": "B1",
                "load": "25",
                "battery_pct": 87,
            })),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(value["binID"], "B1");
        assert_eq!(value["load"], "25");
        assert_eq!(value["battery_pct"], 87);
        assert!(value.get("timestamp").is_some());
        assert!(value.get("payload").is_none());
    }
}
