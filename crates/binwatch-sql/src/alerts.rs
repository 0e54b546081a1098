use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::AlertStatus;

/// A persisted notification event from the `alerts` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct AlertRecord {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub bin_id: String,
    pub bin_weight: f64,
    pub user_id: String,
    pub status: AlertStatus,
    pub provider_message_id: Option<String>,
}

/// An alert row which has not been written yet. `id` is generated at insert
/// and `created_at` is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub title: String,
    pub message: String,
    pub bin_id: String,
    pub bin_weight: f64,
    pub user_id: String,
    pub status: AlertStatus,
    pub provider_message_id: Option<String>,
}

/// Returns the single latest alert for the user by `created_at`, or None if
/// the user has never been alerted.
pub async fn most_recent_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<AlertRecord>, sqlx::Error> {
    sqlx::query_as::<_, AlertRecord>(
        r#"
        select id, title, message, created_at, bin_id, bin_weight,
               user_id, status, provider_message_id
        from alerts
        where user_id = $1
        order by created_at desc
        limit 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Appends a new alert row and returns its generated id. Append-only: there
/// is no update or merge path for an existing row.
pub async fn insert(pool: &PgPool, new: NewAlert) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        insert into alerts
            (id, title, message, bin_id, bin_weight, user_id, status, provider_message_id)
        values ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(&new.title)
    .bind(&new.message)
    .bind(&new.bin_id)
    .bind(new.bin_weight)
    .bind(&new.user_id)
    .bind(new.status)
    .bind(&new.provider_message_id)
    .execute(pool)
    .await?;

    tracing::info!(%id, user_id = %new.user_id, bin_id = %new.bin_id, status = %new.status, "recorded alert");

    Ok(id)
}
