use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// A resident registered to one or more bins. Residents are created by the
/// registration flow and are read-only here; field names on the wire match
/// what that flow stores.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Resident {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub registered_bins: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Returns every resident whose `registered_bins` contains `bin_id`.
/// An unknown bin yields an empty vec, not an error.
pub async fn find_by_registered_bin(
    pool: &PgPool,
    bin_id: &str,
) -> Result<Vec<Resident>, sqlx::Error> {
    sqlx::query_as::<_, Resident>(
        r#"
        select id, first_name, phone, registered_bins, created_at
        from residents
        where $1 = any(registered_bins)
        "#,
    )
    .bind(bin_id)
    .fetch_all(pool)
    .await
}

/// Returns the ten most recently created residents, newest first.
pub async fn recently_created(pool: &PgPool) -> Result<Vec<Resident>, sqlx::Error> {
    sqlx::query_as::<_, Resident>(
        r#"
        select id, first_name, phone, registered_bins, created_at
        from residents
        order by created_at desc
        limit 10
        "#,
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::Resident;

    #[test]
    fn resident_wire_shape_matches_stored_field_names() {
        let resident = Resident {
            id: "r-100".to_string(),
            first_name: "Dana".to_string(),
            phone: Some("+15550100".to_string()),
            registered_bins: vec!["B1".to_string(), "B2".to_string()],
            created_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let value = serde_json::to_value(&resident).unwrap();
        assert_eq!(value["firstName"], "Dana");
        assert_eq!(value["phone"], "+15550100");
        assert_eq!(
            value["registered_bins"],
            serde_json::json!(["B1", "B2"])
        );
        assert!(value.get("first_name").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn resident_without_phone_omits_the_field() {
        let resident = Resident {
            id: "r-101".to_string(),
            first_name: "Lee".to_string(),
            phone: None,
            registered_bins: vec![],
            created_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let value = serde_json::to_value(&resident).unwrap();
        assert!(value.get("phone").is_none());
    }
}
