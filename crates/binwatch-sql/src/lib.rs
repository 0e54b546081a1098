pub mod alerts;
pub mod readings;
pub mod residents;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Delivery outcome recorded with each alert row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_status")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Delivered,
    Failed,
}

impl Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            AlertStatus::Delivered => "delivered",
            AlertStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}
