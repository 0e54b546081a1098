use anyhow::Context;
use binwatch_sql::alerts::{AlertRecord, NewAlert};
use binwatch_sql::residents::Resident;
use sqlx::PgPool;
use uuid::Uuid;

use super::engine::{AlertLedger, ResidentDirectory};

/// Postgres-backed implementation of the engine's directory and ledger seams.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> PgStore {
        PgStore { pool }
    }
}

impl ResidentDirectory for PgStore {
    async fn find_by_registered_bin<'s>(&'s self, bin_id: &'s str) -> anyhow::Result<Vec<Resident>> {
        let residents = binwatch_sql::residents::find_by_registered_bin(&self.pool, bin_id)
            .await
            .context("querying residents by registered bin")?;
        Ok(residents)
    }
}

impl AlertLedger for PgStore {
    async fn most_recent_alert<'s>(&'s self, user_id: &'s str) -> anyhow::Result<Option<AlertRecord>> {
        let record = binwatch_sql::alerts::most_recent_for_user(&self.pool, user_id)
            .await
            .context("querying most recent alert for user")?;
        Ok(record)
    }

    async fn record_alert<'s>(&'s self, new: NewAlert) -> anyhow::Result<Uuid> {
        let id = binwatch_sql::alerts::insert(&self.pool, new)
            .await
            .context("inserting alert row")?;
        Ok(id)
    }
}
