use anyhow::Context;
use binwatch_sql::alerts::{AlertRecord, NewAlert};
use binwatch_sql::residents::Resident;
use binwatch_sql::AlertStatus;
use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use super::sms::SmsSender;

/// Bin weight at or above which residents are alerted, in pounds.
pub const MAX_ALLOWABLE_BIN_WEIGHT: f64 = 20.0;

/// A fill-weight reading queued for alert evaluation. The arrival time is
/// implicit: evaluation always compares against its own clock reading.
#[derive(Debug, Clone)]
pub struct WeightReading {
    pub bin_id: String,
    /// The measured load as it arrived on the wire, which may be a JSON
    /// number or a numeric string.
    pub load: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct AlertConfig {
    pub max_bin_weight: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            max_bin_weight: MAX_ALLOWABLE_BIN_WEIGHT,
        }
    }
}

/// Maps a bin to the residents registered to it.
pub trait ResidentDirectory: Send + Sync + 'static {
    /// Returns every resident whose registered bins include `bin_id`.
    /// An unknown bin is an empty vec, never an error.
    fn find_by_registered_bin<'s>(
        &'s self,
        bin_id: &'s str,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<Resident>>> + Send + 's;
}

/// The append-only record of notification attempts.
pub trait AlertLedger: Send + Sync + 'static {
    /// Returns the user's single latest alert row by creation time, or None
    /// if the user has never been alerted.
    fn most_recent_alert<'s>(
        &'s self,
        user_id: &'s str,
    ) -> impl std::future::Future<Output = anyhow::Result<Option<AlertRecord>>> + Send + 's;

    /// Appends a new row, returning its generated id. Never updates or
    /// merges with an existing row.
    fn record_alert<'s>(
        &'s self,
        new: NewAlert,
    ) -> impl std::future::Future<Output = anyhow::Result<Uuid>> + Send + 's;
}

/// Decides whether an incoming weight reading warrants notifying anyone,
/// sends the notifications, and records each attempt.
pub struct AlertEngine<D, L, S> {
    directory: D,
    ledger: L,
    sender: S,
    config: AlertConfig,
}

impl<D, L, S> AlertEngine<D, L, S>
where
    D: ResidentDirectory,
    L: AlertLedger,
    S: SmsSender,
{
    pub fn new(directory: D, ledger: L, sender: S, config: AlertConfig) -> Self {
        Self {
            directory,
            ledger,
            sender,
            config,
        }
    }

    /// Evaluate one reading, side effects only. All internal failures are
    /// logged and swallowed here so that a broken notification path can never
    /// surface to the ingestion caller.
    #[tracing::instrument(skip_all, fields(bin_id = %reading.bin_id))]
    pub async fn evaluate_reading(&self, reading: &WeightReading) {
        if let Err(error) = self.try_evaluate(Local::now(), reading).await {
            tracing::error!(?error, "alert evaluation failed");
        }
    }

    async fn try_evaluate(
        &self,
        now: DateTime<Local>,
        reading: &WeightReading,
    ) -> anyhow::Result<()> {
        let Some(load) = parse_load(reading.load.as_ref()) else {
            return Ok(());
        };
        if load < self.config.max_bin_weight {
            return Ok(());
        }

        let residents = self
            .directory
            .find_by_registered_bin(&reading.bin_id)
            .await
            .context("querying residents registered to bin")?;

        if residents.is_empty() {
            tracing::info!("no resident is registered to this bin");
            return Ok(());
        }

        // Residents are processed independently: one bad branch must not
        // starve the others of their notification.
        for resident in &residents {
            if let Err(error) = self.notify_resident(now, reading, load, resident).await {
                tracing::warn!(user_id = %resident.id, ?error, "notifying resident failed");
            }
        }
        Ok(())
    }

    async fn notify_resident(
        &self,
        now: DateTime<Local>,
        reading: &WeightReading,
        load: f64,
        resident: &Resident,
    ) -> anyhow::Result<()> {
        let last = self
            .ledger
            .most_recent_alert(&resident.id)
            .await
            .context("fetching most recent alert")?;

        if let Some(last) = last {
            if same_local_day(last.created_at, now) {
                tracing::debug!(user_id = %resident.id, "resident was already alerted today");
                return Ok(());
            }
        }

        let phone = resident
            .phone
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("resident has no phone number on file"))?;

        let message = weight_limit_message(&resident.first_name, load, self.config.max_bin_weight);

        let (status, provider_message_id) = match self.sender.send(&message, phone).await {
            Ok(receipt) => (AlertStatus::Delivered, receipt.message_id),
            Err(error) => {
                tracing::warn!(user_id = %resident.id, ?error, "sending SMS failed");
                (AlertStatus::Failed, None)
            }
        };

        self.ledger
            .record_alert(NewAlert {
                title: "Weight Limit Exceeded".to_string(),
                message,
                bin_id: reading.bin_id.clone(),
                bin_weight: load,
                user_id: resident.id.clone(),
                status,
                provider_message_id,
            })
            .await
            .context("recording alert")?;

        Ok(())
    }
}

fn weight_limit_message(first_name: &str, load: f64, limit: f64) -> String {
    format!(
        "Hello {first_name}. This is a reminder that your garbage bin is currently {load} lbs, \
         above our municipal weight limit of {limit} lbs. If it remains above the limit, our \
         collection team will not be able to collect it."
    )
}

/// Loads arrive as JSON numbers or numeric strings. Anything else does not
/// qualify for alerting.
fn parse_load(load: Option<&serde_json::Value>) -> Option<f64> {
    match load? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Calendar-day equality (year, month, day) in the server's local timezone.
/// This is deliberately not a sliding 24-hour window.
fn same_local_day(ts: DateTime<Utc>, now: DateTime<Local>) -> bool {
    ts.with_timezone(&Local).date_naive() == now.date_naive()
}
