//! Alerting overview
//!
//! The `alerts` table is the singular source of truth for notifications that
//! have been attempted, one append-only row per attempt. A weight reading
//! ingested over HTTP is handed to the alert queue and evaluated off the
//! request path by the [`AlertEngine`]:
//!
//! - readings at or above the configured weight limit are matched against the
//!   residents registered to the bin;
//! - a resident whose most recent alert row falls on the current local
//!   calendar day is skipped, so nobody is texted twice in one day;
//! - everyone else gets an SMS through the configured [`Sender`], and the
//!   attempt is recorded whether or not the provider accepted it.
//!
//! The engine talks to the database and the SMS provider exclusively through
//! the `ResidentDirectory`, `AlertLedger`, and `SmsSender` seams, which keeps
//! the decision logic testable without either service. `PgStore` is the
//! production implementation of the first two; `Sender` of the third.
//!
//! Failures anywhere in this module are logged and contained: ingestion of
//! the raw reading never waits on, or fails because of, alerting.

mod engine;
mod queue;
mod sms;
mod store;

pub use engine::{
    AlertConfig, AlertEngine, AlertLedger, ResidentDirectory, WeightReading,
    MAX_ALLOWABLE_BIN_WEIGHT,
};
pub use queue::{channel, dispatch, serve_queue, Tx};
pub use sms::{Sender, SmsReceipt, SmsSender, TwilioSender};
pub use store::PgStore;
