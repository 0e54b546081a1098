use super::engine::{AlertEngine, AlertLedger, ResidentDirectory, WeightReading};
use super::sms::SmsSender;

// Tx is the channel sender of readings awaiting alert evaluation.
pub type Tx = tokio::sync::mpsc::Sender<WeightReading>;

pub fn channel(depth: usize) -> (Tx, tokio::sync::mpsc::Receiver<WeightReading>) {
    tokio::sync::mpsc::channel(depth)
}

/// Hands a reading to the evaluation worker without waiting on it. A full or
/// closed queue drops the reading, and the drop is logged so the reading is
/// never silently lost.
pub fn dispatch(tx: &Tx, reading: WeightReading) {
    use tokio::sync::mpsc::error::TrySendError;

    match tx.try_send(reading) {
        Ok(()) => (),
        Err(TrySendError::Full(reading)) => {
            tracing::error!(bin_id = %reading.bin_id, "alert queue is full, dropping reading");
        }
        Err(TrySendError::Closed(reading)) => {
            tracing::error!(bin_id = %reading.bin_id, "alert queue is closed, dropping reading");
        }
    }
}

/// serve_queue drains readings from the receiver, evaluating each in turn.
/// It completes once every Tx handle has dropped and the queue is empty.
#[tracing::instrument(skip_all)]
pub async fn serve_queue<D, L, S>(
    engine: AlertEngine<D, L, S>,
    mut rx: tokio::sync::mpsc::Receiver<WeightReading>,
) -> anyhow::Result<()>
where
    D: ResidentDirectory,
    L: AlertLedger,
    S: SmsSender,
{
    while let Some(reading) = rx.recv().await {
        engine.evaluate_reading(&reading).await;
    }
    tracing::debug!("alert queue drained and all senders dropped; exiting");
    Ok(())
}
