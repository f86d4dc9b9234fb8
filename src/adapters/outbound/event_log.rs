use crate::common::EventEnvelope;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Sender for planning events plus a task that traces each envelope.
///
/// The handle resolves to the number of envelopes seen once every sender is dropped.
pub fn init_event_log(capacity: usize) -> (mpsc::Sender<EventEnvelope>, JoinHandle<usize>) {
    let (tx, mut rx) = mpsc::channel::<EventEnvelope>(capacity.max(1));

    let drain = tokio::spawn(async move {
        let mut seen = 0;
        while let Some(envelope) = rx.recv().await {
            seen += 1;
            debug!(event = %envelope.event_type, aggregate = %envelope.aggregate_id, "planning event");
        }
        seen
    });

    (tx, drain)
}
