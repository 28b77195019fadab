//! Log sink for platform events.
//!
//! [`EventLogSink`] drains the bus and writes one structured log line per
//! event. It stands in for the external real-time transport, which
//! subscribes to the same bus.

use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

/// Background task that logs every event published on the bus.
pub struct EventLogSink;

impl EventLogSink {
    /// Run the sink loop until the bus is dropped. Returns the number of
    /// events logged.
    pub async fn run(mut receiver: broadcast::Receiver<PlatformEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    Self::record(&event);
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event log sink lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(logged, "Event bus closed, log sink shutting down");
                    break;
                }
            }
        }
        logged
    }

    fn record(event: &PlatformEvent) {
        tracing::info!(
            event_type = %event.event_type,
            source_entity_type = event.source_entity_type.as_deref(),
            source_entity_id = event.source_entity_id,
            actor_id = event.actor_id.as_deref(),
            recipient_id = event.recipient_id.as_deref(),
            payload = %event.payload,
            "Platform event",
        );
    }
}
