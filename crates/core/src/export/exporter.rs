//! Batch exporter with per-event and per-chunk failure isolation
//!
//! Splits a batch into contiguous chunks of at most [`MAX_BATCH_SIZE`]
//! events, translates each event independently and dispatches each chunk in
//! order. An event that fails translation is dropped from its chunk; a chunk
//! that fails to dispatch is abandoned. Neither stops the rest of the batch,
//! and nothing is returned as an error.

use std::sync::Arc;

use kube_eventbridge_domain::constants::MAX_BATCH_SIZE;
use kube_eventbridge_domain::{ClusterEvent, CloudEvent, Result};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::client_manager::ClientManager;
use crate::translate::EventTranslator;

/// Outcome counters of one export call. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Chunks attempted (`ceil(events / 16)`)
    pub chunks: usize,
    /// Chunks accepted by the transport
    pub dispatched_chunks: usize,
    /// Chunks abandoned after a client or transport failure
    pub failed_chunks: usize,
    /// Events translated into envelopes
    pub translated: usize,
    /// Events dropped because translation failed
    pub dropped: usize,
}

/// Translates and dispatches event batches in bounded chunks.
pub struct BatchExporter {
    translator: EventTranslator,
    clients: Arc<ClientManager>,
}

impl BatchExporter {
    pub fn new(translator: EventTranslator, clients: Arc<ClientManager>) -> Self {
        Self { translator, clients }
    }

    /// Export `events`, returning after every chunk has been attempted.
    #[instrument(skip_all, fields(events = events.len()))]
    pub async fn export<E: ClusterEvent>(&self, events: &[E]) -> ExportSummary {
        let mut summary = ExportSummary::default();

        if events.is_empty() {
            return summary;
        }

        for (index, chunk) in events.chunks(MAX_BATCH_SIZE).enumerate() {
            summary.chunks += 1;

            let envelopes = self.translate_chunk(index, chunk, &mut summary);

            match self.dispatch(&envelopes).await {
                Ok(()) => {
                    summary.dispatched_chunks += 1;
                    debug!(chunk = index, envelopes = envelopes.len(), "put events to EventBridge");
                }
                Err(err) => {
                    summary.failed_chunks += 1;
                    error!(
                        chunk = index,
                        envelopes = envelopes.len(),
                        error = %err,
                        error_type = err.label(),
                        "failed to put events to EventBridge"
                    );
                }
            }
        }

        if summary.failed_chunks > 0 || summary.dropped > 0 {
            warn!(
                chunks = summary.chunks,
                failed_chunks = summary.failed_chunks,
                dropped = summary.dropped,
                "export completed with errors"
            );
        } else {
            info!(chunks = summary.chunks, translated = summary.translated, "export completed");
        }

        summary
    }

    fn translate_chunk<E: ClusterEvent>(
        &self,
        chunk_index: usize,
        chunk: &[E],
        summary: &mut ExportSummary,
    ) -> Vec<CloudEvent> {
        let mut envelopes = Vec::with_capacity(chunk.len());

        for event in chunk {
            match self.translator.translate(event) {
                Ok(envelope) => {
                    summary.translated += 1;
                    envelopes.push(envelope);
                }
                Err(err) => {
                    summary.dropped += 1;
                    let reference = event.object_reference();
                    error!(
                        chunk = chunk_index,
                        namespace = %reference.namespace,
                        name = %reference.name,
                        kind = %reference.kind,
                        error = %err,
                        "failed to convert event to cloudevent"
                    );
                }
            }
        }

        envelopes
    }

    async fn dispatch(&self, envelopes: &[CloudEvent]) -> Result<()> {
        let client = self.clients.get_client().await?;
        client.put_events(envelopes).await
    }
}
