//! Event Store
//!
//! Persistence seam for aggregate streams. Appends are guarded by the
//! expected stream version: a writer that loaded version N can only append
//! if the stream is still at N, so concurrent commands against the same
//! aggregate resolve as first-writer-wins.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::aggregate::ChangeEvent;
use super::domain_event::{DomainEvent, EventEnvelope};
use super::error::UseCaseError;
use crate::details;

#[async_trait]
pub trait EventStore<E: ChangeEvent>: Send + Sync {
    /// Full stream, oldest first. Empty when the aggregate does not exist.
    async fn load(
        &self,
        aggregate_type: &str,
        aggregate_id: &str,
    ) -> Result<Vec<EventEnvelope<E>>, UseCaseError>;

    /// Append `events` if the stream is at `expected_version`.
    /// Returns the new stream version.
    async fn append(
        &self,
        aggregate_type: &str,
        aggregate_id: &str,
        expected_version: u64,
        events: Vec<EventEnvelope<E>>,
    ) -> Result<u64, UseCaseError>;
}

/// In-memory store for tests and local tooling.
pub struct InMemoryEventStore<E> {
    streams: Mutex<HashMap<String, Vec<EventEnvelope<E>>>>,
}

impl<E> InMemoryEventStore<E> {
    pub fn new() -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
        }
    }

    fn stream_key(aggregate_type: &str, aggregate_id: &str) -> String {
        format!("{}/{}", aggregate_type, aggregate_id)
    }
}

impl<E: Clone> InMemoryEventStore<E> {
    /// Snapshot of one stream.
    pub fn stream(&self, aggregate_type: &str, aggregate_id: &str) -> Vec<EventEnvelope<E>> {
        self.streams
            .lock()
            .get(&Self::stream_key(aggregate_type, aggregate_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of events across all streams.
    pub fn event_count(&self) -> usize {
        self.streams.lock().values().map(Vec::len).sum()
    }
}

impl<E> Default for InMemoryEventStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: ChangeEvent> EventStore<E> for InMemoryEventStore<E> {
    async fn load(
        &self,
        aggregate_type: &str,
        aggregate_id: &str,
    ) -> Result<Vec<EventEnvelope<E>>, UseCaseError> {
        Ok(self.stream(aggregate_type, aggregate_id))
    }

    async fn append(
        &self,
        aggregate_type: &str,
        aggregate_id: &str,
        expected_version: u64,
        events: Vec<EventEnvelope<E>>,
    ) -> Result<u64, UseCaseError> {
        let mut streams = self.streams.lock();
        let stream = streams
            .entry(Self::stream_key(aggregate_type, aggregate_id))
            .or_default();

        let actual_version = stream.len() as u64;
        if actual_version != expected_version {
            return Err(UseCaseError::concurrency_with_details(
                "STREAM_VERSION_CONFLICT",
                format!(
                    "Stream '{}' was modified by another writer",
                    aggregate_id
                ),
                details! {
                    "aggregateId" => aggregate_id,
                    "expectedVersion" => expected_version,
                    "actualVersion" => actual_version,
                },
            ));
        }

        for envelope in &events {
            debug!(
                event_id = envelope.event_id(),
                event_type = envelope.event_type(),
                stream_version = envelope.stream_version,
                "Appending event"
            );
        }
        stream.extend(events);

        Ok(stream.len() as u64)
    }
}
