//! Event-sourced aggregate support
//!
//! An aggregate mutates its state in exactly one place: [`Aggregate::apply`].
//! Commands validate first, then [`raise`](Aggregate::raise) events, which
//! applies each event immediately and records it as pending. Rehydration
//! from a stored stream goes through the same `apply`, so a replayed
//! aggregate enforces the same rules as a live one.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use super::error::UseCaseError;

/// A change event raised by an aggregate.
pub trait ChangeEvent: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Kebab-case action, e.g. `membership-role-assigned`.
    fn action(&self) -> &'static str;
    fn root_id(&self) -> &str;
    fn occurred_utc(&self) -> DateTime<Utc>;
}

/// Pending (not yet persisted) events plus the persisted stream version.
#[derive(Debug, Clone)]
pub struct ChangeLog<E> {
    persisted_version: u64,
    pending: Vec<E>,
}

impl<E> Default for ChangeLog<E> {
    fn default() -> Self {
        Self {
            persisted_version: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> ChangeLog<E> {
    /// Number of events already in the store for this aggregate.
    pub fn persisted_version(&self) -> u64 {
        self.persisted_version
    }

    /// Version the stream will have once pending events are appended.
    pub fn current_version(&self) -> u64 {
        self.persisted_version + self.pending.len() as u64
    }

    pub fn pending(&self) -> &[E] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn record(&mut self, event: E) {
        self.pending.push(event);
    }

    fn mark_replayed(&mut self) {
        self.persisted_version += 1;
    }

    /// Called after the store accepted the pending events.
    pub fn mark_committed(&mut self) {
        self.persisted_version += self.pending.len() as u64;
        self.pending.clear();
    }
}

pub trait Aggregate: Default + Sized {
    type Event: ChangeEvent;

    /// Stable name used in event types and store subjects.
    const AGGREGATE_TYPE: &'static str;

    fn id(&self) -> &str;

    /// Fold one event into state. The only place state changes.
    fn apply(&mut self, event: &Self::Event) -> Result<(), UseCaseError>;

    /// Whole-aggregate invariants, checked before persisting.
    fn ensure_invariants(&self) -> Result<(), UseCaseError>;

    fn changes(&self) -> &ChangeLog<Self::Event>;

    fn changes_mut(&mut self) -> &mut ChangeLog<Self::Event>;

    /// Apply `event` and record it as pending.
    fn raise(&mut self, event: Self::Event) -> Result<(), UseCaseError> {
        self.apply(&event)?;
        self.changes_mut().record(event);
        Ok(())
    }

    /// Rebuild state from a persisted stream, oldest first.
    fn rehydrate<I>(events: I) -> Result<Self, UseCaseError>
    where
        I: IntoIterator<Item = Self::Event>,
    {
        let mut aggregate = Self::default();
        for event in events {
            aggregate.apply(&event)?;
            aggregate.changes_mut().mark_replayed();
        }
        Ok(aggregate)
    }
}
