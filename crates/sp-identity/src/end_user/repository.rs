//! End User Repository
//!
//! Loads `EndUserRoot` aggregates by replaying their stream and saves
//! pending events with optimistic versioning.

use std::sync::Arc;

use sp_config::IdentityConfig;
use tracing::{debug, info};

use super::entity::EndUserRoot;
use super::events::EndUserEvent;
use crate::usecase::{Aggregate, EventEnvelope, EventStore, ExecutionContext, UseCaseError};

pub struct EndUserRepository {
    store: Arc<dyn EventStore<EndUserEvent>>,
    event_source: String,
}

impl EndUserRepository {
    pub fn new(store: Arc<dyn EventStore<EndUserEvent>>, config: &IdentityConfig) -> Self {
        Self::with_source(store, config.event_source.clone())
    }

    pub fn with_source(store: Arc<dyn EventStore<EndUserEvent>>, event_source: impl Into<String>) -> Self {
        Self {
            store,
            event_source: event_source.into(),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<EndUserRoot>, UseCaseError> {
        let envelopes = self.store.load(EndUserRoot::AGGREGATE_TYPE, id).await?;
        if envelopes.is_empty() {
            return Ok(None);
        }

        let count = envelopes.len();
        let root = EndUserRoot::rehydrate(envelopes.into_iter().map(|e| e.event))?;
        debug!(end_user_id = %id, events = count, "Rehydrated end user");
        Ok(Some(root))
    }

    /// Like [`find_by_id`](Self::find_by_id) but absent is an error.
    pub async fn load(&self, id: &str) -> Result<EndUserRoot, UseCaseError> {
        self.find_by_id(id).await?.ok_or_else(|| {
            UseCaseError::not_found(
                "END_USER_NOT_FOUND",
                format!("End user with ID '{}' not found", id),
            )
        })
    }

    /// Check invariants and append pending events at the version the
    /// aggregate was loaded at. Returns the new stream version.
    pub async fn save(
        &self,
        root: &mut EndUserRoot,
        ctx: &ExecutionContext,
    ) -> Result<u64, UseCaseError> {
        if !root.changes().has_pending() {
            debug!(end_user_id = %root.id(), "Nothing to save");
            return Ok(root.changes().persisted_version());
        }

        root.ensure_invariants()?;

        let expected_version = root.changes().persisted_version();
        let envelopes = root
            .changes()
            .pending()
            .iter()
            .cloned()
            .zip(expected_version + 1..)
            .map(|(event, version)| {
                EventEnvelope::wrap(
                    ctx,
                    &self.event_source,
                    EndUserRoot::AGGREGATE_TYPE,
                    version,
                    event,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let count = envelopes.len();

        let version = self
            .store
            .append(EndUserRoot::AGGREGATE_TYPE, root.id(), expected_version, envelopes)
            .await?;
        root.changes_mut().mark_committed();

        info!(
            end_user_id = %root.id(),
            events = count,
            version = version,
            "Saved end user"
        );
        Ok(version)
    }
}
