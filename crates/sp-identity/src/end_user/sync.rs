//! Authorization Sync
//!
//! Outbound seam for role and feature changes. After a command's events
//! are committed, the use case hands the net assignment to an
//! `AuthorizationSync` so downstream authorization (policy caches, billing
//! entitlements) can follow. Empty assignments are never sent.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::roles_and_features::{FeatureAssignment, RoleAssignment};
use crate::usecase::UseCaseError;

#[async_trait]
pub trait AuthorizationSync: Send + Sync {
    async fn roles_changed(&self, assignment: &RoleAssignment) -> Result<(), UseCaseError>;

    async fn features_changed(&self, assignment: &FeatureAssignment) -> Result<(), UseCaseError>;
}

/// Discards every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuthorizationSync;

#[async_trait]
impl AuthorizationSync for NoopAuthorizationSync {
    async fn roles_changed(&self, _assignment: &RoleAssignment) -> Result<(), UseCaseError> {
        Ok(())
    }

    async fn features_changed(&self, _assignment: &FeatureAssignment) -> Result<(), UseCaseError> {
        Ok(())
    }
}

/// Keeps every change in memory, in call order.
#[derive(Debug, Default)]
pub struct RecordingAuthorizationSync {
    roles: Mutex<Vec<RoleAssignment>>,
    features: Mutex<Vec<FeatureAssignment>>,
}

impl RecordingAuthorizationSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role_assignments(&self) -> Vec<RoleAssignment> {
        self.roles.lock().clone()
    }

    pub fn feature_assignments(&self) -> Vec<FeatureAssignment> {
        self.features.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.roles.lock().len() + self.features.lock().len()
    }
}

#[async_trait]
impl AuthorizationSync for RecordingAuthorizationSync {
    async fn roles_changed(&self, assignment: &RoleAssignment) -> Result<(), UseCaseError> {
        self.roles.lock().push(assignment.clone());
        Ok(())
    }

    async fn features_changed(&self, assignment: &FeatureAssignment) -> Result<(), UseCaseError> {
        self.features.lock().push(assignment.clone());
        Ok(())
    }
}
