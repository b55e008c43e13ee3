//! Membership entity
//!
//! An end user's standing in one organization: the roles and features they
//! hold there and whether it is their default organization. Owned by the
//! [`Memberships`](super::Memberships) collection of one root.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::events::{
    MembershipAdded, MembershipDefaultChanged, MembershipFeatureChange, MembershipFeaturesReset,
    MembershipRoleChange,
};
use crate::authorization::{FeatureCatalog, Features, Roles, TenantFeatures, TenantRoles};
use crate::details;
use crate::usecase::UseCaseError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub root_id: String,
    pub organization_id: String,
    pub is_default: bool,
    pub roles: Roles,
    pub features: Features,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn from_added(event: &MembershipAdded) -> Result<Self, UseCaseError> {
        Ok(Self {
            id: event.membership_id.clone(),
            root_id: event.root_id.clone(),
            organization_id: event.organization_id.clone(),
            is_default: event.is_default,
            roles: Roles::from_names(event.roles.iter().cloned())?,
            features: Features::from_names(event.features.iter().cloned())?,
            created_at: event.occurred_utc,
        })
    }

    pub fn apply_default_changed(&mut self, event: &MembershipDefaultChanged) {
        if self.id == event.from_membership_id {
            self.is_default = false;
        }
        if self.id == event.to_membership_id {
            self.is_default = true;
        }
    }

    pub fn apply_role_assigned(&mut self, event: &MembershipRoleChange) -> Result<(), UseCaseError> {
        self.roles = self.roles.add(event.role.as_str())?;
        Ok(())
    }

    pub fn apply_role_unassigned(&mut self, event: &MembershipRoleChange) {
        self.roles = self.roles.remove(&event.role);
    }

    pub fn apply_feature_assigned(
        &mut self,
        event: &MembershipFeatureChange,
    ) -> Result<(), UseCaseError> {
        self.features = self.features.add(event.feature.as_str())?;
        Ok(())
    }

    pub fn apply_feature_unassigned(&mut self, event: &MembershipFeatureChange) {
        self.features = self.features.remove(&event.feature);
    }

    /// Features become the requested set plus the tenant baseline.
    pub fn apply_features_reset(
        &mut self,
        event: &MembershipFeaturesReset,
    ) -> Result<(), UseCaseError> {
        self.features = Features::from_names(event.features.iter().cloned())?
            .add_feature(TenantFeatures::BASELINE.feature());
        Ok(())
    }

    pub fn is_owner(&self) -> bool {
        self.roles.has_role(TenantRoles::OWNER.name)
    }

    pub fn ensure_invariants(&self) -> Result<(), UseCaseError> {
        if !self.features.has_feature(TenantFeatures::BASELINE.name) {
            return Err(UseCaseError::business_rule_with_details(
                "MEMBERSHIP_MISSING_BASELINE_FEATURE",
                format!(
                    "Membership in organization '{}' must hold the '{}' feature",
                    self.organization_id,
                    TenantFeatures::BASELINE.name
                ),
                details! {
                    "membershipId" => &self.id,
                    "organizationId" => &self.organization_id,
                },
            ));
        }
        Ok(())
    }
}
