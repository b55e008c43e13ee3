//! Role and feature assignment on `EndUserRoot`
//!
//! Every command runs the same steps, all before any event is raised:
//!
//! 1. baseline entries can never be unassigned, whoever asks
//! 2. the assigner must be allowed to make the change
//! 3. every requested entry must be assignable in the target scope
//!
//! Entries the target already holds (or already lacks, when unassigning)
//! are skipped without an event. One event is raised per remaining entry
//! and the net set is returned as an assignment value for the caller to
//! propagate to downstream authorization.

use chrono::Utc;
use serde::Serialize;

use super::entity::EndUserRoot;
use super::events::{
    EndUserEvent, MembershipFeatureChange, MembershipFeaturesReset, MembershipRoleChange,
    PlatformFeatureChange, PlatformFeaturesReset, PlatformRoleChange,
};
use crate::authorization::{
    Assigner, FeatureCatalog, Features, PlatformFeatures, PlatformRoles, RoleCatalog, Roles,
    SubscriptionTier, TenantFeatures, TenantRoles,
};
use crate::details;
use crate::usecase::{Aggregate, UseCaseError};

/// Where an assignment landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "camelCase")]
pub enum AssignmentTarget {
    Platform,
    #[serde(rename_all = "camelCase")]
    Membership {
        organization_id: String,
        membership_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentChange {
    Assigned,
    Unassigned,
    /// The set is the complete post-reset feature set.
    Reset,
}

/// Net role change produced by one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub root_id: String,
    pub target: AssignmentTarget,
    pub change: AssignmentChange,
    pub roles: Roles,
}

impl RoleAssignment {
    pub fn is_empty(&self) -> bool {
        self.roles.has_none()
    }
}

/// Net feature change produced by one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAssignment {
    pub root_id: String,
    pub target: AssignmentTarget,
    pub change: AssignmentChange,
    pub features: Features,
}

impl FeatureAssignment {
    pub fn is_empty(&self) -> bool {
        self.features.has_none()
    }
}

fn ensure_assignable_roles<C: RoleCatalog>(roles: &Roles) -> Result<(), UseCaseError> {
    match roles.iter().find(|role| !C::is_assignable(role.name())) {
        Some(role) => Err(UseCaseError::business_rule_with_details(
            "ROLE_NOT_ASSIGNABLE",
            format!("Role '{}' cannot be assigned at {} scope", role, C::SCOPE),
            details! { "role" => role.name(), "scope" => C::SCOPE.as_str() },
        )),
        None => Ok(()),
    }
}

fn ensure_assignable_features<C: FeatureCatalog>(features: &Features) -> Result<(), UseCaseError> {
    match features.iter().find(|feature| !C::is_assignable(feature.name())) {
        Some(feature) => Err(UseCaseError::business_rule_with_details(
            "FEATURE_NOT_ASSIGNABLE",
            format!("Feature '{}' cannot be assigned at {} scope", feature, C::SCOPE),
            details! { "feature" => feature.name(), "scope" => C::SCOPE.as_str() },
        )),
        None => Ok(()),
    }
}

fn protect_baseline_role<C: RoleCatalog>(roles: &Roles) -> Result<(), UseCaseError> {
    if roles.has_role(C::BASELINE.name) {
        return Err(UseCaseError::business_rule_with_details(
            "BASELINE_ROLE_PROTECTED",
            format!("Baseline role '{}' cannot be unassigned", C::BASELINE.name),
            details! { "role" => C::BASELINE.name, "scope" => C::SCOPE.as_str() },
        ));
    }
    Ok(())
}

fn protect_baseline_feature<C: FeatureCatalog>(features: &Features) -> Result<(), UseCaseError> {
    if features.has_feature(C::BASELINE.name) {
        return Err(UseCaseError::business_rule_with_details(
            "BASELINE_FEATURE_PROTECTED",
            format!("Baseline feature '{}' cannot be unassigned", C::BASELINE.name),
            details! { "feature" => C::BASELINE.name, "scope" => C::SCOPE.as_str() },
        ));
    }
    Ok(())
}

/// Requested entries not yet held.
fn new_roles(requested: &Roles, held: &Roles) -> Roles {
    requested.iter().filter(|r| !held.has_role(r.name())).cloned().collect()
}

/// Requested entries currently held.
fn held_roles(requested: &Roles, held: &Roles) -> Roles {
    requested.iter().filter(|r| held.has_role(r.name())).cloned().collect()
}

fn new_features(requested: &Features, held: &Features) -> Features {
    requested.iter().filter(|f| !held.has_feature(f.name())).cloned().collect()
}

fn held_features(requested: &Features, held: &Features) -> Features {
    requested.iter().filter(|f| held.has_feature(f.name())).cloned().collect()
}

impl EndUserRoot {
    pub fn assign_platform_roles(
        &mut self,
        assigner: &Assigner,
        roles: &Roles,
    ) -> Result<RoleAssignment, UseCaseError> {
        assigner.require_platform_operator("assign platform roles")?;
        self.require_registered()?;
        ensure_assignable_roles::<PlatformRoles>(roles)?;

        let granted = new_roles(roles, self.roles());
        for role in &granted {
            self.raise(EndUserEvent::PlatformRoleAssigned(self.platform_role_change(role.name())))?;
        }
        Ok(self.platform_role_assignment(AssignmentChange::Assigned, granted))
    }

    pub fn unassign_platform_roles(
        &mut self,
        assigner: &Assigner,
        roles: &Roles,
    ) -> Result<RoleAssignment, UseCaseError> {
        protect_baseline_role::<PlatformRoles>(roles)?;
        assigner.require_platform_operator("unassign platform roles")?;
        self.require_registered()?;
        ensure_assignable_roles::<PlatformRoles>(roles)?;

        let revoked = held_roles(roles, self.roles());
        for role in &revoked {
            self.raise(EndUserEvent::PlatformRoleUnassigned(self.platform_role_change(role.name())))?;
        }
        Ok(self.platform_role_assignment(AssignmentChange::Unassigned, revoked))
    }

    pub fn assign_platform_features(
        &mut self,
        assigner: &Assigner,
        features: &Features,
    ) -> Result<FeatureAssignment, UseCaseError> {
        assigner.require_platform_operator("assign platform features")?;
        self.require_registered()?;
        ensure_assignable_features::<PlatformFeatures>(features)?;

        let granted = new_features(features, self.features());
        for feature in &granted {
            self.raise(EndUserEvent::PlatformFeatureAssigned(
                self.platform_feature_change(feature.name()),
            ))?;
        }
        Ok(self.platform_feature_assignment(AssignmentChange::Assigned, granted))
    }

    pub fn unassign_platform_features(
        &mut self,
        assigner: &Assigner,
        features: &Features,
    ) -> Result<FeatureAssignment, UseCaseError> {
        protect_baseline_feature::<PlatformFeatures>(features)?;
        assigner.require_platform_operator("unassign platform features")?;
        self.require_registered()?;
        ensure_assignable_features::<PlatformFeatures>(features)?;

        let revoked = held_features(features, self.features());
        for feature in &revoked {
            self.raise(EndUserEvent::PlatformFeatureUnassigned(
                self.platform_feature_change(feature.name()),
            ))?;
        }
        Ok(self.platform_feature_assignment(AssignmentChange::Unassigned, revoked))
    }

    pub fn assign_membership_roles(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
        roles: &Roles,
    ) -> Result<RoleAssignment, UseCaseError> {
        assigner.require_organization_owner(organization_id, "assign membership roles")?;
        let membership = self.require_membership(organization_id)?;
        ensure_assignable_roles::<TenantRoles>(roles)?;

        let membership_id = membership.id.clone();
        let granted = new_roles(roles, &membership.roles);
        for role in &granted {
            self.raise(EndUserEvent::MembershipRoleAssigned(MembershipRoleChange {
                root_id: self.id().to_string(),
                occurred_utc: Utc::now(),
                organization_id: organization_id.to_string(),
                membership_id: membership_id.clone(),
                role: role.name().to_string(),
            }))?;
        }
        Ok(self.membership_role_assignment(
            organization_id,
            membership_id,
            AssignmentChange::Assigned,
            granted,
        ))
    }

    pub fn unassign_membership_roles(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
        roles: &Roles,
    ) -> Result<RoleAssignment, UseCaseError> {
        protect_baseline_role::<TenantRoles>(roles)?;
        assigner.require_organization_owner(organization_id, "unassign membership roles")?;
        let membership = self.require_membership(organization_id)?;
        ensure_assignable_roles::<TenantRoles>(roles)?;

        let membership_id = membership.id.clone();
        let revoked = held_roles(roles, &membership.roles);
        for role in &revoked {
            self.raise(EndUserEvent::MembershipRoleUnassigned(MembershipRoleChange {
                root_id: self.id().to_string(),
                occurred_utc: Utc::now(),
                organization_id: organization_id.to_string(),
                membership_id: membership_id.clone(),
                role: role.name().to_string(),
            }))?;
        }
        Ok(self.membership_role_assignment(
            organization_id,
            membership_id,
            AssignmentChange::Unassigned,
            revoked,
        ))
    }

    pub fn assign_membership_features(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
        features: &Features,
    ) -> Result<FeatureAssignment, UseCaseError> {
        assigner.require_organization_owner(organization_id, "assign membership features")?;
        let membership = self.require_membership(organization_id)?;
        ensure_assignable_features::<TenantFeatures>(features)?;

        let membership_id = membership.id.clone();
        let granted = new_features(features, &membership.features);
        for feature in &granted {
            self.raise(EndUserEvent::MembershipFeatureAssigned(MembershipFeatureChange {
                root_id: self.id().to_string(),
                occurred_utc: Utc::now(),
                organization_id: organization_id.to_string(),
                membership_id: membership_id.clone(),
                feature: feature.name().to_string(),
            }))?;
        }
        Ok(self.membership_feature_assignment(
            organization_id,
            membership_id,
            AssignmentChange::Assigned,
            granted,
        ))
    }

    pub fn unassign_membership_features(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
        features: &Features,
    ) -> Result<FeatureAssignment, UseCaseError> {
        protect_baseline_feature::<TenantFeatures>(features)?;
        assigner.require_organization_owner(organization_id, "unassign membership features")?;
        let membership = self.require_membership(organization_id)?;
        ensure_assignable_features::<TenantFeatures>(features)?;

        let membership_id = membership.id.clone();
        let revoked = held_features(features, &membership.features);
        for feature in &revoked {
            self.raise(EndUserEvent::MembershipFeatureUnassigned(MembershipFeatureChange {
                root_id: self.id().to_string(),
                occurred_utc: Utc::now(),
                organization_id: organization_id.to_string(),
                membership_id: membership_id.clone(),
                feature: feature.name().to_string(),
            }))?;
        }
        Ok(self.membership_feature_assignment(
            organization_id,
            membership_id,
            AssignmentChange::Unassigned,
            revoked,
        ))
    }

    /// Replace platform features with the tier's feature. The event records
    /// the requested set; the returned assignment holds the full set,
    /// baseline included.
    pub fn reset_platform_features(
        &mut self,
        assigner: &Assigner,
        tier: SubscriptionTier,
    ) -> Result<FeatureAssignment, UseCaseError> {
        assigner.require_service_account("reset platform features")?;
        self.require_registered()?;

        self.raise(EndUserEvent::PlatformFeaturesReset(PlatformFeaturesReset {
            root_id: self.id().to_string(),
            occurred_utc: Utc::now(),
            features: tier.platform_features().denormalize(),
        }))?;
        Ok(self.platform_feature_assignment(AssignmentChange::Reset, self.features().clone()))
    }

    /// Membership-scoped variant of [`reset_platform_features`](Self::reset_platform_features).
    pub fn reset_membership_features(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
        tier: SubscriptionTier,
    ) -> Result<FeatureAssignment, UseCaseError> {
        assigner.require_service_account("reset membership features")?;
        let membership_id = self.require_membership(organization_id)?.id.clone();

        self.raise(EndUserEvent::MembershipFeaturesReset(MembershipFeaturesReset {
            root_id: self.id().to_string(),
            occurred_utc: Utc::now(),
            organization_id: organization_id.to_string(),
            membership_id: membership_id.clone(),
            features: tier.tenant_features().denormalize(),
        }))?;

        let features = self.require_membership(organization_id)?.features.clone();
        Ok(self.membership_feature_assignment(
            organization_id,
            membership_id,
            AssignmentChange::Reset,
            features,
        ))
    }

    fn platform_role_change(&self, role: &str) -> PlatformRoleChange {
        PlatformRoleChange {
            root_id: self.id().to_string(),
            occurred_utc: Utc::now(),
            role: role.to_string(),
        }
    }

    fn platform_feature_change(&self, feature: &str) -> PlatformFeatureChange {
        PlatformFeatureChange {
            root_id: self.id().to_string(),
            occurred_utc: Utc::now(),
            feature: feature.to_string(),
        }
    }

    fn platform_role_assignment(&self, change: AssignmentChange, roles: Roles) -> RoleAssignment {
        RoleAssignment {
            root_id: self.id().to_string(),
            target: AssignmentTarget::Platform,
            change,
            roles,
        }
    }

    fn platform_feature_assignment(
        &self,
        change: AssignmentChange,
        features: Features,
    ) -> FeatureAssignment {
        FeatureAssignment {
            root_id: self.id().to_string(),
            target: AssignmentTarget::Platform,
            change,
            features,
        }
    }

    fn membership_role_assignment(
        &self,
        organization_id: &str,
        membership_id: String,
        change: AssignmentChange,
        roles: Roles,
    ) -> RoleAssignment {
        RoleAssignment {
            root_id: self.id().to_string(),
            target: AssignmentTarget::Membership {
                organization_id: organization_id.to_string(),
                membership_id,
            },
            change,
            roles,
        }
    }

    fn membership_feature_assignment(
        &self,
        organization_id: &str,
        membership_id: String,
        change: AssignmentChange,
        features: Features,
    ) -> FeatureAssignment {
        FeatureAssignment {
            root_id: self.id().to_string(),
            target: AssignmentTarget::Membership {
                organization_id: organization_id.to_string(),
                membership_id,
            },
            change,
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::{get_initial_roles_and_features, UseCase};
    use crate::end_user::Classification;

    fn roles(names: &[&str]) -> Roles {
        Roles::from_names(names.iter().copied()).unwrap()
    }

    fn features(names: &[&str]) -> Features {
        Features::from_names(names.iter().copied()).unwrap()
    }

    fn operator() -> Assigner {
        Assigner::end_user("user_ops", roles(&["platform_standard", "platform_operations"]), vec![])
    }

    fn owner_of(org: &str) -> Assigner {
        Assigner::end_user("user_owner", roles(&["platform_standard"]), vec![org.to_string()])
    }

    fn service() -> Assigner {
        Assigner::service_account("svc_externalwebhook")
    }

    /// Registered person who is a plain member of `org_a`.
    fn member_of_org_a() -> EndUserRoot {
        let initial = get_initial_roles_and_features(UseCase::InvitingMemberToOrg, true);
        let mut root = EndUserRoot::create(Classification::Person).unwrap();
        root.register(&initial.platform_roles, &initial.platform_features, None)
            .unwrap();
        root.add_membership(&service(), "org_a", &initial.tenant_roles, &initial.tenant_features)
            .unwrap();
        root.changes_mut().mark_committed();
        root
    }

    fn org_a(root: &EndUserRoot) -> &crate::end_user::Membership {
        root.memberships().find_by_organization_id("org_a").unwrap()
    }

    #[test]
    fn test_assign_platform_roles() {
        let mut root = member_of_org_a();
        let assignment = root
            .assign_platform_roles(&operator(), &roles(&["platform_operations"]))
            .unwrap();

        assert_eq!(assignment.change, AssignmentChange::Assigned);
        assert_eq!(assignment.target, AssignmentTarget::Platform);
        assert_eq!(assignment.roles.denormalize(), vec!["platform_operations"]);
        assert!(root.roles().has_role("platform_operations"));
        assert_eq!(root.changes().pending().len(), 1);
    }

    #[test]
    fn test_reassigning_held_role_is_silent_noop() {
        let mut root = member_of_org_a();
        let assignment = root
            .assign_platform_roles(&operator(), &roles(&["platform_standard"]))
            .unwrap();

        assert!(assignment.is_empty());
        assert!(!root.changes().has_pending());
    }

    #[test]
    fn test_platform_roles_need_operator() {
        let mut root = member_of_org_a();
        let err = root
            .assign_platform_roles(&root.as_assigner(), &roles(&["platform_operations"]))
            .unwrap_err();

        assert!(err.is_role_violation());
        assert!(!root.changes().has_pending());
    }

    #[test]
    fn test_non_assignable_fails_whole_batch() {
        let mut root = member_of_org_a();
        let err = root
            .assign_platform_roles(&operator(), &roles(&["platform_operations", "platform_testingonly"]))
            .unwrap_err();

        assert_eq!(err.code(), "ROLE_NOT_ASSIGNABLE");
        assert!(!root.roles().has_role("platform_operations"));
        assert!(!root.changes().has_pending());
    }

    #[test]
    fn test_tenant_role_is_not_assignable_on_platform() {
        let mut root = member_of_org_a();
        let err = root
            .assign_platform_roles(&operator(), &roles(&["tenant_owner"]))
            .unwrap_err();
        assert_eq!(err.code(), "ROLE_NOT_ASSIGNABLE");
    }

    #[test]
    fn test_unassign_baseline_always_fails() {
        let mut root = member_of_org_a();

        let err = root
            .unassign_platform_roles(&operator(), &roles(&["platform_standard"]))
            .unwrap_err();
        assert_eq!(err.code(), "BASELINE_ROLE_PROTECTED");

        let err = root
            .unassign_platform_features(&operator(), &features(&["platform_basic", "platform_paidtrial"]))
            .unwrap_err();
        assert_eq!(err.code(), "BASELINE_FEATURE_PROTECTED");

        let err = root
            .unassign_membership_roles(&owner_of("org_a"), "org_a", &roles(&["tenant_member"]))
            .unwrap_err();
        assert_eq!(err.code(), "BASELINE_ROLE_PROTECTED");

        let err = root
            .unassign_membership_features(&owner_of("org_a"), "org_a", &features(&["tenant_basic"]))
            .unwrap_err();
        assert_eq!(err.code(), "BASELINE_FEATURE_PROTECTED");

        assert!(!root.changes().has_pending());
        assert!(root.features().has_feature("platform_paidtrial"));
    }

    #[test]
    fn test_baseline_is_checked_before_authorization() {
        let mut root = member_of_org_a();
        let me = root.as_assigner();

        let err = root
            .unassign_platform_roles(&me, &roles(&["platform_standard"]))
            .unwrap_err();
        assert!(err.is_rule_violation());
        assert_eq!(err.code(), "BASELINE_ROLE_PROTECTED");

        let err = root
            .unassign_membership_features(&me, "org_a", &features(&["tenant_basic"]))
            .unwrap_err();
        assert_eq!(err.code(), "BASELINE_FEATURE_PROTECTED");
        assert!(!root.changes().has_pending());
    }

    #[test]
    fn test_authorization_still_guards_other_unassignments() {
        let mut root = member_of_org_a();
        let me = root.as_assigner();
        let err = root
            .unassign_platform_roles(&me, &roles(&["platform_operations"]))
            .unwrap_err();
        assert!(err.is_role_violation());
    }

    #[test]
    fn test_unassign_platform_features() {
        let mut root = member_of_org_a();
        let assignment = root
            .unassign_platform_features(&operator(), &features(&["platform_paidtrial", "platform_paid3"]))
            .unwrap();

        assert_eq!(assignment.features.denormalize(), vec!["platform_paidtrial"]);
        assert!(!root.features().has_feature("platform_paidtrial"));
        assert_eq!(root.changes().pending().len(), 1);
    }

    #[test]
    fn test_membership_role_needs_organization_owner() {
        let mut root = member_of_org_a();
        let before = org_a(&root).roles.clone();

        let err = root
            .assign_membership_roles(&root.as_assigner(), "org_a", &roles(&["tenant_member"]))
            .unwrap_err();

        assert!(err.is_role_violation());
        assert!(!root.changes().has_pending());
        assert_eq!(org_a(&root).roles, before);

        let err = root
            .assign_membership_roles(&owner_of("org_b"), "org_a", &roles(&["tenant_billing_admin"]))
            .unwrap_err();
        assert_eq!(err.code(), "NOT_ORGANIZATION_OWNER");
    }

    #[test]
    fn test_owner_assigns_membership_roles() {
        let mut root = member_of_org_a();
        let assignment = root
            .assign_membership_roles(&owner_of("org_a"), "org_a", &roles(&["tenant_member", "tenant_billing_admin"]))
            .unwrap();

        assert_eq!(assignment.roles.denormalize(), vec!["tenant_billing_admin"]);
        match &assignment.target {
            AssignmentTarget::Membership { organization_id, membership_id } => {
                assert_eq!(organization_id, "org_a");
                assert_eq!(membership_id, &org_a(&root).id);
            }
            other => panic!("unexpected target {other:?}"),
        }
        assert!(org_a(&root).roles.has_role("tenant_billing_admin"));
        assert_eq!(root.changes().pending().len(), 1);
    }

    #[test]
    fn test_membership_commands_require_membership() {
        let mut root = member_of_org_a();
        let err = root
            .assign_membership_features(&owner_of("org_b"), "org_b", &features(&["tenant_paid2"]))
            .unwrap_err();
        assert_eq!(err.code(), "NOT_A_MEMBER");
    }

    #[test]
    fn test_membership_features_assign_and_unassign() {
        let mut root = member_of_org_a();
        let owner = owner_of("org_a");

        root.assign_membership_features(&owner, "org_a", &features(&["tenant_paid2"]))
            .unwrap();
        assert!(org_a(&root).features.has_feature("tenant_paid2"));

        let removed = root
            .unassign_membership_features(&owner, "org_a", &features(&["tenant_paid2", "tenant_paid3"]))
            .unwrap();
        assert_eq!(removed.features.denormalize(), vec!["tenant_paid2"]);
        assert!(!org_a(&root).features.has_feature("tenant_paid2"));
        assert_eq!(root.changes().pending().len(), 2);
    }

    #[test]
    fn test_reset_needs_service_account() {
        let mut root = member_of_org_a();

        let err = root
            .reset_membership_features(&operator(), "org_a", SubscriptionTier::Professional)
            .unwrap_err();
        assert!(err.is_role_violation());
        assert_eq!(err.code(), "SERVICE_ACCOUNT_REQUIRED");

        let err = root
            .reset_platform_features(&root.as_assigner(), SubscriptionTier::Professional)
            .unwrap_err();
        assert!(err.is_role_violation());
        assert!(!root.changes().has_pending());
    }

    #[test]
    fn test_reset_platform_features() {
        let mut root = member_of_org_a();
        let assignment = root
            .reset_platform_features(&service(), SubscriptionTier::Professional)
            .unwrap();

        assert_eq!(assignment.change, AssignmentChange::Reset);
        assert_eq!(assignment.features.denormalize(), vec!["platform_paid2", "platform_basic"]);
        assert_eq!(root.features(), &assignment.features);

        let pending = root.changes().pending();
        assert_eq!(pending.len(), 1);
        match &pending[0] {
            EndUserEvent::PlatformFeaturesReset(e) => assert_eq!(e.features, vec!["platform_paid2"]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_reset_membership_features_to_unsubscribed() {
        let mut root = member_of_org_a();
        root.assign_membership_features(&owner_of("org_a"), "org_a", &features(&["tenant_paid3"]))
            .unwrap();

        let assignment = root
            .reset_membership_features(&service(), "org_a", SubscriptionTier::Unsubscribed)
            .unwrap();

        assert_eq!(assignment.features.denormalize(), vec!["tenant_basic"]);
        assert_eq!(org_a(&root).features.denormalize(), vec!["tenant_basic"]);
        assert!(root.ensure_invariants().is_ok());
    }
}
