//! End User Aggregate
//!
//! `EndUserRoot` is the consistency boundary for one person or machine:
//! platform-wide roles and features plus the memberships that scope roles
//! and features to organizations. State changes only through
//! [`Aggregate::apply`], whether the event was just raised by a command or
//! replayed from the store.
//!
//! Role and feature assignment commands live in `roles_and_features.rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::events::{
    AccessReinstated, AccessSuspended, Created, EndUserEvent, MembershipAdded,
    MembershipDefaultChanged, MembershipRemoved, Registered,
};
use super::membership::Membership;
use super::memberships::Memberships;
use crate::authorization::{
    Assigner, FeatureCatalog, Features, PlatformFeatures, PlatformRoles, RoleCatalog, Roles,
    TenantFeatures, TenantRoles,
};
use crate::details;
use crate::shared::{prefixes, IdGenerator};
use crate::usecase::{Aggregate, ChangeEvent, ChangeLog, UseCaseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    #[default]
    Person,
    Machine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Access {
    #[default]
    Enabled,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Unregistered,
    Registered,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndUserRoot {
    id: String,
    classification: Classification,
    access: Access,
    #[serde(skip_serializing_if = "Option::is_none")]
    suspension_reason: Option<String>,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    roles: Roles,
    features: Features,
    memberships: Memberships,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    changes: ChangeLog<EndUserEvent>,
}

impl EndUserRoot {
    /// New unregistered end user with a generated id.
    pub fn create(classification: Classification) -> Result<Self, UseCaseError> {
        Self::create_with_id(IdGenerator::generate(prefixes::END_USER), classification)
    }

    pub fn create_with_id(
        id: impl Into<String>,
        classification: Classification,
    ) -> Result<Self, UseCaseError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UseCaseError::validation("ID_REQUIRED", "End user id is required"));
        }

        let mut root = Self::default();
        root.raise(EndUserEvent::Created(Created {
            root_id: id,
            occurred_utc: Utc::now(),
            classification,
        }))?;
        Ok(root)
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn suspension_reason(&self) -> Option<&str> {
        self.suspension_reason.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_registered(&self) -> bool {
        self.status == Status::Registered
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Platform roles.
    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    /// Platform features.
    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn memberships(&self) -> &Memberships {
        &self.memberships
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn version(&self) -> u64 {
        self.changes.current_version()
    }

    /// Authorization snapshot of this end user acting on someone (possibly
    /// themselves). Suspended end users act without authority.
    pub fn as_assigner(&self) -> Assigner {
        if self.access == Access::Suspended {
            return Assigner::without_authority(&self.id);
        }
        let owned = self
            .memberships
            .iter()
            .filter(|m| m.is_owner())
            .map(|m| m.organization_id.clone())
            .collect();
        Assigner::end_user(&self.id, self.roles.clone(), owned)
    }

    /// Move from unregistered to registered with starting platform roles and
    /// features. Baselines are added when missing.
    pub fn register(
        &mut self,
        roles: &Roles,
        features: &Features,
        username: Option<String>,
    ) -> Result<(), UseCaseError> {
        if self.is_registered() {
            return Err(UseCaseError::business_rule_with_details(
                "ALREADY_REGISTERED",
                "End user is already registered",
                details! { "rootId" => &self.id },
            ));
        }

        let username = match username {
            Some(name) if name.trim().is_empty() => {
                return Err(UseCaseError::validation(
                    "INVALID_USERNAME",
                    "Username must not be blank",
                ));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };

        if let Some(role) = roles.iter().find(|r| PlatformRoles::find(r.name()).is_none()) {
            return Err(UseCaseError::business_rule_with_details(
                "ROLE_NOT_IN_SCOPE",
                format!("'{}' is not a platform role", role),
                details! { "role" => role.name() },
            ));
        }
        if let Some(feature) = features.iter().find(|f| PlatformFeatures::find(f.name()).is_none()) {
            return Err(UseCaseError::business_rule_with_details(
                "FEATURE_NOT_IN_SCOPE",
                format!("'{}' is not a platform feature", feature),
                details! { "feature" => feature.name() },
            ));
        }

        let roles = roles.add_role(PlatformRoles::BASELINE.role());
        let features = features.add_feature(PlatformFeatures::BASELINE.feature());

        self.raise(EndUserEvent::Registered(Registered {
            root_id: self.id.clone(),
            occurred_utc: Utc::now(),
            classification: self.classification,
            username,
            roles: roles.denormalize(),
            features: features.denormalize(),
        }))
    }

    /// Join `organization_id`. Returns the membership id; an existing
    /// membership is returned unchanged. The first membership becomes the
    /// default.
    pub fn add_membership(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
        roles: &Roles,
        features: &Features,
    ) -> Result<String, UseCaseError> {
        assigner.require_membership_grant(organization_id)?;
        self.require_registered()?;

        if organization_id.trim().is_empty() {
            return Err(UseCaseError::validation(
                "ORGANIZATION_ID_REQUIRED",
                "Organization id is required",
            ));
        }

        if let Some(existing) = self.memberships.find_by_organization_id(organization_id) {
            return Ok(existing.id.clone());
        }

        if let Some(role) = roles.iter().find(|r| TenantRoles::find(r.name()).is_none()) {
            return Err(UseCaseError::business_rule_with_details(
                "ROLE_NOT_IN_SCOPE",
                format!("'{}' is not a tenant role", role),
                details! { "role" => role.name() },
            ));
        }
        if let Some(feature) = features.iter().find(|f| TenantFeatures::find(f.name()).is_none()) {
            return Err(UseCaseError::business_rule_with_details(
                "FEATURE_NOT_IN_SCOPE",
                format!("'{}' is not a tenant feature", feature),
                details! { "feature" => feature.name() },
            ));
        }

        let membership_id = IdGenerator::generate(prefixes::MEMBERSHIP);
        self.raise(EndUserEvent::MembershipAdded(MembershipAdded {
            root_id: self.id.clone(),
            occurred_utc: Utc::now(),
            membership_id: membership_id.clone(),
            organization_id: organization_id.to_string(),
            is_default: self.memberships.is_empty(),
            roles: roles.add_role(TenantRoles::BASELINE.role()).denormalize(),
            features: features
                .add_feature(TenantFeatures::BASELINE.feature())
                .denormalize(),
        }))?;

        Ok(membership_id)
    }

    /// Make `organization_id` the default membership. No-op when it already is.
    pub fn change_default_membership(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
    ) -> Result<(), UseCaseError> {
        assigner.require_self_or_platform_operator(&self.id, "change the default organization")?;

        let target_id = self.require_membership(organization_id)?.id.clone();
        let current_id = match self.memberships.default_membership() {
            Some(current) if current.id == target_id => return Ok(()),
            Some(current) => current.id.clone(),
            None => {
                return Err(UseCaseError::invariant(
                    "NO_DEFAULT_MEMBERSHIP",
                    "Memberships exist but none is the default",
                ))
            }
        };

        self.raise(EndUserEvent::MembershipDefaultChanged(MembershipDefaultChanged {
            root_id: self.id.clone(),
            occurred_utc: Utc::now(),
            from_membership_id: current_id,
            to_membership_id: target_id,
        }))
    }

    /// Leave `organization_id`. Removing the default hands the default to
    /// the most recently created remaining membership first.
    pub fn remove_membership(
        &mut self,
        assigner: &Assigner,
        organization_id: &str,
    ) -> Result<(), UseCaseError> {
        assigner.require_self_or_platform_operator(&self.id, "leave an organization")?;

        let membership = self.require_membership(organization_id)?;
        let membership_id = membership.id.clone();
        let was_default = membership.is_default;

        if was_default && self.memberships.len() > 1 {
            let next_id = self.memberships.find_next_default_membership()?.id.clone();
            self.raise(EndUserEvent::MembershipDefaultChanged(MembershipDefaultChanged {
                root_id: self.id.clone(),
                occurred_utc: Utc::now(),
                from_membership_id: membership_id.clone(),
                to_membership_id: next_id,
            }))?;
        }

        self.raise(EndUserEvent::MembershipRemoved(MembershipRemoved {
            root_id: self.id.clone(),
            occurred_utc: Utc::now(),
            membership_id,
            organization_id: organization_id.to_string(),
        }))
    }

    pub fn suspend(&mut self, assigner: &Assigner, reason: &str) -> Result<(), UseCaseError> {
        assigner.require_platform_operator("suspend end users")?;
        if self.access == Access::Suspended {
            return Ok(());
        }
        if reason.trim().is_empty() {
            return Err(UseCaseError::validation(
                "SUSPENSION_REASON_REQUIRED",
                "A suspension reason is required",
            ));
        }

        self.raise(EndUserEvent::AccessSuspended(AccessSuspended {
            root_id: self.id.clone(),
            occurred_utc: Utc::now(),
            reason: reason.trim().to_string(),
        }))
    }

    pub fn reinstate(&mut self, assigner: &Assigner) -> Result<(), UseCaseError> {
        assigner.require_platform_operator("reinstate end users")?;
        if self.access == Access::Enabled {
            return Ok(());
        }

        self.raise(EndUserEvent::AccessReinstated(AccessReinstated {
            root_id: self.id.clone(),
            occurred_utc: Utc::now(),
        }))
    }

    pub(crate) fn require_registered(&self) -> Result<(), UseCaseError> {
        if self.is_registered() {
            return Ok(());
        }
        Err(UseCaseError::business_rule_with_details(
            "NOT_REGISTERED",
            "End user has not completed registration",
            details! { "rootId" => &self.id },
        ))
    }

    pub(crate) fn require_membership(&self, organization_id: &str) -> Result<&Membership, UseCaseError> {
        self.memberships
            .find_by_organization_id(organization_id)
            .ok_or_else(|| {
                UseCaseError::business_rule_with_details(
                    "NOT_A_MEMBER",
                    format!("End user is not a member of organization '{}'", organization_id),
                    details! { "rootId" => &self.id, "organizationId" => organization_id },
                )
            })
    }

    pub(crate) fn membership_mut(&mut self, membership_id: &str) -> Result<&mut Membership, UseCaseError> {
        self.memberships
            .find_by_membership_id_mut(membership_id)
            .ok_or_else(|| {
                UseCaseError::validation_with_details(
                    "UNKNOWN_MEMBERSHIP",
                    format!("Event refers to unknown membership '{}'", membership_id),
                    details! { "membershipId" => membership_id },
                )
            })
    }

    fn check_event_root(&self, event: &EndUserEvent) -> Result<(), UseCaseError> {
        let created = matches!(event, EndUserEvent::Created(_));
        if created && !self.id.is_empty() {
            return Err(UseCaseError::validation_with_details(
                "ALREADY_CREATED",
                "Created event applied to an existing end user",
                details! { "rootId" => &self.id },
            ));
        }
        if !created && event.root_id() != self.id {
            return Err(UseCaseError::validation_with_details(
                "EVENT_ROOT_MISMATCH",
                "Event does not belong to this end user",
                details! { "rootId" => &self.id, "eventRootId" => event.root_id() },
            ));
        }
        Ok(())
    }
}

impl Aggregate for EndUserRoot {
    type Event = EndUserEvent;

    const AGGREGATE_TYPE: &'static str = "end-user";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, event: &EndUserEvent) -> Result<(), UseCaseError> {
        self.check_event_root(event)?;

        match event {
            EndUserEvent::Created(e) => {
                self.id = e.root_id.clone();
                self.classification = e.classification;
                self.created_at = Some(e.occurred_utc);
            }
            EndUserEvent::Registered(e) => {
                self.roles = Roles::from_names(e.roles.iter().cloned())?;
                self.features = Features::from_names(e.features.iter().cloned())?;
                self.classification = e.classification;
                self.username = e.username.clone();
                self.status = Status::Registered;
            }
            EndUserEvent::MembershipAdded(e) => {
                self.memberships.add(Membership::from_added(e)?);
            }
            EndUserEvent::MembershipDefaultChanged(e) => {
                for membership in self.memberships.iter_mut() {
                    membership.apply_default_changed(e);
                }
            }
            EndUserEvent::MembershipRemoved(e) => {
                self.memberships.remove(&e.membership_id);
            }
            EndUserEvent::MembershipRoleAssigned(e) => {
                self.membership_mut(&e.membership_id)?.apply_role_assigned(e)?;
            }
            EndUserEvent::MembershipRoleUnassigned(e) => {
                self.membership_mut(&e.membership_id)?.apply_role_unassigned(e);
            }
            EndUserEvent::MembershipFeatureAssigned(e) => {
                self.membership_mut(&e.membership_id)?.apply_feature_assigned(e)?;
            }
            EndUserEvent::MembershipFeatureUnassigned(e) => {
                self.membership_mut(&e.membership_id)?.apply_feature_unassigned(e);
            }
            EndUserEvent::MembershipFeaturesReset(e) => {
                self.membership_mut(&e.membership_id)?.apply_features_reset(e)?;
            }
            EndUserEvent::PlatformRoleAssigned(e) => {
                self.roles = self.roles.add(e.role.as_str())?;
            }
            EndUserEvent::PlatformRoleUnassigned(e) => {
                self.roles = self.roles.remove(&e.role);
            }
            EndUserEvent::PlatformFeatureAssigned(e) => {
                self.features = self.features.add(e.feature.as_str())?;
            }
            EndUserEvent::PlatformFeatureUnassigned(e) => {
                self.features = self.features.remove(&e.feature);
            }
            EndUserEvent::PlatformFeaturesReset(e) => {
                self.features = Features::from_names(e.features.iter().cloned())?
                    .add_feature(PlatformFeatures::BASELINE.feature());
            }
            EndUserEvent::AccessSuspended(e) => {
                self.access = Access::Suspended;
                self.suspension_reason = Some(e.reason.clone());
            }
            EndUserEvent::AccessReinstated(_) => {
                self.access = Access::Enabled;
                self.suspension_reason = None;
            }
        }
        Ok(())
    }

    fn ensure_invariants(&self) -> Result<(), UseCaseError> {
        if self.is_registered() {
            if !self.roles.has_role(PlatformRoles::BASELINE.name) {
                return Err(UseCaseError::business_rule_with_details(
                    "MISSING_BASELINE_ROLE",
                    format!("Registered end user must hold '{}'", PlatformRoles::BASELINE.name),
                    details! { "rootId" => &self.id },
                ));
            }
            if !self.features.has_feature(PlatformFeatures::BASELINE.name) {
                return Err(UseCaseError::business_rule_with_details(
                    "MISSING_BASELINE_FEATURE",
                    format!(
                        "Registered end user must hold '{}'",
                        PlatformFeatures::BASELINE.name
                    ),
                    details! { "rootId" => &self.id },
                ));
            }
        }
        self.memberships.ensure_invariants()
    }

    fn changes(&self) -> &ChangeLog<EndUserEvent> {
        &self.changes
    }

    fn changes_mut(&mut self) -> &mut ChangeLog<EndUserEvent> {
        &mut self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::{get_initial_roles_and_features, UseCase};

    fn registered_person() -> EndUserRoot {
        let initial = get_initial_roles_and_features(UseCase::CreatingPerson, true);
        let mut root = EndUserRoot::create(Classification::Person).unwrap();
        root.register(&initial.platform_roles, &initial.platform_features, Some("ada@example.com".to_string()))
            .unwrap();
        root
    }

    fn service() -> Assigner {
        Assigner::service_account("svc_maintenance")
    }

    fn tenant(roles: &[&str], features: &[&str]) -> (Roles, Features) {
        (Roles::from_names(roles.iter().copied()).unwrap(), Features::from_names(features.iter().copied()).unwrap())
    }

    #[test]
    fn test_create_is_unregistered() {
        let root = EndUserRoot::create(Classification::Machine).unwrap();

        assert!(root.id().starts_with("user_"));
        assert_eq!(root.status(), Status::Unregistered);
        assert_eq!(root.classification(), Classification::Machine);
        assert_eq!(root.changes().pending().len(), 1);
        assert!(root.ensure_invariants().is_ok());
    }

    #[test]
    fn test_register_injects_baselines() {
        let mut root = EndUserRoot::create(Classification::Person).unwrap();
        root.register(&Roles::empty(), &Features::empty(), None).unwrap();

        assert!(root.is_registered());
        assert!(root.roles().has_role("platform_standard"));
        assert!(root.features().has_feature("platform_basic"));
        assert!(root.ensure_invariants().is_ok());
    }

    #[test]
    fn test_register_twice_is_rule_violation() {
        let mut root = registered_person();
        let err = root.register(&Roles::empty(), &Features::empty(), None).unwrap_err();
        assert_eq!(err.code(), "ALREADY_REGISTERED");
    }

    #[test]
    fn test_register_rejects_tenant_roles() {
        let mut root = EndUserRoot::create(Classification::Person).unwrap();
        let (roles, _) = tenant(&["tenant_owner"], &[]);
        let err = root.register(&roles, &Features::empty(), None).unwrap_err();
        assert_eq!(err.code(), "ROLE_NOT_IN_SCOPE");
        assert_eq!(root.changes().pending().len(), 1);
    }

    #[test]
    fn test_first_membership_is_default() {
        let mut root = registered_person();
        let (roles, features) = tenant(&["tenant_owner"], &[]);

        let first = root.add_membership(&service(), "org_a", &roles, &features).unwrap();
        let second = root.add_membership(&service(), "org_b", &Roles::empty(), &Features::empty()).unwrap();

        assert!(root.memberships().find_by_membership_id(&first).unwrap().is_default);
        assert!(!root.memberships().find_by_membership_id(&second).unwrap().is_default);
        let org_a = root.memberships().find_by_organization_id("org_a").unwrap();
        assert!(org_a.roles.has_role("tenant_member"));
        assert!(org_a.features.has_feature("tenant_basic"));
        assert!(root.ensure_invariants().is_ok());
    }

    #[test]
    fn test_add_existing_membership_is_noop() {
        let mut root = registered_person();
        let id = root.add_membership(&service(), "org_a", &Roles::empty(), &Features::empty()).unwrap();
        let pending = root.changes().pending().len();

        let again = root.add_membership(&service(), "org_a", &Roles::empty(), &Features::empty()).unwrap();
        assert_eq!(again, id);
        assert_eq!(root.changes().pending().len(), pending);
    }

    #[test]
    fn test_add_membership_requires_registration() {
        let mut root = EndUserRoot::create(Classification::Person).unwrap();
        let err = root
            .add_membership(&service(), "org_a", &Roles::empty(), &Features::empty())
            .unwrap_err();
        assert_eq!(err.code(), "NOT_REGISTERED");
    }

    #[test]
    fn test_add_membership_requires_grant() {
        let mut root = registered_person();
        let stranger = Assigner::without_authority("user_other");
        let err = root
            .add_membership(&stranger, "org_a", &Roles::empty(), &Features::empty())
            .unwrap_err();
        assert!(err.is_role_violation());
    }

    #[test]
    fn test_change_default_membership() {
        let mut root = registered_person();
        root.add_membership(&service(), "org_a", &Roles::empty(), &Features::empty()).unwrap();
        root.add_membership(&service(), "org_b", &Roles::empty(), &Features::empty()).unwrap();
        let me = root.as_assigner();

        root.change_default_membership(&me, "org_b").unwrap();
        assert_eq!(root.memberships().default_membership().unwrap().organization_id, "org_b");
        assert!(root.ensure_invariants().is_ok());

        let pending = root.changes().pending().len();
        root.change_default_membership(&me, "org_b").unwrap();
        assert_eq!(root.changes().pending().len(), pending);

        let err = root.change_default_membership(&me, "org_z").unwrap_err();
        assert_eq!(err.code(), "NOT_A_MEMBER");
    }

    #[test]
    fn test_removing_default_hands_over_to_newest() {
        let mut root = registered_person();
        root.add_membership(&service(), "org_a", &Roles::empty(), &Features::empty()).unwrap();
        root.add_membership(&service(), "org_b", &Roles::empty(), &Features::empty()).unwrap();
        root.add_membership(&service(), "org_c", &Roles::empty(), &Features::empty()).unwrap();
        let me = root.as_assigner();
        let before = root.changes().pending().len();
        let expected = root
            .memberships()
            .find_next_default_membership()
            .unwrap()
            .organization_id
            .clone();

        root.remove_membership(&me, "org_a").unwrap();

        assert_eq!(root.changes().pending().len(), before + 2);
        assert_eq!(root.memberships().len(), 2);
        assert_ne!(expected, "org_a");
        assert_eq!(root.memberships().default_membership().unwrap().organization_id, expected);
        assert!(root.ensure_invariants().is_ok());
    }

    #[test]
    fn test_removing_last_membership_leaves_none() {
        let mut root = registered_person();
        root.add_membership(&service(), "org_a", &Roles::empty(), &Features::empty()).unwrap();
        let me = root.as_assigner();

        root.remove_membership(&me, "org_a").unwrap();
        assert!(root.memberships().is_empty());
        assert!(root.ensure_invariants().is_ok());
    }

    #[test]
    fn test_suspend_and_reinstate() {
        let mut root = registered_person();
        let operator = Assigner::end_user(
            "user_ops",
            Roles::from_names(["platform_standard", "platform_operations"]).unwrap(),
            vec![],
        );

        let err = root.suspend(&root.as_assigner(), "abuse").unwrap_err();
        assert!(err.is_role_violation());

        root.suspend(&operator, "chargeback").unwrap();
        assert_eq!(root.access(), Access::Suspended);
        assert_eq!(root.suspension_reason(), Some("chargeback"));
        assert_eq!(root.as_assigner(), Assigner::without_authority(root.id()));

        root.reinstate(&operator).unwrap();
        assert_eq!(root.access(), Access::Enabled);
        assert!(root.suspension_reason().is_none());
    }

    #[test]
    fn test_replaying_pending_events_reproduces_state() {
        let mut root = registered_person();
        let (roles, features) = tenant(&["tenant_owner"], &["tenant_paid2"]);
        root.add_membership(&service(), "org_a", &roles, &features).unwrap();
        root.add_membership(&service(), "org_b", &Roles::empty(), &Features::empty()).unwrap();
        let me = root.as_assigner();
        root.remove_membership(&me, "org_a").unwrap();

        let replayed = EndUserRoot::rehydrate(root.changes().pending().to_vec()).unwrap();

        assert_eq!(replayed.id(), root.id());
        assert_eq!(replayed.roles(), root.roles());
        assert_eq!(replayed.features(), root.features());
        assert_eq!(replayed.memberships(), root.memberships());
        assert_eq!(replayed.username(), Some("ada@example.com"));
        assert_eq!(replayed.changes().persisted_version(), root.version());
    }

    #[test]
    fn test_apply_rejects_foreign_events() {
        let mut root = EndUserRoot::create(Classification::Person).unwrap();
        let foreign = EndUserEvent::AccessReinstated(AccessReinstated {
            root_id: "user_someone_else".to_string(),
            occurred_utc: Utc::now(),
        });
        let err = root.apply(&foreign).unwrap_err();
        assert_eq!(err.code(), "EVENT_ROOT_MISMATCH");
    }
}
