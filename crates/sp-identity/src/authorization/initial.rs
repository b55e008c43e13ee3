//! Starting roles and features for new end users and memberships.

use serde::{Deserialize, Serialize};

use super::catalog::{
    FeatureCatalog, PlatformFeatures, PlatformRoles, RoleCatalog, TenantFeatures, TenantRoles,
};
use super::entitlement::{Features, Roles};

/// Why roles and features are being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseCase {
    CreatingPerson,
    CreatingMachine,
    CreatingOrg,
    InvitingMemberToOrg,
    InvitingMachineToCreatorOrg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialRolesAndFeatures {
    pub platform_roles: Roles,
    pub platform_features: Features,
    pub tenant_roles: Roles,
    pub tenant_features: Features,
}

/// Pure lookup; every feature set includes its scope's baseline.
///
/// Machines created without authentication get no paid trial in either
/// scope, so anonymous machine sign-ups cannot farm trials.
pub fn get_initial_roles_and_features(
    use_case: UseCase,
    is_authenticated: bool,
) -> InitialRolesAndFeatures {
    let trial = match use_case {
        UseCase::CreatingMachine => is_authenticated,
        _ => true,
    };
    let tenant_trial = match use_case {
        UseCase::InvitingMemberToOrg => false,
        _ => trial,
    };

    let tenant_roles = match use_case {
        UseCase::CreatingPerson | UseCase::CreatingOrg => Roles::empty()
            .add_role(TenantRoles::OWNER.role())
            .add_role(TenantRoles::BILLING_ADMIN.role())
            .add_role(TenantRoles::MEMBER.role()),
        UseCase::CreatingMachine
        | UseCase::InvitingMemberToOrg
        | UseCase::InvitingMachineToCreatorOrg => {
            Roles::empty().add_role(TenantRoles::MEMBER.role())
        }
    };

    let mut platform_features = Features::empty();
    if trial {
        platform_features = platform_features.add_feature(PlatformFeatures::PAID_TRIAL.feature());
    }
    let mut tenant_features = Features::empty();
    if tenant_trial {
        tenant_features = tenant_features.add_feature(TenantFeatures::PAID_TRIAL.feature());
    }

    InitialRolesAndFeatures {
        platform_roles: Roles::empty().add_role(PlatformRoles::BASELINE.role()),
        platform_features: platform_features.add_feature(PlatformFeatures::BASELINE.feature()),
        tenant_roles,
        tenant_features: tenant_features.add_feature(TenantFeatures::BASELINE.feature()),
    }
}
