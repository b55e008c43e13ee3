//! Acting principal for authorization checks
//!
//! Commands take an `Assigner` snapshot instead of a reference to another
//! aggregate. The actor may be the target end user itself, so borrowing
//! both mutably and immutably is not an option.

use crate::details;
use crate::usecase::UseCaseError;

use super::catalog::PlatformRoles;
use super::entitlement::Roles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assigner {
    id: String,
    service_account: bool,
    platform_roles: Roles,
    owned_organizations: Vec<String>,
}

impl Assigner {
    /// A recognized system caller. Holds no end-user roles.
    pub fn service_account(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            service_account: true,
            platform_roles: Roles::empty(),
            owned_organizations: Vec::new(),
        }
    }

    pub fn end_user(
        id: impl Into<String>,
        platform_roles: Roles,
        owned_organizations: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_account: false,
            platform_roles,
            owned_organizations,
        }
    }

    /// Principal with no standing (unknown id, suspended account).
    pub fn without_authority(id: impl Into<String>) -> Self {
        Self::end_user(id, Roles::empty(), Vec::new())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_service_account(&self) -> bool {
        self.service_account
    }

    pub fn is_platform_operator(&self) -> bool {
        self.platform_roles.has_role(PlatformRoles::OPERATIONS.name)
    }

    pub fn owns_organization(&self, organization_id: &str) -> bool {
        self.owned_organizations.iter().any(|id| id == organization_id)
    }

    pub fn require_platform_operator(&self, action: &str) -> Result<(), UseCaseError> {
        if self.is_platform_operator() {
            return Ok(());
        }
        Err(UseCaseError::role_violation_with_details(
            "OPERATIONS_ROLE_REQUIRED",
            format!("Only platform operators may {}", action),
            details! { "assignerId" => &self.id, "requiredRole" => PlatformRoles::OPERATIONS.name },
        ))
    }

    pub fn require_organization_owner(
        &self,
        organization_id: &str,
        action: &str,
    ) -> Result<(), UseCaseError> {
        if self.owns_organization(organization_id) {
            return Ok(());
        }
        Err(UseCaseError::role_violation_with_details(
            "NOT_ORGANIZATION_OWNER",
            format!("Only owners of the organization may {}", action),
            details! { "assignerId" => &self.id, "organizationId" => organization_id },
        ))
    }

    /// The target end user acting on themselves, or a platform operator.
    pub fn require_self_or_platform_operator(
        &self,
        root_id: &str,
        action: &str,
    ) -> Result<(), UseCaseError> {
        if self.id == root_id || self.is_platform_operator() {
            return Ok(());
        }
        Err(UseCaseError::role_violation_with_details(
            "NOT_SELF_OR_OPERATOR",
            format!("Only the end user or a platform operator may {}", action),
            details! { "assignerId" => &self.id, "rootId" => root_id },
        ))
    }

    /// Service accounts, platform operators and owners of the organization
    /// may grant a membership in it.
    pub fn require_membership_grant(&self, organization_id: &str) -> Result<(), UseCaseError> {
        if self.service_account
            || self.is_platform_operator()
            || self.owns_organization(organization_id)
        {
            return Ok(());
        }
        Err(UseCaseError::role_violation_with_details(
            "MEMBERSHIP_GRANT_DENIED",
            "Assigner may not add members to this organization",
            details! { "assignerId" => &self.id, "organizationId" => organization_id },
        ))
    }

    pub fn require_service_account(&self, action: &str) -> Result<(), UseCaseError> {
        if self.service_account {
            return Ok(());
        }
        Err(UseCaseError::role_violation_with_details(
            "SERVICE_ACCOUNT_REQUIRED",
            format!("Only service accounts may {}", action),
            details! { "assignerId" => &self.id },
        ))
    }
}
