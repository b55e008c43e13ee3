//! Role and feature catalogs
//!
//! Static lists of every known role and feature, split by scope. A catalog
//! entry says whether commands may assign it; `TestingOnly` entries exist
//! so fixtures can reference them but are never assignable.

use super::entitlement::{Feature, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Applies to the end user across the whole platform
    Platform,
    /// Applies within one organization membership
    Tenant,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Platform => "platform",
            Scope::Tenant => "tenant",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleLevel {
    pub name: &'static str,
    pub scope: Scope,
    pub assignable: bool,
}

impl RoleLevel {
    pub fn role(&self) -> Role {
        Role::from_static(self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLevel {
    pub name: &'static str,
    pub scope: Scope,
    pub assignable: bool,
}

impl FeatureLevel {
    pub fn feature(&self) -> Feature {
        Feature::from_static(self.name)
    }
}

pub trait RoleCatalog {
    const SCOPE: Scope;
    const BASELINE: RoleLevel;

    fn all() -> &'static [RoleLevel];

    fn find(name: &str) -> Option<RoleLevel> {
        Self::all().iter().find(|level| level.name == name).copied()
    }

    /// Unknown names are not assignable.
    fn is_assignable(name: &str) -> bool {
        Self::find(name).is_some_and(|level| level.assignable)
    }
}

pub trait FeatureCatalog {
    const SCOPE: Scope;
    const BASELINE: FeatureLevel;

    fn all() -> &'static [FeatureLevel];

    fn find(name: &str) -> Option<FeatureLevel> {
        Self::all().iter().find(|level| level.name == name).copied()
    }

    fn is_assignable(name: &str) -> bool {
        Self::find(name).is_some_and(|level| level.assignable)
    }
}

const fn role(name: &'static str, scope: Scope, assignable: bool) -> RoleLevel {
    RoleLevel { name, scope, assignable }
}

const fn feature(name: &'static str, scope: Scope, assignable: bool) -> FeatureLevel {
    FeatureLevel { name, scope, assignable }
}

pub struct PlatformRoles;

impl PlatformRoles {
    pub const STANDARD: RoleLevel = role("platform_standard", Scope::Platform, true);
    pub const OPERATIONS: RoleLevel = role("platform_operations", Scope::Platform, true);
    pub const TESTING_ONLY: RoleLevel = role("platform_testingonly", Scope::Platform, false);
}

impl RoleCatalog for PlatformRoles {
    const SCOPE: Scope = Scope::Platform;
    const BASELINE: RoleLevel = Self::STANDARD;

    fn all() -> &'static [RoleLevel] {
        &[Self::STANDARD, Self::OPERATIONS, Self::TESTING_ONLY]
    }
}

pub struct TenantRoles;

impl TenantRoles {
    pub const MEMBER: RoleLevel = role("tenant_member", Scope::Tenant, true);
    pub const BILLING_ADMIN: RoleLevel = role("tenant_billing_admin", Scope::Tenant, true);
    pub const OWNER: RoleLevel = role("tenant_owner", Scope::Tenant, true);
    pub const TESTING_ONLY: RoleLevel = role("tenant_testingonly", Scope::Tenant, false);
}

impl RoleCatalog for TenantRoles {
    const SCOPE: Scope = Scope::Tenant;
    const BASELINE: RoleLevel = Self::MEMBER;

    fn all() -> &'static [RoleLevel] {
        &[Self::MEMBER, Self::BILLING_ADMIN, Self::OWNER, Self::TESTING_ONLY]
    }
}

pub struct PlatformFeatures;

impl PlatformFeatures {
    pub const BASIC: FeatureLevel = feature("platform_basic", Scope::Platform, true);
    pub const PAID_TRIAL: FeatureLevel = feature("platform_paidtrial", Scope::Platform, true);
    pub const PAID2: FeatureLevel = feature("platform_paid2", Scope::Platform, true);
    pub const PAID3: FeatureLevel = feature("platform_paid3", Scope::Platform, true);
    pub const TESTING_ONLY: FeatureLevel = feature("platform_testingonly", Scope::Platform, false);
}

impl FeatureCatalog for PlatformFeatures {
    const SCOPE: Scope = Scope::Platform;
    const BASELINE: FeatureLevel = Self::BASIC;

    fn all() -> &'static [FeatureLevel] {
        &[
            Self::BASIC,
            Self::PAID_TRIAL,
            Self::PAID2,
            Self::PAID3,
            Self::TESTING_ONLY,
        ]
    }
}

pub struct TenantFeatures;

impl TenantFeatures {
    pub const BASIC: FeatureLevel = feature("tenant_basic", Scope::Tenant, true);
    pub const PAID_TRIAL: FeatureLevel = feature("tenant_paidtrial", Scope::Tenant, true);
    pub const PAID2: FeatureLevel = feature("tenant_paid2", Scope::Tenant, true);
    pub const PAID3: FeatureLevel = feature("tenant_paid3", Scope::Tenant, true);
    pub const TESTING_ONLY: FeatureLevel = feature("tenant_testingonly", Scope::Tenant, false);
}

impl FeatureCatalog for TenantFeatures {
    const SCOPE: Scope = Scope::Tenant;
    const BASELINE: FeatureLevel = Self::BASIC;

    fn all() -> &'static [FeatureLevel] {
        &[
            Self::BASIC,
            Self::PAID_TRIAL,
            Self::PAID2,
            Self::PAID3,
            Self::TESTING_ONLY,
        ]
    }
}
