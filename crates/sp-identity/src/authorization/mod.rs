//! Roles, features and who may change them.

pub mod assigner;
pub mod catalog;
pub mod entitlement;
pub mod initial;
pub mod plans;
pub mod service_accounts;

pub use assigner::Assigner;
pub use catalog::{
    FeatureCatalog, FeatureLevel, PlatformFeatures, PlatformRoles, RoleCatalog, RoleLevel, Scope,
    TenantFeatures, TenantRoles,
};
pub use entitlement::{Feature, Features, Role, Roles};
pub use initial::{get_initial_roles_and_features, InitialRolesAndFeatures, UseCase};
pub use plans::SubscriptionTier;
pub use service_accounts::ServiceAccounts;
