//! SaaS Platform Identity Core
//!
//! Event-sourced end users with platform-wide and per-organization roles
//! and features.
//!
//! ## Modules
//!
//! - **authorization**: Role/Feature values, catalogs, plans, assigners
//! - **end_user**: `EndUserRoot` aggregate, memberships, events, use cases
//! - **usecase**: errors, results, aggregates, envelopes, event store seam
//! - **shared**: id generation

pub mod authorization;
pub mod end_user;
pub mod shared;
pub mod usecase;

pub use authorization::{
    get_initial_roles_and_features, Assigner, Feature, Features, PlatformFeatures, PlatformRoles,
    Role, Roles, ServiceAccounts, SubscriptionTier, TenantFeatures, TenantRoles,
};
pub use end_user::operations::EndUserServices;
pub use end_user::{
    AuthorizationSync, Classification, EndUserEvent, EndUserRepository, EndUserRoot, Membership,
    Memberships,
};
pub use usecase::{
    Aggregate, EventStore, ExecutionContext, InMemoryEventStore, UseCaseError, UseCaseResult,
};
