//! End users, their memberships and their roles and features.

pub mod entity;
pub mod events;
pub mod membership;
pub mod memberships;
pub mod operations;
pub mod repository;
pub mod roles_and_features;
pub mod sync;

pub use entity::{Access, Classification, EndUserRoot, Status};
pub use events::EndUserEvent;
pub use membership::Membership;
pub use memberships::Memberships;
pub use repository::EndUserRepository;
pub use roles_and_features::{
    AssignmentChange, AssignmentTarget, FeatureAssignment, RoleAssignment,
};
pub use sync::{AuthorizationSync, NoopAuthorizationSync, RecordingAuthorizationSync};
