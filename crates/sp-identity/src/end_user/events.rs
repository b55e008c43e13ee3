//! End User Change Events
//!
//! Flat records raised by [`EndUserRoot`](super::EndUserRoot). Every event
//! carries `rootId` and `occurredUtc`; the JSON form (tagged by `type`,
//! camelCase fields) is what the event store persists and what replay
//! reads back, so field names here are a stable contract.
//!
//! Role and feature names travel as plain strings and are validated when
//! the event is applied, not when it is decoded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Classification;
use crate::usecase::ChangeEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub roles: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipAdded {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub membership_id: String,
    pub organization_id: String,
    pub is_default: bool,
    pub roles: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDefaultChanged {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub from_membership_id: String,
    pub to_membership_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRemoved {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub membership_id: String,
    pub organization_id: String,
}

/// Payload of `MembershipRoleAssigned` and `MembershipRoleUnassigned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRoleChange {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub organization_id: String,
    pub membership_id: String,
    pub role: String,
}

/// Payload of `MembershipFeatureAssigned` and `MembershipFeatureUnassigned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipFeatureChange {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub organization_id: String,
    pub membership_id: String,
    pub feature: String,
}

/// Carries the requested set; the tenant baseline is added on apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipFeaturesReset {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub organization_id: String,
    pub membership_id: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRoleChange {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFeatureChange {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub feature: String,
}

/// Carries the requested set; the platform baseline is added on apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFeaturesReset {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSuspended {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessReinstated {
    pub root_id: String,
    pub occurred_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EndUserEvent {
    Created(Created),
    Registered(Registered),
    MembershipAdded(MembershipAdded),
    MembershipDefaultChanged(MembershipDefaultChanged),
    MembershipRemoved(MembershipRemoved),
    MembershipRoleAssigned(MembershipRoleChange),
    MembershipRoleUnassigned(MembershipRoleChange),
    MembershipFeatureAssigned(MembershipFeatureChange),
    MembershipFeatureUnassigned(MembershipFeatureChange),
    MembershipFeaturesReset(MembershipFeaturesReset),
    PlatformRoleAssigned(PlatformRoleChange),
    PlatformRoleUnassigned(PlatformRoleChange),
    PlatformFeatureAssigned(PlatformFeatureChange),
    PlatformFeatureUnassigned(PlatformFeatureChange),
    PlatformFeaturesReset(PlatformFeaturesReset),
    AccessSuspended(AccessSuspended),
    AccessReinstated(AccessReinstated),
}

/// Run `$body` with `$e` bound to the payload of whichever variant `$event` is.
macro_rules! with_payload {
    ($event:expr, $e:ident => $body:expr) => {
        match $event {
            EndUserEvent::Created($e) => $body,
            EndUserEvent::Registered($e) => $body,
            EndUserEvent::MembershipAdded($e) => $body,
            EndUserEvent::MembershipDefaultChanged($e) => $body,
            EndUserEvent::MembershipRemoved($e) => $body,
            EndUserEvent::MembershipRoleAssigned($e) => $body,
            EndUserEvent::MembershipRoleUnassigned($e) => $body,
            EndUserEvent::MembershipFeatureAssigned($e) => $body,
            EndUserEvent::MembershipFeatureUnassigned($e) => $body,
            EndUserEvent::MembershipFeaturesReset($e) => $body,
            EndUserEvent::PlatformRoleAssigned($e) => $body,
            EndUserEvent::PlatformRoleUnassigned($e) => $body,
            EndUserEvent::PlatformFeatureAssigned($e) => $body,
            EndUserEvent::PlatformFeatureUnassigned($e) => $body,
            EndUserEvent::PlatformFeaturesReset($e) => $body,
            EndUserEvent::AccessSuspended($e) => $body,
            EndUserEvent::AccessReinstated($e) => $body,
        }
    };
}

impl ChangeEvent for EndUserEvent {
    fn action(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Registered(_) => "registered",
            Self::MembershipAdded(_) => "membership-added",
            Self::MembershipDefaultChanged(_) => "membership-default-changed",
            Self::MembershipRemoved(_) => "membership-removed",
            Self::MembershipRoleAssigned(_) => "membership-role-assigned",
            Self::MembershipRoleUnassigned(_) => "membership-role-unassigned",
            Self::MembershipFeatureAssigned(_) => "membership-feature-assigned",
            Self::MembershipFeatureUnassigned(_) => "membership-feature-unassigned",
            Self::MembershipFeaturesReset(_) => "membership-features-reset",
            Self::PlatformRoleAssigned(_) => "platform-role-assigned",
            Self::PlatformRoleUnassigned(_) => "platform-role-unassigned",
            Self::PlatformFeatureAssigned(_) => "platform-feature-assigned",
            Self::PlatformFeatureUnassigned(_) => "platform-feature-unassigned",
            Self::PlatformFeaturesReset(_) => "platform-features-reset",
            Self::AccessSuspended(_) => "access-suspended",
            Self::AccessReinstated(_) => "access-reinstated",
        }
    }

    fn root_id(&self) -> &str {
        with_payload!(self, e => &e.root_id)
    }

    fn occurred_utc(&self) -> DateTime<Utc> {
        with_payload!(self, e => e.occurred_utc)
    }
}
