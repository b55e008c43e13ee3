//! Membership Use Cases
//!
//! Joining an organization, switching the default organization and
//! leaving one. Joining forwards the new membership's grants to
//! authorization sync; leaving forwards them as revoked.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{run_in_span, EndUserServices};
use crate::authorization::{Features, Roles};
use crate::end_user::roles_and_features::AssignmentChange;
use crate::usecase::{Aggregate, ExecutionContext, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMembershipCommand {
    pub end_user_id: String,
    pub organization_id: String,
    /// Tenant roles; the member baseline is always added
    #[serde(default)]
    pub roles: Vec<String>,
    /// Tenant features; the basic baseline is always added
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDefaultMembershipCommand {
    pub end_user_id: String,
    pub organization_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveOrganizationCommand {
    pub end_user_id: String,
    pub organization_id: String,
}

/// State of the end user's memberships after a membership use case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipOutcome {
    pub end_user_id: String,
    pub organization_id: String,
    /// Membership in `organization_id`; `None` after leaving
    pub membership_id: Option<String>,
    pub default_organization_id: Option<String>,
    pub version: u64,
}

pub struct AddMembershipUseCase {
    services: EndUserServices,
}

impl AddMembershipUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: AddMembershipCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<MembershipOutcome> {
        run_in_span(&ctx, "AddMembership", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: AddMembershipCommand,
        ctx: &ExecutionContext,
    ) -> Result<MembershipOutcome, UseCaseError> {
        let roles = Roles::from_names(command.roles)?;
        let features = Features::from_names(command.features)?;
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        let already_member = root
            .memberships()
            .find_by_organization_id(&command.organization_id)
            .is_some();
        let membership_id =
            root.add_membership(&assigner, &command.organization_id, &roles, &features)?;
        let version = self.services.repository.save(&mut root, ctx).await?;

        info!(
            end_user_id = %command.end_user_id,
            organization_id = %command.organization_id,
            membership_id = %membership_id,
            version = version,
            "Membership added"
        );

        if !already_member {
            if let Some(membership) = root.memberships().find_by_membership_id(&membership_id) {
                self.services
                    .sync_membership(root.id(), membership, AssignmentChange::Assigned)
                    .await;
            }
        }

        Ok(MembershipOutcome {
            end_user_id: command.end_user_id,
            organization_id: command.organization_id,
            membership_id: Some(membership_id),
            default_organization_id: root
                .memberships()
                .default_membership()
                .map(|m| m.organization_id.clone()),
            version,
        })
    }
}

pub struct ChangeDefaultMembershipUseCase {
    services: EndUserServices,
}

impl ChangeDefaultMembershipUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: ChangeDefaultMembershipCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<MembershipOutcome> {
        run_in_span(&ctx, "ChangeDefaultMembership", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: ChangeDefaultMembershipCommand,
        ctx: &ExecutionContext,
    ) -> Result<MembershipOutcome, UseCaseError> {
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        root.change_default_membership(&assigner, &command.organization_id)?;
        let version = self.services.repository.save(&mut root, ctx).await?;

        info!(
            end_user_id = %command.end_user_id,
            organization_id = %command.organization_id,
            version = version,
            "Default membership changed"
        );

        Ok(MembershipOutcome {
            membership_id: root
                .memberships()
                .find_by_organization_id(&command.organization_id)
                .map(|m| m.id.clone()),
            default_organization_id: Some(command.organization_id.clone()),
            end_user_id: command.end_user_id,
            organization_id: command.organization_id,
            version,
        })
    }
}

pub struct LeaveOrganizationUseCase {
    services: EndUserServices,
}

impl LeaveOrganizationUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: LeaveOrganizationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<MembershipOutcome> {
        run_in_span(&ctx, "LeaveOrganization", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: LeaveOrganizationCommand,
        ctx: &ExecutionContext,
    ) -> Result<MembershipOutcome, UseCaseError> {
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        let leaving = root
            .memberships()
            .find_by_organization_id(&command.organization_id)
            .cloned();
        root.remove_membership(&assigner, &command.organization_id)?;
        let version = self.services.repository.save(&mut root, ctx).await?;
        let default_organization_id = root
            .memberships()
            .default_membership()
            .map(|m| m.organization_id.clone());

        info!(
            end_user_id = %root.id(),
            organization_id = %command.organization_id,
            default_organization_id = ?default_organization_id,
            version = version,
            "Left organization"
        );

        if let Some(membership) = &leaving {
            self.services
                .sync_membership(root.id(), membership, AssignmentChange::Unassigned)
                .await;
        }

        Ok(MembershipOutcome {
            end_user_id: command.end_user_id,
            organization_id: command.organization_id,
            membership_id: None,
            default_organization_id,
            version,
        })
    }
}
