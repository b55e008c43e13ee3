//! Assign / Unassign Roles Use Cases
//!
//! Without an organization id the command targets platform roles (the
//! assigner needs the Operations role); with one it targets that
//! membership (the assigner must own the organization).

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{run_in_span, EndUserServices};
use crate::authorization::Roles;
use crate::end_user::roles_and_features::RoleAssignment;
use crate::usecase::{ExecutionContext, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRolesCommand {
    pub end_user_id: String,
    /// Membership scope when set, platform scope otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignRolesCommand {
    pub end_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub roles: Vec<String>,
}

pub struct AssignRolesUseCase {
    services: EndUserServices,
}

impl AssignRolesUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: AssignRolesCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleAssignment> {
        run_in_span(&ctx, "AssignRoles", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: AssignRolesCommand,
        ctx: &ExecutionContext,
    ) -> Result<RoleAssignment, UseCaseError> {
        let roles = Roles::from_names(command.roles)?;
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        let assignment = match command.organization_id.as_deref() {
            Some(organization_id) => {
                root.assign_membership_roles(&assigner, organization_id, &roles)?
            }
            None => root.assign_platform_roles(&assigner, &roles)?,
        };

        let version = self.services.repository.save(&mut root, ctx).await?;
        info!(
            end_user_id = %command.end_user_id,
            roles = ?assignment.roles.denormalize(),
            version = version,
            "Roles assigned"
        );

        self.services.sync_roles(&assignment).await;
        Ok(assignment)
    }
}

pub struct UnassignRolesUseCase {
    services: EndUserServices,
}

impl UnassignRolesUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: UnassignRolesCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleAssignment> {
        run_in_span(&ctx, "UnassignRoles", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: UnassignRolesCommand,
        ctx: &ExecutionContext,
    ) -> Result<RoleAssignment, UseCaseError> {
        let roles = Roles::from_names(command.roles)?;
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        let assignment = match command.organization_id.as_deref() {
            Some(organization_id) => {
                root.unassign_membership_roles(&assigner, organization_id, &roles)?
            }
            None => root.unassign_platform_roles(&assigner, &roles)?,
        };

        let version = self.services.repository.save(&mut root, ctx).await?;
        info!(
            end_user_id = %command.end_user_id,
            roles = ?assignment.roles.denormalize(),
            version = version,
            "Roles unassigned"
        );

        self.services.sync_roles(&assignment).await;
        Ok(assignment)
    }
}
