//! Register End User Use Case
//!
//! Creates and registers an end user with the starting roles and features
//! for the sign-up flow, optionally joining an organization in the same
//! commit. The starting grants are forwarded to authorization sync like
//! any other assignment.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{run_in_span, EndUserServices};
use crate::authorization::{get_initial_roles_and_features, UseCase};
use crate::end_user::entity::{Classification, EndUserRoot};
use crate::end_user::roles_and_features::{
    AssignmentChange, AssignmentTarget, FeatureAssignment, RoleAssignment,
};
use crate::usecase::{Aggregate, ExecutionContext, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEndUserCommand {
    pub classification: Classification,
    pub use_case: UseCase,
    /// Whether the sign-up request itself was authenticated
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Organization to join with the starting tenant roles and features
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEndUser {
    pub end_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_id: Option<String>,
    pub roles: Vec<String>,
    pub features: Vec<String>,
    pub version: u64,
}

pub struct RegisterEndUserUseCase {
    services: EndUserServices,
}

impl RegisterEndUserUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: RegisterEndUserCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RegisteredEndUser> {
        run_in_span(&ctx, "RegisterEndUser", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: RegisterEndUserCommand,
        ctx: &ExecutionContext,
    ) -> Result<RegisteredEndUser, UseCaseError> {
        let initial = get_initial_roles_and_features(command.use_case, command.is_authenticated);

        let mut root = EndUserRoot::create(command.classification)?;
        root.register(&initial.platform_roles, &initial.platform_features, command.username)?;

        let membership_id = match command.organization_id.as_deref() {
            Some(organization_id) => {
                let assigner = self.services.resolve_assigner(ctx, None).await?;
                Some(root.add_membership(
                    &assigner,
                    organization_id,
                    &initial.tenant_roles,
                    &initial.tenant_features,
                )?)
            }
            None => None,
        };

        let version = self.services.repository.save(&mut root, ctx).await?;
        info!(
            end_user_id = %root.id(),
            use_case = ?command.use_case,
            classification = ?command.classification,
            membership_id = ?membership_id,
            "End user registered"
        );

        self.sync_initial_grants(&root).await;

        Ok(RegisteredEndUser {
            end_user_id: root.id().to_string(),
            membership_id,
            roles: root.roles().denormalize(),
            features: root.features().denormalize(),
            version,
        })
    }

    async fn sync_initial_grants(&self, root: &EndUserRoot) {
        self.services
            .sync_roles(&RoleAssignment {
                root_id: root.id().to_string(),
                target: AssignmentTarget::Platform,
                change: AssignmentChange::Assigned,
                roles: root.roles().clone(),
            })
            .await;
        self.services
            .sync_features(&FeatureAssignment {
                root_id: root.id().to_string(),
                target: AssignmentTarget::Platform,
                change: AssignmentChange::Assigned,
                features: root.features().clone(),
            })
            .await;

        for membership in root.memberships() {
            self.services
                .sync_membership(root.id(), membership, AssignmentChange::Assigned)
                .await;
        }
    }
}
