//! End User Use Cases
//!
//! Each use case loads the target end user, resolves who is acting, runs
//! one aggregate command, saves the resulting events and then forwards any
//! net role or feature change to [`AuthorizationSync`].

pub mod features;
pub mod memberships;
pub mod register;
pub mod roles;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn, Instrument};

use super::entity::EndUserRoot;
use super::repository::EndUserRepository;
use super::membership::Membership;
use super::roles_and_features::{
    AssignmentChange, AssignmentTarget, FeatureAssignment, RoleAssignment,
};
use super::sync::AuthorizationSync;
use crate::authorization::{Assigner, ServiceAccounts};
use crate::usecase::{Aggregate, ExecutionContext, UseCaseError, UseCaseResult};

pub use features::{
    AssignFeaturesCommand, AssignFeaturesUseCase, ResetFeaturesCommand, ResetFeaturesUseCase,
    UnassignFeaturesCommand, UnassignFeaturesUseCase,
};
pub use memberships::{
    AddMembershipCommand, AddMembershipUseCase, ChangeDefaultMembershipCommand,
    ChangeDefaultMembershipUseCase, LeaveOrganizationCommand, LeaveOrganizationUseCase,
    MembershipOutcome,
};
pub use register::{RegisterEndUserCommand, RegisterEndUserUseCase, RegisteredEndUser};
pub use roles::{AssignRolesCommand, AssignRolesUseCase, UnassignRolesCommand, UnassignRolesUseCase};

/// Dependencies shared by every end user use case.
#[derive(Clone)]
pub struct EndUserServices {
    pub repository: Arc<EndUserRepository>,
    pub service_accounts: Arc<ServiceAccounts>,
    pub authorization_sync: Arc<dyn AuthorizationSync>,
}

impl EndUserServices {
    pub fn new(
        repository: Arc<EndUserRepository>,
        service_accounts: Arc<ServiceAccounts>,
        authorization_sync: Arc<dyn AuthorizationSync>,
    ) -> Self {
        Self {
            repository,
            service_accounts,
            authorization_sync,
        }
    }

    /// Authorization snapshot for `ctx.principal_id` acting on `target`.
    ///
    /// The principal is, in order: the target itself, a recognized service
    /// account, or another stored end user. Unknown principals act without
    /// authority.
    pub async fn resolve_assigner(
        &self,
        ctx: &ExecutionContext,
        target: Option<&EndUserRoot>,
    ) -> Result<Assigner, UseCaseError> {
        let principal = ctx.principal_id.as_str();

        if let Some(target) = target {
            if target.id() == principal {
                return Ok(target.as_assigner());
            }
        }
        if self.service_accounts.contains(principal) {
            return Ok(Assigner::service_account(principal));
        }

        match self.repository.find_by_id(principal).await? {
            Some(actor) => Ok(actor.as_assigner()),
            None => {
                debug!(principal_id = %principal, "Principal is not a known end user");
                Ok(Assigner::without_authority(principal))
            }
        }
    }

    /// Load the target end user and the acting assigner.
    pub async fn load_for_command(
        &self,
        end_user_id: &str,
        ctx: &ExecutionContext,
    ) -> Result<(EndUserRoot, Assigner), UseCaseError> {
        let root = self.repository.load(end_user_id).await?;
        let assigner = self.resolve_assigner(ctx, Some(&root)).await?;
        Ok((root, assigner))
    }

    /// Forward a net role change. The events are already committed, so a
    /// failing sync is logged and not reported as a use case failure.
    pub async fn sync_roles(&self, assignment: &RoleAssignment) {
        if assignment.is_empty() {
            debug!(end_user_id = %assignment.root_id, "No net role change, skipping sync");
            return;
        }
        if let Err(error) = self.authorization_sync.roles_changed(assignment).await {
            warn!(
                end_user_id = %assignment.root_id,
                code = error.code(),
                error = %error,
                "Role sync failed"
            );
        }
    }

    pub async fn sync_features(&self, assignment: &FeatureAssignment) {
        if assignment.is_empty() {
            debug!(end_user_id = %assignment.root_id, "No net feature change, skipping sync");
            return;
        }
        if let Err(error) = self.authorization_sync.features_changed(assignment).await {
            warn!(
                end_user_id = %assignment.root_id,
                code = error.code(),
                error = %error,
                "Feature sync failed"
            );
        }
    }

    /// Forward every role and feature a membership holds, as granted when
    /// joining or revoked when leaving.
    pub async fn sync_membership(
        &self,
        root_id: &str,
        membership: &Membership,
        change: AssignmentChange,
    ) {
        let target = AssignmentTarget::Membership {
            organization_id: membership.organization_id.clone(),
            membership_id: membership.id.clone(),
        };
        self.sync_roles(&RoleAssignment {
            root_id: root_id.to_string(),
            target: target.clone(),
            change,
            roles: membership.roles.clone(),
        })
        .await;
        self.sync_features(&FeatureAssignment {
            root_id: root_id.to_string(),
            target,
            change,
            features: membership.features.clone(),
        })
        .await;
    }
}

/// Run a use case body inside the execution span and log rejections.
pub(crate) async fn run_in_span<T, F>(
    ctx: &ExecutionContext,
    use_case: &'static str,
    body: F,
) -> UseCaseResult<T>
where
    F: Future<Output = Result<T, UseCaseError>>,
{
    let span = ctx.span(use_case);

    match body.instrument(span.clone()).await {
        Ok(value) => UseCaseResult::success(value),
        Err(error) => {
            span.in_scope(|| {
                warn!(code = error.code(), status = error.http_status_code(), error = %error, "Use case rejected");
            });
            UseCaseResult::failure(error)
        }
    }
}
