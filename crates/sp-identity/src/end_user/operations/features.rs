//! Assign / Unassign / Reset Features Use Cases

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{run_in_span, EndUserServices};
use crate::authorization::{Features, SubscriptionTier};
use crate::end_user::roles_and_features::FeatureAssignment;
use crate::usecase::{ExecutionContext, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignFeaturesCommand {
    pub end_user_id: String,
    /// Membership scope when set, platform scope otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignFeaturesCommand {
    pub end_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub features: Vec<String>,
}

/// Issued by billing when a subscription tier changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetFeaturesCommand {
    pub end_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub tier: SubscriptionTier,
}

pub struct AssignFeaturesUseCase {
    services: EndUserServices,
}

impl AssignFeaturesUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: AssignFeaturesCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<FeatureAssignment> {
        run_in_span(&ctx, "AssignFeatures", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: AssignFeaturesCommand,
        ctx: &ExecutionContext,
    ) -> Result<FeatureAssignment, UseCaseError> {
        let features = Features::from_names(command.features)?;
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        let assignment = match command.organization_id.as_deref() {
            Some(organization_id) => {
                root.assign_membership_features(&assigner, organization_id, &features)?
            }
            None => root.assign_platform_features(&assigner, &features)?,
        };

        let version = self.services.repository.save(&mut root, ctx).await?;
        info!(
            end_user_id = %command.end_user_id,
            features = ?assignment.features.denormalize(),
            version = version,
            "Features assigned"
        );

        self.services.sync_features(&assignment).await;
        Ok(assignment)
    }
}

pub struct UnassignFeaturesUseCase {
    services: EndUserServices,
}

impl UnassignFeaturesUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: UnassignFeaturesCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<FeatureAssignment> {
        run_in_span(&ctx, "UnassignFeatures", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: UnassignFeaturesCommand,
        ctx: &ExecutionContext,
    ) -> Result<FeatureAssignment, UseCaseError> {
        let features = Features::from_names(command.features)?;
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        let assignment = match command.organization_id.as_deref() {
            Some(organization_id) => {
                root.unassign_membership_features(&assigner, organization_id, &features)?
            }
            None => root.unassign_platform_features(&assigner, &features)?,
        };

        let version = self.services.repository.save(&mut root, ctx).await?;
        info!(
            end_user_id = %command.end_user_id,
            features = ?assignment.features.denormalize(),
            version = version,
            "Features unassigned"
        );

        self.services.sync_features(&assignment).await;
        Ok(assignment)
    }
}

pub struct ResetFeaturesUseCase {
    services: EndUserServices,
}

impl ResetFeaturesUseCase {
    pub fn new(services: EndUserServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        command: ResetFeaturesCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<FeatureAssignment> {
        run_in_span(&ctx, "ResetFeatures", self.run(command, &ctx)).await
    }

    async fn run(
        &self,
        command: ResetFeaturesCommand,
        ctx: &ExecutionContext,
    ) -> Result<FeatureAssignment, UseCaseError> {
        let (mut root, assigner) = self
            .services
            .load_for_command(&command.end_user_id, ctx)
            .await?;

        let assignment = match command.organization_id.as_deref() {
            Some(organization_id) => {
                root.reset_membership_features(&assigner, organization_id, command.tier)?
            }
            None => root.reset_platform_features(&assigner, command.tier)?,
        };

        let version = self.services.repository.save(&mut root, ctx).await?;
        info!(
            end_user_id = %command.end_user_id,
            tier = ?command.tier,
            features = ?assignment.features.denormalize(),
            version = version,
            "Features reset"
        );

        self.services.sync_features(&assignment).await;
        Ok(assignment)
    }
}
