//! End User Integration Tests
//!
//! Whole-flow behavior through the public API:
//! - Idempotent assignment and baseline protection
//! - Membership default/uniqueness invariants over mutation sequences
//! - Authorization failures leave no trace
//! - Replay of stored streams and optimistic versioning
//! - Sync seam behavior after commit

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use sp_identity::authorization::UseCase;
use sp_identity::end_user::events::{Created, MembershipAdded, Registered};
use sp_identity::end_user::operations::{
    AssignRolesCommand, AssignRolesUseCase, ResetFeaturesCommand, ResetFeaturesUseCase,
};
use sp_identity::end_user::{FeatureAssignment, RecordingAuthorizationSync, RoleAssignment};
use sp_identity::usecase::EventEnvelope;
use sp_identity::{
    get_initial_roles_and_features, Aggregate, Assigner, AuthorizationSync, Classification,
    EndUserEvent, EndUserRepository, EndUserRoot, EndUserServices, EventStore, ExecutionContext,
    Features, InMemoryEventStore, Roles, ServiceAccounts, SubscriptionTier, UseCaseError,
};

fn roles(names: &[&str]) -> Roles {
    Roles::from_names(names.iter().copied()).unwrap()
}

fn features(names: &[&str]) -> Features {
    Features::from_names(names.iter().copied()).unwrap()
}

fn operator() -> Assigner {
    Assigner::end_user("user_ops", roles(&["platform_standard", "platform_operations"]), vec![])
}

fn service() -> Assigner {
    Assigner::service_account("svc_maintenance")
}

fn registered(use_case: UseCase) -> EndUserRoot {
    let initial = get_initial_roles_and_features(use_case, true);
    let mut root = EndUserRoot::create(Classification::Person).unwrap();
    root.register(&initial.platform_roles, &initial.platform_features, None)
        .unwrap();
    root
}

fn exactly_one_default(root: &EndUserRoot) -> bool {
    let memberships = root.memberships();
    memberships.is_empty() || memberships.iter().filter(|m| m.is_default).count() == 1
}

fn unique_organizations(root: &EndUserRoot) -> bool {
    let mut orgs: Vec<&str> = root
        .memberships()
        .iter()
        .map(|m| m.organization_id.as_str())
        .collect();
    let total = orgs.len();
    orgs.sort_unstable();
    orgs.dedup();
    orgs.len() == total
}

// ============================================================================
// Aggregate properties
// ============================================================================

#[test]
fn test_reassigning_held_entries_raises_nothing() {
    let mut root = registered(UseCase::CreatingPerson);
    root.add_membership(&service(), "org_a", &roles(&["tenant_owner"]), &Features::empty())
        .unwrap();
    root.changes_mut().mark_committed();
    let owner = root.as_assigner();

    let platform = root
        .assign_platform_roles(&operator(), &roles(&["platform_standard"]))
        .unwrap();
    let platform_features = root
        .assign_platform_features(&operator(), &features(&["platform_basic", "platform_paidtrial"]))
        .unwrap();
    let tenant = root
        .assign_membership_roles(&owner, "org_a", &roles(&["tenant_owner", "tenant_member"]))
        .unwrap();
    let tenant_features = root
        .assign_membership_features(&owner, "org_a", &features(&["tenant_basic"]))
        .unwrap();

    assert!(platform.is_empty());
    assert!(platform_features.is_empty());
    assert!(tenant.is_empty());
    assert!(tenant_features.is_empty());
    assert!(!root.changes().has_pending());
}

#[test]
fn test_baseline_unassign_fails_for_every_actor() {
    let actors = [
        operator(),
        service(),
        Assigner::without_authority("user_x"),
    ];

    for actor in &actors {
        let mut root = registered(UseCase::CreatingPerson);
        root.add_membership(&service(), "org_a", &Roles::empty(), &Features::empty())
            .unwrap();
        root.changes_mut().mark_committed();

        let errors = [
            root.unassign_platform_roles(actor, &roles(&["platform_standard"]))
                .unwrap_err(),
            root.unassign_platform_features(actor, &features(&["platform_basic"]))
                .unwrap_err(),
            root.unassign_membership_roles(actor, "org_a", &roles(&["tenant_member"]))
                .unwrap_err(),
            root.unassign_membership_features(actor, "org_a", &features(&["tenant_basic"]))
                .unwrap_err(),
        ];

        for err in &errors {
            assert!(err.is_rule_violation(), "{} for {}", err.code(), actor.id());
        }
        assert!(root.roles().has_role("platform_standard"));
        assert!(root.features().has_feature("platform_basic"));
        assert!(!root.changes().has_pending());
    }
}

#[test]
fn test_membership_invariants_hold_across_mutations() {
    let mut root = registered(UseCase::CreatingPerson);
    let orgs = ["org_a", "org_b", "org_c", "org_d"];

    for org in orgs {
        root.add_membership(&service(), org, &Roles::empty(), &Features::empty())
            .unwrap();
        root.add_membership(&service(), org, &Roles::empty(), &Features::empty())
            .unwrap();
        assert!(exactly_one_default(&root));
        assert!(unique_organizations(&root));
    }

    let me = root.as_assigner();
    root.change_default_membership(&me, "org_c").unwrap();
    assert!(exactly_one_default(&root));

    for org in ["org_c", "org_a", "org_d"] {
        root.remove_membership(&me, org).unwrap();
        assert!(exactly_one_default(&root));
        assert!(unique_organizations(&root));
        assert!(root.ensure_invariants().is_ok());
    }

    root.remove_membership(&me, "org_b").unwrap();
    assert!(root.memberships().is_empty());
    assert!(root.ensure_invariants().is_ok());
}

#[test]
fn test_non_owner_cannot_assign_membership_roles() {
    let mut root = registered(UseCase::InvitingMemberToOrg);
    root.add_membership(&service(), "org_a", &Roles::empty(), &Features::empty())
        .unwrap();
    root.changes_mut().mark_committed();
    let before = root
        .memberships()
        .find_by_organization_id("org_a")
        .unwrap()
        .roles
        .clone();

    let member = root.as_assigner();
    let err = root
        .assign_membership_roles(&member, "org_a", &roles(&["tenant_member"]))
        .unwrap_err();

    assert!(err.is_role_violation());
    assert!(!root.changes().has_pending());
    assert_eq!(
        root.memberships().find_by_organization_id("org_a").unwrap().roles,
        before
    );
}

#[test]
fn test_reset_by_non_service_account_is_role_violation() {
    let mut root = registered(UseCase::CreatingPerson);
    root.add_membership(&service(), "org_a", &roles(&["tenant_owner"]), &Features::empty())
        .unwrap();
    let owner = root.as_assigner();

    for actor in [operator(), owner] {
        let err = root
            .reset_membership_features(&actor, "org_a", SubscriptionTier::Professional)
            .unwrap_err();
        assert!(err.is_role_violation());
    }
}

#[test]
fn test_next_default_after_removing_default_of_two() {
    let base: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
    let events = vec![
        EndUserEvent::Created(Created {
            root_id: "user_1".to_string(),
            occurred_utc: base,
            classification: Classification::Person,
        }),
        EndUserEvent::Registered(Registered {
            root_id: "user_1".to_string(),
            occurred_utc: base,
            classification: Classification::Person,
            username: None,
            roles: vec!["platform_standard".to_string()],
            features: vec!["platform_basic".to_string()],
        }),
        EndUserEvent::MembershipAdded(MembershipAdded {
            root_id: "user_1".to_string(),
            occurred_utc: base + Duration::minutes(1),
            membership_id: "mbr_a".to_string(),
            organization_id: "org_a".to_string(),
            is_default: true,
            roles: vec!["tenant_member".to_string()],
            features: vec!["tenant_basic".to_string()],
        }),
        EndUserEvent::MembershipAdded(MembershipAdded {
            root_id: "user_1".to_string(),
            occurred_utc: base + Duration::minutes(2),
            membership_id: "mbr_b".to_string(),
            organization_id: "org_b".to_string(),
            is_default: false,
            roles: vec!["tenant_member".to_string()],
            features: vec!["tenant_basic".to_string()],
        }),
    ];

    let mut root = EndUserRoot::rehydrate(events).unwrap();
    assert_eq!(root.memberships().find_next_default_membership().unwrap().id, "mbr_b");

    let me = root.as_assigner();
    root.remove_membership(&me, "org_a").unwrap();
    assert_eq!(root.memberships().default_membership().unwrap().id, "mbr_b");
}

#[test]
fn test_membership_added_round_trip() {
    let added = MembershipAdded {
        root_id: "user_1".to_string(),
        occurred_utc: Utc::now(),
        membership_id: "mbr_1".to_string(),
        organization_id: "org_1".to_string(),
        is_default: true,
        roles: vec!["tenant_owner".to_string(), "tenant_member".to_string()],
        features: vec!["tenant_paid2".to_string(), "tenant_basic".to_string()],
    };
    let events = vec![
        EndUserEvent::Created(Created {
            root_id: "user_1".to_string(),
            occurred_utc: Utc::now(),
            classification: Classification::Person,
        }),
        EndUserEvent::MembershipAdded(added.clone()),
    ];

    let root = EndUserRoot::rehydrate(events).unwrap();
    let membership = root.memberships().find_by_membership_id("mbr_1").unwrap();

    assert_eq!(membership.roles.denormalize(), added.roles);
    assert_eq!(membership.features.denormalize(), added.features);
    assert_eq!(membership.organization_id, added.organization_id);
    assert_eq!(membership.is_default, added.is_default);
}

#[test]
fn test_replay_rejects_malformed_payload() {
    let json = r#"[
        {"type": "Created", "rootId": "user_1", "occurredUtc": "2024-01-01T00:00:00Z", "classification": "PERSON"},
        {"type": "PlatformRoleAssigned", "rootId": "user_1", "occurredUtc": "2024-01-01T00:00:01Z", "role": "Not A Role"}
    ]"#;
    let events: Vec<EndUserEvent> = serde_json::from_str(json).unwrap();

    let err = EndUserRoot::rehydrate(events).unwrap_err();
    assert!(matches!(err, UseCaseError::ValidationError { .. }));
}

// ============================================================================
// Use case layer
// ============================================================================

/// Sync that always fails.
struct BrokenSync;

#[async_trait]
impl AuthorizationSync for BrokenSync {
    async fn roles_changed(&self, _assignment: &RoleAssignment) -> Result<(), UseCaseError> {
        Err(UseCaseError::commit("policy cache unavailable"))
    }

    async fn features_changed(&self, _assignment: &FeatureAssignment) -> Result<(), UseCaseError> {
        Err(UseCaseError::commit("policy cache unavailable"))
    }
}

/// Store that accepts loads but rejects every append.
struct ReadOnlyStore(Arc<InMemoryEventStore<EndUserEvent>>);

#[async_trait]
impl EventStore<EndUserEvent> for ReadOnlyStore {
    async fn load(
        &self,
        aggregate_type: &str,
        aggregate_id: &str,
    ) -> Result<Vec<EventEnvelope<EndUserEvent>>, UseCaseError> {
        self.0.load(aggregate_type, aggregate_id).await
    }

    async fn append(
        &self,
        _aggregate_type: &str,
        _aggregate_id: &str,
        _expected_version: u64,
        _events: Vec<EventEnvelope<EndUserEvent>>,
    ) -> Result<u64, UseCaseError> {
        Err(UseCaseError::commit("store is read-only"))
    }
}

async fn seeded(
    store: Arc<dyn EventStore<EndUserEvent>>,
    sync: Arc<dyn AuthorizationSync>,
) -> (EndUserServices, String) {
    let repository = Arc::new(EndUserRepository::with_source(store, "platform:identity"));
    let services = EndUserServices::new(repository.clone(), Arc::new(ServiceAccounts::builtin()), sync);

    let mut root = registered(UseCase::CreatingPerson);
    let id = root.id().to_string();
    repository
        .save(&mut root, &ExecutionContext::create("svc_maintenance"))
        .await
        .unwrap();
    (services, id)
}

#[tokio::test]
async fn test_sync_failure_does_not_undo_commit() {
    let store = Arc::new(InMemoryEventStore::<EndUserEvent>::new());
    let (services, id) = seeded(store.clone(), Arc::new(BrokenSync)).await;

    let assignment = ResetFeaturesUseCase::new(services.clone())
        .execute(
            ResetFeaturesCommand {
                end_user_id: id.clone(),
                organization_id: None,
                tier: SubscriptionTier::Professional,
            },
            ExecutionContext::create("svc_externalwebhook"),
        )
        .await
        .unwrap();

    assert!(assignment.features.has_feature("platform_paid2"));
    let stored = services.repository.load(&id).await.unwrap();
    assert!(stored.features().has_feature("platform_paid2"));
}

#[tokio::test]
async fn test_store_failure_skips_sync() {
    let inner = Arc::new(InMemoryEventStore::<EndUserEvent>::new());
    let (_, id) = seeded(inner.clone(), Arc::new(RecordingAuthorizationSync::new())).await;

    let sync = Arc::new(RecordingAuthorizationSync::new());
    let repository = Arc::new(EndUserRepository::with_source(
        Arc::new(ReadOnlyStore(inner.clone())),
        "platform:identity",
    ));
    let services = EndUserServices::new(repository, Arc::new(ServiceAccounts::builtin()), sync.clone());

    let err = ResetFeaturesUseCase::new(services)
        .execute(
            ResetFeaturesCommand {
                end_user_id: id,
                organization_id: None,
                tier: SubscriptionTier::Enterprise,
            },
            ExecutionContext::create("svc_externalwebhook"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.http_status_code(), 500);
    assert_eq!(sync.call_count(), 0);
    assert_eq!(inner.event_count(), 2);
}

#[tokio::test]
async fn test_suspended_operator_loses_authority() {
    let store = Arc::new(InMemoryEventStore::<EndUserEvent>::new());
    let sync = Arc::new(RecordingAuthorizationSync::new());
    let (services, target_id) = seeded(store.clone(), sync.clone()).await;
    let ctx = ExecutionContext::create("svc_maintenance");

    let mut operator_root = registered(UseCase::CreatingPerson);
    operator_root
        .assign_platform_roles(&operator(), &roles(&["platform_operations"]))
        .unwrap();
    services.repository.save(&mut operator_root, &ctx).await.unwrap();

    let assign = AssignRolesUseCase::new(services.clone());
    let command = AssignRolesCommand {
        end_user_id: target_id.clone(),
        organization_id: None,
        roles: vec!["platform_operations".to_string()],
    };

    operator_root.suspend(&operator(), "compromised account").unwrap();
    services.repository.save(&mut operator_root, &ctx).await.unwrap();

    let err = assign
        .execute(command, ExecutionContext::create(operator_root.id()))
        .await
        .unwrap_err();
    assert!(err.is_role_violation());
    assert_eq!(sync.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_writers_first_wins() {
    let store = Arc::new(InMemoryEventStore::<EndUserEvent>::new());
    let (services, id) = seeded(store.clone(), Arc::new(RecordingAuthorizationSync::new())).await;
    let ctx = ExecutionContext::create("svc_maintenance");

    let mut first = services.repository.load(&id).await.unwrap();
    let mut second = services.repository.load(&id).await.unwrap();
    first.reset_platform_features(&service(), SubscriptionTier::Standard).unwrap();
    second.reset_platform_features(&service(), SubscriptionTier::Enterprise).unwrap();

    services.repository.save(&mut first, &ctx).await.unwrap();
    let err = services.repository.save(&mut second, &ctx).await.unwrap_err();

    assert_eq!(err.code(), "STREAM_VERSION_CONFLICT");
    let stored = services.repository.load(&id).await.unwrap();
    assert!(stored.features().has_feature("platform_paidtrial"));
    assert!(!stored.features().has_feature("platform_paid3"));
}
