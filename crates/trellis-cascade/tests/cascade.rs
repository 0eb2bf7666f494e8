//! End-to-end cascade tests over a three-level resource tree
//!
//! Spaces contain challenges, challenges contain opportunities. The space
//! provider grants its admin credential full CRUD+grant inheritably and
//! honors a `public` attribute for anonymous read; the challenge provider
//! adds a local (non-inheritable) admin delete rule and an inheritable
//! member read rule; opportunities contribute nothing of their own.

use assert_matches::assert_matches;
use std::sync::Arc;
use trellis_authorization::{CredentialRule, RuleSet};
use trellis_cascade::{
    ExtensionProvider, ExtensionRegistry, InMemoryStore, PolicyCascade, PolicyStore,
    ResourceRecord,
};
use trellis_core::{
    Credential, CredentialSet, Privilege, PrivilegeSet, ResourceId, ResourceKind, Result,
    TrellisError,
};

struct SpaceProvider {
    child_kinds: Vec<ResourceKind>,
}

impl SpaceProvider {
    fn new() -> Self {
        Self {
            child_kinds: vec![ResourceKind::new("challenge")],
        }
    }
}

impl ExtensionProvider for SpaceProvider {
    fn extension_rules_for(&self, resource: &ResourceRecord) -> Result<RuleSet> {
        let admin_type = resource.attribute("admin-credential").unwrap_or("space-admin");
        let rules = RuleSet::new()
            .with_anonymous_read(resource.attribute("public") == Some("true"))
            .with_credential_rule(CredentialRule::new(
                Privilege::crud_grant(),
                admin_type,
                resource.id.clone(),
                true,
            ));
        Ok(rules)
    }

    fn child_kinds(&self) -> &[ResourceKind] {
        &self.child_kinds
    }
}

struct ChallengeProvider {
    child_kinds: Vec<ResourceKind>,
}

impl ChallengeProvider {
    fn new() -> Self {
        Self {
            child_kinds: vec![ResourceKind::new("opportunity")],
        }
    }
}

impl ExtensionProvider for ChallengeProvider {
    fn extension_rules_for(&self, resource: &ResourceRecord) -> Result<RuleSet> {
        let rules = RuleSet::new()
            .with_credential_rule(CredentialRule::new(
                [Privilege::Delete],
                "challenge-admin",
                resource.id.clone(),
                false,
            ))
            .with_credential_rule(CredentialRule::new(
                [Privilege::Read],
                "challenge-member",
                resource.id.clone(),
                true,
            ));
        Ok(rules)
    }

    fn child_kinds(&self) -> &[ResourceKind] {
        &self.child_kinds
    }
}

struct LeafProvider;

impl ExtensionProvider for LeafProvider {
    fn extension_rules_for(&self, _resource: &ResourceRecord) -> Result<RuleSet> {
        Ok(RuleSet::new())
    }

    fn child_kinds(&self) -> &[ResourceKind] {
        &[]
    }
}

fn registry() -> ExtensionRegistry {
    ExtensionRegistry::new()
        .with_provider("space", Arc::new(SpaceProvider::new()))
        .with_provider("challenge", Arc::new(ChallengeProvider::new()))
        .with_provider("opportunity", Arc::new(LeafProvider))
}

/// S1 (space) -> C1 (challenge) -> O1 (opportunity)
fn three_level_tree(store: &InMemoryStore) {
    store
        .add_resource(ResourceRecord::new("S1", "space", None))
        .unwrap();
    store
        .add_resource(ResourceRecord::new(
            "C1",
            "challenge",
            Some(ResourceId::new("S1")),
        ))
        .unwrap();
    store
        .add_resource(ResourceRecord::new(
            "O1",
            "opportunity",
            Some(ResourceId::new("C1")),
        ))
        .unwrap();
}

fn holder_of(credential_type: &str, resource: &str) -> CredentialSet {
    CredentialSet::anonymous().with_credential(Credential::new(credential_type, resource))
}

#[tokio::test]
async fn space_admin_rights_cascade_to_grandchild() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());

    let rebuilt = cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();
    assert_eq!(rebuilt, 3);

    let admin = holder_of("space-admin", "S1");
    for resource in ["S1", "C1", "O1"] {
        assert!(
            cascade
                .is_granted_on(&admin, &ResourceId::new(resource), Privilege::Delete)
                .await
                .unwrap(),
            "space admin should hold delete on {resource}"
        );
    }

    let other_admin = holder_of("space-admin", "S2");
    assert!(!cascade
        .is_granted_on(&other_admin, &ResourceId::new("S1"), Privilege::Update)
        .await
        .unwrap());
}

#[tokio::test]
async fn local_challenge_rule_does_not_reach_grandchild() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    let challenge_admin = holder_of("challenge-admin", "C1");
    assert!(cascade
        .is_granted_on(&challenge_admin, &ResourceId::new("C1"), Privilege::Delete)
        .await
        .unwrap());
    assert!(!cascade
        .is_granted_on(&challenge_admin, &ResourceId::new("O1"), Privilege::Delete)
        .await
        .unwrap());

    // The inheritable member rule does reach the grandchild.
    let member = holder_of("challenge-member", "C1");
    assert!(cascade
        .is_granted_on(&member, &ResourceId::new("O1"), Privilege::Read)
        .await
        .unwrap());
}

#[tokio::test]
async fn changed_root_extensions_propagate_on_full_rebuild() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    let old_admin = holder_of("space-admin", "S1");
    assert!(cascade
        .is_granted_on(&old_admin, &ResourceId::new("O1"), Privilege::Update)
        .await
        .unwrap());

    // The space switches to a different administrator credential type.
    store
        .add_resource(
            ResourceRecord::new("S1", "space", None)
                .with_attribute("admin-credential", "space-steward"),
        )
        .unwrap();
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    let new_admin = holder_of("space-steward", "S1");
    assert!(cascade
        .is_granted_on(&new_admin, &ResourceId::new("O1"), Privilege::Update)
        .await
        .unwrap());
    assert!(!cascade
        .is_granted_on(&old_admin, &ResourceId::new("O1"), Privilege::Update)
        .await
        .unwrap());
}

#[tokio::test]
async fn rebuild_is_idempotent_across_runs() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());

    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();
    let first = store.load_policy(&ResourceId::new("O1")).await.unwrap().unwrap();

    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();
    let second = store.load_policy(&ResourceId::new("O1")).await.unwrap().unwrap();

    assert!(first.rules_equal(&second));
}

#[tokio::test]
async fn anonymous_read_is_local_to_the_public_resource() {
    let store = Arc::new(InMemoryStore::new());
    store
        .add_resource(ResourceRecord::new("S1", "space", None).with_attribute("public", "true"))
        .unwrap();
    store
        .add_resource(ResourceRecord::new(
            "C1",
            "challenge",
            Some(ResourceId::new("S1")),
        ))
        .unwrap();
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    let anonymous = CredentialSet::anonymous();
    assert!(cascade
        .is_granted_on(&anonymous, &ResourceId::new("S1"), Privilege::Read)
        .await
        .unwrap());
    assert!(!cascade
        .is_granted_on(&anonymous, &ResourceId::new("S1"), Privilege::Update)
        .await
        .unwrap());
    // The flag does not inherit; the challenge stays private.
    assert!(!cascade
        .is_granted_on(&anonymous, &ResourceId::new("C1"), Privilege::Read)
        .await
        .unwrap());
}

#[tokio::test]
async fn aggregate_privileges_union_rules_and_anonymous_read() {
    let store = Arc::new(InMemoryStore::new());
    store
        .add_resource(ResourceRecord::new("S1", "space", None).with_attribute("public", "true"))
        .unwrap();
    store
        .add_resource(ResourceRecord::new(
            "C1",
            "challenge",
            Some(ResourceId::new("S1")),
        ))
        .unwrap();
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    // Member and admin credentials both match on C1; grants deduplicate.
    let actor = CredentialSet::anonymous()
        .with_credential(Credential::new("challenge-member", "C1"))
        .with_credential(Credential::new("challenge-admin", "C1"));
    let granted = cascade
        .granted_privileges(&actor, &ResourceId::new("C1"))
        .await
        .unwrap();
    let expected: PrivilegeSet = [Privilege::Read, Privilege::Delete].into_iter().collect();
    assert_eq!(granted, expected);

    // Anonymous actors on the public space still aggregate to read only.
    let anonymous = cascade
        .granted_privileges(&CredentialSet::anonymous(), &ResourceId::new("S1"))
        .await
        .unwrap();
    let read_only: PrivilegeSet = [Privilege::Read].into_iter().collect();
    assert_eq!(anonymous, read_only);
}

#[tokio::test]
async fn denial_carries_audit_context_with_uniform_external_shape() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    let outsider = holder_of("space-admin", "S2");
    let err = cascade
        .grant_or_fail_on(&outsider, &ResourceId::new("C1"), Privilege::Update, "user-7")
        .await
        .unwrap_err();

    assert_matches!(&err, TrellisError::AccessDenied { actor, resource, privilege } => {
        assert_eq!(actor, "user-7");
        assert_eq!(resource.as_str(), "C1");
        assert_eq!(*privilege, Privilege::Update);
    });
    assert_eq!(err.external_message(), "Access denied");
}

#[tokio::test]
async fn missing_policy_aborts_cascade_and_keeps_prior_state() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    // O1's policy was never initialized: a construction-order bug.
    store.remove_policy(&ResourceId::new("O1"));
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());

    let err = cascade
        .rebuild_policy_tree(&ResourceId::new("S1"))
        .await
        .unwrap_err();
    assert_matches!(err, TrellisError::PolicyNotInitialized { resource } => {
        assert_eq!(resource.as_str(), "O1");
    });

    // Resources visited before the abort are fully rebuilt.
    let space_policy = store.load_policy(&ResourceId::new("S1")).await.unwrap().unwrap();
    assert!(space_policy.rule_count() > 0);
    let challenge_policy = store.load_policy(&ResourceId::new("C1")).await.unwrap().unwrap();
    assert!(challenge_policy
        .credential_rules
        .iter()
        .any(|rule| rule.credential_type.as_str() == "space-admin"));
    // The uninitialized resource stays uninitialized, not defaulted.
    assert!(store.load_policy(&ResourceId::new("O1")).await.unwrap().is_none());
}

#[tokio::test]
async fn corrupted_policy_is_fatal_for_its_resource() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    store.insert_raw_policy(&ResourceId::new("C1"), "{\"id\":42}");

    // Decisions against the corrupted resource fail rather than deny-all
    // silently with an empty rule set.
    let admin = holder_of("space-admin", "S1");
    let err = cascade
        .is_granted_on(&admin, &ResourceId::new("C1"), Privilege::Read)
        .await
        .unwrap_err();
    assert_matches!(&err, TrellisError::MalformedRuleData { resource, .. } => {
        assert_eq!(resource.as_str(), "C1");
    });

    // A subtree rebuild hitting the corruption aborts loudly as well.
    let err = cascade
        .rebuild_policy_tree(&ResourceId::new("C1"))
        .await
        .unwrap_err();
    assert_matches!(err, TrellisError::MalformedRuleData { .. });

    // Repair by rebuilding from the parent is impossible too: the walk
    // reads the stored policy id before replacing it.
    let err = cascade
        .rebuild_policy_tree(&ResourceId::new("S1"))
        .await
        .unwrap_err();
    assert_matches!(err, TrellisError::MalformedRuleData { .. });
}

#[tokio::test]
async fn administrative_reset_rebuilds_the_subtree() {
    let store = Arc::new(InMemoryStore::new());
    three_level_tree(&store);
    let cascade = PolicyCascade::new(Arc::clone(&store) as Arc<dyn PolicyStore>, registry());
    cascade.rebuild_policy_tree(&ResourceId::new("S1")).await.unwrap();

    // Reset of the challenge subtree re-inherits from the space's policy.
    let rebuilt = cascade.reset_policy(&ResourceId::new("C1")).await.unwrap();
    assert_eq!(rebuilt, 2);

    let admin = holder_of("space-admin", "S1");
    assert!(cascade
        .is_granted_on(&admin, &ResourceId::new("O1"), Privilege::Delete)
        .await
        .unwrap());
}
