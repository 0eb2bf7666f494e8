//! Resource tree walker
//!
//! Drives the pure policy builder over a persisted resource tree: for each
//! resource, load its current policy and its parent's policy, derive the
//! kind-specific extensions, rebuild, save, then descend into every child
//! relation the kind declares. Parents are always rebuilt and saved before
//! their children are visited, so an aborted cascade leaves every visited
//! subtree fully consistent and every unvisited subtree in its prior,
//! equally consistent state. A half-rebuilt policy is never observable.

use crate::extension::{ExtensionProvider, ExtensionRegistry};
use crate::store::{PolicyStore, ResourceRecord};
use std::sync::Arc;
use trellis_authorization::{build_policy, grant_or_fail, is_granted, privileges_for, Policy};
use trellis_core::{CredentialSet, Privilege, PrivilegeSet, ResourceId, Result, TrellisError};

/// Orchestrates policy rebuilds and access checks over stored policies.
///
/// Rebuilds of disjoint subtrees may run concurrently. Two rebuilds
/// targeting the same resource must be serialized by the caller (a rebuild
/// is a full replace; a later writer would silently discard an earlier
/// one). The cascade itself takes no locks.
pub struct PolicyCascade {
    store: Arc<dyn PolicyStore>,
    registry: ExtensionRegistry,
}

impl PolicyCascade {
    /// Create a cascade over the given store and provider registry
    pub fn new(store: Arc<dyn PolicyStore>, registry: ExtensionRegistry) -> Self {
        Self { store, registry }
    }

    /// Rebuild the policies of `root` and every descendant, top-down.
    ///
    /// Returns the number of policies rebuilt. Fails with
    /// [`TrellisError::PolicyNotInitialized`] if any visited resource (or
    /// the root's parent) has no stored policy: a construction-order bug
    /// that must abort the cascade rather than silently skip a subtree.
    pub async fn rebuild_policy_tree(&self, root: &ResourceId) -> Result<usize> {
        let record = self.store.load_resource(root).await?;
        let parent_policy = match &record.parent {
            Some(parent_id) => Some(self.require_policy(parent_id).await?),
            None => None,
        };

        let mut rebuilt = 0;
        let mut pending = vec![(record, parent_policy)];

        while let Some((record, parent)) = pending.pop() {
            let provider = Arc::clone(self.registry.provider_for(&record.kind)?);
            let saved = match self.rebuild_one(&record, parent.as_ref(), provider.as_ref()).await {
                Ok(policy) => policy,
                Err(e) => {
                    tracing::error!(
                        resource = %record.id,
                        error = %e,
                        "policy cascade aborted"
                    );
                    return Err(e);
                }
            };
            rebuilt += 1;

            for kind in provider.child_kinds() {
                let children = self.store.load_children(&record.id, kind).await?;
                for child_id in children {
                    let child = self.store.load_resource(&child_id).await?;
                    pending.push((child, Some(saved.clone())));
                }
            }
        }

        tracing::info!(root = %root, rebuilt, "policy tree rebuilt");
        Ok(rebuilt)
    }

    /// Administrative reset: discard and rebuild the subtree rooted at `id`
    pub async fn reset_policy(&self, id: &ResourceId) -> Result<usize> {
        tracing::info!(resource = %id, "authorization reset requested");
        self.rebuild_policy_tree(id).await
    }

    /// Check one privilege against a resource's stored policy
    pub async fn is_granted_on(
        &self,
        credentials: &CredentialSet,
        resource: &ResourceId,
        required: Privilege,
    ) -> Result<bool> {
        let policy = self.require_policy(resource).await?;
        Ok(is_granted(credentials, &policy, required))
    }

    /// Require one privilege against a resource's stored policy, failing
    /// with audit context on denial
    pub async fn grant_or_fail_on(
        &self,
        credentials: &CredentialSet,
        resource: &ResourceId,
        required: Privilege,
        actor: &str,
    ) -> Result<()> {
        let policy = self.require_policy(resource).await?;
        grant_or_fail(credentials, &policy, required, actor, resource)
    }

    /// The aggregate privileges an actor holds on a resource
    pub async fn granted_privileges(
        &self,
        credentials: &CredentialSet,
        resource: &ResourceId,
    ) -> Result<PrivilegeSet> {
        let policy = self.require_policy(resource).await?;
        Ok(privileges_for(credentials, &policy))
    }

    /// Rebuild and persist one resource's policy
    async fn rebuild_one(
        &self,
        record: &ResourceRecord,
        parent: Option<&Policy>,
        provider: &dyn ExtensionProvider,
    ) -> Result<Policy> {
        let current = self.require_policy(&record.id).await?;
        let extensions = provider.extension_rules_for(record)?;

        let policy = build_policy(parent, &current, &extensions);
        self.store.save_policy(&record.id, &policy).await?;

        tracing::debug!(
            resource = %record.id,
            kind = %record.kind,
            rules = policy.rule_count(),
            anonymous_read = policy.anonymous_read,
            "policy rebuilt"
        );
        Ok(policy)
    }

    /// Load a policy that must exist, surfacing absence and corruption
    async fn require_policy(&self, id: &ResourceId) -> Result<Policy> {
        match self.store.load_policy(id).await {
            Ok(Some(policy)) => Ok(policy),
            Ok(None) => Err(TrellisError::policy_not_initialized(id.clone())),
            Err(e) => {
                if matches!(e, TrellisError::MalformedRuleData { .. }) {
                    tracing::error!(resource = %id, error = %e, "stored policy is corrupted");
                }
                Err(e)
            }
        }
    }
}
