//! In-memory policy store
//!
//! Policies are held as JSON blobs rather than live values so the store
//! exercises the same serialization boundary a persistent backend would:
//! loading deserializes, and a corrupted blob surfaces as
//! [`TrellisError::MalformedRuleData`] instead of an empty rule set.
//!
//! Creating a resource also creates its empty policy, matching the
//! lifecycle contract that a policy exists from resource creation onward
//! and is only ever replaced, never re-created.

use crate::store::{PolicyStore, ResourceRecord};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use trellis_authorization::Policy;
use trellis_core::{ResourceId, ResourceKind, Result, TrellisError};

#[derive(Default)]
struct Inner {
    resources: HashMap<ResourceId, ResourceRecord>,
    policies: HashMap<ResourceId, String>,
}

/// Thread-safe in-memory implementation of [`PolicyStore`]
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource, creating its empty policy if the
    /// resource is new. Child relations are derived from each record's
    /// parent and kind; no separate relation table to keep in sync.
    pub fn add_resource(&self, record: ResourceRecord) -> Result<()> {
        let mut inner = self.inner.write();
        let id = record.id.clone();
        if !inner.policies.contains_key(&id) {
            let blob = encode_policy(&Policy::new())?;
            inner.policies.insert(id.clone(), blob);
        }
        inner.resources.insert(id, record);
        Ok(())
    }

    /// Drop a resource's policy without dropping the resource.
    ///
    /// Simulates the construction-order bug the cascade must detect: a
    /// resource visible in the tree whose policy was never initialized.
    pub fn remove_policy(&self, id: &ResourceId) {
        self.inner.write().policies.remove(id);
    }

    /// Overwrite a resource's stored policy blob verbatim.
    ///
    /// Storage-boundary escape hatch; a blob that does not decode to a
    /// policy makes the resource inaccessible until repaired.
    pub fn insert_raw_policy(&self, id: &ResourceId, blob: impl Into<String>) {
        self.inner.write().policies.insert(id.clone(), blob.into());
    }
}

fn encode_policy(policy: &Policy) -> Result<String> {
    serde_json::to_string(policy)
        .map_err(|e| TrellisError::internal(format!("policy serialization failed: {e}")))
}

#[async_trait]
impl PolicyStore for InMemoryStore {
    async fn load_resource(&self, id: &ResourceId) -> Result<ResourceRecord> {
        self.inner
            .read()
            .resources
            .get(id)
            .cloned()
            .ok_or_else(|| TrellisError::not_found(format!("resource '{id}'")))
    }

    async fn load_policy(&self, id: &ResourceId) -> Result<Option<Policy>> {
        let inner = self.inner.read();
        let Some(blob) = inner.policies.get(id) else {
            return Ok(None);
        };
        serde_json::from_str(blob)
            .map(Some)
            .map_err(|e| TrellisError::malformed_rule_data(id.clone(), e.to_string()))
    }

    async fn save_policy(&self, id: &ResourceId, policy: &Policy) -> Result<()> {
        let blob = encode_policy(policy)?;
        self.inner.write().policies.insert(id.clone(), blob);
        Ok(())
    }

    async fn load_children(&self, id: &ResourceId, kind: &ResourceKind) -> Result<Vec<ResourceId>> {
        let inner = self.inner.read();
        let mut children: Vec<ResourceId> = inner
            .resources
            .values()
            .filter(|record| record.parent.as_ref() == Some(id) && &record.kind == kind)
            .map(|record| record.id.clone())
            .collect();
        children.sort();
        Ok(children)
    }
}
