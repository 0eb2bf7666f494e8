//! Persistence collaborator contract
//!
//! The cascade treats storage as an opaque key-value/graph store: resources
//! and policies are loaded and saved by [`ResourceId`], child relations are
//! enumerated per kind. No assumption about the backing technology; the
//! in-memory implementation in [`crate::memory`] is sufficient for tests
//! and embedding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trellis_authorization::Policy;
use trellis_core::{ResourceId, ResourceKind, Result};

/// A protected resource as loaded from storage.
///
/// Carries the identity, tree position and the entity state extension
/// providers read when deriving rules (e.g. which credential type denotes
/// membership of this resource). The engine never interprets `attributes`
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Identifier of the resource
    pub id: ResourceId,

    /// Kind tag selecting the extension provider and cascade relations
    pub kind: ResourceKind,

    /// Parent resource, `None` for roots
    pub parent: Option<ResourceId>,

    /// Entity state read by extension providers
    pub attributes: BTreeMap<String, String>,
}

impl ResourceRecord {
    /// Create a record with no attributes
    pub fn new(
        id: impl Into<ResourceId>,
        kind: impl Into<ResourceKind>,
        parent: Option<ResourceId>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            parent,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute, builder style
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Storage operations the cascade depends on.
///
/// Implementations must be loud about partial failure: if the children of
/// a resource cannot all be enumerated, `load_children` must error rather
/// than return a subset; a silently truncated child list would leave an
/// unauthorized-by-default subtree that looks authorized. "No children of
/// this kind" is the empty vector, not an error.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Load a resource record; errors if the resource does not exist
    async fn load_resource(&self, id: &ResourceId) -> Result<ResourceRecord>;

    /// Load a resource's stored policy.
    ///
    /// `Ok(None)` means the policy was never initialized; the caller
    /// decides whether that is fatal. Corrupted stored rule data must
    /// surface as [`trellis_core::TrellisError::MalformedRuleData`], never
    /// as an empty policy.
    async fn load_policy(&self, id: &ResourceId) -> Result<Option<Policy>>;

    /// Replace a resource's stored policy
    async fn save_policy(&self, id: &ResourceId, policy: &Policy) -> Result<()>;

    /// Enumerate all children of `id` with the given kind
    async fn load_children(&self, id: &ResourceId, kind: &ResourceKind) -> Result<Vec<ResourceId>>;
}
