//! Typed identifiers for resources, credentials and policies
//!
//! Resources are keyed by caller-supplied string identifiers; the engine
//! treats them as opaque. Policies carry a stable UUID that survives
//! rebuilds of their rule sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a protected resource.
///
/// Assigned by the persistence layer; the engine only ever compares these
/// for equality and uses them as lookup keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    /// Create a resource identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind tag of a resource in the tree (e.g. "space", "community").
///
/// Selects which extension provider supplies rules for the resource and
/// which child relations the cascade descends into.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKind(pub String);

impl ResourceKind {
    /// Create a resource kind from any string-like value
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// The kind as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_string())
    }
}

impl From<String> for ResourceKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

/// Type tag of a credential (e.g. "space-admin", "global-registered").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialType(pub String);

impl CredentialType {
    /// Create a credential type from any string-like value
    pub fn new(credential_type: impl Into<String>) -> Self {
        Self(credential_type.into())
    }

    /// The type as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CredentialType {
    fn from(credential_type: &str) -> Self {
        Self(credential_type.to_string())
    }
}

impl From<String> for CredentialType {
    fn from(credential_type: String) -> Self {
        Self(credential_type)
    }
}

/// Stable identifier of a policy.
///
/// A rebuild replaces a policy's rules in place; the id never changes for
/// the lifetime of the owning resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub Uuid);

impl PolicyId {
    /// Create a fresh random policy identifier
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
