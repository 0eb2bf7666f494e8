//! Per-resource-kind rule extension providers
//!
//! Each resource kind contributes its own rules to the policies of
//! resources of that kind: which credential administers it, whether it is
//! publicly readable, which privileges expand into finer-grained ones.
//! One [`ExtensionProvider`] implementation per kind keeps that
//! customization out of the inheritance algorithm; the cascade looks
//! providers up in an [`ExtensionRegistry`] by the resource's kind tag.

use crate::store::ResourceRecord;
use std::collections::HashMap;
use std::sync::Arc;
use trellis_authorization::RuleSet;
use trellis_core::{ResourceKind, Result, TrellisError};

/// Supplies the rule extensions for resources of one kind.
///
/// `extension_rules_for` must be a pure function of the already-loaded
/// record: any entity state it needs (membership credential types, owner
/// identifiers) travels in the record's attributes, loaded before the
/// cascade reaches the resource.
pub trait ExtensionProvider: Send + Sync {
    /// Rules to append to this resource's policy after inheritance
    fn extension_rules_for(&self, resource: &ResourceRecord) -> Result<RuleSet>;

    /// Child resource kinds the cascade descends into below this kind
    fn child_kinds(&self) -> &[ResourceKind];
}

impl std::fmt::Debug for dyn ExtensionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExtensionProvider")
    }
}

/// Maps resource kinds to their extension providers.
///
/// A resource whose kind has no registered provider is a wiring bug and
/// fails the cascade loudly; defaulting to "no extensions" would leave the
/// resource with inherited rules only and no local administration.
#[derive(Default)]
pub struct ExtensionRegistry {
    providers: HashMap<ResourceKind, Arc<dyn ExtensionProvider>>,
}

impl ExtensionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the provider for a kind, builder style.
    ///
    /// Re-registering a kind replaces the previous provider.
    pub fn with_provider(
        mut self,
        kind: impl Into<ResourceKind>,
        provider: Arc<dyn ExtensionProvider>,
    ) -> Self {
        self.providers.insert(kind.into(), provider);
        self
    }

    /// Look up the provider for a kind
    pub fn provider_for(&self, kind: &ResourceKind) -> Result<&Arc<dyn ExtensionProvider>> {
        self.providers.get(kind).ok_or_else(|| {
            TrellisError::internal(format!("no extension provider registered for kind '{kind}'"))
        })
    }
}
