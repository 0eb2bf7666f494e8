//! Actor credentials
//!
//! The authentication collaborator resolves an incoming request into a
//! [`CredentialSet`]: the plain credentials the actor holds inside the
//! platform, plus externally verified credentials attested by a trusted
//! issuer. The engine only ever reads these; it never issues or revokes.

use crate::identifiers::{CredentialType, ResourceId};
use serde::{Deserialize, Serialize};

/// A credential held by an actor, scoped to a specific resource.
///
/// Matching is exact on both fields: holding `space-admin` for resource
/// `S1` says nothing about `S2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Type of the credential
    pub credential_type: CredentialType,

    /// Resource the credential is scoped to
    pub resource_id: ResourceId,
}

impl Credential {
    /// Create a credential of the given type scoped to the given resource
    pub fn new(credential_type: impl Into<CredentialType>, resource_id: impl Into<ResourceId>) -> Self {
        Self {
            credential_type: credential_type.into(),
            resource_id: resource_id.into(),
        }
    }
}

/// A credential attested by an external trusted issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedCredential {
    /// Type of the verified credential
    pub credential_type: CredentialType,

    /// Issuer that attested the credential
    pub issuer: ResourceId,
}

impl VerifiedCredential {
    /// Create a verified credential of the given type from the given issuer
    pub fn new(credential_type: impl Into<CredentialType>, issuer: impl Into<ResourceId>) -> Self {
        Self {
            credential_type: credential_type.into(),
            issuer: issuer.into(),
        }
    }
}

/// The full set of credentials an actor presents with a request.
///
/// An unauthenticated actor presents the empty set; policies with
/// anonymous read still grant such an actor `Read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    /// Credentials held inside the platform
    pub credentials: Vec<Credential>,

    /// Credentials attested by external issuers
    pub verified_credentials: Vec<VerifiedCredential>,
}

impl CredentialSet {
    /// The empty credential set of an anonymous actor
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Add a credential, builder style
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credentials.push(credential);
        self
    }

    /// Add a verified credential, builder style
    pub fn with_verified_credential(mut self, credential: VerifiedCredential) -> Self {
        self.verified_credentials.push(credential);
        self
    }

    /// True if the actor presents no credentials at all
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty() && self.verified_credentials.is_empty()
    }
}
