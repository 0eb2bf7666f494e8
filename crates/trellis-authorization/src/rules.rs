//! Rule model
//!
//! Three rule kinds make up a policy, kept as strongly typed values rather
//! than serialized blobs so a malformed rule cannot exist in memory:
//!
//! - [`CredentialRule`] grants privileges to holders of a credential
//!   scoped to a specific resource; may be marked non-inheritable.
//! - [`VerifiedCredentialRule`] grants privileges to holders of an
//!   externally attested credential from a trusted issuer.
//! - [`PrivilegeRule`] expands an already-granted privilege into
//!   additional implied privileges; never matched against credentials.
//!
//! A [`RuleSet`] bundles extensions of all three kinds, as supplied by the
//! per-resource-type authorization collaborators.

use serde::{Deserialize, Serialize};
use trellis_core::{Credential, CredentialType, Privilege, PrivilegeSet, ResourceId, VerifiedCredential};

/// Grants privileges to actors holding a matching credential.
///
/// Matches exactly on `(credential_type, resource_id)`. Rules with
/// `inheritable == false` are scoped to the resource that declared them
/// and are dropped when the policy is inherited by a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRule {
    /// Privileges granted when the rule matches
    pub granted_privileges: PrivilegeSet,

    /// Credential type the rule matches
    pub credential_type: CredentialType,

    /// Resource the matching credential must be scoped to
    pub resource_id: ResourceId,

    /// Whether child policies inherit this rule
    pub inheritable: bool,
}

impl CredentialRule {
    /// Create a credential rule
    pub fn new(
        granted_privileges: impl IntoIterator<Item = Privilege>,
        credential_type: impl Into<CredentialType>,
        resource_id: impl Into<ResourceId>,
        inheritable: bool,
    ) -> Self {
        Self {
            granted_privileges: granted_privileges.into_iter().collect(),
            credential_type: credential_type.into(),
            resource_id: resource_id.into(),
            inheritable,
        }
    }

    /// True if the actor credential satisfies this rule's match criteria
    pub fn matches(&self, credential: &Credential) -> bool {
        credential.credential_type == self.credential_type
            && credential.resource_id == self.resource_id
    }

    /// True if the rule grants the given privilege
    pub fn grants(&self, privilege: Privilege) -> bool {
        self.granted_privileges.contains(&privilege)
    }
}

/// Grants privileges to actors holding a matching verified credential.
///
/// `resource_id` names the trusted issuer; matching is exact on
/// `(credential_type, issuer)`. Verified rules carry no inheritable flag
/// and always flow to child policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedCredentialRule {
    /// Privileges granted when the rule matches
    pub granted_privileges: PrivilegeSet,

    /// Verified credential type the rule matches
    pub credential_type: CredentialType,

    /// Issuer the matching credential must be attested by
    pub resource_id: ResourceId,
}

impl VerifiedCredentialRule {
    /// Create a verified-credential rule
    pub fn new(
        granted_privileges: impl IntoIterator<Item = Privilege>,
        credential_type: impl Into<CredentialType>,
        resource_id: impl Into<ResourceId>,
    ) -> Self {
        Self {
            granted_privileges: granted_privileges.into_iter().collect(),
            credential_type: credential_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// True if the verified credential satisfies this rule's match criteria
    pub fn matches(&self, credential: &VerifiedCredential) -> bool {
        credential.credential_type == self.credential_type
            && credential.issuer == self.resource_id
    }

    /// True if the rule grants the given privilege
    pub fn grants(&self, privilege: Privilege) -> bool {
        self.granted_privileges.contains(&privilege)
    }
}

/// Expands an already-granted privilege into additional implied privileges.
///
/// Never matched against credentials: expansion is a one-hop lookup from
/// `source_privilege` to `granted_privileges`, with no transitive closure.
/// Privilege rules are resource-independent facts and always inherit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeRule {
    /// Privileges implied by holding the source privilege
    pub granted_privileges: PrivilegeSet,

    /// Privilege that triggers the expansion
    pub source_privilege: Privilege,
}

impl PrivilegeRule {
    /// Create a privilege rule
    pub fn new(
        granted_privileges: impl IntoIterator<Item = Privilege>,
        source_privilege: Privilege,
    ) -> Self {
        Self {
            granted_privileges: granted_privileges.into_iter().collect(),
            source_privilege,
        }
    }
}

/// Rule extensions for one resource, as supplied by its entity-specific
/// authorization collaborator.
///
/// `anonymous_read` is `Some` when the resource type explicitly sets the
/// flag (including propagating its parent's value) and `None` to leave the
/// policy's current flag untouched; the flag itself is never inherited
/// automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Explicit anonymous-read override, if the resource type sets one
    pub anonymous_read: Option<bool>,

    /// Credential rules to append
    pub credential_rules: Vec<CredentialRule>,

    /// Verified-credential rules to append
    pub verified_credential_rules: Vec<VerifiedCredentialRule>,

    /// Privilege rules to append
    pub privilege_rules: Vec<PrivilegeRule>,
}

impl RuleSet {
    /// The empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anonymous-read flag, builder style
    pub fn with_anonymous_read(mut self, anonymous_read: bool) -> Self {
        self.anonymous_read = Some(anonymous_read);
        self
    }

    /// Append a credential rule, builder style
    pub fn with_credential_rule(mut self, rule: CredentialRule) -> Self {
        self.credential_rules.push(rule);
        self
    }

    /// Append a verified-credential rule, builder style
    pub fn with_verified_credential_rule(mut self, rule: VerifiedCredentialRule) -> Self {
        self.verified_credential_rules.push(rule);
        self
    }

    /// Append a privilege rule, builder style
    pub fn with_privilege_rule(mut self, rule: PrivilegeRule) -> Self {
        self.privilege_rules.push(rule);
        self
    }

    /// True if the set carries no rules and no flag override
    pub fn is_empty(&self) -> bool {
        self.anonymous_read.is_none()
            && self.credential_rules.is_empty()
            && self.verified_credential_rules.is_empty()
            && self.privilege_rules.is_empty()
    }
}
