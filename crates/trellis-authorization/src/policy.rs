//! Authorization policy
//!
//! Every protected resource owns exactly one [`Policy`]; it is created
//! empty alongside the resource, populated by the builder before the
//! resource becomes visible to authorization, and deleted with the
//! resource. Rebuilds replace the rule lists wholesale while the id stays
//! stable.

use crate::rules::{CredentialRule, PrivilegeRule, RuleSet, VerifiedCredentialRule};
use serde::{Deserialize, Serialize};
use trellis_core::PolicyId;

/// The effective authorization state of one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Stable identifier, unchanged across rebuilds
    pub id: PolicyId,

    /// Grants `Read` to every actor unconditionally when set
    pub anonymous_read: bool,

    /// Rules matched against the actor's credentials
    pub credential_rules: Vec<CredentialRule>,

    /// Rules matched against the actor's verified credentials
    pub verified_credential_rules: Vec<VerifiedCredentialRule>,

    /// Privilege-implication expansion facts
    pub privilege_rules: Vec<PrivilegeRule>,
}

impl Policy {
    /// Create an empty policy with a fresh id and anonymous read disabled
    pub fn new() -> Self {
        Self::with_id(PolicyId::random())
    }

    /// Create an empty policy with a caller-supplied id
    pub fn with_id(id: PolicyId) -> Self {
        Self {
            id,
            anonymous_read: false,
            credential_rules: Vec::new(),
            verified_credential_rules: Vec::new(),
            privilege_rules: Vec::new(),
        }
    }

    /// Total number of rules across all three lists
    pub fn rule_count(&self) -> usize {
        self.credential_rules.len()
            + self.verified_credential_rules.len()
            + self.privilege_rules.len()
    }

    /// The projection of this policy that flows to a child resource.
    ///
    /// Credential rules keep only the inheritable ones; verified-credential
    /// and privilege rules flow unconditionally. The anonymous-read flag
    /// does not inherit and is absent from the projection.
    pub fn inheritable_rules(&self) -> RuleSet {
        RuleSet {
            anonymous_read: None,
            credential_rules: self
                .credential_rules
                .iter()
                .filter(|rule| rule.inheritable)
                .cloned()
                .collect(),
            verified_credential_rules: self.verified_credential_rules.clone(),
            privilege_rules: self.privilege_rules.clone(),
        }
    }

    /// Append every rule in the set and apply its anonymous-read override
    pub fn append_rules(&mut self, rules: &RuleSet) {
        if let Some(anonymous_read) = rules.anonymous_read {
            self.anonymous_read = anonymous_read;
        }
        self.credential_rules.extend(rules.credential_rules.iter().cloned());
        self.verified_credential_rules
            .extend(rules.verified_credential_rules.iter().cloned());
        self.privilege_rules.extend(rules.privilege_rules.iter().cloned());
    }

    /// Structural rule equality, ignoring order within each list.
    ///
    /// The id and anonymous flag must match exactly; the three rule lists
    /// are compared as sets.
    pub fn rules_equal(&self, other: &Policy) -> bool {
        fn set_eq<T: PartialEq>(a: &[T], b: &[T]) -> bool {
            a.len() == b.len()
                && a.iter().all(|rule| b.contains(rule))
                && b.iter().all(|rule| a.contains(rule))
        }

        self.id == other.id
            && self.anonymous_read == other.anonymous_read
            && set_eq(&self.credential_rules, &other.credential_rules)
            && set_eq(&self.verified_credential_rules, &other.verified_credential_rules)
            && set_eq(&self.privilege_rules, &other.privilege_rules)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}
