//! Unified error type for trellis operations
//!
//! One enum for the whole workspace, in the style of a single shared error
//! system: expected authorization failures and structural failures are
//! distinguishable variants, with helper constructors for each.
//!
//! Externally, every authorization-related failure must present the same
//! shape so callers cannot distinguish "no matching rule" from "policy
//! missing or corrupted" (see [`TrellisError::external_message`]); internal
//! logs keep the full variant.

use crate::identifiers::ResourceId;
use crate::privilege::Privilege;
use serde::{Deserialize, Serialize};

/// Unified error type for all trellis operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TrellisError {
    /// The actor's credentials do not grant the required privilege
    #[error("Access denied: '{actor}' lacks privilege '{privilege}' on resource '{resource}'")]
    AccessDenied {
        /// Identifier of the requesting actor, for audit logging
        actor: String,
        /// Resource the request targeted
        resource: ResourceId,
        /// Privilege the request required
        privilege: Privilege,
    },

    /// A resource's policy was used before ever being built.
    ///
    /// A construction-order bug upstream; fatal for the enclosing cascade
    /// or request, never silently defaulted to allow-all or deny-all.
    #[error("Authorization policy not initialized for resource '{resource}'")]
    PolicyNotInitialized {
        /// Resource whose policy is missing
        resource: ResourceId,
    },

    /// Persisted rule data for a resource failed to deserialize.
    ///
    /// The resource is inaccessible until repaired; callers must log this
    /// loudly rather than treat the policy as empty.
    #[error("Malformed rule data for resource '{resource}': {detail}")]
    MalformedRuleData {
        /// Resource whose stored policy is corrupted
        resource: ResourceId,
        /// Deserialization failure detail
        detail: String,
    },

    /// A referenced entity does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// What was missing
        message: String,
    },

    /// The persistence collaborator failed
    #[error("Storage error: {message}")]
    Storage {
        /// Underlying failure detail
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong
        message: String,
    },
}

impl TrellisError {
    /// Create an access-denied error with audit context
    pub fn access_denied(
        actor: impl Into<String>,
        resource: ResourceId,
        privilege: Privilege,
    ) -> Self {
        Self::AccessDenied {
            actor: actor.into(),
            resource,
            privilege,
        }
    }

    /// Create a policy-not-initialized error
    pub fn policy_not_initialized(resource: ResourceId) -> Self {
        Self::PolicyNotInitialized { resource }
    }

    /// Create a malformed-rule-data error
    pub fn malformed_rule_data(resource: ResourceId, detail: impl Into<String>) -> Self {
        Self::MalformedRuleData {
            resource,
            detail: detail.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for failures that must never leak their cause to callers
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            Self::AccessDenied { .. }
                | Self::PolicyNotInitialized { .. }
                | Self::MalformedRuleData { .. }
        )
    }

    /// The message safe to return to an external caller.
    ///
    /// Authorization failures collapse to one indistinguishable shape so
    /// responses leak nothing about resource existence or internal policy
    /// state; other variants pass through.
    pub fn external_message(&self) -> String {
        if self.is_authorization_failure() {
            "Access denied".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Standard result type for trellis operations
pub type Result<T> = std::result::Result<T, TrellisError>;
