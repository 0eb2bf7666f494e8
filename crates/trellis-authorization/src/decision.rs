//! Decision engine
//!
//! Evaluates an actor's credential set against one policy. Pure predicates
//! over borrowed values: no I/O, no internal state, no side effects, safe
//! under arbitrary concurrency. "No rule matched" is a normal `false`
//! result, never an error; only [`grant_or_fail`] turns it into an
//! [`TrellisError::AccessDenied`] carrying audit context.

use crate::policy::Policy;
use trellis_core::{CredentialSet, Privilege, PrivilegeSet, ResourceId, Result, TrellisError};

/// True if the credential set holds the required privilege under the policy.
///
/// Checks, in order: the anonymous-read short circuit (so unauthenticated
/// actors with an empty credential set can read public resources), then
/// credential rules, then verified-credential rules. Privilege-rule
/// expansion is not applied here; callers wanting implied privileges ask
/// [`implied_privileges`] and re-query.
pub fn is_granted(credentials: &CredentialSet, policy: &Policy, required: Privilege) -> bool {
    if policy.anonymous_read && required == Privilege::Read {
        return true;
    }

    let credential_match = policy.credential_rules.iter().any(|rule| {
        rule.grants(required) && credentials.credentials.iter().any(|held| rule.matches(held))
    });
    if credential_match {
        return true;
    }

    policy.verified_credential_rules.iter().any(|rule| {
        rule.grants(required)
            && credentials
                .verified_credentials
                .iter()
                .any(|held| rule.matches(held))
    })
}

/// Require a privilege, failing with audit context when it is not granted.
///
/// `actor` identifies the requester for audit logging only; it plays no
/// part in evaluation (the credential set is the sole authority input).
pub fn grant_or_fail(
    credentials: &CredentialSet,
    policy: &Policy,
    required: Privilege,
    actor: &str,
    resource: &ResourceId,
) -> Result<()> {
    if is_granted(credentials, policy, required) {
        Ok(())
    } else {
        Err(TrellisError::access_denied(actor, resource.clone(), required))
    }
}

/// The full set of privileges the credential set holds under the policy.
///
/// Deduplicated union of `Read` (when anonymous read is on) and the grants
/// of every matching credential rule. Verified-credential rules do not
/// contribute to this aggregate even though [`is_granted`] honors them;
/// the introspection view is deliberately coarser than the grant check.
pub fn privileges_for(credentials: &CredentialSet, policy: &Policy) -> PrivilegeSet {
    let mut granted = PrivilegeSet::new();

    if policy.anonymous_read {
        granted.insert(Privilege::Read);
    }

    for rule in &policy.credential_rules {
        if credentials.credentials.iter().any(|held| rule.matches(held)) {
            granted.extend(rule.granted_privileges.iter().copied());
        }
    }

    granted
}

/// Privileges implied by holding `source` under the policy's privilege
/// rules.
///
/// A single table lookup: implications are one hop and never followed
/// transitively. The result does not include `source` itself.
pub fn implied_privileges(policy: &Policy, source: Privilege) -> PrivilegeSet {
    policy
        .privilege_rules
        .iter()
        .filter(|rule| rule.source_privilege == source)
        .flat_map(|rule| rule.granted_privileges.iter().copied())
        .collect()
}
