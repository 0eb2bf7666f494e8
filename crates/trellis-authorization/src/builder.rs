//! Policy builder (inheritance engine)
//!
//! Rebuilds one resource's effective policy from its parent's policy plus
//! the resource's own extension rules. The rebuild is always a full
//! replace: the current policy's rules are discarded, never accumulated,
//! so no stale rule can survive a structural change. Recursion over the
//! resource tree is driven by the cascade layer, which calls this once per
//! resource, parent before children.

use crate::policy::Policy;
use crate::rules::RuleSet;

/// Compute a resource's effective policy.
///
/// Steps:
/// 1. Reset: start from an empty rule set under the current policy's id.
/// 2. Inherit: copy the parent's inheritable projection (credential rules
///    marked inheritable, all verified-credential rules, all privilege
///    rules). A root resource passes `None` and inherits nothing. The
///    parent's anonymous-read flag never inherits; the current flag is
///    kept unless the extensions override it.
/// 3. Extend: append the resource-specific extension rules and apply
///    their anonymous-read override, if any.
///
/// Pure and deterministic: identical inputs yield structurally identical
/// output, so rebuilding twice is a no-op beyond the write itself.
pub fn build_policy(parent: Option<&Policy>, current: &Policy, extensions: &RuleSet) -> Policy {
    let mut policy = Policy::with_id(current.id);
    policy.anonymous_read = current.anonymous_read;

    if let Some(parent) = parent {
        policy.append_rules(&parent.inheritable_rules());
    }
    policy.append_rules(extensions);

    policy
}
