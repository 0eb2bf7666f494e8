//! Platform-level root policy
//!
//! The resource forest is rooted in platform-level resources; above them
//! sits a single fixed policy carrying the platform-wide rules (global
//! administrators, registered-user defaults). It is built once at process
//! startup from caller-supplied rules and never mutated afterward;
//! changing it means restarting the process.

use once_cell::sync::OnceCell;
use std::sync::Arc;
use trellis_authorization::{build_policy, Policy, RuleSet};
use trellis_core::{Result, TrellisError};

static PLATFORM_POLICY: OnceCell<Arc<Policy>> = OnceCell::new();

/// Build a platform policy value from the given rules.
///
/// Pure construction: a fresh empty policy extended with `rules`, no
/// parent to inherit from.
pub fn build_platform_policy(rules: &RuleSet) -> Policy {
    build_policy(None, &Policy::new(), rules)
}

/// Install the process-wide platform policy.
///
/// Must be called exactly once, before any cascade or decision consults
/// [`platform_policy`]; a second call is an internal error.
pub fn init_platform_policy(rules: &RuleSet) -> Result<Arc<Policy>> {
    let policy = Arc::new(build_platform_policy(rules));
    PLATFORM_POLICY
        .set(Arc::clone(&policy))
        .map_err(|_| TrellisError::internal("platform policy already initialized"))?;
    tracing::info!(rules = policy.rule_count(), "platform policy initialized");
    Ok(policy)
}

/// The process-wide platform policy.
///
/// Errors if [`init_platform_policy`] has not run yet.
pub fn platform_policy() -> Result<Arc<Policy>> {
    PLATFORM_POLICY
        .get()
        .cloned()
        .ok_or_else(|| TrellisError::internal("platform policy not initialized"))
}
