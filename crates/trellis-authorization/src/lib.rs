//! Authorization engine for tree-structured policies
//!
//! Two pure, stateless engines over in-memory values:
//!
//! - **Policy Builder** ([`builder::build_policy`]): rebuilds a resource's
//!   effective [`Policy`] from its parent's policy plus resource-specific
//!   rule extensions, implementing the inheritance semantics (local rules
//!   stay local, inheritable rules flow down, rebuilds are full replaces).
//! - **Decision Engine** ([`decision`]): evaluates an actor's credential
//!   set against a policy: boolean grant checks, fail-fast variants with
//!   audit context, and aggregate privilege introspection.
//!
//! Neither engine performs I/O or holds state; both are safe to call
//! concurrently from any number of tasks. Orchestration over a persisted
//! resource tree lives in `trellis-cascade`.

pub mod builder;
pub mod decision;
pub mod policy;
pub mod rules;

pub use builder::build_policy;
pub use decision::{grant_or_fail, implied_privileges, is_granted, privileges_for};
pub use policy::Policy;
pub use rules::{CredentialRule, PrivilegeRule, RuleSet, VerifiedCredentialRule};
