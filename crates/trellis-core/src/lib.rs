//! Shared value types for the trellis authorization workspace
//!
//! Hosts the typed identifiers, privilege vocabulary, credential model and
//! the unified error type used by every other trellis crate. Nothing in
//! this crate performs I/O or holds mutable state.

pub mod credentials;
pub mod errors;
pub mod identifiers;
pub mod privilege;

pub use credentials::{Credential, CredentialSet, VerifiedCredential};
pub use errors::{Result, TrellisError};
pub use identifiers::{CredentialType, PolicyId, ResourceId, ResourceKind};
pub use privilege::{Privilege, PrivilegeSet};
