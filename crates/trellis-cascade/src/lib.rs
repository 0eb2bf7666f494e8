//! Policy cascade orchestration
//!
//! Everything the pure engine in `trellis-authorization` deliberately does
//! not do: loading resources and policies through the persistence
//! collaborator, dispatching to per-resource-kind extension providers,
//! walking the resource tree top-down to rebuild policies, and serving
//! access checks against stored policies.
//!
//! All I/O lives behind the [`PolicyStore`] trait; the walker itself holds
//! no state beyond its collaborators. Concurrent rebuilds of disjoint
//! subtrees are safe; two rebuilds targeting the same subtree must be
//! serialized by the caller (see [`walker::PolicyCascade`]).

pub mod extension;
pub mod memory;
pub mod platform;
pub mod store;
pub mod walker;

pub use extension::{ExtensionProvider, ExtensionRegistry};
pub use memory::InMemoryStore;
pub use platform::{build_platform_policy, init_platform_policy, platform_policy};
pub use store::{PolicyStore, ResourceRecord};
pub use walker::PolicyCascade;
