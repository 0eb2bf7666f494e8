//! Privilege vocabulary
//!
//! A closed enum rather than free-form strings: every privilege a rule can
//! grant is named here. Sets of privileges are `BTreeSet` so that rule
//! construction and comparison are deterministic regardless of insertion
//! order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An action an actor may be authorized to perform on a resource.
///
/// The coarse CRUD privileges plus `Grant` (managing authorization itself)
/// form the base vocabulary; the remaining variants are fine-grained
/// privileges typically granted through privilege-rule expansion of a
/// coarse one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Privilege {
    /// Create child content on the resource
    Create,
    /// Read the resource
    Read,
    /// Update the resource
    Update,
    /// Delete the resource
    Delete,
    /// Manage the resource's authorization policy
    Grant,
    /// Create an aspect on the resource
    CreateAspect,
    /// Create a canvas on the resource
    CreateCanvas,
    /// Create a comment on the resource
    CreateComment,
    /// Join the resource's community directly
    CommunityJoin,
    /// Apply for membership of the resource's community
    CommunityApply,
}

/// A deduplicated, deterministically ordered set of privileges
pub type PrivilegeSet = BTreeSet<Privilege>;

impl Privilege {
    /// The four coarse CRUD privileges
    pub fn crud() -> PrivilegeSet {
        [Self::Create, Self::Read, Self::Update, Self::Delete]
            .into_iter()
            .collect()
    }

    /// CRUD plus `Grant`, the usual set for resource administrators
    pub fn crud_grant() -> PrivilegeSet {
        let mut set = Self::crud();
        set.insert(Self::Grant);
        set
    }

    /// Stable wire name of the privilege
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Grant => "grant",
            Self::CreateAspect => "create-aspect",
            Self::CreateCanvas => "create-canvas",
            Self::CreateComment => "create-comment",
            Self::CommunityJoin => "community-join",
            Self::CommunityApply => "community-apply",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
