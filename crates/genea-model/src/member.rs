//! Member records and the genealogy snapshot node.

use crate::{MemberId, PackageId, RankId, TreeShape};
use serde::{Deserialize, Serialize};

/// Account standing of a member.
///
/// Only `Active` members receive level commissions or count toward the
/// active-downline rank thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
    Suspended,
}

impl MemberStatus {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
            MemberStatus::Suspended => "suspended",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, MemberStatus::Active)
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of the organization.
///
/// Invariants (maintained by the roster + placement engine, not by this
/// struct):
/// - `sponsor` is a lookup key, never an owning pointer; the chain of
///   sponsors is acyclic and terminates at a root (`sponsor == None`).
/// - `level == sponsor.level + 1`; roots have `level == 0`.
/// - Under a binary sponsor at most one child holds `"left"` and at most
///   one holds `"right"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    /// Display name.
    pub name: String,

    /// The member that introduced this one, if any.
    pub sponsor: Option<MemberId>,

    /// Shape policy of the tree this member belongs to.
    pub shape: TreeShape,

    /// Slot label under the sponsor. Meaningful only relative to
    /// (sponsor, shape); empty for roots.
    pub position: String,

    /// Depth from the tree root (root = 0).
    pub level: u32,

    pub status: MemberStatus,

    /// Running sales/commission aggregates, incremented by order and
    /// commission settlement. Never recomputed by the core.
    pub personal_sales: f64,
    pub team_sales: f64,
    pub total_commission: f64,

    /// Current rank tier, if any has been achieved.
    pub rank: Option<RankId>,

    /// Purchased package, if any. Supplies commission-rate and max-level
    /// overrides.
    pub package: Option<PackageId>,

    /// Unix seconds.
    pub joined_at: u64,
}

impl Member {
    pub fn is_root(&self) -> bool {
        self.sponsor.is_none()
    }
}

/// Pre-insert form of a member, consumed by `Roster::create_member`.
///
/// The placement engine fills `sponsor`, `position`, and `level`; the
/// roster assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    pub sponsor: Option<MemberId>,
    pub shape: TreeShape,
    pub position: String,
    pub level: u32,
    pub status: MemberStatus,
    pub package: Option<PackageId>,
}

impl MemberDraft {
    /// Draft for a root member (no sponsor, level 0, empty position).
    pub fn root(name: impl Into<String>, shape: TreeShape) -> Self {
        Self {
            name: name.into(),
            sponsor: None,
            shape,
            position: String::new(),
            level: 0,
            status: MemberStatus::Active,
            package: None,
        }
    }
}

/// One node of a bounded-depth genealogy snapshot.
///
/// Produced by the traversal helpers for inspection/visualisation; carries
/// a copy of the display fields, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub member: MemberId,
    pub name: String,
    pub position: String,
    pub level: u32,
    pub status: MemberStatus,
    pub personal_sales: f64,
    pub team_sales: f64,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_activity() {
        assert!(MemberStatus::Active.is_active());
        assert!(!MemberStatus::Inactive.is_active());
        assert!(!MemberStatus::Suspended.is_active());
    }

    #[test]
    fn root_draft_has_no_lineage() {
        let draft = MemberDraft::root("alice", TreeShape::Binary);
        assert_eq!(draft.sponsor, None);
        assert_eq!(draft.level, 0);
        assert!(draft.position.is_empty());
        assert!(draft.status.is_active());
    }
}
