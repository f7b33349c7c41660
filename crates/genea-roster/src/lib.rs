//! Roster capability surface.
//!
//! The engines in `genea-engine` never touch storage directly; they consume
//! the [`Roster`] trait, which names exactly the lookup/insert/aggregate
//! capabilities the algorithms need. Persistence technology is a collaborator
//! concern; [`MemoryRoster`] is the transactional reference implementation
//! used by the engines' tests and by callers that keep the organization
//! in-process.
//!
//! Guarantees the engines rely on:
//! - `direct_children` returns creation order (matrix slots fill in order).
//! - `commit_commissions` is all-or-nothing: every record plus every payee
//!   total increment, or nothing.
//! - `create_member` runs inside whatever transaction the caller uses to
//!   serialize placement; the trait itself is synchronous and lock-free.

mod error;
mod memory;

pub use error::{Error, Result};
pub use memory::{MemoryRoster, RankAchievement};

use genea_model::{
    Commission, CommissionId, Member, MemberDraft, MemberId, Package, PackageId, Rank, RankId,
    TreeShape,
};

/// Storage capabilities consumed by the engines.
pub trait Roster {
    /// Look up a member by id.
    fn member(&self, id: MemberId) -> Result<Member>;

    /// Direct sponsees of a member, in creation order.
    fn direct_children(&self, sponsor: MemberId) -> Result<Vec<Member>>;

    /// The child occupying `position` under `sponsor` within `shape`, if any.
    fn child_at(&self, sponsor: MemberId, shape: TreeShape, position: &str)
        -> Result<Option<Member>>;

    /// Number of direct sponsees.
    fn count_downlines(&self, id: MemberId) -> Result<u64>;

    /// Number of direct sponsees with active status.
    fn count_active_downlines(&self, id: MemberId) -> Result<u64>;

    /// Insert a new member. Assigns the id and join timestamp.
    fn create_member(&mut self, draft: MemberDraft) -> Result<Member>;

    /// Overwrite a member record.
    fn update_member(&mut self, member: &Member) -> Result<()>;

    /// Set a member's rank reference.
    fn set_rank(&mut self, member: MemberId, rank: RankId) -> Result<()>;

    /// Look up a rank by id.
    fn rank(&self, id: RankId) -> Result<Rank>;

    /// All ranks, ascending by ordinal level.
    fn ranks_by_level(&self) -> Result<Vec<Rank>>;

    /// Look up a package by id.
    fn package(&self, id: PackageId) -> Result<Package>;

    /// Look up a commission by id.
    fn commission(&self, id: CommissionId) -> Result<Commission>;

    /// Overwrite a commission record (status transitions only; amount and
    /// percentage are immutable by convention).
    fn update_commission(&mut self, commission: &Commission) -> Result<()>;

    /// All commissions payable to a member, in creation order.
    fn commissions_for(&self, member: MemberId) -> Result<Vec<Commission>>;

    /// Atomically persist a batch of commissions and increment each payee's
    /// running commission total. Enforces the `(order, payee, kind, level)`
    /// uniqueness key: a batch containing an already-committed key is
    /// rejected whole with [`Error::DuplicateCommission`] and nothing is
    /// written. Returns the committed records with assigned ids.
    fn commit_commissions(&mut self, batch: Vec<Commission>) -> Result<Vec<Commission>>;
}
