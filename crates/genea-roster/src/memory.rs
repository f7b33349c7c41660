//! In-memory roster.
//!
//! HashMap-backed reference implementation of [`Roster`]. Single-threaded by
//! construction; callers that need concurrent placement hold their own
//! exclusive lock over the sponsor subtree for the full
//! placement-through-commit window.

use crate::{Error, Result, Roster};
use genea_model::{
    unix_now, Commission, CommissionId, CommissionKind, Member, MemberDraft, MemberId, OrderId,
    Package, PackageId, Rank, RankId, TreeShape,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A recorded rank attainment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAchievement {
    pub member: MemberId,
    pub rank: RankId,
    /// Unix seconds.
    pub achieved_at: u64,
}

/// In-memory organization state.
#[derive(Debug, Default)]
pub struct MemoryRoster {
    members: HashMap<MemberId, Member>,
    /// Direct sponsee ids per sponsor, in creation order.
    children: HashMap<MemberId, Vec<MemberId>>,
    ranks: HashMap<RankId, Rank>,
    packages: HashMap<PackageId, Package>,
    commissions: HashMap<CommissionId, Commission>,
    /// Commission creation order, for stable listings.
    commission_order: Vec<CommissionId>,
    /// Committed idempotency keys.
    committed_keys: HashSet<(Option<OrderId>, MemberId, CommissionKind, u32)>,
    achievements: Vec<RankAchievement>,
    next_member: u64,
    next_commission: u64,
}

impl MemoryRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self {
            next_member: 1,
            next_commission: 1,
            ..Self::default()
        }
    }

    /// Seed a rank. Ordinal levels must be unique.
    pub fn add_rank(&mut self, rank: Rank) -> Result<()> {
        if self.ranks.values().any(|r| r.level == rank.level) {
            return Err(Error::DuplicateRankLevel(rank.level));
        }
        self.ranks.insert(rank.id, rank);
        Ok(())
    }

    /// Seed a package.
    pub fn add_package(&mut self, package: Package) {
        self.packages.insert(package.id, package);
    }

    /// Administrative re-link of a member under a new sponsor and slot.
    ///
    /// Performs no shape, level, or cycle validation: it is the raw move
    /// operation an operator uses to repair a tree, and the engines'
    /// traversals are responsible for detecting any corruption it
    /// introduces.
    pub fn relink(&mut self, member: MemberId, new_sponsor: MemberId, position: &str) -> Result<()> {
        self.member_ref(new_sponsor)?;
        let record = self.members.get_mut(&member).ok_or(Error::MemberNotFound(member))?;
        let old_sponsor = record.sponsor;
        record.sponsor = Some(new_sponsor);
        record.position = position.to_string();
        if let Some(old) = old_sponsor {
            if let Some(siblings) = self.children.get_mut(&old) {
                siblings.retain(|id| *id != member);
            }
        }
        self.children.entry(new_sponsor).or_default().push(member);
        Ok(())
    }

    /// Rank attainment history, oldest first.
    pub fn rank_achievements(&self, member: MemberId) -> Vec<RankAchievement> {
        self.achievements
            .iter()
            .filter(|a| a.member == member)
            .cloned()
            .collect()
    }

    /// Total members on the roster.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if no members exist.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn member_ref(&self, id: MemberId) -> Result<&Member> {
        self.members.get(&id).ok_or(Error::MemberNotFound(id))
    }
}

impl Roster for MemoryRoster {
    fn member(&self, id: MemberId) -> Result<Member> {
        self.member_ref(id).cloned()
    }

    fn direct_children(&self, sponsor: MemberId) -> Result<Vec<Member>> {
        self.member_ref(sponsor)?;
        let ids = self.children.get(&sponsor).map(Vec::as_slice).unwrap_or(&[]);
        Ok(ids.iter().filter_map(|id| self.members.get(id)).cloned().collect())
    }

    fn child_at(
        &self,
        sponsor: MemberId,
        shape: TreeShape,
        position: &str,
    ) -> Result<Option<Member>> {
        Ok(self
            .direct_children(sponsor)?
            .into_iter()
            .find(|m| m.shape == shape && m.position == position))
    }

    fn count_downlines(&self, id: MemberId) -> Result<u64> {
        self.member_ref(id)?;
        Ok(self.children.get(&id).map(|c| c.len() as u64).unwrap_or(0))
    }

    fn count_active_downlines(&self, id: MemberId) -> Result<u64> {
        Ok(self
            .direct_children(id)?
            .iter()
            .filter(|m| m.status.is_active())
            .count() as u64)
    }

    fn create_member(&mut self, draft: MemberDraft) -> Result<Member> {
        if let Some(sponsor) = draft.sponsor {
            self.member_ref(sponsor)?;
        }
        let id = MemberId::new(self.next_member);
        self.next_member += 1;
        let member = Member {
            id,
            name: draft.name,
            sponsor: draft.sponsor,
            shape: draft.shape,
            position: draft.position,
            level: draft.level,
            status: draft.status,
            personal_sales: 0.0,
            team_sales: 0.0,
            total_commission: 0.0,
            rank: None,
            package: draft.package,
            joined_at: unix_now(),
        };
        if let Some(sponsor) = member.sponsor {
            self.children.entry(sponsor).or_default().push(id);
        }
        self.members.insert(id, member.clone());
        Ok(member)
    }

    fn update_member(&mut self, member: &Member) -> Result<()> {
        if !self.members.contains_key(&member.id) {
            return Err(Error::MemberNotFound(member.id));
        }
        self.members.insert(member.id, member.clone());
        Ok(())
    }

    fn set_rank(&mut self, member: MemberId, rank: RankId) -> Result<()> {
        if !self.ranks.contains_key(&rank) {
            return Err(Error::RankNotFound(rank));
        }
        let record = self.members.get_mut(&member).ok_or(Error::MemberNotFound(member))?;
        record.rank = Some(rank);
        self.achievements.push(RankAchievement {
            member,
            rank,
            achieved_at: unix_now(),
        });
        Ok(())
    }

    fn rank(&self, id: RankId) -> Result<Rank> {
        self.ranks.get(&id).cloned().ok_or(Error::RankNotFound(id))
    }

    fn ranks_by_level(&self) -> Result<Vec<Rank>> {
        let mut ranks: Vec<Rank> = self.ranks.values().cloned().collect();
        ranks.sort_by_key(|r| r.level);
        Ok(ranks)
    }

    fn package(&self, id: PackageId) -> Result<Package> {
        self.packages.get(&id).cloned().ok_or(Error::PackageNotFound(id))
    }

    fn commission(&self, id: CommissionId) -> Result<Commission> {
        self.commissions.get(&id).cloned().ok_or(Error::CommissionNotFound(id))
    }

    fn update_commission(&mut self, commission: &Commission) -> Result<()> {
        if !self.commissions.contains_key(&commission.id) {
            return Err(Error::CommissionNotFound(commission.id));
        }
        self.commissions.insert(commission.id, commission.clone());
        Ok(())
    }

    fn commissions_for(&self, member: MemberId) -> Result<Vec<Commission>> {
        self.member_ref(member)?;
        Ok(self
            .commission_order
            .iter()
            .filter_map(|id| self.commissions.get(id))
            .filter(|c| c.payee == member)
            .cloned()
            .collect())
    }

    fn commit_commissions(&mut self, batch: Vec<Commission>) -> Result<Vec<Commission>> {
        // Validate the whole batch before touching any state, so a rejected
        // batch leaves no partial records or totals behind.
        // The uniqueness key binds order-sourced commissions only; rank
        // bonuses carry no order and recur on the caller's cadence.
        let mut staged = HashSet::new();
        for c in &batch {
            self.member_ref(c.payee)?;
            if c.order.is_none() {
                continue;
            }
            let key = c.idempotency_key();
            if self.committed_keys.contains(&key) || !staged.insert(key) {
                return Err(Error::DuplicateCommission {
                    order: c.order,
                    payee: c.payee,
                });
            }
        }

        let mut committed = Vec::with_capacity(batch.len());
        for mut c in batch {
            c.id = CommissionId::new(self.next_commission);
            self.next_commission += 1;
            if c.order.is_some() {
                self.committed_keys.insert(c.idempotency_key());
            }
            if let Some(payee) = self.members.get_mut(&c.payee) {
                payee.total_commission += c.amount;
            }
            self.commission_order.push(c.id);
            self.commissions.insert(c.id, c.clone());
            committed.push(c);
        }
        Ok(committed)
    }
}
