//! Commission computation and lifecycle.
//!
//! `compute_*` operations are pure: they read the roster and return the
//! records that would be owed, without persisting anything. `settle_*`
//! operations commit a computed batch through the roster's atomic
//! `commit_commissions`, which also increments each payee's running total
//! and enforces the per-order idempotency key.

use crate::{upline_chain, EngineConfig, Error, Result};
use genea_model::{
    unix_now, Commission, CommissionId, CommissionKind, CommissionStatus, Member, MemberId, Order,
    Package,
};
use genea_roster::Roster;
use tracing::debug;

/// Computes and settles commissions for orders and rank bonuses.
pub struct CommissionEngine {
    cfg: EngineConfig,
}

impl CommissionEngine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }

    /// Compute the full set of commissions owed for a completed order.
    ///
    /// One `Direct` commission to the purchasing member's sponsor at level 1
    /// (sponsor's package rate, or the configured default), then `Level`
    /// commissions along the upline starting at the sponsor's sponsor with
    /// the level index starting at 2. The walk is bounded by the purchasing
    /// member's package depth override or the configured maximum.
    ///
    /// An inactive upline member receives nothing but still consumes its
    /// level index: ancestors further up keep the level their chain position
    /// dictates, so a lapsed member never inflates payouts above it.
    pub fn compute_order_commissions<R: Roster>(
        &self,
        roster: &R,
        order: &Order,
    ) -> Result<Vec<Commission>> {
        let buyer = roster.member(order.member)?;
        let value = order.commissionable_value();
        let mut batch = Vec::new();

        if let Some(sponsor_id) = buyer.sponsor {
            let sponsor = roster.member(sponsor_id)?;
            let rate = match self.package_of(roster, &sponsor)? {
                Some(package) => package.commission_rate,
                None => self.cfg.direct_referral_rate,
            };
            batch.push(Commission {
                id: CommissionId::new(0),
                payee: sponsor.id,
                order: Some(order.id),
                originator: buyer.id,
                kind: CommissionKind::Direct,
                level: 1,
                amount: value * rate / 100.0,
                percentage: rate,
                status: CommissionStatus::Pending,
                paid_at: None,
                note: format!("direct referral commission from order #{}", order.number),
                created_at: unix_now(),
            });
        }

        let max_levels = match self.package_of(roster, &buyer)? {
            Some(package) => package.max_levels,
            None => self.cfg.max_commission_levels,
        };
        let chain = upline_chain(roster, buyer.id, max_levels)?;
        // chain[0] is the sponsor, already paid at level 1 above; the level
        // walk starts at the sponsor's sponsor with level index 2.
        for (idx, ancestor) in chain.iter().enumerate().skip(1) {
            let level = idx as u32 + 1;
            if !ancestor.status.is_active() {
                continue;
            }
            let percentage = self.cfg.level_rate / f64::from(level);
            batch.push(Commission {
                id: CommissionId::new(0),
                payee: ancestor.id,
                order: Some(order.id),
                originator: buyer.id,
                kind: CommissionKind::Level,
                level,
                amount: value * percentage / 100.0,
                percentage,
                status: CommissionStatus::Pending,
                paid_at: None,
                note: format!("level {} commission from order #{}", level, order.number),
                created_at: unix_now(),
            });
        }

        debug!(
            order = %order.id,
            buyer = %buyer.id,
            value,
            count = batch.len(),
            "order commissions computed"
        );
        Ok(batch)
    }

    /// Compute and atomically commit the commissions for an order.
    ///
    /// Either every record plus every payee total lands, or nothing does;
    /// re-settling the same order is rejected by the idempotency key.
    pub fn settle_order<R: Roster>(&self, roster: &mut R, order: &Order) -> Result<Vec<Commission>> {
        let batch = self.compute_order_commissions(roster, order)?;
        Ok(roster.commit_commissions(batch)?)
    }

    /// The member's monthly rank bonus, if it holds a rank with a positive
    /// bonus. Cadence is the caller's concern; this performs no scheduling.
    pub fn compute_rank_bonus<R: Roster>(
        &self,
        roster: &R,
        member: MemberId,
    ) -> Result<Option<Commission>> {
        let member = roster.member(member)?;
        let Some(rank_id) = member.rank else {
            return Ok(None);
        };
        let rank = roster.rank(rank_id)?;
        if rank.monthly_bonus <= 0.0 {
            return Ok(None);
        }
        Ok(Some(Commission {
            id: CommissionId::new(0),
            payee: member.id,
            order: None,
            originator: member.id,
            kind: CommissionKind::RankBonus,
            level: 0,
            amount: rank.monthly_bonus,
            percentage: 0.0,
            status: CommissionStatus::Pending,
            paid_at: None,
            note: format!("monthly bonus for {} rank", rank.name),
            created_at: unix_now(),
        }))
    }

    /// Compute and commit the member's rank bonus, if any.
    pub fn settle_rank_bonus<R: Roster>(
        &self,
        roster: &mut R,
        member: MemberId,
    ) -> Result<Option<Commission>> {
        match self.compute_rank_bonus(roster, member)? {
            Some(bonus) => {
                let committed = roster.commit_commissions(vec![bonus])?;
                Ok(committed.into_iter().next())
            }
            None => Ok(None),
        }
    }

    /// Advance a pending commission to approved.
    pub fn approve<R: Roster>(&self, roster: &mut R, id: CommissionId) -> Result<Commission> {
        let mut commission = roster.commission(id)?;
        if commission.status != CommissionStatus::Pending {
            return Err(Error::InvalidState {
                expected: "pending",
                actual: commission.status.to_string(),
            });
        }
        commission.status = CommissionStatus::Approved;
        roster.update_commission(&commission)?;
        Ok(commission)
    }

    /// Advance an approved commission to paid, stamping the payout time.
    pub fn pay<R: Roster>(&self, roster: &mut R, id: CommissionId) -> Result<Commission> {
        let mut commission = roster.commission(id)?;
        if commission.status != CommissionStatus::Approved {
            return Err(Error::InvalidState {
                expected: "approved",
                actual: commission.status.to_string(),
            });
        }
        commission.status = CommissionStatus::Paid;
        commission.paid_at = Some(unix_now());
        roster.update_commission(&commission)?;
        Ok(commission)
    }

    /// All commissions payable to a member, in creation order.
    pub fn member_commissions<R: Roster>(
        &self,
        roster: &R,
        member: MemberId,
    ) -> Result<Vec<Commission>> {
        Ok(roster.commissions_for(member)?)
    }

    fn package_of<R: Roster>(
        &self,
        roster: &R,
        member: &Member,
    ) -> Result<Option<Package>> {
        match member.package {
            Some(id) => Ok(Some(roster.package(id)?)),
            None => Ok(None),
        }
    }
}
