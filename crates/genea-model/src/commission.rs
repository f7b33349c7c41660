//! Commission records.
//!
//! Commissions are created in batches by the commission engine, advance
//! through a one-way state machine (pending → approved → paid), and are
//! never deleted. Amount and percentage are immutable once created.

use crate::{CommissionId, MemberId, OrderId};
use serde::{Deserialize, Serialize};

/// What earned the commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionKind {
    /// Sponsor's cut of a direct recruit's sale (level 1).
    Direct,
    /// Decayed upline cut of a downline sale (level >= 2).
    Level,
    /// Flat monthly bonus attached to a rank (level 0, no order).
    RankBonus,
}

impl CommissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionKind::Direct => "direct",
            CommissionKind::Level => "level",
            CommissionKind::RankBonus => "rank_bonus",
        }
    }
}

impl std::fmt::Display for CommissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payout state. Only ever advances: Pending → Approved → Paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Pending,
    Approved,
    Paid,
}

impl CommissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Approved => "approved",
            CommissionStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single commission owed to a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,

    /// Who the commission is owed to.
    pub payee: MemberId,

    /// Source order. `None` only for rank bonuses.
    pub order: Option<OrderId>,

    /// Who generated the underlying sale (the purchasing member; for rank
    /// bonuses, the payee itself).
    pub originator: MemberId,

    pub kind: CommissionKind,

    /// Hop distance from the originator along the upline. 1 for direct,
    /// >= 2 for level commissions, 0 for rank bonuses.
    pub level: u32,

    /// Currency amount, non-negative. Immutable once created.
    pub amount: f64,

    /// Percentage that was applied to the commissionable value.
    pub percentage: f64,

    pub status: CommissionStatus,

    /// Unix seconds; set only on the transition to paid.
    pub paid_at: Option<u64>,

    /// Human-readable provenance, e.g. "level 3 commission from order #1042".
    pub note: String,

    /// Unix seconds.
    pub created_at: u64,
}

impl Commission {
    /// Uniqueness key for one order's batch: re-computing commissions for
    /// the same order must not commit a second record with this key.
    pub fn idempotency_key(&self) -> (Option<OrderId>, MemberId, CommissionKind, u32) {
        (self.order, self.payee, self.kind, self.level)
    }
}
