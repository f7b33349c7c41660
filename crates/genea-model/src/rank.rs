//! Rank tiers and member packages.

use crate::{PackageId, RankId};
use serde::{Deserialize, Serialize};

/// A qualification tier.
///
/// Ranks are totally ordered by `level` (unique, ascending). Thresholds are
/// expected, but not required, to be non-decreasing in level; the evaluator
/// copes with non-monotonic tables by always taking the highest qualifying
/// level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rank {
    pub id: RankId,
    pub name: String,

    /// Ordinal; unique across the rank table.
    pub level: u32,

    // Eligibility thresholds. All four must hold simultaneously.
    pub min_personal_sales: f64,
    pub min_team_sales: f64,
    pub min_downlines: u64,
    pub min_active_downlines: u64,

    // Benefits.
    /// Rate add-on applied on top of commission rates (reference data; the
    /// engines carry it but the base plan does not consume it).
    pub commission_bonus: f64,
    /// Flat monthly bonus paid as a `RankBonus` commission.
    pub monthly_bonus: f64,
}

impl Rank {
    /// True iff the metrics satisfy all four thresholds.
    pub fn met_by(&self, m: &MemberMetrics) -> bool {
        m.personal_sales >= self.min_personal_sales
            && m.team_sales >= self.min_team_sales
            && m.downlines >= self.min_downlines
            && m.active_downlines >= self.min_active_downlines
    }
}

/// Aggregated metrics the rank evaluator judges a member by.
///
/// Sales figures come off the member record; downline counts come from the
/// roster (they are not stored on the member).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemberMetrics {
    pub personal_sales: f64,
    pub team_sales: f64,
    /// Direct sponsees.
    pub downlines: u64,
    /// Direct sponsees with active status.
    pub active_downlines: u64,
}

/// A purchasable package/plan.
///
/// A member's package, when present, overrides the configured direct
/// commission rate and the maximum commission depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub price: f64,

    /// Direct-referral rate override, percent.
    pub commission_rate: f64,

    /// Commission depth override.
    pub max_levels: u32,

    /// Open-ended feature blob; not interpreted by the core.
    #[serde(default)]
    pub features: serde_json::Value,

    pub active: bool,
}
