//! Rank eligibility evaluation.
//!
//! A member qualifies for a rank only when all four thresholds hold at
//! once. Evaluation returns the highest qualifying rank above the current
//! one; applying a rank re-validates at apply time so a stale eligibility
//! result can never promote. Downgrade is never automatic.

use crate::{Error, Result};
use genea_model::{MemberId, MemberMetrics, Rank, RankId};
use genea_roster::Roster;
use tracing::debug;

/// Judges members against the rank table.
#[derive(Debug, Default)]
pub struct RankEvaluator;

impl RankEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate the metrics a rank decision is made from: sales off the
    /// member record, downline counts from the roster.
    pub fn metrics<R: Roster>(&self, roster: &R, member: MemberId) -> Result<MemberMetrics> {
        let record = roster.member(member)?;
        Ok(MemberMetrics {
            personal_sales: record.personal_sales,
            team_sales: record.team_sales,
            downlines: roster.count_downlines(member)?,
            active_downlines: roster.count_active_downlines(member)?,
        })
    }

    /// The highest rank above the member's current one whose four
    /// thresholds are all satisfied, or `None`.
    ///
    /// The scan runs in ascending level order and keeps the last qualifying
    /// rank, so intermediate ranks may be skipped outright when a
    /// non-monotonic threshold table permits it.
    pub fn evaluate_eligibility<R: Roster>(
        &self,
        roster: &R,
        member: MemberId,
    ) -> Result<Option<Rank>> {
        let record = roster.member(member)?;
        let current_level = match record.rank {
            Some(rank_id) => roster.rank(rank_id)?.level,
            None => 0,
        };
        let metrics = self.metrics(roster, member)?;

        let mut eligible = None;
        for rank in roster.ranks_by_level()? {
            if rank.level <= current_level {
                continue;
            }
            if rank.met_by(&metrics) {
                eligible = Some(rank);
            }
        }
        Ok(eligible)
    }

    /// Set the member's rank after re-validating eligibility for exactly
    /// that rank. The roster records the achievement.
    pub fn update_rank<R: Roster>(
        &self,
        roster: &mut R,
        member: MemberId,
        rank_id: RankId,
    ) -> Result<()> {
        let rank = roster.rank(rank_id)?;
        let metrics = self.metrics(roster, member)?;
        if !rank.met_by(&metrics) {
            debug!(member = %member, rank = %rank_id, "rank update rejected");
            return Err(Error::NotEligible { member, rank: rank_id });
        }
        roster.set_rank(member, rank_id)?;
        Ok(())
    }
}
