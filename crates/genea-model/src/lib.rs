//! Genea domain model.
//!
//! Shared types for the referral organization core: members linked by
//! sponsorship into bounded-shape trees, commissions paid along the upline,
//! and rank tiers unlocked by accumulated metrics.
//!
//! This crate is pure data. The placement, commission, and rank algorithms
//! live in `genea-engine`; storage capabilities live in `genea-roster`.

mod commission;
mod id;
mod member;
mod order;
mod rank;
mod shape;

pub use commission::{Commission, CommissionKind, CommissionStatus};
pub use id::{CommissionId, MemberId, OrderId, PackageId, RankId};
pub use member::{Member, MemberDraft, MemberStatus, TreeNode};
pub use order::{Order, OrderItem};
pub use rank::{MemberMetrics, Package, Rank};
pub use shape::{matrix_slot, parse_slot, TreeShape, POSITION_LEFT, POSITION_RIGHT};

/// Current unix time in seconds.
///
/// All model timestamps are unix seconds; this is the single clock source.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
