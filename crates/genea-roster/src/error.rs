//! Error types for roster operations.

use genea_model::{CommissionId, MemberId, OrderId, PackageId, RankId};
use thiserror::Error;

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a roster implementation can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// No member with this id.
    #[error("member {0} not found")]
    MemberNotFound(MemberId),

    /// No rank with this id.
    #[error("rank {0} not found")]
    RankNotFound(RankId),

    /// No package with this id.
    #[error("package {0} not found")]
    PackageNotFound(PackageId),

    /// No commission with this id.
    #[error("commission {0} not found")]
    CommissionNotFound(CommissionId),

    /// A batch contained a commission whose (order, payee, kind, level) key
    /// was already committed. The whole batch is rejected.
    #[error("duplicate commission for order {order:?}, payee {payee}")]
    DuplicateCommission {
        order: Option<OrderId>,
        payee: MemberId,
    },

    /// Rank table already holds a rank at this ordinal level.
    #[error("duplicate rank level {0}")]
    DuplicateRankLevel(u32),
}
