//! Error types for engine operations.
//!
//! Four families, per the error-handling design:
//! - not-found: surfaced verbatim, never retried
//! - conflict: caller picks another slot or relies on spillover
//! - invalid state: rejected operation, not auto-corrected
//! - structural: a data-integrity breach, logged at error severity and
//!   surfaced distinctly from ordinary request errors

use genea_model::{MemberId, RankId, TreeShape};
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The sponsor id given to a placement does not resolve.
    #[error("sponsor {0} not found")]
    SponsorNotFound(MemberId),

    /// A shape name that is not one of the closed shape set.
    #[error("unknown tree shape: {0:?}")]
    UnknownTreeShape(String),

    /// The position label is not legal for the shape.
    #[error("invalid position {position:?} for {shape} tree")]
    InvalidPosition { shape: TreeShape, position: String },

    /// The binary slot under this sponsor is already taken.
    #[error("position {position:?} under sponsor {sponsor} is already occupied")]
    PositionOccupied { sponsor: MemberId, position: String },

    /// A bounded slot search exhausted the tree (matrix only).
    #[error("no available position in {0} tree within the configured depth")]
    NoAvailablePosition(TreeShape),

    /// A traversal visited the same member twice: the acyclic sponsor-chain
    /// invariant has been violated upstream.
    #[error("corrupt tree: member {member} encountered twice during traversal")]
    CorruptTree { member: MemberId },

    /// A commission state transition from the wrong state.
    #[error("invalid commission state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: String,
    },

    /// The member does not satisfy the rank's thresholds at apply time.
    #[error("member {member} is not eligible for rank {rank}")]
    NotEligible { member: MemberId, rank: RankId },

    /// Roster collaborator error (not-found, duplicate key, ...).
    #[error(transparent)]
    Roster(#[from] genea_roster::Error),
}

impl Error {
    /// True for invariant breaches that indicate corrupted data rather than
    /// a bad request.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::UnknownTreeShape(_) | Error::CorruptTree { .. })
    }
}
