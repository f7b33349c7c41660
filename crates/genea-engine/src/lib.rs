//! Genea placement/compensation engines.
//!
//! The core of the referral organization: given a sponsor and a shape
//! policy, find or validate a slot for a new member (with cycle-guarded
//! spillover search); given a completed order, produce the commission set
//! owed along the upline with level-dependent decay and active-status
//! filtering; given a member's aggregated metrics, decide the highest rank
//! it newly qualifies for.
//!
//! # Shape policies
//!
//! Placement dispatches over the closed [`genea_model::TreeShape`] set:
//!
//! - **binary**: two slots (`left`/`right`), spillover depth-first through
//!   the left leg first
//! - **matrix**: `pos_1..pos_W` per sponsor, spillover into children in
//!   creation order, bounded depth
//! - **unilevel** / **breakaway**: unbounded sequential slots (breakaway
//!   is structurally identical at this layer)
//! - **hybrid**: alias for the binary algorithm
//!
//! # Collaborators
//!
//! Every engine reads and writes through the [`genea_roster::Roster`]
//! capability trait. The engines perform no locking and no retries: callers
//! serialize placement-through-commit per sponsor subtree, and commission
//! settlement relies on the roster's atomic batch commit.

mod commission;
mod config;
mod error;
mod placement;
mod rank;
mod traversal;

pub use commission::CommissionEngine;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use placement::{parse_shape, Placement, PlacementEngine};
pub use rank::RankEvaluator;
pub use traversal::{child_level, tree_snapshot, upline_chain};
