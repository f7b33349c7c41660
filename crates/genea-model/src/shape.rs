//! Tree shape policies.
//!
//! A member tree grows under exactly one shape policy. The shape decides
//! which position labels are legal under a sponsor and how a search for an
//! open slot proceeds when the sponsor's own slots are full.
//!
//! Position labels are strings meaningful only relative to (sponsor, shape):
//! `"left"`/`"right"` for binary, `"pos_1".."pos_N"` for the sequential
//! shapes.

use serde::{Deserialize, Serialize};

/// Binary left slot label.
pub const POSITION_LEFT: &str = "left";

/// Binary right slot label.
pub const POSITION_RIGHT: &str = "right";

/// The closed set of supported tree shapes.
///
/// Adding a shape means adding a variant here and teaching the placement
/// engine its `find`/`validate` pair; callers dispatch through the variant
/// and never see shape strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeShape {
    /// Two slots per sponsor ("left"/"right"), spillover into the subtree.
    Binary,
    /// Fixed-width slots per sponsor, spillover into children in creation
    /// order, bounded depth.
    Matrix,
    /// Unbounded sequential slots under each sponsor.
    Unilevel,
    /// Structurally identical to unilevel. The breakaway trigger itself is
    /// a compensation-plan concern outside the tree structure.
    Breakaway,
    /// Alias for the binary algorithm.
    Hybrid,
}

impl TreeShape {
    /// All shapes, in declaration order.
    pub const ALL: [TreeShape; 5] = [
        TreeShape::Binary,
        TreeShape::Matrix,
        TreeShape::Unilevel,
        TreeShape::Breakaway,
        TreeShape::Hybrid,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeShape::Binary => "binary",
            TreeShape::Matrix => "matrix",
            TreeShape::Unilevel => "unilevel",
            TreeShape::Breakaway => "breakaway",
            TreeShape::Hybrid => "hybrid",
        }
    }

    /// Parse a shape name. Returns `None` for unrecognized input; the
    /// engine surfaces that as its `UnknownTreeShape` error.
    pub fn parse(s: &str) -> Option<TreeShape> {
        match s {
            "binary" => Some(TreeShape::Binary),
            "matrix" => Some(TreeShape::Matrix),
            "unilevel" => Some(TreeShape::Unilevel),
            "breakaway" => Some(TreeShape::Breakaway),
            "hybrid" => Some(TreeShape::Hybrid),
            _ => None,
        }
    }
}

impl std::fmt::Display for TreeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for the n-th sequential slot (1-based): `pos_1`, `pos_2`, ...
///
/// Used by the matrix, unilevel, and breakaway shapes.
pub fn matrix_slot(n: usize) -> String {
    format!("pos_{n}")
}

/// Parse a sequential slot label back to its 1-based index.
///
/// Returns `None` unless the label is exactly `pos_N` with `N >= 1`.
pub fn parse_slot(label: &str) -> Option<u32> {
    let n: u32 = label.strip_prefix("pos_")?.parse().ok()?;
    if n >= 1 {
        Some(n)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for shape in TreeShape::ALL {
            assert_eq!(TreeShape::parse(shape.as_str()), Some(shape));
        }
        assert_eq!(TreeShape::parse("ternary"), None);
        assert_eq!(TreeShape::parse("Binary"), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&TreeShape::Breakaway).unwrap(),
            "\"breakaway\""
        );
        let back: TreeShape = serde_json::from_str("\"matrix\"").unwrap();
        assert_eq!(back, TreeShape::Matrix);
    }

    #[test]
    fn slot_labels() {
        assert_eq!(matrix_slot(1), "pos_1");
        assert_eq!(matrix_slot(12), "pos_12");
        assert_eq!(parse_slot("pos_3"), Some(3));
        assert_eq!(parse_slot("pos_0"), None);
        assert_eq!(parse_slot("pos_"), None);
        assert_eq!(parse_slot("left"), None);
        assert_eq!(parse_slot("pos_1x"), None);
    }
}
