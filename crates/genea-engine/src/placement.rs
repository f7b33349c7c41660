//! Slot placement under a shape policy.
//!
//! Finding a slot is a pure query over the roster: nothing is persisted
//! here. The caller commits the member draft against the returned placement
//! inside whatever transaction serializes the sponsor's subtree.
//!
//! Spillover searches are iterative (explicit stack) with a visited-id set.
//! A healthy tree never revisits a member; a revisit means the acyclic
//! invariant was violated upstream and surfaces as `CorruptTree`.

use crate::{child_level, EngineConfig, Error, Result};
use genea_model::{
    matrix_slot, parse_slot, Member, MemberId, TreeShape, POSITION_LEFT, POSITION_RIGHT,
};
use genea_roster::Roster;
use std::collections::HashSet;
use tracing::{debug, error};

/// A resolved slot for a new member.
///
/// `parent` is the member that actually holds the slot. It equals the
/// requested sponsor unless spillover descended into the subtree, and it is
/// what keeps `level == parent.level + 1` true for spillover placements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub parent: MemberId,
    pub position: String,
    pub level: u32,
    pub shape: TreeShape,
}

/// Parse a raw shape name, surfacing the closed-set violation as a
/// structural error.
pub fn parse_shape(name: &str) -> Result<TreeShape> {
    TreeShape::parse(name).ok_or_else(|| {
        error!(shape = name, "unknown tree shape");
        Error::UnknownTreeShape(name.to_string())
    })
}

/// Finds and validates tree slots under a shape policy.
pub struct PlacementEngine {
    cfg: EngineConfig,
}

impl PlacementEngine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }

    /// Find the next open slot under `sponsor`.
    ///
    /// Binary (and hybrid, its documented alias): the sponsor's own
    /// left/right first, then depth-first spillover through the left leg
    /// before the right. Matrix: `pos_1..pos_W` among direct children, then
    /// depth-first through children in creation order, bounded by the
    /// configured matrix depth. Unilevel/breakaway: the next sequential
    /// label under the sponsor itself.
    pub fn find_available_position<R: Roster>(
        &self,
        roster: &R,
        sponsor: MemberId,
        shape: TreeShape,
    ) -> Result<Placement> {
        self.sponsor_record(roster, sponsor)?;
        let placement = match shape {
            TreeShape::Binary | TreeShape::Hybrid => self.find_binary(roster, sponsor, shape),
            TreeShape::Matrix => self.find_matrix(roster, sponsor, shape),
            TreeShape::Unilevel | TreeShape::Breakaway => {
                self.find_sequential(roster, sponsor, shape)
            }
        }?;
        debug!(
            sponsor = %sponsor,
            parent = %placement.parent,
            position = %placement.position,
            level = placement.level,
            shape = %shape,
            "placement found"
        );
        Ok(placement)
    }

    /// Validate a caller-chosen `position` under `sponsor`.
    ///
    /// Binary/hybrid reject malformed labels and occupied slots. Matrix
    /// checks the `pos_1..=pos_W` range; unilevel/breakaway check only the
    /// label format. Occupancy conflicts for the sequential shapes are
    /// deliberately not rejected here (permissive, as the plan has always
    /// behaved).
    pub fn validate_position<R: Roster>(
        &self,
        roster: &R,
        sponsor: MemberId,
        shape: TreeShape,
        position: &str,
    ) -> Result<()> {
        self.sponsor_record(roster, sponsor)?;
        match shape {
            TreeShape::Binary | TreeShape::Hybrid => {
                if position != POSITION_LEFT && position != POSITION_RIGHT {
                    return Err(Error::InvalidPosition {
                        shape,
                        position: position.to_string(),
                    });
                }
                if roster.child_at(sponsor, shape, position)?.is_some() {
                    return Err(Error::PositionOccupied {
                        sponsor,
                        position: position.to_string(),
                    });
                }
                Ok(())
            }
            TreeShape::Matrix => match parse_slot(position) {
                Some(n) if n <= self.cfg.matrix_width => Ok(()),
                _ => Err(Error::InvalidPosition {
                    shape,
                    position: position.to_string(),
                }),
            },
            TreeShape::Unilevel | TreeShape::Breakaway => {
                if parse_slot(position).is_some() {
                    Ok(())
                } else {
                    Err(Error::InvalidPosition {
                        shape,
                        position: position.to_string(),
                    })
                }
            }
        }
    }

    /// Resolve a slot for a registration: a desired position validates in
    /// place under the sponsor, an absent one runs the slot search.
    pub fn place_member<R: Roster>(
        &self,
        roster: &R,
        sponsor: MemberId,
        shape: TreeShape,
        desired_position: Option<&str>,
    ) -> Result<Placement> {
        match desired_position {
            Some(position) => {
                self.validate_position(roster, sponsor, shape, position)?;
                Ok(Placement {
                    parent: sponsor,
                    position: position.to_string(),
                    level: child_level(roster, sponsor)?,
                    shape,
                })
            }
            None => self.find_available_position(roster, sponsor, shape),
        }
    }

    fn find_binary<R: Roster>(
        &self,
        roster: &R,
        sponsor: MemberId,
        shape: TreeShape,
    ) -> Result<Placement> {
        let mut stack = vec![sponsor];
        let mut visited = HashSet::new();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                error!(member = %id, "cycle during binary spillover search");
                return Err(Error::CorruptTree { member: id });
            }
            let left = roster.child_at(id, shape, POSITION_LEFT)?;
            let Some(left) = left else {
                return self.slot(roster, id, POSITION_LEFT.to_string(), shape);
            };
            let right = roster.child_at(id, shape, POSITION_RIGHT)?;
            let Some(right) = right else {
                return self.slot(roster, id, POSITION_RIGHT.to_string(), shape);
            };
            // Left leg is explored exhaustively before the right leg.
            stack.push(right.id);
            stack.push(left.id);
        }
        // Unreachable on a healthy tree: a finite acyclic binary tree always
        // has an open slot, and a full cyclic one trips the visited set.
        Err(Error::NoAvailablePosition(shape))
    }

    fn find_matrix<R: Roster>(
        &self,
        roster: &R,
        sponsor: MemberId,
        shape: TreeShape,
    ) -> Result<Placement> {
        let width = self.cfg.matrix_width as usize;
        let mut stack = vec![(sponsor, 0u32)];
        let mut visited = HashSet::new();

        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                error!(member = %id, "cycle during matrix spillover search");
                return Err(Error::CorruptTree { member: id });
            }
            if depth >= self.cfg.matrix_depth {
                continue;
            }
            let children = roster.direct_children(id)?;
            if children.len() < width {
                return self.slot(roster, id, matrix_slot(children.len() + 1), shape);
            }
            // First child in creation order is searched first.
            for child in children.iter().rev() {
                stack.push((child.id, depth + 1));
            }
        }
        debug!(sponsor = %sponsor, depth = self.cfg.matrix_depth, "matrix search exhausted");
        Err(Error::NoAvailablePosition(shape))
    }

    fn find_sequential<R: Roster>(
        &self,
        roster: &R,
        sponsor: MemberId,
        shape: TreeShape,
    ) -> Result<Placement> {
        let children = roster.direct_children(sponsor)?;
        self.slot(roster, sponsor, matrix_slot(children.len() + 1), shape)
    }

    fn slot<R: Roster>(
        &self,
        roster: &R,
        parent: MemberId,
        position: String,
        shape: TreeShape,
    ) -> Result<Placement> {
        Ok(Placement {
            parent,
            position,
            level: child_level(roster, parent)?,
            shape,
        })
    }

    fn sponsor_record<R: Roster>(&self, roster: &R, sponsor: MemberId) -> Result<Member> {
        roster
            .member(sponsor)
            .map_err(|_| Error::SponsorNotFound(sponsor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genea_model::{MemberDraft, MemberStatus};
    use genea_roster::MemoryRoster;

    fn engine() -> PlacementEngine {
        PlacementEngine::new(EngineConfig::default())
    }

    /// Run the search and commit the member the way a registration caller
    /// would, so successive placements see each other.
    fn grow<R: Roster>(
        engine: &PlacementEngine,
        roster: &mut R,
        sponsor: MemberId,
        shape: TreeShape,
    ) -> (MemberId, Placement) {
        let placement = engine.find_available_position(roster, sponsor, shape).unwrap();
        let member = roster
            .create_member(MemberDraft {
                name: String::new(),
                sponsor: Some(placement.parent),
                shape,
                position: placement.position.clone(),
                level: placement.level,
                status: MemberStatus::Active,
                package: None,
            })
            .unwrap();
        (member.id, placement)
    }

    #[test]
    fn binary_fills_left_then_right() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Binary))
            .unwrap();
        let engine = engine();

        let (_, first) = grow(&engine, &mut roster, root.id, TreeShape::Binary);
        assert_eq!((first.parent, first.position.as_str(), first.level), (root.id, "left", 1));

        let (_, second) = grow(&engine, &mut roster, root.id, TreeShape::Binary);
        assert_eq!((second.parent, second.position.as_str()), (root.id, "right"));
    }

    #[test]
    fn binary_spillover_lands_in_subtree() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Binary))
            .unwrap();
        let engine = engine();

        let (b, _) = grow(&engine, &mut roster, root.id, TreeShape::Binary);
        let (c, _) = grow(&engine, &mut roster, root.id, TreeShape::Binary);

        // Fourth member spills into B's subtree, never a third child of root.
        let (_, spill) = grow(&engine, &mut roster, root.id, TreeShape::Binary);
        assert_eq!(spill.parent, b);
        assert_eq!(spill.position, "left");
        assert_eq!(spill.level, 2);

        // Left leg fills completely before the right leg is touched.
        let (_, next) = grow(&engine, &mut roster, root.id, TreeShape::Binary);
        assert_eq!(next.parent, b);
        assert_eq!(next.position, "right");
        let (_, after) = grow(&engine, &mut roster, root.id, TreeShape::Binary);
        assert_ne!(after.parent, c, "left leg's grandchildren come before c");
    }

    #[test]
    fn hybrid_is_binary_alias() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Hybrid))
            .unwrap();
        let engine = engine();

        let (_, first) = grow(&engine, &mut roster, root.id, TreeShape::Hybrid);
        assert_eq!(first.position, "left");
        let (_, second) = grow(&engine, &mut roster, root.id, TreeShape::Hybrid);
        assert_eq!(second.position, "right");
        let (_, third) = grow(&engine, &mut roster, root.id, TreeShape::Hybrid);
        assert_eq!(third.level, 2);
    }

    #[test]
    fn matrix_fills_width_then_first_child() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Matrix))
            .unwrap();
        let engine = engine();

        let mut firstborn = None;
        for n in 1..=3 {
            let (id, p) = grow(&engine, &mut roster, root.id, TreeShape::Matrix);
            assert_eq!((p.parent, p.position), (root.id, format!("pos_{n}")));
            firstborn.get_or_insert(id);
        }

        let (_, spill) = grow(&engine, &mut roster, root.id, TreeShape::Matrix);
        assert_eq!(spill.parent, firstborn.unwrap());
        assert_eq!(spill.position, "pos_1");
        assert_eq!(spill.level, 2);
    }

    #[test]
    fn matrix_depth_bound_exhausts() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Matrix))
            .unwrap();
        let engine = PlacementEngine::new(EngineConfig {
            matrix_width: 1,
            matrix_depth: 2,
            ..EngineConfig::default()
        });

        // Width 1, depth 2: the two slots below root fill, then nothing.
        grow(&engine, &mut roster, root.id, TreeShape::Matrix);
        grow(&engine, &mut roster, root.id, TreeShape::Matrix);
        let err = engine
            .find_available_position(&roster, root.id, TreeShape::Matrix)
            .unwrap_err();
        assert!(matches!(err, Error::NoAvailablePosition(TreeShape::Matrix)));
    }

    #[test]
    fn sequential_shapes_never_spill() {
        for shape in [TreeShape::Unilevel, TreeShape::Breakaway] {
            let mut roster = MemoryRoster::new();
            let root = roster.create_member(MemberDraft::root("root", shape)).unwrap();
            let engine = engine();
            for n in 1..=5 {
                let (_, p) = grow(&engine, &mut roster, root.id, shape);
                assert_eq!((p.parent, p.position, p.level), (root.id, format!("pos_{n}"), 1));
            }
        }
    }

    #[test]
    fn unknown_sponsor_rejected() {
        let roster = MemoryRoster::new();
        let err = engine()
            .find_available_position(&roster, MemberId::new(7), TreeShape::Binary)
            .unwrap_err();
        assert!(matches!(err, Error::SponsorNotFound(_)));
    }

    #[test]
    fn shape_names_parse_or_fail_structurally() {
        assert_eq!(parse_shape("matrix").unwrap(), TreeShape::Matrix);
        let err = parse_shape("pyramid").unwrap_err();
        assert!(matches!(err, Error::UnknownTreeShape(_)));
        assert!(err.is_structural());
    }

    #[test]
    fn binary_validation_rejects_bad_and_taken_slots() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Binary))
            .unwrap();
        let engine = engine();
        grow(&engine, &mut roster, root.id, TreeShape::Binary);

        assert!(matches!(
            engine.validate_position(&roster, root.id, TreeShape::Binary, "center"),
            Err(Error::InvalidPosition { .. })
        ));
        assert!(matches!(
            engine.validate_position(&roster, root.id, TreeShape::Binary, "left"),
            Err(Error::PositionOccupied { .. })
        ));
        engine
            .validate_position(&roster, root.id, TreeShape::Binary, "right")
            .unwrap();
    }

    #[test]
    fn matrix_validation_checks_range_not_occupancy() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Matrix))
            .unwrap();
        let engine = engine();
        grow(&engine, &mut roster, root.id, TreeShape::Matrix);

        // pos_1 is taken but matrix validation is occupancy-permissive.
        engine
            .validate_position(&roster, root.id, TreeShape::Matrix, "pos_1")
            .unwrap();
        assert!(matches!(
            engine.validate_position(&roster, root.id, TreeShape::Matrix, "pos_4"),
            Err(Error::InvalidPosition { .. })
        ));
        assert!(matches!(
            engine.validate_position(&roster, root.id, TreeShape::Matrix, "left"),
            Err(Error::InvalidPosition { .. })
        ));
    }

    #[test]
    fn sequential_validation_checks_format_only() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Unilevel))
            .unwrap();
        let engine = engine();

        engine
            .validate_position(&roster, root.id, TreeShape::Unilevel, "pos_99")
            .unwrap();
        assert!(matches!(
            engine.validate_position(&roster, root.id, TreeShape::Breakaway, "slot-1"),
            Err(Error::InvalidPosition { .. })
        ));
    }

    #[test]
    fn place_member_honors_desired_position() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Binary))
            .unwrap();
        let engine = engine();

        let placed = engine
            .place_member(&roster, root.id, TreeShape::Binary, Some("right"))
            .unwrap();
        assert_eq!((placed.parent, placed.position.as_str(), placed.level), (root.id, "right", 1));

        let searched = engine
            .place_member(&roster, root.id, TreeShape::Binary, None)
            .unwrap();
        assert_eq!(searched.position, "left");
    }

    #[test]
    fn corrupt_binary_tree_detected() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Binary))
            .unwrap();
        let engine = engine();
        let (x, _) = grow(&engine, &mut roster, root.id, TreeShape::Binary);
        grow(&engine, &mut roster, root.id, TreeShape::Binary);

        // Fill x's right slot, then re-link the root as x's left child so
        // the left leg loops back onto its own ancestor.
        roster
            .create_member(MemberDraft {
                name: "z".into(),
                sponsor: Some(x),
                shape: TreeShape::Binary,
                position: "right".into(),
                level: 2,
                status: MemberStatus::Active,
                package: None,
            })
            .unwrap();
        roster.relink(root.id, x, "left").unwrap();

        let err = engine
            .find_available_position(&roster, root.id, TreeShape::Binary)
            .unwrap_err();
        assert!(matches!(err, Error::CorruptTree { .. }));
        assert!(err.is_structural());
    }

    #[test]
    fn corrupt_matrix_tree_detected() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Matrix))
            .unwrap();
        let engine = PlacementEngine::new(EngineConfig {
            matrix_width: 1,
            matrix_depth: 50,
            ..EngineConfig::default()
        });
        let (child, _) = grow(&engine, &mut roster, root.id, TreeShape::Matrix);

        // Re-link the root under its own child: both nodes are now full and
        // the search would ping-pong forever without the visited set.
        roster.relink(root.id, child, "pos_1").unwrap();

        let err = engine
            .find_available_position(&roster, root.id, TreeShape::Matrix)
            .unwrap_err();
        assert!(matches!(err, Error::CorruptTree { .. }));
    }
}
