//! Roster-facing traversal helpers.
//!
//! All walks are iterative with an explicit visited-id set: the sponsor
//! graph is an acyclic forest by invariant, but that invariant can be
//! violated by upstream data corruption, and a corrupted chain must surface
//! as [`Error::CorruptTree`] rather than loop or overflow the stack.

use crate::{Error, Result};
use genea_model::{Member, MemberId, TreeNode};
use genea_roster::Roster;
use std::collections::{HashMap, HashSet};
use tracing::error;

/// Walk the sponsor chain upward from `member`, returning up to `max_hops`
/// ancestors, nearest first. Stops at a root.
///
/// The returned chain excludes the starting member: index 0 is the sponsor,
/// index 1 the sponsor's sponsor, and so on.
pub fn upline_chain<R: Roster>(
    roster: &R,
    member: MemberId,
    max_hops: u32,
) -> Result<Vec<Member>> {
    let mut current = roster.member(member)?;
    let mut visited = HashSet::from([member]);
    let mut chain = Vec::new();

    while (chain.len() as u32) < max_hops {
        let Some(sponsor_id) = current.sponsor else {
            break;
        };
        if !visited.insert(sponsor_id) {
            error!(member = %sponsor_id, "cycle in sponsor chain");
            return Err(Error::CorruptTree { member: sponsor_id });
        }
        let sponsor = roster.member(sponsor_id)?;
        chain.push(sponsor.clone());
        current = sponsor;
    }
    Ok(chain)
}

/// Level a new child of `sponsor` would be placed at: `sponsor.level + 1`.
pub fn child_level<R: Roster>(roster: &R, sponsor: MemberId) -> Result<u32> {
    let sponsor = roster
        .member(sponsor)
        .map_err(|_| Error::SponsorNotFound(sponsor))?;
    Ok(sponsor.level + 1)
}

/// Bounded-depth genealogy snapshot rooted at `member`.
///
/// `depth` counts generations below the root node: 0 returns the node
/// alone. Children appear in creation order. A repeated member id anywhere
/// in the walk is reported as a corrupt tree.
pub fn tree_snapshot<R: Roster>(roster: &R, member: MemberId, depth: u32) -> Result<TreeNode> {
    let root = roster.member(member)?;

    // Breadth-first collection, then bottom-up assembly; the snapshot is
    // built without recursion so a deep or corrupted genealogy cannot
    // exhaust the call stack.
    let mut nodes: HashMap<MemberId, TreeNode> = HashMap::new();
    let mut parents: HashMap<MemberId, MemberId> = HashMap::new();
    let mut order: Vec<MemberId> = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = std::collections::VecDeque::from([(root, 0u32)]);

    while let Some((m, d)) = queue.pop_front() {
        if !visited.insert(m.id) {
            error!(member = %m.id, "cycle in genealogy");
            return Err(Error::CorruptTree { member: m.id });
        }
        order.push(m.id);
        nodes.insert(m.id, leaf(&m));
        if d < depth {
            for child in roster.direct_children(m.id)? {
                parents.insert(child.id, m.id);
                queue.push_back((child, d + 1));
            }
        }
    }

    // Attach children to parents in reverse collection order so every node
    // is complete before it is attached.
    for id in order.iter().rev() {
        let Some(parent) = parents.get(id) else {
            continue;
        };
        if let Some(node) = nodes.remove(id) {
            if let Some(parent_node) = nodes.get_mut(parent) {
                parent_node.children.push(node);
            }
        }
    }
    // BFS enqueues siblings in creation order but reverse assembly flips
    // them; restore creation order throughout.
    let mut root_node = nodes.remove(&member).ok_or(Error::CorruptTree { member })?;
    reverse_children(&mut root_node);
    Ok(root_node)
}

fn leaf(m: &Member) -> TreeNode {
    TreeNode {
        member: m.id,
        name: m.name.clone(),
        position: m.position.clone(),
        level: m.level,
        status: m.status,
        personal_sales: m.personal_sales,
        team_sales: m.team_sales,
        children: Vec::new(),
    }
}

fn reverse_children(node: &mut TreeNode) {
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        n.children.reverse();
        stack.extend(n.children.iter_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genea_model::{MemberDraft, MemberStatus, TreeShape};
    use genea_roster::MemoryRoster;

    fn seed_chain(roster: &mut MemoryRoster, len: u32) -> Vec<MemberId> {
        let mut ids = Vec::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Unilevel))
            .unwrap();
        ids.push(root.id);
        for level in 1..len {
            let parent = *ids.last().unwrap();
            let m = roster
                .create_member(MemberDraft {
                    name: format!("m{level}"),
                    sponsor: Some(parent),
                    shape: TreeShape::Unilevel,
                    position: "pos_1".into(),
                    level,
                    status: MemberStatus::Active,
                    package: None,
                })
                .unwrap();
            ids.push(m.id);
        }
        ids
    }

    #[test]
    fn upline_is_nearest_first_and_bounded() {
        let mut roster = MemoryRoster::new();
        let ids = seed_chain(&mut roster, 5);
        let leaf = *ids.last().unwrap();

        let chain = upline_chain(&roster, leaf, 10).unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain[0].id, ids[3]);
        assert_eq!(chain[3].id, ids[0]);

        let bounded = upline_chain(&roster, leaf, 2).unwrap();
        assert_eq!(bounded.len(), 2);
        assert_eq!(bounded[1].id, ids[2]);
    }

    #[test]
    fn upline_of_root_is_empty() {
        let mut roster = MemoryRoster::new();
        let ids = seed_chain(&mut roster, 1);
        assert!(upline_chain(&roster, ids[0], 10).unwrap().is_empty());
    }

    #[test]
    fn sponsor_cycle_is_reported() {
        let mut roster = MemoryRoster::new();
        let ids = seed_chain(&mut roster, 3);

        // Corrupt the root to point at the leaf.
        let mut root = roster.member(ids[0]).unwrap();
        root.sponsor = Some(ids[2]);
        roster.update_member(&root).unwrap();

        let err = upline_chain(&roster, ids[2], 10).unwrap_err();
        assert!(matches!(err, Error::CorruptTree { .. }));
        assert!(err.is_structural());
    }

    #[test]
    fn child_level_is_sponsor_plus_one() {
        let mut roster = MemoryRoster::new();
        let ids = seed_chain(&mut roster, 3);
        assert_eq!(child_level(&roster, ids[0]).unwrap(), 1);
        assert_eq!(child_level(&roster, ids[2]).unwrap(), 3);
        assert!(matches!(
            child_level(&roster, MemberId::new(404)),
            Err(Error::SponsorNotFound(_))
        ));
    }

    #[test]
    fn snapshot_keeps_creation_order_and_depth() {
        let mut roster = MemoryRoster::new();
        let root = roster
            .create_member(MemberDraft::root("root", TreeShape::Matrix))
            .unwrap();
        let mut grandchild_parent = None;
        for n in 1..=3 {
            let child = roster
                .create_member(MemberDraft {
                    name: format!("c{n}"),
                    sponsor: Some(root.id),
                    shape: TreeShape::Matrix,
                    position: format!("pos_{n}"),
                    level: 1,
                    status: MemberStatus::Active,
                    package: None,
                })
                .unwrap();
            grandchild_parent.get_or_insert(child.id);
        }
        roster
            .create_member(MemberDraft {
                name: "g1".into(),
                sponsor: grandchild_parent,
                shape: TreeShape::Matrix,
                position: "pos_1".into(),
                level: 2,
                status: MemberStatus::Active,
                package: None,
            })
            .unwrap();

        let full = tree_snapshot(&roster, root.id, 5).unwrap();
        let positions: Vec<&str> = full.children.iter().map(|c| c.position.as_str()).collect();
        assert_eq!(positions, ["pos_1", "pos_2", "pos_3"]);
        assert_eq!(full.children[0].children.len(), 1);
        assert_eq!(full.children[0].children[0].name, "g1");

        let shallow = tree_snapshot(&roster, root.id, 1).unwrap();
        assert!(shallow.children[0].children.is_empty());

        let alone = tree_snapshot(&roster, root.id, 0).unwrap();
        assert!(alone.children.is_empty());
    }
}
