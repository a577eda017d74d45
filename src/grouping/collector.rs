use std::collections::HashMap;

use crate::grouping::dsu::DisjointSet;
use crate::grouping::store::RecordId;

/// Records sharing one disjoint-set root. Members are in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub members: Vec<RecordId>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Smallest member id, i.e. the member that appeared first in the input.
    pub fn first_member(&self) -> RecordId {
        self.members[0]
    }
}

/// Buckets all records by root and keeps buckets with more than one member.
///
/// Groups are ordered by descending size; equal sizes keep the order of their
/// first members, so the group whose earliest line came first wins the tie.
pub fn collect_groups(dsu: &mut DisjointSet) -> Vec<Group> {
    let n = dsu.len();
    let roots: Vec<RecordId> = (0..n as RecordId).map(|id| dsu.find(id)).collect();

    let mut sizes = vec![0u32; n];
    for &root in &roots {
        sizes[root as usize] += 1;
    }

    let mut slot_of_root: HashMap<RecordId, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for (id, &root) in roots.iter().enumerate() {
        let size = sizes[root as usize] as usize;
        if size < 2 {
            continue;
        }
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            groups.push(Group { members: Vec::with_capacity(size) });
            groups.len() - 1
        });
        groups[slot].members.push(id as RecordId);
    }

    // Slots were opened in first-member order; a stable sort keeps that for ties.
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    groups
}
