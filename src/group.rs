//! Connected groups of stones and the map that owns them.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use crate::color::Color;
use crate::coord::Point;
use crate::field_indices::FieldSet;

/// Identifier of a group on one board. Zero means "no group" and is never
/// handed out; identifiers increase monotonically and are never reused.
pub type GroupId = u32;

/// Marker stored for fields that don't belong to any group.
pub const NO_GROUP: GroupId = 0;

/// A maximal connected set of same-coloured stones.
#[derive(Clone, Debug)]
pub struct Group {
    pub color: Color,
    pub stones: FieldSet,
    pub liberties: FieldSet,
}

impl Group {
    /// A single stone at `p` with the given liberties.
    pub fn singleton(color: Color, p: Point, liberties: FieldSet) -> Self {
        let mut stones = FieldSet::new();
        stones.insert(p);
        Self {
            color,
            stones,
            liberties,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.stones.len()
    }

    /// True if the group has exactly one liberty left.
    #[inline]
    pub fn in_atari(&self) -> bool {
        self.liberties.len() == 1
    }
}

/// Groups on a board, keyed by [`GroupId`].
#[derive(Clone, Debug)]
pub struct GroupMap {
    groups: HashMap<GroupId, Group>,
    next_id: GroupId,
}

impl Default for GroupMap {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupMap {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            next_id: NO_GROUP + 1,
        }
    }

    /// Store `group` under a fresh id and return the id.
    pub fn insert(&mut self, group: Group) -> GroupId {
        let id = self.next_id;
        self.next_id += 1;
        self.groups.insert(id, group);
        id
    }

    pub fn remove(&mut self, id: GroupId) -> Option<Group> {
        self.groups.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }
}

impl Index<GroupId> for GroupMap {
    type Output = Group;

    /// # Panics
    /// Panics if `id` is not a live group; that means the board is corrupt.
    fn index(&self, id: GroupId) -> &Group {
        &self.groups[&id]
    }
}

impl IndexMut<GroupId> for GroupMap {
    fn index_mut(&mut self, id: GroupId) -> &mut Group {
        self.groups.get_mut(&id).unwrap_or_else(|| panic!("no group with id {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_never_reused() {
        let mut map = GroupMap::new();
        let a = map.insert(Group::singleton(Color::Black, 0, FieldSet::new()));
        let b = map.insert(Group::singleton(Color::White, 1, FieldSet::new()));
        assert_ne!(a, NO_GROUP);
        assert!(b > a);

        map.remove(b);
        let c = map.insert(Group::singleton(Color::White, 1, FieldSet::new()));
        assert!(c > b);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_singleton() {
        let libs: FieldSet = [1, 3].into_iter().collect();
        let g = Group::singleton(Color::Black, 0, libs);
        assert_eq!(g.size(), 1);
        assert!(g.stones.contains(0));
        assert!(!g.in_atari());
    }
}
