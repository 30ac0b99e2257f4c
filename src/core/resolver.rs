//! NB-003: Reference resolution by name.
//!
//! Resources refer to each other by name. A `NameIndex` maps each name in a
//! collection to its position once, so lookups are O(1) and a miss is an
//! explicit `None` ("not declared" / "newly introduced"). `GroupSlots` does the
//! same for counted kinds, where one authored entry expands into several
//! consecutive items.

use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::Range;

/// Anything addressable by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Name → position index over a borrowed collection. First occurrence wins.
#[derive(Debug)]
pub struct NameIndex<'a, T> {
    items: &'a [T],
    positions: FxHashMap<&'a str, usize>,
}

impl<'a, T: Named> NameIndex<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        let mut positions = FxHashMap::default();
        for (i, item) in items.iter().enumerate() {
            positions.entry(item.name()).or_insert(i);
        }
        Self { items, positions }
    }

    /// Position of `name` in the collection.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Item named `name`.
    pub fn get(&self, name: &str) -> Option<&'a T> {
        self.position(name).map(|i| &self.items[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Linear lookup for one-off queries.
pub fn find<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}

/// First name that appears more than once.
pub fn first_duplicate<T: Named>(items: &[T]) -> Option<&str> {
    let mut seen = FxHashSet::default();
    for item in items {
        if !seen.insert(item.name()) {
            return Some(item.name());
        }
    }
    None
}

/// Positions of counted groups after expansion.
///
/// Built from `(name, count)` pairs in declaration order: a group of count N
/// starting at offset K occupies items `K..K+N` of the mapped collection.
#[derive(Debug, Default)]
pub struct GroupSlots<'a> {
    slots: FxHashMap<&'a str, Range<usize>>,
}

impl<'a> GroupSlots<'a> {
    pub fn new(groups: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        let mut slots = FxHashMap::default();
        let mut offset = 0;
        for (name, count) in groups {
            slots.entry(name).or_insert(offset..offset + count);
            offset += count;
        }
        Self { slots }
    }

    /// Item positions of group `name`.
    pub fn range(&self, name: &str) -> Option<Range<usize>> {
        self.slots.get(name).cloned()
    }

    /// Item position of the `index`-th (1-based) member of group `name`.
    pub fn member(&self, name: &str, index: usize) -> Option<usize> {
        let range = self.slots.get(name)?;
        let position = range.start + index.checked_sub(1)?;
        range.contains(&position).then_some(position)
    }
}
