//! Collision filtering for scene objects
//!
//! Two filters keep objects out of contact tests:
//!
//! - [`IgnoreSet`]: never inserted into the spatial grid at all (lights, sky,
//!   sea and sand backdrops, UI meshes). Built once when a level loads and
//!   frozen afterwards.
//! - Attachment exclusions: objects that sit in the grid but must never
//!   block the agent carrying them, such as a held prop. See
//!   [`CollisionResolver::exclude`](super::CollisionResolver::exclude).

use std::collections::HashSet;

use crate::scene::ObjectId;

/// Immutable set of objects left out of the spatial grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    ids: HashSet<ObjectId>,
}

impl IgnoreSet {
    /// Start building an ignore set
    pub fn builder() -> IgnoreSetBuilder {
        IgnoreSetBuilder::default()
    }

    /// Whether `id` is ignored
    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of ignored objects
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is ignored
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ObjectId> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Accumulates ids while a level is being assembled
#[derive(Debug, Default)]
pub struct IgnoreSetBuilder {
    ids: HashSet<ObjectId>,
}

impl IgnoreSetBuilder {
    /// Ignore one object
    pub fn with(mut self, id: ObjectId) -> Self {
        self.ids.insert(id);
        self
    }

    /// Ignore one object in place
    pub fn insert(&mut self, id: ObjectId) -> &mut Self {
        self.ids.insert(id);
        self
    }

    /// Freeze the set
    pub fn build(self) -> IgnoreSet {
        IgnoreSet { ids: self.ids }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_builder_and_collect_agree() {
        let mut map: SlotMap<ObjectId, ()> = SlotMap::with_key();
        let a = map.insert(());
        let b = map.insert(());
        let c = map.insert(());

        let mut builder = IgnoreSet::builder().with(a);
        builder.insert(b).insert(b);
        let built = builder.build();
        let collected: IgnoreSet = [a, b].into_iter().collect();

        assert_eq!(built, collected);
        assert_eq!(built.len(), 2);
        assert!(built.contains(a));
        assert!(!built.contains(c));
        assert!(IgnoreSet::default().is_empty());
    }
}
