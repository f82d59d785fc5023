//! The live entity set: world entities currently taking part in the game.

use ahash::AHashMap;
use skyisle_common::{EntityId, IslandId};

/// Entities attached to active islands, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct LiveEntities {
    members: AHashMap<EntityId, IslandId>,
}

impl LiveEntities {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity owned by `island`. Returns false if already live.
    pub fn insert(&mut self, id: EntityId, island: IslandId) -> bool {
        self.members.insert(id, island).is_none()
    }

    /// Removes an entity. Returns false if it was not live.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.members.remove(&id).is_some()
    }

    /// Whether an entity is live.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains_key(&id)
    }

    /// Island owning a live entity.
    #[must_use]
    pub fn owner(&self, id: EntityId) -> Option<IslandId> {
        self.members.get(&id).copied()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Live IDs in ascending order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.members.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
