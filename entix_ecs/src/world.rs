//! Utilities for storage of ECS.

use super::{ComponentManager, Entity, EntityID, EntityStorage};

/// Storage for entities and components of ECS.
///
/// Spawned entities always get unique identifiers;
/// components of despawned entities are dropped immediately.
///
#[derive(Default)]
pub struct World {
    /// Storage for all entities.
    entities: EntityStorage,
    /// Arrays of components of all registered types.
    components: ComponentManager,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self {
            entities: EntityStorage::with_key(),
            components: ComponentManager::new(),
        }
    }

    /// Creates new entity without any components.
    pub fn spawn(&mut self) -> Entity<'_> {
        let id = self.entities.insert(());
        Entity::new(id, &mut self.components)
    }

    /// Destroys the entity with all of its components.
    ///
    /// Returns `false` if there was no such entity.
    ///
    pub fn despawn(&mut self, id: EntityID) -> bool {
        if self.entities.remove(id).is_none() {
            return false;
        }
        self.components.entity_destroyed(id);
        true
    }

    /// Returns `true` if the entity is alive in this world.
    pub fn contains(&self, id: EntityID) -> bool {
        self.entities.contains_key(id)
    }

    /// Retrieves handle of alive entity.
    pub fn entity(&mut self, id: EntityID) -> Option<Entity<'_>> {
        if !self.contains(id) {
            return None;
        }
        Some(Entity::new(id, &mut self.components))
    }

    /// Returns iterator over identifiers of all alive entities.
    pub fn entities(&self) -> impl Iterator<Item = EntityID> + '_ {
        self.entities.keys()
    }

    /// Count of alive entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if there are no alive entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Components of all entities of this world.
    pub fn components(&self) -> &ComponentManager {
        &self.components
    }

    /// Components of all entities of this world.
    pub fn components_mut(&mut self) -> &mut ComponentManager {
        &mut self.components
    }
}
