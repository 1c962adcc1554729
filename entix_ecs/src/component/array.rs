//! Dense storage for **components** of one type.

use std::any::{type_name, Any};
use std::ops::{Index, IndexMut};

use slotmap::SecondaryMap;

use super::{super::EntityID, Component};

/// Storage for statically typed components of ECS.
///
/// Components are packed without gaps, so removal moves
/// the last component into the freed slot.
///
pub struct ComponentArray<T>
where
    T: Component,
{
    /// Components are actually stored here.
    dense: Vec<T>,
    entity_to_index: SecondaryMap<EntityID, usize>,
    index_to_entity: Vec<EntityID>,
}

impl<T> Default for ComponentArray<T>
where
    T: Component,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentArray<T>
where
    T: Component,
{
    /// Creates an empty component array.
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            entity_to_index: SecondaryMap::new(),
            index_to_entity: Vec::new(),
        }
    }

    /// Inserts component and attaches it to the entity.
    ///
    /// # Panics
    ///
    /// Panics if component was already attached to the entity.
    ///
    pub fn insert(&mut self, entity: EntityID, component: T) {
        assert!(
            !self.attached(entity),
            "component was already attached to the entity",
        );
        let index = self.dense.len();
        self.dense.push(component);
        self.index_to_entity.push(entity);
        self.entity_to_index.insert(entity, index);
    }

    /// Removes component and detaches it from the entity.
    ///
    /// Returns component that was attached to the entity.
    /// Nothing happens if there was no component attached.
    ///
    pub fn remove(&mut self, entity: EntityID) -> Option<T> {
        let index = self.entity_to_index.remove(entity)?;
        let component = self.dense.swap_remove(index);
        self.index_to_entity.swap_remove(index);

        // Last component was moved into the freed slot.
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index[moved] = index;
        }
        Some(component)
    }

    /// Returns `true` if component was already attached to the entity.
    pub fn attached(&self, entity: EntityID) -> bool {
        self.entity_to_index.contains_key(entity)
    }

    /// Retrieves an immutable reference to component attached to the entity.
    pub fn get(&self, entity: EntityID) -> Option<&T> {
        let index = *self.entity_to_index.get(entity)?;
        self.dense.get(index)
    }

    /// Retrieves a mutable reference to component attached to the entity.
    pub fn get_mut(&mut self, entity: EntityID) -> Option<&mut T> {
        let index = *self.entity_to_index.get(entity)?;
        self.dense.get_mut(index)
    }

    /// Count of components in this array.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if there are no components in this array.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns immutable iterator over all components with their entities.
    pub fn iter(&self) -> impl Iterator<Item = (EntityID, &T)> {
        self.index_to_entity.iter().copied().zip(self.dense.iter())
    }

    /// Returns mutable iterator over all components with their entities.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityID, &mut T)> {
        self.index_to_entity.iter().copied().zip(self.dense.iter_mut())
    }

    /// Returns iterator over all entities which have component of this type.
    pub fn entities(&self) -> impl Iterator<Item = EntityID> + '_ {
        self.index_to_entity.iter().copied()
    }

    /// Returns all components packed together.
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    /// Returns all components packed together.
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.dense.len(), self.entity_to_index.len());
        assert_eq!(self.dense.len(), self.index_to_entity.len());
        for (index, &entity) in self.index_to_entity.iter().enumerate() {
            assert_eq!(self.entity_to_index.get(entity), Some(&index));
        }
        for (entity, &index) in self.entity_to_index.iter() {
            assert_eq!(self.index_to_entity[index], entity);
        }
    }
}

impl<T> Index<EntityID> for ComponentArray<T>
where
    T: Component,
{
    type Output = T;

    fn index(&self, entity: EntityID) -> &Self::Output {
        self.get(entity)
            .expect("there is no component attached to the entity")
    }
}

impl<T> IndexMut<EntityID> for ComponentArray<T>
where
    T: Component,
{
    fn index_mut(&mut self, entity: EntityID) -> &mut Self::Output {
        self.get_mut(entity)
            .expect("there is no component attached to the entity")
    }
}

/// Type-erased view of [`ComponentArray`] of any component type.
///
/// Only lifecycle operations are available here;
/// typed access goes through [`AnyComponentArray::as_any`] downcast.
///
pub trait AnyComponentArray: Any {
    /// Removes component of destroyed entity, if any.
    fn entity_destroyed(&mut self, entity: EntityID);

    /// Returns `true` if component was attached to the entity.
    fn attached(&self, entity: EntityID) -> bool;

    /// Count of components in this array.
    fn len(&self) -> usize;

    /// Returns `true` if there are no components in this array.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of component type stored in this array.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> AnyComponentArray for ComponentArray<T>
where
    T: Component,
{
    fn entity_destroyed(&mut self, entity: EntityID) {
        self.remove(entity);
    }

    fn attached(&self, entity: EntityID) -> bool {
        ComponentArray::attached(self, entity)
    }

    fn len(&self) -> usize {
        ComponentArray::len(self)
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
