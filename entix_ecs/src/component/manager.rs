//! Utilities for managing component arrays.

use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use super::{super::EntityID, AnyComponentArray, Component, ComponentArray, ComponentTypeID};

/// Manager of all components of ECS.
///
/// Each component type is registered on its first use, shared lookups included,
/// so identifiers follow the order in which types were first touched.
/// For example, checking [`attached::<A>`](ComponentManager::attached) and then inserting `B`
/// into an empty manager gives `A` the identifier 0 and `B` the identifier 1.
///
/// [`ComponentArray`] of the type is created once the type is used mutably.
///
#[derive(Default)]
pub struct ComponentManager {
    type_ids: RefCell<HashMap<TypeId, ComponentTypeID>>,
    /// Arrays are indexed by [`ComponentTypeID`].
    arrays: Vec<Option<Box<dyn AnyComponentArray>>>,
}

impl ComponentManager {
    /// Creates new component manager.
    pub fn new() -> Self {
        Self {
            type_ids: RefCell::new(HashMap::new()),
            arrays: Vec::new(),
        }
    }

    /// Registers component type `T`, if it was not registered yet.
    ///
    /// Returns identifier of this component type.
    ///
    pub fn register<T>(&self) -> ComponentTypeID
    where
        T: Component,
    {
        let typeid = TypeId::of::<T>();
        let known = self.type_ids.borrow().get(&typeid).copied();
        if let Some(id) = known {
            return id;
        }

        let mut type_ids = self.type_ids.borrow_mut();
        let id = ComponentTypeID::from_index(type_ids.len());
        type_ids.insert(typeid, id);
        log::trace!("component type `{}` registered with id {}", type_name::<T>(), id);
        id
    }

    /// Returns identifier of component type `T`, registering it first if needed.
    pub fn component_type_id<T>(&self) -> ComponentTypeID
    where
        T: Component,
    {
        self.register::<T>()
    }

    /// Returns identifier of component type `T` if it was already registered.
    pub fn type_id_of<T>(&self) -> Option<ComponentTypeID>
    where
        T: Component,
    {
        self.type_ids.borrow().get(&TypeId::of::<T>()).copied()
    }

    /// Count of registered component types.
    pub fn registered_types(&self) -> usize {
        self.type_ids.borrow().len()
    }

    /// Inserts component of type `T` and attaches it to the entity.
    ///
    /// # Panics
    ///
    /// Panics if component of type `T` was already attached to the entity.
    ///
    pub fn insert<T>(&mut self, entity: EntityID, component: T)
    where
        T: Component,
    {
        self.storage_mut().insert(entity, component)
    }

    /// Removes component of type `T` and detaches it from the entity.
    ///
    /// Returns component that was previously attached to the entity.
    ///
    pub fn remove<T>(&mut self, entity: EntityID) -> Option<T>
    where
        T: Component,
    {
        self.storage_mut().remove(entity)
    }

    /// Returns `true` if component of type `T` was already attached to the entity.
    pub fn attached<T>(&self, entity: EntityID) -> bool
    where
        T: Component,
    {
        self.storage::<T>()
            .map(|storage| storage.attached(entity))
            .unwrap_or(false)
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    pub fn get<T>(&self, entity: EntityID) -> Option<&T>
    where
        T: Component,
    {
        let storage = self.storage::<T>()?;
        storage.get(entity)
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    pub fn get_mut<T>(&mut self, entity: EntityID) -> Option<&mut T>
    where
        T: Component,
    {
        self.storage_mut::<T>().get_mut(entity)
    }

    /// Removes components of all types attached to destroyed entity.
    pub fn entity_destroyed(&mut self, entity: EntityID) {
        for array in self.arrays.iter_mut().flatten() {
            array.entity_destroyed(entity);
        }
    }

    /// Retrieves array of components of type `T`.
    ///
    /// Returns `None` if no component of this type was ever inserted.
    ///
    pub fn storage<T>(&self) -> Option<&ComponentArray<T>>
    where
        T: Component,
    {
        let id = self.register::<T>();
        let array = self.arrays.get(id.index())?.as_deref()?.as_any();
        Some(array.downcast_ref().expect("downcast error"))
    }

    /// Retrieves array of components of type `T`, creating it first if needed.
    pub fn storage_mut<T>(&mut self) -> &mut ComponentArray<T>
    where
        T: Component,
    {
        let index = self.register::<T>().index();
        if self.arrays.len() <= index {
            self.arrays.resize_with(index + 1, || None);
        }
        let array = self.arrays[index]
            .get_or_insert_with(|| {
                Box::new(ComponentArray::<T>::new()) as Box<dyn AnyComponentArray>
            })
            .as_any_mut();
        array.downcast_mut().expect("downcast error")
    }

    /// Returns iterator over type-erased arrays of all component types in use.
    pub fn arrays(&self) -> impl Iterator<Item = (ComponentTypeID, &dyn AnyComponentArray)> {
        self.arrays.iter().enumerate().filter_map(|(index, array)| {
            let array = array.as_deref()?;
            Some((ComponentTypeID::from_index(index), array))
        })
    }
}
