//! Utilities for *entities* in ECS.

use std::any::type_name;

use slotmap::{new_key_type, SlotMap};

use super::{Component, ComponentManager};

new_key_type! {
    /// Unique identifier of the *entity* of ECS.
    ///
    /// Identifiers are versioned, so an identifier of a destroyed entity
    /// never refers to an entity spawned later.
    /// [`EntityID::null()`](slotmap::Key::null) is the invalid identifier:
    /// it is never handed out by [`World`](crate::World).
    ///
    pub struct EntityID;
}

/// Storage for all entities of ECS.
pub type EntityStorage = SlotMap<EntityID, ()>;

/// Handle of the entity which bundles its identifier
/// with components of the [`World`](crate::World) it lives in.
pub struct Entity<'a> {
    id: EntityID,
    components: &'a mut ComponentManager,
}

impl<'a> Entity<'a> {
    pub(crate) fn new(id: EntityID, components: &'a mut ComponentManager) -> Self {
        Self { id, components }
    }

    /// Identifier of this entity.
    pub fn id(&self) -> EntityID {
        self.id
    }

    /// Attaches component of type `T` to this entity.
    ///
    /// Returns a mutable reference to the freshly attached component.
    ///
    /// # Panics
    ///
    /// Panics if component of type `T` was already attached to the entity.
    ///
    pub fn attach<T>(&mut self, component: T) -> &mut T
    where
        T: Component,
    {
        self.components.insert(self.id, component);
        self.get_mut()
    }

    /// Attaches default value of component of type `T` to this entity.
    ///
    /// # Panics
    ///
    /// Panics if component of type `T` was already attached to the entity.
    ///
    pub fn attach_default<T>(&mut self) -> &mut T
    where
        T: Component + Default,
    {
        self.attach(T::default())
    }

    /// Detaches component of type `T` from this entity.
    ///
    /// Returns component that was attached to the entity, if any.
    ///
    pub fn detach<T>(&mut self) -> Option<T>
    where
        T: Component,
    {
        self.components.remove(self.id)
    }

    /// Returns `true` if component of type `T` is attached to this entity.
    pub fn has<T>(&self) -> bool
    where
        T: Component,
    {
        self.components.attached::<T>(self.id)
    }

    /// Retrieves an immutable reference to component of type `T`, if any.
    pub fn try_get<T>(&self) -> Option<&T>
    where
        T: Component,
    {
        self.components.get(self.id)
    }

    /// Retrieves an immutable reference to component of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if there is no component of type `T` attached to the entity.
    ///
    pub fn get<T>(&self) -> &T
    where
        T: Component,
    {
        self.try_get()
            .unwrap_or_else(|| panic!("there is no `{}` attached to the entity", type_name::<T>()))
    }

    /// Retrieves a mutable reference to component of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if there is no component of type `T` attached to the entity.
    ///
    pub fn get_mut<T>(&mut self) -> &mut T
    where
        T: Component,
    {
        self.components
            .get_mut(self.id)
            .unwrap_or_else(|| panic!("there is no `{}` attached to the entity", type_name::<T>()))
    }
}
