//! Entity Component System (ECS) utilities for 2D game engine.

pub use component::{
    AnyComponentArray, Component, ComponentArray, ComponentManager, ComponentTypeID,
};
pub use entity::{Entity, EntityID, EntityStorage};
pub use world::World;

pub use slotmap::Key;

mod component;
mod entity;
mod world;
