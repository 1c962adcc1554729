//! Utilities for *components* in ECS.

use std::any::Any;
use std::fmt;

pub use array::*;
pub use manager::*;

mod array;
mod manager;

/// Objects of this trait represent *component* of ECS.
///
/// Components should be just POD (plain old data).
///
pub trait Component: Any + Send + Sync {}

impl<T> Component for T where T: Any + Send + Sync {}

/// Small integer which identifies registered type of *component*.
///
/// Identifiers are assigned by [`ComponentManager`] in registration order starting from 0.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeID(u32);

impl ComponentTypeID {
    pub(crate) fn from_index(index: usize) -> Self {
        let id = u32::try_from(index).expect("too many component types registered");
        Self(id)
    }

    /// Underlying integer value of this identifier.
    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentTypeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
