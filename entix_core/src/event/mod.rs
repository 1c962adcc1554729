//! Events of game engine.
//!
//! Every event is an *entity* tagged with the event name, optionally
//! carrying payload components (for example, [`KeyboardEvent`] for key presses).
//! Events are queued by [`EventManager`] and dispatched to [`EventListener`]s
//! once per frame, in order of emission.
//!
//! Events with the same name are deduplicated: while an event is pending,
//! emitting it again returns the pending one instead of queueing a new one.

use std::any::type_name;
use std::cell::{Ref, RefCell};

use entix_ecs::{Component, ComponentManager, EntityID};

pub use input::Input;
pub use listener::{Callback, Callbacks, EventListener};
pub use manager::{EventManager, PendingEvent};
pub use payload::{
    KeyboardEvent, MouseButton, MouseButtonEvent, MouseMotionEvent, MouseWheelEvent, Scancode,
};

pub mod names;
pub mod payload;

mod input;
mod listener;
mod manager;
mod tests;

/// Event which is being dispatched to the listeners.
///
/// Payload is borrowed from the event storage. Handlers may keep references
/// returned by [`Event::get`] while emitting other events: new payloads are
/// stored once all of these references are dropped.
///
pub struct Event<'a> {
    id: EntityID,
    name: &'a str,
    components: &'a RefCell<ComponentManager>,
}

impl<'a> Event<'a> {
    pub(crate) fn new(
        id: EntityID,
        name: &'a str,
        components: &'a RefCell<ComponentManager>,
    ) -> Self {
        Self {
            id,
            name,
            components,
        }
    }

    /// Identifier of the entity of this event.
    pub fn id(&self) -> EntityID {
        self.id
    }

    /// Name of this event.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns `true` if payload of type `P` is attached to this event.
    pub fn has<P>(&self) -> bool
    where
        P: Component,
    {
        self.components.borrow().attached::<P>(self.id)
    }

    /// Retrieves payload of type `P`, if any.
    pub fn try_get<P>(&self) -> Option<Ref<'a, P>>
    where
        P: Component,
    {
        let id = self.id;
        Ref::filter_map(self.components.borrow(), |components| components.get::<P>(id)).ok()
    }

    /// Retrieves payload of type `P`.
    ///
    /// # Panics
    ///
    /// Panics if there is no payload of type `P` attached to this event.
    ///
    pub fn get<P>(&self) -> Ref<'a, P>
    where
        P: Component,
    {
        self.try_get().unwrap_or_else(|| {
            panic!(
                "event `{}` has no `{}` payload",
                self.name,
                type_name::<P>(),
            )
        })
    }

    /// Retrieves a copy of payload of type `P`, if any.
    pub fn payload<P>(&self) -> Option<P>
    where
        P: Component + Clone,
    {
        self.try_get::<P>().map(|payload| payload.clone())
    }
}

/// Lifecycle events of scenes, emitted on behalf of the scene manager.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// Scene was loaded and is ready to be used.
    Loaded,
    /// Current scene was replaced with another one.
    Changed,
}

impl SceneEvent {
    /// Reserved name of this event.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Loaded => names::SCENE_LOADED,
            Self::Changed => names::SCENE_CHANGED,
        }
    }
}
