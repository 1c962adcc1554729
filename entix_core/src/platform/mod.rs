//! Bridge between native window system and game engine events.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::event::payload::{KeyboardEvent, MouseButtonEvent, MouseMotionEvent, MouseWheelEvent};

#[cfg(feature = "winit")]
pub use winit_bridge::WinitTranslator;

#[cfg(feature = "winit")]
mod winit_bridge;

/// Raw event produced by native window system.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlatformEvent {
    /// User requested to close the application.
    Quit,
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    MouseMotion(MouseMotionEvent),
    MouseWheel(MouseWheelEvent),
    /// Any event which is not handled by the engine.
    Other,
}

/// Objects of this trait represent source of native events.
pub trait Platform {
    /// Retrieves next available event without blocking.
    ///
    /// Returns `None` if there are no more events for now.
    ///
    fn poll_event(&mut self) -> Option<PlatformEvent>;
}

/// Shared FIFO queue of native events.
///
/// Clones of the queue refer to the same events, so one clone can be
/// handed to [`EventManager`](crate::event::EventManager) while another
/// one is filled by the window event loop.
///
#[derive(Debug, Default, Clone)]
pub struct PlatformQueue {
    events: Rc<RefCell<VecDeque<PlatformEvent>>>,
}

impl PlatformQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends event to the back of the queue.
    pub fn push(&self, event: PlatformEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Count of events waiting to be polled.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns `true` if there are no events waiting to be polled.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl Extend<PlatformEvent> for PlatformQueue {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = PlatformEvent>,
    {
        self.events.borrow_mut().extend(iter);
    }
}

impl Platform for PlatformQueue {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.borrow_mut().pop_front()
    }
}
