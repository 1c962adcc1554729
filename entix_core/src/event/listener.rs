//! Listeners which react to events dispatched by [`EventManager`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{Event, EventManager};

/// Handler of the event.
pub enum Callback {
    /// Handler which inspects the event and its payload.
    WithEvent(Box<dyn FnMut(&Event<'_>)>),
    /// Handler which only cares that the event was fired.
    Plain(Box<dyn FnMut()>),
}

impl Callback {
    /// Creates handler which inspects the event.
    pub fn with_event<F>(function: F) -> Self
    where
        F: FnMut(&Event<'_>) + 'static,
    {
        Self::WithEvent(Box::new(function))
    }

    /// Creates handler which takes no parameters.
    pub fn plain<F>(function: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self::Plain(Box::new(function))
    }

    fn call(&mut self, event: &Event<'_>) {
        match self {
            Self::WithEvent(function) => function(event),
            Self::Plain(function) => function(),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::WithEvent(_) => f.write_str("Callback::WithEvent"),
            Self::Plain(_) => f.write_str("Callback::Plain"),
        }
    }
}

/// Mapping of event names to their handlers.
#[derive(Debug, Default)]
pub struct Callbacks {
    map: HashMap<String, Callback>,
}

impl Callbacks {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds handler which inspects the event.
    pub fn on<F>(mut self, name: &str, function: F) -> Self
    where
        F: FnMut(&Event<'_>) + 'static,
    {
        self.insert(name, Callback::with_event(function));
        self
    }

    /// Adds handler which takes no parameters.
    pub fn on_plain<F>(mut self, name: &str, function: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.insert(name, Callback::plain(function));
        self
    }

    /// Adds handler of the event, replacing previous one.
    pub fn insert(&mut self, name: &str, callback: Callback) -> Option<Callback> {
        self.map.insert(name.to_owned(), callback)
    }

    /// Count of handled events.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no handlers.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, Callback)> for Callbacks {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, Callback)>,
    {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

type SharedCallback = Rc<RefCell<Callback>>;

/// State of the listener shared with the registry.
pub(crate) struct ListenerState {
    enabled: Cell<bool>,
    registered: Cell<bool>,
    callbacks: RefCell<HashMap<String, SharedCallback>>,
}

impl ListenerState {
    fn new(callbacks: Callbacks) -> Self {
        let callbacks = callbacks
            .map
            .into_iter()
            .map(|(name, callback)| (name, Rc::new(RefCell::new(callback))))
            .collect();
        Self {
            enabled: Cell::new(true),
            registered: Cell::new(true),
            callbacks: RefCell::new(callbacks),
        }
    }

    /// Invokes handler of the event, if this listener is active and has one.
    pub(crate) fn notify(&self, event: &Event<'_>) {
        if !self.registered.get() || !self.enabled.get() {
            return;
        }
        // The map is released before the call, so handlers may modify their own listener.
        let callback = self.callbacks.borrow().get(event.name()).cloned();
        if let Some(callback) = callback {
            callback.borrow_mut().call(event);
        }
    }
}

/// Ordered collection of registered listeners.
#[derive(Default)]
pub(crate) struct Registry {
    listeners: RefCell<Vec<Rc<ListenerState>>>,
}

impl Registry {
    /// Listeners registered at the moment, in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Rc<ListenerState>> {
        self.listeners.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn push(&self, state: Rc<ListenerState>) {
        self.listeners.borrow_mut().push(state);
    }

    fn remove(&self, state: &Rc<ListenerState>) {
        self.listeners
            .borrow_mut()
            .retain(|listener| !Rc::ptr_eq(listener, state));
    }
}

/// Listener of events dispatched by [`EventManager`].
///
/// Listener is registered on creation and unregistered when dropped,
/// so its handlers are never called after the listener is gone.
///
pub struct EventListener {
    state: Rc<ListenerState>,
    registry: Weak<Registry>,
}

impl EventListener {
    /// Creates new listener and registers it in the event manager.
    pub fn new(manager: &EventManager, callbacks: Callbacks) -> Self {
        let registry = manager.registry();
        let state = Rc::new(ListenerState::new(callbacks));
        registry.push(Rc::clone(&state));
        log::debug!(
            "listener registered, {} listeners in total",
            registry.len(),
        );
        Self {
            state,
            registry: Rc::downgrade(registry),
        }
    }

    /// Returns `true` if handlers of this listener will be called.
    pub fn is_enabled(&self) -> bool {
        self.state.enabled.get()
    }

    /// Enables or disables all handlers of this listener.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.enabled.set(enabled)
    }

    pub fn enable(&self) {
        self.set_enabled(true)
    }

    pub fn disable(&self) {
        self.set_enabled(false)
    }

    /// Returns `true` if this listener is still registered in the event manager.
    pub fn is_registered(&self) -> bool {
        self.state.registered.get()
    }

    /// Returns `true` if this listener has handler for the event.
    pub fn handles(&self, name: &str) -> bool {
        self.state.callbacks.borrow().contains_key(name)
    }

    /// Adds handler which inspects the event, replacing previous one.
    pub fn on<F>(&self, name: &str, function: F)
    where
        F: FnMut(&Event<'_>) + 'static,
    {
        self.insert(name, Callback::with_event(function))
    }

    /// Adds handler which takes no parameters, replacing previous one.
    pub fn on_plain<F>(&self, name: &str, function: F)
    where
        F: FnMut() + 'static,
    {
        self.insert(name, Callback::plain(function))
    }

    /// Removes handler of the event.
    ///
    /// Returns `false` if there was no handler.
    ///
    pub fn off(&self, name: &str) -> bool {
        self.state.callbacks.borrow_mut().remove(name).is_some()
    }

    /// Unregisters this listener, so none of its handlers will be called anymore.
    pub fn unregister(&self) {
        if !self.state.registered.replace(false) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.state);
            log::debug!(
                "listener unregistered, {} listeners in total",
                registry.len(),
            );
        }
    }

    fn insert(&self, name: &str, callback: Callback) {
        let callback = Rc::new(RefCell::new(callback));
        self.state
            .callbacks
            .borrow_mut()
            .insert(name.to_owned(), callback);
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.unregister()
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("enabled", &self.is_enabled())
            .field("registered", &self.is_registered())
            .field("handlers", &self.state.callbacks.borrow().len())
            .finish()
    }
}
