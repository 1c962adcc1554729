//! Queueing and dispatching of events.

use std::any::TypeId;
use std::cell::{Cell, Ref, RefCell};
use std::collections::{HashMap, VecDeque};
use std::mem;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::thread;

use entix_ecs::{Component, ComponentManager, EntityID, EntityStorage};

use crate::components::Tag;
use crate::config::{Config, DEFAULT_CASCADE_LIMIT};
use crate::error::{DispatchError, EmitError};
use crate::platform::{Platform, PlatformEvent};

use super::listener::{Callbacks, EventListener, Registry};
use super::{names, Event, Input, SceneEvent};

/// Events waiting for dispatch.
#[derive(Default)]
struct Queue {
    /// Dispatch order.
    events: VecDeque<EntityID>,
    /// Pending event of each name.
    bind: HashMap<String, EntityID>,
}

/// Change of event components postponed while payloads are borrowed by handlers.
struct Deferred {
    id: EntityID,
    /// Type of attached component, if any.
    component: Option<TypeId>,
    apply: Box<dyn FnOnce(&mut ComponentManager)>,
}

struct Inner {
    /// Entities of pending events.
    entities: RefCell<EntityStorage>,
    /// Tags and payloads of pending events.
    components: RefCell<ComponentManager>,
    deferred: RefCell<Vec<Deferred>>,
    queue: RefCell<Queue>,
    registry: Rc<Registry>,
    input: RefCell<Input>,
    platform: RefCell<Option<Box<dyn Platform>>>,
    cascade_limit: Option<NonZeroUsize>,
    dispatching: Cell<bool>,
}

/// Manager of all events of game engine.
///
/// This is a cheap handle: clones refer to the same event queue,
/// so event handlers may capture a clone to emit new events.
///
#[derive(Clone)]
pub struct EventManager {
    inner: Rc<Inner>,
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EventManager {
    /// Creates event manager with default cascade limit and no platform.
    pub fn new() -> Self {
        Self::with_cascade_limit(NonZeroUsize::new(DEFAULT_CASCADE_LIMIT))
    }

    /// Creates event manager configured by given configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_cascade_limit(config.cascade_limit())
    }

    /// Creates event manager which dispatches at most `limit` events per frame.
    pub fn with_cascade_limit(limit: Option<NonZeroUsize>) -> Self {
        let inner = Inner {
            entities: RefCell::new(EntityStorage::with_key()),
            components: RefCell::new(ComponentManager::new()),
            deferred: RefCell::new(Vec::new()),
            queue: RefCell::new(Queue::default()),
            registry: Rc::new(Registry::default()),
            input: RefCell::new(Input::new()),
            platform: RefCell::new(None),
            cascade_limit: limit,
            dispatching: Cell::new(false),
        };
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Sets source of native events polled at the beginning of each frame.
    ///
    /// Returns previous source, if any.
    ///
    pub fn set_platform<P>(&self, platform: P) -> Option<Box<dyn Platform>>
    where
        P: Platform + 'static,
    {
        self.inner.platform.replace(Some(Box::new(platform)))
    }

    /// Emits event with given name.
    ///
    /// If event with the same name is already pending, it is returned instead.
    ///
    /// # Panics
    ///
    /// Panics if the name is one of [reserved names](names::RESERVED).
    ///
    pub fn emit(&self, name: &str) -> PendingEvent<'_> {
        match self.try_emit(name) {
            Ok(event) => event,
            Err(error) => panic!("{}", error),
        }
    }

    /// Emits event with given name.
    ///
    /// If event with the same name is already pending, it is returned instead.
    ///
    /// # Errors
    ///
    /// An error is returned if the name is one of [reserved names](names::RESERVED).
    ///
    pub fn try_emit(&self, name: &str) -> Result<PendingEvent<'_>, EmitError> {
        if names::is_reserved(name) {
            return Err(EmitError::Reserved(name.to_owned()));
        }
        Ok(self.emit_unchecked(name))
    }

    /// Emits lifecycle event of the scene.
    pub fn notify_scene(&self, event: SceneEvent) -> PendingEvent<'_> {
        self.emit_unchecked(event.name())
    }

    fn emit_unchecked(&self, name: &str) -> PendingEvent<'_> {
        let mut queue = self.inner.queue.borrow_mut();
        if let Some(&id) = queue.bind.get(name) {
            log::trace!("event `{}` is already pending", name);
            return PendingEvent::new(self, id, false);
        }

        let id = self.inner.entities.borrow_mut().insert(());
        let tag = Tag::new(name);
        self.modify(id, Some(TypeId::of::<Tag>()), move |components| {
            components.insert(id, tag)
        });
        queue.bind.insert(name.to_owned(), id);
        queue.events.push_back(id);
        log::trace!("event `{}` emitted", name);
        PendingEvent::new(self, id, true)
    }

    /// Returns `true` if event with given name waits for dispatch.
    pub fn is_pending(&self, name: &str) -> bool {
        self.inner.queue.borrow().bind.contains_key(name)
    }

    /// Count of events waiting for dispatch.
    pub fn len(&self) -> usize {
        self.inner.queue.borrow().events.len()
    }

    /// Returns `true` if there are no events waiting for dispatch.
    pub fn is_empty(&self) -> bool {
        self.inner.queue.borrow().events.is_empty()
    }

    /// Drops all pending events without dispatching them.
    ///
    /// The event being dispatched at the moment, if any, is not affected.
    ///
    /// Returns count of dropped events.
    ///
    pub fn clear(&self) -> usize {
        let dropped: Vec<_> = {
            let mut queue = self.inner.queue.borrow_mut();
            let Queue { events, bind } = &mut *queue;
            bind.retain(|_, id| !events.contains(id));
            events.drain(..).collect()
        };
        for &id in &dropped {
            self.despawn(id);
        }
        dropped.len()
    }

    /// Registers new listener with given handlers.
    pub fn listen(&self, callbacks: Callbacks) -> EventListener {
        EventListener::new(self, callbacks)
    }

    /// Count of registered listeners.
    pub fn listeners(&self) -> usize {
        self.inner.registry.len()
    }

    pub(crate) fn registry(&self) -> &Rc<Registry> {
        &self.inner.registry
    }

    /// Current state of input devices.
    pub fn input(&self) -> Ref<'_, Input> {
        self.inner.input.borrow()
    }

    /// Returns `true` if the key is being held right now.
    pub fn is_key_pressed(&self, scancode: super::Scancode) -> bool {
        self.inner.input.borrow().is_pressed(scancode)
    }

    /// Handles all events of the current frame.
    ///
    /// Native events are polled first, then pending events are dispatched
    /// to the listeners in order of emission. Events emitted by handlers
    /// are dispatched during the same call.
    ///
    /// Returns count of dispatched events.
    ///
    /// # Errors
    ///
    /// An error is returned if more events than the cascade limit allows
    /// were emitted during this frame. Remaining events are dropped.
    ///
    /// # Panics
    ///
    /// Panics if called from event handler.
    ///
    pub fn handle(&self) -> Result<usize, DispatchError> {
        assert!(
            !self.inner.dispatching.get(),
            "events can not be handled from event handler",
        );
        let _guard = DispatchGuard::new(self);

        self.poll_platform();

        let mut dispatched = 0;
        loop {
            if let Some(limit) = self.inner.cascade_limit {
                if dispatched >= limit.get() && !self.is_empty() {
                    let dropped = self.clear();
                    log::error!(
                        "cascade limit of {} events reached, {} pending events dropped",
                        limit,
                        dropped,
                    );
                    return Err(DispatchError::CascadeLimit {
                        limit: limit.get(),
                        dropped,
                    });
                }
            }

            self.apply_deferred();
            let next = self.inner.queue.borrow_mut().events.pop_front();
            let id = match next {
                Some(id) => id,
                None => break,
            };
            let name = self.tag(id);
            self.dispatch(id, &name);
            self.destroy(id, &name);
            dispatched += 1;
        }
        Ok(dispatched)
    }

    fn poll_platform(&self) {
        loop {
            let event = match self.inner.platform.borrow_mut().as_mut() {
                Some(platform) => platform.poll_event(),
                None => None,
            };
            match event {
                Some(event) => self.translate(event),
                None => break,
            }
        }
    }

    fn translate(&self, event: PlatformEvent) {
        log::debug!("platform event {:?}", event);
        match event {
            PlatformEvent::Quit => {
                self.emit_unchecked(names::QUIT);
            }
            PlatformEvent::KeyDown(key) => {
                self.emit_unchecked(names::KEY_DOWN).attach_if_absent(key);
                self.inner.input.borrow_mut().press(key.scancode);
            }
            PlatformEvent::KeyUp(key) => {
                self.emit_unchecked(names::KEY_UP).attach_if_absent(key);
                self.inner.input.borrow_mut().release(key.scancode);
            }
            PlatformEvent::MouseButtonDown(button) => {
                self.emit_unchecked(names::MOUSE_BUTTON_DOWN)
                    .attach_if_absent(button);
            }
            PlatformEvent::MouseButtonUp(button) => {
                self.emit_unchecked(names::MOUSE_BUTTON_UP)
                    .attach_if_absent(button);
            }
            PlatformEvent::MouseMotion(motion) => {
                self.emit_unchecked(names::MOUSE_MOTION)
                    .attach_if_absent(motion);
            }
            PlatformEvent::MouseWheel(wheel) => {
                self.emit_unchecked(names::MOUSE_WHEEL)
                    .attach_if_absent(wheel);
            }
            PlatformEvent::Other => (),
        }
    }

    /// Applies component change now, or later if payloads are borrowed at the moment.
    fn modify<F>(&self, id: EntityID, component: Option<TypeId>, apply: F)
    where
        F: FnOnce(&mut ComponentManager) + 'static,
    {
        match self.inner.components.try_borrow_mut() {
            Ok(mut components) => {
                self.flush(&mut components);
                apply(&mut components);
            }
            Err(_) => {
                log::trace!("payload of event is borrowed, component change deferred");
                self.inner.deferred.borrow_mut().push(Deferred {
                    id,
                    component,
                    apply: Box::new(apply),
                });
            }
        }
    }

    fn apply_deferred(&self) {
        if let Ok(mut components) = self.inner.components.try_borrow_mut() {
            self.flush(&mut components);
        }
    }

    fn flush(&self, components: &mut ComponentManager) {
        let deferred = mem::take(&mut *self.inner.deferred.borrow_mut());
        for change in deferred {
            (change.apply)(components);
        }
    }

    fn is_deferred<P>(&self, id: EntityID) -> bool
    where
        P: Component,
    {
        let component = Some(TypeId::of::<P>());
        self.inner
            .deferred
            .borrow()
            .iter()
            .any(|change| change.id == id && change.component == component)
    }

    fn is_alive(&self, id: EntityID) -> bool {
        self.inner.entities.borrow().contains_key(id)
    }

    fn despawn(&self, id: EntityID) {
        if self.inner.entities.borrow_mut().remove(id).is_some() {
            self.modify(id, None, move |components| components.entity_destroyed(id));
        }
    }

    fn tag(&self, id: EntityID) -> String {
        let components = self.inner.components.borrow();
        let tag = components
            .get::<Tag>(id)
            .expect("queued event has no tag");
        tag.as_str().to_owned()
    }

    fn dispatch(&self, id: EntityID, name: &str) {
        log::trace!("dispatching event `{}`", name);
        let event = Event::new(id, name, &self.inner.components);
        // Listeners registered by handlers will get the next events only.
        for listener in self.inner.registry.snapshot() {
            listener.notify(&event);
        }
    }

    fn destroy(&self, id: EntityID, name: &str) {
        self.despawn(id);
        self.inner.queue.borrow_mut().bind.remove(name);
    }
}

/// Marks the manager as dispatching while alive.
struct DispatchGuard<'a> {
    manager: &'a EventManager,
}

impl<'a> DispatchGuard<'a> {
    fn new(manager: &'a EventManager) -> Self {
        manager.inner.dispatching.set(true);
        Self { manager }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        let inner = &self.manager.inner;
        inner.dispatching.set(false);
        if !thread::panicking() {
            return;
        }
        // Handler panicked: the event being dispatched is still bound.
        if let (Ok(mut queue), Ok(mut entities), Ok(mut components), Ok(mut deferred)) = (
            inner.queue.try_borrow_mut(),
            inner.entities.try_borrow_mut(),
            inner.components.try_borrow_mut(),
            inner.deferred.try_borrow_mut(),
        ) {
            queue.events.clear();
            queue.bind.clear();
            entities.clear();
            *components = ComponentManager::new();
            deferred.clear();
        }
    }
}

/// Event which was just emitted (or was already pending).
pub struct PendingEvent<'a> {
    manager: &'a EventManager,
    id: EntityID,
    new: bool,
}

impl<'a> PendingEvent<'a> {
    fn new(manager: &'a EventManager, id: EntityID, new: bool) -> Self {
        Self { manager, id, new }
    }

    /// Identifier of the entity of this event.
    pub fn id(&self) -> EntityID {
        self.id
    }

    /// Returns `false` if the event was already pending before emission.
    pub fn is_new(&self) -> bool {
        self.new
    }

    /// Attaches payload to the event unless payload of the same type is already attached.
    ///
    /// When the same event is emitted several times during one frame,
    /// the payload of the first emission is kept.
    ///
    /// Payload attached while payloads of the event being dispatched are borrowed
    /// becomes visible to the handlers once those borrows are released.
    ///
    pub fn attach_if_absent<P>(&self, payload: P) -> &Self
    where
        P: Component,
    {
        let id = self.id;
        if !self.manager.is_alive(id) {
            return self;
        }
        self.manager
            .modify(id, Some(TypeId::of::<P>()), move |components| {
                if !components.attached::<P>(id) {
                    components.insert(id, payload);
                }
            });
        self
    }

    /// Returns `true` if payload of type `P` is attached to the event.
    pub fn has<P>(&self) -> bool
    where
        P: Component,
    {
        if self.manager.is_deferred::<P>(self.id) {
            return true;
        }
        let components = self.manager.inner.components.borrow();
        components.attached::<P>(self.id)
    }
}
