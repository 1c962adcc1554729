#![cfg(test)]

use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::{DispatchError, EmitError};
use crate::platform::{PlatformEvent, PlatformQueue};

use super::*;

#[derive(Debug, Copy, Clone, PartialEq)]
struct Damage(u32);

type Journal = Rc<RefCell<Vec<String>>>;

fn record(journal: &Journal, entry: &str) -> impl FnMut() + 'static {
    let journal = Rc::clone(journal);
    let entry = entry.to_owned();
    move || journal.borrow_mut().push(entry.clone())
}

fn counter(count: &Rc<Cell<usize>>) -> impl FnMut() + 'static {
    let count = Rc::clone(count);
    move || count.set(count.get() + 1)
}

#[test]
fn test_deduplication() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let _listener = manager.listen(Callbacks::new().on_plain("jump", counter(&count)));

    let first = manager.emit("jump").id();
    assert!(!manager.emit("jump").is_new());
    assert_eq!(manager.emit("jump").id(), first);
    assert_eq!(manager.len(), 1);
    assert!(manager.is_pending("jump"));

    assert_eq!(manager.handle().unwrap(), 1);
    assert_eq!(count.get(), 1);
    assert!(!manager.is_pending("jump"));
}

#[test]
fn test_emission_order() {
    let manager = EventManager::new();
    let journal = Journal::default();
    let _first = manager.listen(
        Callbacks::new()
            .on_plain("b", record(&journal, "first: b"))
            .on_plain("a", record(&journal, "first: a")),
    );
    let _second = manager.listen(Callbacks::new().on_plain("a", record(&journal, "second: a")));

    manager.emit("a");
    manager.emit("b");
    manager.emit("a");
    assert_eq!(manager.handle().unwrap(), 2);
    assert_eq!(
        *journal.borrow(),
        ["first: a", "second: a", "first: b"],
    );
}

#[test]
fn test_listeners_order() {
    let manager = EventManager::new();
    let score = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&score);
    let second = Rc::clone(&score);
    let _l1 = manager.listen(Callbacks::new().on_plain("score", move || first.borrow_mut().push(1)));
    let _l2 = manager.listen(Callbacks::new().on_plain("score", move || second.borrow_mut().push(2)));

    manager.emit("score");
    manager.handle().unwrap();
    assert_eq!(*score.borrow(), [1, 2]);
}

#[test]
fn test_cascade() {
    let manager = EventManager::new();
    let journal = Journal::default();
    let emitter = manager.clone();
    let _listener = manager.listen(
        Callbacks::new()
            .on("a", move |_| {
                emitter.emit("b");
            })
            .on_plain("b", record(&journal, "b")),
    );

    manager.emit("a");
    assert_eq!(manager.handle().unwrap(), 2);
    assert_eq!(*journal.borrow(), ["b"]);
    assert!(manager.is_empty());
    assert_eq!(manager.handle().unwrap(), 0);
}

#[test]
fn test_self_emission_collapses() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let emitter = manager.clone();
    let calls = Rc::clone(&count);
    let _listener = manager.listen(Callbacks::new().on("tick", move |event| {
        calls.set(calls.get() + 1);
        let pending = emitter.emit("tick");
        assert!(!pending.is_new());
        assert_eq!(pending.id(), event.id());
    }));

    manager.emit("tick");
    assert_eq!(manager.handle().unwrap(), 1);
    assert_eq!(count.get(), 1);
    assert!(manager.is_empty());
    assert_eq!(manager.handle().unwrap(), 0);
}

#[test]
fn test_cascade_limit() {
    let manager = EventManager::with_cascade_limit(NonZeroUsize::new(8));
    let ping = manager.clone();
    let pong = manager.clone();
    let _listener = manager.listen(
        Callbacks::new()
            .on_plain("ping", move || {
                ping.emit("pong");
            })
            .on_plain("pong", move || {
                pong.emit("ping");
            }),
    );

    manager.emit("ping");
    let error = manager.handle().unwrap_err();
    assert!(matches!(
        error,
        DispatchError::CascadeLimit {
            limit: 8,
            dropped: 1,
        }
    ));
    assert!(manager.is_empty());
    assert!(!manager.is_pending("ping"));
    assert!(!manager.is_pending("pong"));
}

#[test]
fn test_payload() {
    let manager = EventManager::new();
    let damage = Rc::new(Cell::new(None));
    let seen = Rc::clone(&damage);
    let _listener = manager.listen(Callbacks::new().on("hit", move |event| {
        assert!(event.has::<Damage>());
        assert_eq!(*event.get::<Damage>(), Damage(5));
        assert!(event.try_get::<KeyboardEvent>().is_none());
        seen.set(event.payload::<Damage>());
    }));

    let pending = manager.emit("hit");
    assert!(!pending.has::<Damage>());
    pending.attach_if_absent(Damage(5));
    manager.emit("hit").attach_if_absent(Damage(9));
    assert!(manager.emit("hit").has::<Damage>());

    manager.handle().unwrap();
    assert_eq!(damage.get(), Some(Damage(5)));
}

#[test]
fn test_emit_while_payload_borrowed() {
    let manager = EventManager::new();
    let emitter = manager.clone();
    let critical = Rc::new(Cell::new(None));
    let seen = Rc::clone(&critical);
    let _listener = manager.listen(
        Callbacks::new()
            .on("hit", move |event| {
                let damage = event.get::<Damage>();
                if damage.0 > 3 {
                    let pending = emitter.emit("critical");
                    assert!(pending.is_new());
                    pending.attach_if_absent(Damage(damage.0 * 2));
                    assert!(pending.has::<Damage>());
                    assert!(emitter.is_pending("critical"));
                }
            })
            .on("critical", move |event| seen.set(event.payload::<Damage>())),
    );

    manager.emit("hit").attach_if_absent(Damage(5));
    assert_eq!(manager.handle().unwrap(), 2);
    assert_eq!(critical.get(), Some(Damage(10)));
    assert!(manager.is_empty());
}

#[test]
fn test_clear_while_payload_borrowed() {
    let manager = EventManager::new();
    let emitter = manager.clone();
    let count = Rc::new(Cell::new(0));
    let _listener = manager.listen(
        Callbacks::new()
            .on("hit", move |event| {
                let _damage = event.get::<Damage>();
                emitter.emit("miss");
                assert_eq!(emitter.clear(), 1);
                assert!(emitter.is_pending("hit"));
            })
            .on_plain("miss", counter(&count)),
    );

    manager.emit("hit").attach_if_absent(Damage(1));
    assert_eq!(manager.handle().unwrap(), 1);
    assert_eq!(count.get(), 0);
    assert!(manager.emit("hit").is_new());
}

#[test]
#[should_panic]
fn test_missing_payload() {
    let manager = EventManager::new();
    let _listener = manager.listen(Callbacks::new().on("hit", |event| {
        let _damage = event.get::<Damage>();
    }));

    manager.emit("hit");
    let _ = manager.handle();
}

#[test]
fn test_events_destroyed_after_dispatch() {
    let manager = EventManager::new();
    let first = manager.emit("spawn");
    assert!(first.is_new());
    let first = first.id();
    manager.handle().unwrap();

    let second = manager.emit("spawn");
    assert!(second.is_new());
    assert_ne!(second.id(), first);
    assert!(!second.has::<Damage>());
}

#[test]
fn test_clear() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let _listener = manager.listen(Callbacks::new().on_plain("a", counter(&count)));

    manager.emit("a");
    manager.emit("b");
    assert_eq!(manager.clear(), 2);
    assert!(manager.is_empty());
    assert_eq!(manager.handle().unwrap(), 0);
    assert_eq!(count.get(), 0);
}

#[test]
#[should_panic]
fn test_reserved_emit() {
    let manager = EventManager::new();
    manager.emit(names::QUIT);
}

#[test]
fn test_reserved_try_emit() {
    let manager = EventManager::new();
    for name in names::RESERVED {
        let error = manager.try_emit(name).err();
        assert!(matches!(error, Some(EmitError::Reserved(reserved)) if reserved == name));
    }
    assert!(manager.is_empty());
    assert!(manager.try_emit("quit_game").is_ok());
}

#[test]
fn test_scene_events() {
    let manager = EventManager::new();
    let journal = Journal::default();
    let _listener = manager.listen(
        Callbacks::new()
            .on_plain(names::SCENE_LOADED, record(&journal, "loaded"))
            .on_plain(names::SCENE_CHANGED, record(&journal, "changed")),
    );

    manager.notify_scene(SceneEvent::Changed);
    manager.notify_scene(SceneEvent::Loaded);
    assert_eq!(manager.handle().unwrap(), 2);
    assert_eq!(*journal.borrow(), ["changed", "loaded"]);
}

#[test]
fn test_listener_state() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let listener = manager.listen(Callbacks::new().on_plain("a", counter(&count)));
    assert!(listener.is_enabled());
    assert!(listener.handles("a"));

    listener.disable();
    manager.emit("a");
    manager.handle().unwrap();
    assert_eq!(count.get(), 0);

    listener.enable();
    manager.emit("a");
    manager.handle().unwrap();
    assert_eq!(count.get(), 1);

    listener.on_plain("b", counter(&count));
    assert!(listener.off("a"));
    assert!(!listener.off("a"));
    manager.emit("a");
    manager.emit("b");
    manager.handle().unwrap();
    assert_eq!(count.get(), 2);
}

#[test]
fn test_drop_unregisters() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let listener = manager.listen(Callbacks::new().on_plain("a", counter(&count)));
    let other = manager.listen(Callbacks::new());
    assert_eq!(manager.listeners(), 2);

    drop(listener);
    assert_eq!(manager.listeners(), 1);
    manager.emit("a");
    manager.handle().unwrap();
    assert_eq!(count.get(), 0);

    other.unregister();
    assert!(!other.is_registered());
    assert_eq!(manager.listeners(), 0);
}

#[test]
fn test_unregister_during_dispatch() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let victim = Rc::new(RefCell::new(None::<EventListener>));

    let target = Rc::clone(&victim);
    let _killer = manager.listen(Callbacks::new().on_plain("a", move || {
        target.borrow_mut().take();
    }));
    *victim.borrow_mut() = Some(manager.listen(Callbacks::new().on_plain("a", counter(&count))));

    manager.emit("a");
    manager.handle().unwrap();
    assert_eq!(count.get(), 0);
    assert_eq!(manager.listeners(), 1);
}

#[test]
fn test_register_during_dispatch() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let spawned = Rc::new(RefCell::new(Vec::new()));

    let registrar = manager.clone();
    let storage = Rc::clone(&spawned);
    let calls = Rc::clone(&count);
    let _listener = manager.listen(Callbacks::new().on_plain("a", move || {
        let listener = registrar.listen(Callbacks::new().on_plain("a", counter(&calls)));
        storage.borrow_mut().push(listener);
    }));

    manager.emit("a");
    manager.handle().unwrap();
    assert_eq!(count.get(), 0);
    assert_eq!(manager.listeners(), 2);

    manager.emit("a");
    manager.handle().unwrap();
    assert_eq!(count.get(), 1);
    assert_eq!(manager.listeners(), 3);
}

#[test]
fn test_listener_modifies_itself() {
    let manager = EventManager::new();
    let count = Rc::new(Cell::new(0));
    let listener = Rc::new(manager.listen(Callbacks::new()));

    let this = Rc::downgrade(&listener);
    let calls = Rc::clone(&count);
    listener.on_plain("a", move || {
        calls.set(calls.get() + 1);
        if let Some(listener) = this.upgrade() {
            listener.off("a");
        }
    });

    manager.emit("a");
    manager.handle().unwrap();
    manager.emit("a");
    manager.handle().unwrap();
    assert_eq!(count.get(), 1);
    assert!(!listener.handles("a"));
}

#[test]
fn test_platform_events() {
    let manager = EventManager::new();
    let platform = PlatformQueue::new();
    assert!(manager.set_platform(platform.clone()).is_none());

    let pressed = Rc::new(Cell::new(None));
    let seen = Rc::clone(&pressed);
    let journal = Journal::default();
    let _listener = manager.listen(
        Callbacks::new()
            .on(names::KEY_DOWN, move |event| {
                seen.set(event.payload::<KeyboardEvent>());
            })
            .on_plain(names::MOUSE_WHEEL, record(&journal, "wheel"))
            .on_plain(names::QUIT, record(&journal, "quit")),
    );

    let key = |code, repeat| KeyboardEvent {
        scancode: Scancode(code),
        repeat,
    };
    platform.push(PlatformEvent::KeyDown(key(17, false)));
    platform.push(PlatformEvent::KeyDown(key(30, false)));
    platform.push(PlatformEvent::MouseWheel(MouseWheelEvent { dx: 0.0, dy: 1.0 }));
    platform.push(PlatformEvent::Other);
    assert_eq!(manager.handle().unwrap(), 2);
    assert!(platform.is_empty());
    assert_eq!(pressed.get(), Some(key(17, false)));
    assert!(manager.is_key_pressed(Scancode(17)));
    assert!(manager.is_key_pressed(Scancode(30)));

    platform.push(PlatformEvent::KeyUp(key(17, false)));
    platform.push(PlatformEvent::Quit);
    assert_eq!(manager.handle().unwrap(), 2);
    assert!(!manager.is_key_pressed(Scancode(17)));
    assert_eq!(manager.input().pressed().collect::<Vec<_>>(), [Scancode(30)]);
    assert_eq!(*journal.borrow(), ["wheel", "quit"]);

    platform.push(PlatformEvent::Other);
    assert_eq!(manager.handle().unwrap(), 0);
}

#[test]
#[should_panic]
fn test_reentrant_handle() {
    let manager = EventManager::new();
    let inner = manager.clone();
    let _listener = manager.listen(Callbacks::new().on_plain("a", move || {
        let _ = inner.handle();
    }));

    manager.emit("a");
    let _ = manager.handle();
}

#[test]
fn test_recovery_after_panic() {
    let manager = EventManager::new();
    let _listener = manager.listen(Callbacks::new().on_plain("boom", || panic!("boom")));

    manager.emit("boom");
    manager.emit("after");
    let result = panic::catch_unwind(AssertUnwindSafe(|| manager.handle()));
    assert!(result.is_err());

    assert!(manager.is_empty());
    assert!(!manager.is_pending("boom"));
    assert!(manager.emit("boom").is_new());
    assert_eq!(manager.clear(), 1);
    assert_eq!(manager.handle().unwrap(), 0);
}
