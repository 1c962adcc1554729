//! Demo game of simple 2D game engine

#![windows_subsystem = "windows"]

use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;
use std::time::Instant;

use semver::Version;
use winit::event::Event;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use entix_core::app::DeltaTime;
use entix_core::components::Tag;
use entix_core::config::Config;
use entix_core::event::{names, Callbacks, EventManager, KeyboardEvent, Scancode};
use entix_core::platform::{PlatformQueue, WinitTranslator};
use entix_core::Application;
use entix_ecs::EntityID;

use logger::Levels;

mod logger;

const APP_NAME: &str = env!("CARGO_CRATE_NAME", "binary must be compiled by Cargo");
const APP_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "binary must be compiled by Cargo");

/// Player speed in pixels per second.
const SPEED: f32 = 120.0;

// Scancodes of the keys used by the player.
const KEY_W: Scancode = Scancode(17);
const KEY_A: Scancode = Scancode(30);
const KEY_S: Scancode = Scancode(31);
const KEY_D: Scancode = Scancode(32);
const KEY_SPACE: Scancode = Scancode(57);

#[derive(Debug, Default, Copy, Clone, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

/// Entry point of `entix-rs` demo game
fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let _handle = logger::init(Levels::default())?;
    log::info!("logger initialized successfully");

    let version: Version = APP_VERSION_STR.parse()?;
    let config = Config::new(APP_NAME.to_string(), version);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.name())
        .build(&event_loop)?;

    let platform = PlatformQueue::new();
    let mut application = Application::new(config).with_platform(platform.clone());
    let player = spawn_player(&mut application);

    let jumps = Rc::new(Cell::new(0u32));
    let emitter = application.events().clone();
    let counter = Rc::clone(&jumps);
    let listener = application.events().listen(
        Callbacks::new()
            .on(names::KEY_DOWN, move |event| {
                let key = event.payload::<KeyboardEvent>();
                if matches!(key, Some(key) if key.scancode == KEY_SPACE && !key.repeat) {
                    emitter.emit("jump");
                }
            })
            .on_plain("jump", move || {
                counter.set(counter.get() + 1);
                log::info!("player jumped {} times", counter.get());
            }),
    );

    let mut translator = WinitTranslator::new();
    let mut frame_start = Instant::now();
    event_loop.run(move |event, _, control_flow| {
        // Listener must live as long as the event loop.
        let _ = &listener;
        control_flow.set_poll();

        match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                if let Some(event) = translator.translate(&event) {
                    platform.push(event);
                }
            }
            Event::MainEventsCleared => {
                let delta_time = frame_start.elapsed();
                frame_start = Instant::now();

                if let Err(error) = application.frame() {
                    log::error!("frame error: {}", error);
                }
                if application.quit_requested() {
                    control_flow.set_exit();
                    return;
                }
                update(&mut application, player, delta_time);
            }
            Event::LoopDestroyed => {
                log::info!("closing this application after {} jumps", jumps.get());
            }
            _ => (),
        }
    })
}

fn spawn_player(application: &mut Application) -> EntityID {
    let mut player = application.world_mut().spawn();
    player.attach(Tag::new("player"));
    player.attach_default::<Position>();
    player.attach_default::<Velocity>();
    log::debug!("player spawned with id {:?}", player.id());
    player.id()
}

/// Direction of the player movement chosen by pressed keys.
fn direction(events: &EventManager) -> (f32, f32) {
    let axis = |negative, positive| {
        let negative = events.is_key_pressed(negative) as i8;
        let positive = events.is_key_pressed(positive) as i8;
        f32::from(positive - negative)
    };
    (axis(KEY_A, KEY_D), axis(KEY_W, KEY_S))
}

fn update(application: &mut Application, player: EntityID, delta_time: DeltaTime) {
    let (dx, dy) = direction(application.events());
    let Some(mut player) = application.world_mut().entity(player) else {
        return;
    };

    let velocity = player.get_mut::<Velocity>();
    velocity.x = dx * SPEED;
    velocity.y = dy * SPEED;
    let velocity = *velocity;

    let position = player.get_mut::<Position>();
    let previous = *position;
    position.x += velocity.x * delta_time.as_secs_f32();
    position.y += velocity.y * delta_time.as_secs_f32();
    if *position != previous {
        log::trace!("player moved to ({:.1}, {:.1})", position.x, position.y);
    }
}
