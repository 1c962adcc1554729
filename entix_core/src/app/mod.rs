//! Utilities for engine initialization.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use entix_ecs::World;

use crate::config::Config;
use crate::error::Result;
use crate::event::{names, Callbacks, EventListener, EventManager};
use crate::platform::Platform;

/// Type which represents duration between two frames.
pub type DeltaTime = Duration;

/// General context of game engine.
///
/// Owns the world of your game and the event manager.
/// The application stops when the quit event is dispatched.
///
pub struct Application {
    config: Config,
    world: World,
    events: EventManager,
    quit: Rc<Cell<bool>>,
    _quit_listener: EventListener,
}

impl Application {
    /// Creates new application context with given configuration.
    pub fn new(config: Config) -> Self {
        let events = EventManager::from_config(&config);
        let quit = Rc::new(Cell::new(false));
        let flag = Rc::clone(&quit);
        let quit_listener = events.listen(Callbacks::new().on_plain(names::QUIT, move || {
            log::info!("quit requested");
            flag.set(true)
        }));
        log::info!(
            "application `{}` of version {} created",
            config.name(),
            config.version(),
        );

        Self {
            config,
            world: World::new(),
            events,
            quit,
            _quit_listener: quit_listener,
        }
    }

    /// Sets source of native events of this application.
    pub fn with_platform<P>(self, platform: P) -> Self
    where
        P: Platform + 'static,
    {
        self.events.set_platform(platform);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// World of your game.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// World of your game.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Event manager of this application.
    pub fn events(&self) -> &EventManager {
        &self.events
    }

    /// Returns `true` if the quit event was dispatched.
    pub fn quit_requested(&self) -> bool {
        self.quit.get()
    }

    /// Handles all events of the current frame.
    ///
    /// Returns count of dispatched events.
    ///
    /// # Errors
    ///
    /// An error is returned if events of this frame were not dispatched completely.
    ///
    pub fn frame(&mut self) -> Result<usize> {
        let dispatched = self.events.handle()?;
        Ok(dispatched)
    }

    /// Runs frames until the quit event is dispatched.
    ///
    /// `update` is called after events of each frame are handled
    /// with duration of the previous frame.
    ///
    /// # Errors
    ///
    /// An error is returned if events of some frame were not dispatched completely.
    ///
    pub fn run<F>(mut self, mut update: F) -> Result<()>
    where
        F: FnMut(&mut Self, DeltaTime),
    {
        let mut delta_time = DeltaTime::ZERO;
        loop {
            let frame_start = Instant::now();
            self.frame()?;
            if self.quit_requested() {
                break;
            }
            update(&mut self, delta_time);
            delta_time = frame_start.elapsed();
        }
        log::info!("closing this application");
        Ok(())
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
