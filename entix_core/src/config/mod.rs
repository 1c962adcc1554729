//! Configuration utilities for game engine and your game.

use std::num::NonZeroUsize;

use semver::Version;

/// This struct represents general configuration of game engine.
#[derive(Debug, Clone)]
pub struct Config {
    name: String,
    version: Version,
    cascade_limit: Option<NonZeroUsize>,
}

pub const ENGINE_NAME: &str = env!("CARGO_CRATE_NAME", "library must be compiled by Cargo");

const ENGINE_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "library must be compiled by Cargo");
lazy_static::lazy_static! {
    pub static ref ENGINE_VERSION: Version = ENGINE_VERSION_STR
        .parse()
        .expect("package version must be valid semver");
}

/// Default count of events which can be dispatched during one frame.
pub const DEFAULT_CASCADE_LIMIT: usize = 4096;

impl Config {
    /// Creates new configuration with given name and version
    /// and default cascade limit.
    pub fn new(name: String, version: Version) -> Self {
        Self {
            name,
            version,
            cascade_limit: NonZeroUsize::new(DEFAULT_CASCADE_LIMIT),
        }
    }

    /// Sets maximal count of events dispatched during one frame.
    ///
    /// `None` (or zero) removes the limit, so events emitting each other
    /// in a cycle will never let the frame finish.
    ///
    pub fn with_cascade_limit(mut self, limit: Option<usize>) -> Self {
        self.cascade_limit = limit.and_then(NonZeroUsize::new);
        self
    }

    /// Name of your game.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semver version of your game.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Maximal count of events dispatched during one frame, if any.
    pub fn cascade_limit(&self) -> Option<NonZeroUsize> {
        self.cascade_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("Hello World".to_string(), Version::new(0, 0, 0))
    }
}
