//! Runtime core of simple 2D game engine: events dispatched as entities of ECS.

pub use app::Application;
pub use entix_ecs as ecs;

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod platform;
