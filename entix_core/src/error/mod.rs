//! Utilities for game engine error handling.

use thiserror::Error;

/// Result of any operation which can return an error.
pub type Result<T> = std::result::Result<T, Error>;

/// General error type of game engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error("event emission failure: {0}")]
    Emit(#[from] EmitError),

    #[error("event dispatch failure: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Error that can happen when emitting an event from user code.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("event `{0}` is reserved and can be emitted by the engine only")]
    Reserved(String),
}

/// Error that can happen while dispatching events of the frame.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("more than {limit} events dispatched during one frame, {dropped} pending events dropped")]
    CascadeLimit { limit: usize, dropped: usize },
}
