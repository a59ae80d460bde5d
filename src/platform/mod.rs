//! Platform abstraction layer
//!
//! Pieces shared between the simulation driver and the browser glue:
//! - Input port (pointer position mailbox)
//! - Startup precondition errors

pub mod input;

pub use input::InputPort;

use thiserror::Error;

/// Why the frame loop could not be started
#[derive(Debug, Error)]
pub enum StartError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("canvas element `{0}` not found")]
    NoCanvas(&'static str),
    #[error("viewport is empty ({width}x{height})")]
    EmptyViewport { width: f32, height: f32 },
    #[error("failed to create render surface: {0}")]
    Surface(String),
    #[error("no compatible GPU adapter")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    Device(String),
}
