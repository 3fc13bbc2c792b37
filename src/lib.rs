//! Conway's Game of Life on a fixed-size torus, double buffered, with
//! interchangeable sequential and rayon-parallel schedulers.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod init;
pub mod kernel;
pub mod patterns;
pub mod publish;
pub mod rng;
pub mod scheduler;
pub mod state;

pub use config::{Color, EngineOptions, GridConfig, PublishMode, SchedulerPolicy};
pub use engine::{Engine, Timing};
pub use error::{EngineError, Result};
pub use publish::{CellSink, PixelBuffer};
