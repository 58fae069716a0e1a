//! Galaxy Wars simulation core.
//!
//! Everything that decides what happens in a frame lives in this crate and is
//! driven purely by `update(dt)` calls, discrete input commands and an
//! injected RNG.  Terminal I/O lives in the binary (`main.rs`, `display.rs`).

pub mod collision;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod game;
pub mod highscore;
pub mod level;
pub mod narrative;
pub mod pool;
pub mod timer;
pub mod wave;

pub use error::{GameError, Result};
