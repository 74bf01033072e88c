//! Islandstead library crate. Re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the headless sim entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive the sim systems and resources directly.

pub mod shared;
pub mod clock;
pub mod world;
pub mod farming;
pub mod economy;
pub mod save;
pub mod data;
