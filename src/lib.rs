//! Emberline library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual app entry point. This
//! library crate exposes the same modules so that `tests/` integration
//! tests can import types, systems, and resources without needing a
//! window or GPU.

pub mod challenge;
pub mod coach;
pub mod data;
pub mod focus;
pub mod progress;
pub mod save;
pub mod shared;
pub mod sync;
pub mod ui;
