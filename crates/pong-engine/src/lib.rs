//! Pong engine crate.
//!
//! Owns the platform + GPU runtime pieces the game sits on: window/event
//! loop, wgpu device and surface, keyboard input, frame timing, and the
//! immediate-mode quad renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
