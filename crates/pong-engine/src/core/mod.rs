//! Core engine-facing contracts.
//!
//! Defines the stable interface between the runtime (platform loop) and the
//! game layer: a per-frame context and an application trait. Runtime
//! internals stay out of game code.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, StartCtx, WindowCtx};
