use anyhow::Result;
use winit::event::WindowEvent;

use super::ctx::{FrameCtx, StartCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the game layer.
pub trait App {
    /// Called once, after the window and GPU context exist but before the
    /// first frame. Renderer construction and asset loading belong here.
    ///
    /// An error aborts the runtime.
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for raw window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
