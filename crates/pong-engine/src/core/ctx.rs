use winit::window::{Fullscreen, Window};

use crate::coords::Viewport;
use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;

/// Per-window handles and window queries.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the drawable size in physical pixels.
    ///
    /// Both renderer projections are derived from this value; querying it
    /// once per frame keeps draw coordinates and the swapchain in step
    /// across resizes.
    pub fn drawable_size(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width as f32, size.height as f32)
    }

    /// Toggles borderless fullscreen on the current monitor.
    pub fn toggle_fullscreen(&self) {
        if self.window.fullscreen().is_some() {
            self.window.set_fullscreen(None);
        } else {
            self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }
}

/// Context passed to `App::on_start`, once the GPU context exists.
pub struct StartCtx<'a> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu,
}

/// Per-frame context passed to `App::on_frame`.
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}
