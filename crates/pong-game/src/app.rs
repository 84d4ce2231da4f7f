//! Application layer: owns the renderer and match state, turns input into
//! simulation steps, and describes one frame of drawing.

use std::path::Path;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use pong_engine::coords::{Vec2, Viewport};
use pong_engine::core::{App, AppControl, FrameCtx, StartCtx};
use pong_engine::input::Key;
use pong_engine::render::{Camera2D, FrameOutcome, Renderer, TextAlign};

use crate::digits::draw_digit;
use crate::game::params::*;
use crate::game::{Inputs, MatchState, Phase, Side};

const FONT_PATH: &str = "assets/kenney-pixel.ttf";

pub struct PongApp {
    renderer: Option<Renderer>,
    state: MatchState,
    rng: StdRng,
}

impl PongApp {
    pub fn new() -> Self {
        let mut rng = StdRng::from_entropy();
        let state = MatchState::new(&mut rng);
        Self {
            renderer: None,
            state,
            rng,
        }
    }
}

/// Uniform camera zoom that fits the whole field into the drawable,
/// letterboxing the longer screen axis.
fn fit_game_area(viewport: Viewport) -> Camera2D {
    let horizontal = viewport.width / GAME_SIZE.x;
    let vertical = viewport.height / GAME_SIZE.y;
    let fit = horizontal.min(vertical);
    Camera2D::new(Vec2::ZERO, Vec2::splat(fit))
}

impl App for PongApp {
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        let mut renderer = Renderer::new(ctx.gpu).context("renderer setup failed")?;
        renderer.set_clear_color(CLEAR_COLOR);

        // Text overlays are optional: without the font file the match still
        // runs, prompts are just not shown.
        if let Err(e) =
            renderer.load_font_file(ctx.gpu.queue(), Path::new(FONT_PATH), FONT_PX_SIZE)
        {
            log::warn!("no overlay font: {e}");
        }

        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Exit;
        };

        if ctx.input_frame.just_pressed(Key::F11) {
            ctx.window.toggle_fullscreen();
        }

        let inputs = Inputs {
            left_axis: ctx.input.axis(Key::S, Key::W),
            right_axis: ctx.input.axis(Key::ArrowDown, Key::ArrowUp),
            serve_pressed: ctx.input_frame.just_pressed(Key::Space),
        };
        self.state.update(inputs, ctx.time.dt, &mut self.rng);

        let viewport = ctx.window.drawable_size();
        let camera = fit_game_area(viewport);

        renderer.begin_frame(viewport);

        renderer.begin_camera(camera);
        {
            renderer.draw_rectangle(self.state.paddle_left, PADDLE_SIZE, PADDLE_COLOR);
            renderer.draw_rectangle(self.state.paddle_right, PADDLE_SIZE, PADDLE_COLOR);
            renderer.draw_rectangle(self.state.ball_pos, BALL_SIZE, BALL_COLOR);

            // Top and bottom walls. The top one hangs downward from the
            // field edge via a negative height.
            renderer.draw_rectangle(
                Vec2::new(-GAME_SIZE.x * 0.5, GAME_SIZE.y * 0.5),
                Vec2::new(GAME_SIZE.x, -WALL_THICKNESS),
                WALL_COLOR,
            );
            renderer.draw_rectangle(
                Vec2::new(-GAME_SIZE.x * 0.5, -GAME_SIZE.y * 0.5),
                Vec2::new(GAME_SIZE.x, WALL_THICKNESS),
                WALL_COLOR,
            );

            // Dashed center line.
            let segment_h =
                (GAME_SIZE.y - LINE_GAP * (LINE_SEGMENTS - 1) as f32) / LINE_SEGMENTS as f32;
            for i in 0..LINE_SEGMENTS {
                renderer.draw_rectangle(
                    Vec2::new(
                        -LINE_THICKNESS * 0.5,
                        -GAME_HEIGHT * 0.5 + (segment_h + LINE_GAP) * i as f32,
                    ),
                    Vec2::new(LINE_THICKNESS, segment_h),
                    LINE_COLOR,
                );
            }

            let score_y = GAME_SIZE.y * 0.5 - SCORE_SIZE.y * 1.5;
            draw_digit(
                renderer,
                self.state.score_left.min(9),
                Vec2::new(2.0 * -SCORE_SIZE.x, score_y),
                SCORE_SIZE,
                SCORE_COLOR,
            );
            draw_digit(
                renderer,
                self.state.score_right.min(9),
                Vec2::new(SCORE_SIZE.x, score_y),
                SCORE_SIZE,
                SCORE_COLOR,
            );

            // Winner flash: a pulsing column over the winning side.
            if self.state.phase == Phase::Over {
                let pulse = 0.25 + ((ctx.time.elapsed * 5.0).sin() + 1.0) * 0.25;
                let color = PADDLE_COLOR.with_alpha(pulse);
                match self.state.winner() {
                    Some(Side::Left) => renderer.draw_rectangle(
                        Vec2::new(-GAME_SIZE.x * 0.5, -GAME_SIZE.y * 0.5),
                        Vec2::new(GAME_SIZE.x * 0.1, GAME_SIZE.y),
                        color,
                    ),
                    Some(Side::Right) => renderer.draw_rectangle(
                        Vec2::new(GAME_SIZE.x * 0.4, -GAME_SIZE.y * 0.5),
                        Vec2::new(GAME_SIZE.x * 0.1, GAME_SIZE.y),
                        color,
                    ),
                    None => {}
                }
            }
        }
        renderer.end_camera();

        renderer.begin_ui();
        if renderer.has_font() {
            match self.state.phase {
                Phase::Waiting => {
                    renderer.draw_text(
                        Vec2::new(viewport.width * 0.5, viewport.height * 0.7),
                        "Press SPACE to begin",
                        LINE_COLOR,
                        TextAlign::Center,
                    );
                }
                Phase::Over => {
                    renderer.draw_text(
                        Vec2::new(viewport.width * 0.5, viewport.height * 0.5),
                        "GAME OVER!",
                        LINE_COLOR,
                        TextAlign::Center,
                    );
                    renderer.draw_text(
                        Vec2::new(viewport.width * 0.5, viewport.height * 0.5 + 48.0),
                        "Press SPACE to restart",
                        LINE_COLOR,
                        TextAlign::Center,
                    );
                }
                Phase::Playing => {}
            }
        }
        renderer.end_ui();

        match renderer.end_frame(ctx.gpu) {
            FrameOutcome::Fatal => AppControl::Exit,
            FrameOutcome::Presented | FrameOutcome::Skipped => AppControl::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_fits_width_on_wide_screens() {
        // 1280x720 is exactly 2x the field on both axes.
        let cam = fit_game_area(Viewport::new(1280.0, 720.0));
        assert_eq!(cam.zoom, Vec2::splat(2.0));
    }

    #[test]
    fn camera_letterboxes_on_mismatched_aspect() {
        // Taller than the field aspect: width is the limiting axis.
        let cam = fit_game_area(Viewport::new(640.0, 720.0));
        assert_eq!(cam.zoom, Vec2::splat(1.0));

        // Wider than the field aspect: height limits.
        let cam = fit_game_area(Viewport::new(1920.0, 360.0));
        assert_eq!(cam.zoom, Vec2::splat(1.0));
    }

    #[test]
    fn camera_centers_the_field() {
        assert_eq!(fit_game_area(Viewport::new(640.0, 360.0)).position, Vec2::ZERO);
    }
}
