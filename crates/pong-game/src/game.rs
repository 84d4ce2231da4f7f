//! Match state and rules.
//!
//! Pure simulation: no renderer or window types, so every rule is testable
//! with plain numbers. World coordinates are centered at the field middle,
//! +Y up; rect positions name the min-X/min-Y corner.

use pong_engine::coords::{Rect, Vec2};
use rand::Rng;

/// Tuning values for the match. One block, like a settings file.
pub mod params {
    use pong_engine::coords::{ColorRgba, Vec2};

    pub const GAME_WIDTH: f32 = 640.0;
    pub const GAME_HEIGHT: f32 = 360.0;
    pub const GAME_SIZE: Vec2 = Vec2::new(GAME_WIDTH, GAME_HEIGHT);

    pub const PADDLE_SIZE: Vec2 = Vec2::new(10.0, 80.0);
    pub const PADDLE_SPEED: f32 = 50.0;
    pub const PADDLE_COLOR: ColorRgba = ColorRgba::from_hex(0xAAFFAAFF);

    pub const BALL_SIZE: Vec2 = Vec2::new(10.0, 10.0);
    pub const BALL_SPEED: f32 = 100.0;
    pub const BALL_COLOR: ColorRgba = ColorRgba::from_hex(0xAAAAFFFF);

    pub const WALL_THICKNESS: f32 = 10.0;
    pub const WALL_COLOR: ColorRgba = ColorRgba::from_hex(0xAAFFAAFF);

    pub const LINE_SEGMENTS: u32 = 10;
    pub const LINE_THICKNESS: f32 = 5.0;
    pub const LINE_GAP: f32 = 20.0;
    pub const LINE_COLOR: ColorRgba = ColorRgba::from_hex(0xAAFFAA7F);

    pub const SCORE_SIZE: Vec2 = Vec2::new(24.0, 40.0);
    pub const SCORE_COLOR: ColorRgba = ColorRgba::from_hex(0xAAFFAA7F);

    pub const CLEAR_COLOR: ColorRgba = ColorRgba::from_hex(0x181818FF);

    pub const WIN_SCORE: u32 = 10;
    pub const FONT_PX_SIZE: f32 = 64.0;
}

use params::*;

/// Match phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// Ball parked, waiting for a serve.
    Waiting,
    /// Ball live.
    Playing,
    /// Someone reached the winning score.
    Over,
}

/// Which side of the field.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

/// Per-frame control inputs, already collapsed from raw key state.
#[derive(Debug, Copy, Clone, Default)]
pub struct Inputs {
    /// Left paddle axis in [-1, 1], positive up.
    pub left_axis: f32,
    /// Right paddle axis in [-1, 1], positive up.
    pub right_axis: f32,
    /// Serve/restart key went down this frame.
    pub serve_pressed: bool,
}

/// Full match state.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub phase: Phase,
    pub paddle_left: Vec2,
    pub paddle_right: Vec2,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub score_left: u32,
    pub score_right: u32,
}

impl MatchState {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut state = Self {
            phase: Phase::Waiting,
            paddle_left: Vec2::ZERO,
            paddle_right: Vec2::ZERO,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            score_left: 0,
            score_right: 0,
        };
        state.reset_round(rng);
        state
    }

    /// Re-centers paddles and ball and rolls a fresh serve direction:
    /// a random side, deflected up to 45 degrees off the horizontal.
    pub fn reset_round(&mut self, rng: &mut impl Rng) {
        self.paddle_left = Vec2::new(
            -GAME_WIDTH * 0.45 - PADDLE_SIZE.x * 0.5,
            PADDLE_SIZE.y * -0.5,
        );
        self.paddle_right = Vec2::new(
            GAME_WIDTH * 0.45 - PADDLE_SIZE.x * 0.5,
            PADDLE_SIZE.y * -0.5,
        );

        self.ball_pos = BALL_SIZE * -0.5;

        let roll: f32 = rng.r#gen();
        self.ball_vel = if roll < 0.5 {
            let angle = (roll - 0.25) * std::f32::consts::PI;
            rotate(Vec2::new(BALL_SPEED, 0.0), angle)
        } else {
            let angle = (roll - 0.75) * std::f32::consts::PI;
            rotate(Vec2::new(-BALL_SPEED, 0.0), angle)
        };
    }

    /// The winning side once the match is over.
    pub fn winner(&self) -> Option<Side> {
        if self.score_left >= WIN_SCORE {
            Some(Side::Left)
        } else if self.score_right >= WIN_SCORE {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Advances the match by `dt` seconds.
    pub fn update(&mut self, inputs: Inputs, dt: f32, rng: &mut impl Rng) {
        match self.phase {
            Phase::Waiting => {
                if inputs.serve_pressed {
                    self.phase = Phase::Playing;
                }
            }
            Phase::Playing => self.step_playing(inputs, dt, rng),
            Phase::Over => {
                if inputs.serve_pressed {
                    self.score_left = 0;
                    self.score_right = 0;
                    self.reset_round(rng);
                    self.phase = Phase::Playing;
                }
            }
        }
    }

    fn step_playing(&mut self, inputs: Inputs, dt: f32, rng: &mut impl Rng) {
        self.paddle_left += Vec2::UP * (PADDLE_SPEED * inputs.left_axis * dt);
        self.paddle_right += Vec2::UP * (PADDLE_SPEED * inputs.right_axis * dt);

        self.ball_pos += self.ball_vel * dt;

        // Top wall: clamp inside, reflect down.
        let top_inner = GAME_HEIGHT * 0.5 - WALL_THICKNESS;
        if self.ball_pos.y + BALL_SIZE.y > top_inner {
            self.ball_pos.y = top_inner - BALL_SIZE.y;
            self.ball_vel.y = -self.ball_vel.y;
        }
        // Bottom wall: clamp inside, reflect up.
        else if self.ball_pos.y < -GAME_HEIGHT * 0.5 + WALL_THICKNESS {
            self.ball_pos.y = -GAME_HEIGHT * 0.5 + WALL_THICKNESS;
            self.ball_vel.y = -self.ball_vel.y;
        }

        let ball = Rect::from_origin_size(self.ball_pos, BALL_SIZE);
        if Rect::from_origin_size(self.paddle_left, PADDLE_SIZE).overlaps(ball) {
            self.ball_pos.x = self.paddle_left.x + PADDLE_SIZE.x;
            self.ball_vel.x = -self.ball_vel.x;
        } else if Rect::from_origin_size(self.paddle_right, PADDLE_SIZE).overlaps(ball) {
            self.ball_pos.x = self.paddle_right.x - BALL_SIZE.x;
            self.ball_vel.x = -self.ball_vel.x;
        }

        // Ball out on the right: left side scores.
        if self.ball_pos.x > GAME_WIDTH * 0.5 {
            self.score_left += 1;
            self.after_point(rng);
        }
        // Ball fully out on the left: right side scores.
        else if self.ball_pos.x < -GAME_WIDTH * 0.5 - BALL_SIZE.x {
            self.score_right += 1;
            self.after_point(rng);
        }
    }

    fn after_point(&mut self, rng: &mut impl Rng) {
        if self.winner().is_some() {
            self.phase = Phase::Over;
        } else {
            self.phase = Phase::Waiting;
            self.reset_round(rng);
        }
    }
}

fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn playing_state() -> MatchState {
        let mut state = MatchState::new(&mut rng());
        state.phase = Phase::Playing;
        state
    }

    const NO_INPUT: Inputs = Inputs {
        left_axis: 0.0,
        right_axis: 0.0,
        serve_pressed: false,
    };

    const SERVE: Inputs = Inputs {
        left_axis: 0.0,
        right_axis: 0.0,
        serve_pressed: true,
    };

    // ── round reset ───────────────────────────────────────────────────────

    #[test]
    fn reset_centers_ball_and_places_paddles() {
        let state = MatchState::new(&mut rng());
        assert_eq!(state.ball_pos, Vec2::new(-5.0, -5.0));
        assert_eq!(state.paddle_left.x, -640.0 * 0.45 - 5.0);
        assert_eq!(state.paddle_right.x, 640.0 * 0.45 - 5.0);
        assert_eq!(state.paddle_left.y, -40.0);
    }

    #[test]
    fn serve_speed_matches_ball_speed() {
        for seed in 0..32 {
            let mut r = StdRng::seed_from_u64(seed);
            let state = MatchState::new(&mut r);
            let speed = (state.ball_vel.x.powi(2) + state.ball_vel.y.powi(2)).sqrt();
            assert!((speed - BALL_SPEED).abs() < 1e-3, "seed {seed}: {speed}");
        }
    }

    #[test]
    fn serve_never_exceeds_45_degrees() {
        for seed in 0..64 {
            let mut r = StdRng::seed_from_u64(seed);
            let state = MatchState::new(&mut r);
            assert!(
                state.ball_vel.x.abs() >= state.ball_vel.y.abs() - 1e-3,
                "seed {seed}: {:?}",
                state.ball_vel
            );
        }
    }

    // ── phases ────────────────────────────────────────────────────────────

    #[test]
    fn space_serves_from_waiting() {
        let mut state = MatchState::new(&mut rng());
        state.update(NO_INPUT, 0.016, &mut rng());
        assert_eq!(state.phase, Phase::Waiting);
        state.update(SERVE, 0.016, &mut rng());
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn restart_from_over_zeroes_scores() {
        let mut state = playing_state();
        state.phase = Phase::Over;
        state.score_left = WIN_SCORE;
        state.score_right = 3;

        state.update(SERVE, 0.016, &mut rng());
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.score_left, 0);
        assert_eq!(state.score_right, 0);
    }

    // ── movement and walls ────────────────────────────────────────────────

    #[test]
    fn paddle_axis_moves_by_speed_times_dt() {
        let mut state = playing_state();
        let y0 = state.paddle_left.y;
        state.update(
            Inputs { left_axis: 1.0, ..NO_INPUT },
            0.5,
            &mut rng(),
        );
        assert!((state.paddle_left.y - (y0 + PADDLE_SPEED * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn top_wall_reflects_and_clamps() {
        let mut state = playing_state();
        state.ball_pos = Vec2::new(0.0, GAME_HEIGHT * 0.5 - WALL_THICKNESS - 1.0);
        state.ball_vel = Vec2::new(0.0, 100.0);

        state.update(NO_INPUT, 0.1, &mut rng());

        assert!(state.ball_vel.y < 0.0);
        assert_eq!(
            state.ball_pos.y,
            (GAME_HEIGHT * 0.5 - WALL_THICKNESS) - BALL_SIZE.y
        );
    }

    #[test]
    fn bottom_wall_reflects_and_clamps() {
        let mut state = playing_state();
        state.ball_pos = Vec2::new(0.0, -GAME_HEIGHT * 0.5 + WALL_THICKNESS + 1.0);
        state.ball_vel = Vec2::new(0.0, -100.0);

        state.update(NO_INPUT, 0.1, &mut rng());

        assert!(state.ball_vel.y > 0.0);
        assert_eq!(state.ball_pos.y, -GAME_HEIGHT * 0.5 + WALL_THICKNESS);
    }

    // ── paddles ───────────────────────────────────────────────────────────

    #[test]
    fn left_paddle_reflects_ball_and_pushes_out() {
        let mut state = playing_state();
        state.ball_pos = Vec2::new(state.paddle_left.x + 5.0, 0.0);
        state.ball_vel = Vec2::new(-100.0, 0.0);

        state.update(NO_INPUT, 0.001, &mut rng());

        assert!(state.ball_vel.x > 0.0);
        assert_eq!(state.ball_pos.x, state.paddle_left.x + PADDLE_SIZE.x);
    }

    #[test]
    fn right_paddle_reflects_ball_and_pushes_out() {
        let mut state = playing_state();
        state.ball_pos = Vec2::new(state.paddle_right.x - 5.0, 0.0);
        state.ball_vel = Vec2::new(100.0, 0.0);

        state.update(NO_INPUT, 0.001, &mut rng());

        assert!(state.ball_vel.x < 0.0);
        assert_eq!(state.ball_pos.x, state.paddle_right.x - BALL_SIZE.x);
    }

    // ── scoring ───────────────────────────────────────────────────────────

    #[test]
    fn ball_out_right_scores_left_and_reserves() {
        let mut state = playing_state();
        state.ball_pos = Vec2::new(GAME_WIDTH * 0.5 + 1.0, 100.0);
        state.ball_vel = Vec2::new(100.0, 0.0);

        state.update(NO_INPUT, 0.001, &mut rng());

        assert_eq!(state.score_left, 1);
        assert_eq!(state.phase, Phase::Waiting);
        // Round was reset.
        assert_eq!(state.ball_pos, BALL_SIZE * -0.5);
    }

    #[test]
    fn ball_out_left_needs_full_ball_width() {
        let mut state = playing_state();
        // Just past the edge but not by the ball width: no score yet.
        state.ball_pos = Vec2::new(-GAME_WIDTH * 0.5 - 1.0, 100.0);
        state.ball_vel = Vec2::ZERO;
        state.update(NO_INPUT, 0.001, &mut rng());
        assert_eq!(state.score_right, 0);

        state.ball_pos = Vec2::new(-GAME_WIDTH * 0.5 - BALL_SIZE.x - 1.0, 100.0);
        state.update(NO_INPUT, 0.001, &mut rng());
        assert_eq!(state.score_right, 1);
    }

    #[test]
    fn tenth_point_ends_the_match() {
        let mut state = playing_state();
        state.score_left = WIN_SCORE - 1;
        state.ball_pos = Vec2::new(GAME_WIDTH * 0.5 + 1.0, 100.0);

        state.update(NO_INPUT, 0.001, &mut rng());

        assert_eq!(state.phase, Phase::Over);
        assert_eq!(state.winner(), Some(Side::Left));
    }
}
