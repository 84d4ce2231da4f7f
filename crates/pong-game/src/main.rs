use anyhow::Result;
use winit::dpi::LogicalSize;

use pong_engine::device::GpuInit;
use pong_engine::logging::{LoggingConfig, init_logging};
use pong_engine::window::{Runtime, RuntimeConfig};

mod app;
mod digits;
mod game;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Pong".to_string(),
        initial_size: LogicalSize::new(
            game::params::GAME_WIDTH as f64,
            game::params::GAME_HEIGHT as f64,
        ),
    };

    Runtime::run(config, GpuInit::default(), app::PongApp::new())
}
