// Runtime settings, parsed from the command line.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

#[derive(Parser, Clone, Debug)]
#[command(name = "stranger-engine")]
#[command(version, about = "Software-rendered 2D game loop", long_about = None)]
pub struct Config {
    /// Initial window width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: usize,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: usize,

    #[arg(long, default_value = "strangerEngine - High Precision Loop")]
    pub title: String,

    /// 32-bit BMP used for the player; a checkerboard is used if it can't be loaded
    #[arg(long, default_value = "assets/hero.bmp")]
    pub sprite: Option<PathBuf>,

    /// Frames per second the limiter holds the loop to
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Longest frame step, in seconds, handed to the game
    #[arg(long, default_value_t = 0.1)]
    pub max_dt: f32,

    /// Player speed in pixels per second
    #[arg(long, default_value_t = 500.0)]
    pub speed: f32,

    #[arg(long, default_value_t = 256.0)]
    pub tone_hz: f32,

    #[arg(long, default_value_t = 3000.0)]
    pub tone_volume: f32,

    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,

    /// Audio lookahead as a fraction of a second (sample_rate / N samples)
    #[arg(long, default_value_t = 15)]
    pub latency_divisor: u32,

    /// Run without opening an audio device
    #[arg(long)]
    pub mute: bool,

    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Config {
    pub fn latency_samples(&self) -> u32 {
        self.sample_rate / self.latency_divisor.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        // parsing an empty command line yields every default above
        Self::parse_from(["stranger-engine"])
    }
}
