use std::path::PathBuf;

use clap::Parser;

use crate::{
    animation::{check_magnitude, AnimationConfig},
    error::AnimationError,
};

fn parse_magnitude(name: &'static str, raw: &str) -> Result<f64, AnimationError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| AnimationError::NotANumber {
            name,
            value: raw.to_string(),
        })?;
    check_magnitude(name, value)
}

fn parse_mag1(raw: &str) -> Result<f64, AnimationError> {
    parse_magnitude("mag1", raw)
}

fn parse_mag2(raw: &str) -> Result<f64, AnimationError> {
    parse_magnitude("mag2", raw)
}

/// Animate two rotating vectors and their 2D cross product
#[derive(Parser, Debug)]
#[command(name = "crossprod")]
#[command(version)]
pub struct Cli {
    /// Magnitude of the first (red) vector
    #[arg(value_parser = parse_mag1, allow_negative_numbers = true)]
    pub mag1: f64,

    /// Magnitude of the second (green) vector
    #[arg(value_parser = parse_mag2, allow_negative_numbers = true)]
    pub mag2: f64,

    /// Angular rate of the first vector, radians per unit of θ
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub rate1: f64,

    /// Angular rate of the second vector, radians per unit of θ
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub rate2: f64,

    /// Start angle of the first vector in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start1: f64,

    /// Start angle of the second vector in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start2: f64,

    /// Number of frames, spread evenly over [0, sweep]
    #[arg(long, default_value_t = 128)]
    pub frames: u64,

    /// Range of θ covered by the animation, in radians
    #[arg(long, default_value_t = std::f64::consts::PI)]
    pub sweep: f64,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Start over after the last frame
    #[arg(long)]
    pub repeat: bool,

    /// Write a PNG preview of the final frame
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Size of the exported preview in pixels
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "1260x630", value_parser = parse_size)]
    pub export_size: (u32, u32),

    /// Compute every frame without opening a window
    #[arg(long)]
    pub headless: bool,

    /// log4rs configuration file
    #[arg(long, value_name = "PATH", default_value = "log4rs.yml")]
    pub log_config: PathBuf,
}

/// Largest exported preview side, in pixels.
const MAX_EXPORT_SIDE: u32 = 16384;

fn parse_size(raw: &str) -> Result<(u32, u32), AnimationError> {
    let invalid = || AnimationError::InvalidArgument(format!("expected WIDTHxHEIGHT, got '{raw}'"));
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;
    if !(1..=MAX_EXPORT_SIDE).contains(&w) || !(1..=MAX_EXPORT_SIDE).contains(&h) {
        return Err(AnimationError::InvalidArgument(format!(
            "export size must be between 1x1 and {MAX_EXPORT_SIDE}x{MAX_EXPORT_SIDE}, got '{raw}'"
        )));
    }
    Ok((w, h))
}

impl Cli {
    pub fn animation_config(&self) -> Result<AnimationConfig, AnimationError> {
        let config = AnimationConfig::new(self.mag1, self.mag2)?
            .with_rates(self.rate1, self.rate2)
            .with_start_angles(self.start1, self.start2)
            .with_frames(self.frames)
            .with_sweep(self.sweep)
            .with_fps(self.fps)
            .with_repeat(self.repeat);
        config.validate()?;
        Ok(config)
    }
}
