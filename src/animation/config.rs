use std::f64::consts::PI;

use crate::error::AnimationError;

pub const DEFAULT_FRAMES: u64 = 128;
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_SWEEP: f64 = PI;
pub const DEFAULT_RATES: [f64; 2] = [1.0, -1.0];

/// Upper bound on `frames`; the history and the preview hold one point each.
pub const MAX_FRAMES: u64 = 1 << 20;
/// Upper bound on `sweep`, in radians.
pub const MAX_SWEEP: f64 = 1.0e6;

/// Everything needed to build an [`AnimationState`](super::AnimationState).
///
/// Frames are spread like a linspace over `[0, sweep]`, so frame `frames - 1`
/// lands exactly on `sweep`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    pub magnitudes: [f64; 2],
    pub rates: [f64; 2],
    pub start_angles: [f64; 2],
    pub frames: u64,
    pub sweep: f64,
    pub fps: u32,
    pub repeat: bool,
}

impl AnimationConfig {
    pub fn new(mag1: f64, mag2: f64) -> Result<Self, AnimationError> {
        let config = AnimationConfig {
            magnitudes: [mag1, mag2],
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_rates(mut self, rate1: f64, rate2: f64) -> Self {
        self.rates = [rate1, rate2];
        self
    }

    pub fn with_start_angles(mut self, start1: f64, start2: f64) -> Self {
        self.start_angles = [start1, start2];
        self
    }

    pub fn with_frames(mut self, frames: u64) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_sweep(mut self, sweep: f64) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Time covered by one frame.
    pub fn time_step(&self) -> f64 {
        self.sweep / (self.frames - 1) as f64
    }

    pub fn last_frame(&self) -> u64 {
        self.frames - 1
    }

    pub fn validate(&self) -> Result<(), AnimationError> {
        check_magnitude("mag1", self.magnitudes[0])?;
        check_magnitude("mag2", self.magnitudes[1])?;

        let [mag1, mag2] = self.magnitudes;
        let area = mag1 * mag2;
        if !(area.is_finite() && area > 0.0 && (1.4 * area).is_finite()) {
            return Err(AnimationError::InvalidArgument(format!(
                "mag1 * mag2 is out of range, got {mag1} * {mag2}"
            )));
        }

        for (name, value) in [
            ("rate1", self.rates[0]),
            ("rate2", self.rates[1]),
            ("start1", self.start_angles[0]),
            ("start2", self.start_angles[1]),
        ] {
            if !value.is_finite() {
                return Err(AnimationError::InvalidArgument(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if !(2..=MAX_FRAMES).contains(&self.frames) {
            return Err(AnimationError::InvalidArgument(format!(
                "frames must be between 2 and {MAX_FRAMES}, got {}",
                self.frames
            )));
        }
        if !(self.sweep.is_finite() && self.sweep > 0.0) {
            return Err(AnimationError::NonPositive {
                name: "sweep",
                value: self.sweep,
            });
        }
        if self.sweep > MAX_SWEEP {
            return Err(AnimationError::InvalidArgument(format!(
                "sweep must be at most {MAX_SWEEP}, got {}",
                self.sweep
            )));
        }

        // the last frame's angles have to stay finite
        for i in 0..2 {
            let angle = self.start_angles[i] + self.rates[i] * self.sweep;
            if !angle.is_finite() {
                return Err(AnimationError::InvalidArgument(format!(
                    "rate{} is too large for a sweep of {}",
                    i + 1,
                    self.sweep
                )));
            }
        }
        if self.fps == 0 {
            return Err(AnimationError::InvalidArgument(
                "fps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            magnitudes: [4.0, 3.0],
            rates: DEFAULT_RATES,
            start_angles: [0.0, 0.0],
            frames: DEFAULT_FRAMES,
            sweep: DEFAULT_SWEEP,
            fps: DEFAULT_FPS,
            repeat: false,
        }
    }
}

/// Magnitudes have to be finite and strictly positive.
pub fn check_magnitude(name: &'static str, value: f64) -> Result<f64, AnimationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AnimationError::NonPositive { name, value })
    }
}
