use std::f64::consts::TAU;

use cgmath::Vector2;

use crate::error::AnimationError;

use super::config::AnimationConfig;

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector2D {
    pub magnitude: f64,
    pub angle: f64,
}

impl Vector2D {
    pub fn new(magnitude: f64, angle: f64) -> Self {
        Vector2D {
            magnitude,
            angle: wrap_angle(angle),
        }
    }

    pub fn endpoint(&self) -> Vector2<f64> {
        let (sin, cos) = self.angle.sin_cos();
        Vector2::new(self.magnitude * cos, self.magnitude * sin)
    }

    /// Signed area of the parallelogram spanned by `self` and `other`.
    pub fn cross(&self, other: &Vector2D) -> f64 {
        self.endpoint().perp_dot(other.endpoint())
    }
}

/// Snapshot of both vectors at one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameState {
    pub tick: f64,
    pub vectors: [Vector2D; 2],
    pub cross: f64,
}

impl FrameState {
    /// The x-coordinate of the cross-product plot: elapsed time, unwrapped.
    pub fn theta(&self) -> f64 {
        self.tick
    }

    pub fn is_perpendicular(&self, tolerance: f64) -> bool {
        let [v, w] = self.vectors;
        (self.cross.abs() - v.magnitude * w.magnitude).abs() <= tolerance
    }
}

/// The two rotating vectors.
///
/// Only the frame counter changes after construction; every snapshot is
/// recomputed from its tick so long runs don't accumulate drift.
#[derive(Clone, Debug)]
pub struct AnimationState {
    config: AnimationConfig,
    frame: u64,
}

impl AnimationState {
    pub fn new(mag1: f64, mag2: f64) -> Result<Self, AnimationError> {
        Self::from_config(AnimationConfig::new(mag1, mag2)?)
    }

    pub fn from_config(config: AnimationConfig) -> Result<Self, AnimationError> {
        config.validate()?;
        Ok(AnimationState { config, frame: 0 })
    }

    pub fn with_rates(mut self, rate1: f64, rate2: f64) -> Result<Self, AnimationError> {
        self.config = self.config.with_rates(rate1, rate2);
        self.config.validate()?;
        Ok(self)
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Computes the snapshot for an arbitrary tick.
    pub fn advance(&self, tick: f64) -> Result<FrameState, AnimationError> {
        if !(tick.is_finite() && tick >= 0.0) {
            return Err(AnimationError::InvalidTick(tick));
        }
        let frame = self.compute(tick);
        // rate * tick overflowing leaves NaN angles behind
        if !frame.cross.is_finite() {
            return Err(AnimationError::InvalidTick(tick));
        }
        Ok(frame)
    }

    /// Computes the snapshot for a frame index.
    pub fn frame_state(&self, index: u64) -> FrameState {
        self.compute(index as f64 * self.config.time_step())
    }

    pub fn current(&self) -> FrameState {
        self.frame_state(self.frame)
    }

    pub fn is_finished(&self) -> bool {
        !self.config.repeat && self.frame >= self.config.last_frame()
    }

    /// Moves to the next frame and returns its snapshot, or `None` once the
    /// last frame has been reached and the animation doesn't repeat.
    pub fn tick(&mut self) -> Option<FrameState> {
        if self.frame >= self.config.last_frame() {
            if !self.config.repeat {
                return None;
            }
            self.frame = 0;
        } else {
            self.frame += 1;
        }
        Some(self.current())
    }

    fn compute(&self, tick: f64) -> FrameState {
        let AnimationConfig {
            magnitudes,
            rates,
            start_angles,
            ..
        } = self.config;

        let v = Vector2D::new(magnitudes[0], start_angles[0] + rates[0] * tick);
        let w = Vector2D::new(magnitudes[1], start_angles[1] + rates[1] * tick);

        FrameState {
            tick,
            vectors: [v, w],
            cross: v.cross(&w),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    const EPS: f64 = 1e-9;

    fn eq(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    fn angle_eq(a: f64, b: f64) {
        let diff = wrap_angle(a - b);
        assert!(diff < EPS || TAU - diff < EPS, "{a} !~ {b}");
    }

    #[test]
    fn starts_with_parallel_vectors() {
        let state = AnimationState::new(3.0, 4.0)
            .unwrap()
            .with_rates(1.0, 2.0)
            .unwrap();
        let frame = state.advance(0.0).unwrap();
        eq(frame.vectors[0].angle, 0.0);
        eq(frame.vectors[1].angle, 0.0);
        eq(frame.cross, 0.0);
    }

    #[test]
    fn quarter_turn_against_half_turn() {
        let state = AnimationState::new(3.0, 4.0)
            .unwrap()
            .with_rates(1.0, 2.0)
            .unwrap();
        let frame = state.advance(FRAC_PI_2).unwrap();

        let v = frame.vectors[0].endpoint();
        let w = frame.vectors[1].endpoint();
        eq(v.x, 0.0);
        eq(v.y, 3.0);
        eq(w.x, -4.0);
        eq(w.y, 0.0);
        eq(frame.cross, 12.0);
        assert!(frame.is_perpendicular(EPS));
    }

    #[test]
    fn angle_is_rate_times_tick_mod_tau() {
        let state = AnimationState::new(1.0, 2.0)
            .unwrap()
            .with_rates(0.7, -3.1)
            .unwrap();
        for tick in [0.0, 0.5, 1.0, 10.0, 1234.5, 1.0e5] {
            let frame = state.advance(tick).unwrap();
            angle_eq(frame.vectors[0].angle, 0.7 * tick);
            angle_eq(frame.vectors[1].angle, -3.1 * tick);
            assert!((0.0..TAU).contains(&frame.vectors[0].angle));
            assert!((0.0..TAU).contains(&frame.vectors[1].angle));
        }
    }

    #[test]
    fn cross_is_bounded_by_product_of_magnitudes() {
        let state = AnimationState::new(3.0, 4.0)
            .unwrap()
            .with_rates(1.3, -0.4)
            .unwrap();
        for i in 0..2000 {
            let frame = state.advance(i as f64 * 0.01).unwrap();
            assert!(frame.cross.abs() <= 12.0 + EPS);
        }
    }

    #[test]
    fn parallel_and_antiparallel_have_zero_cross() {
        let parallel = Vector2D::new(2.0, 1.1);
        let same = Vector2D::new(5.0, 1.1);
        let opposite = Vector2D::new(5.0, 1.1 + PI);
        eq(parallel.cross(&same), 0.0);
        eq(parallel.cross(&opposite), 0.0);
    }

    #[test]
    fn advance_is_pure() {
        let mut state = AnimationState::new(4.0, 3.0).unwrap();
        let before = state.advance(2.5).unwrap();
        state.tick();
        state.tick();
        let after = state.advance(2.5).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn frames_do_not_drift() {
        let config = AnimationConfig::new(4.0, 3.0)
            .unwrap()
            .with_frames(1_000_001)
            .with_sweep(1000.0);
        let mut state = AnimationState::from_config(config).unwrap();
        while state.tick().is_some() {}
        let last = state.current();
        eq(last.tick, 1000.0);
        angle_eq(last.vectors[0].angle, 1000.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            AnimationState::new(-1.0, 4.0),
            Err(AnimationError::NonPositive { name: "mag1", .. })
        ));
        let state = AnimationState::new(1.0, 1.0).unwrap();
        assert!(matches!(
            state.advance(-0.5),
            Err(AnimationError::InvalidTick(_))
        ));
        assert!(state.advance(f64::NAN).is_err());
        assert!(state.clone().with_rates(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn huge_tick_is_rejected_instead_of_nan() {
        let state = AnimationState::new(1.0, 1.0)
            .unwrap()
            .with_rates(1e300, 1.0)
            .unwrap();
        assert!(matches!(
            state.advance(1e10),
            Err(AnimationError::InvalidTick(_))
        ));
        assert!(state.advance(1.0).unwrap().cross.is_finite());
    }

    #[test]
    fn start_angles_offset_the_rotation() {
        let config = AnimationConfig::new(3.0, 4.0)
            .unwrap()
            .with_rates(0.0, 1.0)
            .with_start_angles(FRAC_PI_2, -PI);
        let state = AnimationState::from_config(config).unwrap();

        for tick in [0.0, 0.3, 1.0, 2.5, 100.0] {
            let frame = state.advance(tick).unwrap();
            let v = frame.vectors[0].endpoint();
            eq(v.x, 0.0);
            eq(v.y, 3.0);
            angle_eq(frame.vectors[1].angle, PI + tick);
            assert!((0.0..TAU).contains(&frame.vectors[1].angle));
        }

        // v points up, w points along -x at tick 0
        let first = state.frame_state(0);
        eq(first.cross, 12.0);
        assert!(first.is_perpendicular(EPS));
    }

    #[test]
    fn stops_after_last_frame_unless_repeating() {
        let config = AnimationConfig::new(1.0, 1.0).unwrap().with_frames(3);
        let mut state = AnimationState::from_config(config).unwrap();
        assert_eq!(state.current().tick, 0.0);
        assert!(state.tick().is_some());
        assert!(state.tick().is_some());
        assert!(state.is_finished());
        assert!(state.tick().is_none());
        assert_eq!(state.frame(), 2);

        let mut looping = AnimationState::from_config(config.with_repeat(true)).unwrap();
        looping.tick();
        looping.tick();
        let wrapped = looping.tick().unwrap();
        assert_eq!(looping.frame(), 0);
        assert_eq!(wrapped.tick, 0.0);
        assert!(!looping.is_finished());
    }

    #[test]
    fn default_rates_mirror_across_x_axis() {
        let state = AnimationState::new(4.0, 3.0).unwrap();
        let frame = state.frame_state(state.config().last_frame() / 2);
        let v = frame.vectors[0].endpoint();
        let w = frame.vectors[1].endpoint();
        assert!(v.y > 0.0 && w.y < 0.0);
        assert!(frame.cross < 0.0);
        eq(v.y / 4.0, -w.y / 3.0);
    }
}
