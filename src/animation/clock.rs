use std::time::Instant;

use tracing::{event, Level};

/// Longest stretch of wall-clock time a single redraw may account for. A
/// window that was dragged or minimized shouldn't fast-forward the animation.
const MAX_FRAME_TIME: f64 = 0.25;

pub trait TimeSource: Copy {
    fn now() -> Self;
    fn sub(&self, other: &Self) -> f64;
}

#[derive(Copy, Clone)]
pub struct Time(Instant);

impl TimeSource for Time {
    fn now() -> Self {
        Self(Instant::now())
    }

    fn sub(&self, other: &Self) -> f64 {
        self.0.duration_since(other.0).as_secs_f64()
    }
}

/// Measures the time between consecutive redraws.
pub struct Stopwatch<T: TimeSource = Time> {
    previous: T,
}

impl<T: TimeSource> Stopwatch<T> {
    pub fn start() -> Self {
        Stopwatch { previous: T::now() }
    }

    /// Seconds since the last lap (or since `start`).
    pub fn lap(&mut self) -> f64 {
        let now = T::now();
        let elapsed = now.sub(&self.previous);
        self.previous = now;
        elapsed
    }
}

/// Fixed timestep accumulator, see https://gafferongames.com/post/fix_your_timestep/
///
/// Wall-clock time goes in, whole animation frames come out. The remainder
/// is carried over to the next call.
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f64,
    max_frame_time: f64,
    accumulated_time: f64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let step = 1.0 / fps.max(1) as f64;
        FrameClock {
            step,
            max_frame_time: MAX_FRAME_TIME.max(step),
            accumulated_time: 0.0,
        }
    }

    /// Returns how many frames are due after `elapsed` more seconds.
    pub fn accumulate(&mut self, elapsed: f64) -> u32 {
        let mut elapsed = elapsed.max(0.0);

        if elapsed > self.max_frame_time {
            event!(Level::WARN, elapsed, "elapsed > max frame time");
            elapsed = self.max_frame_time;
        }

        self.accumulated_time += elapsed;

        let mut due = 0;
        while self.accumulated_time >= self.step {
            self.accumulated_time -= self.step;
            due += 1;
        }
        due
    }

    /// How far the clock is between the last due frame and the next one.
    pub fn blending_factor(&self) -> f64 {
        self.accumulated_time / self.step
    }

    pub fn reset(&mut self) {
        self.accumulated_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    thread_local! {
        static FAKE_NOW: Cell<f64> = Cell::new(0.0);
    }

    #[derive(Copy, Clone)]
    struct FakeTime(f64);

    impl TimeSource for FakeTime {
        fn now() -> Self {
            FakeTime(FAKE_NOW.with(|now| now.get()))
        }

        fn sub(&self, other: &Self) -> f64 {
            self.0 - other.0
        }
    }

    #[test]
    fn stopwatch_reports_time_between_laps() {
        FAKE_NOW.with(|now| now.set(10.0));
        let mut watch = Stopwatch::<FakeTime>::start();
        FAKE_NOW.with(|now| now.set(10.5));
        assert_eq!(watch.lap(), 0.5);
        FAKE_NOW.with(|now| now.set(10.75));
        assert_eq!(watch.lap(), 0.25);
    }

    #[test]
    fn carries_remainder_between_calls() {
        let mut clock = FrameClock::new(4);
        assert_eq!(clock.accumulate(0.125), 0);
        assert!((clock.blending_factor() - 0.5).abs() < 1e-12);
        assert_eq!(clock.accumulate(0.125), 1);
        assert_eq!(clock.accumulate(0.5), 2);
        assert!(clock.blending_factor() < 1e-12);
    }

    #[test]
    fn clamps_long_stalls() {
        let mut clock = FrameClock::new(30);
        let due = clock.accumulate(10.0);
        assert!(due <= 8, "{due} frames after a stall");
        assert!(due >= 7);
    }

    #[test]
    fn ignores_negative_time() {
        let mut clock = FrameClock::new(30);
        assert_eq!(clock.accumulate(-1.0), 0);
        assert_eq!(clock.blending_factor(), 0.0);
    }
}
