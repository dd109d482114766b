use log::{debug, info};
use tracing::{event, span, Level};

use crate::{
    animation::{AnimationConfig, AnimationState, CrossHistory, FrameClock, FrameState},
    error::AnimationError,
    plot::{caption, Plot, Scene},
};

/// Drives the animation state from wall-clock time and keeps the plotted
/// history in step with it.
pub struct Animator {
    state: AnimationState,
    history: CrossHistory,
    clock: FrameClock,
    plot: Plot,
}

impl Animator {
    pub fn new(config: AnimationConfig) -> Result<Self, AnimationError> {
        let state = AnimationState::from_config(config)?;
        let mut history = CrossHistory::default();
        history.push(&state.current());

        Ok(Animator {
            plot: Plot::new(state.config()),
            clock: FrameClock::new(config.fps),
            history,
            state,
        })
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn history(&self) -> &CrossHistory {
        &self.history
    }

    pub fn current(&self) -> FrameState {
        self.state.current()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Feeds `elapsed` seconds of wall-clock time in. Returns the newest frame
    /// if at least one frame became due.
    pub fn update(&mut self, elapsed: f64) -> Option<FrameState> {
        let _update = span!(Level::DEBUG, "animation update", elapsed).entered();

        let due = self.clock.accumulate(elapsed);
        let mut latest = None;

        for _ in 0..due {
            match self.step() {
                Some(frame) => latest = Some(frame),
                None => {
                    self.clock.reset();
                    break;
                }
            }
        }

        event!(Level::TRACE, due, blending_factor = self.clock.blending_factor());
        latest
    }

    /// Advances exactly one frame.
    pub fn step(&mut self) -> Option<FrameState> {
        let frame = self.state.tick()?;
        if self.state.frame() == 0 {
            debug!("Animation wrapped around, clearing history");
            self.history.clear();
        }
        self.history.push(&frame);
        Some(frame)
    }

    pub fn scene(&self) -> Scene {
        self.plot.scene(&self.state.current(), &self.history)
    }

    pub fn caption(&self) -> String {
        caption(&self.state.current(), self.plot.ticks())
    }

    /// Scene of the last frame with the full history, independent of how far
    /// this animator has played.
    pub fn final_scene(&self) -> Scene {
        let config = self.state.config();
        let mut history = CrossHistory::default();
        for index in 0..config.frames {
            history.push(&self.state.frame_state(index));
        }
        self.plot
            .scene(&self.state.frame_state(config.last_frame()), &history)
    }

    /// Plays every frame without a window. Returns the last frame.
    pub fn run_headless(&mut self) -> FrameState {
        info!(
            "Running {} frames headless",
            self.state.config().frames - self.state.frame()
        );
        let mut last = self.state.current();
        while let Some(frame) = self.step() {
            debug!("{}", caption(&frame, self.plot.ticks()));
            last = frame;
            if self.state.frame() == self.state.config().last_frame() {
                break;
            }
        }
        info!("{}", self.caption());
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(frames: u64) -> AnimationConfig {
        AnimationConfig::new(4.0, 3.0)
            .unwrap()
            .with_frames(frames)
            .with_fps(10)
    }

    #[test]
    fn update_advances_by_due_frames() {
        let mut animator = Animator::new(config(20)).unwrap();
        assert_eq!(animator.history().len(), 1);

        assert!(animator.update(0.05).is_none());
        let frame = animator.update(0.15).unwrap();
        assert_eq!(animator.state().frame(), 2);
        assert_eq!(frame, animator.current());
        assert_eq!(animator.history().len(), 3);
    }

    #[test]
    fn stops_at_last_frame() {
        let mut animator = Animator::new(config(3)).unwrap();
        animator.update(0.2);
        assert!(animator.is_finished());
        assert!(animator.update(0.2).is_none());
        assert_eq!(animator.state().frame(), 2);
        assert_eq!(animator.history().len(), 3);
    }

    #[test]
    fn repeat_clears_history() {
        let mut animator = Animator::new(config(3).with_repeat(true)).unwrap();
        animator.step();
        animator.step();
        assert_eq!(animator.history().len(), 3);
        let wrapped = animator.step().unwrap();
        assert_eq!(wrapped.tick, 0.0);
        assert_eq!(animator.history().len(), 1);
    }

    #[test]
    fn headless_run_ends_on_last_frame() {
        let mut animator = Animator::new(config(16)).unwrap();
        let last = animator.run_headless();
        assert_eq!(animator.state().frame(), 15);
        assert!((last.tick - std::f64::consts::PI).abs() < 1e-12);

        let mut looping = Animator::new(config(16).with_repeat(true)).unwrap();
        looping.run_headless();
        assert_eq!(looping.state().frame(), 15);
    }

    #[test]
    fn final_scene_matches_a_full_run() {
        let mut animator = Animator::new(config(8)).unwrap();
        let preview = animator.final_scene();
        animator.run_headless();
        assert_eq!(preview.segments, animator.scene().segments);
    }

    #[test]
    fn widest_sweep_still_draws() {
        let config = config(4).with_sweep(crate::animation::MAX_SWEEP);
        let animator = Animator::new(config).unwrap();
        let scene = animator.final_scene();
        assert!(!scene.is_empty());
        assert!(scene.len() < 1000, "{} segments", scene.len());
    }
}
