pub use clock::{FrameClock, Stopwatch, Time, TimeSource};
pub use config::{check_magnitude, AnimationConfig, MAX_FRAMES, MAX_SWEEP};
pub use history::CrossHistory;
pub use state::{wrap_angle, AnimationState, FrameState, Vector2D};

mod clock;
mod config;
mod history;
mod state;
