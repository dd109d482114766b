pub use animation::{AnimationConfig, AnimationState, CrossHistory, FrameState, Vector2D};
pub use animator::Animator;
pub use app::App;
pub use cli::Cli;
pub use error::AnimationError;

pub mod animation;
pub mod logging;
pub mod plot;

mod animator;
mod app;
mod cli;
mod error;
mod graphics;
