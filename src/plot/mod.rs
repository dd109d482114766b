pub use raster::{export_png, rasterize};
pub use scene::{Color, Fill, Panel, Plot, Scene, Segment};
pub use ticks::MultiplePi;

use crate::animation::FrameState;

pub mod scene;

mod raster;
mod ticks;

pub const WINDOW_TITLE: &str = "Cross Product Animation";

/// One-line description of a frame, used for the window title and logs.
pub fn caption(frame: &FrameState, ticks: &MultiplePi) -> String {
    format!(
        "{WINDOW_TITLE} | θ ≈ {} | Cross product: {:>6.2}",
        ticks.format(frame.theta()),
        frame.cross
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;

    #[test]
    fn caption_shows_theta_and_cross() {
        let state = AnimationState::new(3.0, 4.0)
            .unwrap()
            .with_rates(1.0, 2.0)
            .unwrap();
        let frame = state.advance(std::f64::consts::FRAC_PI_2).unwrap();
        assert_eq!(
            caption(&frame, &MultiplePi::new(4)),
            "Cross Product Animation | θ ≈ π/2 | Cross product:  12.00"
        );
    }
}
