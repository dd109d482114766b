use super::FrameState;

/// The cross product plotted against θ, one point per frame shown.
#[derive(Debug, Default, Clone)]
pub struct CrossHistory {
    points: Vec<(f64, f64)>,
}

impl CrossHistory {
    /// Appends the frame's point. Returns false if the frame doesn't move θ
    /// forward (a redraw of a frame already recorded).
    pub fn push(&mut self, frame: &FrameState) -> bool {
        let theta = frame.theta();
        if let Some(&(last, _)) = self.points.last() {
            if theta <= last {
                return false;
            }
        }
        self.points.push((theta, frame.cross));
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest cross product recorded so far.
    pub fn cross_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |range, &(_, cross)| match range {
            None => Some((cross, cross)),
            Some((lo, hi)) => Some((lo.min(cross), hi.max(cross))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationConfig, AnimationState};

    #[test]
    fn records_frames_in_order() {
        let config = AnimationConfig::new(4.0, 3.0).unwrap().with_frames(5);
        let mut state = AnimationState::from_config(config).unwrap();
        let mut history = CrossHistory::default();

        assert!(history.push(&state.current()));
        while let Some(frame) = state.tick() {
            assert!(history.push(&frame));
        }

        assert_eq!(history.len(), 5);
        let thetas: Vec<f64> = history.points().iter().map(|p| p.0).collect();
        assert!(thetas.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn skips_repeated_frames() {
        let state = AnimationState::new(4.0, 3.0).unwrap();
        let mut history = CrossHistory::default();
        let frame = state.frame_state(3);
        assert!(history.push(&frame));
        assert!(!history.push(&frame));
        assert!(!history.push(&state.frame_state(1)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn tracks_cross_range() {
        let state = AnimationState::new(4.0, 3.0).unwrap();
        let mut history = CrossHistory::default();
        assert_eq!(history.cross_range(), None);

        for i in 0..128 {
            history.push(&state.frame_state(i));
        }
        let (lo, hi) = history.cross_range().unwrap();
        assert!(lo >= -12.0 - 1e-9 && lo < -11.9);
        assert!(hi <= 12.0 + 1e-9 && hi > 11.9);

        history.clear();
        assert!(history.is_empty());
    }
}
