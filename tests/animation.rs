use std::f64::consts::{FRAC_PI_2, PI};

use crossprod::{
    plot::{export_png, rasterize, Plot},
    AnimationConfig, AnimationError, AnimationState, Animator, CrossHistory,
};

#[test]
fn perpendicular_vectors_reach_the_bound() {
    let state = AnimationState::new(3.0, 4.0)
        .unwrap()
        .with_rates(1.0, 2.0)
        .unwrap();

    let frame = state.advance(FRAC_PI_2).unwrap();
    assert!((frame.cross - 12.0).abs() < 1e-9);

    for i in 0..=1000 {
        let frame = state.advance(i as f64 * PI / 500.0).unwrap();
        assert!(frame.cross.abs() <= 12.0 + 1e-9);
    }
}

#[test]
fn negative_magnitude_is_an_invalid_argument() {
    let err = AnimationState::new(-1.0, 4.0).unwrap_err();
    assert!(matches!(err, AnimationError::NonPositive { .. }));
    assert!(err.to_string().starts_with("invalid argument"));
}

#[test]
fn default_sweep_opens_and_closes() {
    let state = AnimationState::new(4.0, 3.0).unwrap();
    let config = state.config();

    let first = state.frame_state(0);
    let last = state.frame_state(config.last_frame());
    assert_eq!(first.cross, 0.0);
    // at θ = π both vectors point along -x
    assert!(last.cross.abs() < 1e-9);
    assert!((last.theta() - PI).abs() < 1e-12);
}

#[test]
fn playing_the_animation_fills_the_history() {
    let config = AnimationConfig::new(2.0, 5.0).unwrap().with_frames(32);
    let mut animator = Animator::new(config).unwrap();
    animator.run_headless();

    assert!(animator.is_finished());
    assert_eq!(animator.history().len(), 32);
    assert!(!animator.scene().is_empty());
}

#[test]
fn preview_export_writes_a_png() {
    let state = AnimationState::new(4.0, 3.0).unwrap();
    let plot = Plot::new(state.config());
    let mut history = CrossHistory::default();
    for i in 0..64 {
        history.push(&state.frame_state(i));
    }
    let scene = plot.scene(&state.frame_state(63), &history);

    let pixels = rasterize(&scene, 320, 160);
    assert_eq!(pixels.dimensions(), (320, 160));

    let path = std::env::temp_dir().join(format!("crossprod-preview-{}.png", std::process::id()));
    export_png(&scene, &path, 320, 160).unwrap();
    let written = image::open(&path).unwrap().to_rgb8();
    assert_eq!(written.dimensions(), (320, 160));
    std::fs::remove_file(path).unwrap();
}
