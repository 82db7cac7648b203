//! Integration tests for the smoothing primitives.

use handpose_core::animation::driver::{DriverConfig, SmootherDriver};
use handpose_core::animation::events::SmootherEvent;
use handpose_core::animation::*;
use proptest::prelude::*;
use std::time::Duration;

const MS_16: Duration = Duration::from_millis(16);

#[test]
fn sixty_fps_frames_complete_half_second_tween() {
    let mut s = ValueSmoother::new(0.0, 2.0);
    s.set_target(1.0);
    let mut frames = 0;
    while !s.is_complete() {
        s.tick(MS_16);
        frames += 1;
        assert!(frames < 100, "tween never completed");
    }
    // 0.5s / 16ms rounds up to 32 frames.
    assert_eq!(frames, 32);
    assert_eq!(s.value(), 1.0);
}

#[test]
fn repeated_retarget_converges_asymptotically() {
    // Re-writing the same target every frame restarts the tween from the
    // current value, so each frame closes a fixed fraction of the gap.
    let mut s = ValueSmoother::new(0.0, 2.0);
    let mut prev_gap = 1.0f32;
    for _ in 0..20 {
        s.set_target(1.0);
        s.tick(MS_16);
        let gap = 1.0 - s.value();
        assert!(gap < prev_gap);
        assert!(gap > 0.0);
        prev_gap = gap;
    }
}

#[test]
fn driver_reports_completion_for_every_tween() {
    let mut driver = SmootherDriver::new(DriverConfig::default());
    let ids: Vec<_> = (0..5).map(|_| driver.spawn(0.0)).collect();
    for (i, &id) in ids.iter().enumerate() {
        driver.set_target(id, (i as f32 + 1.0) / 5.0);
    }
    driver.tick(Duration::from_secs(1));
    let events = driver.drain_events();
    for &id in &ids {
        let completed = events
            .iter()
            .filter(|e| **e == SmootherEvent::Completed { id })
            .count();
        assert_eq!(completed, 1, "smoother {id:?}");
    }
    assert_eq!(driver.active_count(), 0);
}

#[test]
fn easing_functions_are_monotonic() {
    for easing in [linear, ease_in, ease_out, ease_in_out, ease_out_cubic] {
        let mut prev = 0.0f32;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let v = easing(t);
            assert!(v >= prev - 0.001, "easing should be monotonic at t={}", t);
            prev = v;
        }
    }
}

proptest! {
    #[test]
    fn completes_exactly_once_with_final_value_at_target(
        start in -1.0f32..1.0,
        target in -1.0f32..1.0,
        frame_ms in 1u64..100,
    ) {
        let mut driver = SmootherDriver::new(DriverConfig::default().with_rate(2.0));
        let id = driver.spawn(start);
        driver.set_target(id, target);

        let mut completions = 0;
        let mut last_value = start;
        // Enough frames for rate * elapsed >= 1 plus some slack.
        let frames = (500 / frame_ms) + 3;
        for _ in 0..frames {
            driver.tick(Duration::from_millis(frame_ms));
            for event in driver.drain_events() {
                match event {
                    SmootherEvent::Changed { value, .. } => last_value = value,
                    SmootherEvent::Completed { .. } => completions += 1,
                }
            }
        }
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(last_value, target);
        prop_assert_eq!(driver.value(id), Some(target));
    }

    #[test]
    fn linear_tween_stays_between_start_and_target(
        start in 0.0f32..1.0,
        target in 0.0f32..1.0,
        ms in 0u64..600,
    ) {
        let mut s = ValueSmoother::new(start, 2.0);
        s.set_target(target);
        s.tick(Duration::from_millis(ms));
        let lo = start.min(target) - 1e-6;
        let hi = start.max(target) + 1e-6;
        prop_assert!((lo..=hi).contains(&s.value()));
    }
}
