//! Benchmarks for the per-frame pose mixer work.
//!
//! Run with: cargo bench -p handpose-blend --bench mixer_bench
//!
//! Covers the three costs a host pays every frame: pushing finger values,
//! advancing the smoothers, and evaluating the graph.

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use handpose_blend::{AnimationClip, HandSkeleton, MixerConfig, PoseDefinition, PoseMixer};
use handpose_core::FingerValues;

const FRAME: Duration = Duration::from_millis(16);

fn build(pose_count: usize) -> (PoseMixer, HandSkeleton) {
    let s = HandSkeleton::standard();
    let open = Arc::new(AnimationClip::from_curls("open", &s, FingerValues::ZERO));
    let fist = Arc::new(AnimationClip::from_curls("fist", &s, FingerValues([1.0; 5])));
    let defs: Vec<PoseDefinition> = (0..pose_count)
        .map(|i| {
            if i % 2 == 0 {
                PoseDefinition::dynamic(open.clone(), fist.clone()).with_name(format!("pose-{i}"))
            } else {
                PoseDefinition::fixed(fist.clone()).with_name(format!("pose-{i}"))
            }
        })
        .collect();
    let m = PoseMixer::build(&defs, &s.finger_masks(), MixerConfig::default())
        .expect("bench definitions are valid");
    (m, s)
}

// =============================================================================
// Frame: refresh + tick + evaluate
// =============================================================================

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixer/frame");

    for poses in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(poses), &poses, |b, &poses| {
            let (mut m, s) = build(poses);
            let mut phase = 0.0f32;
            b.iter(|| {
                phase = (phase + 0.05) % 1.0;
                m.refresh(&FingerValues([phase; 5]));
                m.tick(FRAME);
                black_box(m.evaluate(&s).ok());
            })
        });
    }

    group.finish();
}

// =============================================================================
// Pose switching
// =============================================================================

fn bench_switch(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixer/switch");

    group.bench_function("cycle_16", |b| {
        let (mut m, _) = build(16);
        let fingers = FingerValues([0.5; 5]);
        let mut next = 0;
        b.iter(|| {
            next = (next + 1) % m.node_count();
            black_box(m.set_current_pose(next, &fingers));
        })
    });

    group.finish();
}

// =============================================================================
// Evaluation only
// =============================================================================

fn bench_evaluate(c: &mut Criterion) {
    let (m, s) = build(4);
    c.bench_function("mixer/evaluate_idle", |b| {
        b.iter(|| black_box(m.evaluate(&s).ok()))
    });
}

criterion_group!(benches, bench_frame, bench_switch, bench_evaluate);
criterion_main!(benches);
