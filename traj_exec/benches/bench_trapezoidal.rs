//! # Trapezoidal Profile Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use traj_lib::profile::{Profile, TrapezoidalProfile};

/// Run the profile from rest to its goal in steps of `dt`.
fn run_to_goal(profile: &TrapezoidalProfile, dt: f64) -> f64 {
    let mut state = profile.create_state();
    let mut i = 0;

    while i < 10_000 {
        i += 1;
        state = profile.calculate(&state, i as f64 * dt).unwrap();
        if state.position() == profile.goal() && state.velocity() == 0.0 {
            break;
        }
    }

    state.time
}

fn trapezoidal_benchmark(c: &mut Criterion) {
    let mut profile = TrapezoidalProfile::with_limits((-3.0, 3.0), (-4.0, 4.0)).unwrap();
    profile.set_goal(5.0);

    c.bench_function("TrapezoidalProfile::calculate::sliced", |b| {
        b.iter(|| run_to_goal(black_box(&profile), 0.01))
    });

    let mut unsliced = profile.clone();
    unsliced.set_timeslice(0.0);

    c.bench_function("TrapezoidalProfile::calculate::unsliced", |b| {
        b.iter(|| run_to_goal(black_box(&unsliced), 0.001))
    });
}

criterion_group!(benches, trapezoidal_benchmark);
criterion_main!(benches);
