//! # Coupled Pipeline Benchmark
//!
//! Parameterizes a quarter turn and generates the whole trajectory along it.

use criterion::{criterion_group, criterion_main, Criterion};

use traj_lib::{
    coupled::{CausalTrajGen, CoupledChassis},
    geom::Vec2,
    path::{ArcParameterizer, AugmentedArc2d, HermiteQuintic, QuinticWaypoint},
    profile::TrapezoidalProfile,
    transmission::{rpm_to_rad, DcMotor},
};

fn generate_all(arcs: &[AugmentedArc2d], chassis: &CoupledChassis<DcMotor>) -> usize {
    let mut gen = CausalTrajGen::new(chassis.clone());
    gen.configure(arcs.to_vec(), TrapezoidalProfile::new());

    let mut state = gen.initial_state(0.0).unwrap();
    let mut i = 0;

    while !state.finished && i < 1000 {
        i += 1;
        state = gen.generate(&state, i as f64 * 0.01).unwrap();
        let _ = gen.split(&state);
    }

    i
}

fn coupled_pipeline_benchmark(c: &mut Criterion) {
    let splines = HermiteQuintic::from_waypoints(&[
        QuinticWaypoint::new(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::zeros()),
        QuinticWaypoint::new(Vec2::new(4.0, 4.0), Vec2::new(0.0, 5.0), Vec2::zeros()),
    ]);
    let parameterizer = ArcParameterizer::new(0.01, 0.01).unwrap();
    let arcs = parameterizer.parameterize_all(&splines).unwrap();

    // Two CIMs per side through a 12.75:1 gearbox
    let motor = DcMotor::new(
        12.0,
        rpm_to_rad(5330.0) / 12.75,
        2.0 * 2.7,
        2.0 * 131.0,
        2.0 * 2.41 * 12.75,
    )
    .unwrap();
    let chassis = CoupledChassis::new(motor, motor, 0.0762, 0.5, 25.0).unwrap();

    c.bench_function("CausalTrajGen::generate::quarter_turn", |b| {
        b.iter(|| generate_all(&arcs, &chassis))
    });

    c.bench_function("ArcParameterizer+CausalTrajGen::quarter_turn", |b| {
        b.iter(|| {
            let arcs = parameterizer.parameterize_all(&splines).unwrap();
            generate_all(&arcs, &chassis)
        })
    });
}

criterion_group!(benches, coupled_pipeline_benchmark);
criterion_main!(benches);
