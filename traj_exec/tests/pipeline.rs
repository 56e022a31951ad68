//! End to end planning of paths: splines, arcs, chassis and generator.

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use traj_lib::{
    coupled::{CausalTrajGen, CoupledState},
    geom::{Vec2, Vec2Ext},
    params::TrajExecParams,
    path::{AugmentedArc2d, CubicWaypoint, Curve, HermiteCubic, HermiteQuintic, QuinticWaypoint},
    profile::{Profile, TrapezoidalProfile},
    transmission::DcMotor,
};

type Generator = CausalTrajGen<DcMotor, AugmentedArc2d, TrapezoidalProfile>;

fn load_params() -> TrajExecParams {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../params/traj_exec.toml");
    util::params::load_from_path(path).unwrap()
}

/// Configure a generator from the parameter file's chassis and profile settings.
fn generator(params: &TrajExecParams, arcs: Vec<AugmentedArc2d>) -> Generator {
    let mut profile = TrapezoidalProfile::new();
    profile.set_timeslice(params.profile_timeslice_s);

    let mut gen = CausalTrajGen::new(params.chassis().unwrap());
    gen.configure(arcs, profile);
    gen
}

/// Step the generator from rest until it finishes, checking the per-step invariants on the way.
fn drive(gen: &mut Generator, params: &TrajExecParams) -> Vec<CoupledState> {
    let mut states: Vec<CoupledState> = vec![gen.initial_state(0.0).unwrap()];
    let mut cycle = 0;

    while !states.last().unwrap().finished {
        cycle += 1;
        let time = cycle as f64 * params.step_s;
        assert!(time <= params.time_limit_s, "not finished by {} s", time);

        let next = gen.generate(states.last().unwrap(), time).unwrap();
        states.push(next);
    }

    for pair in states.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);

        // Distance never decreases and the heading never jumps
        assert!(b.kinematics.distance >= a.kinematics.distance);
        assert!((b.configuration.heading - a.configuration.heading).abs() < 0.1);
    }

    for state in &states {
        assert!(state.to_array().iter().all(|v| v.is_finite()));

        let (left, right) = gen.split(state);
        assert!(left.to_array().iter().all(|v| v.is_finite()));
        assert!(right.to_array().iter().all(|v| v.is_finite()));
    }

    let last = states.last().unwrap();
    assert_abs_diff_eq!(last.kinematics.distance, gen.total_length().unwrap(), epsilon = 1e-6);
    assert_abs_diff_eq!(last.kinematics.velocity, 0.0, epsilon = 1e-6);

    states
}

/// Largest wheel voltage magnitude over the run.
fn peak_voltage(gen: &Generator, states: &[CoupledState]) -> f64 {
    states
        .iter()
        .map(|s| {
            let (left, right) = gen.split(s);
            left.voltage.abs().max(right.voltage.abs())
        })
        .fold(0.0, f64::max)
}

#[test]
fn test_plan_quarter_turn() {
    let params = load_params();

    let splines = HermiteQuintic::from_waypoints(&params.quintic_waypoints());
    assert_eq!(splines.len(), 1);

    let parameterizer = params.arc_parameterizer().unwrap();
    let arcs = parameterizer.parameterize_all(&splines).unwrap();
    assert_eq!(arcs.len(), parameterizer.curve_count_all(&splines).unwrap());

    for arc in &arcs {
        assert!(arc.length() <= params.max_arc_length_m + 1e-12);
        assert!(
            (arc.curvature_end() - arc.curvature_start()).abs()
                <= params.max_delta_curvature_m + 1e-12
        );
    }

    let mut gen = generator(&params, arcs);
    let states = drive(&mut gen, &params);

    let nominal_voltage = params.motor.nominal_voltage_v;
    let peak = peak_voltage(&gen, &states);
    assert!(peak <= nominal_voltage * 1.05, "peak wheel voltage {}", peak);

    let last = states.last().unwrap();
    assert!(last.configuration.position.approx_eq(&Vec2::new(4.0, 4.0)));
    assert_abs_diff_eq!(
        last.configuration.heading,
        std::f64::consts::FRAC_PI_2,
        epsilon = 1e-3
    );
}

#[test]
fn test_plan_quintic_s_curve() {
    let params = load_params();

    // Curvature is continuous where the splines meet
    let waypoints = [
        QuinticWaypoint::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::zeros()),
        QuinticWaypoint::new(Vec2::new(2.0, 1.0), Vec2::new(3.0, 0.0), Vec2::zeros()),
        QuinticWaypoint::new(Vec2::new(4.0, 0.0), Vec2::new(3.0, 0.0), Vec2::zeros()),
    ];
    let splines = HermiteQuintic::from_waypoints(&waypoints);
    assert_eq!(splines.len(), 2);

    let arcs = params.arc_parameterizer().unwrap().parameterize_all(&splines).unwrap();
    let mut gen = generator(&params, arcs);
    let states = drive(&mut gen, &params);

    // Without lookahead the envelope lags the changing curvature, so the voltage briefly exceeds
    // nominal
    let peak = peak_voltage(&gen, &states);
    assert!(
        peak <= params.motor.nominal_voltage_v * 1.10,
        "peak wheel voltage {}",
        peak
    );

    let last = states.last().unwrap();
    assert!(last.configuration.position.approx_eq(&Vec2::new(4.0, 0.0)));
    assert_abs_diff_eq!(last.configuration.heading, 0.0, epsilon = 1e-3);
}

#[test]
fn test_plan_cubic_chain() {
    let params = load_params();

    // Cubic splines only share a tangent, so the curvature steps where they meet
    let waypoints = [
        CubicWaypoint::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0)),
        CubicWaypoint::new(Vec2::new(2.0, 1.0), Vec2::new(3.0, 0.0)),
        CubicWaypoint::new(Vec2::new(4.0, 0.0), Vec2::new(3.0, 0.0)),
    ];
    let splines = HermiteCubic::from_waypoints(&waypoints);
    assert_eq!(splines.len(), 2);

    let arcs = params.arc_parameterizer().unwrap().parameterize_all(&splines).unwrap();
    let mut gen = generator(&params, arcs);
    let states = drive(&mut gen, &params);

    // The step in curvature is taken at speed, which the causal envelope only sees after the fact
    let peak = peak_voltage(&gen, &states);
    assert!(
        peak <= params.motor.nominal_voltage_v * 1.15,
        "peak wheel voltage {}",
        peak
    );

    let last = states.last().unwrap();
    assert!(last.configuration.position.approx_eq(&Vec2::new(4.0, 0.0)));
    assert_abs_diff_eq!(last.configuration.heading, 0.0, epsilon = 1e-3);
}
