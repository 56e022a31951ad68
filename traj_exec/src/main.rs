//! # Trajectory Executable
//!
//! Plans a trajectory for a coupled chassis along the path described in the parameter file. The
//! path is built from quintic Hermite splines, reparameterised into arcs and then walked by the
//! causal trajectory generator from t = 0 in fixed steps until the end of the path is reached.
//!
//! Every centre state and both wheel states are archived into the session directory, and a
//! summary of the run is saved alongside them.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{debug, info, warn};
use serde::Serialize;

use traj_lib::{
    coupled::CausalTrajGen,
    params::TrajExecParams,
    path::HermiteQuintic,
    profile::{Profile, TrapezoidalProfile},
};
use util::{
    archive::Archiver,
    host,
    logger::logger_init,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Summary of one planning run, saved into the session.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    num_splines: usize,
    num_arcs: usize,
    total_length_m: f64,
    num_states: usize,
    finished: bool,
    finish_time_s: f64,
    max_velocity_ms: f64,
    max_abs_voltage_v: f64,
    max_abs_current_a: f64,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("traj_exec", "sessions").wrap_err("Failed to create the session")?;

    // Parameters come first as they hold the log levels
    let params: TrajExecParams =
        util::params::load("traj_exec.toml").wrap_err("Could not load traj_exec params")?;

    // Initialise logger
    logger_init(&params.logging, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Trajectory Executable\n");
    info!(
        "Software root: {:?}",
        host::get_sw_root().wrap_err("Failed to get the software root")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- PATH ----

    let splines = HermiteQuintic::from_waypoints(&params.quintic_waypoints());
    if splines.is_empty() {
        return Err(eyre!("At least two waypoints are required to build a path"));
    }

    let parameterizer = params
        .arc_parameterizer()
        .wrap_err("Invalid arc parameterizer bounds")?;
    let arcs = parameterizer
        .parameterize_all(&splines)
        .wrap_err("Failed to parameterize the path")?;

    let mut summary = RunSummary {
        num_splines: splines.len(),
        num_arcs: arcs.len(),
        ..Default::default()
    };

    info!(
        "Path built from {} splines into {} arcs",
        summary.num_splines, summary.num_arcs
    );

    // ---- GENERATOR ----

    let chassis = params.chassis().wrap_err("Failed to build the chassis")?;

    let mut profile = TrapezoidalProfile::new();
    profile.set_timeslice(params.profile_timeslice_s);

    let mut gen = CausalTrajGen::new(chassis);
    gen.configure(arcs, profile);

    summary.total_length_m = gen.total_length().unwrap_or(0.0);
    info!("Path length: {:.3} m", summary.total_length_m);

    // ---- ARCHIVES ----

    let mut centre_arch =
        Archiver::from_path(&session, "centre.csv").wrap_err("Failed to create centre archive")?;
    let mut left_arch =
        Archiver::from_path(&session, "left.csv").wrap_err("Failed to create left archive")?;
    let mut right_arch =
        Archiver::from_path(&session, "right.csv").wrap_err("Failed to create right archive")?;

    // ---- MAIN LOOP ----

    info!("Beginning generation\n");

    let mut state = gen
        .initial_state(0.0)
        .wrap_err("Failed to get the initial state")?;
    let mut cycle: u64 = 0;

    loop {
        let (left, right) = gen.split(&state);

        centre_arch
            .serialise(state.to_array())
            .wrap_err("Failed to archive the centre state")?;
        left_arch
            .serialise(left.to_array())
            .wrap_err("Failed to archive the left wheel state")?;
        right_arch
            .serialise(right.to_array())
            .wrap_err("Failed to archive the right wheel state")?;

        summary.num_states += 1;
        summary.max_velocity_ms = summary.max_velocity_ms.max(state.kinematics.velocity.abs());
        for wheel in &[left, right] {
            summary.max_abs_voltage_v = summary.max_abs_voltage_v.max(wheel.voltage.abs());
            summary.max_abs_current_a = summary.max_abs_current_a.max(wheel.current.abs());
        }

        if state.finished {
            summary.finished = true;
            summary.finish_time_s = state.time;
            info!("Trajectory finished at {:.3} s", state.time);
            break;
        }

        cycle += 1;
        let time = cycle as f64 * params.step_s;

        if time > params.time_limit_s {
            warn!(
                "Trajectory not finished within {:.3} s, stopped at {:.3} m of {:.3} m",
                params.time_limit_s, state.kinematics.distance, summary.total_length_m
            );
            summary.finish_time_s = state.time;
            break;
        }

        state = gen
            .generate(&state, time)
            .wrap_err_with(|| format!("Failed to generate the state at {:.3} s", time))?;
    }

    // ---- SUMMARY ----

    debug!(
        "Run summary:\n{}",
        serde_json::to_string_pretty(&summary).wrap_err("Failed to serialise the summary")?
    );
    session
        .save("summary.json", &summary)
        .wrap_err("Failed to save the summary")?;

    info!(
        "Peak wheel voltage {:.2} V, peak wheel current {:.2} A",
        summary.max_abs_voltage_v, summary.max_abs_current_a
    );

    Ok(())
}
