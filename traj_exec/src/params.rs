//! # Trajectory Executable Parameters
//!
//! This module provides the parameters for the trajectory executable, and the conversions from
//! them into the library's path, motor and chassis types.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{
    coupled::{CoupledChassis, CoupledError},
    geom::Vec2,
    path::{ArcParameterizer, PathError, QuinticWaypoint},
    transmission::{rpm_to_rad, DcMotor, TransmissionError},
};
use util::logger::LogConfig;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the trajectory executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajExecParams {
    // ---- PATH ----
    /// Waypoints the path passes through, in order.
    pub waypoints: Vec<WaypointParams>,

    /// Maximum length of one arc produced by the parameterizer.
    ///
    /// Units: meters
    pub max_arc_length_m: f64,

    /// Maximum change of curvature across one arc.
    ///
    /// Units: 1/meters
    pub max_delta_curvature_m: f64,

    // ---- DRIVETRAIN ----
    /// Motor nameplate data, identical on both sides.
    pub motor: MotorParams,

    /// The radius of the wheels.
    ///
    /// Units: meters
    pub wheel_radius_m: f64,

    /// Half the distance between the left and right wheels.
    ///
    /// Units: meters
    pub track_radius_m: f64,

    /// Total mass of the chassis.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    // ---- GENERATION ----
    /// Integration timeslice of the motion profile.
    ///
    /// Units: seconds
    pub profile_timeslice_s: f64,

    /// Period between two generated states.
    ///
    /// Units: seconds
    pub step_s: f64,

    /// Generation is abandoned if the trajectory has not finished by this time.
    ///
    /// Units: seconds
    pub time_limit_s: f64,

    // ---- LOGGING ----
    /// Log levels for the executable, defaulting to `debug` everywhere.
    #[serde(default)]
    pub logging: LogConfig,
}

/// One quintic waypoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaypointParams {
    /// Units: meters
    pub position_m: [f64; 2],

    /// First derivative of the position with respect to the spline parameter.
    pub tangent: [f64; 2],

    /// Second derivative of the position with respect to the spline parameter.
    #[serde(default)]
    pub dtangent: [f64; 2],
}

/// Nameplate data of the motors driving one side of the chassis, and the gearing to the wheel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotorParams {
    /// Units: volts
    pub nominal_voltage_v: f64,

    /// Units: revolutions/minute, at the motor shaft
    pub free_speed_rpm: f64,

    /// Units: amperes, for a single motor
    pub free_current_a: f64,

    /// Units: amperes, for a single motor
    pub stall_current_a: f64,

    /// Units: newton meters, at the motor shaft of a single motor
    pub stall_torque_nm: f64,

    /// Number of identical motors geared together on one side.
    pub motors_per_side: u32,

    /// Reduction from the motor shaft to the wheel.
    pub gear_ratio: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl TrajExecParams {
    /// The waypoints as library waypoints.
    pub fn quintic_waypoints(&self) -> Vec<QuinticWaypoint> {
        self.waypoints.iter().map(WaypointParams::to_waypoint).collect()
    }

    pub fn arc_parameterizer(&self) -> Result<ArcParameterizer, PathError> {
        ArcParameterizer::new(self.max_arc_length_m, self.max_delta_curvature_m)
    }

    /// Build the chassis, using the same motor on both sides.
    pub fn chassis(&self) -> Result<CoupledChassis<DcMotor>, ChassisParamsError> {
        let motor = self.motor.to_motor()?;

        Ok(CoupledChassis::new(
            motor,
            motor,
            self.wheel_radius_m,
            self.track_radius_m,
            self.mass_kg,
        )?)
    }
}

impl WaypointParams {
    pub fn to_waypoint(&self) -> QuinticWaypoint {
        QuinticWaypoint::new(
            Vec2::from(self.position_m),
            Vec2::from(self.tangent),
            Vec2::from(self.dtangent),
        )
    }
}

impl MotorParams {
    /// The equivalent single motor seen at the wheel.
    ///
    /// Motors geared together add their currents and torques, and the gearbox divides the speed
    /// and multiplies the torque by the ratio.
    pub fn to_motor(&self) -> Result<DcMotor, TransmissionError> {
        let n = self.motors_per_side as f64;

        DcMotor::new(
            self.nominal_voltage_v,
            rpm_to_rad(self.free_speed_rpm) / self.gear_ratio,
            n * self.free_current_a,
            n * self.stall_current_a,
            n * self.stall_torque_nm * self.gear_ratio,
        )
    }
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised while building the chassis from its parameters.
#[derive(Debug, thiserror::Error)]
pub enum ChassisParamsError {
    #[error("Invalid motor parameters: {0}")]
    Motor(#[from] TransmissionError),

    #[error("Invalid chassis parameters: {0}")]
    Chassis(#[from] CoupledError),
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use util::logger::LevelFilter;

    const PARAMS: &str = r#"
        max_arc_length_m = 0.01
        max_delta_curvature_m = 0.01
        wheel_radius_m = 0.0762
        track_radius_m = 0.5
        mass_kg = 25.0
        profile_timeslice_s = 0.001
        step_s = 0.01
        time_limit_s = 5.0

        [motor]
        nominal_voltage_v = 12.0
        free_speed_rpm = 5330.0
        free_current_a = 2.7
        stall_current_a = 131.0
        stall_torque_nm = 2.41
        motors_per_side = 2
        gear_ratio = 12.75

        [logging]
        level = "info"

        [logging.targets]
        "traj_lib::coupled::causal_traj_gen" = "trace"

        [[waypoints]]
        position_m = [0.0, 0.0]
        tangent = [5.0, 0.0]

        [[waypoints]]
        position_m = [4.0, 4.0]
        tangent = [0.0, 5.0]
        dtangent = [0.0, 0.0]
    "#;

    #[test]
    fn test_parse() {
        let params: TrajExecParams = toml::from_str(PARAMS).unwrap();

        let waypoints = params.quintic_waypoints();
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[1].position, Vec2::new(4.0, 4.0));
        assert_eq!(waypoints[0].tangent, Vec2::new(5.0, 0.0));
        assert_eq!(waypoints[0].dtangent, Vec2::zeros());

        assert_eq!(params.arc_parameterizer().unwrap().max_arc_length(), 0.01);

        assert_eq!(params.logging.min_level().unwrap(), LevelFilter::Info);
        assert_eq!(
            params.logging.target_levels().unwrap(),
            vec![(
                "traj_lib::coupled::causal_traj_gen".to_string(),
                LevelFilter::Trace
            )]
        );
    }

    #[test]
    fn test_logging_defaults() {
        let without_logging: String = PARAMS
            .lines()
            .filter(|l| !l.contains("level") && !l.contains("logging") && !l.contains("traj_lib"))
            .collect::<Vec<_>>()
            .join("\n");
        let params: TrajExecParams = toml::from_str(&without_logging).unwrap();

        assert_eq!(params.logging, LogConfig::default());
        assert_eq!(params.waypoints.len(), 2);
    }

    #[test]
    fn test_geared_motor() {
        let params: TrajExecParams = toml::from_str(PARAMS).unwrap();
        let motor = params.motor.to_motor().unwrap();

        assert_relative_eq!(motor.nominal_free_speed(), rpm_to_rad(5330.0) / 12.75);
        assert_relative_eq!(motor.stall_current(), 262.0);
        assert_relative_eq!(motor.stall_torque(), 2.0 * 2.41 * 12.75);

        let chassis = params.chassis().unwrap();
        assert_eq!(chassis.wheel_radius(), 0.0762);
    }

    #[test]
    fn test_invalid_chassis() {
        let mut params: TrajExecParams = toml::from_str(PARAMS).unwrap();
        params.mass_kg = 0.0;
        assert!(matches!(params.chassis(), Err(ChassisParamsError::Chassis(_))));

        params.mass_kg = 25.0;
        params.motor.stall_current_a = 0.0;
        assert!(matches!(params.chassis(), Err(ChassisParamsError::Motor(_))));
    }
}
