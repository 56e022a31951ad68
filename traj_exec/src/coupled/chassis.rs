//! # Coupled chassis
//!
//! Kinematic and dynamic model of a differential drivetrain.
//!
//! Conventions:
//! - Positive curvature turns left (counter-clockwise).
//! - The left wheel sits at `centre + R(heading) * (0, track_radius)`, the right wheel at
//!   `centre - R(heading) * (0, track_radius)`.
//! - Wheel speeds scale the centre speed by `1 - k * track_radius` (left) and
//!   `1 + k * track_radius` (right).
//! - Each side accelerates half of the chassis mass.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Rotation2;

use super::{CoupledConfigurationState, CoupledError, CoupledKinematicState, CoupledState, CoupledWheelState};
use crate::{geom::Vec2, transmission::DcTransmission};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Above this curvature the chassis is treated as turning on the spot and cannot move forward.
///
/// Units: 1/meters
const MAX_CURVATURE: f64 = 1e10;

/// Wheel scale factors smaller than this are treated as a stationary wheel, which places no
/// limit on the chassis.
const MIN_WHEEL_FACTOR: f64 = 1e-10;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A differential drivetrain with one transmission per side.
#[derive(Debug, Clone)]
pub struct CoupledChassis<T: DcTransmission> {
    left: T,
    right: T,

    /// Units: meters
    wheel_radius: f64,

    /// Half of the distance between the left and right wheels.
    ///
    /// Units: meters
    track_radius: f64,

    /// Units: kilograms
    mass: f64,
}

/// Per-wheel quantities used when iterating over both sides.
struct Side<'a, T> {
    transmission: &'a T,

    /// Factor scaling the centre speed into this wheel's speed
    factor: f64,

    /// -1 for the left wheel, +1 for the right
    sign: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<T: DcTransmission> CoupledChassis<T> {
    /// Create a new chassis.
    ///
    /// The wheel radius, track radius and mass must be finite and greater than zero.
    pub fn new(
        left: T,
        right: T,
        wheel_radius: f64,
        track_radius: f64,
        mass: f64,
    ) -> Result<Self, CoupledError> {
        for (name, value) in &[
            ("wheel radius", wheel_radius),
            ("track radius", track_radius),
            ("mass", mass),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                return Err(CoupledError::InvalidChassis(format!(
                    "the {} must be finite and greater than zero, got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            left,
            right,
            wheel_radius,
            track_radius,
            mass,
        })
    }

    pub fn left(&self) -> &T {
        &self.left
    }

    pub fn right(&self) -> &T {
        &self.right
    }

    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    pub fn track_radius(&self) -> f64 {
        self.track_radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Maximum centre speed at the given curvature such that neither wheel exceeds its
    /// transmission's free speed at nominal voltage.
    ///
    /// Units: meters/second
    pub fn linear_velocity_limit(
        &self,
        _configuration: &CoupledConfigurationState,
        curvature: f64,
    ) -> f64 {
        if curvature.abs() > MAX_CURVATURE {
            return 0.0;
        }

        self.sides(curvature)
            .iter()
            .filter(|s| s.factor.abs() >= MIN_WHEEL_FACTOR)
            .map(|s| {
                let t = s.transmission;
                t.free_speed(t.nominal_voltage()) * self.wheel_radius / s.factor.abs()
            })
            .fold(std::f64::INFINITY, f64::min)
    }

    /// Centre acceleration envelope `(min, max)` at the given curvature and speed such that
    /// neither wheel needs more torque than its transmission produces at nominal voltage.
    ///
    /// Units: meters/second^2
    pub fn acceleration_limit(
        &self,
        configuration: &CoupledConfigurationState,
        curvature: f64,
        velocity: f64,
    ) -> (f64, f64) {
        self.acceleration_limit_along(configuration, curvature, 0.0, velocity)
    }

    /// As [`acceleration_limit`](Self::acceleration_limit), also accounting for the wheel
    /// acceleration caused by the curvature changing along the path (`dcurvature`, in 1/m^2).
    ///
    /// If the two wheels' envelopes do not overlap the envelope collapses onto its upper bound.
    pub fn acceleration_limit_along(
        &self,
        _configuration: &CoupledConfigurationState,
        curvature: f64,
        dcurvature: f64,
        velocity: f64,
    ) -> (f64, f64) {
        // Wheel torque per unit of wheel acceleration
        let k = 0.5 * self.mass * self.wheel_radius;

        let mut lo = std::f64::NEG_INFINITY;
        let mut hi = std::f64::INFINITY;

        for side in self.sides(curvature).iter() {
            if side.factor.abs() < MIN_WHEEL_FACTOR {
                continue;
            }

            let t = side.transmission;
            let speed = velocity * side.factor / self.wheel_radius;
            let torque_max = t.torque(t.current(t.nominal_voltage(), speed));
            let torque_min = t.torque(t.current(-t.nominal_voltage(), speed));

            // Wheel acceleration is factor * a + offset
            let offset = side.sign * velocity * velocity * dcurvature * self.track_radius;
            let a = (torque_min / k - offset) / side.factor;
            let b = (torque_max / k - offset) / side.factor;
            let (side_lo, side_hi) = if side.factor > 0.0 { (a, b) } else { (b, a) };

            lo = lo.max(side_lo);
            hi = hi.min(side_hi);
        }

        if lo > hi {
            lo = hi;
        }

        (lo, hi)
    }

    /// Split a centre state into the `(left, right)` wheel states.
    pub fn split(&self, centre: &CoupledState) -> (CoupledWheelState, CoupledWheelState) {
        let offset = Rotation2::new(centre.configuration.heading) * Vec2::new(0.0, self.track_radius);
        let [left, right] = self.sides(centre.curvature);

        (
            self.wheel_state(centre, &left, centre.configuration.position + offset),
            self.wheel_state(centre, &right, centre.configuration.position - offset),
        )
    }

    fn wheel_state(&self, centre: &CoupledState, side: &Side<T>, position: Vec2) -> CoupledWheelState {
        let k = &centre.kinematics;
        let t = side.transmission;

        let velocity = k.velocity * side.factor;
        let acceleration = k.acceleration * side.factor
            + side.sign * k.velocity * k.velocity * centre.dcurvature * self.track_radius;

        let torque = 0.5 * self.mass * acceleration * self.wheel_radius;
        let current = t.torque_current(torque);
        let voltage = t.free_voltage(velocity / self.wheel_radius) + t.current_voltage(current);

        CoupledWheelState {
            time: centre.time,
            position,
            kinematics: CoupledKinematicState {
                distance: k.distance * side.factor,
                velocity,
                acceleration,
            },
            voltage,
            current,
            finished: centre.finished,
        }
    }

    /// Left and right wheels at the given curvature.
    fn sides(&self, curvature: f64) -> [Side<T>; 2] {
        [
            Side {
                transmission: &self.left,
                factor: 1.0 - curvature * self.track_radius,
                sign: -1.0,
            },
            Side {
                transmission: &self.right,
                factor: 1.0 + curvature * self.track_radius,
                sign: 1.0,
            },
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transmission::{rpm_to_rad, DcMotor};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    fn motor() -> DcMotor {
        DcMotor::new(
            12.0,
            rpm_to_rad(5330.0) / 12.75,
            2.0 * 2.7,
            2.0 * 131.0,
            2.0 * 2.41 * 12.75,
        )
        .unwrap()
    }

    fn chassis() -> CoupledChassis<DcMotor> {
        CoupledChassis::new(motor(), motor(), 0.0762, 0.5, 25.0).unwrap()
    }

    fn config() -> CoupledConfigurationState {
        CoupledConfigurationState::default()
    }

    #[test]
    fn test_invalid_chassis() {
        assert!(matches!(
            CoupledChassis::new(motor(), motor(), 0.0, 0.5, 25.0),
            Err(CoupledError::InvalidChassis(_))
        ));
        assert!(matches!(
            CoupledChassis::new(motor(), motor(), 0.1, -0.5, 25.0),
            Err(CoupledError::InvalidChassis(_))
        ));
        assert!(matches!(
            CoupledChassis::new(motor(), motor(), 0.1, 0.5, std::f64::NAN),
            Err(CoupledError::InvalidChassis(_))
        ));
    }

    #[test]
    fn test_straight_line_limits() {
        let c = chassis();
        let m = motor();

        let v_max = m.nominal_free_speed() * 0.0762;
        assert_relative_eq!(c.linear_velocity_limit(&config(), 0.0), v_max, max_relative = 1e-12);

        // At rest the envelope is the stall torque of both transmissions pushing the whole mass
        let (lo, hi) = c.acceleration_limit(&config(), 0.0, 0.0);
        let a_stall = 2.0 * m.stall_torque() / (25.0 * 0.0762);
        assert_relative_eq!(hi, a_stall, max_relative = 1e-12);
        assert_relative_eq!(lo, -a_stall, max_relative = 1e-12);

        // At free speed no more forward acceleration is available
        let (_, hi) = c.acceleration_limit(&config(), 0.0, v_max);
        assert_abs_diff_eq!(hi, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_curvature_reduces_limits() {
        let c = chassis();

        // The outer wheel is the binding constraint, whichever way the chassis turns
        let straight = c.linear_velocity_limit(&config(), 0.0);
        let left = c.linear_velocity_limit(&config(), 0.5);
        let right = c.linear_velocity_limit(&config(), -0.5);
        assert_relative_eq!(left, straight / 1.25, max_relative = 1e-12);
        assert_relative_eq!(left, right, max_relative = 1e-12);

        let (lo0, hi0) = c.acceleration_limit(&config(), 0.0, 1.0);
        let (lo, hi) = c.acceleration_limit(&config(), 0.5, 1.0);
        assert!(hi < hi0);
        assert!(lo > lo0);

        // Turning on the spot
        assert_eq!(c.linear_velocity_limit(&config(), 1e11), 0.0);
    }

    #[test]
    fn test_limits_are_continuous() {
        let c = chassis();

        for &k in &[-1.5, -0.3, 0.0, 0.4, 1.9] {
            let dk = 1e-7;
            let v0 = c.linear_velocity_limit(&config(), k);
            let v1 = c.linear_velocity_limit(&config(), k + dk);
            assert!((v0 - v1).abs() < 1e-5);

            let (lo0, hi0) = c.acceleration_limit(&config(), k, 1.0);
            let (lo1, hi1) = c.acceleration_limit(&config(), k + dk, 1.0 + 1e-7);
            assert!((lo0 - lo1).abs() < 1e-4);
            assert!((hi0 - hi1).abs() < 1e-4);
        }
    }

    #[test]
    fn test_split_kinematics() {
        let c = chassis();
        let centre = CoupledState {
            time: 2.0,
            curvature: 0.4,
            dcurvature: 0.1,
            configuration: CoupledConfigurationState {
                position: Vec2::new(1.0, 2.0),
                heading: FRAC_PI_2,
            },
            kinematics: CoupledKinematicState {
                distance: 3.0,
                velocity: 1.5,
                acceleration: 0.5,
            },
            finished: false,
        };

        let (l, r) = c.split(&centre);

        // Heading north, the left wheel is to the west
        assert_abs_diff_eq!(l.position.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(l.position.y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.position.x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(r.position.y, 2.0, epsilon = 1e-12);

        assert_relative_eq!(l.kinematics.velocity, 1.5 * 0.8, max_relative = 1e-12);
        assert_relative_eq!(r.kinematics.velocity, 1.5 * 1.2, max_relative = 1e-12);
        assert_relative_eq!(l.kinematics.distance, 3.0 * 0.8, max_relative = 1e-12);
        assert_relative_eq!(
            l.kinematics.acceleration,
            0.5 - (0.5 * 0.4 + 1.5 * 1.5 * 0.1) * 0.5,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            r.kinematics.acceleration,
            0.5 + (0.5 * 0.4 + 1.5 * 1.5 * 0.1) * 0.5,
            max_relative = 1e-12
        );

        // Centre speed is the mean of the wheel speeds, yaw rate their difference
        assert_relative_eq!(
            0.5 * (l.kinematics.velocity + r.kinematics.velocity),
            1.5,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            (r.kinematics.velocity - l.kinematics.velocity) / (2.0 * 0.5),
            1.5 * 0.4,
            max_relative = 1e-12
        );

        assert_eq!(l.time, 2.0);
        assert!(!r.finished);
    }

    #[test]
    fn test_split_voltage_at_envelope_edge() {
        let c = chassis();

        // Accelerating at the envelope limit needs exactly the nominal voltage on the limiting
        // wheel
        for &(k, v) in &[(0.0, 0.0), (0.0, 1.0), (0.6, 1.2), (-0.3, 2.0)] {
            let (_, hi) = c.acceleration_limit(&config(), k, v);
            let centre = CoupledState {
                curvature: k,
                kinematics: CoupledKinematicState {
                    distance: 0.0,
                    velocity: v,
                    acceleration: hi,
                },
                ..CoupledState::default()
            };

            let (l, r) = c.split(&centre);
            let v_max = l.voltage.max(r.voltage);
            assert_relative_eq!(v_max, 12.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_dcurvature_shifts_envelope() {
        let c = chassis();

        let (_, hi) = c.acceleration_limit(&config(), 0.5, 2.0);
        let (_, hi_d) = c.acceleration_limit_along(&config(), 0.5, 0.5, 2.0);

        // The outer wheel is binding and tightening the turn makes it work harder
        assert!(hi_d < hi);

        // The split uses the same wheel dynamics, so the limit still lands on nominal voltage
        let centre = CoupledState {
            curvature: 0.5,
            dcurvature: 0.5,
            kinematics: CoupledKinematicState {
                distance: 0.0,
                velocity: 2.0,
                acceleration: hi_d,
            },
            ..CoupledState::default()
        };
        let (l, r) = c.split(&centre);
        assert_relative_eq!(l.voltage.max(r.voltage), 12.0, max_relative = 1e-9);
    }

    #[test]
    fn test_boxed_transmissions() {
        let boxed: CoupledChassis<Box<dyn DcTransmission>> = CoupledChassis::new(
            Box::new(motor()) as Box<dyn DcTransmission>,
            Box::new(motor()) as Box<dyn DcTransmission>,
            0.0762,
            0.5,
            25.0,
        )
        .unwrap();

        assert_relative_eq!(
            boxed.linear_velocity_limit(&config(), 0.2),
            chassis().linear_velocity_limit(&config(), 0.2),
            max_relative = 1e-12
        );
    }
}
