//! # Causal trajectory generator
//!
//! Walks a motion profile along the arc length of a sequence of curves. At every step the
//! profile's velocity and acceleration limits are re-clamped from the chassis model at the
//! current position on the path. The generator has no lookahead: an upcoming sharp turn is only
//! reacted to once the chassis reaches it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace, warn};
use std::f64::consts::{PI, TAU};

use super::{
    CoupledChassis, CoupledConfigurationState, CoupledError, CoupledKinematicState, CoupledState,
    CoupledWheelState,
};
use crate::{
    geom::{Vec2, Vec2Ext},
    path::{total_length, Curve, PathError},
    profile::{Profile, ProfileState, ACCELERATION, VELOCITY},
    transmission::DcTransmission,
};
use util::maths::{clamp, rem_euclid};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The trajectory is finished once the distance travelled is within this tolerance of the total
/// path length.
///
/// Units: meters
pub const FINISH_TOLERANCE_M: f64 = 1e-6;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Causal trajectory generator for a coupled chassis.
///
/// The generator holds no trajectory history: each call to [`generate`](Self::generate) is given
/// the previous state and returns the next one.
pub struct CausalTrajGen<T: DcTransmission, C: Curve, P: Profile> {
    chassis: CoupledChassis<T>,
    config: Option<Configuration<C, P>>,
}

/// The path and profile bound by [`CausalTrajGen::configure`].
struct Configuration<C, P> {
    curves: Vec<C>,

    /// Distance along the path at which each curve starts
    starts: Vec<f64>,

    total_length: f64,

    profile: P,
}

/// The path geometry at one distance.
struct PathSample {
    position: Vec2,
    heading: f64,
    curvature: f64,
    dcurvature: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<T: DcTransmission, C: Curve, P: Profile> CausalTrajGen<T, C, P> {
    /// Create a new, unconfigured generator for the given chassis.
    pub fn new(chassis: CoupledChassis<T>) -> Self {
        Self {
            chassis,
            config: None,
        }
    }

    /// Bind the path to follow and the profile to follow it with, replacing any previous
    /// configuration.
    pub fn configure(&mut self, curves: Vec<C>, profile: P) {
        let mut starts = Vec::with_capacity(curves.len());
        let mut distance = 0.0;
        for curve in &curves {
            starts.push(distance);
            distance += curve.length();
        }

        let total_length = total_length(&curves);

        if curves.is_empty() {
            warn!("Trajectory generator configured with an empty path");
        } else {
            debug!(
                "Trajectory generator configured with {} curves ({:.3} m)",
                curves.len(),
                total_length
            );
        }

        self.config = Some(Configuration {
            curves,
            starts,
            total_length,
            profile,
        });
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub fn chassis(&self) -> &CoupledChassis<T> {
        &self.chassis
    }

    /// The configured profile, `None` before [`configure`](Self::configure).
    pub fn profile(&self) -> Option<&P> {
        self.config.as_ref().map(|c| &c.profile)
    }

    /// The configured curves, `None` before [`configure`](Self::configure).
    pub fn curves(&self) -> Option<&[C]> {
        self.config.as_ref().map(|c| c.curves.as_slice())
    }

    /// Total length of the configured path, `None` before [`configure`](Self::configure).
    ///
    /// Units: meters
    pub fn total_length(&self) -> Option<f64> {
        self.config.as_ref().map(|c| c.total_length)
    }

    /// The state at rest at the start of the configured path at the given time.
    pub fn initial_state(&self, time: f64) -> Result<CoupledState, CoupledError> {
        let config = self.config.as_ref().ok_or(CoupledError::NotConfigured)?;

        let here = match config.sample(0.0)? {
            Some(s) => s,
            None => return Ok(Self::empty_path_state(time)),
        };

        Ok(CoupledState {
            time,
            curvature: here.curvature,
            dcurvature: here.dcurvature,
            configuration: CoupledConfigurationState {
                position: here.position,
                heading: here.heading,
            },
            kinematics: CoupledKinematicState::default(),
            finished: config.total_length <= FINISH_TOLERANCE_M,
        })
    }

    /// Generate the state at `time` following on from `last`.
    pub fn generate(&mut self, last: &CoupledState, time: f64) -> Result<CoupledState, CoupledError> {
        let chassis = &self.chassis;
        let config = self.config.as_mut().ok_or(CoupledError::NotConfigured)?;

        let here = match config.sample(last.kinematics.distance)? {
            Some(s) => s,
            None => return Ok(Self::empty_path_state(time)),
        };

        // ---- DYNAMIC LIMITS ----

        let velocity = last.kinematics.velocity;
        let pose = &last.configuration;

        let vel_limit = chassis.linear_velocity_limit(pose, here.curvature);
        let (mut acc_min, mut acc_max) =
            chassis.acceleration_limit_along(pose, here.curvature, here.dcurvature, velocity);

        // The envelope shrinks as the wheels speed up, so also require it to hold at the
        // velocity reached at the end of the step
        let dt = time - last.time;
        if dt > 0.0 {
            let (_, end_max) = chassis.acceleration_limit_along(
                pose,
                here.curvature,
                here.dcurvature,
                velocity + acc_max * dt,
            );
            let (end_min, _) = chassis.acceleration_limit_along(
                pose,
                here.curvature,
                here.dcurvature,
                velocity + acc_min * dt,
            );

            let lo = acc_min.max(end_min);
            let hi = acc_max.min(end_max);
            if lo <= hi {
                acc_min = lo;
                acc_max = hi;
            } else {
                debug!(
                    "End of step acceleration envelope [{:.4}, {:.4}] is empty at t = {:.3} s",
                    lo, hi, time
                );
            }
        }

        let profile = &mut config.profile;
        profile.apply_limit(VELOCITY, -vel_limit, vel_limit)?;
        if profile.limited_term() >= ACCELERATION {
            profile.apply_limit(ACCELERATION, acc_min, acc_max)?;
        }
        profile.set_goal(config.total_length);

        // ---- ADVANCE ----

        let next = profile.calculate(&profile_state(last, profile.limited_term()), time)?;
        let distance = next.position();

        // Geometry at the new distance
        let there = match config.sample(distance)? {
            Some(s) => s,
            None => return Ok(Self::empty_path_state(time)),
        };

        let state = CoupledState {
            time,
            curvature: there.curvature,
            dcurvature: there.dcurvature,
            configuration: CoupledConfigurationState {
                position: there.position,
                heading: unwrap_angle(there.heading, last.configuration.heading),
            },
            kinematics: CoupledKinematicState {
                distance,
                velocity: next.velocity(),
                acceleration: next.acceleration(),
            },
            finished: distance >= config.total_length - FINISH_TOLERANCE_M,
        };

        trace!(
            "t = {:.3} s, d = {:.4} m, v = {:.4} m/s (max {:.4}), a = {:.4} m/s^2 ([{:.4}, {:.4}]), k = {:.4} 1/m",
            state.time,
            distance,
            state.kinematics.velocity,
            vel_limit,
            state.kinematics.acceleration,
            acc_min,
            acc_max,
            state.curvature
        );

        Ok(state)
    }

    /// Split a centre state into the `(left, right)` wheel states using the chassis.
    pub fn split(&self, state: &CoupledState) -> (CoupledWheelState, CoupledWheelState) {
        self.chassis.split(state)
    }

    fn empty_path_state(time: f64) -> CoupledState {
        CoupledState {
            time,
            finished: true,
            ..CoupledState::default()
        }
    }
}

impl<C: Curve, P> Configuration<C, P> {
    /// Geometry of the path at `distance`, clamped onto the path. `None` for an empty path.
    fn sample(&self, distance: f64) -> Result<Option<PathSample>, PathError> {
        if self.curves.is_empty() {
            return Ok(None);
        }

        let distance = clamp(distance, 0.0, self.total_length);

        // Last curve starting at or before the distance
        let index = self
            .starts
            .partition_point(|&start| start <= distance)
            .saturating_sub(1);
        let curve = &self.curves[index];
        let s = clamp(distance - self.starts[index], 0.0, curve.length());

        Ok(Some(PathSample {
            position: curve.position(s)?,
            heading: curve.rotation(s)?.polar_angle(),
            curvature: curve.curvature(s)?,
            dcurvature: curve.dcurvature(s)?,
        }))
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// The previous centre state as a profile state tracking terms `0..=limited_term`.
fn profile_state(last: &CoupledState, limited_term: usize) -> ProfileState {
    let k = last.kinematics.to_array();
    let kinematics = (0..=limited_term)
        .map(|i| k.get(i).copied().unwrap_or(0.0))
        .collect();

    ProfileState::new(last.time, kinematics)
}

/// The angle equal to `angle` modulo 2pi which is closest to `reference`.
fn unwrap_angle(angle: f64, reference: f64) -> f64 {
    reference + rem_euclid(angle - reference + PI, TAU) - PI
}
