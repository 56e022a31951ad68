//! # Trapezoidal profile
//!
//! An acceleration limited profile. Each sub-step picks one of three implicit phases from the
//! current state:
//!
//! - ramp-up: accelerate toward the goal at the maximum allowed acceleration,
//! - hold: cruise at the velocity limit,
//! - ramp-down: decelerate at exactly the rate which stops the profile on the goal.
//!
//! Everything is computed in a frame normalised to the direction of the goal, so the same logic
//! serves goals on either side of the current position.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{Profile, ProfileError, ProfileState, ACCELERATION, POSITION, VELOCITY};
use util::maths::{clamp, sign_non_neg};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Default sub-step period.
///
/// Units: seconds
pub const DEFAULT_TIMESLICE_S: f64 = 0.001;

/// Position error and velocity below which the profile is considered settled on the goal.
const SETTLE_TOLERANCE: f64 = 1e-5;

/// Slack when counting sub-steps so that `dt` an exact multiple of the timeslice is not split
/// into an extra step by rounding.
const SLICE_COUNT_TOLERANCE: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Limits of a trapezoidal profile as `(min, max)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrapezoidalLimits {
    /// Units: meters/second
    pub velocity: (f64, f64),

    /// Units: meters/second^2
    pub acceleration: (f64, f64),
}

/// An acceleration limited (trapezoidal) profile.
///
/// A new profile has zero limits and will not move until limits are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TrapezoidalProfile {
    goal: f64,
    timeslice: f64,
    limits: TrapezoidalLimits,
}

/// Kinematics of a single sub-step.
#[derive(Debug, Clone, Copy)]
struct Step {
    position: f64,
    velocity: f64,
    acceleration: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for TrapezoidalProfile {
    fn default() -> Self {
        Self {
            goal: 0.0,
            timeslice: DEFAULT_TIMESLICE_S,
            limits: TrapezoidalLimits::default(),
        }
    }
}

impl TrapezoidalProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profile with the given `(min, max)` velocity and acceleration limits.
    pub fn with_limits(velocity: (f64, f64), acceleration: (f64, f64)) -> Result<Self, ProfileError> {
        let mut profile = Self::default();
        profile.apply_limit(VELOCITY, velocity.0, velocity.1)?;
        profile.apply_limit(ACCELERATION, acceleration.0, acceleration.1)?;
        Ok(profile)
    }

    pub fn limits(&self) -> TrapezoidalLimits {
        self.limits
    }

    /// Advance the kinematics by one sub-step of `h` seconds.
    fn step(&self, position: f64, velocity: f64, h: f64) -> Step {
        let goal = self.goal;
        let err = goal - position;

        if err.abs() < SETTLE_TOLERANCE && velocity.abs() < SETTLE_TOLERANCE {
            return Step {
                position: goal,
                velocity: 0.0,
                acceleration: 0.0,
            };
        }

        // Normalise so that the goal is in the +ve direction
        let sigma = sign_non_neg(err);
        let dist = sigma * err;
        let u = sigma * velocity;

        let (vel_min, vel_max) = self.limits.velocity;
        let (acc_min, acc_max) = self.limits.acceleration;
        let (u_min, u_max) = if sigma > 0.0 {
            (vel_min, vel_max)
        } else {
            (-vel_max, -vel_min)
        };
        let (acc_down, acc_up) = if sigma > 0.0 {
            (acc_min, acc_max)
        } else {
            (-acc_max, -acc_min)
        };
        let brake = -acc_down;

        // Would accelerating for this step leave enough room to stop?
        let u_proj = (u + acc_up * h).min(u_max);
        let proj_travel = 0.5 * (u + u_proj) * h;
        let ramp_down = u > 0.0
            && u_proj > 0.0
            && brake > 0.0
            && dist - proj_travel <= u_proj * u_proj / (2.0 * brake);

        let mut acc = if ramp_down {
            let acc = (-(u * u) / (2.0 * dist)).max(acc_down);

            // Stops short of the end of the step, so finish on the goal rather than reversing
            if 2.0 * dist <= u * h {
                return Step {
                    position: goal,
                    velocity: 0.0,
                    acceleration: sigma * acc,
                };
            }

            acc
        } else if u >= u_max - SETTLE_TOLERANCE {
            0.0
        } else {
            acc_up
        };

        // Respect the velocity limits, which may have moved since the last step
        let mut u_next = u + acc * h;
        if u_next > u_max {
            acc = clamp((u_max - u) / h, acc_down, acc_up);
            u_next = (u + acc * h).min(u_max);
        } else if u_next < u_min {
            acc = clamp((u_min - u) / h, acc_down, acc_up);
            u_next = (u + acc * h).max(u_min);
        }

        // Braking never turns the profile around
        if ramp_down && u_next < 0.0 {
            acc = -u / h;
            u_next = 0.0;
        }

        let travel = 0.5 * (u + u_next) * h;

        // Snap onto the goal if the profile stops within this step
        if travel >= dist && (ramp_down || u_next <= brake * h + SETTLE_TOLERANCE) {
            return Step {
                position: goal,
                velocity: 0.0,
                acceleration: sigma * acc,
            };
        }

        Step {
            position: position + sigma * travel,
            velocity: sigma * u_next,
            acceleration: sigma * acc,
        }
    }
}

impl Profile for TrapezoidalProfile {
    fn limited_term(&self) -> usize {
        ACCELERATION
    }

    fn goal(&self) -> f64 {
        self.goal
    }

    fn set_goal(&mut self, goal: f64) {
        self.goal = goal;
    }

    fn timeslice(&self) -> f64 {
        self.timeslice
    }

    /// Set the sub-step period. Negative or non-finite values disable slicing.
    fn set_timeslice(&mut self, timeslice: f64) {
        self.timeslice = if timeslice.is_finite() && timeslice > 0.0 {
            timeslice
        } else {
            0.0
        };
    }

    fn apply_limit(&mut self, term: usize, min: f64, max: f64) -> Result<(), ProfileError> {
        // Also rejects NaN
        if !(min <= max) {
            return Err(ProfileError::NumericOverflow { term, min, max });
        }

        match term {
            VELOCITY => self.limits.velocity = (min, max),
            ACCELERATION => self.limits.acceleration = (min, max),
            _ => {
                return Err(ProfileError::InvalidTerm {
                    term,
                    limited_term: self.limited_term(),
                })
            }
        }

        Ok(())
    }

    fn calculate(&self, last: &ProfileState, time: f64) -> Result<ProfileState, ProfileError> {
        let expected = self.limited_term() + 1;
        if last.kinematics.len() != expected {
            return Err(ProfileError::StateMismatch {
                expected,
                found: last.kinematics.len(),
            });
        }

        let dt = time - last.time;
        if !(dt >= 0.0) {
            return Err(ProfileError::NonMonotonicTime {
                last: last.time,
                time,
            });
        }
        if dt == 0.0 {
            return Ok(ProfileState::new(time, last.kinematics.clone()));
        }

        let num_steps = if self.timeslice > 0.0 {
            (dt / self.timeslice - SLICE_COUNT_TOLERANCE).ceil().max(1.0) as usize
        } else {
            1
        };
        let h = dt / num_steps as f64;

        let mut step = Step {
            position: last.kinematics[POSITION],
            velocity: last.kinematics[VELOCITY],
            acceleration: last.kinematics[ACCELERATION],
        };
        for _ in 0..num_steps {
            step = self.step(step.position, step.velocity, h);
        }

        Ok(ProfileState::new(
            time,
            vec![step.position, step.velocity, step.acceleration],
        ))
    }
}
