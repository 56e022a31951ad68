//! # Motion profiles
//!
//! A profile generates 1D kinematic states (position, velocity, acceleration, ...) which move
//! toward a goal position while respecting per-term limits. Profiles are predictive: each call to
//! [`Profile::calculate`] only depends on the previous state and the profile's current
//! configuration, so the goal and limits may change between calls.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod trapezoidal;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

pub use trapezoidal::{TrapezoidalLimits, TrapezoidalProfile};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Index of the position term in [`ProfileState::kinematics`].
pub const POSITION: usize = 0;

/// Index of the velocity term in [`ProfileState::kinematics`].
pub const VELOCITY: usize = 1;

/// Index of the acceleration term in [`ProfileState::kinematics`].
pub const ACCELERATION: usize = 2;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A sample of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    /// Units: seconds
    pub time: f64,

    /// Kinematic terms indexed by derivative order, `limited_term + 1` long.
    pub kinematics: Vec<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised by motion profiles.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("Contradictory limits [{min}, {max}] for term {term}")]
    NumericOverflow { term: usize, min: f64, max: f64 },

    #[error("Term {term} cannot be limited by a profile limiting up to term {limited_term}")]
    InvalidTerm { term: usize, limited_term: usize },

    #[error("Expected a state with {expected} kinematic terms, found {found}")]
    StateMismatch { expected: usize, found: usize },

    #[error("Cannot step from time {last} s back to {time} s")]
    NonMonotonicTime { last: f64, time: f64 },
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A 1D motion profile.
pub trait Profile {
    /// Highest derivative term the profile limits, [`ACCELERATION`] for a trapezoidal profile.
    fn limited_term(&self) -> usize;

    /// Position the profile moves toward.
    fn goal(&self) -> f64;

    fn set_goal(&mut self, goal: f64);

    /// Period of the internal sub-steps used by [`calculate`](Self::calculate), zero disables
    /// slicing.
    ///
    /// Units: seconds
    fn timeslice(&self) -> f64;

    fn set_timeslice(&mut self, timeslice: f64);

    /// Limit the given kinematic term to `[min, max]`.
    fn apply_limit(&mut self, term: usize, min: f64, max: f64) -> Result<(), ProfileError>;

    /// Compute the state at `time` from the previous state `last`.
    fn calculate(&self, last: &ProfileState, time: f64) -> Result<ProfileState, ProfileError>;

    /// A state at rest at the origin, at time zero, of the right size for this profile.
    fn create_state(&self) -> ProfileState {
        ProfileState::zeroed(self.limited_term())
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ProfileState {
    pub fn new(time: f64, kinematics: Vec<f64>) -> Self {
        Self { time, kinematics }
    }

    /// A state at rest at the origin at time zero, tracking terms `0..=limited_term`.
    pub fn zeroed(limited_term: usize) -> Self {
        Self {
            time: 0.0,
            kinematics: vec![0.0; limited_term + 1],
        }
    }

    /// Value of the given term, zero if the state does not track it.
    pub fn term(&self, term: usize) -> f64 {
        self.kinematics.get(term).copied().unwrap_or(0.0)
    }

    pub fn position(&self) -> f64 {
        self.term(POSITION)
    }

    pub fn velocity(&self) -> f64 {
        self.term(VELOCITY)
    }

    pub fn acceleration(&self) -> f64 {
        self.term(ACCELERATION)
    }
}

impl<P: Profile + ?Sized> Profile for &mut P {
    fn limited_term(&self) -> usize {
        (**self).limited_term()
    }

    fn goal(&self) -> f64 {
        (**self).goal()
    }

    fn set_goal(&mut self, goal: f64) {
        (**self).set_goal(goal)
    }

    fn timeslice(&self) -> f64 {
        (**self).timeslice()
    }

    fn set_timeslice(&mut self, timeslice: f64) {
        (**self).set_timeslice(timeslice)
    }

    fn apply_limit(&mut self, term: usize, min: f64, max: f64) -> Result<(), ProfileError> {
        (**self).apply_limit(term, min, max)
    }

    fn calculate(&self, last: &ProfileState, time: f64) -> Result<ProfileState, ProfileError> {
        (**self).calculate(last, time)
    }

    fn create_state(&self) -> ProfileState {
        (**self).create_state()
    }
}

impl<P: Profile + ?Sized> Profile for Box<P> {
    fn limited_term(&self) -> usize {
        (**self).limited_term()
    }

    fn goal(&self) -> f64 {
        (**self).goal()
    }

    fn set_goal(&mut self, goal: f64) {
        (**self).set_goal(goal)
    }

    fn timeslice(&self) -> f64 {
        (**self).timeslice()
    }

    fn set_timeslice(&mut self, timeslice: f64) {
        (**self).set_timeslice(timeslice)
    }

    fn apply_limit(&mut self, term: usize, min: f64, max: f64) -> Result<(), ProfileError> {
        (**self).apply_limit(term, min, max)
    }

    fn calculate(&self, last: &ProfileState, time: f64) -> Result<ProfileState, ProfileError> {
        (**self).calculate(last, time)
    }

    fn create_state(&self) -> ProfileState {
        (**self).create_state()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_state_terms() {
        let s = ProfileState::new(1.5, vec![2.0, -1.0]);

        assert_eq!(s.position(), 2.0);
        assert_eq!(s.velocity(), -1.0);
        assert_eq!(s.acceleration(), 0.0);

        let z = ProfileState::zeroed(ACCELERATION);
        assert_eq!(z.kinematics, vec![0.0; 3]);
        assert_eq!(z.time, 0.0);
    }
}
