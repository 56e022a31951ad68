//! # Coupled trajectory states
//!
//! The states exchanged with the rest of the system, along with their flat array encodings:
//!
//! | State                        | Array layout                                                   |
//! |------------------------------|----------------------------------------------------------------|
//! | [`CoupledConfigurationState`] | `[x, y, heading]`                                             |
//! | [`CoupledKinematicState`]     | `[distance, velocity, acceleration]`                          |
//! | [`CoupledState`]              | `[time, curvature, dcurvature, x, y, heading, distance, velocity, acceleration, finished]` |
//! | [`CoupledWheelState`]         | `[time, x, y, distance, velocity, acceleration, voltage, current, finished]` |
//!
//! `finished` is encoded as `1.0` or `0.0`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Pose of the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoupledConfigurationState {
    /// Units: meters
    pub position: Vec2,

    /// Angle of the direction of travel to the +ve x axis.
    ///
    /// Units: radians
    pub heading: f64,
}

/// 1D kinematics along the path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoupledKinematicState {
    /// Units: meters
    pub distance: f64,

    /// Units: meters/second
    pub velocity: f64,

    /// Units: meters/second^2
    pub acceleration: f64,
}

/// A sample of the chassis centre trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoupledState {
    /// Units: seconds
    pub time: f64,

    /// Units: 1/meters
    pub curvature: f64,

    /// Rate of change of curvature with distance.
    ///
    /// Units: 1/meters^2
    pub dcurvature: f64,

    pub configuration: CoupledConfigurationState,

    pub kinematics: CoupledKinematicState,

    /// True once the whole path has been travelled.
    pub finished: bool,
}

/// A sample of one side's wheel trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoupledWheelState {
    /// Units: seconds
    pub time: f64,

    /// Units: meters
    pub position: Vec2,

    pub kinematics: CoupledKinematicState,

    /// Units: volts
    pub voltage: f64,

    /// Units: amps
    pub current: f64,

    pub finished: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for CoupledConfigurationState {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            heading: 0.0,
        }
    }
}

impl CoupledConfigurationState {
    pub const ARRAY_LEN: usize = 3;

    pub fn to_array(&self) -> [f64; Self::ARRAY_LEN] {
        [self.position.x, self.position.y, self.heading]
    }

    pub fn from_array(a: &[f64; Self::ARRAY_LEN]) -> Self {
        Self {
            position: Vec2::new(a[0], a[1]),
            heading: a[2],
        }
    }
}

impl CoupledKinematicState {
    pub const ARRAY_LEN: usize = 3;

    pub fn to_array(&self) -> [f64; Self::ARRAY_LEN] {
        [self.distance, self.velocity, self.acceleration]
    }

    pub fn from_array(a: &[f64; Self::ARRAY_LEN]) -> Self {
        Self {
            distance: a[0],
            velocity: a[1],
            acceleration: a[2],
        }
    }
}

impl Default for CoupledState {
    fn default() -> Self {
        Self {
            time: 0.0,
            curvature: 0.0,
            dcurvature: 0.0,
            configuration: CoupledConfigurationState::default(),
            kinematics: CoupledKinematicState::default(),
            finished: false,
        }
    }
}

impl CoupledState {
    pub const ARRAY_LEN: usize = 10;

    pub fn to_array(&self) -> [f64; Self::ARRAY_LEN] {
        [
            self.time,
            self.curvature,
            self.dcurvature,
            self.configuration.position.x,
            self.configuration.position.y,
            self.configuration.heading,
            self.kinematics.distance,
            self.kinematics.velocity,
            self.kinematics.acceleration,
            encode_flag(self.finished),
        ]
    }

    pub fn from_array(a: &[f64; Self::ARRAY_LEN]) -> Self {
        Self {
            time: a[0],
            curvature: a[1],
            dcurvature: a[2],
            configuration: CoupledConfigurationState {
                position: Vec2::new(a[3], a[4]),
                heading: a[5],
            },
            kinematics: CoupledKinematicState {
                distance: a[6],
                velocity: a[7],
                acceleration: a[8],
            },
            finished: decode_flag(a[9]),
        }
    }
}

impl Default for CoupledWheelState {
    fn default() -> Self {
        Self {
            time: 0.0,
            position: Vec2::zeros(),
            kinematics: CoupledKinematicState::default(),
            voltage: 0.0,
            current: 0.0,
            finished: false,
        }
    }
}

impl CoupledWheelState {
    pub const ARRAY_LEN: usize = 9;

    pub fn to_array(&self) -> [f64; Self::ARRAY_LEN] {
        [
            self.time,
            self.position.x,
            self.position.y,
            self.kinematics.distance,
            self.kinematics.velocity,
            self.kinematics.acceleration,
            self.voltage,
            self.current,
            encode_flag(self.finished),
        ]
    }

    pub fn from_array(a: &[f64; Self::ARRAY_LEN]) -> Self {
        Self {
            time: a[0],
            position: Vec2::new(a[1], a[2]),
            kinematics: CoupledKinematicState {
                distance: a[3],
                velocity: a[4],
                acceleration: a[5],
            },
            voltage: a[6],
            current: a[7],
            finished: decode_flag(a[8]),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn encode_flag(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn decode_flag(value: f64) -> bool {
    value != 0.0
}
