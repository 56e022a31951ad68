//! # Coupled drivetrain
//!
//! A coupled drivetrain has two independently driven, parallel wheel groups (a differential or
//! tank drive). This module holds the trajectory states of the chassis centre and its wheels, the
//! [`CoupledChassis`] model which turns path curvature into velocity and acceleration limits, and
//! the [`CausalTrajGen`] which walks a profile along a path under those limits.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod causal_traj_gen;
pub mod chassis;
pub mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use causal_traj_gen::CausalTrajGen;
pub use chassis::CoupledChassis;
pub use state::{
    CoupledConfigurationState, CoupledKinematicState, CoupledState, CoupledWheelState,
};

use crate::{path::PathError, profile::ProfileError};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised by the coupled chassis and trajectory generator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoupledError {
    #[error("The trajectory generator must be configured before generating states")]
    NotConfigured,

    #[error("Invalid chassis: {0}")]
    InvalidChassis(String),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}
