//! # Trajectory library.
//!
//! This library plans time-parameterised trajectories for a coupled (differential/tank)
//! drivetrain. A path made of Hermite splines is reparameterised into arc segments, a trapezoidal
//! motion profile is advanced along the path's arc length and the chassis model re-clamps the
//! profile's limits at every step so that the wheel commands stay within what the motors can
//! deliver.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Coupled drivetrain - states, chassis model and the causal trajectory generator
pub mod coupled;

/// Geometry primitives - the 2D vector type and its helpers
pub mod geom;

/// Parameters for the trajectory executable
pub mod params;

/// Paths - splines, arc-length curves and the arc parameterizer
pub mod path;

/// Motion profiles - 1D kinematic generators toward a goal distance
pub mod profile;

/// Transmissions - electromechanical motor models
pub mod transmission;
