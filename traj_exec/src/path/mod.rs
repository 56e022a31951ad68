//! # Paths
//!
//! A path starts life as a chain of Hermite [`Spline`]s over a normalised parameter `t`, which
//! the [`ArcParameterizer`](arc_param::ArcParameterizer) converts into a sequence of arc-length
//! parameterised [`Curve`]s that the trajectory generator walks along.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod arc;
pub mod arc_param;
pub mod curve;
pub mod hermite;
pub mod spline;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use arc::{Arc2d, AugmentedArc2d};
pub use arc_param::ArcParameterizer;
pub use curve::Curve;
pub use hermite::{CubicWaypoint, HermiteCubic, HermiteQuintic, QuinticWaypoint};
pub use spline::Spline;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised by splines, curves and the arc parameterizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("Parameter {value} is outside of the valid range [{min}, {max}]")]
    Domain { value: f64, min: f64, max: f64 },

    #[error("Cannot fit an arc to the spline interval [{t0}, {t1}]: {reason}")]
    DegenerateSegment {
        t0: f64,
        t1: f64,
        reason: &'static str,
    },

    #[error("Invalid path configuration: {0}")]
    Configuration(String),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Total arc length of a sequence of curves.
pub fn total_length<C: Curve>(curves: &[C]) -> f64 {
    curves.iter().map(|c| c.length()).sum()
}

/// Check that `value` lies in `[min, max]`, rejecting NaN.
pub(crate) fn check_domain(value: f64, min: f64, max: f64) -> Result<(), PathError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(PathError::Domain { value, min, max })
    }
}
