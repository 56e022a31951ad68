//! # Curve
//!
//! Curves are parameterised by arc length `s` in `[0, length]`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::PathError;
use crate::geom::{Vec2, Vec2Ext};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// An arc-length parameterised curve segment.
///
/// Any `s` outside `[0, length()]` (or NaN) must return [`PathError::Domain`].
pub trait Curve {
    /// Position at arc length `s`.
    fn position(&self, s: f64) -> Result<Vec2, PathError>;

    /// Derivative of the position with respect to arc length.
    fn derivative(&self, s: f64) -> Result<Vec2, PathError>;

    /// Unit vector pointing along the direction of travel at `s`.
    fn rotation(&self, s: f64) -> Result<Vec2, PathError> {
        Ok(self.derivative(s)?.unit())
    }

    /// Signed curvature at `s`.
    ///
    /// Units: 1/meters
    fn curvature(&self, s: f64) -> Result<f64, PathError>;

    /// Rate of change of curvature with arc length at `s`.
    ///
    /// Units: 1/meters^2
    fn dcurvature(&self, s: f64) -> Result<f64, PathError>;

    /// Total arc length of the curve.
    ///
    /// Units: meters
    fn length(&self) -> f64;
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<C: Curve + ?Sized> Curve for &C {
    fn position(&self, s: f64) -> Result<Vec2, PathError> {
        (**self).position(s)
    }

    fn derivative(&self, s: f64) -> Result<Vec2, PathError> {
        (**self).derivative(s)
    }

    fn rotation(&self, s: f64) -> Result<Vec2, PathError> {
        (**self).rotation(s)
    }

    fn curvature(&self, s: f64) -> Result<f64, PathError> {
        (**self).curvature(s)
    }

    fn dcurvature(&self, s: f64) -> Result<f64, PathError> {
        (**self).dcurvature(s)
    }

    fn length(&self) -> f64 {
        (**self).length()
    }
}

impl<C: Curve + ?Sized> Curve for Box<C> {
    fn position(&self, s: f64) -> Result<Vec2, PathError> {
        (**self).position(s)
    }

    fn derivative(&self, s: f64) -> Result<Vec2, PathError> {
        (**self).derivative(s)
    }

    fn rotation(&self, s: f64) -> Result<Vec2, PathError> {
        (**self).rotation(s)
    }

    fn curvature(&self, s: f64) -> Result<f64, PathError> {
        (**self).curvature(s)
    }

    fn dcurvature(&self, s: f64) -> Result<f64, PathError> {
        (**self).dcurvature(s)
    }

    fn length(&self) -> f64 {
        (**self).length()
    }
}
