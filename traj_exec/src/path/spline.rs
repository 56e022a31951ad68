//! # Spline
//!
//! A spline is a parametric curve over the normalised parameter `t` in `[0, 1]`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::PathError;
use crate::geom::{Vec2, Vec2Ext};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A parametric curve over `t` in `[0, 1]`.
///
/// Implementors provide the position and its first two derivatives with respect to `t`, the
/// rotation and curvature are derived from them. Any `t` outside `[0, 1]` (or NaN) must return
/// [`PathError::Domain`].
pub trait Spline {
    /// Position at `t`.
    fn position(&self, t: f64) -> Result<Vec2, PathError>;

    /// First derivative of the position with respect to `t`.
    fn derivative(&self, t: f64) -> Result<Vec2, PathError>;

    /// Second derivative of the position with respect to `t`.
    fn derivative2(&self, t: f64) -> Result<Vec2, PathError>;

    /// Unit vector pointing along the direction of travel at `t`.
    fn rotation(&self, t: f64) -> Result<Vec2, PathError> {
        Ok(self.derivative(t)?.unit())
    }

    /// Signed curvature at `t`, positive for a left (counter-clockwise) turn.
    ///
    /// Units: 1/meters
    fn curvature(&self, t: f64) -> Result<f64, PathError> {
        let d = self.derivative(t)?;
        let dd = self.derivative2(t)?;

        Ok(d.cross2(&dd) / d.norm().powi(3))
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<S: Spline + ?Sized> Spline for &S {
    fn position(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).position(t)
    }

    fn derivative(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).derivative(t)
    }

    fn derivative2(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).derivative2(t)
    }

    fn rotation(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).rotation(t)
    }

    fn curvature(&self, t: f64) -> Result<f64, PathError> {
        (**self).curvature(t)
    }
}

impl<S: Spline + ?Sized> Spline for Box<S> {
    fn position(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).position(t)
    }

    fn derivative(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).derivative(t)
    }

    fn derivative2(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).derivative2(t)
    }

    fn rotation(&self, t: f64) -> Result<Vec2, PathError> {
        (**self).rotation(t)
    }

    fn curvature(&self, t: f64) -> Result<f64, PathError> {
        (**self).curvature(t)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path::check_domain;
    use approx::assert_abs_diff_eq;

    /// Unit circle traversed counter-clockwise from angle 0 to pi/2.
    struct QuarterCircle;

    impl Spline for QuarterCircle {
        fn position(&self, t: f64) -> Result<Vec2, PathError> {
            check_domain(t, 0.0, 1.0)?;
            let a = t * std::f64::consts::FRAC_PI_2;
            Ok(Vec2::new(a.cos(), a.sin()))
        }

        fn derivative(&self, t: f64) -> Result<Vec2, PathError> {
            check_domain(t, 0.0, 1.0)?;
            let k = std::f64::consts::FRAC_PI_2;
            let a = t * k;
            Ok(Vec2::new(-k * a.sin(), k * a.cos()))
        }

        fn derivative2(&self, t: f64) -> Result<Vec2, PathError> {
            check_domain(t, 0.0, 1.0)?;
            let k = std::f64::consts::FRAC_PI_2;
            let a = t * k;
            Ok(Vec2::new(-k * k * a.cos(), -k * k * a.sin()))
        }
    }

    #[test]
    fn test_default_curvature_and_rotation() {
        let s = QuarterCircle;

        assert_abs_diff_eq!(s.curvature(0.3).unwrap(), 1.0, epsilon = 1e-12);
        assert!(s.rotation(0.0).unwrap().approx_eq(&Vec2::new(0.0, 1.0)));

        // Through a reference and a box the behaviour is unchanged
        let boxed: Box<dyn Spline> = Box::new(QuarterCircle);
        assert_abs_diff_eq!((&s).curvature(0.7).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(boxed.curvature(0.7).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clockwise_curvature_is_negative() {
        struct Mirrored;
        impl Spline for Mirrored {
            fn position(&self, t: f64) -> Result<Vec2, PathError> {
                QuarterCircle.position(t).map(|p| Vec2::new(p.x, -p.y))
            }
            fn derivative(&self, t: f64) -> Result<Vec2, PathError> {
                QuarterCircle.derivative(t).map(|p| Vec2::new(p.x, -p.y))
            }
            fn derivative2(&self, t: f64) -> Result<Vec2, PathError> {
                QuarterCircle.derivative2(t).map(|p| Vec2::new(p.x, -p.y))
            }
        }

        assert_abs_diff_eq!(Mirrored.curvature(0.5).unwrap(), -1.0, epsilon = 1e-12);
    }
}
