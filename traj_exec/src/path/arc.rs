//! # Arcs
//!
//! [`Arc2d`] is a constant curvature segment fitted through three points, falling back to a
//! straight line when the points are collinear. [`AugmentedArc2d`] keeps the arc's geometry but
//! reports a curvature which varies linearly along its length, which is what the
//! [`ArcParameterizer`](super::ArcParameterizer) outputs so that curvature is continuous across
//! segment boundaries.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Matrix2;
use std::f64::consts::TAU;

use super::{check_domain, Curve, PathError};
use crate::geom::{Vec2, Vec2Ext};
use util::maths::rem_euclid;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Three points are treated as collinear when the magnitude of their cross product is at most
/// this fraction of the squared chord length.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A circular arc or straight line segment parameterised by arc length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2d {
    start: Vec2,
    end: Vec2,
    geometry: ArcGeometry,
    length: f64,
}

/// An [`Arc2d`] whose curvature is interpolated linearly between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentedArc2d {
    arc: Arc2d,
    curvature_start: f64,
    curvature_end: f64,
    dcurvature: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum ArcGeometry {
    Line {
        direction: Vec2,
    },
    Circle {
        centre: Vec2,
        radius: f64,
        start_angle: f64,
        /// +1 for counter-clockwise, -1 for clockwise
        sign: f64,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Arc2d {
    /// Fit an arc which starts at `start`, passes through `mid` and ends at `end`.
    ///
    /// Returns `None` if any point is not finite, or if the points are collinear but `mid` does
    /// not lie between `start` and `end` (the segment doubles back on itself and cannot be
    /// represented by a single arc).
    pub fn from_points(start: Vec2, mid: Vec2, end: Vec2) -> Option<Self> {
        let finite = [start, mid, end]
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite());
        if !finite {
            return None;
        }

        let to_mid = mid - start;
        let from_mid = end - mid;
        let chord = end - start;
        let cross = to_mid.cross2(&from_mid);

        // ---- STRAIGHT LINE ----

        if cross.abs() <= COLLINEAR_TOLERANCE * chord.norm_squared() {
            let length = chord.norm();

            if length == 0.0 {
                // Only a single point is representable
                return if to_mid.norm() == 0.0 {
                    Some(Self {
                        start,
                        end,
                        geometry: ArcGeometry::Line {
                            direction: Vec2::zeros(),
                        },
                        length: 0.0,
                    })
                } else {
                    None
                };
            }

            if to_mid.dot(&from_mid) < 0.0 {
                return None;
            }

            return Some(Self {
                start,
                end,
                geometry: ArcGeometry::Line {
                    direction: chord / length,
                },
                length,
            });
        }

        // ---- CIRCLE ----

        // The centre c = start + u is equidistant from all three points, giving
        //     2 (mid - start) . u = |mid - start|^2
        //     2 (end - start) . u = |end - start|^2
        let m = Matrix2::new(
            2.0 * to_mid.x,
            2.0 * to_mid.y,
            2.0 * chord.x,
            2.0 * chord.y,
        );
        let rhs = Vec2::new(to_mid.norm_squared(), chord.norm_squared());
        let u = m.try_inverse()? * rhs;

        let centre = start + u;
        let radius = u.norm();
        let start_angle = (start - centre).polar_angle();
        let end_angle = (end - centre).polar_angle();
        let sign = cross.signum();

        let sweep = rem_euclid(sign * (end_angle - start_angle), TAU);
        let length = sweep * radius;

        if !length.is_finite() {
            return None;
        }

        Some(Self {
            start,
            end,
            geometry: ArcGeometry::Circle {
                centre,
                radius,
                start_angle,
                sign,
            },
            length,
        })
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    /// Centre of the arc's circle, `None` for a straight line.
    pub fn centre(&self) -> Option<Vec2> {
        match self.geometry {
            ArcGeometry::Circle { centre, .. } => Some(centre),
            ArcGeometry::Line { .. } => None,
        }
    }

    /// Radius of the arc's circle, `None` for a straight line.
    pub fn radius(&self) -> Option<f64> {
        match self.geometry {
            ArcGeometry::Circle { radius, .. } => Some(radius),
            ArcGeometry::Line { .. } => None,
        }
    }
}

impl Curve for Arc2d {
    fn position(&self, s: f64) -> Result<Vec2, PathError> {
        check_domain(s, 0.0, self.length)?;

        Ok(match self.geometry {
            ArcGeometry::Line { direction } => self.start + direction * s,
            ArcGeometry::Circle {
                centre,
                radius,
                start_angle,
                sign,
            } => centre + Vec2::polar(radius, start_angle + sign * s / radius),
        })
    }

    fn derivative(&self, s: f64) -> Result<Vec2, PathError> {
        check_domain(s, 0.0, self.length)?;

        Ok(match self.geometry {
            ArcGeometry::Line { direction } => direction,
            ArcGeometry::Circle {
                radius,
                start_angle,
                sign,
                ..
            } => {
                let phi = start_angle + sign * s / radius;
                Vec2::new(-phi.sin(), phi.cos()) * sign
            }
        })
    }

    fn curvature(&self, s: f64) -> Result<f64, PathError> {
        check_domain(s, 0.0, self.length)?;

        Ok(match self.geometry {
            ArcGeometry::Line { .. } => 0.0,
            ArcGeometry::Circle { radius, sign, .. } => sign / radius,
        })
    }

    fn dcurvature(&self, s: f64) -> Result<f64, PathError> {
        check_domain(s, 0.0, self.length)?;
        Ok(0.0)
    }

    fn length(&self) -> f64 {
        self.length
    }
}

impl AugmentedArc2d {
    /// Wrap `arc` so that its curvature runs linearly from `curvature_start` at `s = 0` to
    /// `curvature_end` at `s = length`.
    pub fn new(arc: Arc2d, curvature_start: f64, curvature_end: f64) -> Self {
        let dcurvature = if arc.length > 0.0 {
            (curvature_end - curvature_start) / arc.length
        } else {
            0.0
        };

        Self {
            arc,
            curvature_start,
            curvature_end,
            dcurvature,
        }
    }

    pub fn arc(&self) -> &Arc2d {
        &self.arc
    }

    pub fn curvature_start(&self) -> f64 {
        self.curvature_start
    }

    pub fn curvature_end(&self) -> f64 {
        self.curvature_end
    }
}

impl Curve for AugmentedArc2d {
    fn position(&self, s: f64) -> Result<Vec2, PathError> {
        self.arc.position(s)
    }

    fn derivative(&self, s: f64) -> Result<Vec2, PathError> {
        self.arc.derivative(s)
    }

    fn curvature(&self, s: f64) -> Result<f64, PathError> {
        check_domain(s, 0.0, self.arc.length)?;
        Ok(self.curvature_start + s * self.dcurvature)
    }

    fn dcurvature(&self, s: f64) -> Result<f64, PathError> {
        check_domain(s, 0.0, self.arc.length)?;
        Ok(self.dcurvature)
    }

    fn length(&self) -> f64 {
        self.arc.length
    }
}
