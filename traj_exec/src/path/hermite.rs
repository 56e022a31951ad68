//! # Hermite splines
//!
//! Cubic and quintic Hermite splines between two waypoints. A cubic spline matches the position
//! and tangent of both waypoints, a quintic one additionally matches the tangent's derivative,
//! which keeps curvature continuous where two quintic splines meet.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{check_domain, PathError, Spline};
use crate::geom::Vec2;
use util::maths::poly_val;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

// Basis polynomials, highest power first, ordered as the control vectors (start position, start
// tangent, end position, end tangent).

const CUBIC_POSITION: [&[f64]; 4] = [
    &[2.0, -3.0, 0.0, 1.0],
    &[1.0, -2.0, 1.0, 0.0],
    &[-2.0, 3.0, 0.0, 0.0],
    &[1.0, -1.0, 0.0, 0.0],
];

const CUBIC_DERIVATIVE: [&[f64]; 4] = [
    &[6.0, -6.0, 0.0],
    &[3.0, -4.0, 1.0],
    &[-6.0, 6.0, 0.0],
    &[3.0, -2.0, 0.0],
];

const CUBIC_DERIVATIVE2: [&[f64]; 4] = [&[12.0, -6.0], &[6.0, -4.0], &[-12.0, 6.0], &[6.0, -2.0]];

// Quintic controls are (start position, start tangent, start dtangent, end position, end tangent,
// end dtangent).

const QUINTIC_POSITION: [&[f64]; 6] = [
    &[-6.0, 15.0, -10.0, 0.0, 0.0, 1.0],
    &[-3.0, 8.0, -6.0, 0.0, 1.0, 0.0],
    &[-0.5, 1.5, -1.5, 0.5, 0.0, 0.0],
    &[6.0, -15.0, 10.0, 0.0, 0.0, 0.0],
    &[-3.0, 7.0, -4.0, 0.0, 0.0, 0.0],
    &[0.5, -1.0, 0.5, 0.0, 0.0, 0.0],
];

const QUINTIC_DERIVATIVE: [&[f64]; 6] = [
    &[-30.0, 60.0, -30.0, 0.0, 0.0],
    &[-15.0, 32.0, -18.0, 0.0, 1.0],
    &[-2.5, 6.0, -4.5, 1.0, 0.0],
    &[30.0, -60.0, 30.0, 0.0, 0.0],
    &[-15.0, 28.0, -12.0, 0.0, 0.0],
    &[2.5, -4.0, 1.5, 0.0, 0.0],
];

const QUINTIC_DERIVATIVE2: [&[f64]; 6] = [
    &[-120.0, 180.0, -60.0, 0.0],
    &[-60.0, 96.0, -36.0, 0.0],
    &[-10.0, 18.0, -9.0, 1.0],
    &[120.0, -180.0, 60.0, 0.0],
    &[-60.0, 84.0, -24.0, 0.0],
    &[10.0, -12.0, 3.0, 0.0],
];

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A waypoint of a cubic Hermite spline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicWaypoint {
    /// Units: meters
    pub position: Vec2,

    /// Derivative of the position with respect to the spline parameter.
    pub tangent: Vec2,
}

/// A waypoint of a quintic Hermite spline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuinticWaypoint {
    /// Units: meters
    pub position: Vec2,

    /// Derivative of the position with respect to the spline parameter.
    pub tangent: Vec2,

    /// Second derivative of the position with respect to the spline parameter.
    pub dtangent: Vec2,
}

/// Cubic Hermite spline between two waypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermiteCubic {
    start: CubicWaypoint,
    end: CubicWaypoint,
}

/// Quintic Hermite spline between two waypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermiteQuintic {
    start: QuinticWaypoint,
    end: QuinticWaypoint,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl CubicWaypoint {
    pub fn new(position: Vec2, tangent: Vec2) -> Self {
        Self { position, tangent }
    }
}

impl QuinticWaypoint {
    pub fn new(position: Vec2, tangent: Vec2, dtangent: Vec2) -> Self {
        Self {
            position,
            tangent,
            dtangent,
        }
    }
}

impl HermiteCubic {
    pub fn new(start: CubicWaypoint, end: CubicWaypoint) -> Self {
        Self { start, end }
    }

    /// Chain consecutive waypoints into `waypoints.len() - 1` splines.
    ///
    /// Fewer than two waypoints produce no splines.
    pub fn from_waypoints(waypoints: &[CubicWaypoint]) -> Vec<Self> {
        waypoints
            .windows(2)
            .map(|w| Self::new(w[0], w[1]))
            .collect()
    }

    pub fn start(&self) -> &CubicWaypoint {
        &self.start
    }

    pub fn end(&self) -> &CubicWaypoint {
        &self.end
    }

    fn controls(&self) -> [Vec2; 4] {
        [
            self.start.position,
            self.start.tangent,
            self.end.position,
            self.end.tangent,
        ]
    }
}

impl Spline for HermiteCubic {
    fn position(&self, t: f64) -> Result<Vec2, PathError> {
        check_domain(t, 0.0, 1.0)?;
        Ok(blend(&self.controls(), &CUBIC_POSITION, t))
    }

    fn derivative(&self, t: f64) -> Result<Vec2, PathError> {
        check_domain(t, 0.0, 1.0)?;
        Ok(blend(&self.controls(), &CUBIC_DERIVATIVE, t))
    }

    fn derivative2(&self, t: f64) -> Result<Vec2, PathError> {
        check_domain(t, 0.0, 1.0)?;
        Ok(blend(&self.controls(), &CUBIC_DERIVATIVE2, t))
    }
}

impl HermiteQuintic {
    pub fn new(start: QuinticWaypoint, end: QuinticWaypoint) -> Self {
        Self { start, end }
    }

    /// Chain consecutive waypoints into `waypoints.len() - 1` splines.
    ///
    /// Fewer than two waypoints produce no splines.
    pub fn from_waypoints(waypoints: &[QuinticWaypoint]) -> Vec<Self> {
        waypoints
            .windows(2)
            .map(|w| Self::new(w[0], w[1]))
            .collect()
    }

    pub fn start(&self) -> &QuinticWaypoint {
        &self.start
    }

    pub fn end(&self) -> &QuinticWaypoint {
        &self.end
    }

    fn controls(&self) -> [Vec2; 6] {
        [
            self.start.position,
            self.start.tangent,
            self.start.dtangent,
            self.end.position,
            self.end.tangent,
            self.end.dtangent,
        ]
    }
}

impl Spline for HermiteQuintic {
    fn position(&self, t: f64) -> Result<Vec2, PathError> {
        check_domain(t, 0.0, 1.0)?;
        Ok(blend(&self.controls(), &QUINTIC_POSITION, t))
    }

    fn derivative(&self, t: f64) -> Result<Vec2, PathError> {
        check_domain(t, 0.0, 1.0)?;
        Ok(blend(&self.controls(), &QUINTIC_DERIVATIVE, t))
    }

    fn derivative2(&self, t: f64) -> Result<Vec2, PathError> {
        check_domain(t, 0.0, 1.0)?;
        Ok(blend(&self.controls(), &QUINTIC_DERIVATIVE2, t))
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Weighted sum of the control vectors, each weighted by its basis polynomial evaluated at `t`.
fn blend(controls: &[Vec2], basis: &[&[f64]], t: f64) -> Vec2 {
    controls
        .iter()
        .zip(basis.iter())
        .fold(Vec2::zeros(), |acc, (c, b)| acc + *c * poly_val(t, *b))
}
