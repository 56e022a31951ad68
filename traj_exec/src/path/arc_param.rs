//! # Arc parameterizer
//!
//! Converts splines into arc-length parameterised [`AugmentedArc2d`] segments. Each spline's
//! parameter interval is bisected recursively until every segment is short enough and its
//! curvature changes by little enough across it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;

use super::{total_length, Arc2d, AugmentedArc2d, Curve, PathError, Spline};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum bisection depth before a spline interval is reported as degenerate.
pub const MAX_SUBDIVISION_DEPTH: u32 = 32;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Reparameterises splines into arcs bounded in length and curvature change.
///
/// Parameterization is a pure function of the spline and the configured bounds, so one
/// parameterizer can be reused for any number of splines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParameterizer {
    max_arc_length: f64,
    max_delta_curvature: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ArcParameterizer {
    /// Create a new parameterizer.
    ///
    /// - `max_arc_length`: longest allowed arc. Units: meters
    /// - `max_delta_curvature`: largest allowed difference between the curvature at the start and
    ///   end of an arc. Units: 1/meters
    ///
    /// Both bounds must be finite and greater than zero.
    pub fn new(max_arc_length: f64, max_delta_curvature: f64) -> Result<Self, PathError> {
        if !(max_arc_length.is_finite() && max_arc_length > 0.0) {
            return Err(PathError::Configuration(format!(
                "the maximum arc length must be finite and positive, got {}",
                max_arc_length
            )));
        }
        if !(max_delta_curvature.is_finite() && max_delta_curvature > 0.0) {
            return Err(PathError::Configuration(format!(
                "the maximum curvature change must be finite and positive, got {}",
                max_delta_curvature
            )));
        }

        Ok(Self {
            max_arc_length,
            max_delta_curvature,
        })
    }

    pub fn max_arc_length(&self) -> f64 {
        self.max_arc_length
    }

    pub fn max_delta_curvature(&self) -> f64 {
        self.max_delta_curvature
    }

    /// Number of arcs that [`parameterize`](Self::parameterize) would produce for `spline`.
    pub fn curve_count<S: Spline + ?Sized>(&self, spline: &S) -> Result<usize, PathError> {
        let mut count = 0;
        self.subdivide(spline, 0.0, 1.0, 0, &mut |_| count += 1)?;
        Ok(count)
    }

    /// Number of arcs that [`parameterize_all`](Self::parameterize_all) would produce.
    pub fn curve_count_all<S: Spline>(&self, splines: &[S]) -> Result<usize, PathError> {
        splines
            .iter()
            .try_fold(0, |acc, s| Ok(acc + self.curve_count(s)?))
    }

    /// Parameterise a single spline into arcs, ordered from `t = 0` to `t = 1`.
    pub fn parameterize<S: Spline + ?Sized>(
        &self,
        spline: &S,
    ) -> Result<Vec<AugmentedArc2d>, PathError> {
        let mut arcs = Vec::new();
        self.subdivide(spline, 0.0, 1.0, 0, &mut |a| arcs.push(a))?;
        Ok(arcs)
    }

    /// Parameterise a chain of splines, concatenating the arcs in input order.
    pub fn parameterize_all<S: Spline>(
        &self,
        splines: &[S],
    ) -> Result<Vec<AugmentedArc2d>, PathError> {
        let mut arcs = Vec::new();

        for spline in splines {
            self.subdivide(spline, 0.0, 1.0, 0, &mut |a| arcs.push(a))?;
        }

        debug!(
            "Parameterized {} splines into {} arcs ({:.3} m)",
            splines.len(),
            arcs.len(),
            total_length(&arcs)
        );

        Ok(arcs)
    }

    /// Fit the interval `[t0, t1]` of the spline, bisecting it until both bounds hold.
    ///
    /// Accepted arcs are handed to `sink` in order of increasing `t`.
    fn subdivide<S, F>(
        &self,
        spline: &S,
        t0: f64,
        t1: f64,
        depth: u32,
        sink: &mut F,
    ) -> Result<(), PathError>
    where
        S: Spline + ?Sized,
        F: FnMut(AugmentedArc2d),
    {
        let degenerate = |reason: &'static str| PathError::DegenerateSegment { t0, t1, reason };
        let tm = 0.5 * (t0 + t1);

        let k0 = spline.curvature(t0)?;
        let k1 = spline.curvature(t1)?;
        if !(k0.is_finite() && k1.is_finite()) {
            return Err(degenerate("the curvature is not finite"));
        }

        let arc = Arc2d::from_points(
            spline.position(t0)?,
            spline.position(tm)?,
            spline.position(t1)?,
        );

        // Accept the arc if it satisfies both bounds
        if let Some(arc) = arc {
            if arc.length() <= self.max_arc_length
                && (k1 - k0).abs() <= self.max_delta_curvature
            {
                sink(AugmentedArc2d::new(arc, k0, k1));
                return Ok(());
            }
        }

        // Otherwise bisect
        if depth >= MAX_SUBDIVISION_DEPTH {
            return Err(degenerate("the maximum subdivision depth was reached"));
        }
        if !(tm > t0 && tm < t1) {
            return Err(degenerate("the parameter interval collapsed"));
        }

        self.subdivide(spline, t0, tm, depth + 1, sink)?;
        self.subdivide(spline, tm, t1, depth + 1, sink)
    }
}
