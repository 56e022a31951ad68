//! # Geometry primitives
//!
//! The planner works in the plane with [`Vec2`], an alias of nalgebra's `Vector2<f64>`. The
//! [`Vec2Ext`] trait adds the handful of constructors and queries the path and chassis code need
//! on top of nalgebra's own arithmetic.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Component-wise tolerance used by [`Vec2Ext::approx_eq`].
pub const VEC2_EPSILON: f64 = 1e-6;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A 2D vector in meters (or meters per unit parameter for derivatives).
pub type Vec2 = Vector2<f64>;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Extra operations on [`Vec2`].
pub trait Vec2Ext {
    /// Build a vector from cartesian components.
    fn cartesian(x: f64, y: f64) -> Self;

    /// Build a vector from a magnitude and an angle to the +ve x axis.
    fn polar(magnitude: f64, angle_rad: f64) -> Self;

    /// Angle of the vector to the +ve x axis, in `(-pi, pi]`.
    fn polar_angle(&self) -> f64;

    /// The vector scaled to unit length.
    ///
    /// The zero vector has no direction and is returned unchanged.
    fn unit(&self) -> Self;

    /// The z component of the 3D cross product of the two vectors.
    fn cross2(&self, other: &Self) -> f64;

    /// Component-wise equality within [`VEC2_EPSILON`].
    fn approx_eq(&self, other: &Self) -> bool;
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Vec2Ext for Vec2 {
    fn cartesian(x: f64, y: f64) -> Self {
        Vec2::new(x, y)
    }

    fn polar(magnitude: f64, angle_rad: f64) -> Self {
        Vec2::new(magnitude * angle_rad.cos(), magnitude * angle_rad.sin())
    }

    fn polar_angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    fn unit(&self) -> Self {
        let mag = self.norm();

        if mag > 0.0 {
            self / mag
        } else {
            *self
        }
    }

    fn cross2(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn approx_eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < VEC2_EPSILON && (self.y - other.y).abs() < VEC2_EPSILON
    }
}
