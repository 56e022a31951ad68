//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Evaluate a polynomial at `value`.
///
/// Coefficients are given highest power first, so `[a, b, c]` evaluates
/// `a*x^2 + b*x + c`. An empty coefficient slice evaluates to zero.
pub fn poly_val<T>(value: T, coeffs: &[T]) -> T
where
    T: Float,
{
    // Horner's scheme
    coeffs
        .iter()
        .fold(T::zero(), |acc, &coeff| acc * value + coeff)
}

/// Clamp `value` into `[min, max]`.
///
/// NaN values are passed through unchanged.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Sign of `value` with zero counted as positive.
pub fn sign_non_neg<T>(value: T) -> T
where
    T: Float,
{
    if value >= T::zero() {
        T::one()
    } else {
        -T::one()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_poly_val() {
        assert_eq!(poly_val(2.0f64, &[]), 0.0);
        assert_eq!(poly_val(2.0f64, &[3.0]), 3.0);
        // 2x^3 - 3x^2 + 1 at x = 0.5
        assert!((poly_val(0.5f64, &[2.0, -3.0, 0.0, 1.0]) - 0.5).abs() < 1e-12);
        assert_eq!(poly_val(3.0f64, &[1.0, 0.0, 0.0]), 9.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0f64, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0f64, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.25f64, -1.0, 1.0), 0.25);
        assert!(clamp(std::f64::NAN, -1.0, 1.0).is_nan());
    }

    #[test]
    fn test_rem_euclid() {
        const TAU: f64 = std::f64::consts::TAU;

        assert!((rem_euclid(-1.0f64, TAU) - (TAU - 1.0)).abs() < 1e-12);
        assert!((rem_euclid(TAU + 1.0, TAU) - 1.0).abs() < 1e-12);
        assert_eq!(rem_euclid(0.0f64, TAU), 0.0);
    }

    #[test]
    fn test_sign_non_neg() {
        assert_eq!(sign_non_neg(0.0f64), 1.0);
        assert_eq!(sign_non_neg(-0.1f64), -1.0);
        assert_eq!(sign_non_neg(2.0f64), 1.0);
    }
}
