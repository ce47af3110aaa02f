//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
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
/// Unlike the std version the round-off case where `r == rhs.abs()` is folded
/// back to zero, so the return value always satisfies `0.0 <= r < rhs.abs()`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    let r = if r < T::zero() { r + rhs.abs() } else { r };

    if r >= rhs.abs() {
        T::zero()
    }
    else {
        r
    }
}

/// Return the fractional part of `value` in the range `[0, 1)`, wrapping
/// negative values around from the top.
pub fn wrap_unit<T>(value: T) -> T
where
    T: Float
{
    let wrapped = value - value.floor();

    // A tiny negative value can round up to exactly one
    if wrapped >= T::one() {
        T::zero()
    }
    else {
        wrapped
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5f64, 0f64, 1f64), 1f64);
        assert_eq!(clamp(-5f64, 0f64, 1f64), 0f64);
        assert_eq!(clamp(0.5f64, 0f64, 1f64), 0.5f64);
    }

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(370f64, 360f64), 10f64);
        assert_eq!(rem_euclid(-10f64, 360f64), 350f64);
        assert_eq!(rem_euclid(360f64, 360f64), 0f64);
        assert_eq!(rem_euclid(-1e-20f64, 360f64), 0f64);
    }

    #[test]
    fn test_wrap_unit() {
        assert_eq!(wrap_unit(1.25f64), 0.25f64);
        assert_eq!(wrap_unit(-0.25f64), 0.75f64);
        assert_eq!(wrap_unit(2f64), 0f64);
        assert_eq!(wrap_unit(-1e-20f64), 0f64);
    }
}
