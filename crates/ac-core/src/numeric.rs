/// Floating point type used throughout system
pub type Real = f64;

/// Absolute and relative tolerance for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// A sample is missing when it is NaN or infinite.
#[inline]
pub fn is_missing(v: Real) -> bool {
    !v.is_finite()
}

/// True when no two valid samples differ.
///
/// Sums of squared deviations of a constant series need not round to exactly
/// zero, so degenerate-variance checks use this instead.
pub fn is_constant(values: &[Real]) -> bool {
    let mut valid = values.iter().copied().filter(|v| !is_missing(*v));
    match valid.next() {
        Some(first) => valid.all(|v| v == first),
        None => true,
    }
}

/// Sentinel for statistics that cannot be computed from the available samples.
pub const UNDEFINED: Real = Real::NAN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn missing_covers_nan_and_infinity() {
        assert!(is_missing(Real::NAN));
        assert!(is_missing(Real::INFINITY));
        assert!(is_missing(Real::NEG_INFINITY));
        assert!(!is_missing(0.0));
        assert!(!is_missing(-1.5e-30));
    }

    #[test]
    fn constant_ignores_missing_samples() {
        assert!(is_constant(&[0.1, Real::NAN, 0.1, 0.1]));
        assert!(is_constant(&[]));
        assert!(is_constant(&[Real::NAN]));
        assert!(!is_constant(&[0.1, 0.1 + 1e-15]));
    }
}
