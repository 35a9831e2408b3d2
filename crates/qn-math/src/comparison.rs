//! Floating-point comparison and tolerance helpers.

use qn_core::Real;

/// Relative tolerance applied when testing admissible bounds for overlap.
pub const BOUND_TOLERANCE: Real = 1e-12;

/// Bounds with a smaller magnitude than this are treated as exactly zero.
pub const ZERO_SNAP: Real = BOUND_TOLERANCE / 100.0;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// Return `true` if `|a - b| <= n * epsilon` where `epsilon` is the
/// machine-epsilon relative to `max(|a|, |b|)`.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let eps = (a.abs().max(b.abs())) * f64::EPSILON * n as f64;
    (a - b).abs() <= eps
}

/// Sign of `x` as `-1`, `0` or `1`.
///
/// Unlike [`f64::signum`], zero maps to zero.
#[inline]
pub fn sign(x: Real) -> Real {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Replace `x` by zero when `|x| < threshold`.
#[inline]
pub fn snap_to_zero(x: Real, threshold: Real) -> Real {
    if x.abs() < threshold {
        0.0
    } else {
        x
    }
}

/// `x` moved down by a fraction `rel` of its own magnitude.
#[inline]
pub fn relax_down(x: Real, rel: Real) -> Real {
    x - x.abs() * rel
}

/// `x` moved up by a fraction `rel` of its own magnitude.
#[inline]
pub fn relax_up(x: Real, rel: Real) -> Real {
    x + x.abs() * rel
}
