//! Semi-local (Akima) cubic spline interpolation.
//!
//! Akima splines avoid the overshooting problems of natural cubic splines by
//! using a weighted average of neighbouring slopes to determine the tangent at
//! each point.

use qn_core::{ensure, errors::Result, Real};

use super::cubic::cubic_hermite_rows;
use super::{prepare, PiecewisePolynomialInterpolator, PiecewisePolynomialResult};

/// Akima spline interpolation (order 4).
///
/// Boundary tangents use Akima's linear extrapolation of the secant slopes
/// two intervals beyond each end.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiLocalCubicSplineInterpolator;

impl SemiLocalCubicSplineInterpolator {
    /// Akima tangent at every knot.
    fn tangents(xs: &[Real], ys: &[Real]) -> Vec<Real> {
        let n = xs.len();
        let m: Vec<Real> = (0..n - 1)
            .map(|i| (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]))
            .collect();
        let nm = m.len();

        // Extended slope array: indices -2, -1, 0, ..., n-2, n-1, n
        let mut me = Vec::with_capacity(nm + 4);
        if nm >= 2 {
            me.push(3.0 * m[0] - 2.0 * m[1]);
            me.push(2.0 * m[0] - m[1]);
            me.extend_from_slice(&m);
            me.push(2.0 * m[nm - 1] - m[nm - 2]);
            me.push(3.0 * m[nm - 1] - 2.0 * m[nm - 2]);
        } else {
            me.extend_from_slice(&[m[0]; 5]);
        }

        (0..n)
            .map(|i| {
                let idx = i + 2;
                let w1 = (me[idx + 1] - me[idx]).abs();
                let w2 = (me[idx - 1] - me[idx - 2]).abs();
                if (w1 + w2).abs() < 1e-30 {
                    0.5 * (me[idx - 1] + me[idx])
                } else {
                    (w1 * me[idx - 1] + w2 * me[idx]) / (w1 + w2)
                }
            })
            .collect()
    }
}

impl PiecewisePolynomialInterpolator for SemiLocalCubicSplineInterpolator {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewisePolynomialResult> {
        ensure!(xs.len() == ys.len(), "xs and ys lengths must match");
        let data = prepare(xs, ys, 2)?;
        let ts = Self::tangents(&data.xs, &data.ys);
        let rows = cubic_hermite_rows(&data.xs, &data.ys, &ts);
        PiecewisePolynomialResult::from_rows(data.xs, &rows)
    }
}
