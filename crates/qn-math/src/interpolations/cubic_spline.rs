//! Global C2 cubic splines: not-a-knot, clamped and natural.
//!
//! All three variants solve the classical moment system for the second
//! derivatives `M_i` at the knots,
//!
//!   `h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1} = 6 (s_i - s_{i-1})`
//!
//! and differ only in the two boundary rows.  The system is solved with
//! nalgebra's LU decomposition.

use nalgebra::{DMatrix, DVector};
use qn_core::{ensure, errors::Result, Error, Real};

use super::{prepare, PiecewisePolynomialInterpolator, PiecewisePolynomialResult};

/// Boundary rows of the moment system.
#[derive(Debug, Clone, Copy)]
enum Boundary {
    /// Third derivative continuous across the second and penultimate knots.
    NotAKnot,
    /// Prescribed first derivatives at both ends.
    Clamped(Real, Real),
    /// Zero second derivative at both ends.
    Natural,
}

/// Cubic spline with not-a-knot end conditions (order 4).
///
/// When `ys.len() == xs.len() + 2`, `ys[0]` and `ys[n + 1]` are taken as the
/// first derivatives at the smallest and largest knot and a clamped spline
/// is built instead.  With exactly three knots the not-a-knot spline is the
/// interpolating parabola.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicSplineInterpolator;

impl PiecewisePolynomialInterpolator for CubicSplineInterpolator {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewisePolynomialResult> {
        let data = prepare(xs, ys, 2)?;
        let boundary = match data.end_derivatives {
            Some((left, right)) => Boundary::Clamped(left, right),
            None => Boundary::NotAKnot,
        };
        build(data.xs, &data.ys, boundary)
    }
}

/// Natural cubic spline: zero second derivative at both ends (order 4).
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalSplineInterpolator;

impl PiecewisePolynomialInterpolator for NaturalSplineInterpolator {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewisePolynomialResult> {
        ensure!(
            xs.len() == ys.len(),
            "natural spline takes one value per knot ({} knots, {} values)",
            xs.len(),
            ys.len()
        );
        let data = prepare(xs, ys, 2)?;
        build(data.xs, &data.ys, Boundary::Natural)
    }
}

fn build(xs: Vec<Real>, ys: &[Real], boundary: Boundary) -> Result<PiecewisePolynomialResult> {
    let n = xs.len();
    let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let s: Vec<Real> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    let moments = match boundary {
        // Two knots: the straight line.
        Boundary::NotAKnot if n == 2 => vec![0.0; 2],
        // Both not-a-knot rows coincide; the spline is the parabola.
        Boundary::NotAKnot if n == 3 => vec![2.0 * (s[1] - s[0]) / (h[0] + h[1]); 3],
        _ => solve_moments(&h, &s, boundary)?,
    };

    let rows: Vec<[Real; 4]> = (0..n - 1)
        .map(|i| {
            [
                (moments[i + 1] - moments[i]) / (6.0 * h[i]),
                0.5 * moments[i],
                s[i] - h[i] * (2.0 * moments[i] + moments[i + 1]) / 6.0,
                ys[i],
            ]
        })
        .collect();
    PiecewisePolynomialResult::from_rows(xs, &rows)
}

fn solve_moments(h: &[Real], s: &[Real], boundary: Boundary) -> Result<Vec<Real>> {
    let n = h.len() + 1;
    let mut a = DMatrix::<Real>::zeros(n, n);
    let mut rhs = DVector::<Real>::zeros(n);

    for i in 1..n - 1 {
        a[(i, i - 1)] = h[i - 1];
        a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
        a[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * (s[i] - s[i - 1]);
    }

    match boundary {
        Boundary::Natural => {
            a[(0, 0)] = 1.0;
            a[(n - 1, n - 1)] = 1.0;
        }
        Boundary::Clamped(left, right) => {
            a[(0, 0)] = 2.0 * h[0];
            a[(0, 1)] = h[0];
            rhs[0] = 6.0 * (s[0] - left);
            a[(n - 1, n - 2)] = h[n - 2];
            a[(n - 1, n - 1)] = 2.0 * h[n - 2];
            rhs[n - 1] = 6.0 * (right - s[n - 2]);
        }
        Boundary::NotAKnot => {
            a[(0, 0)] = h[1];
            a[(0, 1)] = -(h[0] + h[1]);
            a[(0, 2)] = h[0];
            a[(n - 1, n - 3)] = h[n - 2];
            a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
            a[(n - 1, n - 1)] = h[n - 3];
        }
    }

    let solution = a
        .lu()
        .solve(&rhs)
        .ok_or_else(|| Error::NumericalOverflow("cubic spline moment system is singular".into()))?;
    Ok(solution.iter().copied().collect())
}
