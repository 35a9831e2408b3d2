//! 1D interpolation traits and piecewise-polynomial interpolators.
//!
//! Every interpolator here produces a [`PiecewisePolynomialResult`].  Cubic
//! schemes serve as *seeds* for the shape-preserving
//! [`MonotonicityPreservingQuinticSplineInterpolator`], which only needs a
//! seed able to supply first and second derivatives at the knots.

use std::fmt;

use qn_core::{ensure, errors::Result, Real};
use rayon::prelude::*;

mod akima;
mod cubic;
mod cubic_spline;
mod hermite;
mod interpolator_1d;
mod monotone_quintic;
mod piecewise_polynomial;

pub use akima::SemiLocalCubicSplineInterpolator;
pub use cubic::{LocalCubicInterpolator, LocalCubicScheme};
pub use cubic_spline::{CubicSplineInterpolator, NaturalSplineInterpolator};
pub use hermite::HermiteCoefficientsProvider;
pub use interpolator_1d::{PiecewisePolynomialDataBundle, PiecewisePolynomialInterpolator1D};
pub use monotone_quintic::{
    MonotonicityPreservingQuinticSplineInterpolator, QuinticSplineBuilder, QuinticSplineConfig,
};
pub use piecewise_polynomial::PiecewisePolynomialResult;

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: fmt::Debug {
    /// Evaluate the interpolation at `x`.
    fn operator(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// An interpolation method producing piecewise polynomials.
///
/// Implementations validate and sort their input themselves, so `xs` need
/// not be ordered.
pub trait PiecewisePolynomialInterpolator: fmt::Debug + Send + Sync {
    /// Interpolate one series of values.
    ///
    /// `ys` holds one value per knot; methods that accept boundary conditions
    /// also take `xs.len() + 2` values (see [`CubicSplineInterpolator`]).
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewisePolynomialResult>;

    /// Interpolate several series sharing the same knots.
    ///
    /// Series are processed independently (in parallel) and their rows are
    /// interleaved interval by interval in the result.
    fn interpolate_rows(
        &self,
        xs: &[Real],
        rows: &[Vec<Real>],
    ) -> Result<PiecewisePolynomialResult> {
        ensure!(
            !rows.is_empty(),
            "at least one series of values is required"
        );
        ensure!(
            rows.iter().all(|r| r.len() == rows[0].len()),
            "all series must have the same length"
        );
        let parts = rows
            .par_iter()
            .map(|row| self.interpolate(xs, row))
            .collect::<Result<Vec<_>>>()?;
        PiecewisePolynomialResult::interleave(parts)
    }

    /// Interpolate and evaluate at `keys` in one go.
    fn interpolate_at(&self, xs: &[Real], ys: &[Real], keys: &[Real]) -> Result<Vec<Real>> {
        let pp = self.interpolate(xs, ys)?;
        let values = pp.evaluate_keys(keys)?;
        Ok(values.row(0).iter().copied().collect())
    }
}

// ── Input preparation ─────────────────────────────────────────────────────────

/// Validated knots and values, sorted by knot.
#[derive(Debug, Clone)]
pub(crate) struct SortedData {
    pub xs: Vec<Real>,
    pub ys: Vec<Real>,
    /// Boundary derivatives `(at min knot, at max knot)` when `n + 2` values
    /// were supplied.
    pub end_derivatives: Option<(Real, Real)>,
}

/// Validate `xs`/`ys` and sort them by `xs`.
///
/// Accepts `ys.len() == xs.len()` or `ys.len() == xs.len() + 2`; in the
/// latter case `ys[1..=n]` are the knot values and `ys[0]`, `ys[n + 1]` the
/// boundary derivatives.
pub(crate) fn prepare(xs: &[Real], ys: &[Real], min_points: usize) -> Result<SortedData> {
    let n = xs.len();
    ensure!(
        ys.len() == n || ys.len() == n + 2,
        "ys length ({}) must equal xs length ({n}) or xs length + 2",
        ys.len()
    );
    ensure!(
        n >= min_points,
        "need at least {min_points} data points, got {n}"
    );
    ensure!(xs.iter().all(|x| !x.is_nan()), "xs containing NaN");
    ensure!(xs.iter().all(|x| x.is_finite()), "xs containing infinity");
    ensure!(ys.iter().all(|y| !y.is_nan()), "ys containing NaN");
    ensure!(ys.iter().all(|y| y.is_finite()), "ys containing infinity");

    let (values, end_derivatives) = if ys.len() == n {
        (ys, None)
    } else {
        (&ys[1..=n], Some((ys[0], ys[n + 1])))
    };

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));
    let sorted_xs: Vec<Real> = order.iter().map(|&i| xs[i]).collect();
    let sorted_ys: Vec<Real> = order.iter().map(|&i| values[i]).collect();
    ensure!(
        sorted_xs.windows(2).all(|w| w[0] < w[1]),
        "xs should be distinct"
    );

    Ok(SortedData {
        xs: sorted_xs,
        ys: sorted_ys,
        end_derivatives,
    })
}

/// Binary search: find `i` such that `xs[i] <= x < xs[i+1]`, clamped.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Piecewise-linear interpolation (order 2).
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSplineInterpolator;

impl PiecewisePolynomialInterpolator for LinearSplineInterpolator {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewisePolynomialResult> {
        ensure!(xs.len() == ys.len(), "xs and ys must have the same length");
        let data = prepare(xs, ys, 2)?;
        let rows: Vec<[Real; 2]> = data
            .xs
            .windows(2)
            .zip(data.ys.windows(2))
            .map(|(x, y)| [(y[1] - y[0]) / (x[1] - x[0]), y[0]])
            .collect();
        PiecewisePolynomialResult::from_rows(data.xs, &rows)
    }
}
