//! Piecewise-polynomial interpolation results and their evaluation.
//!
//! A [`PiecewisePolynomialResult`] stores, for every interval
//! `[x_i, x_{i+1}]` and every output dimension, the coefficients of a
//! polynomial in the local coordinate `t = x - x_i`, highest power first:
//!
//!   `p(t) = c_0 t^(k-1) + c_1 t^(k-2) + ... + c_(k-1)`
//!
//! where `k` is the order.  With several dimensions the rows of one interval
//! are stored consecutively, so row `dimensions * i + d` belongs to interval
//! `i` and series `d`.

use nalgebra::DMatrix;
use qn_core::{ensure, ensure_post, errors::Result, Real, Size};

use super::locate;

/// Knots and polynomial coefficients produced by a piecewise-polynomial
/// interpolator.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomialResult {
    knots: Vec<Real>,
    coefficients: DMatrix<Real>,
    order: Size,
    dimensions: Size,
}

impl PiecewisePolynomialResult {
    /// Build a result from sorted knots and a coefficient matrix.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the knots are not strictly increasing or the
    /// matrix shape does not match `(knots.len() - 1) * dimensions × order`.
    pub fn new(
        knots: Vec<Real>,
        coefficients: DMatrix<Real>,
        order: Size,
        dimensions: Size,
    ) -> Result<Self> {
        ensure!(
            knots.len() >= 2,
            "need at least 2 knots, got {}",
            knots.len()
        );
        ensure!(order >= 1, "polynomial order must be positive");
        ensure!(dimensions >= 1, "at least one output dimension is required");
        ensure!(
            knots.windows(2).all(|w| w[0] < w[1]),
            "knots must be strictly increasing"
        );
        ensure!(
            coefficients.ncols() == order,
            "coefficient matrix has {} columns, expected order {order}",
            coefficients.ncols()
        );
        ensure!(
            coefficients.nrows() == (knots.len() - 1) * dimensions,
            "coefficient matrix has {} rows, expected {}",
            coefficients.nrows(),
            (knots.len() - 1) * dimensions
        );
        Ok(Self {
            knots,
            coefficients,
            order,
            dimensions,
        })
    }

    /// Build a one-dimensional result from per-interval coefficient rows.
    pub(crate) fn from_rows<const K: usize>(knots: Vec<Real>, rows: &[[Real; K]]) -> Result<Self> {
        let coefficients = DMatrix::from_fn(rows.len(), K, |r, c| rows[r][c]);
        Self::new(knots, coefficients, K, 1)
    }

    /// Stack several results sharing the same knots into one multi-dimensional
    /// result, interleaving the rows interval by interval.
    ///
    /// # Errors
    /// `InvalidInput` if `parts` is empty or the parts disagree on knots or
    /// order; `NumericalOverflow` if any coefficient is not finite.
    pub fn interleave(parts: Vec<Self>) -> Result<Self> {
        ensure!(!parts.is_empty(), "nothing to interleave");
        let knots = parts[0].knots.clone();
        let order = parts[0].order;
        ensure!(
            parts.iter().all(|p| p.knots == knots && p.order == order),
            "interleaved results must share knots and order"
        );
        let dimensions: Size = parts.iter().map(|p| p.dimensions).sum();
        let n_intervals = knots.len() - 1;

        let mut coefficients = DMatrix::zeros(n_intervals * dimensions, order);
        for i in 0..n_intervals {
            let mut row = dimensions * i;
            for part in &parts {
                for d in 0..part.dimensions {
                    coefficients
                        .row_mut(row)
                        .copy_from(&part.coefficients.row(part.dimensions * i + d));
                    row += 1;
                }
            }
        }
        ensure_post!(
            coefficients.iter().all(|c| c.is_finite()),
            "interleaved coefficients contain NaN or infinity"
        );
        Self::new(knots, coefficients, order, dimensions)
    }

    /// The sorted knots.
    pub fn knots(&self) -> &[Real] {
        &self.knots
    }

    /// Coefficient matrix (rows = intervals × dimensions, columns = order).
    pub fn coefficients(&self) -> &DMatrix<Real> {
        &self.coefficients
    }

    /// Number of coefficients per polynomial piece.
    pub fn order(&self) -> Size {
        self.order
    }

    /// Number of interpolated series.
    pub fn dimensions(&self) -> Size {
        self.dimensions
    }

    /// Number of intervals between consecutive knots.
    pub fn interval_count(&self) -> Size {
        self.knots.len() - 1
    }

    /// Coefficients of interval `interval`, series `dimension`, highest power first.
    pub fn piece(&self, interval: Size, dimension: Size) -> Vec<Real> {
        self.coefficients
            .row(self.dimensions * interval + dimension)
            .iter()
            .copied()
            .collect()
    }

    /// Value of every series at `x`.
    ///
    /// Keys outside the knot range are extrapolated with the end pieces.
    pub fn evaluate(&self, x: Real) -> Result<Vec<Real>> {
        self.derivatives_at(x, 0)
    }

    /// Values at every key, as a `dimensions × keys.len()` matrix.
    pub fn evaluate_keys(&self, keys: &[Real]) -> Result<DMatrix<Real>> {
        self.derivatives_at_keys(keys, 0)
    }

    /// First derivatives at every key, as a `dimensions × keys.len()` matrix.
    pub fn differentiate(&self, keys: &[Real]) -> Result<DMatrix<Real>> {
        self.derivatives_at_keys(keys, 1)
    }

    /// Second derivatives at every key, as a `dimensions × keys.len()` matrix.
    pub fn differentiate_twice(&self, keys: &[Real]) -> Result<DMatrix<Real>> {
        self.derivatives_at_keys(keys, 2)
    }

    /// Value of the first series at `x`, without key validation.
    pub(crate) fn value_at(&self, x: Real) -> Real {
        self.nth_derivative(0, x, 0)
    }

    fn derivatives_at(&self, x: Real, m: usize) -> Result<Vec<Real>> {
        ensure!(x.is_finite(), "evaluation key must be finite, got {x}");
        Ok((0..self.dimensions)
            .map(|d| self.nth_derivative(d, x, m))
            .collect())
    }

    fn derivatives_at_keys(&self, keys: &[Real], m: usize) -> Result<DMatrix<Real>> {
        ensure!(
            keys.iter().all(|k| k.is_finite()),
            "evaluation keys must be finite"
        );
        Ok(DMatrix::from_fn(self.dimensions, keys.len(), |d, j| {
            self.nth_derivative(d, keys[j], m)
        }))
    }

    /// Horner evaluation of the `m`-th derivative of one piece.
    fn nth_derivative(&self, dimension: Size, x: Real, m: usize) -> Real {
        if m >= self.order {
            return 0.0;
        }
        let i = locate(&self.knots, x);
        let t = x - self.knots[i];
        let row = self.coefficients.row(self.dimensions * i + dimension);
        let degree = self.order - 1;

        let mut acc = 0.0;
        for (j, &c) in row.iter().take(self.order - m).enumerate() {
            let power = degree - j;
            let factor: Real = (0..m).map(|r| (power - r) as Real).product();
            acc = acc * t + c * factor;
        }
        acc
    }
}
