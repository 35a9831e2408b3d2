//! One-dimensional wrapper around a piecewise-polynomial interpolator.
//!
//! [`PiecewisePolynomialInterpolator1D`] prepares a
//! [`PiecewisePolynomialDataBundle`] once (sorted knots, values and the
//! fitted polynomial) and answers value, derivative and node-sensitivity
//! queries against it.

use qn_core::{ensure, errors::Result, Real};
use rayon::prelude::*;
use tracing::trace;

use super::{prepare, Interpolation1D, PiecewisePolynomialInterpolator, PiecewisePolynomialResult};

/// Relative bump applied to each node value for sensitivities.
const SENSITIVITY_BUMP: Real = 1e-7;

/// Sorted knots and values together with their fitted polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomialDataBundle {
    keys: Vec<Real>,
    values: Vec<Real>,
    polynomial: PiecewisePolynomialResult,
}

impl PiecewisePolynomialDataBundle {
    /// Sorted knots.
    pub fn keys(&self) -> &[Real] {
        &self.keys
    }

    /// Values in knot order, including any boundary derivatives at the ends.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// The fitted polynomial.
    pub fn polynomial(&self) -> &PiecewisePolynomialResult {
        &self.polynomial
    }

    /// Index of the first knot value within [`values`](Self::values).
    fn value_offset(&self) -> usize {
        (self.values.len() - self.keys.len()) / 2
    }
}

impl Interpolation1D for PiecewisePolynomialDataBundle {
    fn operator(&self, x: Real) -> Real {
        self.polynomial.value_at(x)
    }

    fn x_min(&self) -> Real {
        self.keys[0]
    }

    fn x_max(&self) -> Real {
        self.keys[self.keys.len() - 1]
    }
}

/// Value, derivative and node-sensitivity queries for any
/// [`PiecewisePolynomialInterpolator`].
///
/// ```
/// use qn_math::interpolations::{
///     CubicSplineInterpolator, MonotonicityPreservingQuinticSplineInterpolator,
///     PiecewisePolynomialInterpolator1D,
/// };
///
/// let interp = PiecewisePolynomialInterpolator1D::new(
///     MonotonicityPreservingQuinticSplineInterpolator::new(CubicSplineInterpolator),
/// );
/// let bundle = interp.data_bundle(&[1.0, 2.0, 3.0, 4.0], &[1.0, 4.0, 9.0, 16.0]).unwrap();
/// let sense = interp.node_sensitivities_for_value(&bundle, 2.0).unwrap();
/// assert!((sense[1] - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct PiecewisePolynomialInterpolator1D<I> {
    method: I,
}

impl<I: PiecewisePolynomialInterpolator> PiecewisePolynomialInterpolator1D<I> {
    /// Wrap an interpolation method.
    pub fn new(method: I) -> Self {
        Self { method }
    }

    /// The wrapped method.
    pub fn method(&self) -> &I {
        &self.method
    }

    /// Sort `(x, y)` and fit the polynomial.
    ///
    /// With `y.len() == x.len() + 2` the outer entries stay at the ends as
    /// boundary derivatives.
    pub fn data_bundle(&self, x: &[Real], y: &[Real]) -> Result<PiecewisePolynomialDataBundle> {
        let data = prepare(x, y, 2)?;
        let values = match data.end_derivatives {
            Some((left, right)) => {
                let mut values = Vec::with_capacity(data.ys.len() + 2);
                values.push(left);
                values.extend_from_slice(&data.ys);
                values.push(right);
                values
            }
            None => data.ys,
        };
        self.fit(data.xs, values)
    }

    /// Fit the polynomial to knots that are already strictly increasing.
    pub fn data_bundle_from_sorted(
        &self,
        x: &[Real],
        y: &[Real],
    ) -> Result<PiecewisePolynomialDataBundle> {
        ensure!(
            x.windows(2).all(|w| w[0] < w[1]),
            "keys must be sorted and distinct"
        );
        self.fit(x.to_vec(), y.to_vec())
    }

    fn fit(&self, keys: Vec<Real>, values: Vec<Real>) -> Result<PiecewisePolynomialDataBundle> {
        let polynomial = self.method.interpolate(&keys, &values)?;
        Ok(PiecewisePolynomialDataBundle {
            keys,
            values,
            polynomial,
        })
    }

    /// Interpolated value at `x`.
    pub fn interpolate(&self, bundle: &PiecewisePolynomialDataBundle, x: Real) -> Result<Real> {
        Ok(bundle.polynomial.evaluate(x)?[0])
    }

    /// First derivative of the interpolant at `x`.
    pub fn first_derivative(
        &self,
        bundle: &PiecewisePolynomialDataBundle,
        x: Real,
    ) -> Result<Real> {
        Ok(bundle.polynomial.differentiate(&[x])?[(0, 0)])
    }

    /// `∂f(x)/∂y[j]` for every knot value `y[j]`.
    ///
    /// Each value is bumped up and down by a relative `1e-7` (absolute when
    /// the value is zero) and the whole construction is re-run, so the
    /// result follows whichever branches the shape constraints take on the
    /// bumped data.  Boundary derivatives, if any, are held fixed.
    pub fn node_sensitivities_for_value(
        &self,
        bundle: &PiecewisePolynomialDataBundle,
        x: Real,
    ) -> Result<Vec<Real>> {
        ensure!(x.is_finite(), "query point must be finite, got {x}");
        let offset = bundle.value_offset();
        let sensitivities = (0..bundle.keys.len())
            .into_par_iter()
            .map(|j| -> Result<Real> {
                let y = bundle.values[offset + j];
                let (up, down) = if y == 0.0 {
                    (SENSITIVITY_BUMP, -SENSITIVITY_BUMP)
                } else {
                    (y * (1.0 + SENSITIVITY_BUMP), y * (1.0 - SENSITIVITY_BUMP))
                };
                let diff = self.bumped_value(bundle, offset + j, up, x)?
                    - self.bumped_value(bundle, offset + j, down, x)?;
                let scale = if y == 0.0 { 1.0 } else { y };
                Ok(0.5 * diff / SENSITIVITY_BUMP / scale)
            })
            .collect::<Result<Vec<Real>>>()?;
        trace!(
            x,
            nodes = sensitivities.len(),
            "node sensitivities computed"
        );
        Ok(sensitivities)
    }

    fn bumped_value(
        &self,
        bundle: &PiecewisePolynomialDataBundle,
        index: usize,
        value: Real,
        x: Real,
    ) -> Result<Real> {
        let mut values = bundle.values.clone();
        values[index] = value;
        Ok(self.method.interpolate(&bundle.keys, &values)?.value_at(x))
    }
}
