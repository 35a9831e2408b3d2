//! Interval, slope and quintic Hermite coefficient computations.

use qn_core::{ensure, errors::Result, Real};

/// Builds the per-interval quantities the quintic interpolator works with.
///
/// Stateless; all methods are closed-form and never iterate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HermiteCoefficientsProvider;

impl HermiteCoefficientsProvider {
    /// Forward differences `x[i+1] - x[i]` of sorted knots.
    ///
    /// # Errors
    /// `InvalidInput` if fewer than two knots are given or the knots are not
    /// strictly increasing.
    pub fn intervals(&self, xs: &[Real]) -> Result<Vec<Real>> {
        ensure!(xs.len() >= 2, "need at least 2 knots, got {}", xs.len());
        let intervals: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        ensure!(
            intervals.iter().all(|&h| h > 0.0),
            "knots must be sorted and distinct"
        );
        Ok(intervals)
    }

    /// Secant slopes `(y[i+1] - y[i]) / interval[i]`.
    pub fn slopes(&self, ys: &[Real], intervals: &[Real]) -> Result<Vec<Real>> {
        ensure!(
            ys.len() == intervals.len() + 1,
            "{} values do not match {} intervals",
            ys.len(),
            intervals.len()
        );
        Ok(intervals
            .iter()
            .enumerate()
            .map(|(i, &h)| (ys[i + 1] - ys[i]) / h)
            .collect())
    }

    /// Degree-5 Hermite polynomials matching value, first and second
    /// derivative at both ends of every interval.
    ///
    /// Each row is `[c5, c4, c3, c2, c1, c0]` in the local coordinate
    /// `t = x - x[i]`.
    pub fn solve(
        &self,
        ys: &[Real],
        intervals: &[Real],
        slopes: &[Real],
        first: &[Real],
        second: &[Real],
    ) -> Result<Vec<[Real; 6]>> {
        let n = ys.len();
        ensure!(
            intervals.len() + 1 == n && slopes.len() + 1 == n,
            "intervals and slopes must have one entry fewer than values"
        );
        ensure!(
            first.len() == n && second.len() == n,
            "first and second derivatives need one entry per knot"
        );

        Ok((0..n - 1)
            .map(|i| {
                let h = intervals[i];
                let (d0, d1) = (first[i], first[i + 1]);
                let (q0, q1) = (second[i], second[i + 1]);

                // Residual value, slope and curvature left after the
                // quadratic Taylor part at the left knot.
                let value = h * (slopes[i] - d0 - 0.5 * q0 * h);
                let slope = h * (d1 - d0 - q0 * h);
                let curvature = h * h * (q1 - q0);

                let h3 = h * h * h;
                [
                    (6.0 * value - 3.0 * slope + 0.5 * curvature) / (h3 * h * h),
                    (-15.0 * value + 7.0 * slope - curvature) / (h3 * h),
                    (10.0 * value - 4.0 * slope + 0.5 * curvature) / h3,
                    0.5 * q0,
                    d0,
                    ys[i],
                ]
            })
            .collect())
    }
}
