//! Quintic Hermite interpolation preserving local monotonicity and C2
//! continuity.
//!
//! Follows R. L. Dougherty, A. Edelman and J. M. Hyman, "Nonnegativity-,
//! Monotonicity-, or Convexity-Preserving Cubic and Quintic Hermite
//! Interpolation", *Mathematics of Computation* 52 (186), 1989, pp. 471-494.
//!
//! A seed interpolant of order ≥ 3 supplies first and second derivatives at
//! every knot.  The first derivatives are bounded by the secant slopes and
//! then corrected until the admissible second-derivative ranges of adjacent
//! intervals overlap; the second derivatives are finally clamped into those
//! ranges.  A shape-preserving three-point rule is used at the end knots.
//!
//! The bounds are oriented by the sign of each interval's secant slope, so
//! decreasing data is treated as the mirror image of increasing data.

use qn_core::{ensure, ensure_post, errors::Result, Error, Real, Size};
use tracing::{debug, trace, warn};

use crate::comparison::{relax_down, relax_up, sign, snap_to_zero, BOUND_TOLERANCE, ZERO_SNAP};

use super::{
    prepare, HermiteCoefficientsProvider, PiecewisePolynomialInterpolator,
    PiecewisePolynomialResult,
};

/// Bound on `|f'|` relative to the adjacent secant slope.
const SLOPE_FACTOR: Real = 5.0;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Settings for [`MonotonicityPreservingQuinticSplineInterpolator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuinticSplineConfig {
    /// Maximum number of derivative-correction passes.
    ///
    /// A pass that changes nothing ends the loop; exceeding the cap returns
    /// [`Error::ConvergenceFailure`].
    pub max_iterations: Size,
}

impl Default for QuinticSplineConfig {
    /// Default values:
    /// - `max_iterations`: 100
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

impl QuinticSplineConfig {
    /// Configuration with the given pass cap.
    ///
    /// # Errors
    /// `InvalidInput` if `max_iterations` is zero.
    pub fn new(max_iterations: Size) -> Result<Self> {
        ensure!(max_iterations > 0, "max_iterations must be positive");
        Ok(Self { max_iterations })
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`MonotonicityPreservingQuinticSplineInterpolator`].
///
/// ```
/// use qn_math::interpolations::{
///     CubicSplineInterpolator, MonotonicityPreservingQuinticSplineInterpolator,
/// };
///
/// let interp = MonotonicityPreservingQuinticSplineInterpolator::builder()
///     .seed(CubicSplineInterpolator)
///     .max_iterations(50)
///     .build()
///     .unwrap();
/// assert_eq!(interp.config().max_iterations, 50);
/// ```
#[derive(Debug, Clone)]
pub struct QuinticSplineBuilder<S> {
    seed: Option<S>,
    config: QuinticSplineConfig,
}

impl<S: PiecewisePolynomialInterpolator> QuinticSplineBuilder<S> {
    /// Seed interpolator supplying the initial derivatives.
    pub fn seed(mut self, seed: S) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap on derivative-correction passes.
    pub fn max_iterations(mut self, max_iterations: Size) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    /// `InvalidInput` if no seed was given or the pass cap is zero.
    pub fn build(self) -> Result<MonotonicityPreservingQuinticSplineInterpolator<S>> {
        let config = QuinticSplineConfig::new(self.config.max_iterations)?;
        match self.seed {
            Some(seed) => Ok(MonotonicityPreservingQuinticSplineInterpolator { seed, config }),
            None => Err(Error::InvalidInput(
                "a seed interpolator is required".into(),
            )),
        }
    }
}

// ── Interpolator ──────────────────────────────────────────────────────────────

/// Monotonicity-preserving C2 quintic spline interpolator (order 6).
#[derive(Debug, Clone)]
pub struct MonotonicityPreservingQuinticSplineInterpolator<S> {
    seed: S,
    config: QuinticSplineConfig,
}

impl<S: PiecewisePolynomialInterpolator> MonotonicityPreservingQuinticSplineInterpolator<S> {
    /// Interpolator with the default configuration.
    pub fn new(seed: S) -> Self {
        Self {
            seed,
            config: QuinticSplineConfig::default(),
        }
    }

    /// Interpolator with an explicit configuration.
    pub fn with_config(seed: S, config: QuinticSplineConfig) -> Self {
        Self { seed, config }
    }

    /// Start a builder.
    pub fn builder() -> QuinticSplineBuilder<S> {
        QuinticSplineBuilder {
            seed: None,
            config: QuinticSplineConfig::default(),
        }
    }

    /// The seed interpolator.
    pub fn seed(&self) -> &S {
        &self.seed
    }

    /// The active configuration.
    pub fn config(&self) -> QuinticSplineConfig {
        self.config
    }
}

impl<S: PiecewisePolynomialInterpolator> PiecewisePolynomialInterpolator
    for MonotonicityPreservingQuinticSplineInterpolator<S>
{
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewisePolynomialResult> {
        let data = prepare(xs, ys, 3)?;
        let n = data.xs.len();
        let solver = HermiteCoefficientsProvider;

        let intervals = solver.intervals(&data.xs)?;
        let slopes = solver.slopes(&data.ys, &intervals)?;
        ensure_post!(
            slopes.iter().all(|s| s.is_finite()),
            "secant slopes overflow, input too large"
        );

        // The seed sees the caller's data, including any boundary values.
        let seed = self.seed.interpolate(xs, ys)?;
        if seed.order() < 3 {
            return Err(Error::UnsupportedSeed {
                order: seed.order(),
            });
        }
        let initial_first = seed.differentiate(&data.xs)?;
        let initial_second = seed.differentiate_twice(&data.xs)?;
        let initial_first: Vec<Real> = initial_first.row(0).iter().copied().collect();
        let initial_second: Vec<Real> = initial_second.row(0).iter().copied().collect();

        let mut first = bound_first_derivatives(&slopes, &initial_first);
        let mut bounds = Bounds::new(n - 1);
        bounds.refresh(&intervals, &slopes, &first);

        let mut passes = 0;
        loop {
            if passes == self.config.max_iterations {
                warn!(
                    knots = n,
                    passes, "first-derivative correction did not converge"
                );
                return Err(Error::ConvergenceFailure { iterations: passes });
            }
            passes += 1;

            let mut corrections = 0;
            for i in 0..n - 2 {
                let knot = i + 1;
                if first[knot] != 0.0 && !overlap(bounds.a_range[knot], bounds.b_range[i]) {
                    let corrected = recalculate_first(&intervals, &slopes, &bounds, knot);
                    trace!(
                        knot,
                        from = first[knot],
                        to = corrected,
                        "first derivative corrected"
                    );
                    first[knot] = corrected;
                    corrections += 1;
                }
            }
            bounds.refresh(&intervals, &slopes, &first);
            debug!(pass = passes, corrections, "derivative correction pass");
            if corrections == 0 {
                break;
            }
        }

        let second = clamp_second_derivatives(&initial_second, &bounds);
        let coefs = solver.solve(&data.ys, &intervals, &slopes, &first, &second)?;
        ensure_post!(
            coefs.iter().flatten().all(|c| c.is_finite()),
            "quintic coefficients are not finite, input too large"
        );
        debug!(knots = n, passes, "monotone quintic spline built");

        PiecewisePolynomialResult::from_rows(data.xs, &coefs)
    }
}

// ── Algorithm steps ───────────────────────────────────────────────────────────

/// Clamp `value` into `[0, limit]` for a non-negative direction, into
/// `[-limit, 0]` otherwise.
fn clamp_directed(value: Real, direction: Real, limit: Real) -> Real {
    if direction >= 0.0 {
        value.max(0.0).min(limit)
    } else {
        value.min(0.0).max(-limit)
    }
}

/// Bound the seed's first derivatives by the adjacent secant slopes.
///
/// Where the neighbouring secants disagree in sign the seed decides the
/// direction; where either is zero the derivative is zero.
fn bound_first_derivatives(slopes: &[Real], initial: &[Real]) -> Vec<Real> {
    let n = initial.len();
    let mut first = vec![0.0; n];

    first[0] = clamp_directed(initial[0], sign(slopes[0]), SLOPE_FACTOR * slopes[0].abs());
    first[n - 1] = clamp_directed(
        initial[n - 1],
        sign(slopes[n - 2]),
        SLOPE_FACTOR * slopes[n - 2].abs(),
    );

    for i in 1..n - 1 {
        let product = slopes[i - 1] * slopes[i];
        let direction = if product > 0.0 {
            sign(slopes[i])
        } else if product < 0.0 {
            sign(initial[i])
        } else {
            0.0
        };
        let limit = SLOPE_FACTOR * slopes[i - 1].abs().min(slopes[i].abs());
        first[i] = clamp_directed(initial[i], direction, limit);
    }
    first
}

/// Per-interval working arrays, reused across correction passes.
#[derive(Debug)]
struct Bounds {
    /// `max(0, f'[i] / s[i])`.
    a: Vec<Real>,
    /// `max(0, f'[i+1] / s[i])`.
    b: Vec<Real>,
    /// Admissible second derivative at the left knot of each interval.
    a_range: Vec<(Real, Real)>,
    /// Admissible second derivative at the right knot of each interval.
    b_range: Vec<(Real, Real)>,
}

impl Bounds {
    fn new(n_intervals: usize) -> Self {
        Self {
            a: vec![0.0; n_intervals],
            b: vec![0.0; n_intervals],
            a_range: vec![(0.0, 0.0); n_intervals],
            b_range: vec![(0.0, 0.0); n_intervals],
        }
    }

    fn refresh(&mut self, intervals: &[Real], slopes: &[Real], first: &[Real]) {
        for (i, (&h, &s)) in intervals.iter().zip(slopes).enumerate() {
            let (a, b) = if s == 0.0 {
                (0.0, 0.0)
            } else {
                ((first[i] / s).max(0.0), (first[i + 1] / s).max(0.0))
            };
            self.a[i] = a;
            self.b[i] = b;

            let d_plus = if first[i] * s > 0.0 { first[i] } else { 0.0 };
            let low = (-7.9 * d_plus - 0.26 * d_plus * b) / h;
            let high = ((20.0 - 2.0 * b) * s - 8.0 * d_plus - 0.48 * d_plus * b) / h;
            self.a_range[i] = oriented(low, high, d_plus == 0.0, s);

            let d_minus = if first[i + 1] * s > 0.0 {
                first[i + 1]
            } else {
                0.0
            };
            let low = ((-20.0 + 2.0 * a) * s + 8.0 * d_minus + 0.48 * d_minus * a) / h;
            let high = (7.9 * d_minus + 0.26 * d_minus * a) / h;
            self.b_range[i] = oriented(low, high, d_minus == 0.0, s);
        }
    }
}

/// Order a bound pair for an interval with secant slope `s`.
///
/// Without a directional derivative the pair is simply sorted; otherwise the
/// pair is kept as computed for rising data and swapped for falling data,
/// so an infeasible (inverted) range stays inverted.
fn oriented(low: Real, high: Real, undirected: bool, s: Real) -> (Real, Real) {
    let (lo, hi) = if undirected {
        (low.min(high), low.max(high))
    } else if s < 0.0 {
        (high, low)
    } else {
        (low, high)
    };
    (snap_to_zero(lo, ZERO_SNAP), snap_to_zero(hi, ZERO_SNAP))
}

/// `true` unless the two ranges are separated beyond the relative tolerance.
fn overlap(a: (Real, Real), b: (Real, Real)) -> bool {
    let below = relax_up(a.1, BOUND_TOLERANCE) < relax_down(b.0, BOUND_TOLERANCE);
    let above = relax_down(a.0, BOUND_TOLERANCE) > relax_up(b.1, BOUND_TOLERANCE);
    !(below || above)
}

/// Interval-weighted blend of the two intervals meeting at `knot`.
fn recalculate_first(intervals: &[Real], slopes: &[Real], bounds: &Bounds, knot: usize) -> Real {
    let (h_right, h_left) = (intervals[knot], intervals[knot - 1]);
    let b_right = bounds.b[knot];
    let a_left = bounds.a[knot - 1];
    let numerator = (20.0 - 2.0 * b_right) * slopes[knot] / h_right
        + (20.0 - 2.0 * a_left) * slopes[knot - 1] / h_left;
    let denominator = (8.0 + 0.48 * b_right) / h_right + (8.0 + 0.48 * a_left) / h_left;
    numerator / denominator
}

/// `min(hi, max(lo, value))`; an inverted range yields `hi`.
fn clamp_into(value: Real, (lo, hi): (Real, Real)) -> Real {
    hi.min(lo.max(value))
}

/// Clamp the seed's second derivatives into the admissible ranges, interior
/// knots first against the right interval and then the left one.
fn clamp_second_derivatives(initial: &[Real], bounds: &Bounds) -> Vec<Real> {
    let n = initial.len();
    let mut second = vec![0.0; n];
    for i in 0..n - 2 {
        let clamped = clamp_into(initial[i + 1], bounds.a_range[i + 1]);
        second[i + 1] = clamp_into(clamped, bounds.b_range[i]);
    }
    second[0] = clamp_into(initial[0], bounds.a_range[0]);
    second[n - 1] = clamp_into(initial[n - 1], bounds.b_range[n - 2]);
    second
}
