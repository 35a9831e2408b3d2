//! Local cubic Hermite interpolation with configurable slope schemes.
//!
//! The *local* schemes compute `f'(xᵢ)` using only nearby data:
//!
//! - **Parabolic**: weighted average of adjacent secant slopes.
//! - **FritschButland**: weighted harmonic mean giving monotone-preserving cubics.
//! - **Kruger**: harmonic mean with sign check, also monotone-preserving.
//!
//! All three share the same cubic polynomial construction once slopes are
//! known.  The pieces are only C¹, but their second derivative is still
//! defined at every knot, so they are valid quintic seeds.

use qn_core::{ensure, errors::Result, Real};

use super::{prepare, PiecewisePolynomialInterpolator, PiecewisePolynomialResult};

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Convert knot slopes `ts` into cubic coefficient rows.
///
/// For each interval `[x_i, x_{i+1}]`:
///
///   `f(x) = c·dx³ + b·dx² + a·dx + y_i`
///
/// where `dx = x - x_i`; rows are stored highest power first.
pub(super) fn cubic_hermite_rows(xs: &[Real], ys: &[Real], ts: &[Real]) -> Vec<[Real; 4]> {
    (0..xs.len() - 1)
        .map(|i| {
            let dx = xs[i + 1] - xs[i];
            let s = (ys[i + 1] - ys[i]) / dx;
            [
                (ts[i + 1] + ts[i] - 2.0 * s) / (dx * dx),
                (3.0 * s - ts[i + 1] - 2.0 * ts[i]) / dx,
                ts[i],
                ys[i],
            ]
        })
        .collect()
}

/// Hyman monotonicity correction on boundary slopes.
///
/// Ensures the first/last derivative has the correct sign relative to the
/// adjacent secant and does not exceed `3 |S|` in magnitude.
fn hyman_boundary_correction(ts: &mut [Real], s: &[Real]) {
    let n = ts.len();
    if ts[0] * s[0] <= 0.0 {
        ts[0] = 0.0;
    } else if ts[0].abs() > 3.0 * s[0].abs() {
        ts[0] = ts[0].signum() * 3.0 * s[0].abs();
    }
    let last_s = s[n - 2];
    if ts[n - 1] * last_s <= 0.0 {
        ts[n - 1] = 0.0;
    } else if ts[n - 1].abs() > 3.0 * last_s.abs() {
        ts[n - 1] = ts[n - 1].signum() * 3.0 * last_s.abs();
    }
}

/// Parabolic end slopes from the two outermost secants.
fn parabolic_ends(ts: &mut [Real], dx: &[Real], s: &[Real]) {
    let n = ts.len();
    ts[0] = ((2.0 * dx[0] + dx[1]) * s[0] - dx[0] * s[1]) / (dx[0] + dx[1]);
    ts[n - 1] =
        ((2.0 * dx[n - 2] + dx[n - 3]) * s[n - 2] - dx[n - 2] * s[n - 3]) / (dx[n - 2] + dx[n - 3]);
}

// ── Schemes ───────────────────────────────────────────────────────────────────

/// Knot-slope rule used by [`LocalCubicInterpolator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalCubicScheme {
    /// Distance-weighted average of adjacent secants (C¹, not monotone).
    #[default]
    Parabolic,
    /// Weighted harmonic mean with Hyman-corrected parabolic ends.
    FritschButland,
    /// Harmonic mean, zero at local extrema.
    Kruger,
}

impl LocalCubicScheme {
    fn slopes(self, dx: &[Real], s: &[Real]) -> Vec<Real> {
        let n = dx.len() + 1;
        let mut ts = vec![0.0; n];
        match self {
            Self::Parabolic => {
                for i in 1..n - 1 {
                    ts[i] = (dx[i - 1] * s[i] + dx[i] * s[i - 1]) / (dx[i - 1] + dx[i]);
                }
                parabolic_ends(&mut ts, dx, s);
            }
            Self::FritschButland => {
                for i in 1..n - 1 {
                    let s_min = s[i - 1].min(s[i]);
                    let s_max = s[i - 1].max(s[i]);
                    let denom = s_max + 2.0 * s_min;
                    ts[i] = if s[i - 1] * s[i] <= 0.0 || denom.abs() < 1e-30 {
                        0.0
                    } else {
                        3.0 * s_min * s_max / denom
                    };
                }
                parabolic_ends(&mut ts, dx, s);
                hyman_boundary_correction(&mut ts, s);
            }
            Self::Kruger => {
                for i in 1..n - 1 {
                    ts[i] = if s[i - 1] * s[i] <= 0.0 {
                        0.0
                    } else {
                        2.0 / (1.0 / s[i - 1] + 1.0 / s[i])
                    };
                }
                ts[0] = (3.0 * s[0] - ts[1]) / 2.0;
                ts[n - 1] = (3.0 * s[n - 2] - ts[n - 2]) / 2.0;
            }
        }
        ts
    }
}

/// Local cubic Hermite interpolation (order 4).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCubicInterpolator {
    scheme: LocalCubicScheme,
}

impl LocalCubicInterpolator {
    /// Interpolator using the given slope scheme.
    pub fn new(scheme: LocalCubicScheme) -> Self {
        Self { scheme }
    }

    /// The slope scheme in use.
    pub fn scheme(&self) -> LocalCubicScheme {
        self.scheme
    }
}

impl PiecewisePolynomialInterpolator for LocalCubicInterpolator {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewisePolynomialResult> {
        ensure!(xs.len() == ys.len(), "xs and ys must have the same length");
        let data = prepare(xs, ys, 3)?;

        let dx: Vec<Real> = data.xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<Real> = (0..dx.len())
            .map(|i| (data.ys[i + 1] - data.ys[i]) / dx[i])
            .collect();
        let ts = self.scheme.slopes(&dx, &s);

        let rows = cubic_hermite_rows(&data.xs, &data.ys, &ts);
        PiecewisePolynomialResult::from_rows(data.xs, &rows)
    }
}
