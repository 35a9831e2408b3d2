//! # qn-math
//!
//! Shape-preserving piecewise-polynomial interpolation: the
//! monotonicity-preserving C2 quintic Hermite spline, the cubic seed
//! schemes it is built on, polynomial evaluation and node sensitivities.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// 1D interpolation schemes.
pub mod interpolations;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, close_enough};
pub use interpolations::{
    Interpolation1D, MonotonicityPreservingQuinticSplineInterpolator,
    PiecewisePolynomialInterpolator, PiecewisePolynomialInterpolator1D, PiecewisePolynomialResult,
};
