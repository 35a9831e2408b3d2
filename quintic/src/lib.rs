//! # quintic
//!
//! Monotonicity-preserving quintic Hermite spline interpolation in Rust.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `qn-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! quintic = "0.1"
//! ```
//!
//! ```rust
//! use quintic::math::interpolations::{
//!     CubicSplineInterpolator, MonotonicityPreservingQuinticSplineInterpolator,
//!     PiecewisePolynomialInterpolator,
//! };
//!
//! let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let ys = [0.0, 0.1, 2.0, 2.1, 5.0];
//! let spline = MonotonicityPreservingQuinticSplineInterpolator::new(CubicSplineInterpolator);
//! let pp = spline.interpolate(&xs, &ys).unwrap();
//! assert_eq!(pp.order(), 6);
//! assert!((pp.evaluate(3.0).unwrap()[0] - 2.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use qn_core as core;

/// Interpolation schemes, polynomial evaluation and sensitivities.
pub use qn_math as math;
