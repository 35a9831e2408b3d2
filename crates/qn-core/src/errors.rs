//! Error types for quintic-rs.
//!
//! Every fallible operation in the workspace returns the single
//! `thiserror`-derived [`Error`] enum defined here.  Preconditions are
//! checked with [`ensure!`](crate::ensure) and numerical postconditions with
//! [`ensure_post!`](crate::ensure_post).

use thiserror::Error;

/// The top-level error type used throughout quintic-rs.
///
/// None of these failures is recovered internally; they are reported to the
/// immediate caller and no partial result is produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Null, mismatched or otherwise malformed input (raised by `ensure!`).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The seed interpolator produced polynomials of too low an order.
    #[error("seed interpolant has order {order}, at least 3 is required")]
    UnsupportedSeed {
        /// Order (number of coefficients) reported by the seed.
        order: usize,
    },

    /// The first-derivative correction loop did not settle.
    #[error("derivative correction did not converge within {iterations} passes")]
    ConvergenceFailure {
        /// Number of passes performed before giving up.
        iterations: usize,
    },

    /// Computed coefficients are NaN or infinite (raised by `ensure_post!`).
    #[error("numerical overflow: {0}")]
    NumericalOverflow(String),
}

/// Shorthand `Result` type used throughout quintic-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidInput(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use qn_core::{ensure, errors::Error};
/// fn positive(x: f64) -> qn_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidInput(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidInput(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::NumericalOverflow(...))` if `$cond` is false.
///
/// Used on computed output, never on caller input.
///
/// # Example
/// ```
/// use qn_core::{ensure_post, errors::Error};
/// fn square(x: f64) -> qn_core::errors::Result<f64> {
///     let result = x * x;
///     ensure_post!(result.is_finite(), "square of {x} is not finite");
///     Ok(result)
/// }
/// assert!(square(2.0).is_ok());
/// assert!(matches!(square(1e300), Err(Error::NumericalOverflow(_))));
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::NumericalOverflow(
                format!($($msg)*)
            ));
        }
    };
}
