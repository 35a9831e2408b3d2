//! # qn-core
//!
//! Core types and error definitions for quintic-rs.
//!
//! This crate provides the building blocks shared across the workspace:
//! the numeric type aliases and the error hierarchy with its `ensure!` /
//! `ensure_post!` macros.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `ensure_post!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
