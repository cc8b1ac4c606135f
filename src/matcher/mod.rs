//! Argument domain matching for stubkit
//!
//! Every candidate clause carries an explicit argument specification.
//! Matching is strict: exact equality, no type coercion, arity mismatch
//! is an ordinary rejection.
//!
//! # Invariants
//!
//! - Matching is pure and deterministic: same spec + same arguments =
//!   same verdict, no shared state touched.
//! - A rejection is a control signal for the dispatcher, never an error.

mod pattern;

pub use pattern::{ArgPattern, ArgSpec};
