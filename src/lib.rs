//! stubkit - A strict, deterministic function-stubbing toolkit for
//! concurrent tests
//!
//! Ordered domain-restricted dispatch over registered candidate clauses,
//! optional fallback to a real module, and an append-only call log with
//! a read-only query layer.

pub mod dispatch;
pub mod matcher;
pub mod observability;
pub mod query;
pub mod recorder;
pub mod registry;
pub mod stub;
