//! Observability for stubkit
//!
//! Structured logs only: one JSON object per line, deterministic key
//! ordering, explicit severity, synchronous writes. Observability is
//! read-only and must never affect dispatch outcomes.

mod logger;

pub use logger::{Logger, Severity};
