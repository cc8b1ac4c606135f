//! Call Recorder subsystem for stubkit
//!
//! Records one immutable (input, output) pair per successfully
//! dispatched call, in linearization order.
//!
//! # Invariants
//!
//! - Records are append-only: never mutated, never removed.
//! - Each completed call contributes exactly one record.
//! - A failed dispatch (exhaustion, clause failure) appends nothing.

mod log;
mod record;

pub use log::CallLog;
pub use record::CallRecord;
