//! Implementation Registry subsystem for stubkit
//!
//! Per-stub state store: the ordered candidate table, the optional
//! deferred fallback target, and the call log, guarded by one lock.
//!
//! # Invariants
//!
//! - Candidate order for a name is fixed at registration and never
//!   reordered.
//! - All mutation of one instance is linearizable: a single write lock
//!   per operation, no lost or duplicated appends.
//! - Referencing a name that was never configured is a configuration
//!   error, distinct from "no candidate matched".

mod candidate;
mod errors;
mod fallback;
mod state;

pub use candidate::{Candidate, ClauseOutcome};
pub use errors::{ConfigError, ConfigResult};
pub use fallback::{FallbackModule, FunctionSig, ModuleTable};
pub use state::{EntrySnapshot, Registry};
