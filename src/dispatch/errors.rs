//! Dispatch errors
//!
//! Only terminal outcomes live here. A candidate rejecting its input is
//! not an error; it never leaves the dispatch loop.

use serde_json::Value;
use thiserror::Error;

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Terminal dispatch failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// The name was never configured and no deferred target exists.
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// Every candidate rejected and no deferred target resolved the call.
    #[error("Function '{name}' is undefined for arguments {}", render_args(.args))]
    NoMatchingClause { name: String, args: Vec<Value> },

    /// A candidate's domain accepted but its body failed.
    #[error("Clause for '{name}' failed: {reason}")]
    ClauseFailed { name: String, reason: String },

    /// Lock poisoned or other invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Stable string code for logs and error payloads
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::UnknownFunction { .. } => "STUB_UNKNOWN_FUNCTION",
            DispatchError::NoMatchingClause { .. } => "STUB_NO_MATCHING_CLAUSE",
            DispatchError::ClauseFailed { .. } => "STUB_CLAUSE_FAILED",
            DispatchError::Internal(_) => "STUB_INTERNAL",
        }
    }
}

fn render_args(args: &[Value]) -> String {
    serde_json::to_string(args).unwrap_or_else(|_| format!("{:?}", args))
}
