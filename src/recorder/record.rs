//! Call records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable record of one successful dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// 1-based position in the function's chronological log.
    pub seq: u64,

    /// Positional arguments the call was made with.
    pub input: Vec<Value>,

    /// Value the call produced.
    pub output: Value,

    /// Wall-clock append time.
    pub recorded_at: DateTime<Utc>,
}

impl CallRecord {
    /// Creates a record stamped with the current time.
    pub fn new(seq: u64, input: Vec<Value>, output: Value) -> Self {
        Self {
            seq,
            input,
            output,
            recorded_at: Utc::now(),
        }
    }
}
