//! In-memory append-only call log
//!
//! One ordered record sequence per function name. The log itself is not
//! synchronized; the owning registry serializes access through its lock,
//! so append order here is the linearization order of the stub.

use std::collections::HashMap;

use serde_json::Value;

use super::record::CallRecord;

/// Append-only call log keyed by function name.
#[derive(Debug, Default)]
pub struct CallLog {
    enabled: bool,
    records: HashMap<String, Vec<CallRecord>>,
}

impl CallLog {
    /// Creates a log; a disabled log keeps nothing.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            records: HashMap::new(),
        }
    }

    /// Whether recording is enabled for this stub.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Appends one record for a completed call.
    ///
    /// Returns the appended record, or `None` when recording is disabled.
    /// Sequence numbers are 1-based per name and assigned here, under the
    /// owner's write lock.
    pub fn append(&mut self, name: &str, input: Vec<Value>, output: Value) -> Option<CallRecord> {
        if !self.enabled {
            return None;
        }

        let entries = self.records.entry(name.to_string()).or_default();
        let record = CallRecord::new(entries.len() as u64 + 1, input, output);
        entries.push(record.clone());
        Some(record)
    }

    /// Chronological records for a name. Empty slice if never called.
    pub fn records(&self, name: &str) -> &[CallRecord] {
        self.records.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any record exists under the given name.
    pub fn has_records(&self, name: &str) -> bool {
        self.records.get(name).map(|r| !r.is_empty()).unwrap_or(false)
    }
}
