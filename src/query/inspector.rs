//! Read-only call-log inspection
//!
//! Every operation re-reads the log, so answers always reflect the
//! latest completed calls. Positional queries are 1-indexed and
//! out-of-range is an error, never a default.

use serde_json::{json, Value};

use crate::recorder::CallRecord;
use crate::registry::{ConfigError, Registry};

use super::errors::{QueryError, QueryResult};
use super::request::CallQuery;
use super::response::QueryAnswer;

/// Derives queries over one stub's call log.
pub struct CallInspector<'a> {
    registry: &'a Registry,
}

impl<'a> CallInspector<'a> {
    /// Creates an inspector over the given registry.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Number of recorded calls of `name`.
    pub fn call_count(&self, name: &str) -> QueryResult<u64> {
        Ok(self.records(name)?.len() as u64)
    }

    /// Number of recorded calls of `name` made with exactly `args`.
    pub fn call_count_with(&self, name: &str, args: &[Value]) -> QueryResult<u64> {
        Ok(self
            .records(name)?
            .iter()
            .filter(|record| record.input == args)
            .count() as u64)
    }

    /// Whether `name` was called at all.
    pub fn called(&self, name: &str) -> QueryResult<bool> {
        Ok(self.call_count(name)? > 0)
    }

    /// Whether `name` was called exactly once.
    pub fn called_once(&self, name: &str) -> QueryResult<bool> {
        self.called_times(name, 1)
    }

    /// Whether `name` was called exactly twice.
    pub fn called_twice(&self, name: &str) -> QueryResult<bool> {
        self.called_times(name, 2)
    }

    /// Whether `name` was called exactly three times.
    pub fn called_thrice(&self, name: &str) -> QueryResult<bool> {
        self.called_times(name, 3)
    }

    /// Whether `name` was called exactly `times` times.
    pub fn called_times(&self, name: &str, times: u64) -> QueryResult<bool> {
        Ok(self.call_count(name)? == times)
    }

    /// The nth recorded call of `name`, 1-indexed.
    pub fn nth_call(&self, name: &str, index: u64) -> QueryResult<CallRecord> {
        let records = self.records(name)?;
        let recorded = records.len() as u64;

        if index == 0 || index > recorded {
            return Err(QueryError::OutOfRange {
                name: name.to_string(),
                index,
                recorded,
            });
        }
        Ok(records[(index - 1) as usize].clone())
    }

    /// The first recorded call of `name`.
    pub fn first_call(&self, name: &str) -> QueryResult<CallRecord> {
        self.nth_call(name, 1)
    }

    /// The second recorded call of `name`.
    pub fn second_call(&self, name: &str) -> QueryResult<CallRecord> {
        self.nth_call(name, 2)
    }

    /// The third recorded call of `name`.
    pub fn third_call(&self, name: &str) -> QueryResult<CallRecord> {
        self.nth_call(name, 3)
    }

    /// The most recent recorded call of `name`.
    pub fn last_call(&self, name: &str) -> QueryResult<CallRecord> {
        let recorded = self.call_count(name)?;
        self.nth_call(name, recorded) // recorded == 0 surfaces OutOfRange
    }

    /// Whether some recorded call of `name` was made with `args`.
    pub fn called_with(&self, name: &str, args: &[Value]) -> QueryResult<bool> {
        Ok(self.call_count_with(name, args)? > 0)
    }

    /// Whether the full chronological input sequence of `name` equals
    /// `calls`, element for element, length and order.
    pub fn called_with_exactly(&self, name: &str, calls: &[Vec<Value>]) -> QueryResult<bool> {
        let records = self.records(name)?;

        Ok(records.len() == calls.len()
            && records
                .iter()
                .zip(calls.iter())
                .all(|(record, expected)| &record.input == expected))
    }

    /// Whether some recorded call of `name` satisfies the predicate.
    pub fn called_where(
        &self,
        name: &str,
        predicate: impl Fn(&CallRecord) -> bool,
    ) -> QueryResult<bool> {
        Ok(self.records(name)?.iter().any(predicate))
    }

    /// Whether some recorded call of `name` produced `value`.
    pub fn returned(&self, name: &str, value: &Value) -> QueryResult<bool> {
        Ok(self
            .records(name)?
            .iter()
            .any(|record| &record.output == value))
    }

    /// Answers one envelope query with a JSON payload.
    pub fn answer(&self, query: CallQuery) -> QueryAnswer {
        match self.answer_inner(query) {
            Ok(data) => QueryAnswer::success(data),
            Err(err) => QueryAnswer::error(&err),
        }
    }

    fn answer_inner(&self, query: CallQuery) -> QueryResult<Value> {
        match query {
            CallQuery::CallCount { name, args: None } => {
                Ok(json!(self.call_count(&name)?))
            }
            CallQuery::CallCount {
                name,
                args: Some(args),
            } => Ok(json!(self.call_count_with(&name, &args)?)),
            CallQuery::Called { name } => Ok(json!(self.called(&name)?)),
            CallQuery::CalledTimes { name, times } => {
                Ok(json!(self.called_times(&name, times)?))
            }
            CallQuery::NthCall { name, index } => {
                Ok(serde_json::to_value(self.nth_call(&name, index)?)
                    .map_err(|e| QueryError::Internal(e.to_string()))?)
            }
            CallQuery::LastCall { name } => {
                Ok(serde_json::to_value(self.last_call(&name)?)
                    .map_err(|e| QueryError::Internal(e.to_string()))?)
            }
            CallQuery::CalledWith { name, args } => {
                Ok(json!(self.called_with(&name, &args)?))
            }
            CallQuery::CalledWithExactly { name, calls } => {
                Ok(json!(self.called_with_exactly(&name, &calls)?))
            }
            CallQuery::Returned { name, value } => Ok(json!(self.returned(&name, &value)?)),
        }
    }

    /// Guarded log read: recording must be enabled and the name known.
    fn records(&self, name: &str) -> QueryResult<Vec<CallRecord>> {
        if !self.registry.recording() {
            return Err(QueryError::RecordingDisabled);
        }
        if !self.registry.known(name).map_err(lift)? {
            return Err(QueryError::UnknownFunction {
                name: name.to_string(),
            });
        }
        self.registry.records(name).map_err(lift)
    }
}

fn lift(err: ConfigError) -> QueryError {
    QueryError::Internal(err.to_string())
}
