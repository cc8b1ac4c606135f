//! Call-log query envelope
//!
//! JSON request parsing for the introspection entry point. Predicate
//! queries (`called_where`) cannot cross a JSON boundary and exist only
//! as typed inspector methods.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{QueryError, QueryResult};

/// A parsed call-log query.
#[derive(Debug, Clone, PartialEq)]
pub enum CallQuery {
    /// Number of recorded calls; with `args`, only calls made with them.
    CallCount {
        name: String,
        args: Option<Vec<Value>>,
    },
    /// Whether the function was called at all.
    Called { name: String },
    /// Whether the function was called exactly `times` times.
    CalledTimes { name: String, times: u64 },
    /// The nth recorded call, 1-indexed.
    NthCall { name: String, index: u64 },
    /// The most recent recorded call.
    LastCall { name: String },
    /// Whether some recorded call was made with the given arguments.
    CalledWith { name: String, args: Vec<Value> },
    /// Whether the full chronological input sequence equals `calls`.
    CalledWithExactly {
        name: String,
        calls: Vec<Vec<Value>>,
    },
    /// Whether some recorded call produced the given value.
    Returned { name: String, value: Value },
}

/// Raw envelope for parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawQuery {
    query: String,
    name: String,
    #[serde(default)]
    args: Option<Vec<Value>>,
    #[serde(default)]
    calls: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    index: Option<u64>,
    #[serde(default)]
    times: Option<u64>,
    #[serde(default)]
    value: Option<Value>,
}

impl CallQuery {
    /// Parse a query from a JSON string.
    pub fn parse(json: &str) -> QueryResult<Self> {
        let raw: RawQuery = serde_json::from_str(json).map_err(|e| QueryError::InvalidQuery {
            reason: format!("Invalid JSON: {}", e),
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawQuery) -> QueryResult<Self> {
        let name = raw.name;
        match raw.query.as_str() {
            "call_count" => Ok(CallQuery::CallCount {
                name,
                args: raw.args,
            }),
            "called" => Ok(CallQuery::Called { name }),
            "called_times" => {
                let times = raw.times.ok_or_else(|| missing("called_times", "times"))?;
                Ok(CallQuery::CalledTimes { name, times })
            }
            "nth_call" => {
                let index = raw.index.ok_or_else(|| missing("nth_call", "index"))?;
                Ok(CallQuery::NthCall { name, index })
            }
            "first_call" => Ok(CallQuery::NthCall { name, index: 1 }),
            "second_call" => Ok(CallQuery::NthCall { name, index: 2 }),
            "third_call" => Ok(CallQuery::NthCall { name, index: 3 }),
            "last_call" => Ok(CallQuery::LastCall { name }),
            "called_with" => {
                let args = raw.args.ok_or_else(|| missing("called_with", "args"))?;
                Ok(CallQuery::CalledWith { name, args })
            }
            "called_with_exactly" => {
                let calls = raw
                    .calls
                    .ok_or_else(|| missing("called_with_exactly", "calls"))?;
                Ok(CallQuery::CalledWithExactly { name, calls })
            }
            "returned" => {
                let value = raw.value.ok_or_else(|| missing("returned", "value"))?;
                Ok(CallQuery::Returned { name, value })
            }
            other => Err(QueryError::InvalidQuery {
                reason: format!("Unknown query: {}", other),
            }),
        }
    }
}

fn missing(query: &str, field: &str) -> QueryError {
    QueryError::InvalidQuery {
        reason: format!("Query '{}' requires field '{}'", query, field),
    }
}
