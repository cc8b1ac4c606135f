//! Candidate implementations
//!
//! A candidate pairs an explicit argument spec with a body closure.
//! Applying a candidate yields a tagged outcome: the implicit
//! match-failure of pattern-headed clauses becomes an explicit signal
//! the dispatcher interprets.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::matcher::ArgSpec;

/// Body closure executed when a candidate's domain accepts.
pub type BodyFn = dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync;

/// Outcome of applying one candidate to an argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseOutcome {
    /// Domain accepted; the body produced a value.
    Matched(Value),

    /// Domain accepted but the body itself failed.
    Failed(String),

    /// Domain rejected; the dispatcher advances to the next candidate.
    Rejected,
}

/// One registered function body restricted to a subset of inputs.
#[derive(Clone)]
pub struct Candidate {
    spec: ArgSpec,
    body: Arc<BodyFn>,
}

impl Candidate {
    /// Creates a candidate from a spec and body.
    pub fn new(
        spec: ArgSpec,
        body: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            spec,
            body: Arc::new(body),
        }
    }

    /// Candidate returning a fixed value for an exact argument list.
    pub fn returning(args: impl IntoIterator<Item = Value>, output: Value) -> Self {
        Self::new(ArgSpec::exact(args), move |_| Ok(output.clone()))
    }

    /// Declared arity.
    pub fn arity(&self) -> usize {
        self.spec.arity()
    }

    /// Applies the candidate: pure domain check, then body execution.
    pub fn apply(&self, args: &[Value]) -> ClauseOutcome {
        if !self.spec.matches(args) {
            return ClauseOutcome::Rejected;
        }

        match (self.body)(args) {
            Ok(value) => ClauseOutcome::Matched(value),
            Err(reason) => ClauseOutcome::Failed(reason),
        }
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}
