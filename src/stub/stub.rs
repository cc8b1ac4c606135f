//! The built stub surface
//!
//! One `invoke` entry point per configured name+arity, one `inspect`
//! entry point for the query layer. A stub is `Send + Sync`; share it
//! across threads or tasks behind `Arc`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::dispatch::{DispatchResult, Dispatcher};
use crate::query::{CallInspector, CallQuery, QueryAnswer, QueryResult};
use crate::recorder::CallRecord;
use crate::registry::{ConfigResult, FallbackModule, FunctionSig, Registry};

use super::builder::StubBuilder;

/// A callable stub surface with recorded history.
pub struct Stub {
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
}

impl fmt::Debug for Stub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stub").finish_non_exhaustive()
    }
}

impl Stub {
    /// Starts building a stub.
    pub fn builder() -> StubBuilder {
        StubBuilder::new()
    }

    /// A spy over a real module: every function delegated, every call
    /// recorded, zero candidate clauses.
    pub fn spy(module: Arc<dyn FallbackModule>) -> ConfigResult<Self> {
        StubBuilder::new()
            .module(module)
            .auto_stub(true)
            .call_info(true)
            .build()
    }

    pub(crate) fn from_registry(registry: Arc<Registry>) -> Self {
        let dispatcher = Dispatcher::new(registry.clone());
        Self {
            registry,
            dispatcher,
        }
    }

    /// Instance id, also carried on this stub's log events.
    pub fn id(&self) -> Uuid {
        self.registry.id()
    }

    /// Whether call recording is enabled.
    pub fn recording(&self) -> bool {
        self.registry.recording()
    }

    /// Every signature this stub exposes, in declaration order.
    pub fn signatures(&self) -> ConfigResult<Vec<FunctionSig>> {
        self.registry.signatures()
    }

    /// Invokes `name` with positional arguments.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> DispatchResult<Value> {
        self.dispatcher.invoke(name, args)
    }

    /// Answers one introspection query.
    pub fn inspect(&self, query: CallQuery) -> QueryAnswer {
        self.inspector().answer(query)
    }

    /// Parses and answers one JSON introspection query.
    pub fn inspect_json(&self, json: &str) -> QueryAnswer {
        match CallQuery::parse(json) {
            Ok(query) => self.inspect(query),
            Err(err) => QueryAnswer::error(&err),
        }
    }

    /// Number of recorded calls of `name`.
    pub fn call_count(&self, name: &str) -> QueryResult<u64> {
        self.inspector().call_count(name)
    }

    /// Number of recorded calls of `name` made with exactly `args`.
    pub fn call_count_with(&self, name: &str, args: &[Value]) -> QueryResult<u64> {
        self.inspector().call_count_with(name, args)
    }

    /// Whether `name` was called at all.
    pub fn called(&self, name: &str) -> QueryResult<bool> {
        self.inspector().called(name)
    }

    /// Whether `name` was called exactly once.
    pub fn called_once(&self, name: &str) -> QueryResult<bool> {
        self.inspector().called_once(name)
    }

    /// Whether `name` was called exactly twice.
    pub fn called_twice(&self, name: &str) -> QueryResult<bool> {
        self.inspector().called_twice(name)
    }

    /// Whether `name` was called exactly three times.
    pub fn called_thrice(&self, name: &str) -> QueryResult<bool> {
        self.inspector().called_thrice(name)
    }

    /// Whether `name` was called exactly `times` times.
    pub fn called_times(&self, name: &str, times: u64) -> QueryResult<bool> {
        self.inspector().called_times(name, times)
    }

    /// The nth recorded call of `name`, 1-indexed.
    pub fn nth_call(&self, name: &str, index: u64) -> QueryResult<CallRecord> {
        self.inspector().nth_call(name, index)
    }

    /// The first recorded call of `name`.
    pub fn first_call(&self, name: &str) -> QueryResult<CallRecord> {
        self.inspector().first_call(name)
    }

    /// The second recorded call of `name`.
    pub fn second_call(&self, name: &str) -> QueryResult<CallRecord> {
        self.inspector().second_call(name)
    }

    /// The third recorded call of `name`.
    pub fn third_call(&self, name: &str) -> QueryResult<CallRecord> {
        self.inspector().third_call(name)
    }

    /// The most recent recorded call of `name`.
    pub fn last_call(&self, name: &str) -> QueryResult<CallRecord> {
        self.inspector().last_call(name)
    }

    /// Whether some recorded call of `name` was made with `args`.
    pub fn called_with(&self, name: &str, args: &[Value]) -> QueryResult<bool> {
        self.inspector().called_with(name, args)
    }

    /// Whether the full chronological input sequence of `name` equals
    /// `calls`.
    pub fn called_with_exactly(&self, name: &str, calls: &[Vec<Value>]) -> QueryResult<bool> {
        self.inspector().called_with_exactly(name, calls)
    }

    /// Whether some recorded call of `name` satisfies the predicate.
    pub fn called_where(
        &self,
        name: &str,
        predicate: impl Fn(&CallRecord) -> bool,
    ) -> QueryResult<bool> {
        self.inspector().called_where(name, predicate)
    }

    /// Whether some recorded call of `name` produced `value`.
    pub fn returned(&self, name: &str, value: &Value) -> QueryResult<bool> {
        self.inspector().returned(name, value)
    }

    fn inspector(&self) -> CallInspector<'_> {
        CallInspector::new(&self.registry)
    }
}
