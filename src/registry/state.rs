//! Lock-guarded per-stub state
//!
//! One `RwLock` guards the whole of a stub's mutable state: candidate
//! table, deferred target, call log. Every mutation takes the write lock,
//! which makes mutations on one instance linearizable; log append order
//! is the linearization order.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use uuid::Uuid;

use crate::recorder::{CallLog, CallRecord};

use super::candidate::Candidate;
use super::errors::{ConfigError, ConfigResult};
use super::fallback::{FallbackModule, FunctionSig};

/// One configured name: ordered candidates plus arities delegated to
/// the deferred target. A name may carry clauses of several arities;
/// the surface is keyed by distinct name+arity pairs.
#[derive(Debug, Clone, Default)]
struct FunctionEntry {
    candidates: Vec<Candidate>,
    delegated_arities: Vec<usize>,
}

impl FunctionEntry {
    /// Distinct candidate arities in first-appearance order.
    fn stubbed_arities(&self) -> Vec<usize> {
        let mut arities = Vec::new();
        for candidate in &self.candidates {
            if !arities.contains(&candidate.arity()) {
                arities.push(candidate.arity());
            }
        }
        arities
    }
}

/// Read snapshot of one entry, cheap to take under the read lock.
///
/// Candidate bodies are shared behind `Arc`, so the dispatcher can run
/// them after the lock is released.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub candidates: Vec<Candidate>,
    pub delegated_arities: Vec<usize>,
}

/// Mutable state exclusively owned by one stub instance.
#[derive(Default)]
struct StubState {
    entries: HashMap<String, FunctionEntry>,
    /// First-appearance order of configured names.
    names: Vec<String>,
    deferred: Option<Arc<dyn FallbackModule>>,
    log: CallLog,
}

/// Per-stub implementation registry and call log store.
pub struct Registry {
    id: Uuid,
    state: RwLock<StubState>,
}

impl Registry {
    /// Creates an empty registry; `recording` enables the call log.
    pub fn new(recording: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RwLock::new(StubState {
                log: CallLog::new(recording),
                ..StubState::default()
            }),
        }
    }

    /// Instance id, used to correlate log events of one stub.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether call recording is enabled.
    pub fn recording(&self) -> bool {
        self.state.read().map(|s| s.log.enabled()).unwrap_or(false)
    }

    /// Replaces the candidate table wholesale.
    ///
    /// Clause order is preserved per name; names keep first-appearance
    /// order. Delegated entries survive the replacement.
    pub fn set_implementations(&self, clauses: Vec<(String, Candidate)>) -> ConfigResult<()> {
        let mut entries: HashMap<String, FunctionEntry> = HashMap::new();
        let mut names = Vec::new();

        for (name, candidate) in clauses {
            match entries.get_mut(&name) {
                Some(entry) => entry.candidates.push(candidate),
                None => {
                    names.push(name.clone());
                    entries.insert(
                        name,
                        FunctionEntry {
                            candidates: vec![candidate],
                            delegated_arities: Vec::new(),
                        },
                    );
                }
            }
        }

        let mut state = self.write()?;
        for (name, entry) in state.entries.iter() {
            if entry.delegated_arities.is_empty() {
                continue;
            }
            match entries.get_mut(name) {
                Some(replacement) => {
                    replacement.delegated_arities = entry.delegated_arities.clone();
                }
                None => {
                    names.push(name.clone());
                    entries.insert(name.clone(), entry.clone());
                }
            }
        }
        state.entries = entries;
        state.names = names;
        Ok(())
    }

    /// Registers a delegated arity: a zero-candidate surface entry that
    /// always falls through to the deferred target.
    ///
    /// A name+arity already covered by explicit clauses is left alone.
    pub fn add_delegated(&self, name: impl Into<String>, arity: usize) -> ConfigResult<()> {
        let name = name.into();
        let mut state = self.write()?;

        if !state.entries.contains_key(&name) {
            state.names.push(name.clone());
        }
        let entry = state.entries.entry(name).or_default();

        if entry.stubbed_arities().contains(&arity) || entry.delegated_arities.contains(&arity) {
            return Ok(());
        }
        entry.delegated_arities.push(arity);
        Ok(())
    }

    /// Installs or replaces the deferred fallback target.
    pub fn set_deferred_target(&self, target: Arc<dyn FallbackModule>) -> ConfigResult<()> {
        self.write()?.deferred = Some(target);
        Ok(())
    }

    /// Current deferred target, if any.
    pub fn deferred_target(&self) -> ConfigResult<Option<Arc<dyn FallbackModule>>> {
        Ok(self.read()?.deferred.clone())
    }

    /// Snapshot of the entry configured under `name`.
    pub fn lookup(&self, name: &str) -> ConfigResult<Option<EntrySnapshot>> {
        let state = self.read()?;
        Ok(state.entries.get(name).map(|entry| EntrySnapshot {
            candidates: entry.candidates.clone(),
            delegated_arities: entry.delegated_arities.clone(),
        }))
    }

    /// Every name+arity pair the stub exposes, in declaration order.
    pub fn signatures(&self) -> ConfigResult<Vec<FunctionSig>> {
        let state = self.read()?;
        let mut signatures = Vec::new();

        for name in &state.names {
            if let Some(entry) = state.entries.get(name) {
                for arity in entry.stubbed_arities() {
                    signatures.push(FunctionSig::new(name.clone(), arity));
                }
                for arity in &entry.delegated_arities {
                    signatures.push(FunctionSig::new(name.clone(), *arity));
                }
            }
        }
        Ok(signatures)
    }

    /// Whether the name was ever configured or recorded.
    pub fn known(&self, name: &str) -> ConfigResult<bool> {
        let state = self.read()?;
        Ok(state.entries.contains_key(name) || state.log.has_records(name))
    }

    /// Appends one record for a completed call.
    ///
    /// Sequence assignment and append happen under the same write lock,
    /// so record order is the linearization order of the stub.
    pub fn append_record(
        &self,
        name: &str,
        input: Vec<Value>,
        output: Value,
    ) -> ConfigResult<Option<CallRecord>> {
        Ok(self.write()?.log.append(name, input, output))
    }

    /// Chronological records for a name; empty if never called.
    pub fn records(&self, name: &str) -> ConfigResult<Vec<CallRecord>> {
        Ok(self.read()?.log.records(name).to_vec())
    }

    fn read(&self) -> ConfigResult<std::sync::RwLockReadGuard<'_, StubState>> {
        self.state
            .read()
            .map_err(|_| ConfigError::Internal("Lock poisoned".into()))
    }

    fn write(&self) -> ConfigResult<std::sync::RwLockWriteGuard<'_, StubState>> {
        self.state
            .write()
            .map_err(|_| ConfigError::Internal("Lock poisoned".into()))
    }
}
