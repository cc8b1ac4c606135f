//! Deferred fallback targets
//!
//! A fallback module is the real implementation a stub can delegate to
//! when every candidate rejects. Fallback is single-level: the target's
//! answer is taken as-is, with no further domain checking or chaining.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name + arity pair identifying one function on a surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSig {
    pub name: String,
    pub arity: usize,
}

impl FunctionSig {
    /// Creates a signature.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for FunctionSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// A real implementation source a stub may validate against and defer to.
///
/// Implementations must be pure with respect to the stub's own state:
/// the dispatcher calls `call` outside any lock.
pub trait FallbackModule: Send + Sync {
    /// Every function the module exposes.
    fn functions(&self) -> Vec<FunctionSig>;

    /// Invokes the named function with positional arguments.
    fn call(&self, name: &str, args: &[Value]) -> Result<Value, String>;

    /// Whether the module exposes the given name+arity.
    fn exposes(&self, name: &str, arity: usize) -> bool {
        self.functions()
            .iter()
            .any(|sig| sig.name == name && sig.arity == arity)
    }
}

/// Closure type stored per module function.
pub type ModuleFn = dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync;

/// Table-backed [`FallbackModule`] built from named closures.
///
/// The common way to hand a real implementation to a stub in tests.
#[derive(Default)]
pub struct ModuleTable {
    functions: HashMap<FunctionSig, Arc<ModuleFn>>,
    order: Vec<FunctionSig>,
}

impl ModuleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function under the given name and arity.
    ///
    /// Re-registering a signature replaces the previous body.
    pub fn function(
        mut self,
        name: impl Into<String>,
        arity: usize,
        body: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        let sig = FunctionSig::new(name, arity);
        if self.functions.insert(sig.clone(), Arc::new(body)).is_none() {
            self.order.push(sig);
        }
        self
    }

    /// Finishes the table as a shareable module.
    pub fn build(self) -> Arc<dyn FallbackModule> {
        Arc::new(self)
    }
}

impl FallbackModule for ModuleTable {
    fn functions(&self) -> Vec<FunctionSig> {
        self.order.clone()
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value, String> {
        let sig = FunctionSig::new(name, args.len());
        match self.functions.get(&sig) {
            Some(body) => body(args),
            None => Err(format!("module does not expose {}", sig)),
        }
    }
}
