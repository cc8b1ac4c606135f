//! Stub builder
//!
//! Accumulates ordered (name, candidate) clauses and options, then
//! validates everything eagerly at `build`. A stub that constructs
//! successfully cannot fail for configuration reasons afterwards.

use std::sync::Arc;

use serde_json::Value;

use crate::matcher::ArgSpec;
use crate::observability::Logger;
use crate::registry::{Candidate, ConfigError, ConfigResult, FallbackModule, Registry};

use super::contract::ContractDescriptor;
use super::stub::Stub;

/// Builder for [`Stub`] instances.
#[derive(Default)]
pub struct StubBuilder {
    clauses: Vec<(String, Candidate)>,
    module: Option<Arc<dyn FallbackModule>>,
    auto_stub: bool,
    call_info: bool,
    contract: Option<ContractDescriptor>,
}

impl StubBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one candidate clause under `name`. Clause order is
    /// dispatch order.
    pub fn clause(
        mut self,
        name: impl Into<String>,
        spec: ArgSpec,
        body: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.clauses.push((name.into(), Candidate::new(spec, body)));
        self
    }

    /// Appends a prebuilt candidate under `name`.
    pub fn candidate(mut self, name: impl Into<String>, candidate: Candidate) -> Self {
        self.clauses.push((name.into(), candidate));
        self
    }

    /// Shorthand: for exactly `args`, return `output`.
    pub fn returns(
        mut self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
        output: Value,
    ) -> Self {
        self.clauses
            .push((name.into(), Candidate::returning(args, output)));
        self
    }

    /// Declares the real module: validates every stubbed name+arity
    /// exists on it and serves as the deferred fallback target.
    pub fn module(mut self, module: Arc<dyn FallbackModule>) -> Self {
        self.module = Some(module);
        self
    }

    /// Delegates module functions absent from the clauses.
    pub fn auto_stub(mut self, enabled: bool) -> Self {
        self.auto_stub = enabled;
        self
    }

    /// Enables the call recorder and query layer.
    pub fn call_info(mut self, enabled: bool) -> Self {
        self.call_info = enabled;
        self
    }

    /// Requires the built surface to satisfy the contract.
    pub fn contract(mut self, contract: ContractDescriptor) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Validates the configuration and produces the stub.
    pub fn build(self) -> ConfigResult<Stub> {
        match self.build_inner() {
            Ok(stub) => {
                Logger::info(
                    "STUB_BUILT",
                    &[
                        (
                            "functions",
                            stub.signatures().map(|s| s.len()).unwrap_or(0).to_string(),
                        ),
                        ("recording", stub.recording().to_string()),
                        ("stub_id", stub.id().to_string()),
                    ],
                );
                Ok(stub)
            }
            Err(err) => {
                Logger::error(
                    "CONFIG_REJECTED",
                    &[
                        ("code", err.code().to_string()),
                        ("message", err.to_string()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn build_inner(self) -> ConfigResult<Stub> {
        if self.clauses.is_empty() && self.module.is_none() {
            return Err(ConfigError::NoSurface);
        }
        if self.auto_stub && self.module.is_none() {
            return Err(ConfigError::AutoStubWithoutModule);
        }

        let registry = Arc::new(Registry::new(self.call_info));
        registry.set_implementations(self.clauses)?;

        if let Some(module) = self.module {
            // Every stubbed signature must exist on the declared module
            for sig in registry.signatures()? {
                if !module.exposes(&sig.name, sig.arity) {
                    return Err(ConfigError::UnknownModuleFunction {
                        name: sig.name,
                        arity: sig.arity,
                    });
                }
            }

            if self.auto_stub {
                let stubbed = registry.signatures()?;
                for sig in module.functions() {
                    if !stubbed.contains(&sig) {
                        registry.add_delegated(sig.name, sig.arity)?;
                    }
                }
            }

            registry.set_deferred_target(module)?;
        }

        if let Some(contract) = self.contract {
            contract.check(&registry.signatures()?)?;
        }

        Ok(Stub::from_registry(registry))
    }
}
