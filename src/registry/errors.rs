//! Configuration errors
//!
//! Every invalid setup is rejected eagerly at construction time; nothing
//! here is produced by a dispatched call.

use thiserror::Error;

use super::fallback::FunctionSig;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Construction-time configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A stubbed name+arity does not exist on the declared module.
    #[error("Function {name}/{arity} does not exist on the declared module")]
    UnknownModuleFunction { name: String, arity: usize },

    /// The stub's exposed surface does not satisfy the contract.
    #[error("Contract '{contract}' unsatisfied; missing: {missing:?}")]
    ContractUnsatisfied {
        contract: String,
        missing: Vec<FunctionSig>,
    },

    /// Neither clauses nor a module were supplied.
    #[error("Stub has no surface: no clauses and no module")]
    NoSurface,

    /// Auto-stubbing requested without a module to delegate to.
    #[error("auto_stub requires a module")]
    AutoStubWithoutModule,

    /// Lock poisoned or other invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConfigError {
    /// Stable string code for logs and error payloads
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::UnknownModuleFunction { .. } => "STUB_UNKNOWN_MODULE_FUNCTION",
            ConfigError::ContractUnsatisfied { .. } => "STUB_CONTRACT_UNSATISFIED",
            ConfigError::NoSurface => "STUB_EMPTY_SURFACE",
            ConfigError::AutoStubWithoutModule => "STUB_AUTO_STUB_WITHOUT_MODULE",
            ConfigError::Internal(_) => "STUB_INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = ConfigError::UnknownModuleFunction {
            name: "send".into(),
            arity: 2,
        };
        assert_eq!(err.code(), "STUB_UNKNOWN_MODULE_FUNCTION");
        assert_eq!(ConfigError::NoSurface.code(), "STUB_EMPTY_SURFACE");
    }

    #[test]
    fn test_display_carries_signature() {
        let err = ConfigError::UnknownModuleFunction {
            name: "send".into(),
            arity: 2,
        };
        assert!(err.to_string().contains("send/2"));
    }
}
