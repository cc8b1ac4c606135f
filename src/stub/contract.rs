//! Interface contracts
//!
//! A contract is the runtime rendering of a declared interface: the set
//! of name+arity pairs a stub's surface must expose. Checking happens at
//! construction, before any dispatch.

use crate::registry::{ConfigError, ConfigResult, FunctionSig};

/// Required name+arity set for a stub surface.
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    name: String,
    required: Vec<FunctionSig>,
}

impl ContractDescriptor {
    /// Creates an empty contract with a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: Vec::new(),
        }
    }

    /// Adds one required signature.
    pub fn require(mut self, name: impl Into<String>, arity: usize) -> Self {
        self.required.push(FunctionSig::new(name, arity));
        self
    }

    /// Contract display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every required signature.
    pub fn required(&self) -> &[FunctionSig] {
        &self.required
    }

    /// Required signatures absent from the given surface.
    pub fn missing_from(&self, surface: &[FunctionSig]) -> Vec<FunctionSig> {
        self.required
            .iter()
            .filter(|sig| !surface.contains(sig))
            .cloned()
            .collect()
    }

    /// Fails unless the surface exposes every required signature.
    pub fn check(&self, surface: &[FunctionSig]) -> ConfigResult<()> {
        let missing = self.missing_from(surface);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ContractUnsatisfied {
                contract: self.name.clone(),
                missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfied_contract() {
        let contract = ContractDescriptor::new("Mailer")
            .require("send", 2)
            .require("status", 1);
        let surface = vec![
            FunctionSig::new("send", 2),
            FunctionSig::new("status", 1),
            FunctionSig::new("extra", 0),
        ];

        assert!(contract.check(&surface).is_ok());
    }

    #[test]
    fn test_missing_signature_listed() {
        let contract = ContractDescriptor::new("Mailer")
            .require("send", 2)
            .require("status", 1);
        let surface = vec![FunctionSig::new("send", 2)];

        let err = contract.check(&surface).unwrap_err();
        match err {
            ConfigError::ContractUnsatisfied { contract, missing } => {
                assert_eq!(contract, "Mailer");
                assert_eq!(missing, vec![FunctionSig::new("status", 1)]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_arity_is_part_of_the_signature() {
        let contract = ContractDescriptor::new("Mailer").require("send", 2);
        let surface = vec![FunctionSig::new("send", 3)];

        assert!(contract.check(&surface).is_err());
    }
}
