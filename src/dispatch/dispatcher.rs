//! Ordered first-match-wins dispatch
//!
//! Tries candidates in registration order, falls back to the deferred
//! target, records the call on success. Candidate bodies and target
//! calls run outside the registry lock; only the record append
//! serializes.

use std::sync::Arc;

use serde_json::Value;

use crate::observability::Logger;
use crate::registry::{ClauseOutcome, ConfigError, Registry};

use super::errors::{DispatchError, DispatchResult};

/// Dispatches invocations against one stub's registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Invokes `name` with positional arguments.
    ///
    /// First candidate whose domain accepts wins, even when a later
    /// candidate's domain also covers the arguments. If every candidate
    /// rejects, the deferred target is consulted once, at name+arity
    /// granularity. Exactly one record is appended per successful call.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> DispatchResult<Value> {
        let entry = self.registry.lookup(name).map_err(lift)?;
        let deferred = self.registry.deferred_target().map_err(lift)?;

        if entry.is_none() && deferred.is_none() {
            Logger::error(
                "DISPATCH_UNKNOWN",
                &[("name", name.to_string()), self.id_field()],
            );
            return Err(DispatchError::UnknownFunction {
                name: name.to_string(),
            });
        }

        let candidates = entry.map(|e| e.candidates).unwrap_or_default();

        for (position, candidate) in candidates.iter().enumerate() {
            match candidate.apply(&args) {
                ClauseOutcome::Matched(output) => {
                    Logger::trace(
                        "DISPATCH_MATCHED",
                        &[
                            ("clause", (position + 1).to_string()),
                            ("name", name.to_string()),
                            self.id_field(),
                        ],
                    );
                    return self.complete(name, args, output);
                }
                ClauseOutcome::Failed(reason) => {
                    Logger::error(
                        "DISPATCH_CLAUSE_FAILED",
                        &[
                            ("name", name.to_string()),
                            ("reason", reason.clone()),
                            self.id_field(),
                        ],
                    );
                    return Err(DispatchError::ClauseFailed {
                        name: name.to_string(),
                        reason,
                    });
                }
                // Out-of-domain input: advance to the next candidate
                ClauseOutcome::Rejected => {}
            }
        }

        if let Some(target) = deferred {
            if target.exposes(name, args.len()) {
                return match target.call(name, &args) {
                    Ok(output) => {
                        Logger::trace(
                            "DISPATCH_DEFERRED",
                            &[("name", name.to_string()), self.id_field()],
                        );
                        self.complete(name, args, output)
                    }
                    Err(reason) => {
                        Logger::error(
                            "DISPATCH_CLAUSE_FAILED",
                            &[
                                ("name", name.to_string()),
                                ("reason", reason.clone()),
                                self.id_field(),
                            ],
                        );
                        Err(DispatchError::ClauseFailed {
                            name: name.to_string(),
                            reason,
                        })
                    }
                };
            }
        }

        Logger::error(
            "DISPATCH_EXHAUSTED",
            &[
                ("args", render_args(&args)),
                ("name", name.to_string()),
                self.id_field(),
            ],
        );
        Err(DispatchError::NoMatchingClause {
            name: name.to_string(),
            args,
        })
    }

    /// Appends the call record and hands back the produced value.
    fn complete(&self, name: &str, input: Vec<Value>, output: Value) -> DispatchResult<Value> {
        self.registry
            .append_record(name, input, output.clone())
            .map_err(lift)?;
        Ok(output)
    }

    fn id_field(&self) -> (&'static str, String) {
        ("stub_id", self.registry.id().to_string())
    }
}

fn lift(err: ConfigError) -> DispatchError {
    DispatchError::Internal(err.to_string())
}

fn render_args(args: &[Value]) -> String {
    serde_json::to_string(args).unwrap_or_else(|_| format!("{:?}", args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{ArgPattern, ArgSpec};
    use crate::registry::{Candidate, ModuleTable};
    use serde_json::json;

    fn registry_with(clauses: Vec<(&str, Candidate)>) -> Arc<Registry> {
        let registry = Arc::new(Registry::new(true));
        registry
            .set_implementations(
                clauses
                    .into_iter()
                    .map(|(name, c)| (name.to_string(), c))
                    .collect(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_first_match_wins_over_later_literal() {
        // Wildcard declared before a literal shadows it
        let registry = registry_with(vec![
            (
                "first",
                Candidate::new(ArgSpec::any(2), |_| Ok(json!("ok"))),
            ),
            ("first", Candidate::returning([json!(1), json!(2)], json!(3))),
        ]);
        let dispatcher = Dispatcher::new(registry);

        let result = dispatcher.invoke("first", vec![json!(1), json!(2)]).unwrap();
        assert_eq!(result, json!("ok"));
    }

    #[test]
    fn test_rejection_advances_to_next_candidate() {
        let registry = registry_with(vec![
            ("first", Candidate::returning([json!("ok")], json!("ok"))),
            (
                "first",
                Candidate::new(
                    ArgSpec::new(vec![ArgPattern::object([("map", ArgPattern::Any)])]),
                    |args| {
                        let v = args[0]["map"].as_i64().unwrap_or(0);
                        Ok(json!(3 * v))
                    },
                ),
            ),
        ]);
        let dispatcher = Dispatcher::new(registry);

        assert_eq!(dispatcher.invoke("first", vec![json!("ok")]).unwrap(), json!("ok"));
        assert_eq!(
            dispatcher.invoke("first", vec![json!({"map": 6})]).unwrap(),
            json!(18)
        );
    }

    #[test]
    fn test_unknown_function_without_deferred_target() {
        let registry = registry_with(vec![("f", Candidate::returning([json!(1)], json!(1)))]);
        let dispatcher = Dispatcher::new(registry);

        let err = dispatcher.invoke("missing", vec![json!(1)]).unwrap_err();
        assert_eq!(
            err,
            DispatchError::UnknownFunction {
                name: "missing".into()
            }
        );
    }

    #[test]
    fn test_exhaustion_is_terminal_and_unrecorded() {
        let registry = registry_with(vec![(
            "first",
            Candidate::returning([json!(1), json!(2)], json!(3)),
        )]);
        let dispatcher = Dispatcher::new(registry.clone());

        let err = dispatcher
            .invoke("first", vec![json!(7), json!(8)])
            .unwrap_err();
        assert!(matches!(err, DispatchError::NoMatchingClause { .. }));

        // Exhaustion never produces a record
        assert!(registry.records("first").unwrap().is_empty());
    }

    #[test]
    fn test_deferral_uses_target_result() {
        let registry = registry_with(vec![
            (
                "first",
                Candidate::returning([json!(2), json!(4), json!(2)], json!("ok")),
            ),
            (
                "first",
                Candidate::returning([json!(1), json!(2), json!(9)], json!(3)),
            ),
        ]);
        let target = ModuleTable::new()
            .function("first", 3, |args| {
                let sum: i64 = args.iter().filter_map(|v| v.as_i64()).sum();
                Ok(json!(sum))
            })
            .build();
        registry.set_deferred_target(target).unwrap();
        let dispatcher = Dispatcher::new(registry);

        let result = dispatcher
            .invoke("first", vec![json!(2), json!(4), json!(1)])
            .unwrap();
        assert_eq!(result, json!(7));
    }

    #[test]
    fn test_deferral_requires_matching_arity() {
        let registry = registry_with(vec![(
            "first",
            Candidate::returning([json!(1)], json!("ok")),
        )]);
        let target = ModuleTable::new()
            .function("first", 3, |_| Ok(json!(0)))
            .build();
        registry.set_deferred_target(target).unwrap();
        let dispatcher = Dispatcher::new(registry);

        // Target exposes first/3, call is first/1 out of domain
        let err = dispatcher.invoke("first", vec![json!(2)]).unwrap_err();
        assert!(matches!(err, DispatchError::NoMatchingClause { .. }));
    }

    #[test]
    fn test_clause_failure_surfaces_and_appends_nothing() {
        let registry = registry_with(vec![(
            "f",
            Candidate::new(ArgSpec::any(1), |_| Err("boom".into())),
        )]);
        let dispatcher = Dispatcher::new(registry.clone());

        let err = dispatcher.invoke("f", vec![json!(1)]).unwrap_err();
        assert_eq!(
            err,
            DispatchError::ClauseFailed {
                name: "f".into(),
                reason: "boom".into()
            }
        );
        assert!(registry.records("f").unwrap().is_empty());
    }

    #[test]
    fn test_successful_dispatch_appends_one_record() {
        let registry = registry_with(vec![(
            "f",
            Candidate::new(ArgSpec::any(1), |args| Ok(json!([args[0].clone()]))),
        )]);
        let dispatcher = Dispatcher::new(registry.clone());

        dispatcher.invoke("f", vec![json!(5)]).unwrap();

        let records = registry.records("f").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].input, vec![json!(5)]);
        assert_eq!(records[0].output, json!([5]));
    }
}
