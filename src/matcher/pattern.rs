//! Argument patterns and specs
//!
//! Patterns restrict the domain of a single positional argument.
//! Evaluation is strict: exact match only, no coercion, missing object
//! keys never match.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

/// Shared predicate used by guard patterns. Must be pure.
pub type GuardFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Domain restriction for one positional argument.
#[derive(Clone)]
pub enum ArgPattern {
    /// Wildcard: accepts every value.
    Any,

    /// Exact structural equality (no coercion).
    Eq(Value),

    /// Partial object match: every listed key must be present and match.
    /// Extra keys on the argument are allowed.
    Object(BTreeMap<String, ArgPattern>),

    /// Array of exactly the given length with element-wise matches.
    Array(Vec<ArgPattern>),

    /// String argument matched by a compiled regex.
    Regex(Regex),

    /// Custom predicate over the argument value.
    Guard(Arc<GuardFn>),
}

impl ArgPattern {
    /// Exact-equality pattern from anything serializable to a JSON value.
    pub fn eq(value: impl Into<Value>) -> Self {
        ArgPattern::Eq(value.into())
    }

    /// Partial object pattern from (key, sub-pattern) pairs.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, ArgPattern)>) -> Self {
        ArgPattern::Object(fields.into_iter().map(|(k, p)| (k.into(), p)).collect())
    }

    /// Fixed-length array pattern with element-wise sub-patterns.
    pub fn array(elements: impl IntoIterator<Item = ArgPattern>) -> Self {
        ArgPattern::Array(elements.into_iter().collect())
    }

    /// String pattern from a regex source; fails on an invalid expression.
    pub fn matching(pattern: &str) -> Result<Self, regex::Error> {
        Ok(ArgPattern::Regex(Regex::new(pattern)?))
    }

    /// Guard pattern from a pure predicate.
    pub fn guard(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        ArgPattern::Guard(Arc::new(predicate))
    }

    /// Checks whether a value falls inside this pattern's domain.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ArgPattern::Any => true,
            ArgPattern::Eq(expected) => value == expected,
            ArgPattern::Object(fields) => Self::object_match(value, fields),
            ArgPattern::Array(elements) => Self::array_match(value, elements),
            ArgPattern::Regex(re) => match value {
                Value::String(s) => re.is_match(s),
                _ => false,
            },
            ArgPattern::Guard(predicate) => predicate(value),
        }
    }

    /// Partial object match: all listed keys present and matching.
    fn object_match(value: &Value, fields: &BTreeMap<String, ArgPattern>) -> bool {
        let obj = match value.as_object() {
            Some(o) => o,
            None => return false,
        };

        fields.iter().all(|(key, sub)| match obj.get(key) {
            Some(v) => sub.accepts(v),
            None => false, // Missing key = no match
        })
    }

    /// Exact-length array match with element-wise sub-patterns.
    fn array_match(value: &Value, elements: &[ArgPattern]) -> bool {
        let arr = match value.as_array() {
            Some(a) => a,
            None => return false,
        };

        if arr.len() != elements.len() {
            return false;
        }

        elements.iter().zip(arr.iter()).all(|(sub, v)| sub.accepts(v))
    }
}

impl fmt::Debug for ArgPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgPattern::Any => write!(f, "Any"),
            ArgPattern::Eq(v) => write!(f, "Eq({})", v),
            ArgPattern::Object(fields) => {
                write!(f, "Object({:?})", fields.keys().collect::<Vec<_>>())
            }
            ArgPattern::Array(elements) => write!(f, "Array(len={})", elements.len()),
            ArgPattern::Regex(re) => write!(f, "Regex({})", re.as_str()),
            ArgPattern::Guard(_) => write!(f, "Guard(..)"),
        }
    }
}

/// Domain specification for a full argument list: one pattern per position.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    patterns: Vec<ArgPattern>,
}

impl ArgSpec {
    /// Creates a spec from positional patterns.
    pub fn new(patterns: Vec<ArgPattern>) -> Self {
        Self { patterns }
    }

    /// Spec accepting any argument list of the given arity.
    pub fn any(arity: usize) -> Self {
        Self {
            patterns: vec![ArgPattern::Any; arity],
        }
    }

    /// Spec requiring exact equality with the given argument list.
    pub fn exact(args: impl IntoIterator<Item = Value>) -> Self {
        Self {
            patterns: args.into_iter().map(ArgPattern::Eq).collect(),
        }
    }

    /// Declared arity of this spec.
    pub fn arity(&self) -> usize {
        self.patterns.len()
    }

    /// Checks whether an argument list falls inside this spec's domain.
    ///
    /// Arity mismatch is a rejection, not an error.
    pub fn matches(&self, args: &[Value]) -> bool {
        if args.len() != self.patterns.len() {
            return false;
        }

        self.patterns
            .iter()
            .zip(args.iter())
            .all(|(pattern, arg)| pattern.accepts(arg))
    }
}
