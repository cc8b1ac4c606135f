//! Query answers
//!
//! JSON answer formatting for the introspection entry point.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::QueryError;

/// Successful answer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessAnswer {
    pub status: String,
    pub data: Value,
}

/// Failed answer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorAnswer {
    pub status: String,
    pub code: String,
    pub message: String,
}

/// Unified answer of the introspection entry point
#[derive(Debug, Clone)]
pub enum QueryAnswer {
    Success(SuccessAnswer),
    Error(ErrorAnswer),
}

impl QueryAnswer {
    /// Create a success answer
    pub fn success(data: Value) -> Self {
        QueryAnswer::Success(SuccessAnswer {
            status: "ok".to_string(),
            data,
        })
    }

    /// Create an error answer from a query error
    pub fn error(err: &QueryError) -> Self {
        QueryAnswer::Error(ErrorAnswer {
            status: "error".to_string(),
            code: err.code().to_string(),
            message: err.to_string(),
        })
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        match self {
            QueryAnswer::Success(a) => {
                serde_json::to_string(a).expect("SuccessAnswer serialization cannot fail")
            }
            QueryAnswer::Error(a) => {
                serde_json::to_string(a).expect("ErrorAnswer serialization cannot fail")
            }
        }
    }

    /// Check if this is a success answer
    pub fn is_success(&self) -> bool {
        matches!(self, QueryAnswer::Success(_))
    }

    /// Success payload, if any
    pub fn data(&self) -> Option<&Value> {
        match self {
            QueryAnswer::Success(a) => Some(&a.data),
            QueryAnswer::Error(_) => None,
        }
    }
}
