//! Use Case Errors
//!
//! Every failure the identity core can report, grouped by how a caller is
//! expected to react:
//!
//! - `ValidationError` / `BusinessRuleViolation`: fix the request and retry
//! - `RoleViolation`: the actor is not allowed to do this; terminal
//! - `NotFoundError` / `ConcurrencyError` / `CommitError`: persistence outcomes
//! - `InvariantError`: a caller broke a documented precondition (a bug)
//!
//! ```ignore
//! use sp_identity::{details, usecase::UseCaseError};
//!
//! UseCaseError::business_rule_with_details(
//!     "ROLE_NOT_ASSIGNABLE",
//!     "Role cannot be assigned",
//!     details! { "role" => role.name() },
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Build an error detail map.
#[macro_export]
macro_rules! details {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), serde_json::json!($value));
        )+
        map
    }};
}

pub type ErrorDetails = HashMap<String, serde_json::Value>;

/// Categorized error types for use case failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    /// Malformed input (role/feature names, ids, payloads). HTTP 400.
    ValidationError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Policy or invariant breach the caller can correct. HTTP 409.
    BusinessRuleViolation {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// The acting principal lacks the role required for the command. HTTP 403.
    RoleViolation {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// HTTP 404.
    NotFoundError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Stale expected version on append. HTTP 409.
    ConcurrencyError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Event store failure. HTTP 500.
    CommitError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },

    /// Programming error: an operation was called while its precondition
    /// did not hold. Never surfaced to end users as a request problem. HTTP 500.
    InvariantError {
        code: String,
        message: String,
        #[serde(default)]
        details: ErrorDetails,
    },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation_with_details(code, message, HashMap::new())
    }

    pub fn validation_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn business_rule(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::business_rule_with_details(code, message, HashMap::new())
    }

    pub fn business_rule_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::BusinessRuleViolation {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn role_violation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::role_violation_with_details(code, message, HashMap::new())
    }

    pub fn role_violation_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::RoleViolation {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn concurrency_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::ConcurrencyError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn commit(message: impl Into<String>) -> Self {
        Self::CommitError {
            code: "COMMIT_FAILED".to_string(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn invariant(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    fn parts(&self) -> (&str, &str, &ErrorDetails) {
        match self {
            Self::ValidationError { code, message, details }
            | Self::BusinessRuleViolation { code, message, details }
            | Self::RoleViolation { code, message, details }
            | Self::NotFoundError { code, message, details }
            | Self::ConcurrencyError { code, message, details }
            | Self::CommitError { code, message, details }
            | Self::InvariantError { code, message, details } => (code, message, details),
        }
    }

    pub fn code(&self) -> &str {
        self.parts().0
    }

    pub fn message(&self) -> &str {
        self.parts().1
    }

    pub fn details(&self) -> &ErrorDetails {
        self.parts().2
    }

    /// Suggested HTTP status code for transports built on top of the core.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::RoleViolation { .. } => 403,
            Self::NotFoundError { .. } => 404,
            Self::BusinessRuleViolation { .. } | Self::ConcurrencyError { .. } => 409,
            Self::CommitError { .. } | Self::InvariantError { .. } => 500,
        }
    }

    pub fn is_rule_violation(&self) -> bool {
        matches!(self, Self::BusinessRuleViolation { .. })
    }

    pub fn is_role_violation(&self) -> bool {
        matches!(self, Self::RoleViolation { .. })
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}
