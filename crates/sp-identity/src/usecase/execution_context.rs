//! Execution Context
//!
//! Carries the acting principal and tracing ids through one use case
//! execution. The principal id doubles as the assigner id for every
//! authorization check the aggregate performs.

use chrono::{DateTime, Utc};

use crate::shared::{prefixes, IdGenerator};

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique ID for this execution
    pub execution_id: String,
    /// ID for distributed tracing (usually from the original request)
    pub correlation_id: String,
    /// ID of the event that caused this execution, if any
    pub causation_id: Option<String>,
    /// End user or service account performing the action
    pub principal_id: String,
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Fresh context; the correlation id starts as the execution id.
    pub fn create(principal_id: impl Into<String>) -> Self {
        let exec_id = IdGenerator::generate(prefixes::EXECUTION);
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Context joining an existing trace.
    pub fn with_correlation(
        principal_id: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            execution_id: IdGenerator::generate(prefixes::EXECUTION),
            correlation_id: correlation_id.into(),
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Child context within the same execution, caused by `causing_event_id`.
    pub fn with_causation(&self, causing_event_id: impl Into<String>) -> Self {
        Self {
            execution_id: self.execution_id.clone(),
            correlation_id: self.correlation_id.clone(),
            causation_id: Some(causing_event_id.into()),
            principal_id: self.principal_id.clone(),
            initiated_at: Utc::now(),
        }
    }

    /// Span carrying the tracing ids; use cases run inside it.
    pub fn span(&self, use_case: &'static str) -> tracing::Span {
        tracing::info_span!(
            "use_case",
            name = use_case,
            execution_id = %self.execution_id,
            correlation_id = %self.correlation_id,
            principal_id = %self.principal_id,
        )
    }
}
