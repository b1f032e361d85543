//! Execution Context
//!
//! Carries the caller and tracing ids through one command.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Context for a single use case execution.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique ID for this execution
    pub execution_id: String,
    /// ID for distributed tracing, usually from the upstream request
    pub correlation_id: String,
    /// Identity the command acts on behalf of (owner, requestor or institution)
    pub principal_id: String,
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Fresh context; the correlation id starts as the execution id.
    pub fn create(principal_id: impl Into<String>) -> Self {
        let exec_id = format!("exec-{}", Uuid::new_v4());
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Context that continues an upstream correlation id.
    pub fn with_correlation(
        principal_id: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            execution_id: format!("exec-{}", Uuid::new_v4()),
            correlation_id: correlation_id.into(),
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Tracing span carrying this context's ids.
    pub fn span(&self, operation: &'static str) -> tracing::Span {
        tracing::info_span!(
            "usecase",
            operation,
            execution_id = %self.execution_id,
            correlation_id = %self.correlation_id,
            principal_id = %self.principal_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_context() {
        let ctx = ExecutionContext::create("alice");

        assert!(ctx.execution_id.starts_with("exec-"));
        assert_eq!(ctx.principal_id, "alice");
        assert_eq!(ctx.correlation_id, ctx.execution_id);
    }

    #[test]
    fn test_with_correlation() {
        let ctx = ExecutionContext::with_correlation("bank1", "corr-456");

        assert_eq!(ctx.correlation_id, "corr-456");
        assert_ne!(ctx.execution_id, ctx.correlation_id);
        assert_eq!(ctx.principal_id, "bank1");
    }
}
