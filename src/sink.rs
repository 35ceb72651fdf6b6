//! Sink-facing contracts: durable audit sinks, the ephemeral log stream, and
//! the error reporter.

use crate::category::Category;
use crate::event::Context;
use crate::severity::Severity;
use async_trait::async_trait;

/// Identifier assigned to a persisted audit record by its sink. The router
/// treats it as opaque.
pub type RecordId = i64;

/// Error type for sink operations.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("sink write failed: {0}")]
    WriteFailed(String),
    #[error("sink call timed out after {0}ms")]
    Timeout(u64),
    #[error("sink closed")]
    Closed,
}

/// Persists user-centric audit records (auth and user-account events).
#[async_trait]
pub trait UserAuditSink: Send + Sync {
    async fn log_user_event(
        &self,
        category: Category,
        action: &str,
        message: &str,
        context: &Context,
        user_id: Option<i64>,
        level: Severity,
    ) -> Result<RecordId, AuditError>;
}

/// Persists money-movement audit records (payment, transaction, booking).
#[async_trait]
pub trait TransactionAuditSink: Send + Sync {
    async fn log_event(
        &self,
        category: Category,
        message: &str,
        context: &Context,
        user_id: Option<i64>,
        object_id: Option<i64>,
        level: Severity,
    ) -> Result<RecordId, AuditError>;
}

/// Persists everything else that is durable (security and admin events).
#[async_trait]
pub trait GeneralAuditSink: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn create_log_entry(
        &self,
        category: Category,
        message: &str,
        context: &Context,
        user_id: Option<i64>,
        object_id: Option<i64>,
        ip_address: Option<&str>,
        level: Severity,
    ) -> Result<RecordId, AuditError>;
}

/// The non-persistent, operational log stream. Ephemeral events and recovered
/// sink failures end up here; nothing written through this trait is
/// queryable audit-of-record.
pub trait EphemeralLog: Send + Sync {
    fn log(&self, level: Severity, line: &str, context: &Context);
}

/// Receives errors the router recovered from. Failures must stay invisible
/// to the producer, so this is the only escalation path besides the
/// ephemeral log.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &AuditError);
}

/// [`EphemeralLog`] backed by the `tracing` facade.
pub struct TracingLog;

impl EphemeralLog for TracingLog {
    fn log(&self, level: Severity, line: &str, context: &Context) {
        let fields = serde_json::to_string(context).unwrap_or_default();
        match level {
            Severity::Debug => tracing::debug!(context = %fields, "{}", line),
            Severity::Info => tracing::info!(context = %fields, "{}", line),
            Severity::Warning => tracing::warn!(context = %fields, "{}", line),
            Severity::Error => tracing::error!(context = %fields, "{}", line),
            Severity::Critical => tracing::error!(context = %fields, critical = true, "{}", line),
        }
    }
}

/// [`ErrorReporter`] that forwards to the error log stream.
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &AuditError) {
        tracing::error!(error = %error, "recovered audit failure");
    }
}
