//! The event router: single ingestion point for application events.

use crate::category::{Category, SinkKind};
use crate::config::{AuditConfig, ConfigError};
use crate::correlation::CorrelationContext;
use crate::event::{AuditEvent, AuditEventBuilder, Context};
use crate::redaction::Redactor;
use crate::severity::{Severity, SeverityGate};
use crate::sink::{
    AuditError, EphemeralLog, ErrorReporter, GeneralAuditSink, RecordId, TracingLog,
    TracingReporter, TransactionAuditSink, UserAuditSink,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Routes application events to the operational log or to one of the durable
/// audit sinks, after severity gating, category normalization, redaction,
/// and correlation stamping.
///
/// The router holds only immutable configuration and the correlation id, so
/// a single instance is safe to share across tasks; sink implementations are
/// responsible for their own write-side safety.
pub struct EventRouter {
    gate: SeverityGate,
    redactor: Redactor,
    correlation: CorrelationContext,
    correlation_key: String,
    sink_timeout: Option<Duration>,
    user_sink: Arc<dyn UserAuditSink>,
    transaction_sink: Arc<dyn TransactionAuditSink>,
    general_sink: Arc<dyn GeneralAuditSink>,
    ephemeral: Arc<dyn EphemeralLog>,
    reporter: Arc<dyn ErrorReporter>,
}

impl EventRouter {
    /// Build a router from validated configuration and the three durable
    /// sinks. A configuration defect is rejected here, at startup, never at
    /// call time.
    pub fn new(
        config: &AuditConfig,
        correlation: CorrelationContext,
        user_sink: Arc<dyn UserAuditSink>,
        transaction_sink: Arc<dyn TransactionAuditSink>,
        general_sink: Arc<dyn GeneralAuditSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            gate: SeverityGate::new(config.min_level),
            redactor: Redactor::new(&config.redaction),
            correlation,
            correlation_key: config.correlation_key.clone(),
            sink_timeout: config.sink_timeout_ms.map(Duration::from_millis),
            user_sink,
            transaction_sink,
            general_sink,
            ephemeral: Arc::new(TracingLog),
            reporter: Arc::new(TracingReporter),
        })
    }

    /// Replace the default tracing-backed ephemeral log.
    #[must_use]
    pub fn with_ephemeral_log(mut self, log: Arc<dyn EphemeralLog>) -> Self {
        self.ephemeral = log;
        self
    }

    /// Replace the default tracing-backed error reporter.
    #[must_use]
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The correlation id stamped onto every event this router handles.
    pub fn correlation_id(&self) -> &str {
        self.correlation.id()
    }

    /// Primary ingestion point.
    ///
    /// Returns the sink-assigned record id for durable events, `None` for
    /// gate-rejected or ephemeral events and for recovered failures. This
    /// method never returns an error: audit logging must not be able to fail
    /// the business operation that triggered it.
    #[allow(clippy::too_many_arguments)]
    pub async fn log_event(
        &self,
        category: &str,
        message: &str,
        context: Context,
        user_id: Option<i64>,
        object_id: Option<i64>,
        ip_address: Option<&str>,
        level: Severity,
    ) -> Option<RecordId> {
        // Gate first: a rejected event causes no side effects at all.
        if !self.gate.should_log(level) {
            return None;
        }

        let category = Category::normalize(category);

        let mut redacted = self.redactor.redact(&context);
        redacted.insert(
            self.correlation_key.clone(),
            Value::String(self.correlation.id().to_string()),
        );

        let mut builder = AuditEventBuilder::new(category, message)
            .context(redacted)
            .level(level)
            .correlation_id(self.correlation.id());
        if let Some(id) = user_id {
            builder = builder.user_id(id);
        }
        if let Some(id) = object_id {
            builder = builder.object_id(id);
        }
        if let Some(ip) = ip_address {
            builder = builder.ip_address(ip);
        }
        let event = builder.build();

        let Some(sink) = category.sink_for() else {
            // Ephemeral events are streamed, never stored; they have no id.
            let line = format!("[{category}] {message}");
            self.ephemeral.log(level, &line, &event.context);
            return None;
        };

        match self.dispatch(sink, &event).await {
            Ok(id) => Some(id),
            Err(error) => {
                let line = format!(
                    "[{category}] audit sink write failed (correlation {}): {error}",
                    self.correlation.id()
                );
                self.ephemeral.log(Severity::Error, &line, &event.context);
                self.reporter.report(&error);
                None
            }
        }
    }

    /// Legacy convenience entry point.
    ///
    /// Merges `action` and a timestamp into the context before routing. The
    /// `object_id` is forwarded only when the normalized category is exactly
    /// `booking`; for every other category it is dropped. That asymmetry is
    /// long-standing observed behavior that callers depend on.
    pub async fn record_event(
        &self,
        category: &str,
        action: &str,
        message: &str,
        mut context: Context,
        user_id: Option<i64>,
        object_id: Option<i64>,
    ) -> Option<RecordId> {
        context.insert("action".to_string(), Value::String(action.to_string()));
        context.insert(
            "timestamp".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );

        let object_id = if Category::normalize(category) == Category::Booking {
            object_id
        } else {
            None
        };

        self.log_event(category, message, context, user_id, object_id, None, Severity::Info)
            .await
    }

    async fn dispatch(&self, sink: SinkKind, event: &AuditEvent) -> Result<RecordId, AuditError> {
        match sink {
            SinkKind::User => {
                let action = event
                    .context
                    .get("action")
                    .and_then(Value::as_str)
                    .unwrap_or(event.category.as_str())
                    .to_string();
                self.bounded(self.user_sink.log_user_event(
                    event.category,
                    &action,
                    &event.message,
                    &event.context,
                    event.user_id,
                    event.level,
                ))
                .await
            }
            SinkKind::Transaction => {
                self.bounded(self.transaction_sink.log_event(
                    event.category,
                    &event.message,
                    &event.context,
                    event.user_id,
                    event.object_id,
                    event.level,
                ))
                .await
            }
            SinkKind::General => {
                self.bounded(self.general_sink.create_log_entry(
                    event.category,
                    &event.message,
                    &event.context,
                    event.user_id,
                    event.object_id,
                    event.ip_address.as_deref(),
                    event.level,
                ))
                .await
            }
        }
    }

    /// Run a sink call under the configured timeout, if any. A hung sink
    /// must not block the caller forever.
    async fn bounded<F>(&self, call: F) -> Result<RecordId, AuditError>
    where
        F: Future<Output = Result<RecordId, AuditError>>,
    {
        match self.sink_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(AuditError::Timeout(limit.as_millis() as u64)),
            },
            None => call.await,
        }
    }
}
