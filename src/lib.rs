//! Fleetbook audit router
//!
//! The audit/event logging subsystem of the Fleetbook rental platform: a
//! single ingestion point that classifies application events, redacts
//! sensitive context data, gates by severity, and routes durable events to
//! category-specific audit sinks. Ephemeral events go to the operational log
//! stream; failures are recovered at the router boundary and never reach the
//! producer.

pub mod category;
pub mod config;
pub mod correlation;
pub mod event;
pub mod redaction;
pub mod router;
pub mod severity;
pub mod sink;
pub mod store;

pub use category::{Category, SinkKind};
pub use config::{AuditConfig, ConfigError, RedactionConfig};
pub use correlation::CorrelationContext;
pub use event::{AuditEvent, AuditEventBuilder, Context};
pub use redaction::Redactor;
pub use router::EventRouter;
pub use severity::{Severity, SeverityGate};
pub use sink::{
    AuditError, EphemeralLog, ErrorReporter, GeneralAuditSink, RecordId, TransactionAuditSink,
    UserAuditSink,
};
pub use store::JsonlAuditStore;
