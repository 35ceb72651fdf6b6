//! The transient audit event value.

use crate::category::Category;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// Ordered key/value bag attached to an event. Values are scalars, nested
/// bags, or null; insertion order is preserved end to end.
pub type Context = serde_json::Map<String, serde_json::Value>;

/// A single event flowing through the router.
///
/// Constructed per call and transformed in place (normalize, redact,
/// correlation stamp) before being handed to exactly one downstream path.
/// The event has no identity of its own: an audit-record id is assigned by
/// the sink, never by the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub category: Category,
    pub message: String,
    #[serde(default)]
    pub context: Context,
    #[serde(default)]
    pub level: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Builder for [`AuditEvent`].
#[derive(Debug)]
pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            event: AuditEvent {
                category,
                message: message.into(),
                context: Context::new(),
                level: Severity::Info,
                user_id: None,
                object_id: None,
                ip_address: None,
                correlation_id: None,
            },
        }
    }

    pub fn context(mut self, context: Context) -> Self {
        self.event.context = context;
        self
    }

    pub fn level(mut self, level: Severity) -> Self {
        self.event.level = level;
        self
    }

    pub fn user_id(mut self, user_id: i64) -> Self {
        self.event.user_id = Some(user_id);
        self
    }

    pub fn object_id(mut self, object_id: i64) -> Self {
        self.event.object_id = Some(object_id);
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.event.ip_address = Some(ip.into());
        self
    }

    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.event.correlation_id = Some(id.into());
        self
    }

    pub fn build(self) -> AuditEvent {
        self.event
    }
}
