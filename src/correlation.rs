//! Per-router-lifetime correlation identifier.

use uuid::Uuid;

/// Identifier shared by every event routed during one router lifetime, used
/// to group related events causally.
///
/// Generated once at construction and read-only afterwards, so concurrent
/// readers need no synchronization. The context is threaded explicitly
/// through construction rather than living in ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationContext {
    id: String,
}

impl CorrelationContext {
    /// Generate a fresh UUID v4 identifier.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
        }
    }

    /// Wrap an externally supplied identifier, e.g. one inherited from an
    /// upstream request.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new()
    }
}
