//! Event categories, durability classification, and sink assignment.

use serde::{Deserialize, Serialize};

/// Classification bucket for an audit event.
///
/// The set is closed: raw category strings from call sites are coerced into
/// it by [`Category::normalize`], never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    System,
    Auth,
    Transaction,
    Booking,
    User,
    Admin,
    Document,
    Api,
    Security,
    Payment,
}

/// Which durable sink a category's events are persisted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    User,
    Transaction,
    General,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::System,
        Self::Auth,
        Self::Transaction,
        Self::Booking,
        Self::User,
        Self::Admin,
        Self::Document,
        Self::Api,
        Self::Security,
        Self::Payment,
    ];

    /// Parse a raw category name. Trims and lowercases the input; anything
    /// outside the closed set (including the empty string) maps to `System`,
    /// so a typo at a call site degrades to the generic bucket instead of
    /// dropping the event.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "system" => Self::System,
            "auth" => Self::Auth,
            "transaction" => Self::Transaction,
            "booking" => Self::Booking,
            "user" => Self::User,
            "admin" => Self::Admin,
            "document" => Self::Document,
            "api" => Self::Api,
            "security" => Self::Security,
            "payment" => Self::Payment,
            _ => Self::System,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Auth => "auth",
            Self::Transaction => "transaction",
            Self::Booking => "booking",
            Self::User => "user",
            Self::Admin => "admin",
            Self::Document => "document",
            Self::Api => "api",
            Self::Security => "security",
            Self::Payment => "payment",
        }
    }

    /// Whether events in this category are audit-of-record rather than
    /// operational-log-only.
    pub fn is_durable(self) -> bool {
        self.sink_for().is_some()
    }

    /// Durable sink assignment. `None` means the category is ephemeral-only.
    ///
    /// The match is exhaustive over the closed enum, so a durable category
    /// without an assignment cannot exist at runtime.
    pub fn sink_for(self) -> Option<SinkKind> {
        match self {
            Self::Auth | Self::User => Some(SinkKind::User),
            Self::Payment | Self::Transaction | Self::Booking => Some(SinkKind::Transaction),
            Self::Security | Self::Admin => Some(SinkKind::General),
            Self::System | Self::Api | Self::Document => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
