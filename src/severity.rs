//! Event severity levels and the minimum-level gate.

use serde::{Deserialize, Serialize};

/// Severity of an audit event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first decision point of the router: events below the configured
/// minimum are discarded before any other work happens.
#[derive(Debug, Clone, Copy)]
pub struct SeverityGate {
    min: Severity,
}

impl SeverityGate {
    pub fn new(min: Severity) -> Self {
        Self { min }
    }

    /// Whether an event at `level` passes the gate.
    pub fn should_log(&self, level: Severity) -> bool {
        level >= self.min
    }

    pub fn min(&self) -> Severity {
        self.min
    }
}

impl Default for SeverityGate {
    fn default() -> Self {
        // Log everything unless configured otherwise.
        Self::new(Severity::Debug)
    }
}
