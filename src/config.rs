//! Configuration types for the audit router.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// Main configuration for the audit router.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Minimum severity an event needs to be processed at all.
    pub min_level: Severity,
    /// Context redaction settings.
    pub redaction: RedactionConfig,
    /// Reserved context key the correlation id is injected under.
    pub correlation_key: String,
    /// Optional per-sink-call timeout in milliseconds. A sink exceeding it
    /// is treated as a transient failure.
    pub sink_timeout_ms: Option<u64>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_level: Severity::Debug,
            redaction: RedactionConfig::default(),
            correlation_key: "correlation_id".to_string(),
            sink_timeout_ms: None,
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.redaction.marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        if self.redaction.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.correlation_key.trim().is_empty() {
            return Err(ConfigError::EmptyCorrelationKey);
        }
        Ok(())
    }
}

/// Redaction settings. The built-in sensitive-term list can be extended but
/// never reduced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Replacement written over sensitive values.
    pub marker: String,
    /// Extra key terms to treat as sensitive, in addition to the built-ins.
    pub extra_terms: Vec<String>,
    /// Maximum context nesting depth before values are replaced wholesale.
    pub max_depth: usize,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            marker: "[REDACTED]".to_string(),
            extra_terms: Vec::new(),
            max_depth: 32,
        }
    }
}

/// A configuration defect, surfaced at startup rather than at call time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("redaction marker must not be empty")]
    EmptyMarker,
    #[error("redaction max_depth must be at least 1")]
    ZeroDepth,
    #[error("correlation key must not be empty")]
    EmptyCorrelationKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AuditConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_level, Severity::Debug);
        assert_eq!(config.redaction.marker, "[REDACTED]");
        assert_eq!(config.correlation_key, "correlation_id");
        assert!(config.sink_timeout_ms.is_none());
    }

    #[test]
    fn config_from_yaml() {
        let yaml = r#"
min_level: warning
redaction:
  marker: "***"
  extra_terms:
    - licence_number
sink_timeout_ms: 500
"#;
        let config: AuditConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.min_level, Severity::Warning);
        assert_eq!(config.redaction.marker, "***");
        assert_eq!(config.redaction.extra_terms, vec!["licence_number"]);
        assert_eq!(config.redaction.max_depth, 32);
        assert_eq!(config.sink_timeout_ms, Some(500));
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: AuditConfig = serde_yaml::from_str("min_level: error").unwrap();
        assert_eq!(config.min_level, Severity::Error);
        assert_eq!(config.redaction.marker, "[REDACTED]");
        assert_eq!(config.correlation_key, "correlation_id");
    }

    #[test]
    fn validate_rejects_empty_marker() {
        let mut config = AuditConfig::default();
        config.redaction.marker = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyMarker)));
    }

    #[test]
    fn validate_rejects_zero_depth() {
        let mut config = AuditConfig::default();
        config.redaction.max_depth = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroDepth)));
    }

    #[test]
    fn validate_rejects_blank_correlation_key() {
        let mut config = AuditConfig::default();
        config.correlation_key = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyCorrelationKey)));
    }
}
