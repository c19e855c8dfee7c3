//! Signal configuration (TOML)
//!
//! Every field is optional; an empty document yields the harness defaults.
//!
//! ```toml
//! action = "com.android.graphics.benchmark.START"
//! mime_type = "text/plain"
//! timestamp = true
//!
//! [logging]
//! tag = "AndroidGraphicsBenchmark"
//! level = "debug"
//!
//! [extras]
//! scene = "forest"
//! iteration = 3
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};
use crate::intent::{
    ExtraValue, IntentSpec, ACTION_BENCHMARK_START, EXTRA_TIMESTAMP, MIME_TEXT_PLAIN,
};

/// Top-level signal configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignalConfig {
    /// Broadcast action
    #[serde(default = "default_action")]
    pub action: String,
    /// MIME type passed to `Intent.setType`; empty disables it
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Stamp the intent with the monotonic time in milliseconds
    #[serde(default = "default_true")]
    pub timestamp: bool,
    /// Extra key for the timestamp
    #[serde(default = "default_timestamp_key")]
    pub timestamp_key: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Additional extras sent with every signal
    #[serde(default)]
    pub extras: BTreeMap<String, ConfigExtra>,
}

fn default_action() -> String {
    ACTION_BENCHMARK_START.to_string()
}

fn default_mime_type() -> String {
    MIME_TEXT_PLAIN.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timestamp_key() -> String {
    EXTRA_TIMESTAMP.to_string()
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            action: default_action(),
            mime_type: default_mime_type(),
            timestamp: true,
            timestamp_key: default_timestamp_key(),
            logging: LoggingConfig::default(),
            extras: BTreeMap::new(),
        }
    }
}

/// An extra value as written in TOML
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigExtra {
    Integer(i64),
    String(String),
}

impl From<&ConfigExtra> for ExtraValue {
    fn from(value: &ConfigExtra) -> Self {
        match value {
            ConfigExtra::Integer(v) => ExtraValue::Long(*v),
            ConfigExtra::String(s) => ExtraValue::String(s.clone()),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logcat tag
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub level: LogLevel,
}

fn default_tag() -> String {
    "AndroidGraphicsBenchmark".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            level: LogLevel::default(),
        }
    }
}

/// Maximum log level
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// `None` for [`LogLevel::Off`].
    pub fn as_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Trace => Some(tracing::Level::TRACE),
        }
    }
}

impl SignalConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SignalConfig =
            toml::from_str(source).map_err(|e| SignalError::Config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            SignalError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| SignalError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.action.trim().is_empty() {
            return Err(SignalError::Config("action must not be empty".to_string()));
        }
        if self.timestamp && self.timestamp_key.is_empty() {
            return Err(SignalError::Config(
                "timestamp_key must not be empty".to_string(),
            ));
        }
        if let Some(key) = self.extras.keys().find(|k| k.is_empty()) {
            return Err(SignalError::Config(format!("invalid extra key {:?}", key)));
        }
        if self.timestamp && self.extras.contains_key(&self.timestamp_key) {
            return Err(SignalError::Config(format!(
                "extra '{}' collides with the timestamp extra",
                self.timestamp_key
            )));
        }
        Ok(())
    }

    /// Build the intent for one signal. `timestamp_ms` is only used when
    /// timestamps are enabled.
    pub fn intent(&self, timestamp_ms: i64) -> IntentSpec {
        let mut intent = IntentSpec::new(self.action.clone());
        if !self.mime_type.is_empty() {
            intent = intent.mime_type(self.mime_type.clone());
        }
        if self.timestamp {
            intent = intent.extra_long(self.timestamp_key.clone(), timestamp_ms);
        }
        for (key, value) in &self.extras {
            intent = intent.extra(key.clone(), value.into());
        }
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = SignalConfig::from_toml_str("").unwrap();
        assert_eq!(config, SignalConfig::default());
        assert_eq!(config.action, ACTION_BENCHMARK_START);
        assert_eq!(config.mime_type, MIME_TEXT_PLAIN);
        assert!(config.timestamp);
        assert_eq!(config.logging.tag, "AndroidGraphicsBenchmark");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_full_document() {
        let config = SignalConfig::from_toml_str(
            r#"
            action = "com.example.bench.GO"
            mime_type = ""
            timestamp = false

            [logging]
            tag = "Bench"
            level = "trace"

            [extras]
            scene = "forest"
            iteration = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.action, "com.example.bench.GO");
        assert!(!config.timestamp);
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.extras.len(), 2);

        let intent = config.intent(1234);
        assert_eq!(intent.mime_type, None);
        assert_eq!(intent.get_extra("timestamp"), None);
        assert_eq!(intent.get_long_extra("iteration"), Some(3));
        assert_eq!(
            intent.get_extra("scene"),
            Some(&ExtraValue::String("forest".to_string()))
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = SignalConfig::from_toml_str("acton = \"typo\"").unwrap_err();
        assert!(matches!(err, SignalError::Config(_)));
    }

    #[test]
    fn test_empty_action_rejected() {
        let err = SignalConfig::from_toml_str("action = \"  \"").unwrap_err();
        assert_eq!(
            err,
            SignalError::Config("action must not be empty".to_string())
        );
    }

    #[test]
    fn test_float_extra_rejected() {
        assert!(SignalConfig::from_toml_str("[extras]\nratio = 0.5").is_err());
    }

    #[test]
    fn test_extra_colliding_with_timestamp_rejected() {
        assert!(SignalConfig::from_toml_str("[extras]\ntimestamp = 1").is_err());
        // Allowed once the timestamp is off
        let config = SignalConfig::from_toml_str("timestamp = false\n[extras]\ntimestamp = 1").unwrap();
        assert_eq!(config.intent(99).get_long_extra("timestamp"), Some(1));
    }

    #[test]
    fn test_default_intent_is_benchmark_start() {
        let config = SignalConfig::default();
        assert_eq!(config.intent(5500), IntentSpec::benchmark_start(Some(5500)));
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let config = SignalConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(SignalConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(LogLevel::Off.as_tracing_level(), None);
        assert_eq!(LogLevel::Warn.as_tracing_level(), Some(tracing::Level::WARN));
    }
}
