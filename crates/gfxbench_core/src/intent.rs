//! Platform-neutral description of the broadcast intent.
//!
//! An [`IntentSpec`] carries everything the platform layer needs to build an
//! `android.content.Intent`: the action, an optional MIME type and the extras
//! in insertion order. [`IntentFilter`] is the receiving side's view and
//! follows Android's matching rules for action and type.

/// Action the benchmark harness listens for.
pub const ACTION_BENCHMARK_START: &str = "com.android.graphics.benchmark.START";

/// MIME type the harness receiver filters on.
pub const MIME_TEXT_PLAIN: &str = "text/plain";

/// Extra key holding the monotonic start time in milliseconds.
pub const EXTRA_TIMESTAMP: &str = "timestamp";

/// Value of an intent extra.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtraValue {
    /// Java `long`
    Long(i64),
    /// Java `String`
    String(String),
}

/// An intent to broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentSpec {
    pub action: String,
    pub mime_type: Option<String>,
    pub extras: Vec<(String, ExtraValue)>,
}

impl IntentSpec {
    /// Create an intent with only an action.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            mime_type: None,
            extras: Vec::new(),
        }
    }

    /// The harness start intent, optionally stamped with `timestamp_ms`.
    pub fn benchmark_start(timestamp_ms: Option<i64>) -> Self {
        let intent = Self::new(ACTION_BENCHMARK_START).mime_type(MIME_TEXT_PLAIN);
        match timestamp_ms {
            Some(ms) => intent.extra_long(EXTRA_TIMESTAMP, ms),
            None => intent,
        }
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Add a `long` extra. A later extra with the same key replaces the
    /// earlier one, like `Intent.putExtra`.
    pub fn extra_long(self, key: impl Into<String>, value: i64) -> Self {
        self.extra(key, ExtraValue::Long(value))
    }

    pub fn extra_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra(key, ExtraValue::String(value.into()))
    }

    pub fn extra(mut self, key: impl Into<String>, value: ExtraValue) -> Self {
        let key = key.into();
        if let Some(slot) = self.extras.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.extras.push((key, value));
        }
        self
    }

    pub fn get_extra(&self, key: &str) -> Option<&ExtraValue> {
        self.extras.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_long_extra(&self, key: &str) -> Option<i64> {
        match self.get_extra(key) {
            Some(ExtraValue::Long(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Receiver-side filter on action and MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentFilter {
    pub action: String,
    pub mime_type: Option<String>,
}

impl IntentFilter {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            mime_type: None,
        }
    }

    /// The filter the harness registers for the start signal.
    pub fn benchmark_start() -> Self {
        Self::new(ACTION_BENCHMARK_START).with_mime_type(MIME_TEXT_PLAIN)
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn matches(&self, intent: &IntentSpec) -> bool {
        if self.action != intent.action {
            return false;
        }
        match (&self.mime_type, &intent.mime_type) {
            (None, None) => true,
            (Some(pattern), Some(mime)) => mime_matches(pattern, mime),
            _ => false,
        }
    }
}

/// Match a MIME type against a filter pattern (`type/subtype`, `type/*`, `*/*`).
///
/// Comparison is case-insensitive, as Android normalizes types to lower case.
pub fn mime_matches(pattern: &str, mime: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let mime = mime.to_ascii_lowercase();
    if pattern == "*/*" || pattern == "*" {
        return true;
    }
    let (Some((p_type, p_sub)), Some((m_type, m_sub))) =
        (pattern.split_once('/'), mime.split_once('/'))
    else {
        return pattern == mime;
    };
    p_type == m_type && (p_sub == "*" || p_sub == m_sub)
}
