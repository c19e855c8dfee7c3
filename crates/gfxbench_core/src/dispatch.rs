//! Benchmark start dispatch
//!
//! [`BenchmarkSignal`] owns the configuration and clock and builds one
//! [`IntentSpec`] per call; a [`Broadcaster`] delivers it. The Android
//! extension provides the JNI broadcaster, tests use [`RecordingBroadcaster`].

use std::sync::{Mutex, PoisonError};

use crate::clock::{InstantClock, MonotonicClock};
use crate::config::SignalConfig;
use crate::error::{Result, SignalError};
use crate::intent::IntentSpec;

/// Delivers an intent as a system broadcast.
pub trait Broadcaster {
    fn send_broadcast(&self, intent: &IntentSpec) -> Result<()>;
}

impl<B: Broadcaster + ?Sized> Broadcaster for &B {
    fn send_broadcast(&self, intent: &IntentSpec) -> Result<()> {
        (**self).send_broadcast(intent)
    }
}

/// Builds and sends the benchmark start signal.
pub struct BenchmarkSignal<C: MonotonicClock = InstantClock> {
    config: SignalConfig,
    clock: C,
}

impl BenchmarkSignal<InstantClock> {
    /// Default configuration with the host clock.
    pub fn new() -> Self {
        Self {
            config: SignalConfig::default(),
            clock: InstantClock,
        }
    }
}

impl Default for BenchmarkSignal<InstantClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MonotonicClock> BenchmarkSignal<C> {
    /// Default configuration with `clock`.
    pub fn from_clock(clock: C) -> Self {
        Self {
            config: SignalConfig::default(),
            clock,
        }
    }

    /// Validates `config` up front so every later call builds a valid intent.
    pub fn with_config(config: SignalConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Build the intent for a signal sent now.
    pub fn build_intent(&self) -> IntentSpec {
        let timestamp_ms = if self.config.timestamp {
            i64::try_from(self.clock.now_millis()).unwrap_or(i64::MAX)
        } else {
            0
        };
        self.config.intent(timestamp_ms)
    }

    /// Send exactly one start signal through `broadcaster`.
    pub fn start<B: Broadcaster + ?Sized>(&self, broadcaster: &B) -> Result<()> {
        tracing::info!("startBenchmark");
        let intent = self.build_intent();
        tracing::debug!(
            action = %intent.action,
            extras = intent.extras.len(),
            "Sending benchmark broadcast"
        );
        broadcaster.send_broadcast(&intent)
    }
}

/// Broadcaster that keeps every intent it is given.
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<IntentSpec>>,
    fail_with: Option<SignalError>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// A broadcaster that rejects every intent with `error`.
    pub fn failing(error: SignalError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<IntentSpec> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn send_broadcast(&self, intent: &IntentSpec) -> Result<()> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(intent.clone());
        Ok(())
    }
}
