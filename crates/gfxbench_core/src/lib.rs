//! gfxbench core
//!
//! Platform-neutral half of the benchmark start signal: the intent a native
//! app broadcasts to tell the graphics benchmark harness that the measured
//! workload is starting.
//!
//! # Example
//!
//! ```
//! use gfxbench_core::{BenchmarkSignal, RecordingBroadcaster};
//!
//! let signal = BenchmarkSignal::new();
//! let broadcaster = RecordingBroadcaster::new();
//! signal.start(&broadcaster).unwrap();
//!
//! let sent = broadcaster.sent();
//! assert_eq!(sent[0].action, "com.android.graphics.benchmark.START");
//! assert!(sent[0].get_long_extra("timestamp").is_some());
//! ```

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod intent;

pub use clock::{to_millis, FixedClock, InstantClock, MonotonicClock, Timespec};
pub use config::{ConfigExtra, LogLevel, LoggingConfig, SignalConfig};
pub use dispatch::{BenchmarkSignal, Broadcaster, RecordingBroadcaster};
pub use error::{Result, SignalError};
pub use intent::{
    mime_matches, ExtraValue, IntentFilter, IntentSpec, ACTION_BENCHMARK_START, EXTRA_TIMESTAMP,
    MIME_TEXT_PLAIN,
};
