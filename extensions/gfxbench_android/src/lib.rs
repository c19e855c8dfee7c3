//! gfxbench Android bridge
//!
//! Broadcasts `com.android.graphics.benchmark.START` through JNI so a native
//! app can tell the graphics benchmark harness its workload is starting.
//! Usable from Rust ([`AndroidGraphicsBenchmark`]) or from C through the
//! functions in [`ffi`].

pub mod benchmark;
pub mod broadcast;
pub mod clock;
pub mod context;
pub mod ffi;
pub mod intent;
pub mod logging;
pub mod vm;

pub use benchmark::AndroidGraphicsBenchmark;
pub use broadcast::JniBroadcaster;
pub use clock::{platform_clock, PlatformClock};
pub use context::{ContextSource, RawContext, VmContext};
pub use logging::{init_logging, logging_update, LoggingUpdate};

#[cfg(target_os = "android")]
pub use clock::NdkMonotonicClock;
#[cfg(target_os = "android")]
pub use context::NativeActivityHandle;

pub use gfxbench_core::{IntentSpec, Result, SignalConfig, SignalError};
