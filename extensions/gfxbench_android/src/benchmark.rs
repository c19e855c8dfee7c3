//! Benchmark start entry point

use gfxbench_core::{BenchmarkSignal, MonotonicClock, Result, SignalConfig, SignalError};

use crate::broadcast::JniBroadcaster;
use crate::clock::{platform_clock, PlatformClock};
use crate::context::ContextSource;
use crate::vm;

/// Tells the graphics benchmark harness that the workload is starting.
///
/// # Example
///
/// ```ignore
/// use gfxbench_android::AndroidGraphicsBenchmark;
///
/// fn android_main(app: android_activity::AndroidApp) {
///     let benchmark = AndroidGraphicsBenchmark::new();
///     if let Err(e) = benchmark.start_benchmark(&app) {
///         tracing::error!("startBenchmark failed: {}", e);
///     }
///     // ... render loop
/// }
/// ```
pub struct AndroidGraphicsBenchmark<C: MonotonicClock = PlatformClock> {
    signal: BenchmarkSignal<C>,
}

impl AndroidGraphicsBenchmark<PlatformClock> {
    /// Default harness intent stamped with the platform monotonic clock.
    pub fn new() -> Self {
        Self {
            signal: BenchmarkSignal::from_clock(platform_clock()),
        }
    }

    pub fn with_config(config: SignalConfig) -> Result<Self> {
        Self::with_clock(config, platform_clock())
    }
}

impl Default for AndroidGraphicsBenchmark<PlatformClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MonotonicClock> AndroidGraphicsBenchmark<C> {
    pub fn with_clock(config: SignalConfig, clock: C) -> Result<Self> {
        Ok(Self {
            signal: BenchmarkSignal::with_config(config, clock)?,
        })
    }

    pub fn config(&self) -> &SignalConfig {
        self.signal.config()
    }

    pub fn signal(&self) -> &BenchmarkSignal<C> {
        &self.signal
    }

    /// Broadcast the start intent through `source`'s context.
    ///
    /// A source that carries its own VM registers it as the process VM
    /// first; otherwise the VM captured in `JNI_OnLoad` is used.
    pub fn start_benchmark<S: ContextSource + ?Sized>(&self, source: &S) -> Result<()> {
        let context = source.context();
        if context.is_null() {
            return Err(SignalError::InvalidArgument("context is null".to_string()));
        }

        let vm = match source.java_vm() {
            // SAFETY: sources only hand out the VM pointer the platform gave them.
            Some(raw) => unsafe { vm::register_java_vm(raw)? },
            None => vm::java_vm()?,
        };

        self.signal.start(&JniBroadcaster::new(vm, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RawContext, VmContext};
    use gfxbench_core::{FixedClock, Timespec};

    #[test]
    fn test_null_context_rejected_before_vm_lookup() {
        let benchmark = AndroidGraphicsBenchmark::new();
        let err = benchmark
            .start_benchmark(&RawContext::new(std::ptr::null_mut()))
            .unwrap_err();
        assert!(matches!(err, SignalError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_vm_is_reported() {
        let benchmark = AndroidGraphicsBenchmark::new();
        let fake_context = std::ptr::NonNull::dangling().as_ptr();
        let err = benchmark
            .start_benchmark(&VmContext::new(std::ptr::null_mut(), fake_context))
            .unwrap_err();
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn test_custom_clock_and_config() {
        let config = SignalConfig {
            timestamp: false,
            ..Default::default()
        };
        let benchmark =
            AndroidGraphicsBenchmark::with_clock(config, FixedClock(Timespec::new(1, 0))).unwrap();
        assert!(!benchmark.config().timestamp);
        assert!(benchmark.signal().build_intent().extras.is_empty());
    }
}
