//! Platform monotonic clock

#[cfg(target_os = "android")]
use gfxbench_core::{MonotonicClock, Timespec};

/// `CLOCK_MONOTONIC`, the clock SurfaceFlinger stamps frames with.
#[cfg(target_os = "android")]
#[derive(Clone, Copy, Debug, Default)]
pub struct NdkMonotonicClock;

#[cfg(target_os = "android")]
impl MonotonicClock for NdkMonotonicClock {
    fn now(&self) -> Timespec {
        use ndk_sys::{clock_gettime, timespec, CLOCK_MONOTONIC};
        use std::os::raw::c_int;

        let mut now = timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        let rc = unsafe { clock_gettime(CLOCK_MONOTONIC as c_int, &mut now) };
        if rc != 0 {
            tracing::warn!("clock_gettime(CLOCK_MONOTONIC) failed: {}", rc);
        }
        Timespec::new(now.tv_sec.max(0) as u64, now.tv_nsec.clamp(0, 999_999_999) as u32)
    }
}

#[cfg(target_os = "android")]
pub type PlatformClock = NdkMonotonicClock;

#[cfg(not(target_os = "android"))]
pub type PlatformClock = gfxbench_core::InstantClock;

/// The clock used for benchmark timestamps on this target.
pub fn platform_clock() -> PlatformClock {
    PlatformClock::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfxbench_core::MonotonicClock;

    #[test]
    fn test_platform_clock_is_monotonic() {
        let clock = platform_clock();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
