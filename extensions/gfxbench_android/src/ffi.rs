//! C ABI for native apps
//!
//! ```c
//! AndroidGraphicsBenchmark* bench = android_graphics_benchmark_new();
//! android_graphics_benchmark_start_with_activity(bench, activity);
//! android_graphics_benchmark_free(bench);
//! ```
//!
//! Start functions return `0` on success and a negative error code
//! otherwise (see `SignalError::code`). Panics never unwind into C.

use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

use gfxbench_core::{LoggingConfig, Result, SignalConfig, SignalError};
use jni::sys::{jint, jobject, JNI_ERR, JNI_VERSION_1_6};

use crate::benchmark::AndroidGraphicsBenchmark;
use crate::context::RawContext;
use crate::logging::init_logging;
use crate::vm;

/// Captures the VM when the library is loaded through `System.loadLibrary`.
#[no_mangle]
pub extern "system" fn JNI_OnLoad(vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    let loaded = catch_unwind(|| {
        if let Err(e) = init_logging(&LoggingConfig::default()) {
            tracing::debug!("Logging not installed: {}", e);
        }
        unsafe { on_load(vm) }
    });

    match loaded {
        Ok(Ok(version)) => version,
        Ok(Err(e)) => {
            tracing::error!("JNI_OnLoad failed: {}", e);
            JNI_ERR
        }
        Err(_) => {
            tracing::error!("JNI_OnLoad panicked");
            JNI_ERR
        }
    }
}

unsafe fn on_load(raw: *mut jni::sys::JavaVM) -> Result<jint> {
    let vm = vm::register_java_vm(raw)?;
    let version = match vm.get_env().and_then(|env| env.get_version()) {
        Ok(version) => jint::from(version),
        Err(e) => {
            tracing::warn!("GetVersion failed ({}), assuming JNI 1.6", e);
            JNI_VERSION_1_6
        }
    };
    tracing::info!("Native library loaded, JNI version {:#x}", version);
    Ok(version)
}

/// Create a benchmark handle with the default configuration.
#[no_mangle]
pub extern "C" fn android_graphics_benchmark_new() -> *mut AndroidGraphicsBenchmark {
    Box::into_raw(Box::new(AndroidGraphicsBenchmark::new()))
}

/// Create a benchmark handle from a TOML configuration.
///
/// Returns null if `config_toml` is null, not UTF-8, or invalid.
///
/// # Safety
///
/// `config_toml` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn android_graphics_benchmark_new_with_config(
    config_toml: *const c_char,
) -> *mut AndroidGraphicsBenchmark {
    let created = catch_unwind(|| -> Result<AndroidGraphicsBenchmark> {
        if config_toml.is_null() {
            return Err(SignalError::InvalidArgument("config is null".to_string()));
        }
        let source = CStr::from_ptr(config_toml)
            .to_str()
            .map_err(|e| SignalError::Config(e.to_string()))?;
        let config = SignalConfig::from_toml_str(source)?;
        if let Err(e) = init_logging(&config.logging) {
            tracing::debug!("Logging not installed: {}", e);
        }
        AndroidGraphicsBenchmark::with_config(config)
    });

    match created {
        Ok(Ok(benchmark)) => Box::into_raw(Box::new(benchmark)),
        Ok(Err(e)) => {
            tracing::error!("android_graphics_benchmark_new_with_config: {}", e);
            std::ptr::null_mut()
        }
        Err(_) => std::ptr::null_mut(),
    }
}

/// Release a handle from `android_graphics_benchmark_new*`.
///
/// # Safety
///
/// `benchmark` must be null or a live handle that is not used afterwards.
#[no_mangle]
pub unsafe extern "C" fn android_graphics_benchmark_free(benchmark: *mut AndroidGraphicsBenchmark) {
    if !benchmark.is_null() {
        drop(Box::from_raw(benchmark));
    }
}

/// Broadcast the start intent through `context`, using the VM captured in
/// `JNI_OnLoad`.
///
/// # Safety
///
/// `benchmark` must be null or a live handle; `context` must be null or a
/// valid reference to an `android.content.Context` on the calling thread.
#[no_mangle]
pub unsafe extern "C" fn android_graphics_benchmark_start_with_context(
    benchmark: *const AndroidGraphicsBenchmark,
    context: jobject,
) -> c_int {
    run_start("start_with_context", benchmark, |b| {
        b.start_benchmark(&RawContext::new(context))
    })
}

/// Broadcast the start intent through a native activity, registering its VM.
///
/// # Safety
///
/// `benchmark` must be null or a live handle; `activity` must be null or
/// the live activity passed to a NativeActivity callback.
#[cfg(target_os = "android")]
#[no_mangle]
pub unsafe extern "C" fn android_graphics_benchmark_start_with_activity(
    benchmark: *const AndroidGraphicsBenchmark,
    activity: *mut ndk_sys::ANativeActivity,
) -> c_int {
    use crate::context::NativeActivityHandle;

    run_start("start_with_activity", benchmark, |b| {
        let activity = NativeActivityHandle::from_ptr(activity)
            .ok_or_else(|| SignalError::InvalidArgument("activity is null".to_string()))?;
        b.start_benchmark(&activity)
    })
}

unsafe fn run_start<F>(op: &str, benchmark: *const AndroidGraphicsBenchmark, start: F) -> c_int
where
    F: FnOnce(&AndroidGraphicsBenchmark) -> Result<()>,
{
    let Some(benchmark) = benchmark.as_ref() else {
        tracing::error!("{}: benchmark handle is null", op);
        return SignalError::InvalidArgument("benchmark is null".to_string()).code();
    };

    match catch_unwind(AssertUnwindSafe(|| start(benchmark))) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            tracing::error!("{}: {}", op, e);
            e.code()
        }
        Err(_) => {
            tracing::error!("{}: panicked", op);
            SignalError::Jni("panic during dispatch".to_string()).code()
        }
    }
}
