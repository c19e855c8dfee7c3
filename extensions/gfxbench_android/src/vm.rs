//! Process-wide Java VM handle
//!
//! Android runs one VM per process. The first registration (from
//! `JNI_OnLoad` or from a native activity) wins; later registrations hand
//! back the stored VM.

use std::sync::OnceLock;

use gfxbench_core::{Result, SignalError};
use jni::{JNIEnv, JavaVM};

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

/// Register the VM behind `raw`, or return the one already registered.
///
/// # Safety
///
/// `raw` must be null or point to the process's live `JavaVM`.
pub unsafe fn register_java_vm(raw: *mut jni::sys::JavaVM) -> Result<&'static JavaVM> {
    if let Some(vm) = JAVA_VM.get() {
        if vm.get_java_vm_pointer() != raw {
            tracing::debug!("Java VM already registered, ignoring {:p}", raw);
        }
        return Ok(vm);
    }

    let vm = JavaVM::from_raw(raw).map_err(|e| SignalError::VmUnavailable(e.to_string()))?;
    Ok(JAVA_VM.get_or_init(|| vm))
}

/// The registered VM.
pub fn java_vm() -> Result<&'static JavaVM> {
    JAVA_VM.get().ok_or_else(|| {
        SignalError::VmUnavailable(
            "no Java VM registered; load the library through System.loadLibrary \
             or start from a native activity"
                .to_string(),
        )
    })
}

/// JNI environment for the calling thread, attaching it on first use.
///
/// Threads stay attached until they exit.
pub fn attach_current_thread(vm: &JavaVM) -> Result<JNIEnv<'_>> {
    if let Ok(env) = vm.get_env() {
        return Ok(env);
    }
    tracing::debug!("Attaching thread {:?} to Java VM", std::thread::current().id());
    vm.attach_current_thread_permanently()
        .map_err(|e| SignalError::AttachFailed(e.to_string()))
}
