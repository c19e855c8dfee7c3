//! Sources of an `android.content.Context`
//!
//! The benchmark can be started from a plain context reference or from
//! anything that bundles a VM with its activity: a raw `ANativeActivity*`,
//! the `ndk` wrapper around it, or an `android-activity` app.

use jni::sys::{jobject, JavaVM};

/// Supplies the context used for `sendBroadcast`.
pub trait ContextSource {
    /// VM bundled with this source. `None` falls back to the VM captured in
    /// `JNI_OnLoad`.
    fn java_vm(&self) -> Option<*mut JavaVM> {
        None
    }

    /// Reference to an `android.content.Context`, valid on the calling thread.
    fn context(&self) -> jobject;
}

/// A bare context reference handed over by Java or native code.
#[derive(Clone, Copy, Debug)]
pub struct RawContext(jobject);

impl RawContext {
    pub fn new(context: jobject) -> Self {
        Self(context)
    }
}

impl ContextSource for RawContext {
    fn context(&self) -> jobject {
        self.0
    }
}

/// A context paired with the VM that owns it.
#[derive(Clone, Copy, Debug)]
pub struct VmContext {
    vm: *mut JavaVM,
    context: jobject,
}

impl VmContext {
    pub fn new(vm: *mut JavaVM, context: jobject) -> Self {
        Self { vm, context }
    }
}

impl ContextSource for VmContext {
    fn java_vm(&self) -> Option<*mut JavaVM> {
        (!self.vm.is_null()).then_some(self.vm)
    }

    fn context(&self) -> jobject {
        self.context
    }
}

#[cfg(target_os = "android")]
mod android {
    use std::ptr::NonNull;

    use super::ContextSource;
    use jni::sys::{jobject, JavaVM};

    /// Borrowed `ANativeActivity*` from a NativeActivity callback.
    #[derive(Clone, Copy, Debug)]
    pub struct NativeActivityHandle(NonNull<ndk_sys::ANativeActivity>);

    impl NativeActivityHandle {
        /// # Safety
        ///
        /// `activity` must be null or point to a live `ANativeActivity` for as
        /// long as the handle is used.
        pub unsafe fn from_ptr(activity: *mut ndk_sys::ANativeActivity) -> Option<Self> {
            NonNull::new(activity).map(Self)
        }
    }

    impl ContextSource for NativeActivityHandle {
        fn java_vm(&self) -> Option<*mut JavaVM> {
            let vm = unsafe { self.0.as_ref().vm };
            (!vm.is_null()).then(|| vm.cast())
        }

        fn context(&self) -> jobject {
            // `clazz` is the activity instance (a global ref), not its class.
            unsafe { self.0.as_ref().clazz.cast() }
        }
    }

    impl ContextSource for ndk::native_activity::NativeActivity {
        fn java_vm(&self) -> Option<*mut JavaVM> {
            let vm = self.vm();
            (!vm.is_null()).then(|| vm.cast())
        }

        fn context(&self) -> jobject {
            self.activity().cast()
        }
    }

    impl ContextSource for android_activity::AndroidApp {
        fn java_vm(&self) -> Option<*mut JavaVM> {
            let vm = self.vm_as_ptr();
            (!vm.is_null()).then(|| vm.cast())
        }

        fn context(&self) -> jobject {
            self.activity_as_ptr().cast()
        }
    }
}

#[cfg(target_os = "android")]
pub use android::NativeActivityHandle;
