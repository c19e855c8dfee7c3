//! `Context.sendBroadcast` through JNI

use gfxbench_core::{Broadcaster, IntentSpec, Result, SignalError};
use jni::objects::{JObject, JValue};
use jni::signature::{Primitive, ReturnType};
use jni::sys::jobject;
use jni::{JNIEnv, JavaVM};

use crate::intent::{call_error, find_class, method_id, new_intent};
use crate::vm::attach_current_thread;

const CONTEXT_CLASS: &str = "android/content/Context";
const SEND_BROADCAST_SIG: &str = "(Landroid/content/Intent;)V";

/// Local references created by one dispatch: class, ctor args, intent,
/// builder return values.
const LOCAL_FRAME_CAPACITY: i32 = 16;

/// Broadcasts through a context on the calling thread.
pub struct JniBroadcaster<'vm> {
    vm: &'vm JavaVM,
    context: jobject,
}

impl<'vm> JniBroadcaster<'vm> {
    pub fn new(vm: &'vm JavaVM, context: jobject) -> Self {
        Self { vm, context }
    }
}

impl Broadcaster for JniBroadcaster<'_> {
    fn send_broadcast(&self, intent: &IntentSpec) -> Result<()> {
        if self.context.is_null() {
            return Err(SignalError::InvalidArgument("context is null".to_string()));
        }
        let mut env = attach_current_thread(self.vm)?;

        env.push_local_frame(LOCAL_FRAME_CAPACITY)
            .map_err(|e| SignalError::Jni(format!("PushLocalFrame: {}", e)))?;
        let result = send_in_frame(&mut env, self.context, intent);
        // SAFETY: no reference created inside the frame outlives this call.
        if let Err(e) = unsafe { env.pop_local_frame(&JObject::null()) } {
            tracing::warn!("PopLocalFrame failed: {}", e);
        }
        result
    }
}

fn send_in_frame(env: &mut JNIEnv<'_>, context: jobject, spec: &IntentSpec) -> Result<()> {
    // SAFETY: the caller keeps `context` alive for the duration of the call.
    let context = unsafe { JObject::from_raw(context) };
    let context_class = find_class(env, CONTEXT_CLASS)?;
    let send = method_id(env, &context_class, CONTEXT_CLASS, "sendBroadcast", SEND_BROADCAST_SIG)?;
    let intent = new_intent(env, spec)?;

    let result = unsafe {
        env.call_method_unchecked(
            &context,
            send,
            ReturnType::Primitive(Primitive::Void),
            &[JValue::Object(&intent).as_jni()],
        )
    };

    match result {
        Ok(_) => {
            tracing::debug!("Broadcast {} sent", spec.action);
            Ok(())
        }
        Err(e) => Err(call_error(env, "Context.sendBroadcast", e)),
    }
}
