//! `android.content.Intent` construction through JNI
//!
//! [`intent_plan`] turns an [`IntentSpec`] into the list of `Intent` method
//! calls; [`new_intent`] replays that list against a live VM.

use gfxbench_core::{ExtraValue, IntentSpec, Result, SignalError};
use jni::objects::{JClass, JMethodID, JObject, JValue};
use jni::signature::ReturnType;
use jni::JNIEnv;

pub(crate) const INTENT_CLASS: &str = "android/content/Intent";
const INTENT_INIT_SIG: &str = "(Ljava/lang/String;)V";
const SET_TYPE_SIG: &str = "(Ljava/lang/String;)Landroid/content/Intent;";
const PUT_LONG_EXTRA_SIG: &str = "(Ljava/lang/String;J)Landroid/content/Intent;";
const PUT_STRING_EXTRA_SIG: &str = "(Ljava/lang/String;Ljava/lang/String;)Landroid/content/Intent;";

/// Argument of a planned call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentArg {
    /// Passed as a new `java.lang.String`
    Str(String),
    /// Passed as a Java `long`
    Long(i64),
}

/// One builder call on the constructed `Intent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentCall {
    pub method: &'static str,
    pub signature: &'static str,
    pub args: Vec<IntentArg>,
    /// Name used in errors and logs.
    pub op: &'static str,
}

/// Constructor argument plus the builder calls that follow it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentPlan {
    pub action: String,
    pub calls: Vec<IntentCall>,
}

/// The JNI calls that build `spec`, in order.
pub fn intent_plan(spec: &IntentSpec) -> IntentPlan {
    let mut calls = Vec::with_capacity(1 + spec.extras.len());

    if let Some(mime_type) = &spec.mime_type {
        calls.push(IntentCall {
            method: "setType",
            signature: SET_TYPE_SIG,
            args: vec![IntentArg::Str(mime_type.clone())],
            op: "Intent.setType",
        });
    }

    for (key, value) in &spec.extras {
        let key = IntentArg::Str(key.clone());
        calls.push(match value {
            ExtraValue::Long(v) => IntentCall {
                method: "putExtra",
                signature: PUT_LONG_EXTRA_SIG,
                args: vec![key, IntentArg::Long(*v)],
                op: "Intent.putExtra(long)",
            },
            ExtraValue::String(s) => IntentCall {
                method: "putExtra",
                signature: PUT_STRING_EXTRA_SIG,
                args: vec![key, IntentArg::Str(s.clone())],
                op: "Intent.putExtra(String)",
            },
        });
    }

    IntentPlan {
        action: spec.action.clone(),
        calls,
    }
}

/// Build a Java `Intent` from `spec`. The result is a local reference.
pub fn new_intent<'local>(env: &mut JNIEnv<'local>, spec: &IntentSpec) -> Result<JObject<'local>> {
    let plan = intent_plan(spec);
    let class = find_class(env, INTENT_CLASS)?;
    let init = method_id(env, &class, INTENT_CLASS, "<init>", INTENT_INIT_SIG)?;

    let action = new_string(env, &plan.action)?;
    let intent = unsafe { env.new_object_unchecked(&class, init, &[JValue::Object(&action).as_jni()]) }
        .map_err(|e| call_error(env, "Intent.<init>", e))?;

    // Both putExtra overloads share a name, so key on the signature too.
    let mut method_ids: Vec<(&'static str, &'static str, JMethodID)> = Vec::new();
    for call in &plan.calls {
        let cached = method_ids
            .iter()
            .find(|(name, sig, _)| *name == call.method && *sig == call.signature)
            .map(|(_, _, id)| *id);
        let method = match cached {
            Some(id) => id,
            None => {
                let id = method_id(env, &class, INTENT_CLASS, call.method, call.signature)?;
                method_ids.push((call.method, call.signature, id));
                id
            }
        };

        let mut lowered = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            lowered.push(match arg {
                IntentArg::Str(s) => Lowered::Object(new_string(env, s)?),
                IntentArg::Long(v) => Lowered::Long(*v),
            });
        }
        let values: Vec<JValue<'_, '_>> = lowered
            .iter()
            .map(|arg| match arg {
                Lowered::Object(obj) => JValue::Object(obj),
                Lowered::Long(v) => JValue::Long(*v),
            })
            .collect();

        call_object(env, &intent, method, &values, call.op)?;
    }

    Ok(intent)
}

enum Lowered<'local> {
    Object(JObject<'local>),
    Long(i64),
}

pub(crate) fn find_class<'local>(env: &mut JNIEnv<'local>, name: &str) -> Result<JClass<'local>> {
    match env.find_class(name) {
        Ok(class) => Ok(class),
        Err(e) => {
            tracing::error!("FindClass({}) failed: {}", name, e);
            clear_pending_exception(env);
            Err(SignalError::ClassNotFound(name.to_string()))
        }
    }
}

pub(crate) fn method_id(
    env: &mut JNIEnv<'_>,
    class: &JClass<'_>,
    class_name: &str,
    name: &str,
    signature: &str,
) -> Result<JMethodID> {
    match env.get_method_id(class, name, signature) {
        Ok(id) => Ok(id),
        Err(e) => {
            tracing::error!("GetMethodID({}.{}{}) failed: {}", class_name, name, signature, e);
            clear_pending_exception(env);
            Err(SignalError::MethodNotFound {
                class: class_name.to_string(),
                name: name.to_string(),
                signature: signature.to_string(),
            })
        }
    }
}

fn new_string<'local>(env: &mut JNIEnv<'local>, value: &str) -> Result<JObject<'local>> {
    match env.new_string(value) {
        Ok(s) => Ok(s.into()),
        Err(e) => Err(call_error(env, "NewStringUTF", e)),
    }
}

/// Call a method returning an object and drop the returned reference.
fn call_object(
    env: &mut JNIEnv<'_>,
    target: &JObject<'_>,
    method: JMethodID,
    args: &[JValue<'_, '_>],
    op: &str,
) -> Result<()> {
    let args: Vec<_> = args.iter().map(|a| a.as_jni()).collect();
    let result = unsafe { env.call_method_unchecked(target, method, ReturnType::Object, &args) };
    match result.and_then(|value| value.l()) {
        Ok(returned) => {
            // Intent builders return `this`; release the extra local ref.
            let _ = env.delete_local_ref(returned);
            Ok(())
        }
        Err(e) => Err(call_error(env, op, e)),
    }
}

/// Map a failed call, describing and clearing any pending Java exception.
pub(crate) fn call_error(env: &mut JNIEnv<'_>, op: &str, err: jni::errors::Error) -> SignalError {
    let pending = env.exception_check().unwrap_or(false);
    let mapped = classify_failure(op, &err, pending);
    if let SignalError::JavaException(_) = mapped {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
        tracing::error!("Java exception during {}", op);
    }
    mapped
}

/// A call that threw (or left an exception pending) is a Java exception;
/// anything else is a plain JNI failure.
pub(crate) fn classify_failure(op: &str, err: &jni::errors::Error, pending: bool) -> SignalError {
    if pending || matches!(err, jni::errors::Error::JavaException) {
        SignalError::JavaException(op.to_string())
    } else {
        SignalError::Jni(format!("{}: {}", op, err))
    }
}

fn clear_pending_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_for_start_intent() {
        let plan = intent_plan(&IntentSpec::benchmark_start(Some(5500)));

        assert_eq!(plan.action, "com.android.graphics.benchmark.START");
        assert_eq!(
            plan.calls,
            vec![
                IntentCall {
                    method: "setType",
                    signature: "(Ljava/lang/String;)Landroid/content/Intent;",
                    args: vec![IntentArg::Str("text/plain".to_string())],
                    op: "Intent.setType",
                },
                IntentCall {
                    method: "putExtra",
                    signature: "(Ljava/lang/String;J)Landroid/content/Intent;",
                    args: vec![IntentArg::Str("timestamp".to_string()), IntentArg::Long(5500)],
                    op: "Intent.putExtra(long)",
                },
            ]
        );
    }

    #[test]
    fn test_plan_skips_set_type_without_mime() {
        let plan = intent_plan(&IntentSpec::new("com.example.GO"));
        assert_eq!(plan.action, "com.example.GO");
        assert!(plan.calls.is_empty());
    }

    #[test]
    fn test_plan_picks_put_extra_overload_per_value() {
        let spec = IntentSpec::new("a")
            .extra_string("scene", "forest")
            .extra_long("iteration", 3);
        let plan = intent_plan(&spec);

        let signatures: Vec<_> = plan.calls.iter().map(|c| (c.method, c.signature)).collect();
        assert_eq!(
            signatures,
            vec![
                ("putExtra", "(Ljava/lang/String;Ljava/lang/String;)Landroid/content/Intent;"),
                ("putExtra", "(Ljava/lang/String;J)Landroid/content/Intent;"),
            ]
        );
        assert_eq!(
            plan.calls[0].args,
            vec![
                IntentArg::Str("scene".to_string()),
                IntentArg::Str("forest".to_string())
            ]
        );
        assert_eq!(plan.calls[1].args[1], IntentArg::Long(3));
    }

    #[test]
    fn test_thrown_exception_maps_to_java_exception() {
        let err = classify_failure("Intent.setType", &jni::errors::Error::JavaException, false);
        assert_eq!(err, SignalError::JavaException("Intent.setType".to_string()));
    }

    #[test]
    fn test_pending_exception_wins_over_jni_error() {
        let err = classify_failure("NewStringUTF", &jni::errors::Error::NullPtr("string"), true);
        assert_eq!(err, SignalError::JavaException("NewStringUTF".to_string()));
    }

    #[test]
    fn test_plain_jni_failure() {
        let err = classify_failure(
            "Context.sendBroadcast",
            &jni::errors::Error::NullPtr("obj"),
            false,
        );
        assert!(matches!(err, SignalError::Jni(msg) if msg.starts_with("Context.sendBroadcast: ")));
    }
}
