//! Signal error types

use thiserror::Error;

/// Errors raised while building or dispatching a benchmark signal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// No Java VM has been registered for this process
    #[error("Java VM not available: {0}")]
    VmUnavailable(String),

    /// The calling thread could not be attached to the VM
    #[error("Failed to attach thread to Java VM: {0}")]
    AttachFailed(String),

    /// `FindClass` failed
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// Method lookup failed
    #[error("Method not found: {class}.{name}{signature}")]
    MethodNotFound {
        class: String,
        name: String,
        signature: String,
    },

    /// A Java exception was left pending by a call
    #[error("Java exception thrown during {0}")]
    JavaException(String),

    /// Any other JNI failure
    #[error("JNI call failed: {0}")]
    Jni(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Not available on this OS
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// Null or otherwise unusable handle passed in
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SignalError {
    /// Stable negative status code used across the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            SignalError::VmUnavailable(_) => -1,
            SignalError::AttachFailed(_) => -2,
            SignalError::ClassNotFound(_) => -3,
            SignalError::MethodNotFound { .. } => -4,
            SignalError::JavaException(_) => -5,
            SignalError::Jni(_) => -6,
            SignalError::Config(_) => -7,
            SignalError::Unsupported(_) => -8,
            SignalError::InvalidArgument(_) => -9,
        }
    }
}

/// Result type for signal operations
pub type Result<T> = std::result::Result<T, SignalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_and_negative() {
        let errors = [
            SignalError::VmUnavailable(String::new()),
            SignalError::AttachFailed(String::new()),
            SignalError::ClassNotFound(String::new()),
            SignalError::MethodNotFound {
                class: String::new(),
                name: String::new(),
                signature: String::new(),
            },
            SignalError::JavaException(String::new()),
            SignalError::Jni(String::new()),
            SignalError::Config(String::new()),
            SignalError::Unsupported(String::new()),
            SignalError::InvalidArgument(String::new()),
        ];

        let mut codes: Vec<i32> = errors.iter().map(SignalError::code).collect();
        assert!(codes.iter().all(|c| *c < 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_method_not_found_message() {
        let err = SignalError::MethodNotFound {
            class: "android/content/Context".to_string(),
            name: "sendBroadcast".to_string(),
            signature: "(Landroid/content/Intent;)V".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Method not found: android/content/Context.sendBroadcast(Landroid/content/Intent;)V"
        );
    }
}
