//! Error types for the kernel core.
//!
//! Engine failures of any origin are normalized into a single message-bearing
//! [`EngineError`]; [`KernelError`] is the taxonomy the dispatcher reports
//! through cell status and diagnostic text. No error here is fatal to the
//! session.

use thiserror::Error;

/// Failure reported by the embedded rules engine.
///
/// The engine is an opaque collaborator; whatever condition it raised is
/// carried as its original message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for EngineError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for EngineError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Everything that can go wrong while interpreting one cell.
#[derive(Debug, Error)]
pub enum KernelError {
    /// The engine rejected a form during build or eval.
    #[error("execution failed: {0}")]
    Execution(#[from] EngineError),

    /// A scripting cell failed to compile or run.
    #[error("script error: {0}")]
    Script(String),

    /// A define-function cell contained no resolvable function definition.
    #[error("no function definition found")]
    NoFunctionDefinition,

    /// The engine refused to register a scripted function.
    #[error("unable to define function in the engine: {0}")]
    Registration(EngineError),

    /// A magic cell named a command outside the fixed vocabulary.
    #[error("unrecognised magic command")]
    UnknownMagic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_keeps_original_message() {
        let error = EngineError::new("syntax error at token x");
        let kernel: KernelError = error.into();
        assert_eq!(
            kernel.to_string(),
            "execution failed: syntax error at token x"
        );
    }

    #[test]
    fn registration_error_wraps_engine_message() {
        let kernel = KernelError::Registration(EngineError::new("duplicate name"));
        assert_eq!(
            kernel.to_string(),
            "unable to define function in the engine: duplicate name"
        );
    }
}
