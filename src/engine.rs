//! Embedded rules-engine adapter.
//!
//! The engine itself is an external collaborator: this module only fixes the
//! seam the dispatcher and completion assembler talk through. Implementations
//! are expected to route their displayable output to the session's
//! [`OutputSink`](crate::io::OutputSink) handle and may pull interactive input
//! through an [`InputBridge`](crate::io::InputBridge).

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A scripted function made callable from the rules language.
///
/// Arguments and return value travel as display strings; the engine side is
/// responsible for converting to and from its own value types.
pub type HostFn = Box<dyn Fn(&[String]) -> Result<String, String>>;

/// A named construct carrying slots (a class or a template).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlottedName {
    pub name: String,
    pub slots: Vec<String>,
}

impl SlottedName {
    pub fn new(name: impl Into<String>, slots: Vec<String>) -> Self {
        Self {
            name: name.into(),
            slots,
        }
    }
}

/// Operations the kernel core needs from the embedded engine.
///
/// `build` compiles a construct definition, `eval` evaluates an expression
/// and returns its textual value (or nothing). The introspection methods
/// enumerate currently defined constructs by kind and only feed completion.
pub trait Engine {
    fn build(&mut self, construct: &str) -> Result<(), EngineError>;

    fn eval(&mut self, expression: &str) -> Result<Option<String>, EngineError>;

    fn classes(&self) -> Vec<SlottedName>;

    fn templates(&self) -> Vec<SlottedName>;

    fn generics(&self) -> Vec<String>;

    fn functions(&self) -> Vec<String>;

    fn globals(&self) -> Vec<String>;

    /// Register a scripted function under `name` so rule-language code can
    /// call it.
    fn define_function(&mut self, name: &str, callable: HostFn) -> Result<(), EngineError>;
}
