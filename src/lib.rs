//! rules-kernel: cell interpretation and dispatch core for an interactive
//! rules-language front-end.
//!
//! This crate contains the pure kernel logic with NO transport dependencies:
//! - Delimiter balance checking and top-level form splitting
//! - The cell mode state machine (rules / script / define-function)
//! - The cell dispatcher with per-form evaluation and output aggregation
//! - Output capture and character-oriented input bridging
//! - Scripting cells on an embedded rhai runtime
//! - Completion-candidate assembly with fuzzy ranking
//!
//! The embedded rules engine and the front-end protocol layer are external
//! collaborators: the engine is reached through the [`Engine`] trait, and the
//! transport invokes the [`Session`] handlers and frames their replies.

pub mod complete;
pub mod engine;
pub mod error;
pub mod forms;
pub mod io;
pub mod script;
pub mod session;
pub mod vocabulary;

// Re-export commonly used types
pub use complete::CompletionReply;
pub use engine::{Engine, HostFn, SlottedName};
pub use error::{EngineError, KernelError};
pub use io::{InputBridge, LineSource, OutputSink};
pub use script::ScriptRuntime;
pub use session::{
    CellMode, CompletenessReply, CompletenessStatus, ExecStatus, ExecuteReply, Session,
};
