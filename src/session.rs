//! Session state and the cell dispatcher.
//!
//! One [`Session`] per interactive front-end connection. The session owns
//! the embedded engine, the cell mode, the output sink and the scripting
//! runtime; the transport layer calls [`execute_cell`](Session::execute_cell),
//! [`check_complete`](Session::check_complete) and
//! [`complete`](Session::complete) and frames the replies.

use std::rc::Rc;

use rhai::AST;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complete::{self, CompletionReply};
use crate::engine::Engine;
use crate::error::KernelError;
use crate::forms::{self, FormKind};
use crate::io::OutputSink;
use crate::script::{self, ScriptRuntime};
use crate::vocabulary::{MAGIC_DEFINE_FUNCTION, MAGIC_PREFIX, MAGIC_SCRIPT};

// ============================================================================
// Modes and reply types
// ============================================================================

/// How the next cell will be interpreted.
///
/// `Script` and `DefineFunction` are one-shot: they apply to exactly one
/// non-magic cell, then the mode reverts to `Rules`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellMode {
    #[default]
    Rules,
    Script,
    DefineFunction,
}

/// Outcome status of one executed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecStatus {
    Ok,
    Error,
}

/// Reply to an execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteReply {
    pub status: ExecStatus,
    pub execution_count: u64,
    /// Aggregated cell output; absent when the cell was silenced or empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emitted_text: Option<String>,
}

/// Whether a cell is ready to execute or needs more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletenessStatus {
    Complete,
    Incomplete,
}

/// Reply to a completeness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReply {
    pub status: CompletenessStatus,
    /// Continuation indent the front-end should apply to the next line.
    pub indent: String,
}

// ============================================================================
// Session
// ============================================================================

/// Session state: engine, mode, output sink, scripting runtime and the
/// execution counter. Strictly single-threaded; one cell runs to completion
/// before the next is accepted.
pub struct Session<E: Engine> {
    engine: E,
    mode: CellMode,
    output: OutputSink,
    script: ScriptRuntime,
    execution_count: u64,
}

impl<E: Engine> Session<E> {
    /// Session over `engine` with a fresh output sink.
    pub fn new(engine: E) -> Self {
        Self::with_output(engine, OutputSink::new())
    }

    /// Session over `engine` draining `output`. The caller is expected to
    /// hand a clone of the same sink to the engine side.
    pub fn with_output(engine: E, output: OutputSink) -> Self {
        Self {
            engine,
            mode: CellMode::Rules,
            output,
            script: ScriptRuntime::new(),
            execution_count: 0,
        }
    }

    pub fn mode(&self) -> CellMode {
        self.mode
    }

    pub fn execution_count(&self) -> u64 {
        self.execution_count
    }

    /// Clone of the session's sink handle, for wiring up the engine side.
    pub fn output_sink(&self) -> OutputSink {
        self.output.clone()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ------------------------------------------------------------------
    // Execution entry point
    // ------------------------------------------------------------------

    /// Execute one cell and report its status plus aggregated output.
    pub fn execute_cell(&mut self, code: &str, silent: bool) -> ExecuteReply {
        if code.trim().is_empty() {
            return ExecuteReply {
                status: ExecStatus::Ok,
                execution_count: self.execution_count,
                emitted_text: None,
            };
        }

        if !silent {
            self.execution_count += 1;
        }

        let (status, text) = if let Some(word) = magic_word(code) {
            self.magic_cell(word)
        } else {
            match self.mode {
                CellMode::Rules => self.rules_cell(code),
                CellMode::Script | CellMode::DefineFunction => {
                    let outcome = self.script_cell(code);
                    // scripting modes consume exactly one cell
                    self.mode = CellMode::Rules;
                    outcome
                }
            }
        };
        debug!("cell executed: status {:?}, mode now {:?}", status, self.mode);

        ExecuteReply {
            status,
            execution_count: self.execution_count,
            emitted_text: (!silent).then_some(text),
        }
    }

    /// Completeness probe for the continuation prompt.
    pub fn check_complete(&self, code: &str) -> CompletenessReply {
        match self.mode {
            CellMode::Rules => CompletenessReply {
                status: if forms::balanced(code) {
                    CompletenessStatus::Complete
                } else {
                    CompletenessStatus::Incomplete
                },
                indent: "  ".to_string(),
            },
            // scripting cells end on a blank line, not on balance
            CellMode::Script | CellMode::DefineFunction => CompletenessReply {
                status: if code.ends_with("\n\n") {
                    CompletenessStatus::Complete
                } else {
                    CompletenessStatus::Incomplete
                },
                indent: String::new(),
            },
        }
    }

    /// Completion candidates for the token ending at `cursor`.
    pub fn complete(&self, code: &str, cursor: usize) -> CompletionReply {
        complete::assemble(&self.engine, code, cursor)
    }

    // ------------------------------------------------------------------
    // Cell handlers
    // ------------------------------------------------------------------

    fn magic_cell(&mut self, word: &str) -> (ExecStatus, String) {
        match self.apply_magic(word) {
            Ok(ack) => (ExecStatus::Ok, ack),
            Err(error) => (ExecStatus::Error, format!("{error}\n")),
        }
    }

    fn apply_magic(&mut self, word: &str) -> Result<String, KernelError> {
        match word {
            MAGIC_SCRIPT => {
                self.mode = CellMode::Script;
                Ok("Script mode: return twice to execute the inserted code.\n".to_string())
            }
            MAGIC_DEFINE_FUNCTION => {
                self.mode = CellMode::DefineFunction;
                Ok(
                    "Define-function mode: return twice to define the inserted function \
                     within the engine.\n"
                        .to_string(),
                )
            }
            _ => Err(KernelError::UnknownMagic),
        }
    }

    fn rules_cell(&mut self, code: &str) -> (ExecStatus, String) {
        let mut status = ExecStatus::Ok;
        let mut output = String::new();
        let stripped = forms::strip_comments(code);

        for form in forms::split_forms(&stripped) {
            match self.eval_form(&form) {
                Ok(result) => {
                    output.push_str(&self.output.drain());
                    output.push('\n');
                    output.push_str(&result);
                }
                // a failing form contributes its captured output only;
                // the remaining forms still run
                Err(error) => {
                    debug!("form failed: {}", error);
                    status = ExecStatus::Error;
                    output.push_str(&self.output.drain());
                }
            }
        }

        (status, output.trim().to_string())
    }

    fn eval_form(&mut self, form: &str) -> Result<String, KernelError> {
        match forms::classify(form) {
            FormKind::Construct => {
                self.engine.build(form)?;
                Ok(String::new())
            }
            FormKind::Expression => {
                let value = self.engine.eval(form)?;
                Ok(value.unwrap_or_default())
            }
        }
    }

    fn script_cell(&mut self, code: &str) -> (ExecStatus, String) {
        let define = self.mode == CellMode::DefineFunction;

        let outcome = self.script.run(code).and_then(|ast| {
            if define {
                self.define_scripted_function(code, &ast)
            } else {
                Ok(())
            }
        });
        let mut output = self.script.take_output();

        match outcome {
            Ok(()) => (ExecStatus::Ok, output),
            Err(error) => {
                // a rejected registration must not leak partial engine output
                if matches!(error, KernelError::Registration(_)) {
                    self.output.drain();
                }
                output.push('\n');
                output.push_str(&error.to_string());
                (ExecStatus::Error, output)
            }
        }
    }

    fn define_scripted_function(&mut self, code: &str, ast: &Rc<AST>) -> Result<(), KernelError> {
        let name = script::function_name(code).ok_or(KernelError::NoFunctionDefinition)?;
        let callable = self
            .script
            .callable(ast, name)
            .ok_or(KernelError::NoFunctionDefinition)?;
        self.engine
            .define_function(name, callable)
            .map_err(KernelError::Registration)
    }
}

fn magic_word(code: &str) -> Option<&str> {
    code.starts_with(MAGIC_PREFIX)
        .then(|| code.trim_start_matches('%').trim())
}
