//! Shared test double: an in-memory engine that records what it was asked
//! to do and routes deterministic output through the session's sink.

use std::collections::HashMap;

use rules_kernel::{EngineError, HostFn, OutputSink, SlottedName};

/// Fake rules engine. Forms containing the atom `bad` fail; everything else
/// succeeds and echoes through the sink the way a real engine would route
/// its router output.
#[derive(Default)]
pub struct FakeEngine {
    pub sink: OutputSink,
    pub built: Vec<String>,
    pub evaluated: Vec<String>,
    /// Exact expression -> textual result served by `eval`.
    pub eval_results: HashMap<String, String>,
    pub defined: Vec<String>,
    pub callables: HashMap<String, HostFn>,
    pub reject_definitions: bool,
    pub class_list: Vec<SlottedName>,
    pub template_list: Vec<SlottedName>,
    pub generic_names: Vec<String>,
    pub function_names: Vec<String>,
    pub global_names: Vec<String>,
}

impl FakeEngine {
    pub fn with_sink(sink: OutputSink) -> Self {
        Self {
            sink,
            ..Self::default()
        }
    }
}

impl rules_kernel::Engine for FakeEngine {
    fn build(&mut self, construct: &str) -> Result<(), EngineError> {
        self.built.push(construct.to_string());
        if construct.contains("bad") {
            self.sink.write("stderr", "[engine] cannot build construct\n");
            return Err(EngineError::new("cannot build construct"));
        }
        Ok(())
    }

    fn eval(&mut self, expression: &str) -> Result<Option<String>, EngineError> {
        self.evaluated.push(expression.to_string());
        if expression.contains("bad") {
            self.sink.write("stderr", "[engine] evaluation error\n");
            return Err(EngineError::new("evaluation error"));
        }
        self.sink.write("stdout", &format!("echo {expression}\n"));
        Ok(self.eval_results.get(expression).cloned())
    }

    fn classes(&self) -> Vec<SlottedName> {
        self.class_list.clone()
    }

    fn templates(&self) -> Vec<SlottedName> {
        self.template_list.clone()
    }

    fn generics(&self) -> Vec<String> {
        self.generic_names.clone()
    }

    fn functions(&self) -> Vec<String> {
        self.function_names.clone()
    }

    fn globals(&self) -> Vec<String> {
        self.global_names.clone()
    }

    fn define_function(&mut self, name: &str, callable: HostFn) -> Result<(), EngineError> {
        if self.reject_definitions {
            self.sink.write("stderr", "[engine] definition refused\n");
            return Err(EngineError::new("definition refused"));
        }
        self.defined.push(name.to_string());
        self.callables.insert(name.to_string(), callable);
        Ok(())
    }
}
