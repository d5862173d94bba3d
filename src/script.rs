//! Scripting-mode execution.
//!
//! Scripting cells run on an embedded rhai engine. Output written through
//! `print`/`debug` is captured per cell; top-level variables persist across
//! cells in the session scope. Define-function cells additionally extract
//! the first `fn` definition of the cell and wrap the compiled function as a
//! callable the rules engine can register.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use rhai::{Dynamic, Scope, AST};

use crate::engine::HostFn;
use crate::error::KernelError;

/// First function definition in a scripting cell: `fn name(` ... only the
/// first match counts; multi-definition cells are out of contract.
static FN_DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fn\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap());

/// Extract the name of the first function defined in `source`, if any.
pub fn function_name(source: &str) -> Option<&str> {
    FN_DEFINITION
        .captures(source)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Session-scoped scripting runtime.
///
/// One per session. The rhai engine is shared behind an `Rc` so callables
/// handed to the rules engine can keep invoking their function after the
/// cell that defined it is gone.
pub struct ScriptRuntime {
    engine: Rc<rhai::Engine>,
    scope: Scope<'static>,
    captured: Rc<RefCell<String>>,
}

impl Default for ScriptRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRuntime {
    pub fn new() -> Self {
        let captured = Rc::new(RefCell::new(String::new()));
        let mut engine = rhai::Engine::new();

        let print_buffer = Rc::clone(&captured);
        engine.on_print(move |text| {
            let mut buffer = print_buffer.borrow_mut();
            buffer.push_str(text);
            buffer.push('\n');
        });

        let debug_buffer = Rc::clone(&captured);
        engine.on_debug(move |text, _source, _pos| {
            let mut buffer = debug_buffer.borrow_mut();
            buffer.push_str(text);
            buffer.push('\n');
        });

        Self {
            engine: Rc::new(engine),
            scope: Scope::new(),
            captured,
        }
    }

    /// Compile and run one scripting cell against the persistent scope.
    ///
    /// Output stays in the capture buffer either way; fetch it with
    /// [`take_output`](Self::take_output) after inspecting the result.
    pub fn run(&mut self, source: &str) -> Result<Rc<AST>, KernelError> {
        let ast = self
            .engine
            .compile(source)
            .map_err(|error| KernelError::Script(error.to_string()))?;
        self.engine
            .run_ast_with_scope(&mut self.scope, &ast)
            .map_err(|error| KernelError::Script(error.to_string()))?;
        Ok(Rc::new(ast))
    }

    /// Drain the output captured since the last call.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut *self.captured.borrow_mut())
    }

    /// Wrap the function `name` compiled in `ast` as an engine callable.
    ///
    /// Returns `None` when `ast` holds no function of that name. Each call
    /// runs in a fresh scope; arguments arrive as strings and the result is
    /// stringified.
    pub fn callable(&self, ast: &Rc<AST>, name: &str) -> Option<HostFn> {
        if !ast.iter_functions().any(|f| f.name == name) {
            return None;
        }

        let engine = Rc::clone(&self.engine);
        let ast = Rc::clone(ast);
        let fn_name = name.to_string();

        Some(Box::new(move |args: &[String]| {
            let call_args: Vec<String> = args.to_vec();
            let mut scope = Scope::new();
            engine
                .call_fn::<Dynamic>(&mut scope, &ast, &fn_name, call_args)
                .map(|value| value.to_string())
                .map_err(|error| error.to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn run_captures_print_and_debug() {
        let mut runtime = ScriptRuntime::new();
        runtime.run(r#"print("hello"); debug("check");"#).unwrap();
        let output = runtime.take_output();
        assert!(output.contains("hello"));
        assert!(output.contains("check"));
        assert_eq!(runtime.take_output(), "");
    }

    #[test]
    fn variables_persist_across_cells() {
        let mut runtime = ScriptRuntime::new();
        runtime.run("let total = 40;").unwrap();
        runtime.run("total += 2; print(total);").unwrap();
        assert_eq!(runtime.take_output(), "42\n");
    }

    #[test]
    fn run_reports_compile_errors() {
        let mut runtime = ScriptRuntime::new();
        let error = runtime.run("let = ;").unwrap_err();
        assert!(matches!(error, KernelError::Script(_)));
    }

    #[test]
    fn run_reports_runtime_errors_with_captured_output() {
        let mut runtime = ScriptRuntime::new();
        let error = runtime.run(r#"print("before"); missing();"#).unwrap_err();
        assert!(matches!(error, KernelError::Script(_)));
        assert!(runtime.take_output().contains("before"));
    }

    #[test]
    fn function_name_finds_first_definition() {
        let source = "fn double(x) { x * 2 }\nfn ignored() {}";
        assert_eq!(function_name(source), Some("double"));
        assert_eq!(function_name("let x = 1;"), None);
    }

    #[test]
    fn callable_invokes_compiled_function() {
        let mut runtime = ScriptRuntime::new();
        let ast = runtime.run("fn shout(word) { word + \"!\" }").unwrap();

        let callable = runtime.callable(&ast, "shout").unwrap();
        let result = callable(&["hey".to_string()]).unwrap();
        assert_eq!(result, "hey!");
    }

    #[test]
    fn callable_is_none_for_missing_function() {
        let mut runtime = ScriptRuntime::new();
        let ast = runtime.run("let x = 1;").unwrap();
        assert!(runtime.callable(&ast, "absent").is_none());
    }

    #[test]
    fn callable_surfaces_call_errors() {
        let mut runtime = ScriptRuntime::new();
        let ast = runtime.run("fn fail() { throw \"boom\" }").unwrap();
        let callable = runtime.callable(&ast, "fail").unwrap();
        assert!(callable(&[]).is_err());
    }
}
