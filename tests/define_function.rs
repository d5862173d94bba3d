//! Scripting cells end to end: output capture, failure traces, and the
//! define-function round trip into the engine.

mod common;

use pretty_assertions::assert_eq;

use common::FakeEngine;
use rules_kernel::{CellMode, ExecStatus, OutputSink, Session};

fn session() -> Session<FakeEngine> {
    let sink = OutputSink::new();
    let engine = FakeEngine::with_sink(sink.clone());
    Session::with_output(engine, sink)
}

fn scripting_session() -> Session<FakeEngine> {
    let mut session = session();
    session.execute_cell("%%enter-scripting-mode", false);
    session
}

fn defining_session() -> Session<FakeEngine> {
    let mut session = session();
    session.execute_cell("%%enter-define-function-mode", false);
    session
}

#[test]
fn script_cell_output_is_captured() {
    let mut session = scripting_session();

    let reply = session.execute_cell(r#"print("forty " + "two");"#, false);

    assert_eq!(reply.status, ExecStatus::Ok);
    assert_eq!(reply.emitted_text.unwrap(), "forty two\n");
}

#[test]
fn script_state_persists_across_scripting_cells() {
    let mut session = session();

    session.execute_cell("%%enter-scripting-mode", false);
    session.execute_cell("let counter = 41;", false);

    session.execute_cell("%%enter-scripting-mode", false);
    let reply = session.execute_cell("counter += 1; print(counter);", false);

    assert_eq!(reply.emitted_text.unwrap(), "42\n");
}

#[test]
fn script_failure_appends_a_trace_after_captured_output() {
    let mut session = scripting_session();

    let reply = session.execute_cell(r#"print("before"); nope();"#, false);

    assert_eq!(reply.status, ExecStatus::Error);
    let text = reply.emitted_text.unwrap();
    let before = text.find("before").unwrap();
    let trace = text.find("script error").unwrap();
    assert!(before < trace);
}

#[test]
fn define_function_registers_the_scripted_callable() {
    let mut session = defining_session();

    let reply = session.execute_cell("fn greet(name) { \"hello \" + name }", false);

    assert_eq!(reply.status, ExecStatus::Ok);
    assert_eq!(session.mode(), CellMode::Rules);
    assert_eq!(session.engine().defined, vec!["greet"]);

    let callable = &session.engine().callables["greet"];
    assert_eq!(callable(&["world".to_string()]).unwrap(), "hello world");
}

#[test]
fn define_function_without_a_definition_fails() {
    let mut session = defining_session();

    let reply = session.execute_cell("let x = 10;", false);

    assert_eq!(reply.status, ExecStatus::Error);
    assert!(reply
        .emitted_text
        .unwrap()
        .contains("no function definition found"));
    assert!(session.engine().defined.is_empty());
}

#[test]
fn rejected_registration_discards_captured_engine_output() {
    let sink = OutputSink::new();
    let mut engine = FakeEngine::with_sink(sink.clone());
    engine.reject_definitions = true;
    let mut session = Session::with_output(engine, sink);

    session.execute_cell("%%enter-define-function-mode", false);
    let reply = session.execute_cell("fn halve(x) { x / 2 }", false);

    assert_eq!(reply.status, ExecStatus::Error);
    assert!(reply
        .emitted_text
        .unwrap()
        .contains("unable to define function in the engine"));
    // whatever the engine pushed during the attempt was dropped
    assert!(session.output_sink().is_empty());
}

#[test]
fn only_the_first_definition_is_registered() {
    let mut session = defining_session();

    session.execute_cell("fn first() { 1 }\nfn second() { 2 }", false);

    assert_eq!(session.engine().defined, vec!["first"]);
}
