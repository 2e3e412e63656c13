use novolang::ast::{error::AstError, Program};
use novolang::interpreter::{
    context::BufferedContext,
    dispatch::{DispatchError, Dispatcher, HostValue, RejectAll},
    environment::Environment,
    error::ExecutionError,
    SystemContext, TreeWalkInterpreter, TreeWalkStatementInterpreter,
};
use novolang::value::{
    error::{RuntimeError, RuntimeErrorKind},
    Value,
};
use serde_json::json;

#[derive(Debug, Default)]
struct RecordingDispatcher {
    calls: Vec<(String, Vec<HostValue>)>,
}

impl Dispatcher for RecordingDispatcher {
    fn invoke(&mut self, name: &str, arguments: &[HostValue]) -> Result<(), DispatchError> {
        self.calls.push((name.to_string(), arguments.to_vec()));
        Ok(())
    }
}

fn print_identifier(name: &str) -> serde_json::Value {
    json!({"type": "PRINT", "expr": {"type": "IDENTIFIER", "name": name}})
}

#[test]
fn globals_persist_across_executions() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), RejectAll);
    interpreter.execute(&json!({"type": "BLOCK", "statements": [
        {"type": "ASSIGNMENT", "target": "total", "value": {"type": "NUMBER", "value": 40}}
    ]}));
    interpreter.execute(&json!({"type": "BLOCK", "statements": [
        {"type": "ASSIGNMENT", "target": "total", "value": {
            "type": "BINARY_OP",
            "left": {"type": "IDENTIFIER", "name": "total"},
            "op": "+",
            "right": {"type": "NUMBER", "value": 2}
        }},
        print_identifier("total")
    ]}));

    assert!(interpreter.globals().exists_local("total"));
    assert_eq!(interpreter.globals().get("total"), Ok(Value::Integer(42)));
    assert_eq!(interpreter.context().output(), "42\n");
    assert_eq!(interpreter.context().diagnostics(), "");
}

#[test]
fn fatal_fault_is_returned_by_try_execute() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), RejectAll);
    let result = interpreter.try_execute(&json!({"type": "BLOCK", "statements": [
        print_identifier("missing")
    ]}));

    let error = match result {
        Err(ExecutionError::Runtime(error)) => error,
        other => panic!("expected a runtime error, got {other:?}"),
    };
    assert_eq!(
        error,
        RuntimeError {
            kind: RuntimeErrorKind::UndefinedVariable("missing".into()),
            statement: "PRINT",
        }
    );
    assert_eq!(error.code(), "RT001");
    assert_eq!(error.to_string(), "错误：变量 'missing' 未定义");
    // Nothing is reported when the caller takes the error.
    assert_eq!(interpreter.context().diagnostics(), "");
}

#[test]
fn malformed_root_is_returned_by_try_execute() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), RejectAll);
    let result = interpreter.try_execute(&json!({"type": "BLOCK", "statements": "PRINT"}));
    assert!(matches!(result, Err(ExecutionError::Ast(_))));
    assert_eq!(interpreter.context().output(), "");
}

#[test]
fn malformed_node_faults_where_it_is_reached() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), RejectAll);
    let result = interpreter.try_execute(&json!({"type": "BLOCK", "statements": [
        {"type": "PRINT", "expr": {"type": "STRING", "value": "before"}},
        {"type": "LOOP", "condition": {"type": "BOOL", "value": true}},
        {"type": "PRINT", "expr": {"type": "STRING", "value": "after"}}
    ]}));

    let error = match result {
        Err(ExecutionError::Runtime(error)) => error,
        other => panic!("expected a runtime error, got {other:?}"),
    };
    assert_eq!(
        error.kind,
        RuntimeErrorKind::MalformedNode(AstError::MissingKey {
            node: "LOOP".into(),
            key: "body",
        })
    );
    assert_eq!(error.code(), "RT002");
    assert_eq!(interpreter.context().output(), "before\n");
}

#[test]
fn malformed_node_in_untaken_branch_is_never_touched() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), RejectAll);
    interpreter.execute(&json!({"type": "BLOCK", "statements": [
        {"type": "PRINT", "expr": {"type": "STRING", "value": "before"}},
        {"type": "IF", "condition": {"type": "BOOL", "value": true},
         "body": {"type": "BLOCK", "statements": []},
         "else_body": {"type": "ASSIGNMENT", "value": {"type": "NULL"}}},
        {"type": "IF", "condition": {"type": "BOOL", "value": false},
         "body": {"type": "PRINT"},
         "else_body": {"type": "AUTO_CALL", "function": "wait"}},
        {"type": "PRINT", "expr": {"type": "STRING", "value": "after"}}
    ]}));

    // Only the taken else branch faults.
    assert_eq!(interpreter.context().output(), "before\n");
    assert_eq!(
        interpreter.context().diagnostics(),
        "Runtime Error: Node `AUTO_CALL` is missing the key `args`.\n"
    );

    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), RejectAll);
    interpreter.execute(&json!({"type": "BLOCK", "statements": [
        {"type": "PRINT", "expr": {"type": "STRING", "value": "before"}},
        {"type": "IF", "condition": {"type": "BOOL", "value": false},
         "body": {"type": "PRINT"}},
        {"type": "LOOP", "condition": {"type": "BOOL", "value": false},
         "body": {"type": "BLOCK"}},
        {"type": "PRINT", "expr": {"type": "STRING", "value": "after"}}
    ]}));
    assert_eq!(interpreter.context().output(), "before\nafter\n");
    assert_eq!(interpreter.context().diagnostics(), "");
}

#[test]
fn unsupported_nodes_do_not_stop_execution() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), RejectAll);
    interpreter
        .try_execute(&json!({"type": "BLOCK", "statements": [
            {"type": "RETURN", "value": {"type": "NUMBER", "value": 1}},
            {"type": "ASSIGNMENT", "target": "f", "value": {"type": "LAMBDA"}},
            print_identifier("f")
        ]}))
        .expect("unsupported nodes are not faults");
    assert_eq!(interpreter.globals().get("f"), Ok(Value::Null));
    assert_eq!(interpreter.context().output(), "空\n");
}

#[test]
fn auto_call_converts_arguments_to_host_values() {
    let mut dispatcher = RecordingDispatcher::default();
    {
        let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), &mut dispatcher);
        interpreter.execute(&json!({"type": "BLOCK", "statements": [
            {"type": "ASSIGNMENT", "target": "n", "value": {"type": "NUMBER", "value": 3}},
            {"type": "AUTO_CALL", "function": "点击", "args": [
                {"type": "IDENTIFIER", "name": "n"},
                {"type": "NUMBER", "value": 0.5},
                {"type": "STRING", "value": "ok"},
                {"type": "BOOL", "value": true},
                {"type": "NULL"},
                {"type": "BINARY_OP",
                 "left": {"type": "NUMBER", "value": 1},
                 "op": "<",
                 "right": {"type": "IDENTIFIER", "name": "n"}}
            ]}
        ]}));
        assert_eq!(interpreter.context().diagnostics(), "");
    }

    assert_eq!(
        dispatcher.calls,
        vec![(
            "点击".to_string(),
            vec![
                HostValue::Int(3),
                HostValue::Float(0.5),
                HostValue::Str("ok".into()),
                HostValue::Bool(true),
                HostValue::None,
                HostValue::Bool(true),
            ]
        )]
    );
}

#[test]
fn owned_dispatcher_is_reachable_after_execution() {
    let mut interpreter =
        TreeWalkInterpreter::new(BufferedContext::new(), RecordingDispatcher::default());
    interpreter.execute(&json!({"type": "BLOCK", "statements": [
        {"type": "AUTO_CALL", "function": "wait", "args": [{"type": "NUMBER", "value": 1}]},
        {"type": "AUTO_CALL", "function": "click", "args": []}
    ]}));

    let names: Vec<_> = interpreter
        .dispatcher()
        .calls
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, ["wait", "click"]);
}

#[test]
fn nested_blocks_leave_the_active_frame_untouched() {
    let program = Program::lower(&json!({"type": "BLOCK", "statements": [
        {"type": "BLOCK", "statements": [
            {"type": "ASSIGNMENT", "target": "a", "value": {"type": "NUMBER", "value": 1}},
            {"type": "BLOCK", "statements": [
                {"type": "ASSIGNMENT", "target": "b", "value": {"type": "NUMBER", "value": 2}},
                {"type": "IF", "condition": {"type": "BOOL", "value": true},
                 "body": {"type": "ASSIGNMENT", "target": "c", "value": {"type": "NULL"}}}
            ]}
        ]}
    ]}))
    .expect("tree is well formed")
    .expect("root is a block");

    let interpreter = TreeWalkStatementInterpreter::default();
    let globals = Environment::new();
    let mut environment = globals.new_scope();
    let before = environment.clone();
    let mut context = BufferedContext::new();
    let mut dispatcher = RejectAll;
    for stmt in program.statements() {
        interpreter
            .interpret_statement(&mut environment, &mut context, &mut dispatcher, stmt)
            .expect("program has no faults");
    }

    assert!(environment.ptr_eq(&before));
    assert_eq!(environment.depth(), 1);
    for name in ["a", "b", "c"] {
        assert!(environment.get(name).is_err(), "`{name}` leaked out of its block");
    }
}

#[test]
fn buffered_context_serves_scripted_input() {
    let mut context = BufferedContext::with_input(["first", "second"]);
    assert_eq!(context.read_line("> "), "first");
    assert_eq!(context.read_line("> "), "second");
    assert_eq!(context.read_line(""), "");
    assert_eq!(context.output(), "> > ");
}
