use super::{Interpreter, RuntimeError, Value};
use crate::parser::{Expression, Span};
use crate::{run_source, Error};
use pretty_assertions::assert_eq;

fn interpreter() -> Interpreter<Vec<u8>> {
    Interpreter::with_output(Vec::new())
}

fn output_of(source: &str) -> String {
    let mut interpreter = interpreter();
    if let Err(e) = run_source(&mut interpreter, source) {
        panic!("\"{source}\" failed: {e}");
    }
    String::from_utf8(interpreter.into_output()).unwrap()
}

fn value_of(source: &str) -> Value {
    run_source(&mut interpreter(), source).unwrap()
}

fn runtime_error(source: &str) -> RuntimeError {
    match run_source(&mut interpreter().with_max_depth(20), source) {
        Err(Error::Runtime(e)) => e,
        other => panic!("\"{source}\" should fail at runtime, got {other:?}"),
    }
}

#[test]
fn test_print_sum() {
    assert_eq!(output_of("x = 3; y = 4; print(x + y);"), "7\n");
}

#[test]
fn test_print_each_argument_on_its_own_line() {
    assert_eq!(output_of("print(1, 'two', 3.5);"), "1\ntwo\n3.5\n");
    assert_eq!(output_of("print();"), "");
}

#[test]
fn test_operations() {
    assert_eq!(output_of("print(10 - 4 - 3);"), "9\n");
    assert_eq!(output_of("print(2 * 3 + 1);"), "8\n");
    assert_eq!(output_of("print(1 / 4);"), "0.25\n");
    assert_eq!(output_of("print(3 > 2, 3 < 2);"), "true\nfalse\n");
    assert_eq!(output_of("print('a' < 'b');"), "true\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(output_of("print('n=' + 1 + 2);"), "n=3\n");
    assert_eq!(output_of("print(1 + 2 + 'x');"), "12x\n");
    assert_eq!(output_of("t = 1 < 2; print('a' + t, t + 1);"), "atrue\n2\n");
}

#[test]
fn test_assignment_yields_value() {
    assert_eq!(value_of("x = 5;"), Value::Number(5.0));
    assert_eq!(value_of("x = y = 'v'; x;"), Value::string("v"));
}

#[test]
fn test_function_definition_and_call() {
    assert_eq!(output_of("add(a,b){ a + b; }; print(add(2,3));"), "5\n");
    assert_eq!(output_of("f(){}; print(f());"), "undefined\n");
    assert_eq!(output_of("f(){}; print(f);"), "<function f>\n");
}

#[test]
fn test_definition_records_parameter_names() {
    let mut interpreter = interpreter();
    run_source(&mut interpreter, "add(a, b){ a + b; };").unwrap();
    let Some(Value::Function(add)) = interpreter.globals().lookup("add") else {
        panic!("add should be bound to a function");
    };
    assert_eq!(add.name(), "add");
    assert_eq!(add.params(), ["a".to_string(), "b".to_string()]);
}

#[test]
fn test_output_accumulates_across_runs() {
    let mut interpreter = interpreter();
    run_source(&mut interpreter, "print('a');").unwrap();
    assert_eq!(interpreter.output().as_slice(), b"a\n");
    run_source(&mut interpreter, "print('b');").unwrap();
    assert_eq!(interpreter.output().as_slice(), b"a\nb\n");
}

#[test]
fn test_missing_and_extra_arguments() {
    assert_eq!(
        output_of("f(a, b){ b; }; print(f(1)); print(f(1, 2, 3));"),
        "undefined\n2\n"
    );
}

#[test]
fn test_assignment_in_function_shadows_global() {
    assert_eq!(output_of("x = 1; f(){ x = 2; x; }; print(f(), x);"), "2\n1\n");
}

#[test]
fn test_closure_captures_defining_scope() {
    let source = "
        make(n){ get(){ n; }; };
        g = make(7);
        n = 100;
        print(g());
    ";
    assert_eq!(output_of(source), "7\n");
}

#[test]
fn test_frames_with_local_functions_are_released() {
    let mut interpreter = interpreter();
    let source = "outer(){ inner(){ 1; }; inner(); }; i = 0; ifLoop(i < 100){ outer(); i = i + 1; };";
    run_source(&mut interpreter, source).unwrap();
    let Some(Value::Function(outer)) = interpreter.globals().lookup("outer") else {
        panic!("outer should be bound to a function");
    };
    assert_eq!(outer.closure().strong_count(), 1);
}

#[test]
fn test_returned_closure_keeps_its_frame() {
    let mut interpreter = interpreter();
    run_source(&mut interpreter, "make(n){ helper(){ n * 2; }; get(){ helper(); }; }; g = make(4);").unwrap();
    run_source(&mut interpreter, "h = make(5);").unwrap();
    assert_eq!(run_source(&mut interpreter, "g();").unwrap(), Value::Number(8.0));
    assert_eq!(run_source(&mut interpreter, "h();").unwrap(), Value::Number(10.0));
}

#[test]
fn test_call_frame_is_not_child_of_caller() {
    let source = "show(){ y; }; wrapper(y){ show(); }; wrapper(1);";
    assert!(matches!(
        runtime_error(source),
        RuntimeError::UndefinedVariable(ref name, _) if name == "y"
    ));
}

#[test]
fn test_recursion() {
    let source = "fact(n){ if(n < 2, 1, n * fact(n - 1)); }; print(fact(5));";
    assert_eq!(output_of(source), "120\n");

    let source = "
        isEven(n){ if(n < 1, 1, isOdd(n - 1)); };
        isOdd(n){ if(n < 1, 0, isEven(n - 1)); };
        print(isEven(4), isOdd(4));
    ";
    assert_eq!(output_of(source), "1\n0\n");
}

#[test]
fn test_recursion_limit() {
    assert!(matches!(
        runtime_error("down(n){ down(n + 1); }; down(0);"),
        RuntimeError::RecursionLimit(20, ref name, _) if name == "down"
    ));
}

#[test]
fn test_depth_is_restored_after_error() {
    let mut interpreter = interpreter().with_max_depth(5);
    assert!(run_source(&mut interpreter, "f(){ undefinedName; }; f();").is_err());
    assert!(run_source(&mut interpreter, "g(n){ if(n > 0, g(n - 1), 0); }; g(4);").is_ok());
}

#[test]
fn test_undefined_variable() {
    let err = runtime_error("print(z);");
    assert!(matches!(err, RuntimeError::UndefinedVariable(ref name, _) if name == "z"));
    assert_eq!(err.to_string(), "no such variable 'z' at line 1, column 7");
}

#[test]
fn test_not_callable() {
    assert!(matches!(
        runtime_error("x = 1; x(2);"),
        RuntimeError::NotCallable(ref what, _) if what == "1"
    ));
    assert!(matches!(
        runtime_error("s = 'a'; s();"),
        RuntimeError::NotCallable(ref what, _) if what == "\"a\""
    ));
}

#[test]
fn test_invalid_operand() {
    assert!(matches!(
        runtime_error("x = print(); print(x - 1);"),
        RuntimeError::InvalidOperand(ref op, "undefined", _) if op == "-"
    ));
}

#[test]
fn test_invalid_parameter() {
    assert!(matches!(
        runtime_error("f(1){ 2; };"),
        RuntimeError::InvalidParameter(ref name, _) if name == "f"
    ));
}

#[test]
fn test_unknown_operation() {
    let expr = Expression::Operation(
        "%".to_string(),
        Box::new(Expression::NumberLiteral("1".to_string(), Span::default())),
        Box::new(Expression::NumberLiteral("2".to_string(), Span::default())),
        Span::default(),
    );
    let mut interpreter = interpreter();
    let globals = interpreter.globals().clone();
    assert!(matches!(
        interpreter.evaluate(&expr, &globals),
        Err(RuntimeError::UnknownOperation(ref op, _)) if op == "%"
    ));
}

#[test]
fn test_if_call_form() {
    assert_eq!(output_of("print(if(1 > 2, 'yes', 'no'));"), "no\n");
    assert_eq!(output_of("print(if(2 > 1, 'yes', 'no'));"), "yes\n");
    assert_eq!(output_of("print(if(0, 'a'));"), "undefined\n");
    assert_eq!(output_of("if(1 > 0, print('then'), print('else'));"), "then\n");
}

#[test]
fn test_only_false_and_zero_select_else() {
    let source = "u = print(); print(if(u, 'then', 'else'), if(0, 'then', 'else'), if(1 > 2, 'then', 'else'));";
    assert_eq!(output_of(source), "then\nelse\nelse\n");
    assert_eq!(output_of("print(if('', 'then', 'else'));"), "then\n");
    assert_eq!(output_of("u = print(); if(u){ print('block'); };"), "block\n");
}

#[test]
fn test_if_block_form() {
    assert_eq!(output_of("x = 5; if(x > 3){ print('big'); };"), "big\n");
    assert_eq!(output_of("x = 5; if(x < 3){ print('small'); };"), "");
    assert_eq!(output_of("x = 5; if(x < 3, print('else')){ print('then'); };"), "else\n");
    // The block form does not rebind `if`.
    assert_eq!(output_of("if(1){ 1; }; print(if(1, 2, 3));"), "2\n");
}

#[test]
fn test_if_is_idempotent() {
    let mut interpreter = interpreter();
    run_source(&mut interpreter, "x = 3;").unwrap();
    let first = run_source(&mut interpreter, "if(x > 1, 'a', 'b');").unwrap();
    let second = run_source(&mut interpreter, "if(x > 1, 'a', 'b');").unwrap();
    assert_eq!(first, Value::string("a"));
    assert_eq!(first, second);
}

#[test]
fn test_if_loop_block_form() {
    let source = "i = 0; ifLoop(i < 3){ print(i); i = i + 1; }; print(i);";
    assert_eq!(output_of(source), "0\n1\n2\n3\n");
}

#[test]
fn test_if_loop_call_form() {
    assert_eq!(output_of("i = 0; ifLoop(i < 2, print(i), i = i + 1);"), "0\n1\n");
    assert_eq!(value_of("ifLoop(0){ 1; };"), Value::Undefined);
}

#[test]
fn test_if_loop_runs_in_callers_scope() {
    let source = "count(n){ i = 0; ifLoop(i < n){ i = i + 1; }; i; }; print(count(4));";
    assert_eq!(output_of(source), "4\n");
}

#[test]
fn test_index_count() {
    assert_eq!(output_of("s = \"hello\"; print(indexCount(s));"), "5\n");
    assert_eq!(output_of("print(indexCount(''));"), "undefined\n");
    assert_eq!(output_of("print(indexCount(searchElements('l', 'hello')));"), "2\n");
}

#[test]
fn test_index_access() {
    let source = "s = 'hello'; print(indexAccess(s, 1), indexAccess(s, 5), indexAccess(s, 0 - 1), indexAccess(s, 1.5));";
    assert_eq!(output_of(source), "e\nundefined\nundefined\nundefined\n");
    assert_eq!(output_of("print(indexAccess(searchIndexes('o', 'foo'), 1));"), "2\n");
}

#[test]
fn test_search_elements() {
    assert_eq!(
        output_of("print(searchElements(\"l+\", \"hello world\"));"),
        "[\"ll\", \"l\"]\n"
    );
    assert_eq!(output_of("print(searchElements('z', 'hello'));"), "undefined\n");
    assert_eq!(output_of("print(searchElements('a'));"), "undefined\n");
}

#[test]
fn test_search_indexes() {
    assert_eq!(output_of("print(searchIndexes('o', 'hello world'));"), "[4, 7]\n");
    assert_eq!(output_of("print(searchIndexes('b', 'äb'));"), "[1]\n");
    assert_eq!(output_of("print(searchIndexes('z', 'hello'));"), "[]\n");
}

#[test]
fn test_invalid_search_pattern() {
    assert!(matches!(
        runtime_error("searchElements('(', 'x');"),
        RuntimeError::InvalidPattern(ref pattern, _) if pattern == "("
    ));
}

#[test]
fn test_builtins_dispatch_by_recorded_name() {
    assert_eq!(output_of("p = print; p('hi');"), "hi\n");
    // A user definition named like a builtin still dispatches to the builtin.
    assert_eq!(output_of("print(x){ 0; }; print('still builtin');"), "still builtin\n");
}
