//! Unit tests for the evaluator module.

use std::{collections::BTreeMap, fs, io::Cursor, path::Path};

use num_bigint::BigInt;

use crate::{
    ast::types::{DataType, Operator},
    errors::runtime::RuntimeError,
    parser::context::ParseContext,
};

use super::{evaluator::Evaluator, operators::apply_operator, scope::ScopeArena, value::Value};

fn evaluate_with_input(source: &str, input: &str) -> Result<String, RuntimeError> {
    let mut context = ParseContext::from_source(Path::new("/virtual/main.etch"), source).unwrap();
    let entry = context.entry_path().to_path_buf();

    let mut output = Vec::new();
    let mut input = Cursor::new(input.as_bytes().to_vec());
    Evaluator::new(&mut context.graph, &mut output, &mut input).evaluate_module(&entry)?;

    Ok(String::from_utf8(output).unwrap())
}

/// Runs `source` and reports how many scopes are still held afterwards.
fn scopes_left(source: &str) -> (usize, usize) {
    let mut context = ParseContext::from_source(Path::new("/virtual/main.etch"), source).unwrap();
    let entry = context.entry_path().to_path_buf();

    let mut output = Vec::new();
    let mut input = Cursor::new(Vec::new());
    let mut evaluator = Evaluator::new(&mut context.graph, &mut output, &mut input);
    evaluator.evaluate_module(&entry).unwrap();

    let held = evaluator.scopes.len();
    evaluator.scopes.collect();
    (held, evaluator.scopes.len())
}

fn evaluate(source: &str) -> Result<String, RuntimeError> {
    evaluate_with_input(source, "")
}

fn output_of(source: &str) -> String {
    match evaluate(source) {
        Ok(output) => output,
        Err(error) => panic!("evaluation failed: {}", error),
    }
}

fn int(value: i64) -> Value {
    Value::Integer(BigInt::from(value))
}

#[test]
fn test_declared_num_widens_and_prints_six_digits() {
    assert_eq!(output_of("var (num) x = 3; etch x + 2;"), "5.000000\n");
}

#[test]
fn test_precedence_after_rotation() {
    assert_eq!(output_of("etch 2 + 3 * 4 - 10 / 2;"), "9\n");
    assert_eq!(output_of("etch 1 - 2 - 3 - 4;"), "-8\n");
    assert_eq!(output_of("etch 100 / 10 / 5;"), "2\n");
    assert_eq!(output_of("etch 2 * (3 + 4) % 5;"), "4\n");
}

#[test]
fn test_mixed_number_kinds() {
    assert_eq!(output_of("etch 1 + 0.5;"), "1.500000\n");
    assert_eq!(output_of("etch 7 / 2, 7.0 / 2;"), "3 3.500000\n");
}

#[test]
fn test_arbitrary_precision_integers() {
    assert_eq!(output_of("etch 9999999999999999999 + 1;"), "10000000000000000000\n");
    assert_eq!(output_of("etch 99999999999 * 99999999999;"), "9999999999800000000001\n");
}

#[test]
fn test_division_by_zero_is_an_error() {
    assert_eq!(
        evaluate("etch 5 % 0;"),
        Err(RuntimeError::DivisionByZero {
            operator: String::from("%")
        })
    );
    assert!(matches!(evaluate("etch 1.0 / 0.0;"), Err(RuntimeError::DivisionByZero { .. })));
    assert!(matches!(evaluate("etch 4 / 0;"), Err(RuntimeError::DivisionByZero { .. })));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(output_of("etch \"a\" + 1.5, 2 + \"b\", \"c\" + \"d\";"), "a1.500000 2b cd\n");
    assert!(matches!(evaluate("etch \"a\" + true;"), Err(RuntimeError::UnsupportedOperation { .. })));
}

#[test]
fn test_comparisons() {
    assert_eq!(
        output_of("etch 1 < 2, 2.5 >= 3, 1 < 1.5, \"a\" == \"a\", true != false;"),
        "true false true true true\n"
    );
    assert!(matches!(evaluate("etch 1 == \"1\";"), Err(RuntimeError::UnsupportedOperation { .. })));
    assert!(matches!(evaluate("etch \"a\" < \"b\";"), Err(RuntimeError::UnsupportedOperation { .. })));
}

#[test]
fn test_indexing() {
    assert_eq!(output_of("var (arr) a = [1, 2, 3]; etch a@1;"), "2\n");
    assert_eq!(output_of("etch \"hey\" @ 2;"), "y\n");
    assert_eq!(
        evaluate("var (arr) a = [1, 2, 3]; etch a@3;"),
        Err(RuntimeError::IndexOutOfRange {
            index: String::from("3"),
            length: 3
        })
    );
    assert!(matches!(evaluate("etch [1] @ -1;"), Err(RuntimeError::IndexOutOfRange { .. })));
}

#[test]
fn test_ranges() {
    assert_eq!(output_of("etch 1..5, 5..1, 3..3;"), "[1, 2, 3, 4] [5, 4, 3, 2] [3]\n");
    assert!(matches!(evaluate("etch 1.0..3;"), Err(RuntimeError::UnsupportedOperation { .. })));
}

#[test]
fn test_shadowing_and_outer_assignment() {
    let source = "
        var (num) x = 1;
        { var (num) x = 2; etch x; }
        etch x;
        { x = 3; }
        etch x;
    ";
    assert_eq!(output_of(source), "2.000000\n1.000000\n3.000000\n");
}

#[test]
fn test_redeclaration_in_same_scope() {
    assert_eq!(
        evaluate("var (int) x = 1; var (int) x = 2;"),
        Err(RuntimeError::AlreadyDeclared {
            name: String::from("x")
        })
    );
}

#[test]
fn test_unbound_names() {
    assert_eq!(output_of("etch missing;"), "nil\n");
    assert_eq!(
        evaluate("y = 1;"),
        Err(RuntimeError::UndeclaredVariable {
            name: String::from("y")
        })
    );
    assert!(matches!(evaluate("z += 1;"), Err(RuntimeError::UndeclaredVariable { .. })));
}

#[test]
fn test_compound_assignment() {
    assert_eq!(output_of("var (int) n = 10; n += 5; n -= 1; n *= 2; n %= 5; etch n;"), "3\n");
    assert_eq!(output_of("var (num) n = 1; n /= 4; etch n;"), "0.250000\n");
}

#[test]
fn test_closures_see_defining_scope() {
    let source = "
        var (num) x = 1;
        func (num) getX() { return x; }
        func (num) callIt() { var (num) x = 99; return getX(); }
        etch callIt();
        x = 5;
        etch getX();
    ";
    assert_eq!(output_of(source), "1.000000\n5.000000\n");
}

#[test]
fn test_closure_keeps_private_state() {
    let source = "
        func (func) counter() {
            var (int) count = 0;
            return func (int) () { count += 1; return count; };
        }
        var (func) next = counter();
        var (func) other = counter();
        next();
        etch next(), other();
    ";
    assert_eq!(output_of(source), "2 1\n");
}

#[test]
fn test_recursion() {
    let source = "
        func (int) fact(int n) {
            if n <= 1 { return 1; }
            return n * fact(n - 1);
        }
        etch fact(20);
    ";
    assert_eq!(output_of(source), "2432902008176640000\n");
}

#[test]
fn test_return_unwinds_loops() {
    let source = "
        func (int) find(arr xs, int target) {
            for x in xs {
                if x == target { return x * 10; }
            }
            return 0;
        }
        func (int) firstOver(int limit) {
            var (int) i = 0;
            while true { i += 1; if i > limit { return i; } }
        }
        etch find([1, 2, 3], 2), find([1], 5), firstOver(3);
    ";
    assert_eq!(output_of(source), "20 0 4\n");
}

#[test]
fn test_void_function_returns_nil() {
    assert_eq!(output_of("func (void) f() { etch \"in f\"; } etch f();"), "in f\nnil\n");
}

#[test]
fn test_while_shares_one_scope_across_iterations() {
    assert_eq!(
        evaluate("var (int) i = 0; while i < 2 var (int) n = 1;"),
        Err(RuntimeError::AlreadyDeclared {
            name: String::from("n")
        })
    );
    assert_eq!(
        output_of("var (int) i = 0; while i < 2 { var (int) n = i; i += 1; etch n; }"),
        "0\n1\n"
    );
}

#[test]
fn test_for_uses_fresh_scope_per_iteration() {
    assert_eq!(output_of("for x in [1, 2] var (int) n = x; etch \"done\";"), "done\n");
}

#[test]
fn test_conditions_must_be_boolean() {
    assert!(matches!(evaluate("if 1 { }"), Err(RuntimeError::NonBooleanCondition { .. })));
    assert_eq!(
        evaluate("var (bool) go = true; while go { go = 1; }"),
        Err(RuntimeError::NonBooleanCondition {
            statement: String::from("while"),
            received: String::from("int")
        })
    );
}

#[test]
fn test_else_if_chain() {
    let source = "
        func (str) size(int n) {
            if n < 10 { return \"small\"; } else if n < 100 { return \"medium\"; } else return \"large\";
        }
        etch size(1), size(50), size(500);
    ";
    assert_eq!(output_of(source), "small medium large\n");
}

#[test]
fn test_for_over_string_with_step() {
    assert_eq!(output_of("for c in \"abcdef\" step 2 { etch c; }"), "a\nc\ne\n");
    assert!(matches!(evaluate("for x in 3 { }"), Err(RuntimeError::NotIterable { .. })));
}

#[test]
fn test_object_fields() {
    let source = "
        var (obj) point = { x: 1, y: 2 };
        etch point.x, point.z;
        point.x = 10;
        var (obj) alias = point;
        etch alias.x;
        etch point;
    ";
    assert_eq!(output_of(source), "1 nil\n10\n{x: 10, y: 2}\n");
}

#[test]
fn test_object_calls_and_chains() {
    let source = "
        var (obj) greeter = { name: \"etch\", greet: func (str) (str who) { return \"hi \" + who; } };
        etch greeter.greet(greeter.name);
        etch greeter.greet(name);
        var (obj) outer = { inner: { value: 7 } };
        etch outer.inner.value;
    ";
    assert_eq!(output_of(source), "hi etch\nhi etch\n7\n");
}

#[test]
fn test_object_projection_writes_back() {
    assert_eq!(output_of("var (obj) counter = { n: 1 }; counter.(n += 1); etch counter.n;"), "2\n");
}

#[test]
fn test_string_intrinsics() {
    let source = "
        var (str) s = \"Hello\";
        etch s.length, s.toUpperCase(), s.toLowerCase(), s.substr(1, 3), s.substr(3);
        etch s.toArray();
    ";
    assert_eq!(output_of(source), "5 HELLO hello el lo\n[H, e, l, l, o]\n");
    assert!(matches!(
        evaluate("etch \"abc\".substr(2, 9);"),
        Err(RuntimeError::IndexOutOfRange { .. })
    ));
    assert!(matches!(evaluate("etch \"abc\".reverse();"), Err(RuntimeError::UnknownMember { .. })));
}

#[test]
fn test_array_intrinsics() {
    let source = "
        var (arr) xs = [1, 2, 3, 4];
        etch xs.length, xs.slice(1, 3), xs.slice(2);
        etch xs.map(func (int) (int x) { return x * x; });
        etch xs.map(func (num) (int x, num i, int n) { return i / n; });
        xs.forEach(func (void) (int x) { etch x; });
    ";
    assert_eq!(
        output_of(source),
        "4 [2, 3] [3, 4]\n[1, 4, 9, 16]\n[0.000000, 0.250000, 0.500000, 0.750000]\n1\n2\n3\n4\n"
    );
}

#[test]
fn test_map_requires_a_return_type() {
    assert_eq!(
        evaluate("etch [1].map(func (void) (int x) { });"),
        Err(RuntimeError::VoidCallback {
            method: String::from("map")
        })
    );
}

#[test]
fn test_builtins() {
    assert_eq!(output_of("etch len(\"héllo\"), len([1, 2]), int(3.9), int(-3.9), int(4);"), "5 2 3 -3 4\n");
    assert!(matches!(evaluate("etch len(1);"), Err(RuntimeError::InvalidArgument { .. })));
    assert!(matches!(evaluate("etch len();"), Err(RuntimeError::ArityMismatch { .. })));
}

#[test]
fn test_call_errors() {
    assert!(matches!(
        evaluate("func (int) f(int a) { return a; } f(1, 2);"),
        Err(RuntimeError::ArityMismatch { expected: 1, received: 2, .. })
    ));
    assert!(matches!(evaluate("var (int) x = 1; x();"), Err(RuntimeError::NotCallable { .. })));
    assert_eq!(
        evaluate("func (int) f(int a) { return a; } f(\"s\");"),
        Err(RuntimeError::TypeMismatch {
            expected: String::from("int"),
            received: String::from("str")
        })
    );
}

#[test]
fn test_runtime_coercion() {
    assert_eq!(output_of("func (num) half(num x) { return x / 2; } etch half(3);"), "1.500000\n");
    assert!(matches!(evaluate("var (int) x = \"a\" + \"b\";"), Err(RuntimeError::TypeMismatch { .. })));
}

#[test]
fn test_read_binds_a_line() {
    assert_eq!(
        evaluate_with_input("read name, \"name? \"; etch \"hi \" + name;", "Ada\r\nrest\n").unwrap(),
        "name? hi Ada\n"
    );
    assert!(matches!(evaluate("read x;"), Err(RuntimeError::Input { .. })));
}

#[test]
fn test_top_level_return_stops_module() {
    assert_eq!(output_of("etch 1; return; etch 2;"), "1\n");
}

#[test]
fn test_module_statements_only_at_top_level() {
    assert_eq!(
        evaluate("{ export 1 as x; }"),
        Err(RuntimeError::MisplacedModuleStatement {
            statement: String::from("export")
        })
    );
}

#[test]
fn test_error_statement_is_not_evaluated() {
    assert_eq!(evaluate("etch 1; var (num) = ;"), Err(RuntimeError::UnparsedStatement));
}

#[test]
fn test_imported_closure_keeps_its_module_scope() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lib.etch"),
        "etch \"lib loaded\";\nvar (int) base = 10;\nexport func (int) addBase(int n) { return base + n; }",
    )
    .unwrap();
    fs::write(dir.path().join("mid.etch"), "import addBase from \"./lib\";\nexport addBase(1) as eleven;").unwrap();
    fs::write(
        dir.path().join("main.etch"),
        "import addBase from \"./lib\";\nimport eleven from \"./mid\";\netch addBase(5), eleven;",
    )
    .unwrap();

    let mut context = ParseContext::load(&dir.path().join("main.etch")).unwrap();
    assert!(!context.has_errors(), "{}", context.render_diagnostics());
    let entry = context.entry_path().to_path_buf();

    let mut output = Vec::new();
    let mut input = Cursor::new(Vec::new());
    Evaluator::new(&mut context.graph, &mut output, &mut input)
        .evaluate_module(&entry)
        .unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), "lib loaded\n15 11\n");
}

#[test]
fn test_scope_chain_operations() {
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let child = scopes.child(root);

    scopes.define(root, "x", int(1));
    assert_eq!(scopes.get(child, "x"), Some(&int(1)));
    assert!(!scopes.has_local(child, "x"));

    assert!(scopes.assign(child, "x", int(2)));
    assert_eq!(scopes.get(root, "x"), Some(&int(2)));
    assert!(!scopes.assign(child, "y", int(3)));

    scopes.set(child, "y", int(3));
    assert!(scopes.has_local(child, "y"));
    assert_eq!(scopes.get(root, "y"), None);

    assert!(scopes.declare(child, "y", int(4)).is_err());
    assert!(scopes.declare(child, "x", int(4)).is_ok());
    assert_eq!(scopes.get(root, "x"), Some(&int(2)));
}

#[test]
fn test_scope_release_frees_and_reuses_slots() {
    let mut scopes = ScopeArena::new();
    let root = scopes.root();

    let block = scopes.child(root);
    scopes.release(block);
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes.child(root), block);
    scopes.release(block);

    let captured = scopes.child(root);
    let handle = scopes.capture(captured);
    scopes.release(captured);
    assert_eq!(scopes.len(), 2);

    let above = scopes.child(root);
    drop(handle);
    scopes.collect();
    assert_eq!(scopes.len(), 2);

    let reused = scopes.child(above);
    assert_eq!(reused, captured);
    scopes.release(reused);
    scopes.release(above);
    assert_eq!(scopes.len(), 1);

    scopes.release(root);
    scopes.collect();
    assert_eq!(scopes.len(), 1);
}

#[test]
fn test_captured_scope_keeps_its_parents() {
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let outer = scopes.child(root);
    scopes.define(outer, "x", int(1));
    let inner = scopes.child(outer);

    let handle = scopes.capture(inner);
    assert_eq!(scopes.capture(inner), handle);
    scopes.release(inner);
    scopes.release(outer);
    scopes.collect();

    assert_eq!(scopes.len(), 3);
    assert_eq!(scopes.get(handle.id(), "x"), Some(&int(1)));

    drop(handle);
    scopes.collect();
    assert_eq!(scopes.len(), 1);
}

#[test]
fn test_return_values_move_between_scopes() {
    let mut scopes = ScopeArena::new();
    let root = scopes.root();

    assert!(!scopes.is_returning(root));
    scopes.set_return(root, Value::Absent);
    assert!(scopes.is_returning(root));
    assert_eq!(scopes.take_return(root), Some(Value::Absent));
    assert!(!scopes.is_returning(root));
}

#[test]
fn test_value_coercion() {
    assert_eq!(int(3).coerce(DataType::Num), Ok(Value::Number(3.0)));
    assert_eq!(Value::Absent.coerce(DataType::Str), Ok(Value::Absent));
    assert_eq!(
        Value::Boolean(true).coerce(DataType::Int),
        Err(RuntimeError::TypeMismatch {
            expected: String::from("int"),
            received: String::from("bool")
        })
    );
}

#[test]
fn test_value_display() {
    let mut fields = BTreeMap::new();
    fields.insert(String::from("b"), Value::String(String::from("two")));
    fields.insert(String::from("a"), Value::Array(vec![int(1), Value::Boolean(false)]));

    assert_eq!(Value::object(fields).to_string(), "{a: [1, false], b: two}");
    assert_eq!(Value::Number(-0.5).to_string(), "-0.500000");
    assert_eq!(Value::Absent.to_string(), "nil");
    assert_eq!(output_of("func (num) f() { return 1; } etch f;"), "func (num) f\n");
}

#[test]
fn test_apply_operator_directly() {
    assert_eq!(apply_operator(Operator::Range, int(-1), int(2)), Ok(Value::Array(vec![int(-1), int(0), int(1)])));
    assert_eq!(apply_operator(Operator::Modulo, int(-7), int(3)), Ok(int(-1)));
    assert_eq!(apply_operator(Operator::LessEquals, int(2), Value::Number(2.0)), Ok(Value::Boolean(true)));
    assert!(apply_operator(Operator::Member, int(1), int(2)).is_err());
}

#[test]
fn test_closures_built_in_a_loop_are_freed() {
    let (held, after_collect) = scopes_left(
        "for i in 0..2000 { var (func) f = func (int) (int x) { return x; }; f(i); }",
    );
    assert!(held < 100, "{} scopes held", held);
    assert_eq!(after_collect, 1);
}

#[test]
fn test_helper_closures_inside_calls_are_freed() {
    let (held, after_collect) = scopes_left(
        "
        var (func) helper = func (int) (int x) {
            var (func) inner = func (int) (int y) { return y + 1; };
            return inner(x);
        };
        for i in 0..2000 { helper(i); }
        ",
    );
    assert!(held < 100, "{} scopes held", held);
    assert_eq!(after_collect, 1);
}

#[test]
fn test_escaped_closure_survives_collection() {
    let source = "
        var (func) make = func (func) (int n) { return func (int) () { return n; }; };
        var (func) keep = make(7);
        for i in 0..500 { var (func) g = make(i); g(); }
        etch keep();
    ";
    assert_eq!(output_of(source), "7\n");

    let (_, after_collect) = scopes_left(source);
    assert!(after_collect > 1);
}

#[test]
fn test_object_literal_is_rebuilt_on_each_evaluation() {
    let source = "
        var (func) mk = func (obj) (int v) { return { a: v }; };
        etch mk(1).a, mk(2).a;
    ";
    assert_eq!(output_of(source), "1 2\n");
}
