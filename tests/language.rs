use std::fs;

use formulary::{Compiler, Error, ErrorKind, Features, Value, compile};
use walkdir::WalkDir;

/// Compiles and runs a parameterless expression, returning its value.
fn evaluate(expression: &str, features: Features) -> Result<Value, Error> {
    let compiled = Compiler::new(features)?.compile::<(), Value>(expression, &[], None)?;
    Ok(compiled.call(())?)
}

/// Renders a result as `type display` or `error kind`, the format used by
/// the case files.
fn describe(result: Result<Value, Error>) -> String {
    match result {
        Ok(value) => format!("{} {value}", value.value_type()),
        Err(e) => format!("error {}", e.kind()),
    }
}

fn assert_value(expression: &str, expected: Value) {
    match evaluate(expression, Features::COMMON) {
        Ok(value) => assert_eq!(value, expected, "{expression}"),
        Err(e) => panic!("Expression {expression:?} failed: {e}"),
    }
}

fn assert_failure(expression: &str) {
    if let Ok(value) = evaluate(expression, Features::COMMON) {
        panic!("Expression {expression:?} produced {value:?} but was expected to fail")
    }
}

#[test]
fn case_files_hold() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/cases").into_iter()
                                   .filter_map(Result::ok)
                                   .filter(|e| e.path().extension().is_some_and(|ext| ext == "expr"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let mut features = Features::COMMON;

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(names) = line.strip_prefix("features:") {
                features = names.parse()
                                .unwrap_or_else(|e| panic!("{path:?}:{}: {e}", i + 1));
                continue;
            }

            let (expression, expected) =
                line.rsplit_once(" => ")
                    .unwrap_or_else(|| panic!("{path:?}:{}: missing ' => '", i + 1));

            count += 1;
            assert_eq!(describe(evaluate(expression, features)),
                       expected,
                       "{path:?}:{}: {expression}",
                       i + 1);
        }
    }

    assert!(count > 0, "No cases found in tests/cases");
}

#[test]
fn associativity() {
    assert_value("2^2^3", Value::Float(256.0));
    assert_value("2-3-4", Value::Integer(-5));
    assert_value("100 / 10 / 5", Value::Integer(2));
}

#[test]
fn integer_regime_is_exact() {
    for (a, b) in [(7_i64, 2_i64), (-7, 2), (7, -3), (123_456, 789), (-1, 1)] {
        assert_value(&format!("{a} + {b}"), Value::Integer(a + b));
        assert_value(&format!("{a} - {b}"), Value::Integer(a - b));
        assert_value(&format!("{a} * {b}"), Value::Integer(a * b));
        assert_value(&format!("{a} / {b}"), Value::Integer(a / b));
        assert_value(&format!("{a} % {b}"), Value::Integer(a % b));
    }
}

#[test]
fn one_float_operand_switches_to_float() {
    assert_value("2 * 3.0", Value::Float(6.0));
    assert_value("2 * 3", Value::Integer(6));
    assert_value("2 ^ 3", Value::Float(8.0));
    assert_value("(2 ^ 3) % 3", Value::Float(2.0));
}

#[test]
fn division_and_modulo_signs() {
    assert_value("-7 / 2", Value::Integer(-3));
    assert_value("-7.0 / 2", Value::Float(-3.5));
    assert_value("-7 % 3", Value::Integer(-1));
    assert_value("7 % -3", Value::Integer(1));
}

#[test]
fn scientific_notation() {
    assert_value("1.6e-2", Value::Float(0.016));
    assert_value("2e3", Value::Float(2000.0));
}

#[test]
fn unary_chains() {
    assert_value("--1", Value::Integer(1));
    assert_value("-+1", Value::Integer(-1));
    assert_value("!!true", Value::Bool(true));
    assert_value("-(1 + 2)", Value::Integer(-3));
}

#[test]
fn string_escaping() {
    assert_value(r#""He said \"Hello\"""#, Value::from("He said \"Hello\""));
    assert_value(r"'it\'s' .. 1", Value::from("it's1"));
    assert_failure(r#""abc"#);
}

#[test]
fn short_circuit_skips_the_right_side() {
    // Without a resolver the right side would fail if it were ever run.
    let compiled =
        Compiler::default().compile::<(bool,), bool>("flag || 1 / 0 == 1", &["flag"], None)
                           .unwrap();
    assert!(compiled.call((true,)).unwrap());
    assert!(compiled.call((false,)).is_err());
}

#[test]
fn parameters_are_typed_by_the_host() {
    // Tuple order follows the names, not their order in the expression.
    let compiled =
        Compiler::default().compile::<(i32, f64, String), String>("name .. ': ' .. (n * rate)",
                                                                   &["n", "rate", "name"],
                                                                   None)
                           .unwrap();
    assert_eq!(compiled.call((3, 1.5, "total".to_string())).unwrap(), "total: 4.5");

    let narrow = Compiler::default().compile::<(i64,), u8>("x * 2", &["x"], None)
                                    .unwrap();
    assert_eq!(narrow.call((100,)).unwrap(), 200);
    assert!(narrow.call((200,)).is_err());
}

#[test]
fn seven_parameters() {
    let compiled = Compiler::default().compile::<(i64, i64, i64, i64, i64, i64, i64), i64>(
        "a + b + c + d + e + f + g",
        &["a", "b", "c", "d", "e", "f", "g"],
        None,
    )
    .unwrap();
    assert_eq!(compiled.call((1, 2, 3, 4, 5, 6, 7)).unwrap(), 28);
}

#[test]
fn result_conversion_is_checked_at_invocation() {
    let exact = compile::<i64>("2.0 * 3").unwrap();
    assert_eq!(exact.call(()).unwrap(), 6);

    let inexact = compile::<i64>("2.5 * 3").unwrap();
    assert!(inexact.call(()).is_err());

    assert!(compile::<bool>("1 + 2").is_err());
}

#[test]
fn compiling_is_idempotent() {
    let first = Compiler::default().compile::<(i64,), i64>("x * x - 1", &["x"], None)
                                   .unwrap();
    let second = Compiler::default().compile::<(i64,), i64>("x * x - 1", &["x"], None)
                                    .unwrap();

    for x in -5..=5 {
        assert_eq!(first.call((x,)).unwrap(), second.call((x,)).unwrap());
    }
}

#[test]
fn compiled_expressions_are_shareable() {
    let compiled = Compiler::default().compile::<(i64,), i64>("x * 3", &["x"], None)
                                      .unwrap();
    let f = compiled.clone().into_fn();

    let handles = (0..4).map(|i| {
                            let f = f.clone();
                            std::thread::spawn(move || f((i,)).unwrap())
                        })
                        .collect::<Vec<_>>();
    let results = handles.into_iter()
                         .map(|h| h.join().unwrap())
                         .collect::<Vec<_>>();

    assert_eq!(results, vec![0, 3, 6, 9]);
    assert_eq!(compiled.call((5,)).unwrap(), 15);
}

#[test]
fn decimal_regime() {
    let compiler = Compiler::new(Features::ALL).unwrap();

    let sum = compiler.compile::<(), rust_decimal::Decimal>("0.1 + 0.2", &[], None)
                      .unwrap();
    assert_eq!(sum.call(()).unwrap().to_string(), "0.3");

    let ints = compiler.compile::<(), Value>("7 / 2", &[], None).unwrap();
    assert_eq!(ints.call(()).unwrap(), Value::Integer(3));
}

#[test]
fn large_integers_widen_into_float_arithmetic() {
    let big = (1_i64 << 53) + 1;
    let nearest = 9_007_199_254_740_992.0;

    assert_value("9007199254740993 ^ 1", Value::Float(nearest));
    assert_value("9007199254740993 * 1.0", Value::Float(nearest));
    assert_value("9007199254740993 == 9007199254740992.0", Value::Bool(true));
    assert_value("9007199254740993 + 1", Value::Integer(big + 1));

    let compiler = Compiler::default();
    let scaled = compiler.compile::<(i64,), f64>("x * 1.0", &["x"], None).unwrap();
    assert_eq!(scaled.call((big,)).unwrap(), nearest);
    assert_eq!(scaled.call((i64::MIN,)).unwrap(), -9_223_372_036_854_775_808.0);

    let squared = compiler.compile::<(i64,), f64>("x ^ 2", &["x"], None).unwrap();
    assert_eq!(squared.call((big,)).unwrap(), nearest * nearest);

    // A declared float result is still a checked conversion.
    let exact = compiler.compile::<(i64,), f64>("x", &["x"], None).unwrap();
    assert_eq!(exact.call((big,)).unwrap_err().kind(), ErrorKind::Conversion);
}

#[test]
fn division_by_zero_is_error() {
    assert_failure("1 / 0");
    assert_failure("1 % 0");
    assert_value("1.0 / 0", Value::Float(f64::INFINITY));
}

#[test]
fn unknown_identifier_is_error() {
    assert_failure("foo == 1");
    assert_failure("max(1, 2)");
}

#[test]
fn shapes_name_their_parameters() {
    use formulary::{CompileError, compiler::Shape};

    struct Discount;

    impl Shape for Discount {
        type Output = f64;
        type Params = (f64, i64);

        const NAMES: &'static [&'static str] = &["price", "percent"];
    }

    struct Broken;

    impl Shape for Broken {
        type Output = bool;
        type Params = (bool,);

        const NAMES: &'static [&'static str] = &["a", "b"];
    }

    let compiler = Compiler::default();
    let discount = compiler.compile_as::<Discount>("price - price * percent / 100", None)
                           .unwrap();
    assert_eq!(discount.call((80.0, 25)).unwrap(), 60.0);

    assert!(matches!(compiler.compile_as::<Broken>("a", None),
                     Err(CompileError::ParameterCountMismatch { expected: 1, found: 2 })));
}
