use formulary::{Compiler, Features, RuntimeError, Value, compile};
use proptest::prelude::*;

/// Compiles `expression` over two integer parameters `a` and `b`.
fn integer_binary(expression: &str, a: i64, b: i64) -> Result<i64, RuntimeError> {
    Compiler::default().compile::<(i64, i64), i64>(expression, &["a", "b"], None)
                       .unwrap()
                       .call((a, b))
}

/// What checked `i64` arithmetic gives, as the evaluator reports it.
fn expected(op: &str, result: Option<i64>, b: i64) -> Result<i64, RuntimeError> {
    if matches!(op, "/" | "%") && b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    result.ok_or_else(|| RuntimeError::Overflow { operator: op.to_string() })
}

proptest! {
    #[test]
    fn integer_arithmetic_matches_checked_i64(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(integer_binary("a + b", a, b), expected("+", a.checked_add(b), b));
        prop_assert_eq!(integer_binary("a - b", a, b), expected("-", a.checked_sub(b), b));
        prop_assert_eq!(integer_binary("a * b", a, b), expected("*", a.checked_mul(b), b));
        prop_assert_eq!(integer_binary("a / b", a, b), expected("/", a.checked_div(b), b));
        prop_assert_eq!(integer_binary("a % b", a, b), expected("%", a.checked_rem(b), b));
    }

    #[test]
    fn small_integer_literals_evaluate_exactly(a in -1_000_000_i64..1_000_000,
                                               b in -1_000_000_i64..1_000_000) {
        let sum = compile::<i64>(&format!("{a} + {b} * 2")).unwrap().call(()).unwrap();
        prop_assert_eq!(sum, a + b * 2);

        let less = compile::<bool>(&format!("{a} < {b}")).unwrap().call(()).unwrap();
        prop_assert_eq!(less, a < b);
    }

    #[test]
    fn float_arithmetic_matches_f64(a in -1.0e6_f64..1.0e6, b in -1.0e6_f64..1.0e6) {
        let compiled = Compiler::default().compile::<(f64, f64), f64>("a * b + a / (b - 3) - b",
                                                                      &["a", "b"],
                                                                      None)
                                          .unwrap();
        let actual = compiled.call((a, b)).unwrap();
        let wanted = a * b + a / (b - 3.0) - b;
        prop_assert!(actual == wanted || (actual.is_nan() && wanted.is_nan()));
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn integers_widen_into_float_arithmetic(a in any::<i64>(), b in -1.0e6_f64..1.0e6) {
        let compiled = Compiler::default().compile::<(i64, f64), f64>("a * b - a / 2.0 + b ^ 2",
                                                                      &["a", "b"],
                                                                      None)
                                          .unwrap();
        let wide = a as f64;
        prop_assert_eq!(compiled.call((a, b)).unwrap(), wide * b - wide / 2.0 + b.powf(2.0));

        let power = Compiler::default().compile::<(i64,), f64>("a ^ 1", &["a"], None).unwrap();
        prop_assert_eq!(power.call((a,)).unwrap(), wide);
    }

    #[test]
    fn concatenation_matches_format(a in any::<i64>(), s in "[a-z ]{0,12}") {
        let compiled = Compiler::default().compile::<(String, i64), String>("s .. a", &["s", "a"], None)
                                          .unwrap();
        prop_assert_eq!(compiled.call((s.clone(), a)).unwrap(), format!("{s}{a}"));
    }

    #[test]
    fn compiling_never_panics(s in ".*") {
        for features in [Features::MINIMAL, Features::COMMON, Features::ALL, Features::COMMON_PATH_IDENTIFIER] {
            if let Ok(compiled) = Compiler::new(features).unwrap().compile::<(), Value>(&s, &[], None) {
                let _ = compiled.call(());
            }
        }
    }

    #[test]
    fn operator_soup_never_panics(s in "[0-9a-c.()+*/%^<>=!&|, -]{0,24}") {
        if let Ok(compiled) = compile::<Value>(&s) {
            let _ = compiled.call(());
        }
    }
}
