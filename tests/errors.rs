use formulary::{
    CompileError, Compiler, Error, ErrorKind, Features, RuntimeError, Value, ValueType, compile,
};

fn compile_error(expression: &str) -> CompileError {
    match compile::<Value>(expression) {
        Ok(compiled) => panic!("{expression:?} compiled to {:?}", compiled.tree()),
        Err(e) => e,
    }
}

#[test]
fn lexical_errors_carry_positions() {
    assert_eq!(compile_error("1 + @"),
               CompileError::UnexpectedCharacter { character: '@',
                                                   position:  4, });
    assert_eq!(compile_error("  \"open"), CompileError::UnterminatedString { position: 2 });
    assert!(matches!(compile_error("1 + 1.2.3"),
                     CompileError::MalformedNumber { position: 4, .. }));
    assert!(matches!(compile_error("a.1"), CompileError::MalformedPath { position: 0, .. }));

    let result = Compiler::new(Features::MINIMAL).unwrap()
                                                 .compile::<(), f64>("a && b", &[], None);
    assert!(matches!(result,
                     Err(CompileError::FeatureDisabled { feature: Features::BOOLEAN,
                                                         position: 2,
                                                         .. })));
}

#[test]
fn grammar_errors_carry_positions() {
    assert_eq!(compile_error("(1 + 2"), CompileError::UnclosedParen { position: 0 });
    assert_eq!(compile_error("1 + 2)"), CompileError::UnmatchedRightParen { position: 5 });
    assert_eq!(compile_error("1, 2"), CompileError::MisplacedComma { position: 1 });
    assert_eq!(compile_error("f(1, )"),
               CompileError::EmptyArgument { function: "f".to_string(),
                                             position: 5, });
    assert_eq!(compile_error("2 (3)"),
               CompileError::UnexpectedToken { token:    "'('".to_string(),
                                               position: 2, });
    assert_eq!(compile_error(""), CompileError::UnexpectedEndOfInput);
    assert_eq!(compile_error("1 +"), CompileError::UnexpectedEndOfInput);
}

#[test]
fn type_errors_are_grammar_errors() {
    assert_eq!(compile_error("true + 1"),
               CompileError::InvalidOperand { operator: "+".to_string(),
                                              found:    ValueType::Bool, });
    assert_eq!(compile_error("!'yes'"),
               CompileError::InvalidOperand { operator: "!".to_string(),
                                              found:    ValueType::String, });

    let result = compile::<bool>("'text'");
    assert!(matches!(result,
                     Err(CompileError::IncompatibleResult { found:    ValueType::String,
                                                            expected: ValueType::Bool, })));
}

#[test]
fn resolution_errors() {
    assert_eq!(compile_error("speed * 2"),
               CompileError::UnknownIdentifier { name: "speed".to_string() });
    assert_eq!(compile_error("max(1, 2)"),
               CompileError::MissingResolver { function: "max".to_string() });
    assert_eq!(compile_error("max(1, 2)").kind(), ErrorKind::Resolution);
}

#[test]
fn configuration_errors() {
    assert!(matches!(Compiler::new(Features::MEMBER | Features::PATH_IDENTIFIER),
                     Err(CompileError::ConflictingFeatures { .. })));

    let compiler = Compiler::default();

    let result = compiler.compile::<(i64, i64), i64>("x", &["x"], None);
    assert!(matches!(result,
                     Err(CompileError::ParameterCountMismatch { expected: 2, found: 1 })));

    let result = compiler.compile::<(i64, i64, i64), i64>("a", &["a", "b c", "1d"], None);
    assert!(matches!(result,
                     Err(CompileError::InvalidParameterNames { ref names }) if names == "b c, 1d"));

    let result =
        compiler.compile::<(i64, i64, i64, i64), i64>("_x", &["_x", "x1", "a-b", "é"], None);
    assert!(matches!(result,
                     Err(CompileError::InvalidParameterNames { ref names }) if names == "a-b, é"));

    let result = compiler.compile::<(i64, i64, i64), i64>("a", &["a", "b", "a"], None);
    assert!(matches!(result,
                     Err(CompileError::DuplicateParameterNames { ref names }) if names == "a"));

    // Parameter declarations are checked before the expression is read.
    let result = compiler.compile::<(i64,), i64>("1 +", &[""], None);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
}

#[test]
fn runtime_errors_by_kind() {
    let compiler = Compiler::default();

    let add = compiler.compile::<(i64, i64), i64>("x + y", &["x", "y"], None)
                      .unwrap();
    assert_eq!(add.call((i64::MAX, 1)).unwrap_err(),
               RuntimeError::Overflow { operator: "+".to_string() });
    assert_eq!(add.call((1, 2)).unwrap(), 3);

    let div = compiler.compile::<(i64, i64), i64>("x / y", &["x", "y"], None)
                      .unwrap();
    assert_eq!(div.call((1, 0)).unwrap_err(), RuntimeError::DivisionByZero);
    assert_eq!(div.call((i64::MIN, -1)).unwrap_err().kind(), ErrorKind::Arithmetic);

    let neg = compiler.compile::<(i64,), i64>("-x", &["x"], None).unwrap();
    assert_eq!(neg.call((i64::MIN,)).unwrap_err(),
               RuntimeError::Overflow { operator: "-".to_string() });

    let narrow = compiler.compile::<(i64,), i32>("x", &["x"], None).unwrap();
    assert_eq!(narrow.call((i64::MAX,)).unwrap_err().kind(), ErrorKind::Conversion);

    let dynamic = compiler.compile::<(Value,), bool>("!v", &["v"], None).unwrap();
    assert!(dynamic.call((Value::Bool(false),)).unwrap());
    assert_eq!(dynamic.call((Value::Integer(1),)).unwrap_err().kind(),
               ErrorKind::Conversion);
}

#[test]
fn messages_name_the_problem() {
    assert_eq!(compile_error("1 + @").to_string(),
               "error at position 4: unexpected character '@'");
    assert_eq!(compile_error("(1").to_string(),
               "error at position 0: '(' is never closed");
    assert_eq!(RuntimeError::DivisionByZero.to_string(), "division by zero");
}

#[test]
fn error_wraps_both_phases() {
    fn evaluate(expression: &str) -> Result<i64, Error> {
        Ok(compile::<i64>(expression)?.call(())?)
    }

    assert_eq!(evaluate("6 * 7").unwrap(), 42);
    assert!(matches!(evaluate("6 *"), Err(Error::Compile(_))));
    assert!(matches!(evaluate("6 / 0"), Err(Error::Runtime(RuntimeError::DivisionByZero))));
    assert_eq!(evaluate("6 / 0").unwrap_err().kind(), ErrorKind::Arithmetic);
    assert_eq!(evaluate("6 +").unwrap_err().to_string(), "unexpected end of expression");
}

#[test]
fn features_parse_and_display() {
    assert_eq!(Features::COMMON.to_string(), "Integer | Boolean | String | Member");
    assert_eq!(Features::MINIMAL.to_string(), "Minimal");
    assert_eq!("Integer | Boolean | String | Member".parse::<Features>().unwrap(),
               Features::COMMON);
    assert_eq!("minimal".parse::<Features>().unwrap(), Features::MINIMAL);
    assert_eq!("".parse::<Features>().unwrap(), Features::MINIMAL);
    assert_eq!("commonPathIdentifier".parse::<Features>().unwrap(),
               Features::COMMON_PATH_IDENTIFIER);
    assert_eq!("integer, decimal".parse::<Features>().unwrap(),
               Features::INTEGER | Features::DECIMAL);

    let error = "Integer + Fast".parse::<Features>().unwrap_err();
    assert_eq!(error, CompileError::UnknownFeature { name: "Fast".to_string() });
    assert_eq!(error.kind(), ErrorKind::Configuration);

    assert!(Features::ALL.contains(Features::DECIMAL));
    assert!(!Features::COMMON.contains(Features::DECIMAL));
    assert!(!Features::COMMON.contains(Features::PATH_IDENTIFIER));
    assert!(Features::COMMON_PATH_IDENTIFIER.contains(Features::PATH_IDENTIFIER));
    assert!(!Features::COMMON_PATH_IDENTIFIER.contains(Features::MEMBER));
}
