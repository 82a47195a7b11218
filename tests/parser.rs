use formulary::{
    ast::render,
    compiler::features::Features,
    error::{CompileError, ErrorKind},
    interpreter::{lexer::tokenize, parser::core::parse},
};

fn postfix(expression: &str) -> String {
    let tokens = tokenize(expression, Features::COMMON).unwrap();
    render(&parse(&tokens).unwrap())
}

fn parse_error(expression: &str) -> CompileError {
    let tokens = tokenize(expression, Features::COMMON).unwrap();
    parse(&tokens).unwrap_err()
}

#[test]
fn precedence_climbs() {
    assert_eq!(postfix("1 + 2 * 3"), "1 2 3 * +");
    assert_eq!(postfix("(1 + 2) * 3"), "1 2 + 3 *");
    assert_eq!(postfix("a || b && c"), "a b c && ||");
    assert_eq!(postfix("a == b < c"), "a b c < ==");
    assert_eq!(postfix("'x' .. 1 + 2"), "\"x\" 1 .. 2 +");
    assert_eq!(postfix("1 + 2 * 3 ^ 4 < 5 && b"), "1 2 3 4 ^ * + 5 < b &&");
}

#[test]
fn associativity() {
    assert_eq!(postfix("2 - 3 - 4"), "2 3 - 4 -");
    assert_eq!(postfix("8 / 4 / 2"), "8 4 / 2 /");
    assert_eq!(postfix("2 ^ 2 ^ 3"), "2 2 3 ^ ^");
    assert_eq!(postfix("a .. b .. c"), "a b .. c ..");
}

#[test]
fn prefix_operators_bind_to_the_next_operand() {
    assert_eq!(postfix("-2 ^ 2"), "2 u- 2 ^");
    assert_eq!(postfix("2 ^ -1"), "2 1 u- ^");
    assert_eq!(postfix("-a * b"), "a u- b *");
    assert_eq!(postfix("a * -b"), "a b u- *");
    assert_eq!(postfix("--+1"), "1 u+ u- u-");
    assert_eq!(postfix("!a && !b"), "a u! b u! &&");
    assert_eq!(postfix("-(1 + 2)"), "1 2 + u-");
}

#[test]
fn calls_count_their_arguments() {
    assert_eq!(postfix("f()"), "f:0");
    assert_eq!(postfix("f(1)"), "1 f:1");
    assert_eq!(postfix("f(a, g(b, c), (d))"), "a b c g:2 d f:3");
    assert_eq!(postfix("f(g(h()))"), "h:0 g:1 f:1");
    assert_eq!(postfix("max(a, b * 3) + 1"), "a b 3 * max:2 1 +");
    assert_eq!(postfix("a.b.c(x, 2.5)"), "x 2.5 a.b.c:2");
}

#[test]
fn literals_render() {
    assert_eq!(postfix("2e3 + 1.5"), "2000.0 1.5 +");
    assert_eq!(postfix("true == false"), "true false ==");
    assert_eq!(postfix(r#""a\"b""#), r#""a\"b""#);
}

#[test]
fn misplaced_tokens() {
    assert!(matches!(parse_error("* 2"), CompileError::UnexpectedToken { position: 0, .. }));
    assert!(matches!(parse_error("1 + / 2"), CompileError::UnexpectedToken { position: 4, .. }));
    assert!(matches!(parse_error("(a)(b)"), CompileError::UnexpectedToken { position: 3, .. }));
    assert!(matches!(parse_error("(1 +)"), CompileError::UnexpectedToken { position: 4, .. }));
    assert!(matches!(parse_error("()"), CompileError::UnexpectedToken { position: 1, .. }));
    assert!(matches!(parse_error("f(1,,2)"), CompileError::EmptyArgument { position: 4, .. }));
    assert!(matches!(parse_error("f(,1)"), CompileError::EmptyArgument { position: 2, .. }));
    assert!(matches!(parse_error("f(a, (b, c))"), CompileError::MisplacedComma { position: 7 }));
    assert_eq!(parse_error("f(1"), CompileError::UnclosedParen { position: 1 });
    assert_eq!(parse_error(")"), CompileError::UnmatchedRightParen { position: 0 });
}

#[test]
fn every_parse_error_is_a_grammar_error() {
    for bad in ["", "1 +", "* 2", "(", ")", "1 2 (", "f(,)", "a, b", "((1)", "1 + (2 * 3))"] {
        let tokens = tokenize(bad, Features::COMMON).unwrap();
        let error = parse(&tokens).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Grammar, "{bad:?}: {error}");
    }
}
