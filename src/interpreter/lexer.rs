use std::fmt;

use logos::{Lexer, Logos};

use crate::{ast::Operator, compiler::features::Features, error::CompileError};

/// Represents a lexical token of an expression.
///
/// Tokens are produced left to right together with the character offset
/// where they start in the expression text the host passed in.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer literal such as `42`.
    Integer(i64),
    /// Floating-point literal such as `3.14`, `2e3` or `1.6e-2`.
    Float(f64),
    /// `true` or `false`.
    Bool(bool),
    /// String literal with escapes already processed.
    Str(String),
    /// Operator symbol; whether it is prefix or infix is decided by the
    /// parser.
    Operator(&'static str),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// Plain or dotted identifier such as `x` or `player.health`.
    Identifier(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "number {i}"),
            Self::Float(r) => write!(f, "number {r}"),
            Self::Bool(b) => write!(f, "literal {b}"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Operator(symbol) => write!(f, "operator '{symbol}'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::Comma => write!(f, "','"),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
        }
    }
}

/// State carried by the scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexerExtras {
    /// The features of the compiler driving the scan.
    pub features: Features,
}

/// Why a lexeme could not be scanned. Offsets are relative to the start of
/// the lexeme.
#[derive(Debug, Clone, PartialEq, Default)]
enum LexFault {
    #[default]
    Unrecognized,
    MalformedNumber(String),
    UnterminatedString,
    InvalidEscape { sequence: char, offset: usize },
    MalformedPath(String),
    MemberDisabled { offset: usize },
}

/// A numeric literal, classified by the scanner.
#[derive(Debug, Clone, PartialEq)]
enum Number {
    Integer(i64),
    Float(f64),
}

/// A word: either a boolean keyword or an identifier.
#[derive(Debug, Clone, PartialEq)]
enum Word {
    Bool(bool),
    Identifier(String),
}

/// Raw lexemes recognised over whitespace-free text.
///
/// Numbers, strings and identifiers match only their first character here;
/// their callbacks scan the rest by hand.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = LexerExtras)]
#[logos(error = LexFault)]
enum Lexeme {
    #[regex(r"[0-9]", scan_number)]
    Number(Number),
    #[token("\"", scan_string)]
    #[token("'", scan_string)]
    Str(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", scan_word)]
    Word(Word),
    #[token("||", symbol)]
    #[token("&&", symbol)]
    #[token("==", symbol)]
    #[token("!=", symbol)]
    #[token(">=", symbol)]
    #[token("<=", symbol)]
    #[token(">", symbol)]
    #[token("<", symbol)]
    #[token("..", symbol)]
    #[token("+", symbol)]
    #[token("-", symbol)]
    #[token("*", symbol)]
    #[token("/", symbol)]
    #[token("%", symbol)]
    #[token("^", symbol)]
    #[token("!", symbol)]
    Symbol(&'static str),
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

/// The scan states of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    /// Digits only.
    Integer,
    /// Digits followed by `.`; needs a digit next.
    Point,
    /// Digits with a fraction.
    Fraction,
    /// After `e`/`E` and an optional sign; needs a digit next.
    Exponent,
    /// Digits of the exponent.
    Science,
}

/// Scans the remainder of a numeric literal whose first digit was matched.
///
/// A `.` is accepted once, only before any exponent, and never when it starts
/// the `..` operator. The literal is classified as an integer if it has
/// neither fraction nor exponent and the Integer feature is on.
fn scan_number(lex: &mut Lexer<Lexeme>) -> Result<Number, LexFault> {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let malformed = |len: usize| {
        let end = rest[len..].chars().next().map_or(len, |c| len + c.len_utf8());
        LexFault::MalformedNumber(format!("{}{}", lex.slice(), &rest[..end]))
    };

    let mut state = NumberState::Integer;
    let mut len = 0;
    while let Some(&byte) = bytes.get(len) {
        state = match (state, byte) {
            (NumberState::Integer, b'0'..=b'9') => NumberState::Integer,
            (NumberState::Point | NumberState::Fraction, b'0'..=b'9') => NumberState::Fraction,
            (NumberState::Exponent | NumberState::Science, b'0'..=b'9') => NumberState::Science,
            (_, b'.') if bytes.get(len + 1) == Some(&b'.') => break,
            (NumberState::Integer, b'.') => NumberState::Point,
            (NumberState::Integer | NumberState::Fraction, b'e' | b'E') => {
                if matches!(bytes.get(len + 1), Some(b'+' | b'-')) {
                    len += 1;
                }
                NumberState::Exponent
            },
            (NumberState::Point | NumberState::Exponent, _) | (_, b'.') => {
                return Err(malformed(len));
            },
            _ => break,
        };
        len += 1;
    }

    if matches!(state, NumberState::Point | NumberState::Exponent) {
        return Err(malformed(len));
    }

    let text = format!("{}{}", lex.slice(), &rest[..len]);
    let features = lex.extras.features;
    lex.bump(len);

    if state == NumberState::Integer && features.contains(Features::INTEGER) {
        return text.parse()
                   .map(Number::Integer)
                   .map_err(|_| LexFault::MalformedNumber(text));
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Number::Float(value)),
        _ => Err(LexFault::MalformedNumber(text)),
    }
}

/// Scans a string literal up to its closing quote, processing escapes.
fn scan_string(lex: &mut Lexer<Lexeme>) -> Result<String, LexFault> {
    let quote = if lex.slice() == "'" { '\'' } else { '"' };
    let rest = lex.remainder();

    let mut text = String::new();
    let mut chars = rest.char_indices();
    let mut end = None;
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                let unescaped = match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '\\' => '\\',
                    q if q == quote => q,
                    other => {
                        return Err(LexFault::InvalidEscape { sequence: other,
                                                             offset:   offset + 1, });
                    },
                };
                text.push(unescaped);
            },
            c if c == quote => {
                end = Some(offset + 1);
                break;
            },
            c => text.push(c),
        }
    }

    let len = end.ok_or(LexFault::UnterminatedString)?;
    lex.bump(len);
    Ok(text)
}

/// Scans an identifier, its dotted continuation and boolean keywords.
///
/// A `..` never continues a path; it is the concatenation operator.
fn scan_word(lex: &mut Lexer<Lexeme>) -> Result<Word, LexFault> {
    let features = lex.extras.features;
    let head = lex.slice();

    if features.contains(Features::BOOLEAN) {
        match head {
            "true" => return Ok(Word::Bool(true)),
            "false" => return Ok(Word::Bool(false)),
            _ => {},
        }
    }

    let dotted = features.intersects(Features::MEMBER | Features::PATH_IDENTIFIER);
    let rest = lex.remainder();
    let bytes = rest.as_bytes();

    let mut len = 0;
    while bytes.get(len) == Some(&b'.') && bytes.get(len + 1) != Some(&b'.') {
        if !dotted {
            return Err(LexFault::MemberDisabled { offset: head.len() + len });
        }

        let starts_segment = bytes.get(len + 1)
                                  .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_');
        let segment = bytes[len + 1..].iter()
                                      .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                                      .count();
        if !starts_segment {
            return Err(LexFault::MalformedPath(format!("{head}{}", &rest[..=len + segment])));
        }
        len += 1 + segment;
    }

    let name = format!("{head}{}", &rest[..len]);
    lex.bump(len);
    Ok(Word::Identifier(name))
}

/// Maps an operator lexeme to its static symbol.
fn symbol(lex: &mut Lexer<Lexeme>) -> Option<&'static str> {
    Operator::from_symbol(lex.slice()).map(Operator::symbol)
}

/// An expression with insignificant whitespace removed.
///
/// `offsets[i]` is the character position in the original text of the byte
/// at `i` in `text`; one extra entry marks the end.
struct Stripped {
    text:    String,
    offsets: Vec<usize>,
}

impl Stripped {
    fn position(&self, byte: usize) -> usize {
        self.offsets
            .get(byte)
            .or_else(|| self.offsets.last())
            .copied()
            .unwrap_or_default()
    }
}

/// Removes whitespace outside string literals.
///
/// Inside a literal a backslash protects the next character, so an escaped
/// quote does not close it.
///
/// # Errors
/// [`CompileError::UnterminatedString`] if a literal is still open at the end.
fn strip(expression: &str) -> Result<Stripped, CompileError> {
    let mut text = String::with_capacity(expression.len());
    let mut offsets = Vec::with_capacity(expression.len() + 1);
    let mut open: Option<(char, usize)> = None;
    let mut escaped = false;
    let mut count = 0;

    for (index, c) in expression.chars().enumerate() {
        count = index + 1;
        match open {
            Some((quote, _)) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    open = None;
                }
            },
            None if c.is_whitespace() => continue,
            None if c == '"' || c == '\'' => open = Some((c, index)),
            None => {},
        }

        text.push(c);
        offsets.extend(std::iter::repeat_n(index, c.len_utf8()));
    }

    if let Some((_, position)) = open {
        return Err(CompileError::UnterminatedString { position });
    }

    offsets.push(count);
    Ok(Stripped { text, offsets })
}

/// Converts a scanner fault into a positioned compile error.
fn fault_to_error(fault: LexFault, source: &Stripped, start: usize) -> CompileError {
    let position = source.position(start);
    match fault {
        LexFault::Unrecognized => {
            let character = source.text[start..].chars().next().unwrap_or_default();
            CompileError::UnexpectedCharacter { character, position }
        },
        LexFault::MalformedNumber(literal) => CompileError::MalformedNumber { literal, position },
        LexFault::UnterminatedString => CompileError::UnterminatedString { position },
        LexFault::InvalidEscape { sequence, offset } => {
            CompileError::InvalidEscape { sequence,
                                          position: source.position(start + offset) }
        },
        LexFault::MalformedPath(path) => CompileError::MalformedPath { path, position },
        LexFault::MemberDisabled { offset } => {
            CompileError::FeatureDisabled { feature:   Features::MEMBER,
                                            construct: "member access".to_string(),
                                            position:  source.position(start + offset), }
        },
    }
}

/// Rejects tokens whose feature is not enabled.
fn check_feature(token: &Token, features: Features, position: usize) -> Result<(), CompileError> {
    let (required, construct) = match token {
        Token::Str(_) => (Features::STRING, "string literal".to_string()),
        Token::Operator(symbol) => {
            let required = Operator::from_symbol(symbol).map_or(Features::MINIMAL, Operator::requires);
            (required, format!("operator '{symbol}'"))
        },
        _ => return Ok(()),
    };

    if features.contains(required) {
        Ok(())
    } else {
        Err(CompileError::FeatureDisabled { feature: required,
                                            construct,
                                            position })
    }
}

/// Splits an expression into tokens.
///
/// Whitespace outside string literals is dropped first. Every token is
/// paired with the character offset where it starts in `expression`.
///
/// # Errors
/// A lexical [`CompileError`] for the first malformed token or for a
/// construct whose feature is disabled.
///
/// # Example
/// ```
/// use formulary::{
///     compiler::features::Features,
///     interpreter::lexer::{Token, tokenize},
/// };
///
/// let tokens = tokenize("max(a, 2.5)", Features::COMMON).unwrap();
/// let kinds: Vec<Token> = tokens.into_iter().map(|(token, _)| token).collect();
/// assert_eq!(kinds,
///            vec![Token::Identifier("max".into()),
///                 Token::LParen,
///                 Token::Identifier("a".into()),
///                 Token::Comma,
///                 Token::Float(2.5),
///                 Token::RParen]);
///
/// assert!(tokenize("a && b", Features::MINIMAL).is_err());
/// ```
pub fn tokenize(expression: &str, features: Features) -> Result<Vec<(Token, usize)>, CompileError> {
    let source = strip(expression)?;
    let mut lexer = Lexeme::lexer_with_extras(&source.text, LexerExtras { features });
    let mut tokens = Vec::new();

    while let Some(lexeme) = lexer.next() {
        let start = lexer.span().start;
        let position = source.position(start);

        let token = match lexeme.map_err(|fault| fault_to_error(fault, &source, start))? {
            Lexeme::Number(Number::Integer(i)) => Token::Integer(i),
            Lexeme::Number(Number::Float(r)) => Token::Float(r),
            Lexeme::Str(s) => Token::Str(s),
            Lexeme::Word(Word::Bool(b)) => Token::Bool(b),
            Lexeme::Word(Word::Identifier(name)) => Token::Identifier(name),
            Lexeme::Symbol(symbol) => Token::Operator(symbol),
            Lexeme::LParen => Token::LParen,
            Lexeme::RParen => Token::RParen,
            Lexeme::Comma => Token::Comma,
        };

        check_feature(&token, features, position)?;
        tokens.push((token, position));
    }

    log::debug!("scanned {} tokens from {:?}", tokens.len(), source.text);
    Ok(tokens)
}
