//! Parse error types

use crate::ast::Span;
use crate::lexer::Token;

/// A parse error
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub kind: ParseErrorKind,
}

/// The kind of parse error
#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    UnexpectedToken {
        expected: String,
        found: Option<Token>,
    },
    UnexpectedEof { expected: String },
    /// The lexer hit a character outside the language
    InvalidCharacter(String),
    Custom(String),
}

impl ParseError {
    pub fn new(span: Span, kind: ParseErrorKind) -> Self {
        Self { span, kind }
    }

    pub fn unexpected_token(span: Span, expected: impl Into<String>, found: Option<Token>) -> Self {
        Self {
            span,
            kind: ParseErrorKind::UnexpectedToken {
                expected: expected.into(),
                found,
            },
        }
    }

    pub fn unexpected_eof(span: Span, expected: impl Into<String>) -> Self {
        Self {
            span,
            kind: ParseErrorKind::UnexpectedEof {
                expected: expected.into(),
            },
        }
    }

    pub fn custom(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            kind: ParseErrorKind::Custom(message.into()),
        }
    }

    /// Format error with line:col positions instead of byte offsets
    pub fn format_with_source(&self, source: &str) -> String {
        let position = self.span.format_position(source);
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("expected {}, found {} at {}", expected, found_text(found), position)
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                format!("unexpected end of file, expected {}", expected)
            }
            ParseErrorKind::InvalidCharacter(msg) | ParseErrorKind::Custom(msg) => {
                format!("{} at {}", msg, position)
            }
        }
    }
}

fn found_text(found: &Option<Token>) -> String {
    match found {
        Some(tok) => describe_token(tok),
        None => "end of file".to_string(),
    }
}

/// Describe a token for error messages
pub(super) fn describe_token(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("identifier '{}'", name),
        Token::Integer(n) => format!("integer {}", n),
        Token::Float(n) => format!("number {}", n),
        Token::String(s) => format!("string \"{}\"", s),
        Token::LBrace => "'{'".to_string(),
        Token::RBrace => "'}'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Eq => "'='".to_string(),
        Token::Config => "keyword 'config'".to_string(),
        Token::Resource => "keyword 'resource'".to_string(),
        Token::Local => "keyword 'local'".to_string(),
        Token::Output => "keyword 'output'".to_string(),
        Token::True => "keyword 'true'".to_string(),
        Token::False => "keyword 'false'".to_string(),
        Token::Null => "keyword 'null'".to_string(),
        Token::Comment => "comment".to_string(),
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => write!(
                f,
                "expected {}, found {} at {}..{}",
                expected,
                found_text(found),
                self.span.start,
                self.span.end
            ),
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of file, expected {}", expected)
            }
            ParseErrorKind::InvalidCharacter(msg) | ParseErrorKind::Custom(msg) => {
                write!(f, "{} at {}..{}", msg, self.span.start, self.span.end)
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;
