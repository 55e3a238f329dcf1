//! Parser for the program description language
//!
//! A recursive descent parser that builds a [`Document`] from tokens.

mod error;
mod expr;
mod item;

pub use error::{ParseError, ParseErrorKind, ParseResult};

use crate::ast::{Document, Span, Spanned};
use crate::lexer::{SpannedToken, Token, lex};

/// The program description parser
pub struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a complete document, tagging it with `name`
    pub fn parse(tokens: &'a [SpannedToken], name: &str) -> ParseResult<Document> {
        let mut parser = Parser::new(tokens);
        parser.parse_document(name)
    }

    // === Token navigation ===

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek ahead (n=1 is the next token)
    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Expect a specific token or return an error
    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(error::describe_token(expected)))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Spanned<String>> {
        let span = self.current_span();
        match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_string(&mut self) -> ParseResult<Spanned<String>> {
        let span = self.current_span();
        match self.peek().cloned() {
            Some(Token::String(s)) => {
                self.advance();
                Ok(Spanned::new(s, span))
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    /// Build an "expected X" error for the current position
    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::unexpected_token(self.current_span(), expected, Some(tok.clone())),
            None => ParseError::unexpected_eof(self.current_span(), expected),
        }
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| Span::new(t.span.start, t.span.end))
            .unwrap_or_else(|| {
                // EOF: end of the last token
                self.tokens
                    .last()
                    .map(|t| Span::new(t.span.end, t.span.end))
                    .unwrap_or_default()
            })
    }

    fn previous_span(&self) -> Span {
        if self.pos > 0 {
            let t = &self.tokens[self.pos - 1];
            Span::new(t.span.start, t.span.end)
        } else {
            Span::default()
        }
    }
}

/// Lex and parse `source` in one step
pub fn parse_source(source: &str, name: &str) -> ParseResult<Document> {
    let tokens = lex(source).map_err(|e| {
        ParseError::new(
            Span::new(e.span.start, e.span.end),
            ParseErrorKind::InvalidCharacter(e.message),
        )
    })?;
    Parser::parse(&tokens, name)
}
