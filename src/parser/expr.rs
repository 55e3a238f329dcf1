//! Expression parsing

use crate::ast::{Accessor, Expr, Literal, ObjectEntry, Spanned};
use crate::lexer::Token;

use super::Parser;
use super::error::ParseResult;

impl Parser<'_> {
    pub fn parse_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.current_span();

        let expr = match self.peek().cloned() {
            Some(Token::String(s)) => {
                self.advance();
                Expr::Literal(Literal::String(s))
            }
            Some(Token::Integer(n)) => {
                self.advance();
                Expr::Literal(Literal::Int(n))
            }
            Some(Token::Float(n)) => {
                self.advance();
                Expr::Literal(Literal::Float(n))
            }
            Some(Token::True) => {
                self.advance();
                Expr::Literal(Literal::Bool(true))
            }
            Some(Token::False) => {
                self.advance();
                Expr::Literal(Literal::Bool(false))
            }
            Some(Token::Null) => {
                self.advance();
                Expr::Literal(Literal::Null)
            }
            Some(Token::LBracket) => self.parse_list()?,
            Some(Token::LBrace) => self.parse_object()?,
            Some(Token::Ident(_)) => {
                let name = self.expect_ident()?;
                if self.check(&Token::LParen) {
                    let args = self.parse_call_args()?;
                    Expr::Call { name, args }
                } else {
                    let path = self.parse_accessors()?;
                    Expr::Traversal { root: name, path }
                }
            }
            _ => return Err(self.unexpected("expression")),
        };

        Ok(Spanned::new(expr, start.merge(self.previous_span())))
    }

    /// [a, b, c] with an optional trailing comma
    fn parse_list(&mut self) -> ParseResult<Expr> {
        self.expect(&Token::LBracket)?;
        let mut items = Vec::new();
        while !self.check(&Token::RBracket) {
            items.push(self.parse_expr()?);
            if !self.check(&Token::RBracket) {
                self.expect(&Token::Comma)?;
            }
        }
        self.expect(&Token::RBracket)?;
        Ok(Expr::List(items))
    }

    /// { key = value } entries separated by commas or just whitespace
    fn parse_object(&mut self) -> ParseResult<Expr> {
        self.expect(&Token::LBrace)?;
        let mut entries = Vec::new();
        while !self.check(&Token::RBrace) {
            let span = self.current_span();
            let key = match self.peek().cloned() {
                Some(Token::Ident(k)) | Some(Token::String(k)) => {
                    self.advance();
                    Spanned::new(k, span)
                }
                _ => return Err(self.unexpected("object key")),
            };
            self.expect(&Token::Eq)?;
            let value = self.parse_expr()?;
            entries.push(ObjectEntry { key, value });

            if self.check(&Token::Comma) {
                self.advance();
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(Expr::Object(entries))
    }

    fn parse_call_args(&mut self) -> ParseResult<Vec<Spanned<Expr>>> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        while !self.check(&Token::RParen) {
            args.push(self.parse_expr()?);
            if !self.check(&Token::RParen) {
                self.expect(&Token::Comma)?;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    /// .attr, [0] and ["key"] suffixes of a traversal
    fn parse_accessors(&mut self) -> ParseResult<Vec<Spanned<Accessor>>> {
        let mut path = Vec::new();
        loop {
            let start = self.current_span();
            let accessor = if self.check(&Token::Dot) {
                self.advance();
                Accessor::Attr(self.expect_attr_name()?)
            } else if self.check(&Token::LBracket) {
                self.advance();
                let accessor = match self.peek().cloned() {
                    Some(Token::Integer(n)) => Accessor::Index(n),
                    Some(Token::String(k)) => Accessor::Key(k),
                    _ => return Err(self.unexpected("index or key")),
                };
                self.advance();
                self.expect(&Token::RBracket)?;
                accessor
            } else {
                break;
            };
            path.push(Spanned::new(accessor, start.merge(self.previous_span())));
        }
        Ok(path)
    }

    /// Attribute names may collide with keywords (`stack.output`)
    pub(super) fn expect_attr_name(&mut self) -> ParseResult<String> {
        let name = match self.peek() {
            Some(Token::Ident(name)) => name.clone(),
            Some(Token::Config) => "config".to_string(),
            Some(Token::Resource) => "resource".to_string(),
            Some(Token::Local) => "local".to_string(),
            Some(Token::Output) => "output".to_string(),
            _ => return Err(self.unexpected("attribute name")),
        };
        self.advance();
        Ok(name)
    }
}
