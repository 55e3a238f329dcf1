//! Declaration parsing

use crate::ast::{
    Attribute, ConfigDecl, Document, Item, LocalDecl, OutputDecl, ResourceDecl, Span, Spanned,
};
use crate::lexer::Token;

use super::Parser;
use super::error::{ParseError, ParseResult};

impl<'a> Parser<'a> {
    pub fn parse_document(&mut self, name: &str) -> ParseResult<Document> {
        let mut items = Vec::new();

        while self.peek().is_some() {
            items.push(self.parse_item()?);
        }

        let span = match (items.first(), items.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::default(),
        };

        Ok(Document {
            name: name.to_string(),
            items,
            span,
        })
    }

    pub fn parse_item(&mut self) -> ParseResult<Spanned<Item>> {
        let start = self.current_span();

        let item = match self.peek().cloned() {
            Some(Token::Config) => Item::Config(self.parse_config()?),
            Some(Token::Resource) => Item::Resource(self.parse_resource()?),
            Some(Token::Local) => {
                self.advance();
                let (name, value) = self.parse_binding()?;
                Item::Local(LocalDecl { name, value })
            }
            Some(Token::Output) => {
                self.advance();
                let (name, value) = self.parse_binding()?;
                Item::Output(OutputDecl { name, value })
            }
            _ => return Err(self.unexpected("'config', 'resource', 'local' or 'output'")),
        };

        Ok(Spanned::new(item, start.merge(self.previous_span())))
    }

    /// config name "type" [{ default = expr }]
    fn parse_config(&mut self) -> ParseResult<ConfigDecl> {
        self.expect(&Token::Config)?;
        let name = self.expect_ident()?;
        let type_name = self.expect_string()?;

        let mut default = None;
        if self.check(&Token::LBrace) {
            self.advance();
            while !self.check(&Token::RBrace) {
                let attr = self.parse_attribute()?;
                if attr.name.node != "default" {
                    return Err(ParseError::custom(
                        attr.name.span,
                        format!("unknown config attribute '{}'", attr.name.node),
                    ));
                }
                if default.is_some() {
                    return Err(ParseError::custom(attr.name.span, "duplicate default value"));
                }
                default = Some(attr.value);
            }
            self.expect(&Token::RBrace)?;
        }

        Ok(ConfigDecl {
            name,
            type_name,
            default,
        })
    }

    /// resource name "token" { attributes... [options { ... }] }
    fn parse_resource(&mut self) -> ParseResult<ResourceDecl> {
        self.expect(&Token::Resource)?;
        let name = self.expect_ident()?;
        let token = self.expect_string()?;
        self.expect(&Token::LBrace)?;

        let mut attributes = Vec::new();
        let mut options: Option<Spanned<Vec<Attribute>>> = None;

        while !self.check(&Token::RBrace) {
            let is_options_block = matches!(self.peek(), Some(Token::Ident(id)) if id == "options")
                && self.peek_ahead(1) == Some(&Token::LBrace);

            if is_options_block {
                let start = self.current_span();
                if options.is_some() {
                    return Err(ParseError::custom(start, "duplicate options block"));
                }
                self.advance();
                let body = self.parse_attribute_block()?;
                options = Some(Spanned::new(body, start.merge(self.previous_span())));
            } else {
                attributes.push(self.parse_attribute()?);
            }
        }
        self.expect(&Token::RBrace)?;

        Ok(ResourceDecl {
            name,
            token,
            attributes,
            options,
        })
    }

    /// { name = expr ... }
    fn parse_attribute_block(&mut self) -> ParseResult<Vec<Attribute>> {
        self.expect(&Token::LBrace)?;
        let mut attributes = Vec::new();
        while !self.check(&Token::RBrace) {
            attributes.push(self.parse_attribute()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(attributes)
    }

    /// Attribute names may be keywords, e.g. `output = ...`
    fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let span = self.current_span();
        let name = Spanned::new(self.expect_attr_name()?, span);
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        Ok(Attribute { name, value })
    }

    /// name = expr
    fn parse_binding(&mut self) -> ParseResult<(Spanned<String>, Spanned<crate::ast::Expr>)> {
        let name = self.expect_ident()?;
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        Ok((name, value))
    }
}
