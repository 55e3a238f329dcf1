//! Top-level declarations

use super::expr::Expr;
use super::span::{Span, Spanned};

/// `name = value` inside a resource body or options block
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Spanned<String>,
    pub value: Spanned<Expr>,
}

/// `config name "type" { default = ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDecl {
    pub name: Spanned<String>,
    pub type_name: Spanned<String>,
    pub default: Option<Spanned<Expr>>,
}

/// `resource name "pkg:module:Type" { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDecl {
    pub name: Spanned<String>,
    pub token: Spanned<String>,
    pub attributes: Vec<Attribute>,
    /// The `options { ... }` block, if present
    pub options: Option<Spanned<Vec<Attribute>>>,
}

/// `local name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDecl {
    pub name: Spanned<String>,
    pub value: Spanned<Expr>,
}

/// `output name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDecl {
    pub name: Spanned<String>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Config(ConfigDecl),
    Resource(ResourceDecl),
    Local(LocalDecl),
    Output(OutputDecl),
}

impl Item {
    pub fn name(&self) -> &Spanned<String> {
        match self {
            Item::Config(c) => &c.name,
            Item::Resource(r) => &r.name,
            Item::Local(l) => &l.name,
            Item::Output(o) => &o.name,
        }
    }
}

/// A parsed program description
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Logical name of the program, usually the fixture's program id
    pub name: String,
    pub items: Vec<Spanned<Item>>,
    pub span: Span,
}
