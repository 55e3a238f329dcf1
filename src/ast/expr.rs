//! Expression nodes

use super::span::Spanned;

/// A literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Literal {
    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Int(_) => "int",
            Literal::Float(_) => "number",
            Literal::Bool(_) => "bool",
            Literal::Null => "null",
        }
    }
}

/// One step of a traversal: `.attr`, `[0]` or `["key"]`
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    Attr(String),
    Index(i64),
    Key(String),
}

/// An object entry: `key = value`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: Spanned<String>,
    pub value: Spanned<Expr>,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),

    /// List: [a, b, c]
    List(Vec<Spanned<Expr>>),

    /// Object: { key = value, ... }
    Object(Vec<ObjectEntry>),

    /// Named reference with optional accessors: bucket.website.endpoint
    Traversal {
        root: Spanned<String>,
        path: Vec<Spanned<Accessor>>,
    },

    /// Function call: invoke("aws:ec2:getAmi", { ... })
    Call {
        name: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
}
