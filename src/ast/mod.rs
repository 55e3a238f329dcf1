//! Syntax tree for program descriptions
//!
//! This is the unresolved form of a program: names are plain strings and
//! resource type tokens have not yet been looked up in any schema.

mod expr;
mod item;
mod span;

pub use expr::{Accessor, Expr, Literal, ObjectEntry};
pub use item::{Attribute, ConfigDecl, Document, Item, LocalDecl, OutputDecl, ResourceDecl};
pub use span::{LineCol, Span, Spanned};
