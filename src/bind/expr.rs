//! Expression binding

use crate::ast::{Accessor, Expr, Literal, Span, Spanned};
use crate::diag::DiagnosticCategory;

use super::Binder;
use super::model::{Expression, Function, NodeKind, Reference};

impl Binder<'_> {
    pub(super) fn bind_expr(&mut self, expr: &Spanned<Expr>) -> Expression {
        match &expr.node {
            Expr::Literal(lit) => Expression::Literal(lit.clone()),
            Expr::List(items) => Expression::List(items.iter().map(|e| self.bind_expr(e)).collect()),
            Expr::Object(entries) => Expression::Object(
                entries
                    .iter()
                    .map(|entry| (entry.key.node.clone(), self.bind_expr(&entry.value)))
                    .collect(),
            ),
            Expr::Traversal { root, path } => self.bind_traversal(root, path),
            Expr::Call { name, args } => self.bind_call(name, args, expr.span),
        }
    }

    fn bind_traversal(&mut self, root: &Spanned<String>, path: &[Spanned<Accessor>]) -> Expression {
        let Some((kind, _)) = self.declared.get(&root.node).copied() else {
            self.error(
                format!("undeclared name '{}'", root.node),
                root.span,
                DiagnosticCategory::Unresolved,
            );
            return Expression::Literal(Literal::Null);
        };

        if kind == NodeKind::Output {
            self.error(
                format!("output '{}' cannot be referenced", root.node),
                root.span,
                DiagnosticCategory::Unresolved,
            );
            return Expression::Literal(Literal::Null);
        }

        self.used.insert(root.node.clone());

        if kind == NodeKind::Resource {
            self.check_resource_attribute(root, path);
        }

        Expression::Reference(Reference {
            root: root.node.clone(),
            kind,
            path: path.iter().map(|a| a.node.clone()).collect(),
        })
    }

    /// The first attribute read from a resource must exist in its schema.
    /// Deeper accessors walk into values whose shape schemas don't describe.
    fn check_resource_attribute(&mut self, root: &Spanned<String>, path: &[Spanned<Accessor>]) {
        let Some(Spanned { node: Accessor::Attr(attr), span }) = path.first() else {
            return;
        };
        let Some(token) = self.resource_tokens.get(&root.node).cloned() else {
            return;
        };
        let host = self.host;
        // Unknown types were already reported on the declaration
        let Some(schema) = host.resource(&token) else {
            return;
        };
        if schema.attribute(attr).is_none() {
            self.error(
                format!(
                    "resource '{}' of type '{}' has no attribute '{}'",
                    root.node, token, attr
                ),
                *span,
                DiagnosticCategory::Schema,
            );
        }
    }

    fn bind_call(&mut self, name: &Spanned<String>, args: &[Spanned<Expr>], span: Span) -> Expression {
        let bound: Vec<Expression> = args.iter().map(|a| self.bind_expr(a)).collect();

        let (function, arity) = match name.node.as_str() {
            "invoke" => return self.bind_invoke(args, bound, span),
            "secret" => (Function::Secret, 1),
            "readFile" => (Function::ReadFile, 1),
            "toJSON" => (Function::ToJson, 1),
            "fileAsset" => (Function::FileAsset, 1),
            other => {
                self.error(
                    format!("unknown function '{}'", other),
                    name.span,
                    DiagnosticCategory::Unresolved,
                );
                return Expression::Literal(Literal::Null);
            }
        };

        if bound.len() != arity {
            self.error(
                format!(
                    "function '{}' expects {} argument(s), found {}",
                    function.name(),
                    arity,
                    bound.len()
                ),
                span,
                DiagnosticCategory::Type,
            );
        }

        Expression::Call {
            function,
            args: bound,
        }
    }

    /// invoke("pkg:module:function" [, { args }])
    fn bind_invoke(&mut self, args: &[Spanned<Expr>], bound: Vec<Expression>, span: Span) -> Expression {
        if args.is_empty() || args.len() > 2 {
            self.error(
                format!("function 'invoke' expects 1 or 2 argument(s), found {}", args.len()),
                span,
                DiagnosticCategory::Type,
            );
            return Expression::Literal(Literal::Null);
        }

        let Expr::Literal(Literal::String(token)) = &args[0].node else {
            self.error(
                "the first argument to invoke must be a string literal token",
                args[0].span,
                DiagnosticCategory::Type,
            );
            return Expression::Literal(Literal::Null);
        };

        let host = self.host;
        let Some(schema) = host.function(token) else {
            self.error(
                format!("unknown function '{}'", token),
                args[0].span,
                DiagnosticCategory::Schema,
            );
            return Expression::Literal(Literal::Null);
        };

        if let Some(Spanned { node: Expr::Object(entries), .. }) = args.get(1) {
            for entry in entries {
                if !schema.inputs.contains_key(&entry.key.node) {
                    self.error(
                        format!("unknown argument '{}' for function '{}'", entry.key.node, token),
                        entry.key.span,
                        DiagnosticCategory::Schema,
                    );
                }
            }
        }

        Expression::Call {
            function: Function::Invoke {
                token: token.clone(),
            },
            args: bound,
        }
    }
}
