//! Binding: resolves a parsed [`Document`] into a [`Program`]
//!
//! This module is responsible for:
//! - Name resolution between declarations
//! - Resource and function lookup against a [`ResolutionHost`]
//! - Literal type checks against schemas and config types
//! - Dependency ordering of the bound nodes
//!
//! Problems are reported as diagnostics; binding never stops at the first
//! one. Callers decide what to do with error-severity diagnostics.

mod expr;
pub mod host;
pub mod model;
mod order;

pub use host::{
    FunctionSchema, PackageCache, PackageSchema, PropertyType, ResolutionHost, ResourceSchema,
    SCHEMA_DIR, SchemaError,
};
pub use model::{
    ConfigType, ConfigVariable, Expression, Function, LocalVariable, Node, NodeKind,
    OutputVariable, Program, Reference, Resource, ResourceOptions,
};

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::ast::{
    Attribute, ConfigDecl, Document, Expr, Item, Literal, ResourceDecl, Span, Spanned,
};
use crate::diag::{Diagnostic, DiagnosticCategory, Diagnostics};

/// Option names accepted in a resource `options { ... }` block
const RESOURCE_OPTIONS: &[&str] = &["protect", "dependsOn", "parent", "provider", "ignoreChanges"];

/// Bind `document` against `host`.
///
/// Always returns a program; when the diagnostics contain errors the
/// program is incomplete and should not be handed to a generator.
pub fn bind(document: &Document, host: &dyn ResolutionHost) -> (Program, Diagnostics) {
    let mut binder = Binder::new(host);
    let program = binder.bind_document(document);
    (program, binder.diagnostics)
}

struct Binder<'h> {
    host: &'h dyn ResolutionHost,
    /// Declared names, filled before any expression is bound
    declared: HashMap<String, (NodeKind, Span)>,
    /// Schemas of declared resources, for attribute checks on references
    resource_tokens: HashMap<String, String>,
    /// Names read by some expression
    used: HashSet<String>,
    diagnostics: Diagnostics,
}

impl<'h> Binder<'h> {
    fn new(host: &'h dyn ResolutionHost) -> Self {
        Self {
            host,
            declared: HashMap::default(),
            resource_tokens: HashMap::default(),
            used: HashSet::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn error(&mut self, summary: impl Into<String>, span: Span, category: DiagnosticCategory) {
        self.diagnostics.push(
            Diagnostic::error(summary)
                .with_span(span)
                .with_category(category),
        );
    }

    fn bind_document(&mut self, document: &Document) -> Program {
        self.declare(document);

        let mut nodes = Vec::with_capacity(document.items.len());
        for item in &document.items {
            let node = match &item.node {
                Item::Config(c) => self.bind_config(c).map(Node::Config),
                Item::Resource(r) => self.bind_resource(r).map(Node::Resource),
                Item::Local(l) => Some(Node::Local(LocalVariable {
                    name: l.name.node.clone(),
                    value: self.bind_expr(&l.value),
                })),
                Item::Output(o) => Some(Node::Output(OutputVariable {
                    name: o.name.node.clone(),
                    value: self.bind_expr(&o.value),
                })),
            };
            if let Some(node) = node {
                nodes.push((node, item.span));
            }
        }

        self.warn_unused(document);

        let nodes = order::sort(nodes, &mut self.diagnostics);
        Program {
            name: document.name.clone(),
            nodes,
        }
    }

    /// Record every declaration name up front so references may point
    /// forwards
    fn declare(&mut self, document: &Document) {
        for item in &document.items {
            let name = item.node.name();
            let kind = match &item.node {
                Item::Config(_) => NodeKind::Config,
                Item::Resource(r) => {
                    self.resource_tokens
                        .entry(name.node.clone())
                        .or_insert_with(|| r.token.node.clone());
                    NodeKind::Resource
                }
                Item::Local(_) => NodeKind::Local,
                Item::Output(_) => NodeKind::Output,
            };

            if let Some((_, previous)) = self.declared.get(&name.node) {
                let previous = *previous;
                self.diagnostics.push(
                    Diagnostic::error(format!("duplicate declaration '{}'", name.node))
                        .with_span(name.span)
                        .with_detail(format!("previously declared at offset {}", previous.start)),
                );
                continue;
            }
            self.declared.insert(name.node.clone(), (kind, name.span));
        }
    }

    fn bind_config(&mut self, decl: &ConfigDecl) -> Option<ConfigVariable> {
        let Some(config_type) = ConfigType::parse(&decl.type_name.node) else {
            self.error(
                format!(
                    "unknown config type '{}' for '{}'",
                    decl.type_name.node, decl.name.node
                ),
                decl.type_name.span,
                DiagnosticCategory::Type,
            );
            return None;
        };

        if let Some(Spanned { node: Expr::Literal(lit), span }) = &decl.default {
            if !config_accepts(config_type, lit) {
                self.error(
                    format!(
                        "default value for '{}' must be {}, found {}",
                        decl.name.node,
                        config_type.as_str(),
                        lit.type_name()
                    ),
                    *span,
                    DiagnosticCategory::Type,
                );
            }
        }

        let default = decl.default.as_ref().map(|d| self.bind_expr(d));
        Some(ConfigVariable {
            name: decl.name.node.clone(),
            config_type,
            default,
        })
    }

    fn bind_resource(&mut self, decl: &ResourceDecl) -> Option<Resource> {
        let parts: Vec<&str> = decl.token.node.split(':').collect();
        let [package, module, type_name] = parts.as_slice() else {
            self.error(
                format!(
                    "invalid resource type token '{}', expected 'package:module:Type'",
                    decl.token.node
                ),
                decl.token.span,
                DiagnosticCategory::Schema,
            );
            return None;
        };
        let (package, module, type_name) =
            (package.to_string(), module.to_string(), type_name.to_string());

        let host = self.host;
        let schema = host.resource(&decl.token.node);
        if schema.is_none() {
            self.error(
                format!("unknown resource type '{}'", decl.token.node),
                decl.token.span,
                DiagnosticCategory::Schema,
            );
        }

        let mut seen: HashSet<&str> = HashSet::default();
        let mut inputs = Vec::with_capacity(decl.attributes.len());
        for attr in &decl.attributes {
            if !seen.insert(attr.name.node.as_str()) {
                self.error(
                    format!("duplicate property '{}'", attr.name.node),
                    attr.name.span,
                    DiagnosticCategory::Schema,
                );
                continue;
            }
            if let Some(schema) = schema {
                self.check_property(decl, schema, attr);
            }
            inputs.push((attr.name.node.clone(), self.bind_expr(&attr.value)));
        }

        if let Some(schema) = schema {
            for required in &schema.required {
                if !seen.contains(required.as_str()) {
                    self.error(
                        format!(
                            "missing required property '{}' on resource '{}'",
                            required, decl.name.node
                        ),
                        decl.name.span,
                        DiagnosticCategory::Schema,
                    );
                }
            }
        }

        let options = match &decl.options {
            Some(block) => self.bind_options(&block.node),
            None => ResourceOptions::default(),
        };

        Some(Resource {
            name: decl.name.node.clone(),
            token: decl.token.node.clone(),
            package,
            module,
            type_name,
            inputs,
            options,
        })
    }

    fn check_property(&mut self, decl: &ResourceDecl, schema: &ResourceSchema, attr: &Attribute) {
        let Some(expected) = schema.inputs.get(&attr.name.node).copied() else {
            self.error(
                format!(
                    "unknown property '{}' for resource type '{}'",
                    attr.name.node, decl.token.node
                ),
                attr.name.span,
                DiagnosticCategory::Schema,
            );
            return;
        };

        if let Some(found) = literal_shape(&attr.value.node) {
            if !property_accepts(expected, found) {
                self.error(
                    format!(
                        "cannot assign {} to property '{}' of type {}",
                        found,
                        attr.name.node,
                        expected.as_str()
                    ),
                    attr.value.span,
                    DiagnosticCategory::Type,
                );
            }
        }
    }

    fn bind_options(&mut self, attributes: &[Attribute]) -> ResourceOptions {
        let mut options = ResourceOptions::default();
        for attr in attributes {
            let slot = match attr.name.node.as_str() {
                "protect" => &mut options.protect,
                "dependsOn" => &mut options.depends_on,
                "parent" => &mut options.parent,
                "provider" => &mut options.provider,
                "ignoreChanges" => &mut options.ignore_changes,
                other => {
                    self.diagnostics.push(
                        Diagnostic::error(format!("unknown resource option '{}'", other))
                            .with_span(attr.name.span)
                            .with_detail(format!("supported options: {}", RESOURCE_OPTIONS.join(", ")))
                            .with_category(DiagnosticCategory::Schema),
                    );
                    continue;
                }
            };

            if attr.name.node == "dependsOn" && !matches!(attr.value.node, Expr::List(_)) {
                self.diagnostics.push(
                    Diagnostic::error("dependsOn must be a list of resources")
                        .with_span(attr.value.span)
                        .with_category(DiagnosticCategory::Type),
                );
            }

            *slot = Some(self.bind_expr(&attr.value));
        }
        options
    }

    fn warn_unused(&mut self, document: &Document) {
        for item in &document.items {
            if let Item::Config(c) = &item.node {
                if !self.used.contains(&c.name.node) {
                    self.diagnostics.push(
                        Diagnostic::warning(format!("config variable '{}' is never used", c.name.node))
                            .with_span(c.name.span)
                            .with_category(DiagnosticCategory::Unused),
                    );
                }
            }
        }
    }
}

/// Coarse shape of a literal-ish expression for type checks; `None` for
/// references and calls, whose type is not known here
fn literal_shape(expr: &Expr) -> Option<&'static str> {
    match expr {
        Expr::Literal(Literal::Null) => None,
        Expr::Literal(lit) => Some(lit.type_name()),
        Expr::List(_) => Some("list"),
        Expr::Object(_) => Some("object"),
        Expr::Traversal { .. } | Expr::Call { .. } => None,
    }
}

fn property_accepts(expected: PropertyType, found: &str) -> bool {
    match expected {
        PropertyType::Any => true,
        PropertyType::String => found == "string",
        PropertyType::Number => found == "int" || found == "number",
        PropertyType::Bool => found == "bool",
        PropertyType::Array => found == "list",
        PropertyType::Object => found == "object",
    }
}

fn config_accepts(config_type: ConfigType, lit: &Literal) -> bool {
    matches!(
        (config_type, lit),
        (_, Literal::Null)
            | (ConfigType::String, Literal::String(_))
            | (ConfigType::Int, Literal::Int(_))
            | (ConfigType::Number, Literal::Int(_) | Literal::Float(_))
            | (ConfigType::Bool, Literal::Bool(_))
    )
}
