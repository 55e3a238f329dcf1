//! The resolved program model handed to code generators

use std::collections::BTreeSet;

pub use crate::ast::{Accessor, Literal};

/// Declared type of a config variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigType {
    String,
    Int,
    Number,
    Bool,
    List,
    Map,
}

impl ConfigType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ConfigType::String),
            "int" => Some(ConfigType::Int),
            "number" => Some(ConfigType::Number),
            "bool" => Some(ConfigType::Bool),
            "list" => Some(ConfigType::List),
            "map" => Some(ConfigType::Map),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigType::String => "string",
            ConfigType::Int => "int",
            ConfigType::Number => "number",
            ConfigType::Bool => "bool",
            ConfigType::List => "list",
            ConfigType::Map => "map",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Config,
    Resource,
    Local,
    Output,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Config => "config variable",
            NodeKind::Resource => "resource",
            NodeKind::Local => "local variable",
            NodeKind::Output => "output",
        }
    }
}

/// A resolved reference to another declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub root: String,
    pub kind: NodeKind,
    pub path: Vec<Accessor>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// Data-source call resolved against a package schema
    Invoke { token: String },
    Secret,
    ReadFile,
    ToJson,
    FileAsset,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Invoke { .. } => "invoke",
            Function::Secret => "secret",
            Function::ReadFile => "readFile",
            Function::ToJson => "toJSON",
            Function::FileAsset => "fileAsset",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    List(Vec<Expression>),
    Object(Vec<(String, Expression)>),
    Reference(Reference),
    Call { function: Function, args: Vec<Expression> },
}

impl Expression {
    /// Root names of every reference inside this expression
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::List(items) => items.iter().for_each(|e| e.collect_references(out)),
            Expression::Object(entries) => entries.iter().for_each(|(_, e)| e.collect_references(out)),
            Expression::Reference(r) => out.push(&r.root),
            Expression::Call { args, .. } => args.iter().for_each(|e| e.collect_references(out)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigVariable {
    pub name: String,
    pub config_type: ConfigType,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceOptions {
    pub protect: Option<Expression>,
    pub depends_on: Option<Expression>,
    pub parent: Option<Expression>,
    pub provider: Option<Expression>,
    pub ignore_changes: Option<Expression>,
}

impl ResourceOptions {
    pub fn is_empty(&self) -> bool {
        self.protect.is_none()
            && self.depends_on.is_none()
            && self.parent.is_none()
            && self.provider.is_none()
            && self.ignore_changes.is_none()
    }

    fn expressions(&self) -> impl Iterator<Item = &Expression> {
        [
            &self.protect,
            &self.depends_on,
            &self.parent,
            &self.provider,
            &self.ignore_changes,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    /// Full type token, e.g. `aws:s3:Bucket`
    pub token: String,
    pub package: String,
    pub module: String,
    pub type_name: String,
    /// Inputs in source order
    pub inputs: Vec<(String, Expression)>,
    pub options: ResourceOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    pub name: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputVariable {
    pub name: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Config(ConfigVariable),
    Resource(Resource),
    Local(LocalVariable),
    Output(OutputVariable),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Config(c) => &c.name,
            Node::Resource(r) => &r.name,
            Node::Local(l) => &l.name,
            Node::Output(o) => &o.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Config(_) => NodeKind::Config,
            Node::Resource(_) => NodeKind::Resource,
            Node::Local(_) => NodeKind::Local,
            Node::Output(_) => NodeKind::Output,
        }
    }

    /// Names of the declarations this node reads from, deduplicated, in
    /// first-use order
    pub fn dependencies(&self) -> Vec<&str> {
        let exprs: Vec<&Expression> = match self {
            Node::Config(c) => c.default.iter().collect(),
            Node::Resource(r) => r
                .inputs
                .iter()
                .map(|(_, e)| e)
                .chain(r.options.expressions())
                .collect(),
            Node::Local(l) => vec![&l.value],
            Node::Output(o) => vec![&o.value],
        };

        let mut deps: Vec<&str> = Vec::new();
        for name in exprs.into_iter().flat_map(Expression::references) {
            if !deps.contains(&name) {
                deps.push(name);
            }
        }
        deps
    }
}

/// A bound program: every declaration resolved and ordered so that each
/// node comes after the nodes it depends on
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub nodes: Vec<Node>,
}

impl Program {
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    pub fn configs(&self) -> impl Iterator<Item = &ConfigVariable> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Config(c) => Some(c),
            _ => None,
        })
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Resource(r) => Some(r),
            _ => None,
        })
    }

    pub fn locals(&self) -> impl Iterator<Item = &LocalVariable> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Local(l) => Some(l),
            _ => None,
        })
    }

    pub fn outputs(&self) -> impl Iterator<Item = &OutputVariable> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Output(o) => Some(o),
            _ => None,
        })
    }

    /// Packages the program's resources come from, sorted
    pub fn packages(&self) -> BTreeSet<&str> {
        self.resources().map(|r| r.package.as_str()).collect()
    }
}
