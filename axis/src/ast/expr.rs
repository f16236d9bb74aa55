//! Expression AST nodes

use serde::{Deserialize, Serialize};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    /// Literal scalar: the raw JSON value tagged with the kind it should become
    Literal {
        value: serde_json::Value,
        kind: LiteralKind,
    },

    /// Variable reference
    Identifier { name: String },

    /// Binary operation
    BinaryOp {
        operator: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation
    UnaryOp { operator: UnOp, operand: Box<Expr> },

    /// Function call (builtin or user-defined)
    FunctionCall {
        name: String,
        #[serde(default)]
        arguments: Vec<Expr>,
    },

    /// Element access: base[index]
    Index { base: Box<Expr>, index: Box<Expr> },

    /// Sequence constructor: [e1, e2, ...]
    Sequence {
        #[serde(default)]
        elements: Vec<Expr>,
    },

    /// Mapping constructor: {"k": v, ...}
    Mapping {
        #[serde(default)]
        entries: Vec<MapEntry>,
    },
}

/// One `key: value` pair of a mapping constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: String,
    pub value: Expr,
}

/// The kind a literal evaluates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Number,
    #[serde(alias = "string")]
    Text,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "none", alias = "null")]
    Absence,
}

impl Expr {
    pub fn number(n: f64) -> Self {
        Expr::Literal {
            value: serde_json::Value::from(n),
            kind: LiteralKind::Number,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Expr::Literal {
            value: serde_json::Value::String(s.into()),
            kind: LiteralKind::Text,
        }
    }

    pub fn boolean(b: bool) -> Self {
        Expr::Literal {
            value: serde_json::Value::Bool(b),
            kind: LiteralKind::Boolean,
        }
    }

    pub fn absence() -> Self {
        Expr::Literal {
            value: serde_json::Value::Null,
            kind: LiteralKind::Absence,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    pub fn binary(operator: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: UnOp, operand: Expr) -> Self {
        Expr::UnaryOp {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            name: name.into(),
            arguments,
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,

    // Comparison
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,

    // Logical
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
            BinOp::And => write!(f, "&&"),
            BinOp::Or => write!(f, "||"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// Negation (-)
    #[serde(rename = "-")]
    Neg,
    /// Logical not (!)
    #[serde(rename = "!")]
    Not,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Not => write!(f, "!"),
        }
    }
}
