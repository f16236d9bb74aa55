//! Statement AST nodes

use super::Expr;
use serde::{Deserialize, Serialize};

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stmt {
    /// identifier := expression
    Assignment { identifier: String, expression: Expr },

    /// if (condition) then_block [else else_block]
    If {
        condition: Expr,
        then_block: Box<Stmt>,
        #[serde(default)]
        else_block: Option<Box<Stmt>>,
    },

    /// while (condition) block
    While { condition: Expr, block: Box<Stmt> },

    /// for (init; condition; increment) block
    ForCStyle {
        init: Box<Stmt>,
        condition: Expr,
        increment: Box<Stmt>,
        block: Box<Stmt>,
    },

    /// for variable in collection block
    ForIn {
        variable: String,
        collection: Expr,
        block: Box<Stmt>,
    },

    /// Function declaration
    Function(FnDef),

    /// return [value]
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },

    /// Expression evaluated for its effects
    Expression { expr: Expr },

    /// { statements }
    Block {
        #[serde(default)]
        statements: Vec<Stmt>,
    },
}

impl Stmt {
    pub fn assign(identifier: impl Into<String>, expression: Expr) -> Self {
        Stmt::Assignment {
            identifier: identifier.into(),
            expression,
        }
    }

    pub fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block { statements }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expression { expr }
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::Return { value }
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnDef {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Param>,
    pub body: Box<Stmt>,
}

impl FnDef {
    pub fn new(name: impl Into<String>, parameters: &[&str], body: Stmt) -> Self {
        FnDef {
            name: name.into(),
            parameters: parameters.iter().map(|p| Param::new(*p)).collect(),
            body: Box::new(body),
        }
    }
}

/// Function parameter
///
/// The annotation is carried for documentation only; it is never checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default, alias = "type")]
    pub type_annotation: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            type_annotation: None,
        }
    }
}
