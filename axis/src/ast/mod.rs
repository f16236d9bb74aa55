//! Abstract Syntax Tree definitions
//!
//! The tree is produced outside this crate and arrives as JSON. Every node is
//! tagged with a `"type"` field naming its variant in snake_case.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

use crate::interp::{InterpResult, RuntimeError};
use serde::{Deserialize, Serialize};

/// A program is a sequence of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Program { statements }
    }

    /// Load a program from its JSON form.
    ///
    /// Any schema violation (unknown node type, missing field, unknown
    /// operator) is reported as a malformed-AST error before anything runs.
    pub fn from_json(source: &str) -> InterpResult<Program> {
        serde_json::from_str(source).map_err(|e| RuntimeError::malformed_ast(&e.to_string()))
    }

    /// Number of function declarations anywhere in the tree
    pub fn function_count(&self) -> usize {
        self.statements.iter().map(count_functions).sum()
    }
}

fn count_functions(stmt: &Stmt) -> usize {
    match stmt {
        Stmt::Function(def) => 1 + count_functions(&def.body),
        Stmt::If {
            then_block,
            else_block,
            ..
        } => count_functions(then_block) + else_block.as_deref().map_or(0, count_functions),
        Stmt::While { block, .. } | Stmt::ForIn { block, .. } => count_functions(block),
        Stmt::ForCStyle {
            init,
            increment,
            block,
            ..
        } => count_functions(init) + count_functions(increment) + count_functions(block),
        Stmt::Block { statements } => statements.iter().map(count_functions).sum(),
        Stmt::Assignment { .. } | Stmt::Return { .. } | Stmt::Expression { .. } => 0,
    }
}
