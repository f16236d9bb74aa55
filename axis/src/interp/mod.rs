//! Tree-walking interpreter
//!
//! [`Interpreter::execute`] runs a [`Program`](crate::ast::Program) statement
//! by statement. Expressions are evaluated in `eval`, statements and calls in
//! `exec`.

pub mod builtins;
pub mod csv;
pub mod env;
pub mod error;
pub mod eval;
pub mod exec;
pub mod value;

pub use builtins::{BuiltinFn, Builtins};
pub use env::{CallStack, Environment};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use exec::Completion;
pub use value::{Mapping, Value};
