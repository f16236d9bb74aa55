//! Statement execution and the function call protocol

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::eval::{Interpreter, STACK_GROW_SIZE, STACK_RED_ZONE};
use super::value::Value;
use crate::ast::{FnDef, Program, Stmt};
use std::rc::Rc;

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Fell through; carries the statement's value
    Normal(Value),
    /// Hit a `return`; unwinds to the nearest call boundary
    Return(Value),
}

impl Completion {
    pub fn value(&self) -> &Value {
        match self {
            Completion::Normal(v) | Completion::Return(v) => v,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Completion::Normal(v) | Completion::Return(v) => v,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Completion::Return(_))
    }
}

/// Propagate a `Return` out of the enclosing statement
macro_rules! propagate_return {
    ($completion:expr) => {
        match $completion {
            ret @ Completion::Return(_) => return Ok(ret),
            Completion::Normal(v) => v,
        }
    };
}

impl Interpreter {
    /// Run a program's top-level statements in order.
    ///
    /// Returns the value of the last statement, or Absence for an empty
    /// program. A top-level `return` does not stop the program.
    pub fn execute(&mut self, program: &Program) -> InterpResult<Value> {
        let mut last = Value::Absence;
        for stmt in &program.statements {
            last = self.exec(stmt)?.into_value();
        }
        Ok(last)
    }

    /// Execute one statement with automatic stack growth
    pub fn exec(&mut self, stmt: &Stmt) -> InterpResult<Completion> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.exec_inner(stmt))
    }

    fn exec_inner(&mut self, stmt: &Stmt) -> InterpResult<Completion> {
        match stmt {
            Stmt::Assignment {
                identifier,
                expression,
            } => {
                let value = self.eval(expression)?;
                self.frames.define(identifier.clone(), value.clone());
                Ok(Completion::Normal(value))
            }

            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec(then_block)
                } else if let Some(else_block) = else_block {
                    self.exec(else_block)
                } else {
                    Ok(Completion::Normal(Value::Absence))
                }
            }

            Stmt::While { condition, block } => {
                while self.eval(condition)?.is_truthy() {
                    propagate_return!(self.exec(block)?);
                }
                Ok(Completion::Normal(Value::Absence))
            }

            Stmt::ForCStyle {
                init,
                condition,
                increment,
                block,
            } => {
                propagate_return!(self.exec(init)?);
                while self.eval(condition)?.is_truthy() {
                    propagate_return!(self.exec(block)?);
                    propagate_return!(self.exec(increment)?);
                }
                Ok(Completion::Normal(Value::Absence))
            }

            Stmt::ForIn {
                variable,
                collection,
                block,
            } => {
                let items = match self.eval(collection)? {
                    Value::Sequence(items) => items,
                    Value::Mapping(map) => map.keys().map(Value::from).collect(),
                    other => {
                        return Err(RuntimeError::type_error(
                            "sequence or mapping",
                            other.type_name(),
                        ));
                    }
                };
                for item in items {
                    self.frames.define(variable.clone(), item);
                    propagate_return!(self.exec(block)?);
                }
                Ok(Completion::Normal(Value::Absence))
            }

            Stmt::Function(fn_def) => {
                self.define_function(fn_def.clone());
                Ok(Completion::Normal(Value::Absence))
            }

            Stmt::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Absence,
                };
                Ok(Completion::Return(value))
            }

            Stmt::Expression { expr } => self.eval(expr).map(Completion::Normal),

            Stmt::Block { statements } => {
                let mut last = Value::Absence;
                for stmt in statements {
                    last = propagate_return!(self.exec(stmt)?);
                }
                Ok(Completion::Normal(last))
            }
        }
    }

    /// Call a builtin or user function by name with evaluated arguments.
    /// Builtins take precedence.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> InterpResult<Value> {
        if let Some(builtin) = self.builtins.get(name) {
            return builtin(self.out.as_mut(), &args);
        }

        let fn_def = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::unknown_function(name))?;

        self.call_function(&fn_def, args)
    }

    /// Call a user-defined function in a fresh frame
    fn call_function(&mut self, fn_def: &Rc<FnDef>, args: Vec<Value>) -> InterpResult<Value> {
        let expected = fn_def.parameters.len();
        if args.len() < expected {
            return Err(RuntimeError::arity_mismatch(
                &fn_def.name,
                expected,
                args.len(),
            ));
        }
        if args.len() > expected {
            tracing::warn!(
                function = %fn_def.name,
                expected,
                got = args.len(),
                "extra arguments ignored"
            );
        }

        // The top-level frame does not count as a call
        if self.frames.depth() > self.max_call_depth {
            return Err(RuntimeError::stack_overflow(self.max_call_depth));
        }

        let mut frame = Environment::new();
        for (param, arg) in fn_def.parameters.iter().zip(args) {
            frame.define(param.name.clone(), arg);
        }

        let depth = self.frames.push_frame(frame);
        tracing::trace!(function = %fn_def.name, depth, "call");
        let result = self.call_function_inner(fn_def);
        self.frames.pop_frame();
        result
    }

    fn call_function_inner(&mut self, fn_def: &FnDef) -> InterpResult<Value> {
        self.exec(&fn_def.body).map(Completion::into_value)
    }
}
