//! Expression evaluator

use super::builtins::Builtins;
use super::env::CallStack;
use super::error::{InterpResult, RuntimeError};
use super::value::{Mapping, Value};
use crate::ast::{BinOp, Expr, FnDef, LiteralKind, UnOp};
use crate::config::RunConfig;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

/// Stack growth parameters for deep recursion
pub(super) const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
pub(super) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter
pub struct Interpreter {
    /// Call frames; index 0 is the top-level program frame
    pub(super) frames: CallStack,
    /// User-defined functions, last definition wins
    pub(super) functions: HashMap<String, Rc<FnDef>>,
    /// Builtin functions
    pub(super) builtins: Builtins,
    /// Sink for `print`
    pub(super) out: Box<dyn Write>,
    /// Maximum number of active user-function calls
    pub(super) max_call_depth: usize,
}

impl Interpreter {
    /// Create a new interpreter printing to stdout
    pub fn new() -> Self {
        Self::with_config(&RunConfig::default())
    }

    pub fn with_config(config: &RunConfig) -> Self {
        Interpreter {
            frames: CallStack::new(),
            functions: HashMap::new(),
            builtins: Builtins::standard(),
            out: Box::new(io::stdout()),
            max_call_depth: config.max_call_depth,
        }
    }

    /// Redirect `print` output
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    /// Evaluate an expression against the current frame
    pub fn evaluate(&mut self, expr: &Expr) -> InterpResult<Value> {
        self.eval(expr)
    }

    /// Read a binding from the current frame
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.get(name)
    }

    /// Number of live frames (1 when no call is active)
    pub fn call_depth(&self) -> usize {
        self.frames.depth()
    }

    /// Register a function, replacing any earlier definition of the same name
    pub fn define_function(&mut self, fn_def: FnDef) {
        let name = fn_def.name.clone();
        let replaced = self
            .functions
            .insert(name.clone(), Rc::new(fn_def))
            .is_some();
        tracing::debug!(function = %name, replaced, "function registered");
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    pub(super) fn eval(&mut self, expr: &Expr) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &Expr) -> InterpResult<Value> {
        match expr {
            Expr::Literal { value, kind } => eval_literal(value, *kind),

            Expr::Identifier { name } => self
                .frames
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::unbound_name(name)),

            Expr::BinaryOp {
                operator,
                left,
                right,
            } => {
                // Short-circuit evaluation for logical operators
                match operator {
                    BinOp::And => {
                        let lval = self.eval(left)?;
                        if !lval.is_truthy() {
                            return Ok(Value::Bool(false));
                        }
                        let rval = self.eval(right)?;
                        Ok(Value::Bool(rval.is_truthy()))
                    }
                    BinOp::Or => {
                        let lval = self.eval(left)?;
                        if lval.is_truthy() {
                            return Ok(Value::Bool(true));
                        }
                        let rval = self.eval(right)?;
                        Ok(Value::Bool(rval.is_truthy()))
                    }
                    _ => {
                        let lval = self.eval(left)?;
                        let rval = self.eval(right)?;
                        eval_binary(*operator, lval, rval)
                    }
                }
            }

            Expr::UnaryOp { operator, operand } => {
                let val = self.eval(operand)?;
                eval_unary(*operator, val)
            }

            Expr::FunctionCall { name, arguments } => {
                let args = arguments
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<InterpResult<Vec<_>>>()?;
                self.call(name, args)
            }

            Expr::Index { base, index } => {
                let base = self.eval(base)?;
                let index = self.eval(index)?;
                eval_index(base, index)
            }

            Expr::Sequence { elements } => elements
                .iter()
                .map(|e| self.eval(e))
                .collect::<InterpResult<Vec<_>>>()
                .map(Value::Sequence),

            Expr::Mapping { entries } => {
                let mut map = Mapping::new();
                for entry in entries {
                    let value = self.eval(&entry.value)?;
                    map.insert(entry.key.clone(), value);
                }
                Ok(Value::Mapping(map))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a literal node into a value, checking the payload fits the kind
fn eval_literal(value: &serde_json::Value, kind: LiteralKind) -> InterpResult<Value> {
    use serde_json::Value as Json;

    match (kind, value) {
        (LiteralKind::Number, Json::Number(n)) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| RuntimeError::malformed_ast(&format!("number literal out of range: {n}"))),
        (LiteralKind::Number, Json::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| RuntimeError::malformed_ast(&format!("invalid number literal: {s:?}"))),
        (LiteralKind::Text, Json::String(s)) => Ok(Value::Text(s.clone())),
        (LiteralKind::Boolean, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (LiteralKind::Boolean, Json::String(s)) if s == "true" || s == "false" => {
            Ok(Value::Bool(s == "true"))
        }
        (LiteralKind::Absence, _) => Ok(Value::Absence),
        (kind, other) => Err(RuntimeError::malformed_ast(&format!(
            "{kind:?} literal cannot hold {other}"
        ))),
    }
}

/// Evaluate binary operation
fn eval_binary(op: BinOp, left: Value, right: Value) -> InterpResult<Value> {
    match op {
        // Arithmetic
        BinOp::Add => arithmetic(op, &left, &right, |a, b| Ok(a + b)),
        BinOp::Sub => arithmetic(op, &left, &right, |a, b| Ok(a - b)),
        BinOp::Mul => arithmetic(op, &left, &right, |a, b| Ok(a * b)),
        BinOp::Div => arithmetic(op, &left, &right, |a, b| {
            if b == 0.0 {
                Err(RuntimeError::division_by_zero())
            } else {
                Ok(a / b)
            }
        }),
        BinOp::Mod => arithmetic(op, &left, &right, |a, b| {
            if b == 0.0 {
                Err(RuntimeError::division_by_zero())
            } else {
                Ok(a % b)
            }
        }),

        // Comparison
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Ne => Ok(Value::Bool(left != right)),
        BinOp::Lt => compare_values(op, &left, &right, Ordering::is_lt),
        BinOp::Gt => compare_values(op, &left, &right, Ordering::is_gt),
        BinOp::Le => compare_values(op, &left, &right, Ordering::is_le),
        BinOp::Ge => compare_values(op, &left, &right, Ordering::is_ge),

        BinOp::And | BinOp::Or => {
            unreachable!("logical operators are short-circuited in eval_inner")
        }
    }
}

fn arithmetic<F>(op: BinOp, left: &Value, right: &Value, f: F) -> InterpResult<Value>
where
    F: Fn(f64, f64) -> InterpResult<f64>,
{
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => f(*a, *b).map(Value::Number),
        _ => Err(RuntimeError::type_error(
            "number",
            &format!("{} {op} {}", left.type_name(), right.type_name()),
        )),
    }
}

/// Compare two numbers or two texts; NaN compares false with everything
fn compare_values<F>(op: BinOp, left: &Value, right: &Value, f: F) -> InterpResult<Value>
where
    F: Fn(Ordering) -> bool,
{
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => {
            return Err(RuntimeError::type_error(
                "number or text on both sides",
                &format!("{} {op} {}", left.type_name(), right.type_name()),
            ));
        }
    };
    Ok(Value::Bool(ordering.is_some_and(f)))
}

/// Evaluate unary operation
fn eval_unary(op: UnOp, val: Value) -> InterpResult<Value> {
    match op {
        UnOp::Neg => match val {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(RuntimeError::type_error("number", val.type_name())),
        },
        UnOp::Not => Ok(Value::Bool(!val.is_truthy())),
    }
}

/// Sequence indexing truncates the index toward zero; negative indexes count
/// from the end.
fn eval_index(base: Value, index: Value) -> InterpResult<Value> {
    match (base, index) {
        (Value::Sequence(mut items), Value::Number(i)) => {
            let len = items.len();
            let pos = i.trunc();
            let resolved = if pos < 0.0 { len as f64 + pos } else { pos };
            if !resolved.is_finite() || resolved < 0.0 || resolved >= len as f64 {
                return Err(RuntimeError::index_out_of_bounds(i, len));
            }
            Ok(items.swap_remove(resolved as usize))
        }
        (Value::Mapping(map), Value::Text(key)) => map
            .get(&key)
            .cloned()
            .ok_or_else(|| RuntimeError::key_not_found(&key)),
        (base, index) => Err(RuntimeError::type_error(
            "sequence[number] or mapping[text]",
            &format!("{}[{}]", base.type_name(), index.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;
    use serde_json::json;

    fn num(n: f64) -> Expr {
        Expr::number(n)
    }

    fn eval(expr: &Expr) -> InterpResult<Value> {
        Interpreter::new().evaluate(expr)
    }

    #[test]
    fn test_eval_literals() {
        assert_eq!(eval(&num(42.0)).unwrap(), Value::Number(42.0));
        assert_eq!(eval(&Expr::boolean(true)).unwrap(), Value::Bool(true));
        assert_eq!(eval(&Expr::text("hi")).unwrap(), Value::from("hi"));
        assert_eq!(eval(&Expr::absence()).unwrap(), Value::Absence);
    }

    #[test]
    fn test_number_literal_from_text() {
        let expr = Expr::Literal {
            value: json!("2.5"),
            kind: LiteralKind::Number,
        };
        assert_eq!(eval(&expr).unwrap(), Value::Number(2.5));
    }

    #[test]
    fn test_malformed_literal() {
        let expr = Expr::Literal {
            value: json!(true),
            kind: LiteralKind::Number,
        };
        assert_eq!(eval(&expr).unwrap_err().kind, ErrorKind::MalformedAst);

        let expr = Expr::Literal {
            value: json!(3),
            kind: LiteralKind::Text,
        };
        assert_eq!(eval(&expr).unwrap_err().kind, ErrorKind::MalformedAst);
    }

    #[test]
    fn test_precedence_tree() {
        // 3 + 4 * 2
        let expr = Expr::binary(
            BinOp::Add,
            num(3.0),
            Expr::binary(BinOp::Mul, num(4.0), num(2.0)),
        );
        assert_eq!(eval(&expr).unwrap(), Value::Number(11.0));
    }

    #[test]
    fn test_float_arithmetic() {
        let expr = Expr::binary(BinOp::Div, num(7.0), num(2.0));
        assert_eq!(eval(&expr).unwrap(), Value::Number(3.5));
        let expr = Expr::binary(BinOp::Sub, num(0.1), num(0.3));
        assert_eq!(eval(&expr).unwrap(), Value::Number(0.1 - 0.3));
    }

    #[test]
    fn test_remainder_follows_dividend() {
        let expr = Expr::binary(BinOp::Mod, num(-7.0), num(3.0));
        assert_eq!(eval(&expr).unwrap(), Value::Number(-1.0));
    }

    #[test]
    fn test_division_by_zero() {
        let expr = Expr::binary(BinOp::Div, num(10.0), num(0.0));
        assert_eq!(eval(&expr).unwrap_err().kind, ErrorKind::DivisionByZero);
        let expr = Expr::binary(BinOp::Mod, num(10.0), num(0.0));
        assert_eq!(eval(&expr).unwrap_err().kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_arithmetic_type_error() {
        let expr = Expr::binary(BinOp::Add, Expr::text("a"), num(1.0));
        let err = eval(&expr).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert!(err.message.contains("text + number"));
    }

    #[test]
    fn test_comparisons() {
        let lt = Expr::binary(BinOp::Lt, num(1.0), num(2.0));
        assert_eq!(eval(&lt).unwrap(), Value::Bool(true));
        let ge = Expr::binary(BinOp::Ge, Expr::text("apple"), Expr::text("banana"));
        assert_eq!(eval(&ge).unwrap(), Value::Bool(false));
        let nan = Expr::Literal {
            value: json!("NaN"),
            kind: LiteralKind::Number,
        };
        let le = Expr::binary(BinOp::Le, nan, num(0.0));
        assert_eq!(eval(&le).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_cross_kind_ordering_fails() {
        let expr = Expr::binary(BinOp::Lt, num(1.0), Expr::text("2"));
        assert_eq!(eval(&expr).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_cross_kind_equality() {
        let eq = Expr::binary(BinOp::Eq, num(1.0), Expr::text("1"));
        assert_eq!(eval(&eq).unwrap(), Value::Bool(false));
        let ne = Expr::binary(BinOp::Ne, Expr::absence(), Expr::boolean(false));
        assert_eq!(eval(&ne).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_short_circuit_and() {
        // false && (1/0): the right side must not run
        let expr = Expr::binary(
            BinOp::And,
            Expr::boolean(false),
            Expr::binary(BinOp::Div, num(1.0), num(0.0)),
        );
        assert_eq!(eval(&expr).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_short_circuit_or() {
        let expr = Expr::binary(
            BinOp::Or,
            Expr::boolean(true),
            Expr::ident("never_bound"),
        );
        assert_eq!(eval(&expr).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_logical_evaluates_right_when_needed() {
        let expr = Expr::binary(BinOp::And, Expr::boolean(true), Expr::text(""));
        assert_eq!(eval(&expr).unwrap(), Value::Bool(false));
        let expr = Expr::binary(BinOp::Or, num(0.0), Expr::ident("missing"));
        assert_eq!(eval(&expr).unwrap_err().kind, ErrorKind::UnboundName);
    }

    #[test]
    fn test_unary() {
        let neg = Expr::unary(UnOp::Neg, num(42.0));
        assert_eq!(eval(&neg).unwrap(), Value::Number(-42.0));
        let not = Expr::unary(UnOp::Not, Expr::text(""));
        assert_eq!(eval(&not).unwrap(), Value::Bool(true));
        let bad = Expr::unary(UnOp::Neg, Expr::boolean(true));
        assert_eq!(eval(&bad).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_unbound_identifier() {
        let err = eval(&Expr::ident("x")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnboundName);
        assert!(err.message.contains('x'));
    }

    #[test]
    fn test_unknown_function() {
        let err = eval(&Expr::call("nope", vec![num(1.0)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownFunction);
    }

    #[test]
    fn test_builtin_call() {
        let seq = Expr::Sequence {
            elements: vec![num(1.0), num(2.0), num(3.5)],
        };
        assert_eq!(
            eval(&Expr::call("sum", vec![seq])).unwrap(),
            Value::Number(6.5)
        );
    }

    #[test]
    fn test_index_sequence() {
        let seq = || Expr::Sequence {
            elements: vec![Expr::text("a"), Expr::text("b"), Expr::text("c")],
        };
        let at = |i: f64| Expr::Index {
            base: Box::new(seq()),
            index: Box::new(num(i)),
        };
        assert_eq!(eval(&at(0.0)).unwrap(), Value::from("a"));
        assert_eq!(eval(&at(1.9)).unwrap(), Value::from("b"));
        assert_eq!(eval(&at(-1.0)).unwrap(), Value::from("c"));
        assert_eq!(eval(&at(3.0)).unwrap_err().kind, ErrorKind::IndexOutOfBounds);
        assert_eq!(eval(&at(-4.0)).unwrap_err().kind, ErrorKind::IndexOutOfBounds);
    }

    #[test]
    fn test_index_mapping() {
        let map = || Expr::Mapping {
            entries: vec![crate::ast::MapEntry {
                key: "name".to_string(),
                value: Expr::text("ana"),
            }],
        };
        let get = |k: &str| Expr::Index {
            base: Box::new(map()),
            index: Box::new(Expr::text(k)),
        };
        assert_eq!(eval(&get("name")).unwrap(), Value::from("ana"));
        assert_eq!(eval(&get("age")).unwrap_err().kind, ErrorKind::KeyNotFound);
    }

    #[test]
    fn test_index_type_error() {
        let expr = Expr::Index {
            base: Box::new(num(1.0)),
            index: Box::new(num(0.0)),
        };
        assert_eq!(eval(&expr).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_mapping_duplicate_keys() {
        let expr = Expr::Mapping {
            entries: vec![
                crate::ast::MapEntry {
                    key: "a".to_string(),
                    value: num(1.0),
                },
                crate::ast::MapEntry {
                    key: "b".to_string(),
                    value: num(2.0),
                },
                crate::ast::MapEntry {
                    key: "a".to_string(),
                    value: num(3.0),
                },
            ],
        };
        let Value::Mapping(map) = eval(&expr).unwrap() else {
            panic!("expected mapping");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::Number(3.0)));
    }
}
