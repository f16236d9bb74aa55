//! Builtin function registry
//!
//! Builtins are resolved before user functions and cannot be shadowed.

use super::csv;
use super::error::{InterpResult, RuntimeError};
use super::value::{Mapping, Value};
use std::collections::HashMap;
use std::io::Write;

/// Builtin function type; `out` is the interpreter's console sink
pub type BuiltinFn = fn(out: &mut dyn Write, args: &[Value]) -> InterpResult<Value>;

/// Fixed table of host-provided functions
#[derive(Debug, Clone)]
pub struct Builtins {
    table: HashMap<&'static str, BuiltinFn>,
}

impl Builtins {
    /// The standard registry: console output, CSV I/O and aggregation
    pub fn standard() -> Self {
        let mut table: HashMap<&'static str, BuiltinFn> = HashMap::new();
        table.insert("print", builtin_print);
        table.insert("read_csv", builtin_read_csv);
        table.insert("write_csv", builtin_write_csv);
        table.insert("len", builtin_len);
        table.insert("sum", builtin_sum);
        table.insert("max", builtin_max);
        table.insert("min", builtin_min);
        Builtins { table }
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.table.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.table.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fail on too few arguments; note and ignore any beyond `max`
fn check_arity(name: &str, args: &[Value], min: usize, max: usize) -> InterpResult<()> {
    if args.len() < min {
        return Err(RuntimeError::arity_mismatch(name, min, args.len()));
    }
    if args.len() > max {
        tracing::warn!(
            function = name,
            expected = max,
            got = args.len(),
            "extra arguments ignored"
        );
    }
    Ok(())
}

fn io_failure(err: std::io::Error) -> RuntimeError {
    RuntimeError::io_error(&err.to_string())
}

/// print(...) -> absence
/// Writes the arguments separated by one space, then a newline.
fn builtin_print(out: &mut dyn Write, args: &[Value]) -> InterpResult<Value> {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{line}").map_err(io_failure)?;
    out.flush().map_err(io_failure)?;
    Ok(Value::Absence)
}

/// read_csv(path) -> sequence of mappings
/// File errors are reported and yield an empty sequence.
fn builtin_read_csv(_out: &mut dyn Write, args: &[Value]) -> InterpResult<Value> {
    check_arity("read_csv", args, 1, 1)?;
    let path = args[0]
        .as_text()
        .ok_or_else(|| RuntimeError::type_error("text path", args[0].type_name()))?;

    match csv::read(path) {
        Ok(rows) => Ok(Value::Sequence(rows.into_iter().map(Value::Mapping).collect())),
        Err(e) => {
            let err = RuntimeError::io_error(&format!("read_csv '{path}': {e}"));
            tracing::error!(kind = ?err.kind, "{}", err.message);
            Ok(Value::Sequence(Vec::new()))
        }
    }
}

/// write_csv(path, rows, fields?) -> absence
/// Without `fields`, the header is the first row's key order.
/// File errors are reported and otherwise ignored.
fn builtin_write_csv(_out: &mut dyn Write, args: &[Value]) -> InterpResult<Value> {
    check_arity("write_csv", args, 2, 3)?;
    let path = args[0]
        .as_text()
        .ok_or_else(|| RuntimeError::type_error("text path", args[0].type_name()))?;

    let Value::Sequence(items) = &args[1] else {
        return Err(RuntimeError::type_error(
            "sequence of mappings",
            args[1].type_name(),
        ));
    };
    let rows = items
        .iter()
        .map(|item| match item {
            Value::Mapping(map) => Ok(map),
            other => Err(RuntimeError::type_error("mapping row", other.type_name())),
        })
        .collect::<InterpResult<Vec<&Mapping>>>()?;

    let fields: Vec<String> = match args.get(2) {
        Some(Value::Sequence(names)) => names
            .iter()
            .map(|name| {
                name.as_text()
                    .map(String::from)
                    .ok_or_else(|| RuntimeError::type_error("text field name", name.type_name()))
            })
            .collect::<InterpResult<_>>()?,
        Some(Value::Absence) | None => rows
            .first()
            .map(|row| row.keys().map(String::from).collect())
            .unwrap_or_default(),
        Some(other) => {
            return Err(RuntimeError::type_error(
                "sequence of field names",
                other.type_name(),
            ));
        }
    };

    if let Err(e) = csv::write(path, &fields, &rows) {
        let err = RuntimeError::io_error(&format!("write_csv '{path}': {e}"));
        tracing::error!(kind = ?err.kind, "{}", err.message);
    }
    Ok(Value::Absence)
}

/// len(collection) -> number
/// Element count of a sequence or mapping, 0 for anything else.
fn builtin_len(_out: &mut dyn Write, args: &[Value]) -> InterpResult<Value> {
    check_arity("len", args, 1, 1)?;
    let n = match &args[0] {
        Value::Sequence(items) => items.len(),
        Value::Mapping(map) => map.len(),
        _ => 0,
    };
    Ok(Value::Number(n as f64))
}

fn numbers(name: &str, args: &[Value]) -> InterpResult<Vec<f64>> {
    check_arity(name, args, 1, 1)?;
    let Value::Sequence(items) = &args[0] else {
        return Err(RuntimeError::type_error(
            "sequence of numbers",
            args[0].type_name(),
        ));
    };
    items
        .iter()
        .map(|v| {
            v.as_number()
                .ok_or_else(|| RuntimeError::type_error("number", v.type_name()))
        })
        .collect()
}

/// sum(sequence) -> number; 0 for an empty sequence
fn builtin_sum(_out: &mut dyn Write, args: &[Value]) -> InterpResult<Value> {
    let nums = numbers("sum", args)?;
    Ok(Value::Number(nums.iter().fold(0.0, |acc, n| acc + n)))
}

/// max(sequence) -> number; absence for an empty sequence
fn builtin_max(_out: &mut dyn Write, args: &[Value]) -> InterpResult<Value> {
    let nums = numbers("max", args)?;
    Ok(nums
        .into_iter()
        .reduce(f64::max)
        .map_or(Value::Absence, Value::Number))
}

/// min(sequence) -> number; absence for an empty sequence
fn builtin_min(_out: &mut dyn Write, args: &[Value]) -> InterpResult<Value> {
    let nums = numbers("min", args)?;
    Ok(nums
        .into_iter()
        .reduce(f64::min)
        .map_or(Value::Absence, Value::Number))
}
