//! Axis interpreter library
//!
//! Executes Axis programs delivered as JSON syntax trees.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod logging;

pub use config::RunConfig;
pub use error::{AxisError, Result};

use std::path::Path;

/// Load a JSON program from disk without running it
pub fn load_program(path: &Path) -> Result<ast::Program> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| AxisError::io_error(format!("{}: {e}", path.display())))?;
    Ok(ast::Program::from_json(&source)?)
}

/// Load and execute a JSON program file, printing to stdout
pub fn run_file(path: &Path, config: &RunConfig) -> Result<interp::Value> {
    let program = load_program(path)?;
    tracing::info!(
        file = %path.display(),
        statements = program.statements.len(),
        "running program"
    );
    let mut interp = interp::Interpreter::with_config(config);
    Ok(interp.execute(&program)?)
}

/// Parse and execute a JSON program held in memory
pub fn run_code(source: &str) -> Result<interp::Value> {
    let program = ast::Program::from_json(source)?;
    let mut interp = interp::Interpreter::new();
    Ok(interp.execute(&program)?)
}
