//! Axis interpreter CLI

use axis::RunConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "axis", version, about = "Axis - tree-walking interpreter")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a program
    Run {
        /// JSON syntax tree to execute
        file: PathBuf,
        /// Print the final value of the program
        #[arg(long)]
        show_result: bool,
        /// Maximum nested function calls
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
        /// TOML run configuration
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Validate a program without executing it
    Check {
        /// JSON syntax tree to check
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    axis::logging::init(cli.verbose);

    let result = match cli.command {
        Command::Run {
            file,
            show_result,
            max_depth,
            config,
        } => run_file(&file, show_result, max_depth, config.as_ref()),
        Command::Check { file } => check_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_file(
    path: &PathBuf,
    show_result: bool,
    max_depth: Option<usize>,
    config_path: Option<&PathBuf>,
) -> axis::Result<()> {
    let mut config = match config_path {
        Some(p) => RunConfig::load(p)?,
        None => RunConfig::new(),
    };
    if let Some(depth) = max_depth {
        config = config.max_call_depth(depth);
    }
    if show_result {
        config = config.show_result(true);
    }

    let value = axis::run_file(path, &config)?;
    if config.show_result && !value.is_absent() {
        println!("Result: {value}");
    }
    Ok(())
}

fn check_file(path: &PathBuf) -> axis::Result<()> {
    let program = axis::load_program(path)?;
    println!(
        "✓ {} is a well-formed program ({} function(s))",
        path.display(),
        program.function_count()
    );
    Ok(())
}
