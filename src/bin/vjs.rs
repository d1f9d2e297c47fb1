//! VJS command-line front end
//!
//! Usage: vjs <compile|tokens|ast|check|run> <file | -e SRC> [options]

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use vjs::compiler::{CompileError, Compiler, CompilerOptions};
use vjs::runtime::{self, ConsoleBindings, NodeEvaluator, RunError};

#[derive(Parser)]
#[command(name = "vjs")]
#[command(author, version, about = "VJS to JavaScript transpiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a program to JavaScript
    Compile {
        #[command(flatten)]
        input: Input,

        /// Write the JavaScript here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run the semantic analyzer first
        #[arg(long)]
        check: bool,

        /// Compiler options as JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Dump the token stream as JSON
    Tokens {
        #[command(flatten)]
        input: Input,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Dump the syntax tree as JSON
    Ast {
        #[command(flatten)]
        input: Input,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Report every semantic diagnostic
    Check {
        #[command(flatten)]
        input: Input,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compile and execute with Node.js
    Run {
        #[command(flatten)]
        input: Input,

        /// Node executable
        #[arg(long, default_value = "node")]
        node: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Input {
    /// Source file
    #[arg(required_unless_present = "eval", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Inline source text
    #[arg(short = 'e', long = "eval", value_name = "SRC")]
    eval: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("[io] {path}: {message}")]
    Io { path: String, message: String },

    #[error("[config] {0}")]
    Config(String),

    #[error("[{}] {}", .0.stage(), .0)]
    Compile(#[from] CompileError),

    #[error("[{}] {}", .0.stage(), .0)]
    Run(#[from] RunError),

    #[error("[json] {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            check,
            config,
        } => compile(&input, output.as_deref(), check, config.as_deref()),
        Commands::Tokens { input, pretty } => dump_tokens(&input, pretty),
        Commands::Ast { input, pretty } => dump_ast(&input, pretty),
        Commands::Check { input, config } => check(&input, config.as_deref()),
        Commands::Run { input, node, config } => run(&input, node, config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn io_error(path: &Path, error: std::io::Error) -> CliError {
    CliError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

fn read_source(input: &Input) -> Result<String, CliError> {
    match (&input.eval, &input.file) {
        (Some(source), _) => Ok(source.clone()),
        (None, Some(path)) => fs::read_to_string(path).map_err(|e| io_error(path, e)),
        (None, None) => Err(CliError::Config("no input given".to_string())),
    }
}

fn load_options(config: Option<&Path>) -> Result<CompilerOptions, CliError> {
    let Some(path) = config else {
        return Ok(CompilerOptions::default());
    };
    let json = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    CompilerOptions::from_json(&json).map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn compile(input: &Input, output: Option<&Path>, check: bool, config: Option<&Path>) -> Result<(), CliError> {
    let mut options = load_options(config)?;
    options.analyze |= check;

    let source = read_source(input)?;
    let compiled = Compiler::new(options).compile(&source)?;

    match output {
        Some(path) => fs::write(path, format!("{}\n", compiled.generated)).map_err(|e| io_error(path, e))?,
        None => println!("{}", compiled.generated),
    }
    Ok(())
}

fn dump_tokens(input: &Input, pretty: bool) -> Result<(), CliError> {
    let source = read_source(input)?;
    let tokens = vjs::lexer::tokenize(&source).map_err(CompileError::from)?;
    println!("{}", to_json(&tokens, pretty)?);
    Ok(())
}

fn dump_ast(input: &Input, pretty: bool) -> Result<(), CliError> {
    let source = read_source(input)?;
    let tokens = vjs::lexer::tokenize(&source).map_err(CompileError::from)?;
    let program = vjs::parser::parse(&tokens).map_err(CompileError::from)?;
    println!("{}", to_json(&program, pretty)?);
    Ok(())
}

fn check(input: &Input, config: Option<&Path>) -> Result<(), CliError> {
    let compiler = Compiler::new(load_options(config)?);
    let source = read_source(input)?;

    let tokens = vjs::lexer::tokenize(&source).map_err(CompileError::from)?;
    let program = vjs::parser::parse(&tokens).map_err(CompileError::from)?;
    compiler.check(&program)?;

    println!("no problems found");
    Ok(())
}

fn run(input: &Input, node: PathBuf, config: Option<&Path>) -> Result<(), CliError> {
    let compiler = Compiler::new(load_options(config)?);
    let source = read_source(input)?;

    let execution = runtime::run_with(&compiler, &ConsoleBindings, &NodeEvaluator::new(node), &source)?;
    print!("{}", execution.output);
    Ok(())
}
