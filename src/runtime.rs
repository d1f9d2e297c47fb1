//! Execution of compiled programs
//!
//! Running generated JavaScript is delegated to an external `Evaluator`.
//! The runtime I/O helpers the generated code expects (`escreva`, `alerta`)
//! are supplied by a `HostBindings` implementation as a prelude, so the
//! embedding application decides what they do.

use crate::compiler::{CompileError, CompileOutput, Compiler, Stage};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

/// Failures attributed to the evaluator rather than to compilation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Failed to prepare program for execution: {0}")]
    Io(String),

    #[error("Failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("Program exited with {}: {stderr}", exit_status(.code))]
    Failed { code: Option<i32>, stderr: String },
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Compilation or execution failure of `run`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Execution(#[from] ExecutionError),
}

impl RunError {
    pub fn stage(&self) -> Stage {
        match self {
            RunError::Compile(error) => error.stage(),
            RunError::Execution(_) => Stage::Execute,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Everything the program wrote to standard output
    pub output: String,
    pub compiled: CompileOutput,
}

/// Executes JavaScript text and returns its standard output
pub trait Evaluator {
    fn evaluate(&self, program: &str) -> Result<String, ExecutionError>;
}

/// Host functions made available to generated code
pub trait HostBindings {
    /// JavaScript evaluated before the generated program
    fn prelude(&self) -> String;
}

/// `escreva` and `alerta` over the console; existing definitions win
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBindings;

impl HostBindings for ConsoleBindings {
    fn prelude(&self) -> String {
        [
            "if (typeof globalThis.escreva === \"undefined\") {",
            "  const escreva = (...args) => console.log(...args);",
            "  escreva.info = (...args) => console.info(...args);",
            "  escreva.erro = (...args) => console.error(...args);",
            "  escreva.warn = (...args) => console.warn(...args);",
            "  escreva.debug = (...args) => console.debug(...args);",
            "  globalThis.escreva = escreva;",
            "}",
            "if (typeof globalThis.alert === \"undefined\") {",
            "  globalThis.alert = (...args) => console.log(...args);",
            "}",
            "if (typeof globalThis.alerta === \"undefined\") {",
            "  globalThis.alerta = (...args) => globalThis.alert(...args);",
            "}",
        ]
        .join("\n")
    }
}

/// Runs programs with Node.js through a temporary script file
#[derive(Debug, Clone)]
pub struct NodeEvaluator {
    /// Executable to invoke
    pub program: PathBuf,
    /// Arguments placed before the script path
    pub args: Vec<String>,
}

impl Default for NodeEvaluator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl NodeEvaluator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }
}

impl Evaluator for NodeEvaluator {
    fn evaluate(&self, program: &str) -> Result<String, ExecutionError> {
        let mut script = tempfile::Builder::new()
            .prefix("vjs-")
            .suffix(".js")
            .tempfile()
            .map_err(|e| ExecutionError::Io(e.to_string()))?;
        script
            .write_all(program.as_bytes())
            .and_then(|_| script.flush())
            .map_err(|e| ExecutionError::Io(e.to_string()))?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(script.path());
        log::trace!("executing {:?}", cmd);

        let output = cmd.output().map_err(|e| ExecutionError::Spawn {
            program: self.program.display().to_string(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Compile and execute with explicit collaborators
pub fn run_with<E, B>(compiler: &Compiler, bindings: &B, evaluator: &E, source: &str) -> Result<Execution, RunError>
where
    E: Evaluator + ?Sized,
    B: HostBindings + ?Sized,
{
    let compiled = compiler.compile(source)?;
    let program = format!("{}\n{}\n", bindings.prelude(), compiled.generated);
    log::debug!("evaluating {} bytes of JavaScript", program.len());

    let output = evaluator.evaluate(&program)?;
    Ok(Execution { output, compiled })
}

/// Compile with default options and execute with the console bindings
pub fn run<E: Evaluator + ?Sized>(source: &str, evaluator: &E) -> Result<Execution, RunError> {
    run_with(&Compiler::default(), &ConsoleBindings, evaluator, source)
}
