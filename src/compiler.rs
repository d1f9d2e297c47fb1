//! Compilation pipeline driver
//!
//! `compile(source)` runs lexer, parser, the optional semantic analyzer and the
//! code generator in sequence. Each call is independent; nothing is shared
//! between compilations except the constant translation tables.

use crate::ast::Program;
use crate::codegen::{self, GeneratorOptions, InternalError};
use crate::lexer::{self, LexerError, Position, Token};
use crate::parser::{self, ParseError};
use crate::semantic::{AnalyzerConfig, SemanticAnalyzer, SemanticError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lex,
    Parse,
    Semantic,
    Generate,
    Execute,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lex => "lex",
            Stage::Parse => "parse",
            Stage::Semantic => "semantic",
            Stage::Generate => "generate",
            Stage::Execute => "execute",
        };
        f.write_str(name)
    }
}

/// A compilation failure, tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{0}")]
    Lex(#[from] LexerError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{}", join_lines(.0))]
    Semantic(Vec<SemanticError>),

    #[error("{0}")]
    Internal(#[from] InternalError),
}

fn join_lines(errors: &[SemanticError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl CompileError {
    pub fn stage(&self) -> Stage {
        match self {
            CompileError::Lex(_) => Stage::Lex,
            CompileError::Parse(_) => Stage::Parse,
            CompileError::Semantic(_) => Stage::Semantic,
            CompileError::Internal(_) => Stage::Generate,
        }
    }

    /// Source position of the (first) error; internal errors have none
    pub fn position(&self) -> Option<Position> {
        match self {
            CompileError::Lex(error) => Some(error.position()),
            CompileError::Parse(error) => Some(error.position()),
            CompileError::Semantic(errors) => errors.first().map(SemanticError::position),
            CompileError::Internal(_) => None,
        }
    }
}

/// Everything a successful compilation produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileOutput {
    pub tokens: Vec<Token>,
    pub ast: Program,
    pub generated: String,
}

/// Pipeline configuration, loadable from JSON
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Run the semantic analyzer before generating
    pub analyze: bool,
    /// One level of indentation in the output
    pub indent: String,
    pub analyzer: AnalyzerConfig,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            analyze: false,
            indent: GeneratorOptions::default().indent,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl CompilerOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Configured compiler
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn compile(&self, source: &str) -> Result<CompileOutput, CompileError> {
        let tokens = lexer::tokenize(source)?;
        let ast = parser::parse(&tokens)?;

        if self.options.analyze {
            self.check(&ast)?;
        }

        let generator_options = GeneratorOptions {
            indent: self.options.indent.clone(),
        };
        let generated = codegen::generate_with_options(&ast, &generator_options)?;

        Ok(CompileOutput { tokens, ast, generated })
    }

    /// Run only the semantic analyzer on a parsed program
    pub fn check(&self, ast: &Program) -> Result<(), CompileError> {
        SemanticAnalyzer::with_config(self.options.analyzer.clone())
            .analyze(ast)
            .into_result()
            .map_err(CompileError::Semantic)
    }
}

/// Compile with default options (no semantic analysis)
pub fn compile(source: &str) -> Result<CompileOutput, CompileError> {
    Compiler::default().compile(source)
}
