//! Semantic Analysis Module for VJS
//!
//! Optional checking pass between parsing and generation:
//! - Scope management and identifier resolution
//! - Type annotation validation against builtin and declared class types
//! - Batch error reporting

pub mod analyzer;
pub mod scope;

pub use analyzer::{AnalysisResult, AnalysisStats, AnalyzerConfig, SemanticAnalyzer, SemanticError};
pub use scope::{ScopeKind, ScopeStack};

use crate::ast::Program;

/// Analyze a program with the default configuration
pub fn analyze(program: &Program) -> Result<(), Vec<SemanticError>> {
    SemanticAnalyzer::new().analyze(program).into_result()
}

/// Analyze a program with an explicit configuration
pub fn analyze_with_config(program: &Program, config: &AnalyzerConfig) -> Result<(), Vec<SemanticError>> {
    SemanticAnalyzer::with_config(config.clone()).analyze(program).into_result()
}
