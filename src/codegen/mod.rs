//! Code Generation Module for VJS
//!
//! Walks the AST and emits JavaScript source text.
//!
//! Architecture:
//! - CodegenContext: generation options and metrics shared by the generators
//! - CodeBuilder: line-oriented output with scoped indentation
//! - Generators per concern: expressions, statements, items (functions and classes)
//! - mappings: identifier/property/method translation tables

use crate::ast::Program;
use serde::Deserialize;
use thiserror::Error;

pub mod expressions;
pub mod items;
pub mod mappings;
pub mod statements;

pub use expressions::ExpressionGenerator;
pub use items::ItemGenerator;
pub use statements::StatementGenerator;

/// Result type for code generation operations
pub type CodegenResult<T> = Result<T, InternalError>;

/// An AST shape the parser never produces reached the generator.
///
/// This is a contract violation between parser and generator, not a
/// user-facing error, so it carries the node kind instead of a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Internal compiler error: cannot generate {node_kind}: {reason}")]
pub struct InternalError {
    pub node_kind: String,
    pub reason: String,
}

impl InternalError {
    pub fn new(node_kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            node_kind: node_kind.into(),
            reason: reason.into(),
        }
    }
}

/// Output formatting options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// One level of indentation
    pub indent: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

/// Code generation context - tracks state during generation
#[derive(Debug, Default)]
pub struct CodegenContext {
    pub options: GeneratorOptions,
    pub metrics: CodegenMetrics,
}

impl CodegenContext {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            metrics: CodegenMetrics::default(),
        }
    }

    /// A fresh builder sharing this context's indent unit
    pub fn builder_at(&self, indent_level: usize) -> CodeBuilder {
        CodeBuilder::with_indent(self.options.indent.clone(), indent_level)
    }
}

/// Line-oriented JavaScript builder with proper formatting
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_unit: String,
    indent_level: usize,
    code: String,
    /// Code length right after each open block's header line
    open_marks: Vec<usize>,
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBuilder {
    /// Create a new code builder with a two-space indent
    pub fn new() -> Self {
        Self::with_indent("  ".to_string(), 0)
    }

    pub fn with_indent(indent_unit: String, indent_level: usize) -> Self {
        Self {
            indent_unit,
            indent_level,
            code: String::new(),
            open_marks: Vec::new(),
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Add a line with proper indentation
    pub fn line(&mut self, text: &str) {
        self.indent();
        self.code.push_str(text);
        self.newline();
    }

    /// Add text without newline
    pub fn push_str(&mut self, text: &str) {
        self.code.push_str(text);
    }

    /// Add indentation
    pub fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.code.push_str(&self.indent_unit);
        }
    }

    /// Add newline
    pub fn newline(&mut self) {
        self.code.push('\n');
    }

    /// Increase indentation
    pub fn indent_inc(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation
    pub fn indent_dec(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Add a block with automatic indentation. The block is closed and the
    /// level restored whatever `f` returns.
    pub fn block<T, E>(&mut self, header: &str, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        self.open_block(header);
        let result = f(self);
        self.close_block();
        result
    }

    /// Write `header {` and increase indentation
    pub fn open_block(&mut self, header: &str) {
        if header.is_empty() {
            self.line("{");
        } else {
            self.line(&format!("{} {{", header));
        }
        self.open_marks.push(self.code.len());
        self.indent_inc();
    }

    /// Decrease indentation and close the innermost block
    pub fn close_block(&mut self) {
        self.close_block_with("");
    }

    /// Close the innermost block with text after the brace, such as `;`.
    /// A block that received no lines collapses to `{}`.
    pub fn close_block_with(&mut self, trailer: &str) {
        self.indent_dec();
        let mark = self.open_marks.pop();
        if mark == Some(self.code.len()) {
            self.code.pop();
            self.code.push('}');
            self.code.push_str(trailer);
            self.newline();
        } else {
            self.line(&format!("}}{}", trailer));
        }
    }

    /// Close the innermost block and open another on the same line,
    /// as in `} else {`
    pub fn reopen_block(&mut self, header: &str) {
        self.close_block_with(&format!(" {} {{", header));
        self.open_marks.push(self.code.len());
        self.indent_inc();
    }

    /// Get the generated code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Generated code without the final newline, for embedding in a line
    pub fn build(self) -> String {
        let mut code = self.code;
        if code.ends_with('\n') {
            code.pop();
        }
        code
    }
}

/// Performance metrics for code generation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CodegenMetrics {
    pub statements_generated: usize,
    pub expressions_generated: usize,
}

impl CodegenMetrics {
    pub fn record_statement(&mut self) {
        self.statements_generated += 1;
    }

    pub fn record_expression(&mut self) {
        self.expressions_generated += 1;
    }
}

/// JavaScript generator for whole programs
#[derive(Debug, Default)]
pub struct JsGenerator {
    context: CodegenContext,
}

impl JsGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            context: CodegenContext::new(options),
        }
    }

    /// Generate the program text. Top-level statements are separated by a
    /// newline and the result has no trailing newline.
    pub fn generate(&mut self, program: &Program) -> CodegenResult<String> {
        let mut builder = self.context.builder_at(0);
        {
            let mut statements = StatementGenerator::new(&mut self.context);
            for stmt in &program.body {
                statements.generate_statement(stmt, &mut builder)?;
            }
        }

        let code = builder.build();
        log::debug!(
            "generated {} bytes ({} statements, {} expressions)",
            code.len(),
            self.context.metrics.statements_generated,
            self.context.metrics.expressions_generated
        );
        Ok(code)
    }

    pub fn metrics(&self) -> CodegenMetrics {
        self.context.metrics
    }
}

/// Generate JavaScript with the default options
pub fn generate(program: &Program) -> CodegenResult<String> {
    JsGenerator::default().generate(program)
}

/// Generate JavaScript with explicit options
pub fn generate_with_options(program: &Program, options: &GeneratorOptions) -> CodegenResult<String> {
    JsGenerator::new(options.clone()).generate(program)
}

#[cfg(test)]
mod tests;
