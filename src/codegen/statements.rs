//! Statement Code Generation for VJS
//!
//! Statements are written line by line into a `CodeBuilder`. Bodies of
//! `se`/`enquanto`/`para` are always emitted as braced blocks, and `senao se`
//! chains flatten into `else if`.

use super::{CodeBuilder, CodegenContext, CodegenResult, ExpressionGenerator, InternalError, ItemGenerator};
use crate::ast::*;

/// Statement code generator
pub struct StatementGenerator<'a> {
    /// Generation context
    context: &'a mut CodegenContext,
}

impl<'a> StatementGenerator<'a> {
    /// Create a new statement generator
    pub fn new(context: &'a mut CodegenContext) -> Self {
        Self { context }
    }

    /// Render an expression for a line at `builder`'s current indentation
    fn expression(&mut self, expr: &Expr, builder: &CodeBuilder) -> CodegenResult<String> {
        ExpressionGenerator::new(self.context, builder.indent_level()).generate_expression(expr)
    }

    pub fn generate_statements(&mut self, stmts: &[Stmt], builder: &mut CodeBuilder) -> CodegenResult<()> {
        for stmt in stmts {
            self.generate_statement(stmt, builder)?;
        }
        Ok(())
    }

    /// Generate JavaScript for a statement
    pub fn generate_statement(&mut self, stmt: &Stmt, builder: &mut CodeBuilder) -> CodegenResult<()> {
        self.context.metrics.record_statement();

        match stmt {
            Stmt::VariableDeclaration(decl) => {
                let code = self.generate_declaration(decl, builder)?;
                builder.line(&format!("{};", code));
                Ok(())
            }
            Stmt::FunctionDeclaration(function) => {
                ItemGenerator::new(self.context).generate_function_declaration(function, builder)
            }
            Stmt::ClassDeclaration(class) => ItemGenerator::new(self.context).generate_class(class, builder),
            Stmt::Block(block) => {
                builder.block("", |builder| self.generate_statements(&block.body, builder))
            }
            Stmt::If { test, consequent, alternate, .. } => {
                self.generate_if_statement(test, consequent, alternate.as_deref(), builder)
            }
            Stmt::For { init, test, update, body, .. } => {
                self.generate_for_statement(init.as_ref(), test.as_ref(), update.as_ref(), body, builder)
            }
            Stmt::ForOf { kind, binding, iterable, body, .. } => {
                let iterable = self.expression(iterable, builder)?;
                let header = format!("for ({} {} of {})", kind.as_str(), binding.name, iterable);
                builder.block(&header, |builder| self.generate_body(body, builder))
            }
            Stmt::While { test, body, .. } => {
                let test = self.expression(test, builder)?;
                builder.block(&format!("while ({})", test), |builder| self.generate_body(body, builder))
            }
            Stmt::Return { argument, .. } => {
                match argument {
                    Some(argument) => {
                        let argument = self.expression(argument, builder)?;
                        builder.line(&format!("return {};", argument));
                    }
                    None => builder.line("return;"),
                }
                Ok(())
            }
            Stmt::Expression { expression, .. } => {
                let code = self.expression(expression, builder)?;
                if starts_ambiguously(&code) {
                    builder.line(&format!("({});", code));
                } else {
                    builder.line(&format!("{};", code));
                }
                Ok(())
            }
        }
    }

    /// Contents of a control-flow body; a single statement gets the braces
    /// of its enclosing block
    fn generate_body(&mut self, body: &Stmt, builder: &mut CodeBuilder) -> CodegenResult<()> {
        match body {
            Stmt::Block(block) => self.generate_statements(&block.body, builder),
            other => self.generate_statement(other, builder),
        }
    }

    /// `let a = 1, b` without the trailing semicolon
    fn generate_declaration(&mut self, decl: &VariableDeclaration, builder: &CodeBuilder) -> CodegenResult<String> {
        if decl.declarations.is_empty() {
            return Err(InternalError::new("VariableDeclaration", "no declarators"));
        }

        let mut declarators = Vec::with_capacity(decl.declarations.len());
        for declarator in &decl.declarations {
            match &declarator.init {
                Some(init) => {
                    let init = self.expression(init, builder)?;
                    declarators.push(format!("{} = {}", declarator.id.name, init));
                }
                None => declarators.push(declarator.id.name.clone()),
            }
        }
        Ok(format!("{} {}", decl.kind.as_str(), declarators.join(", ")))
    }

    fn generate_if_statement(
        &mut self,
        test: &Expr,
        consequent: &Stmt,
        alternate: Option<&Stmt>,
        builder: &mut CodeBuilder,
    ) -> CodegenResult<()> {
        // Headers are rendered at the indentation of the `if` line
        let header = format!("if ({})", self.expression(test, builder)?);
        let mut branches = Vec::new();
        let mut next = alternate;
        while let Some(alternate) = next {
            match alternate {
                Stmt::If { test, consequent, alternate, .. } => {
                    let test = self.expression(test, builder)?;
                    branches.push((format!("else if ({})", test), &**consequent));
                    next = alternate.as_deref();
                }
                other => {
                    branches.push(("else".to_string(), other));
                    next = None;
                }
            }
        }

        builder.block(&header, |builder| {
            self.generate_body(consequent, builder)?;
            for (header, body) in branches {
                builder.reopen_block(&header);
                self.generate_body(body, builder)?;
            }
            Ok(())
        })
    }

    fn generate_for_statement(
        &mut self,
        init: Option<&ForInit>,
        test: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
        builder: &mut CodeBuilder,
    ) -> CodegenResult<()> {
        let init = match init {
            Some(ForInit::Declaration(decl)) => self.generate_declaration(decl, builder)?,
            Some(ForInit::Expression(expr)) => self.expression(expr, builder)?,
            None => String::new(),
        };
        let test = match test {
            Some(test) => format!(" {}", self.expression(test, builder)?),
            None => String::new(),
        };
        let update = match update {
            Some(update) => format!(" {}", self.expression(update, builder)?),
            None => String::new(),
        };

        let header = format!("for ({};{};{})", init, test, update);
        builder.block(&header, |builder| self.generate_body(body, builder))
    }
}

/// Statement text that would parse as a block or function declaration
fn starts_ambiguously(code: &str) -> bool {
    if code.starts_with('{') {
        return true;
    }
    match code.strip_prefix("function") {
        Some(rest) => !rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
        None => false,
    }
}
