//! Item Code Generation
//!
//! Functions and classes. Type annotations, access modifiers, decorators and
//! `implementa` lists have no JavaScript counterpart and are erased.

use super::{CodeBuilder, CodegenContext, CodegenResult, ExpressionGenerator, InternalError, StatementGenerator};
use crate::ast::*;

/// Item generator handles functions and classes
pub struct ItemGenerator<'a> {
    /// Generation context
    context: &'a mut CodegenContext,
}

impl<'a> ItemGenerator<'a> {
    /// Create a new item generator
    pub fn new(context: &'a mut CodegenContext) -> Self {
        Self { context }
    }

    /// `function nome(params) { ... }` as a statement
    pub fn generate_function_declaration(&mut self, function: &Function, builder: &mut CodeBuilder) -> CodegenResult<()> {
        let name = function
            .name
            .as_ref()
            .ok_or_else(|| InternalError::new("FunctionDeclaration", "declaration has no name"))?;
        let header = format!("function {}", name.name);
        let body = body_of(function, "FunctionDeclaration")?;
        self.generate_callable(&header, &function.params, body, builder)
    }

    /// Render a function expression embedded in a line at `indent_level`
    pub fn generate_function_expression(&mut self, function: &Function, indent_level: usize) -> CodegenResult<String> {
        let header = match &function.name {
            Some(name) => format!("function {}", name.name),
            None => "function ".to_string(),
        };
        let body = body_of(function, "FunctionExpression")?;

        let mut builder = self.context.builder_at(indent_level);
        self.generate_callable(&header, &function.params, body, &mut builder)?;

        // The first line is placed after text already on the line
        let code = builder.build();
        Ok(code.trim_start().to_string())
    }

    /// Emit `header(params) { body }`
    fn generate_callable(
        &mut self,
        header: &str,
        params: &[Parameter],
        body: &Block,
        builder: &mut CodeBuilder,
    ) -> CodegenResult<()> {
        let params = self.generate_parameters(params, builder.indent_level())?;
        builder.block(&format!("{}({})", header, params), |builder| {
            StatementGenerator::new(self.context).generate_statements(&body.body, builder)
        })
    }

    fn generate_parameters(&mut self, params: &[Parameter], indent_level: usize) -> CodegenResult<String> {
        let mut parts = Vec::with_capacity(params.len());
        for param in params {
            match &param.default {
                Some(default) => {
                    let default = ExpressionGenerator::new(self.context, indent_level).generate_expression(default)?;
                    parts.push(format!("{} = {}", param.name.name, default));
                }
                None => parts.push(param.name.name.clone()),
            }
        }
        Ok(parts.join(", "))
    }

    /// `class Nome extends Base { ... }`
    pub fn generate_class(&mut self, class: &Class, builder: &mut CodeBuilder) -> CodegenResult<()> {
        let mut header = format!("class {}", class.name.name);
        if let Some(super_class) = &class.super_class {
            let super_class =
                ExpressionGenerator::new(self.context, builder.indent_level()).generate_expression(super_class)?;
            header.push_str(" extends ");
            header.push_str(&super_class);
        }

        builder.block(&header, |builder| {
            for member in &class.members {
                match member {
                    ClassMember::Method(method) => self.generate_method(method, builder)?,
                    ClassMember::Field(field) => self.generate_field(field, builder)?,
                }
            }
            Ok(())
        })
    }

    fn generate_method(&mut self, method: &MethodDefinition, builder: &mut CodeBuilder) -> CodegenResult<()> {
        let body = match &method.function.body {
            Some(body) => body,
            // Abstract signatures only exist for the checker
            None if method.modifiers.is_abstract => return Ok(()),
            None => return Err(InternalError::new("MethodDefinition", "non-abstract method has no body")),
        };

        let mut header = String::new();
        if method.modifiers.is_static {
            header.push_str("static ");
        }
        match method.kind {
            MethodKind::Get => header.push_str("get "),
            MethodKind::Set => header.push_str("set "),
            MethodKind::Constructor | MethodKind::Method => {}
        }
        header.push_str(&property_key(&method.key));

        self.generate_callable(&header, &method.function.params, body, builder)
    }

    fn generate_field(&mut self, field: &FieldDefinition, builder: &mut CodeBuilder) -> CodegenResult<()> {
        let mut line = String::new();
        if field.modifiers.is_static {
            line.push_str("static ");
        }
        line.push_str(&property_key(&field.key));
        if let Some(value) = &field.value {
            let value = ExpressionGenerator::new(self.context, builder.indent_level()).generate_expression(value)?;
            line.push_str(" = ");
            line.push_str(&value);
        }
        line.push(';');
        builder.line(&line);
        Ok(())
    }
}

fn body_of<'f>(function: &'f Function, node_kind: &str) -> CodegenResult<&'f Block> {
    function
        .body
        .as_ref()
        .ok_or_else(|| InternalError::new(node_kind, "function has no body"))
}

fn property_key(key: &PropertyKey) -> String {
    match key {
        PropertyKey::Identifier(name) => name.clone(),
        PropertyKey::Private(name) => format!("#{}", name),
    }
}
