//! Expression Code Generation for VJS
//!
//! Expressions render to single strings. Parentheses are inserted from the
//! target language's precedence table so the emitted text regroups exactly
//! like the AST; function expressions render their bodies through a
//! temporary builder at the current indentation.

use super::mappings::{map_identifier, map_method, map_property};
use super::{CodegenContext, CodegenResult, InternalError, ItemGenerator};
use crate::ast::*;

/// Binding strength of an expression in the target language
pub(crate) mod precedence {
    pub const ASSIGNMENT: u8 = 2;
    pub const LOGICAL_OR: u8 = 3;
    pub const LOGICAL_AND: u8 = 4;
    pub const BITWISE_OR: u8 = 5;
    pub const BITWISE_AND: u8 = 7;
    pub const EQUALITY: u8 = 8;
    pub const RELATIONAL: u8 = 9;
    pub const SHIFT: u8 = 10;
    pub const ADDITIVE: u8 = 11;
    pub const MULTIPLICATIVE: u8 = 12;
    pub const EXPONENT: u8 = 13;
    pub const UNARY: u8 = 14;
    pub const PREFIX_UPDATE: u8 = 15;
    pub const POSTFIX_UPDATE: u8 = 16;
    pub const CALL: u8 = 17;
    pub const PRIMARY: u8 = 18;
}

fn binary_precedence(op: BinaryOp) -> u8 {
    use precedence::*;
    match op {
        BinaryOp::Exponent => EXPONENT,
        BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => MULTIPLICATIVE,
        BinaryOp::Add | BinaryOp::Subtract => ADDITIVE,
        BinaryOp::LeftShift | BinaryOp::RightShift | BinaryOp::UnsignedRightShift => SHIFT,
        BinaryOp::Less
        | BinaryOp::LessEqual
        | BinaryOp::Greater
        | BinaryOp::GreaterEqual
        | BinaryOp::InstanceOf => RELATIONAL,
        BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::StrictEqual | BinaryOp::StrictNotEqual => EQUALITY,
        BinaryOp::BitwiseAnd => BITWISE_AND,
        BinaryOp::BitwiseOr => BITWISE_OR,
    }
}

fn logical_precedence(op: LogicalOp) -> u8 {
    match op {
        LogicalOp::And => precedence::LOGICAL_AND,
        LogicalOp::Or | LogicalOp::Nullish => precedence::LOGICAL_OR,
    }
}

/// Precedence of the text an expression renders to
pub fn expression_precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assignment { .. } => precedence::ASSIGNMENT,
        Expr::Logical { op, .. } => logical_precedence(*op),
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary { .. } => precedence::UNARY,
        Expr::Update { prefix: true, .. } => precedence::PREFIX_UPDATE,
        Expr::Update { prefix: false, .. } => precedence::POSTFIX_UPDATE,
        Expr::Call { .. } | Expr::New { .. } | Expr::Member { .. } => precedence::CALL,
        Expr::Literal { .. }
        | Expr::Identifier { .. }
        | Expr::This { .. }
        | Expr::Super { .. }
        | Expr::Array { .. }
        | Expr::Object { .. }
        | Expr::Function(_) => precedence::PRIMARY,
    }
}

/// `??` cannot share a level with `||`/`&&` without parentheses
fn mixes_nullish(parent: LogicalOp, child: &Expr) -> bool {
    match child {
        Expr::Logical { op, .. } => (parent == LogicalOp::Nullish) != (*op == LogicalOp::Nullish),
        _ => false,
    }
}

/// Callee of `new` must be a member chain free of calls and optional links
fn needs_parens_as_new_callee(callee: &Expr) -> bool {
    match callee {
        Expr::Call { .. } => true,
        Expr::Member { object, optional, .. } => *optional || needs_parens_as_new_callee(object),
        Expr::New { .. } => false,
        other => expression_precedence(other) < precedence::CALL,
    }
}

/// Expression code generator
pub struct ExpressionGenerator<'a> {
    /// Generation context
    context: &'a mut CodegenContext,
    /// Indentation of the line the expression is embedded in
    indent_level: usize,
}

impl<'a> ExpressionGenerator<'a> {
    /// Create a new expression generator
    pub fn new(context: &'a mut CodegenContext, indent_level: usize) -> Self {
        Self { context, indent_level }
    }

    /// Generate JavaScript for an expression
    pub fn generate_expression(&mut self, expr: &Expr) -> CodegenResult<String> {
        self.context.metrics.record_expression();

        match expr {
            Expr::Literal { value, .. } => Ok(generate_literal(value)),
            Expr::Identifier { name, .. } => Ok(map_identifier(name).to_string()),
            Expr::This { .. } => Ok("this".to_string()),
            Expr::Super { .. } => Ok("super".to_string()),
            Expr::Array { elements, .. } => {
                let elements = self.generate_list(elements)?;
                Ok(format!("[{}]", elements))
            }
            Expr::Object { properties, .. } => self.generate_object(properties),
            Expr::Function(function) => {
                let indent_level = self.indent_level;
                ItemGenerator::new(self.context).generate_function_expression(function, indent_level)
            }
            Expr::Unary { op, operand, .. } => self.generate_unary(*op, operand),
            Expr::Update { op, prefix, argument, .. } => {
                if !argument.is_assignable() {
                    return Err(InternalError::new(expr.kind_name(), "operand is not assignable"));
                }
                let argument = self.generate_expression(argument)?;
                if *prefix {
                    Ok(format!("{}{}", op.as_str(), argument))
                } else {
                    Ok(format!("{}{}", argument, op.as_str()))
                }
            }
            Expr::Binary { left, op, right, .. } => self.generate_binary(left, *op, right),
            Expr::Logical { left, op, right, .. } => self.generate_logical(left, *op, right),
            Expr::Assignment { op, target, value, .. } => {
                if !target.is_assignable() {
                    return Err(InternalError::new(expr.kind_name(), "target is not assignable"));
                }
                let target = self.generate_expression(target)?;
                let value = self.generate_expression(value)?;
                Ok(format!("{} {} {}", target, op.as_str(), value))
            }
            Expr::Call { callee, arguments, optional, .. } => {
                let callee = self.generate_callee(callee)?;
                let arguments = self.generate_list(arguments)?;
                let link = if *optional { "?." } else { "" };
                Ok(format!("{}{}({})", callee, link, arguments))
            }
            Expr::New { callee, arguments, .. } => {
                let mut callee_code = self.generate_expression(callee)?;
                if needs_parens_as_new_callee(callee) {
                    callee_code = format!("({})", callee_code);
                }
                let arguments = self.generate_list(arguments)?;
                Ok(format!("new {}({})", callee_code, arguments))
            }
            Expr::Member { object, property, optional, .. } => {
                self.generate_member(object, property, *optional, map_property)
            }
        }
    }

    /// Generate an expression, parenthesized when it binds looser than `min`
    fn generate_operand(&mut self, expr: &Expr, min: u8) -> CodegenResult<String> {
        let code = self.generate_expression(expr)?;
        if expression_precedence(expr) < min {
            Ok(format!("({})", code))
        } else {
            Ok(code)
        }
    }

    fn generate_list(&mut self, exprs: &[Expr]) -> CodegenResult<String> {
        let parts = exprs
            .iter()
            .map(|expr| self.generate_expression(expr))
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(parts.join(", "))
    }

    fn generate_object(&mut self, properties: &[Property]) -> CodegenResult<String> {
        if properties.is_empty() {
            return Ok("{}".to_string());
        }

        let mut parts = Vec::with_capacity(properties.len());
        for property in properties {
            let key = match &property.key {
                ObjectKey::Identifier(name) => name.clone(),
                ObjectKey::String { value, quote } => format!("{}{}{}", quote, value, quote),
                ObjectKey::Number(text) => text.clone(),
            };
            let value = self.generate_expression(&property.value)?;
            parts.push(format!("{}: {}", key, value));
        }
        Ok(format!("{{ {} }}", parts.join(", ")))
    }

    fn generate_unary(&mut self, op: UnaryOp, operand: &Expr) -> CodegenResult<String> {
        let operand = self.generate_operand(operand, precedence::UNARY)?;
        let code = match op {
            UnaryOp::TypeOf => format!("typeof {}", operand),
            // `- -x` and `+ +x` must not fuse into `--`/`++`
            UnaryOp::Negate | UnaryOp::Plus if operand.starts_with(op.as_str()) => {
                format!("{} {}", op.as_str(), operand)
            }
            _ => format!("{}{}", op.as_str(), operand),
        };
        Ok(code)
    }

    fn generate_binary(&mut self, left: &Expr, op: BinaryOp, right: &Expr) -> CodegenResult<String> {
        let level = binary_precedence(op);

        let left_code = if op == BinaryOp::Exponent {
            // `**` is right-associative and rejects a bare unary base
            let code = self.generate_expression(left)?;
            if expression_precedence(left) <= precedence::UNARY {
                format!("({})", code)
            } else {
                code
            }
        } else {
            self.generate_operand(left, level)?
        };

        let right_min = if op == BinaryOp::Exponent { level } else { level + 1 };
        let right_code = self.generate_operand(right, right_min)?;

        Ok(format!("{} {} {}", left_code, op.as_str(), right_code))
    }

    fn generate_logical(&mut self, left: &Expr, op: LogicalOp, right: &Expr) -> CodegenResult<String> {
        let level = logical_precedence(op);

        let mut left_code = self.generate_operand(left, level)?;
        if mixes_nullish(op, left) && expression_precedence(left) >= level {
            left_code = format!("({})", left_code);
        }
        let mut right_code = self.generate_operand(right, level + 1)?;
        if mixes_nullish(op, right) && expression_precedence(right) > level {
            right_code = format!("({})", right_code);
        }

        Ok(format!("{} {} {}", left_code, op.as_str(), right_code))
    }

    /// Callee of a call; member callees go through the method table
    fn generate_callee(&mut self, callee: &Expr) -> CodegenResult<String> {
        match callee {
            Expr::Member { object, property, optional, .. } => {
                self.generate_member(object, property, *optional, map_method)
            }
            other => self.generate_operand(other, precedence::CALL),
        }
    }

    fn generate_member(
        &mut self,
        object: &Expr,
        property: &MemberProperty,
        optional: bool,
        rename: fn(&str) -> &str,
    ) -> CodegenResult<String> {
        let mut object_code = self.generate_operand(object, precedence::CALL)?;
        // `1.toString` would read the dot as a decimal point
        if matches!(object, Expr::Literal { value: Literal::Number(_), .. }) {
            object_code = format!("({})", object_code);
        }

        let code = match (property, optional) {
            (MemberProperty::Identifier(name), false) => format!("{}.{}", object_code, rename(name)),
            (MemberProperty::Identifier(name), true) => format!("{}?.{}", object_code, rename(name)),
            (MemberProperty::Private(name), false) => format!("{}.#{}", object_code, name),
            (MemberProperty::Private(name), true) => format!("{}?.#{}", object_code, name),
            (MemberProperty::Computed(index), optional) => {
                let index = self.generate_expression(index)?;
                let link = if optional { "?." } else { "" };
                format!("{}{}[{}]", object_code, link, index)
            }
        };
        Ok(code)
    }
}

/// Literals are emitted exactly as written
pub fn generate_literal(literal: &Literal) -> String {
    match literal {
        Literal::Number(text) => text.clone(),
        Literal::String { value, quote } => format!("{}{}{}", quote, value, quote),
        Literal::Template(text) => format!("`{}`", text),
        Literal::Boolean(true) => "true".to_string(),
        Literal::Boolean(false) => "false".to_string(),
        Literal::Null => "null".to_string(),
    }
}
