//! Expression parsing with operator precedence for VJS
//!
//! Precedence, lowest first: assignment, `||`/`??`, `&&`, `|`, `&`,
//! equality, relational (with `instanciaDe`), shifts, additive,
//! multiplicative, `**`, unary, postfix chain, primary.

use super::error::{ParseContext, ParseError, ParseResult};
use super::parser::Parser;
use crate::ast::*;
use crate::lexer::{Keyword, Token, TokenType};

impl<'t> Parser<'t> {
    /// Parse an expression (entry point for expression parsing)
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_assignment_expression()
    }

    /// Parse assignment expressions (lowest precedence, right-associative)
    pub fn parse_assignment_expression(&mut self) -> ParseResult<Expr> {
        self.nested(ParseContext::Expression, Self::parse_assignment_inner)
    }

    fn parse_assignment_inner(&mut self) -> ParseResult<Expr> {
        let target = self.parse_logical_or_expression()?;

        let op = match self.peek().token_type {
            TokenType::Assign => AssignOp::Assign,
            TokenType::PlusAssign => AssignOp::AddAssign,
            TokenType::MinusAssign => AssignOp::SubtractAssign,
            TokenType::StarAssign => AssignOp::MultiplyAssign,
            TokenType::SlashAssign => AssignOp::DivideAssign,
            TokenType::PercentAssign => AssignOp::ModuloAssign,
            _ => return Ok(target),
        };

        ensure_assignable(&target)?;
        self.advance();
        let value = self.parse_assignment_expression()?;
        let span = target.span().merge(value.span());
        Ok(Expr::Assignment {
            op,
            target: Box::new(target),
            value: Box::new(value),
            span,
        })
    }

    /// Parse `||` and `??`
    pub fn parse_logical_or_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_logical_and_expression()?;

        loop {
            let op = match self.peek().token_type {
                TokenType::LogicalOr => LogicalOp::Or,
                TokenType::NullishCoalescing => LogicalOp::Nullish,
                _ => break,
            };
            self.advance();
            let right = self.parse_logical_and_expression()?;
            expr = logical(expr, op, right);
        }

        Ok(expr)
    }

    /// Parse logical AND expressions
    pub fn parse_logical_and_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_bitwise_or_expression()?;

        while self.match_token(TokenType::LogicalAnd) {
            let right = self.parse_bitwise_or_expression()?;
            expr = logical(expr, LogicalOp::And, right);
        }

        Ok(expr)
    }

    /// Parse bitwise OR expressions
    pub fn parse_bitwise_or_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_bitwise_and_expression()?;

        while self.match_token(TokenType::Pipe) {
            let right = self.parse_bitwise_and_expression()?;
            expr = binary(expr, BinaryOp::BitwiseOr, right);
        }

        Ok(expr)
    }

    /// Parse bitwise AND expressions
    pub fn parse_bitwise_and_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_equality_expression()?;

        while self.match_token(TokenType::Ampersand) {
            let right = self.parse_equality_expression()?;
            expr = binary(expr, BinaryOp::BitwiseAnd, right);
        }

        Ok(expr)
    }

    /// Parse equality expressions (==, !=, ===, !==)
    pub fn parse_equality_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_relational_expression()?;

        loop {
            let op = match self.peek().token_type {
                TokenType::Equal => BinaryOp::Equal,
                TokenType::NotEqual => BinaryOp::NotEqual,
                TokenType::StrictEqual => BinaryOp::StrictEqual,
                TokenType::StrictNotEqual => BinaryOp::StrictNotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational_expression()?;
            expr = binary(expr, op, right);
        }

        Ok(expr)
    }

    /// Parse relational expressions (<, <=, >, >=, instanciaDe)
    pub fn parse_relational_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_shift_expression()?;

        loop {
            let op = match self.peek().token_type {
                TokenType::Less => BinaryOp::Less,
                TokenType::LessEqual => BinaryOp::LessEqual,
                TokenType::Greater => BinaryOp::Greater,
                TokenType::GreaterEqual => BinaryOp::GreaterEqual,
                TokenType::Keyword(Keyword::InstanceOf) => BinaryOp::InstanceOf,
                _ => break,
            };
            self.advance();
            let right = self.parse_shift_expression()?;
            expr = binary(expr, op, right);
        }

        Ok(expr)
    }

    /// Parse shift expressions (<<, >>, >>>)
    pub fn parse_shift_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_additive_expression()?;

        loop {
            let op = match self.peek().token_type {
                TokenType::LeftShift => BinaryOp::LeftShift,
                TokenType::RightShift => BinaryOp::RightShift,
                TokenType::UnsignedRightShift => BinaryOp::UnsignedRightShift,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive_expression()?;
            expr = binary(expr, op, right);
        }

        Ok(expr)
    }

    /// Parse additive expressions (+, -)
    pub fn parse_additive_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_multiplicative_expression()?;

        loop {
            let op = match self.peek().token_type {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            expr = binary(expr, op, right);
        }

        Ok(expr)
    }

    /// Parse multiplicative expressions (*, /, %)
    pub fn parse_multiplicative_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_exponent_expression()?;

        loop {
            let op = match self.peek().token_type {
                TokenType::Star => BinaryOp::Multiply,
                TokenType::Slash => BinaryOp::Divide,
                TokenType::Percent => BinaryOp::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.parse_exponent_expression()?;
            expr = binary(expr, op, right);
        }

        Ok(expr)
    }

    /// Parse `**`, which associates to the right
    pub fn parse_exponent_expression(&mut self) -> ParseResult<Expr> {
        let base = self.parse_unary_expression()?;

        if self.match_token(TokenType::Exponent) {
            let exponent = self.nested(ParseContext::Expression, Self::parse_exponent_expression)?;
            return Ok(binary(base, BinaryOp::Exponent, exponent));
        }

        Ok(base)
    }

    /// Parse prefix operators: !, -, +, ++, --, tipoDe
    pub fn parse_unary_expression(&mut self) -> ParseResult<Expr> {
        let start_pos = self.current_position();

        let op = match self.peek().token_type {
            TokenType::Bang => UnaryOp::Not,
            TokenType::Minus => UnaryOp::Negate,
            TokenType::Plus => UnaryOp::Plus,
            TokenType::Keyword(Keyword::TypeOf) => UnaryOp::TypeOf,
            TokenType::Increment | TokenType::Decrement => {
                let op = update_op(self.advance());
                let argument = self.nested(ParseContext::Expression, Self::parse_unary_expression)?;
                ensure_assignable(&argument)?;
                return Ok(Expr::Update {
                    op,
                    prefix: true,
                    argument: Box::new(argument),
                    span: self.span_from(start_pos),
                });
            }
            _ => return self.parse_postfix_expression(),
        };

        self.advance();
        let operand = self.nested(ParseContext::Expression, Self::parse_unary_expression)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            span: self.span_from(start_pos),
        })
    }

    /// Parse a call/member chain followed by an optional postfix update
    pub fn parse_postfix_expression(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_call_expression()?;

        let is_update = matches!(self.peek().token_type, TokenType::Increment | TokenType::Decrement);
        // `a\n++b` is two statements
        if is_update && !self.on_new_line() {
            ensure_assignable(&expr)?;
            let op = update_op(self.advance());
            let span = self.span_from(expr.span().start);
            return Ok(Expr::Update {
                op,
                prefix: false,
                argument: Box::new(expr),
                span,
            });
        }

        Ok(expr)
    }

    /// Parse calls, member access, indexing and optional chaining
    pub fn parse_call_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            let start_pos = expr.span().start;
            expr = match self.peek().token_type {
                TokenType::LeftParen => {
                    let arguments = self.parse_arguments()?;
                    Expr::Call {
                        callee: Box::new(expr),
                        arguments,
                        optional: false,
                        span: self.span_from(start_pos),
                    }
                }
                TokenType::Dot => {
                    self.advance();
                    let property = self.parse_member_name()?;
                    Expr::Member {
                        object: Box::new(expr),
                        property,
                        optional: false,
                        span: self.span_from(start_pos),
                    }
                }
                TokenType::LeftBracket => {
                    let property = self.parse_computed_member()?;
                    Expr::Member {
                        object: Box::new(expr),
                        property,
                        optional: false,
                        span: self.span_from(start_pos),
                    }
                }
                TokenType::OptionalChain => {
                    self.advance();
                    match self.peek().token_type {
                        TokenType::LeftParen => {
                            let arguments = self.parse_arguments()?;
                            Expr::Call {
                                callee: Box::new(expr),
                                arguments,
                                optional: true,
                                span: self.span_from(start_pos),
                            }
                        }
                        TokenType::LeftBracket => {
                            let property = self.parse_computed_member()?;
                            Expr::Member {
                                object: Box::new(expr),
                                property,
                                optional: true,
                                span: self.span_from(start_pos),
                            }
                        }
                        _ => {
                            let property = self.parse_member_name()?;
                            Expr::Member {
                                object: Box::new(expr),
                                property,
                                optional: true,
                                span: self.span_from(start_pos),
                            }
                        }
                    }
                }
                _ => break,
            };
        }

        Ok(expr)
    }

    /// Name after `.` or `?.`, either a plain word or `#private`
    fn parse_member_name(&mut self) -> ParseResult<MemberProperty> {
        if self.match_token(TokenType::Hash) {
            let token = self.expect_property_name(ParseContext::MemberAccess)?;
            return Ok(MemberProperty::Private(token.text.clone()));
        }
        let token = self.expect_property_name(ParseContext::MemberAccess)?;
        Ok(MemberProperty::Identifier(token.text.clone()))
    }

    fn parse_computed_member(&mut self) -> ParseResult<MemberProperty> {
        self.expect(&[TokenType::LeftBracket], ParseContext::MemberAccess)?;
        let index = self.parse_expression()?;
        self.expect(&[TokenType::RightBracket], ParseContext::MemberAccess)?;
        Ok(MemberProperty::Computed(Box::new(index)))
    }

    /// Parse a parenthesized, comma-separated argument list
    pub fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(&[TokenType::LeftParen], ParseContext::ArgumentList)?;
        let mut arguments = Vec::new();

        while !self.check(TokenType::RightParen) {
            arguments.push(self.parse_expression()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        self.expect(&[TokenType::RightParen], ParseContext::ArgumentList)?;
        Ok(arguments)
    }

    /// Parse primary expressions
    pub fn parse_primary_expression(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        let span = Span::new(token.start, token.end);

        let expr = match token.token_type {
            TokenType::Number => Expr::Literal {
                value: Literal::Number(token.text.clone()),
                span,
            },
            TokenType::String => Expr::Literal {
                value: string_literal(token),
                span,
            },
            TokenType::Template => Expr::Literal {
                value: Literal::Template(strip_delimiters(&token.text).to_string()),
                span,
            },
            TokenType::Keyword(Keyword::True) => Expr::Literal { value: Literal::Boolean(true), span },
            TokenType::Keyword(Keyword::False) => Expr::Literal { value: Literal::Boolean(false), span },
            TokenType::Keyword(Keyword::Null) => Expr::Literal { value: Literal::Null, span },
            TokenType::Keyword(Keyword::This) => Expr::This { span },
            TokenType::Keyword(Keyword::Super) => Expr::Super { span },
            // `get` and `set` are only keywords inside class bodies
            TokenType::Identifier
            | TokenType::Builtin
            | TokenType::Type
            | TokenType::Keyword(Keyword::Get)
            | TokenType::Keyword(Keyword::Set) => Expr::Identifier {
                name: token.text.clone(),
                span,
            },
            TokenType::Keyword(Keyword::New) => return self.parse_new_expression(),
            TokenType::Keyword(Keyword::Function) => return self.parse_function_expression(),
            TokenType::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&[TokenType::RightParen], ParseContext::Expression)?;
                return Ok(inner);
            }
            TokenType::LeftBracket => return self.parse_array_literal(),
            TokenType::LeftBrace => return self.parse_object_literal(),
            _ => return Err(self.error_here(vec!["expression".to_string()], ParseContext::Expression)),
        };

        self.advance();
        Ok(expr)
    }

    /// `novo Callee(args)`; the callee is a member chain without calls
    fn parse_new_expression(&mut self) -> ParseResult<Expr> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::New)], ParseContext::Expression)?;

        let mut callee = if self.check_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };

        loop {
            let object_start = callee.span().start;
            let property = match self.peek().token_type {
                TokenType::Dot => {
                    self.advance();
                    self.parse_member_name()?
                }
                TokenType::LeftBracket => self.parse_computed_member()?,
                _ => break,
            };
            callee = Expr::Member {
                object: Box::new(callee),
                property,
                optional: false,
                span: self.span_from(object_start),
            };
        }

        let arguments = if self.check(TokenType::LeftParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            arguments,
            span: self.span_from(start_pos),
        })
    }

    /// `funcao [nome](params) { ... }` in expression position
    fn parse_function_expression(&mut self) -> ParseResult<Expr> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::Function)], ParseContext::Expression)?;
        let name = if self.check(TokenType::Identifier) {
            Some(self.expect_identifier(ParseContext::FunctionDeclaration)?)
        } else {
            None
        };
        let function = self.parse_function_rest(name, start_pos, false)?;
        Ok(Expr::Function(Box::new(function)))
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::LeftBracket], ParseContext::ArrayLiteral)?;
        let mut elements = Vec::new();

        while !self.check(TokenType::RightBracket) {
            elements.push(self.parse_expression()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        self.expect(&[TokenType::RightBracket], ParseContext::ArrayLiteral)?;
        Ok(Expr::Array {
            elements,
            span: self.span_from(start_pos),
        })
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::LeftBrace], ParseContext::ObjectLiteral)?;
        let mut properties = Vec::new();

        while !self.check(TokenType::RightBrace) {
            let key_start = self.current_position();
            let token = self.peek();
            let key = match token.token_type {
                TokenType::String => {
                    let (value, quote) = string_parts(token);
                    ObjectKey::String { value, quote }
                }
                TokenType::Number => ObjectKey::Number(token.text.clone()),
                kind if kind.is_word() => ObjectKey::Identifier(token.text.clone()),
                _ => {
                    return Err(self.error_here(
                        vec!["property name".to_string(), "string".to_string(), "number".to_string()],
                        ParseContext::ObjectLiteral,
                    ))
                }
            };
            self.advance();

            self.expect(&[TokenType::Colon], ParseContext::ObjectLiteral)?;
            let value = self.parse_expression()?;
            properties.push(Property {
                key,
                value,
                span: self.span_from(key_start),
            });

            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        self.expect(&[TokenType::RightBrace], ParseContext::ObjectLiteral)?;
        Ok(Expr::Object {
            properties,
            span: self.span_from(start_pos),
        })
    }
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let span = left.span().merge(right.span());
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
        span,
    }
}

fn logical(left: Expr, op: LogicalOp, right: Expr) -> Expr {
    let span = left.span().merge(right.span());
    Expr::Logical {
        left: Box::new(left),
        op,
        right: Box::new(right),
        span,
    }
}

fn update_op(token: &Token) -> UpdateOp {
    match token.token_type {
        TokenType::Decrement => UpdateOp::Decrement,
        _ => UpdateOp::Increment,
    }
}

fn ensure_assignable(target: &Expr) -> ParseResult<()> {
    if target.is_assignable() {
        Ok(())
    } else {
        Err(ParseError::InvalidAssignmentTarget {
            target_kind: target.kind_name().to_string(),
            position: target.span().start,
        })
    }
}

/// Drop the first and last character (quotes or backticks)
fn strip_delimiters(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Contents and quote character of a string token
fn string_parts(token: &Token) -> (String, char) {
    let quote = token.text.chars().next().unwrap_or('"');
    (strip_delimiters(&token.text).to_string(), quote)
}

fn string_literal(token: &Token) -> Literal {
    let (value, quote) = string_parts(token);
    Literal::String { value, quote }
}
