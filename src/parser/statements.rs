//! Statement parsing for the VJS language
//!
//! This module handles parsing of all statement types including:
//! - Variable declarations with type annotations and multiple declarators
//! - Function declarations
//! - Control flow (se/senao, enquanto, para in both classic and for-of form)
//! - Return statements
//! - Block and expression statements
//!
//! Statement separators are optional everywhere.

use super::error::{ParseContext, ParseResult};
use super::parser::Parser;
use crate::ast::*;
use crate::lexer::{Keyword, Position, TokenType};

impl<'t> Parser<'t> {
    /// Parse a statement, dispatching on the leading keyword
    pub fn parse_statement(&mut self) -> ParseResult<Stmt> {
        self.nested(ParseContext::Statement, Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Stmt> {
        match self.peek().token_type {
            TokenType::Keyword(Keyword::Let) | TokenType::Keyword(Keyword::Const) => {
                let declaration = self.parse_variable_declaration()?;
                self.match_token(TokenType::Semicolon);
                Ok(Stmt::VariableDeclaration(declaration))
            }
            TokenType::Keyword(Keyword::Function) => self.parse_function_declaration(),
            TokenType::Keyword(Keyword::Class) => self.parse_class_declaration(),
            TokenType::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenType::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenType::Keyword(Keyword::For) => self.parse_for_statement(),
            TokenType::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenType::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parse `variavel a: T = 1, b` (without a trailing separator)
    pub fn parse_variable_declaration(&mut self) -> ParseResult<VariableDeclaration> {
        let start_pos = self.current_position();
        let kind = self.parse_declaration_kind()?;
        let first = self.expect_identifier(ParseContext::VariableDeclaration)?;
        self.parse_declarators(kind, first, start_pos)
    }

    fn parse_declaration_kind(&mut self) -> ParseResult<DeclarationKind> {
        let token = self.expect(
            &[TokenType::Keyword(Keyword::Let), TokenType::Keyword(Keyword::Const)],
            ParseContext::VariableDeclaration,
        )?;
        Ok(match token.token_type {
            TokenType::Keyword(Keyword::Const) => DeclarationKind::Const,
            _ => DeclarationKind::Let,
        })
    }

    /// Parse the declarator list whose first name has already been consumed
    fn parse_declarators(
        &mut self,
        kind: DeclarationKind,
        first: Identifier,
        start_pos: Position,
    ) -> ParseResult<VariableDeclaration> {
        let first_annotation = self.parse_optional_type_annotation()?;
        let mut declarations = vec![self.parse_declarator_rest(first, first_annotation)?];

        while self.match_token(TokenType::Comma) {
            let id = self.expect_identifier(ParseContext::VariableDeclaration)?;
            let type_annotation = self.parse_optional_type_annotation()?;
            declarations.push(self.parse_declarator_rest(id, type_annotation)?);
        }

        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.span_from(start_pos),
        })
    }

    fn parse_declarator_rest(
        &mut self,
        id: Identifier,
        type_annotation: Option<TypeAnnotation>,
    ) -> ParseResult<VariableDeclarator> {
        let start_pos = id.span.start;
        let init = if self.match_token(TokenType::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(VariableDeclarator {
            id,
            type_annotation,
            init,
            span: self.span_from(start_pos),
        })
    }

    /// Parse a named function declaration
    fn parse_function_declaration(&mut self) -> ParseResult<Stmt> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::Function)], ParseContext::FunctionDeclaration)?;
        let name = self.expect_identifier(ParseContext::FunctionDeclaration)?;
        let function = self.parse_function_rest(Some(name), start_pos, false)?;
        Ok(Stmt::FunctionDeclaration(function))
    }

    /// Parse parameters, return type and body. With `abstract` set, the body
    /// may be omitted.
    pub fn parse_function_rest(
        &mut self,
        name: Option<Identifier>,
        start_pos: Position,
        is_abstract: bool,
    ) -> ParseResult<Function> {
        let params = self.parse_parameters()?;
        let return_type = self.parse_optional_type_annotation()?;

        let body = if is_abstract && !self.check(TokenType::LeftBrace) {
            self.match_token(TokenType::Semicolon);
            None
        } else {
            Some(self.parse_block_in(ParseContext::FunctionDeclaration)?)
        };

        Ok(Function {
            name,
            params,
            return_type,
            body,
            span: self.span_from(start_pos),
        })
    }

    fn parse_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        self.expect(&[TokenType::LeftParen], ParseContext::FunctionParameters)?;
        let mut params = Vec::new();

        while !self.check(TokenType::RightParen) {
            let param_start = self.current_position();
            let name = self.expect_identifier(ParseContext::FunctionParameters)?;
            let type_annotation = self.parse_optional_type_annotation()?;
            let default = if self.match_token(TokenType::Assign) {
                Some(self.parse_expression()?)
            } else {
                None
            };

            params.push(Parameter {
                name,
                type_annotation,
                default,
                span: self.span_from(param_start),
            });

            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        self.expect(&[TokenType::RightParen], ParseContext::FunctionParameters)?;
        Ok(params)
    }

    /// Parse a brace-delimited block
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        self.parse_block_in(ParseContext::Block)
    }

    fn parse_block_in(&mut self, context: ParseContext) -> ParseResult<Block> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::LeftBrace], context)?;

        let mut body = Vec::new();
        self.skip_semicolons();
        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
            self.skip_semicolons();
        }

        self.expect(&[TokenType::RightBrace], ParseContext::Block)?;
        Ok(Block {
            body,
            span: self.span_from(start_pos),
        })
    }

    /// `se cond corpo [senao corpo]`; both `se (x)` and `se x` parse.
    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::If)], ParseContext::IfStatement)?;

        let test = self.parse_condition(ParseContext::IfStatement)?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.match_keyword(Keyword::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            test,
            consequent,
            alternate,
            span: self.span_from(start_pos),
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::While)], ParseContext::WhileStatement)?;

        let test = self.parse_condition(ParseContext::WhileStatement)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            test,
            body,
            span: self.span_from(start_pos),
        })
    }

    /// Condition of `se`/`enquanto`. A `(` right after the keyword owns the
    /// whole condition, so `se (a) -b` has `-b` as its body.
    fn parse_condition(&mut self, context: ParseContext) -> ParseResult<Expr> {
        if !self.match_token(TokenType::LeftParen) {
            return self.parse_expression();
        }
        let test = self.parse_expression()?;
        self.expect(&[TokenType::RightParen], context)?;
        Ok(test)
    }

    /// Body of a classic `para`. Without parentheses the update clause has
    /// no closing token, so only a block can follow it.
    fn parse_for_body(&mut self, parenthesized: bool) -> ParseResult<Box<Stmt>> {
        let body = if parenthesized {
            self.parse_statement()?
        } else {
            Stmt::Block(self.parse_block_in(ParseContext::ForStatement)?)
        };
        Ok(Box::new(body))
    }

    /// Both `para (init; test; update)` and `para variavel x de lista`, with
    /// or without the surrounding parentheses.
    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::For)], ParseContext::ForStatement)?;
        let parenthesized = self.match_token(TokenType::LeftParen);

        let init = if self.check_keyword(Keyword::Let) || self.check_keyword(Keyword::Const) {
            let decl_start = self.current_position();
            let kind = self.parse_declaration_kind()?;
            let binding = self.expect_identifier(ParseContext::ForStatement)?;
            let type_annotation = self.parse_optional_type_annotation()?;

            if self.match_keyword(Keyword::Of) {
                let iterable = self.parse_expression()?;
                if parenthesized {
                    self.expect(&[TokenType::RightParen], ParseContext::ForStatement)?;
                }
                let body = Box::new(self.parse_statement()?);
                return Ok(Stmt::ForOf {
                    kind,
                    binding,
                    type_annotation,
                    iterable,
                    body,
                    span: self.span_from(start_pos),
                });
            }

            let first = self.parse_declarator_rest(binding, type_annotation)?;
            let mut declarations = vec![first];
            while self.match_token(TokenType::Comma) {
                let id = self.expect_identifier(ParseContext::ForStatement)?;
                let type_annotation = self.parse_optional_type_annotation()?;
                declarations.push(self.parse_declarator_rest(id, type_annotation)?);
            }
            Some(ForInit::Declaration(VariableDeclaration {
                kind,
                declarations,
                span: self.span_from(decl_start),
            }))
        } else if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(ForInit::Expression(self.parse_expression()?))
        };
        self.expect(&[TokenType::Semicolon], ParseContext::ForStatement)?;

        let test = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&[TokenType::Semicolon], ParseContext::ForStatement)?;

        let closing = if parenthesized { TokenType::RightParen } else { TokenType::LeftBrace };
        let update = if self.check(closing) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        if parenthesized {
            self.expect(&[TokenType::RightParen], ParseContext::ForStatement)?;
        }

        let body = self.parse_for_body(parenthesized)?;
        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            span: self.span_from(start_pos),
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::Return)], ParseContext::Statement)?;

        let ends_statement = matches!(
            self.peek().token_type,
            TokenType::Semicolon | TokenType::RightBrace | TokenType::Eof
        );
        let argument = if ends_statement || self.on_new_line() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.match_token(TokenType::Semicolon);

        Ok(Stmt::Return {
            argument,
            span: self.span_from(start_pos),
        })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let start_pos = self.current_position();
        let expression = self.parse_expression()?;
        self.match_token(TokenType::Semicolon);

        Ok(Stmt::Expression {
            expression,
            span: self.span_from(start_pos),
        })
    }
}
