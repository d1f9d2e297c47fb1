//! Class declaration parsing
//!
//! A member is classified by looking, in order, at a `#` prefix, the
//! `construtor` keyword, a `get`/`set` followed by a name, and finally
//! whether `(` follows the name (method) or not (field).

use super::error::{ParseContext, ParseResult};
use super::parser::Parser;
use crate::ast::*;
use crate::lexer::{Keyword, Position, TokenType};

const CLASS_NAME_TOKENS: [TokenType; 3] = [TokenType::Identifier, TokenType::Builtin, TokenType::Type];

impl<'t> Parser<'t> {
    /// Parse `classe Nome [estende a.B] [implementa I, J] { membros }`
    pub fn parse_class_declaration(&mut self) -> ParseResult<Stmt> {
        let start_pos = self.current_position();
        self.expect(&[TokenType::Keyword(Keyword::Class)], ParseContext::ClassDeclaration)?;
        let name = self.expect_identifier(ParseContext::ClassDeclaration)?;

        let super_class = if self.match_keyword(Keyword::Extends) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.match_keyword(Keyword::Implements) {
            loop {
                let token = self.expect(&CLASS_NAME_TOKENS, ParseContext::ClassDeclaration)?;
                implements.push(Identifier::new(token.text.clone(), Span::new(token.start, token.end)));
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(&[TokenType::LeftBrace], ParseContext::ClassBody)?;
        let mut members = Vec::new();
        self.skip_semicolons();
        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            members.push(self.parse_class_member()?);
            self.skip_semicolons();
        }
        self.expect(&[TokenType::RightBrace], ParseContext::ClassBody)?;

        Ok(Stmt::ClassDeclaration(Class {
            name,
            super_class,
            implements,
            members,
            span: self.span_from(start_pos),
        }))
    }

    /// Dotted name chain such as `modelos.Base`
    fn parse_qualified_name(&mut self) -> ParseResult<Expr> {
        let token = self.expect(&CLASS_NAME_TOKENS, ParseContext::ClassDeclaration)?;
        let start_pos = token.start;
        let mut expr = Expr::Identifier {
            name: token.text.clone(),
            span: Span::new(token.start, token.end),
        };

        while self.match_token(TokenType::Dot) {
            let property = self.expect_property_name(ParseContext::ClassDeclaration)?;
            expr = Expr::Member {
                object: Box::new(expr),
                property: MemberProperty::Identifier(property.text.clone()),
                optional: false,
                span: self.span_from(start_pos),
            };
        }

        Ok(expr)
    }

    fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        let start_pos = self.current_position();

        let mut decorators = Vec::new();
        while self.check(TokenType::At) {
            let at = self.advance();
            let name = self.expect_property_name(ParseContext::ClassBody)?;
            decorators.push(Decorator {
                name: name.text.clone(),
                span: Span::new(at.start, name.end),
            });
        }

        let mut modifiers = Modifiers::default();
        while let TokenType::Keyword(keyword) = self.peek().token_type {
            match keyword {
                Keyword::Public => modifiers.access = Some(Access::Public),
                Keyword::Private => modifiers.access = Some(Access::Private),
                Keyword::Protected => modifiers.access = Some(Access::Protected),
                Keyword::Static => modifiers.is_static = true,
                Keyword::Abstract => modifiers.is_abstract = true,
                _ => break,
            }
            self.advance();
        }

        if self.match_keyword(Keyword::Constructor) {
            let key = PropertyKey::Identifier("constructor".to_string());
            return self.parse_method(key, MethodKind::Constructor, modifiers, decorators, start_pos);
        }

        let accessor = match self.peek().token_type {
            TokenType::Keyword(Keyword::Get) => Some(MethodKind::Get),
            TokenType::Keyword(Keyword::Set) => Some(MethodKind::Set),
            _ => None,
        };
        let names_follow = {
            let next = self.peek_nth(1).token_type;
            next.is_word() || next == TokenType::Hash
        };
        if let (Some(kind), true) = (accessor, names_follow) {
            self.advance();
            let key = self.parse_member_key()?;
            return self.parse_method(key, kind, modifiers, decorators, start_pos);
        }

        let key = self.parse_member_key()?;
        if self.check(TokenType::LeftParen) {
            return self.parse_method(key, MethodKind::Method, modifiers, decorators, start_pos);
        }

        let type_annotation = self.parse_optional_type_annotation()?;
        let value = if self.match_token(TokenType::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.match_token(TokenType::Semicolon);

        Ok(ClassMember::Field(FieldDefinition {
            key,
            type_annotation,
            value,
            modifiers,
            decorators,
            span: self.span_from(start_pos),
        }))
    }

    /// Member name, `#` prefix included
    fn parse_member_key(&mut self) -> ParseResult<PropertyKey> {
        if self.match_token(TokenType::Hash) {
            let token = self.expect_property_name(ParseContext::ClassBody)?;
            return Ok(PropertyKey::Private(token.text.clone()));
        }
        let token = self.expect_property_name(ParseContext::ClassBody)?;
        Ok(PropertyKey::Identifier(token.text.clone()))
    }

    fn parse_method(
        &mut self,
        key: PropertyKey,
        kind: MethodKind,
        modifiers: Modifiers,
        decorators: Vec<Decorator>,
        start_pos: Position,
    ) -> ParseResult<ClassMember> {
        let function_start = self.current_position();
        let function = self.parse_function_rest(None, function_start, modifiers.is_abstract)?;

        Ok(ClassMember::Method(MethodDefinition {
            key,
            kind,
            function,
            modifiers,
            decorators,
            span: self.span_from(start_pos),
        }))
    }
}
