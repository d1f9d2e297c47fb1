//! Type annotation parsing
//!
//! Annotations are a single type name, optionally followed by `[]` for a
//! list of that type:
//! - Primitive types (`Texto`, `Numero`, `Booleano`, `Nulo`)
//! - Lowercase builtin names (`texto`, `numero`, `qualquer`, ...)
//! - Class names and host objects (`Pessoa`, `Map`)

use super::error::{ParseContext, ParseResult};
use super::parser::Parser;
use crate::ast::TypeAnnotation;
use crate::lexer::{Keyword, TokenType};

const TYPE_NAME_TOKENS: [TokenType; 4] = [
    TokenType::Type,
    TokenType::Identifier,
    TokenType::Builtin,
    TokenType::Keyword(Keyword::Null),
];

impl<'t> Parser<'t> {
    /// Parse `: Type` if a colon follows
    pub fn parse_optional_type_annotation(&mut self) -> ParseResult<Option<TypeAnnotation>> {
        if self.match_token(TokenType::Colon) {
            Ok(Some(self.parse_type_annotation()?))
        } else {
            Ok(None)
        }
    }

    /// Parse a type name after the colon has been consumed
    pub fn parse_type_annotation(&mut self) -> ParseResult<TypeAnnotation> {
        let start_pos = self.current_position();
        let token = self.expect(&TYPE_NAME_TOKENS, ParseContext::TypeAnnotation)?;
        let mut name = token.text.clone();

        while self.check(TokenType::LeftBracket) && self.peek_nth(1).token_type == TokenType::RightBracket {
            self.advance();
            self.advance();
            name.push_str("[]");
        }

        Ok(TypeAnnotation {
            name,
            span: self.span_from(start_pos),
        })
    }
}
