//! Main parser implementation for the VJS language

use super::error::{ParseContext, ParseError, ParseResult};
use crate::ast::*;
use crate::lexer::{Keyword, Position, Token, TokenType};

/// Returned once the cursor runs past the end of a token slice that was not
/// terminated by EOF.
static EOF: Token = Token {
    token_type: TokenType::Eof,
    text: String::new(),
    start: Position { line: 1, column: 1, offset: 0 },
    end: Position { line: 1, column: 1, offset: 0 },
};

/// Deepest nesting of statements and expressions accepted before parsing
/// stops with an error instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive-descent parser over an immutable token slice
///
/// The mutable state is the cursor index and the current nesting depth, so
/// a parser can be created at any offset of a token sequence and driven
/// independently.
pub struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    /// Create a new parser over a token sequence
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, current: 0, depth: 0 }
    }

    /// Get the current token without consuming it
    pub fn peek(&self) -> &'t Token {
        self.peek_nth(0)
    }

    /// Look `n` tokens ahead of the current one
    pub fn peek_nth(&self, n: usize) -> &'t Token {
        self.tokens.get(self.current + n).unwrap_or(&EOF)
    }

    /// The most recently consumed token
    pub fn previous(&self) -> Option<&'t Token> {
        self.current.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if self.current < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    /// Check if we've reached the end of input
    pub fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    /// Check if current token has the given type
    pub fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check(TokenType::Keyword(keyword))
    }

    /// Consume a token if it matches the expected type
    pub fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn match_keyword(&mut self, keyword: Keyword) -> bool {
        self.match_token(TokenType::Keyword(keyword))
    }

    /// Consume a token of one of the allowed types, or fail naming all of them
    pub fn expect(&mut self, allowed: &[TokenType], context: ParseContext) -> ParseResult<&'t Token> {
        if allowed.contains(&self.peek().token_type) {
            return Ok(self.advance());
        }
        let expected = allowed.iter().map(|kind| kind.to_string()).collect();
        Err(self.error_here(expected, context))
    }

    /// Consume an identifier at a binding site
    pub fn expect_identifier(&mut self, context: ParseContext) -> ParseResult<Identifier> {
        let token = self.expect(&[TokenType::Identifier], context)?;
        Ok(Identifier::new(token.text.clone(), Span::new(token.start, token.end)))
    }

    /// Consume any word, keywords included, as a property or member name
    pub fn expect_property_name(&mut self, context: ParseContext) -> ParseResult<&'t Token> {
        if self.peek().token_type.is_word() {
            return Ok(self.advance());
        }
        Err(self.error_here(vec!["property name".to_string()], context))
    }

    /// Build the error for an unexpected current token
    pub fn error_here(&self, expected: Vec<String>, context: ParseContext) -> ParseError {
        let token = self.peek();
        if token.is_eof() {
            ParseError::unexpected_eof(expected, token.start, context)
        } else {
            ParseError::unexpected_token(expected, token.token_type, &token.text, token.start, context)
        }
    }

    /// Run a recursive production one nesting level deeper
    pub fn nested<T>(
        &mut self,
        context: ParseContext,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::invalid_syntax(
                "Nesting too deep",
                self.current_position(),
                context,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Get current position for error reporting
    pub fn current_position(&self) -> Position {
        self.peek().start
    }

    /// Span from `start` to the end of the last consumed token
    pub fn span_from(&self, start: Position) -> Span {
        let end = self.previous().map(|t| t.end).unwrap_or(start);
        Span::new(start, end)
    }

    /// Skip statement separators
    pub fn skip_semicolons(&mut self) {
        while self.match_token(TokenType::Semicolon) {}
    }

    /// Whether the current token starts a new source line
    pub fn on_new_line(&self) -> bool {
        match self.previous() {
            Some(prev) => self.peek().start.line > prev.end.line,
            None => true,
        }
    }

    /// Parse a complete program (top-level entry point)
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let start_pos = self.current_position();
        let mut body = Vec::new();

        self.skip_semicolons();
        while !self.is_at_end() {
            if self.check(TokenType::RightBrace) || self.check(TokenType::RightParen) {
                return Err(self.error_here(vec!["statement".to_string()], ParseContext::TopLevel));
            }
            body.push(self.parse_statement()?);
            self.skip_semicolons();
        }

        Ok(Program {
            body,
            span: self.span_from(start_pos),
        })
    }
}
