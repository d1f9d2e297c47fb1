use crate::lexer::error::LexerError;
use crate::lexer::position::Position;
use crate::lexer::token::{
    Keyword, Token, TokenType, BUILTINS, ONE_CHAR_OPERATORS, PRIMITIVE_TYPES, THREE_CHAR_OPERATORS,
    TWO_CHAR_OPERATORS,
};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// The Lexer is responsible for converting source code into tokens
///
/// The input is never mutated; scanning state is the current position plus
/// the kind of the last token produced.
pub struct Lexer<'a> {
    /// The input source code
    input: &'a str,
    /// Position of the next unread character
    position: Position,
    /// Kind of the most recently produced token
    previous: Option<TokenType>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from input source code
    pub fn new(input: &'a str) -> Self {
        let mut position = Position::start();
        if input.starts_with(BYTE_ORDER_MARK) {
            position.offset = BYTE_ORDER_MARK.len_utf8();
        }
        Self {
            input,
            position,
            previous: None,
        }
    }

    /// Unread remainder of the input
    fn rest(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

    /// The current character
    pub fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Look `n` characters past the current one without advancing
    pub fn peek(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Advance to the next character
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position.advance(ch);
        Some(ch)
    }

    /// Check if we've reached the end of input
    pub fn is_at_end(&self) -> bool {
        self.position.offset >= self.input.len()
    }

    /// Tokenize the whole input, always ending with an EOF token
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_trivia()?;

        let start = self.position;
        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return Ok(self.finish(TokenType::Eof, start)),
        };

        let token_type = if ch.is_ascii_alphabetic() {
            self.lex_word()
        } else if ch.is_ascii_digit() || (ch == '.' && self.peek(1).is_some_and(|c| c.is_ascii_digit())) {
            self.lex_number()?
        } else if ch == '"' || ch == '\'' {
            self.lex_quoted(ch, TokenType::String)?
        } else if ch == '`' {
            self.lex_quoted(ch, TokenType::Template)?
        } else {
            self.lex_operator()?
        };

        Ok(self.finish(token_type, start))
    }

    fn finish(&mut self, token_type: TokenType, start: Position) -> Token {
        let text = &self.input[start.offset..self.position.offset];
        self.previous = Some(token_type);
        Token::new(token_type, text, start, self.position)
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> Result<(), LexerError> {
        loop {
            match (self.current_char(), self.peek(1)) {
                (Some(ch), _) if ch.is_ascii_whitespace() => {
                    self.advance();
                }
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexerError> {
        let start = self.position;
        self.advance();
        self.advance();
        loop {
            if self.rest().starts_with("*/") {
                self.advance();
                self.advance();
                return Ok(());
            }
            if self.advance().is_none() {
                return Err(LexerError::UnterminatedBlockComment(start));
            }
        }
    }

    /// Lex an identifier-like word and classify it
    fn lex_word(&mut self) -> TokenType {
        let start = self.position.offset;
        while self
            .current_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let word = &self.input[start..self.position.offset];

        // Property and private names are never keywords
        if matches!(
            self.previous,
            Some(TokenType::Dot | TokenType::OptionalChain | TokenType::Hash)
        ) {
            return TokenType::Identifier;
        }

        if let Some(keyword) = Keyword::from_word(word) {
            TokenType::Keyword(keyword)
        } else if PRIMITIVE_TYPES.contains(&word) {
            TokenType::Type
        } else if BUILTINS.contains(&word) {
            TokenType::Builtin
        } else {
            TokenType::Identifier
        }
    }

    /// Lex a numeric literal (decimal, fraction, exponent or radix-prefixed)
    fn lex_number(&mut self) -> Result<TokenType, LexerError> {
        let start = self.position;

        if self.current_char() == Some('0') {
            let radix = match self.peek(1) {
                Some('x' | 'X') => Some(16),
                Some('b' | 'B') => Some(2),
                Some('o' | 'O') => Some(8),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                self.advance();
                if self.consume_digits(radix) == 0 {
                    return Err(self.invalid_number(start));
                }
                return Ok(TokenType::Number);
            }
        }

        self.consume_digits(10);

        if self.current_char() == Some('.') {
            // `1.foo` is a member access and `1..` is not a fraction, but
            // `1.e5` is an exponent
            let member_follows = self
                .peek(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.');
            if !member_follows || self.exponent_at(1) {
                self.advance();
                self.consume_digits(10);
            }
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.current_char(), Some('+' | '-')) {
                self.advance();
            }
            if self.consume_digits(10) == 0 {
                return Err(self.invalid_number(start));
            }
        }

        Ok(TokenType::Number)
    }

    /// Whether an exponent such as `e5` or `E-3` starts `n` chars ahead
    fn exponent_at(&self, n: usize) -> bool {
        if !matches!(self.peek(n), Some('e' | 'E')) {
            return false;
        }
        match self.peek(n + 1) {
            Some('+' | '-') => self.peek(n + 2).is_some_and(|c| c.is_ascii_digit()),
            next => next.is_some_and(|c| c.is_ascii_digit()),
        }
    }

    fn consume_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while self.current_char().is_some_and(|c| c.is_digit(radix)) {
            self.advance();
            count += 1;
        }
        count
    }

    fn invalid_number(&self, start: Position) -> LexerError {
        let text = &self.input[start.offset..self.position.offset];
        LexerError::InvalidNumber(text.to_string(), start)
    }

    /// Lex a quoted string or template; escapes are kept verbatim
    fn lex_quoted(&mut self, quote: char, kind: TokenType) -> Result<TokenType, LexerError> {
        let start = self.position;
        let unterminated = || match kind {
            TokenType::Template => LexerError::UnterminatedTemplate(start),
            _ => LexerError::UnterminatedString(start),
        };

        self.advance();
        loop {
            match self.advance() {
                None => return Err(unterminated()),
                Some('\\') => {
                    if self.advance().is_none() {
                        return Err(unterminated());
                    }
                }
                Some(ch) if ch == quote => return Ok(kind),
                Some(_) => {}
            }
        }
    }

    /// Greedy longest-match over the operator tables
    fn lex_operator(&mut self) -> Result<TokenType, LexerError> {
        let rest = self.rest();
        let found = THREE_CHAR_OPERATORS
            .iter()
            .chain(TWO_CHAR_OPERATORS)
            .chain(ONE_CHAR_OPERATORS)
            .find(|(text, _)| rest.starts_with(text));

        match found {
            Some((text, kind)) => {
                for _ in 0..text.len() {
                    self.advance();
                }
                Ok(*kind)
            }
            None => {
                let position = self.position;
                let ch = self.current_char().unwrap_or_default();
                Err(LexerError::InvalidCharacter(ch, position))
            }
        }
    }
}
