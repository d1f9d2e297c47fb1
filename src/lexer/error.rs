use crate::lexer::position::Position;
use thiserror::Error;

/// Represents errors that can occur during lexical analysis
///
/// Lexing stops at the first error; there is no resynchronization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    /// Character outside the accepted source alphabet
    #[error("Invalid character '{0}' at {1}")]
    InvalidCharacter(char, Position),
    /// Quoted string with no closing quote before end of input
    #[error("Unterminated string literal starting at {0}")]
    UnterminatedString(Position),
    /// Backtick template with no closing backtick
    #[error("Unterminated template literal starting at {0}")]
    UnterminatedTemplate(Position),
    /// `/*` with no matching `*/`
    #[error("Unterminated block comment starting at {0}")]
    UnterminatedBlockComment(Position),
    /// Radix prefix or exponent marker with no digits after it
    #[error("Invalid number literal '{0}' at {1}")]
    InvalidNumber(String, Position),
}

impl LexerError {
    /// Position the error was raised at
    pub fn position(&self) -> Position {
        match self {
            LexerError::InvalidCharacter(_, pos)
            | LexerError::UnterminatedString(pos)
            | LexerError::UnterminatedTemplate(pos)
            | LexerError::UnterminatedBlockComment(pos)
            | LexerError::InvalidNumber(_, pos) => *pos,
        }
    }
}
