pub mod error;
pub mod lexer;
pub mod position;
pub mod token;

pub use self::error::LexerError;
pub use self::lexer::Lexer;
pub use self::position::Position;
pub use self::token::{Keyword, Token, TokenType, BUILTINS, PRIMITIVE_TYPES};

/// Convert source text into tokens, terminated by an EOF token
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
    let tokens = Lexer::new(source).tokenize()?;
    log::debug!("lexed {} tokens from {} bytes", tokens.len(), source.len());
    Ok(tokens)
}
