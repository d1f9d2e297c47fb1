pub mod classes;
pub mod error;
pub mod expressions;
pub mod parser;
pub mod statements;
pub mod types;


pub use error::{ParseContext, ParseError, ParseResult};
pub use parser::Parser;

use crate::ast::Program;
use crate::lexer::Token;

/// Parse a token sequence into a program; stops at the first error
pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    let program = Parser::new(tokens).parse_program()?;
    log::debug!("parsed {} top-level statements", program.body.len());
    Ok(program)
}
