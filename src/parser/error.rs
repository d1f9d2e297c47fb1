//! Parse errors for the VJS parser
//!
//! Parsing stops at the first error. Every error carries the position of the
//! offending token and the grammar context it was raised in; unexpected
//! identifiers that look like a misspelled keyword get a "did you mean" hint.

use crate::lexer::{Keyword, Position, TokenType};
use std::fmt;
use thiserror::Error;

/// Parse error with the context needed for a useful diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token of the wrong kind where one of `expected` was required
    #[error("Unexpected token '{found_text}' {context} at {position}: expected {}{}", describe_expected(.expected), describe_help(.help))]
    UnexpectedToken {
        expected: Vec<String>,
        found: TokenType,
        found_text: String,
        position: Position,
        context: ParseContext,
        help: Option<String>,
    },

    /// Input ended while a construct was still open
    #[error("Unexpected end of input {context} at {position}: expected {}", describe_expected(.expected))]
    UnexpectedEof {
        expected: Vec<String>,
        position: Position,
        context: ParseContext,
    },

    /// Left-hand side of an assignment or update cannot be assigned to
    #[error("Invalid assignment target at {position}: {target_kind} is not assignable")]
    InvalidAssignmentTarget {
        target_kind: String,
        position: Position,
    },

    /// Well-formed tokens in a combination the grammar rejects
    #[error("{message} {context} at {position}")]
    InvalidSyntax {
        message: String,
        position: Position,
        context: ParseContext,
    },
}

/// Grammar production an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseContext {
    TopLevel,
    Statement,
    Block,
    VariableDeclaration,
    FunctionDeclaration,
    FunctionParameters,
    ClassDeclaration,
    ClassBody,
    TypeAnnotation,
    Expression,
    IfStatement,
    WhileStatement,
    ForStatement,
    ArgumentList,
    ArrayLiteral,
    ObjectLiteral,
    MemberAccess,
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseContext::TopLevel => write!(f, "at top level"),
            ParseContext::Statement => write!(f, "in statement"),
            ParseContext::Block => write!(f, "in block"),
            ParseContext::VariableDeclaration => write!(f, "in variable declaration"),
            ParseContext::FunctionDeclaration => write!(f, "in function declaration"),
            ParseContext::FunctionParameters => write!(f, "in function parameters"),
            ParseContext::ClassDeclaration => write!(f, "in class declaration"),
            ParseContext::ClassBody => write!(f, "in class body"),
            ParseContext::TypeAnnotation => write!(f, "in type annotation"),
            ParseContext::Expression => write!(f, "in expression"),
            ParseContext::IfStatement => write!(f, "in if statement"),
            ParseContext::WhileStatement => write!(f, "in while loop"),
            ParseContext::ForStatement => write!(f, "in for loop"),
            ParseContext::ArgumentList => write!(f, "in argument list"),
            ParseContext::ArrayLiteral => write!(f, "in array literal"),
            ParseContext::ObjectLiteral => write!(f, "in object literal"),
            ParseContext::MemberAccess => write!(f, "in member access"),
        }
    }
}

fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => "something else".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn describe_help(help: &Option<String>) -> String {
    match help {
        Some(help) => format!(" ({})", help),
        None => String::new(),
    }
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    /// Position the error points at
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEof { position, .. }
            | ParseError::InvalidAssignmentTarget { position, .. }
            | ParseError::InvalidSyntax { position, .. } => *position,
        }
    }

    /// Create a simple InvalidSyntax error with context
    pub fn invalid_syntax(message: &str, position: Position, context: ParseContext) -> Self {
        ParseError::InvalidSyntax {
            message: message.to_string(),
            position,
            context,
        }
    }

    /// Create an UnexpectedToken error; identifiers resembling a keyword get a hint
    pub fn unexpected_token(
        expected: Vec<String>,
        found: TokenType,
        found_text: &str,
        position: Position,
        context: ParseContext,
    ) -> Self {
        let help = match found {
            TokenType::Identifier => suggest_keyword(found_text).map(|kw| format!("did you mean '{}'?", kw)),
            _ => None,
        };
        ParseError::UnexpectedToken {
            expected,
            found,
            found_text: found_text.to_string(),
            position,
            context,
            help,
        }
    }

    /// Create an UnexpectedEof error with context
    pub fn unexpected_eof(expected: Vec<String>, position: Position, context: ParseContext) -> Self {
        ParseError::UnexpectedEof {
            expected,
            position,
            context,
        }
    }
}

/// Closest keyword spelling to a word that failed to parse, if any is close
pub fn suggest_keyword(word: &str) -> Option<&'static str> {
    let candidates: Vec<&'static str> = Keyword::ALL
        .iter()
        .flat_map(|kw| kw.aliases().iter().copied())
        .collect();
    suggest_similar_identifiers(word, &candidates)
        .into_iter()
        .next()
        .and_then(|best| candidates.iter().copied().find(|c| *c == best))
}

/// Generate similarity-based suggestions for identifiers, best first
pub fn suggest_similar_identifiers(input: &str, candidates: &[&str]) -> Vec<String> {
    let mut suggestions: Vec<(String, f32)> = candidates
        .iter()
        .filter(|&&candidate| candidate != input)
        .map(|&candidate| (candidate.to_string(), similarity_score(input, candidate)))
        .filter(|(_, score)| *score >= 0.7)
        .collect();

    suggestions.sort_by(|a, b| b.1.total_cmp(&a.1));
    suggestions.into_iter().take(3).map(|(name, _)| name).collect()
}

/// Calculate similarity score between two strings (Levenshtein-based)
fn similarity_score(a: &str, b: &str) -> f32 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();

    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let distance = levenshtein_distance(a, b);
    let max_len = len_a.max(len_b);

    1.0 - (distance as f32 / max_len as f32)
}

/// Calculate Levenshtein distance
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_score() {
        assert!(similarity_score("funcao", "funcoa") > 0.6);
        assert!(similarity_score("enquanto", "enquato") > 0.8);
        assert!(similarity_score("se", "classe") < 0.5);
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("retorne", "retorne"), 0);
        assert_eq!(levenshtein_distance("retorne", "retorn"), 1);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_suggest_keyword() {
        assert_eq!(suggest_keyword("constnte"), Some("constante"));
        assert_eq!(suggest_keyword("enquato"), Some("enquanto"));
        assert_eq!(suggest_keyword("contador"), None);
    }

    #[test]
    fn test_error_display() {
        let error = ParseError::unexpected_token(
            vec!["'('".to_string()],
            TokenType::Identifier,
            "retrone",
            Position::new(3, 5, 20),
            ParseContext::FunctionDeclaration,
        );

        let display = error.to_string();
        assert!(display.contains("Unexpected token 'retrone'"));
        assert!(display.contains("in function declaration"));
        assert!(display.contains("3:5"));
        assert!(display.contains("did you mean 'retorne'?"));
    }

    #[test]
    fn test_expected_list_display() {
        let error = ParseError::unexpected_eof(
            vec!["','".to_string(), "')'".to_string()],
            Position::new(1, 9, 8),
            ParseContext::ArgumentList,
        );
        assert_eq!(
            error.to_string(),
            "Unexpected end of input in argument list at 1:9: expected ',' or ')'"
        );
    }
}
