pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod semantic;

pub use ast::{Expr, Program, Span, Stmt};
pub use codegen::{generate, CodegenResult, GeneratorOptions, InternalError, JsGenerator};
pub use compiler::{compile, CompileError, CompileOutput, Compiler, CompilerOptions, Stage};
pub use lexer::{tokenize, Lexer, LexerError, Position, Token, TokenType};
pub use parser::{parse, ParseError, ParseResult, Parser};
pub use runtime::{run, Evaluator, Execution, ExecutionError, HostBindings, NodeEvaluator, RunError};
pub use semantic::{analyze, SemanticAnalyzer, SemanticError};
