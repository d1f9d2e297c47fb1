//! Abstract Syntax Tree (AST) definitions for the VJS language
//!
//! The tree is strictly owned: every node has exactly one parent and
//! children are held by value or `Box`. All nodes carry a `Span` and
//! serialize with an ESTree-style `"type"` tag so dumps read like the
//! familiar JavaScript AST shape.

use crate::lexer::Position;
use serde::Serialize;
use std::fmt;

/// Source span for error reporting and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn single(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: if self.start.offset < other.start.offset { self.start } else { other.start },
            end: if self.end.offset > other.end.offset { self.end } else { other.end },
        }
    }
}

/// Root of every parse
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Program")]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A name at a binding site (declarations, parameters, class names)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }
}

/// `: Tipo` annotation; erased by code generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeAnnotation {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub kind: DeclarationKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarator {
    pub id: Identifier,
    pub type_annotation: Option<TypeAnnotation>,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: Identifier,
    pub type_annotation: Option<TypeAnnotation>,
    pub default: Option<Expr>,
    pub span: Span,
}

/// Shared shape of function declarations, function expressions and methods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: Option<Identifier>,
    pub params: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    /// `None` only for abstract class members
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub name: Identifier,
    /// Dotted name chain (`base.Modelo`), built as identifiers and member accesses
    pub super_class: Option<Expr>,
    pub implements: Vec<Identifier>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClassMember {
    #[serde(rename = "MethodDefinition")]
    Method(MethodDefinition),
    #[serde(rename = "FieldDefinition")]
    Field(FieldDefinition),
}

impl ClassMember {
    pub fn span(&self) -> Span {
        match self {
            ClassMember::Method(method) => method.span,
            ClassMember::Field(field) => field.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PropertyKey {
    Identifier(String),
    /// `#name`
    Private(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Access {
    Public,
    Private,
    Protected,
}

/// Modifiers accumulate in any order; a repeated modifier is not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Modifiers {
    pub access: Option<Access>,
    pub is_static: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decorator {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDefinition {
    pub key: PropertyKey,
    pub kind: MethodKind,
    pub function: Function,
    pub modifiers: Modifiers,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub key: PropertyKey,
    pub type_annotation: Option<TypeAnnotation>,
    pub value: Option<Expr>,
    pub modifiers: Modifiers,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

/// Initializer clause of a three-clause `for`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ForInit {
    Declaration(VariableDeclaration),
    Expression(Expr),
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stmt {
    #[serde(rename = "VariableDeclaration")]
    VariableDeclaration(VariableDeclaration),

    #[serde(rename = "FunctionDeclaration")]
    FunctionDeclaration(Function),

    #[serde(rename = "ClassDeclaration")]
    ClassDeclaration(Class),

    #[serde(rename = "BlockStatement")]
    Block(Block),

    #[serde(rename = "IfStatement")]
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
        span: Span,
    },

    #[serde(rename = "ForStatement")]
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        span: Span,
    },

    #[serde(rename = "ForOfStatement")]
    ForOf {
        kind: DeclarationKind,
        binding: Identifier,
        type_annotation: Option<TypeAnnotation>,
        iterable: Expr,
        body: Box<Stmt>,
        span: Span,
    },

    #[serde(rename = "WhileStatement")]
    While {
        test: Expr,
        body: Box<Stmt>,
        span: Span,
    },

    #[serde(rename = "ReturnStatement")]
    Return {
        argument: Option<Expr>,
        span: Span,
    },

    #[serde(rename = "ExpressionStatement")]
    Expression {
        expression: Expr,
        span: Span,
    },
}

impl Stmt {
    /// Get the span of any statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::VariableDeclaration(decl) => decl.span,
            Stmt::FunctionDeclaration(function) => function.span,
            Stmt::ClassDeclaration(class) => class.span,
            Stmt::Block(block) => block.span,
            Stmt::If { span, .. } => *span,
            Stmt::For { span, .. } => *span,
            Stmt::ForOf { span, .. } => *span,
            Stmt::While { span, .. } => *span,
            Stmt::Return { span, .. } => *span,
            Stmt::Expression { span, .. } => *span,
        }
    }

    /// Node kind name as it appears in dumps and diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::VariableDeclaration(_) => "VariableDeclaration",
            Stmt::FunctionDeclaration(_) => "FunctionDeclaration",
            Stmt::ClassDeclaration(_) => "ClassDeclaration",
            Stmt::Block(_) => "BlockStatement",
            Stmt::If { .. } => "IfStatement",
            Stmt::For { .. } => "ForStatement",
            Stmt::ForOf { .. } => "ForOfStatement",
            Stmt::While { .. } => "WhileStatement",
            Stmt::Return { .. } => "ReturnStatement",
            Stmt::Expression { .. } => "ExpressionStatement",
        }
    }
}

/// Literal values. Number, string and template text is kept exactly as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Number(String),
    /// Contents between the quotes, escapes untouched
    String { value: String, quote: char },
    /// Contents between the backticks; `${}` is not parsed
    Template(String),
    Boolean(bool),
    Null,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Modulo,   // %
    Exponent, // **

    // Bitwise
    BitwiseAnd,         // &
    BitwiseOr,          // |
    LeftShift,          // <<
    RightShift,         // >>
    UnsignedRightShift, // >>>

    // Comparison
    Equal,          // ==
    NotEqual,       // !=
    StrictEqual,    // ===
    StrictNotEqual, // !==
    Less,           // <
    LessEqual,      // <=
    Greater,        // >
    GreaterEqual,   // >=
    InstanceOf,     // instanciaDe
}

impl BinaryOp {
    /// Target-language spelling
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Exponent => "**",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
            BinaryOp::UnsignedRightShift => ">>>",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::StrictEqual => "===",
            BinaryOp::StrictNotEqual => "!==",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

/// `&&`, `||` and `??`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,    // !
    Negate, // -
    Plus,   // +
    TypeOf, // tipoDe
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::TypeOf => "typeof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,         // =
    AddAssign,      // +=
    SubtractAssign, // -=
    MultiplyAssign, // *=
    DivideAssign,   // /=
    ModuloAssign,   // %=
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubtractAssign => "-=",
            AssignOp::MultiplyAssign => "*=",
            AssignOp::DivideAssign => "/=",
            AssignOp::ModuloAssign => "%=",
        }
    }
}

/// Property name after `.`/`?.`, or a computed index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MemberProperty {
    Identifier(String),
    Private(String),
    Computed(Box<Expr>),
}

/// Object literal key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectKey {
    Identifier(String),
    String { value: String, quote: char },
    Number(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: ObjectKey,
    pub value: Expr,
    pub span: Span,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    #[serde(rename = "Literal")]
    Literal { value: Literal, span: Span },

    #[serde(rename = "Identifier")]
    Identifier { name: String, span: Span },

    #[serde(rename = "ThisExpression")]
    This { span: Span },

    #[serde(rename = "Super")]
    Super { span: Span },

    #[serde(rename = "ArrayExpression")]
    Array { elements: Vec<Expr>, span: Span },

    #[serde(rename = "ObjectExpression")]
    Object { properties: Vec<Property>, span: Span },

    #[serde(rename = "FunctionExpression")]
    Function(Box<Function>),

    #[serde(rename = "UnaryExpression")]
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },

    #[serde(rename = "UpdateExpression")]
    Update {
        op: UpdateOp,
        prefix: bool,
        argument: Box<Expr>,
        span: Span,
    },

    #[serde(rename = "BinaryExpression")]
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },

    #[serde(rename = "LogicalExpression")]
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
        span: Span,
    },

    #[serde(rename = "AssignmentExpression")]
    Assignment {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },

    #[serde(rename = "CallExpression")]
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional: bool,
        span: Span,
    },

    #[serde(rename = "NewExpression")]
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        span: Span,
    },

    #[serde(rename = "MemberExpression")]
    Member {
        object: Box<Expr>,
        property: MemberProperty,
        optional: bool,
        span: Span,
    },
}

impl Expr {
    /// Get the span of any expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. } => *span,
            Expr::Identifier { span, .. } => *span,
            Expr::This { span } => *span,
            Expr::Super { span } => *span,
            Expr::Array { span, .. } => *span,
            Expr::Object { span, .. } => *span,
            Expr::Function(function) => function.span,
            Expr::Unary { span, .. } => *span,
            Expr::Update { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Logical { span, .. } => *span,
            Expr::Assignment { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::New { span, .. } => *span,
            Expr::Member { span, .. } => *span,
        }
    }

    /// Node kind name as it appears in dumps and diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal { .. } => "Literal",
            Expr::Identifier { .. } => "Identifier",
            Expr::This { .. } => "ThisExpression",
            Expr::Super { .. } => "Super",
            Expr::Array { .. } => "ArrayExpression",
            Expr::Object { .. } => "ObjectExpression",
            Expr::Function(_) => "FunctionExpression",
            Expr::Unary { .. } => "UnaryExpression",
            Expr::Update { .. } => "UpdateExpression",
            Expr::Binary { .. } => "BinaryExpression",
            Expr::Logical { .. } => "LogicalExpression",
            Expr::Assignment { .. } => "AssignmentExpression",
            Expr::Call { .. } => "CallExpression",
            Expr::New { .. } => "NewExpression",
            Expr::Member { .. } => "MemberExpression",
        }
    }

    /// Identifiers and member accesses (private ones included) can be assigned to
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Identifier { .. } | Expr::Member { .. })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
