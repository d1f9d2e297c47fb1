use crate::lexer::position::Position;
use serde::Serialize;
use std::fmt;

/// Canonical keyword of the VJS language
///
/// Every bilingual spelling folds into one of these variants when the lexer
/// classifies a word, so the parser never re-checks aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Let,
    Const,
    Function,
    Class,
    Constructor,
    Return,
    If,
    Else,
    For,
    While,
    New,
    Extends,
    Implements,
    InstanceOf,
    TypeOf,
    True,
    False,
    Null,
    This,
    Super,
    Of,
    Get,
    Set,
    Public,
    Private,
    Protected,
    Static,
    Abstract,
}

impl Keyword {
    /// Every keyword, in declaration order
    pub const ALL: [Keyword; 28] = [
        Keyword::Let,
        Keyword::Const,
        Keyword::Function,
        Keyword::Class,
        Keyword::Constructor,
        Keyword::Return,
        Keyword::If,
        Keyword::Else,
        Keyword::For,
        Keyword::While,
        Keyword::New,
        Keyword::Extends,
        Keyword::Implements,
        Keyword::InstanceOf,
        Keyword::TypeOf,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
        Keyword::This,
        Keyword::Super,
        Keyword::Of,
        Keyword::Get,
        Keyword::Set,
        Keyword::Public,
        Keyword::Private,
        Keyword::Protected,
        Keyword::Static,
        Keyword::Abstract,
    ];

    /// All source spellings accepted for this keyword. The first entry is the
    /// canonical Portuguese spelling.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Keyword::Let => &["variavel", "var", "let"],
            Keyword::Const => &["constante", "const"],
            Keyword::Function => &["funcao", "function"],
            Keyword::Class => &["classe", "class"],
            Keyword::Constructor => &["construtor", "constructor"],
            Keyword::Return => &["retorne", "return"],
            Keyword::If => &["se", "if"],
            Keyword::Else => &["senao", "else"],
            Keyword::For => &["para", "for"],
            Keyword::While => &["enquanto", "while"],
            Keyword::New => &["novo", "new"],
            Keyword::Extends => &["estende", "extends"],
            Keyword::Implements => &["implementa", "implements"],
            Keyword::InstanceOf => &["instanciaDe", "instanceof"],
            Keyword::TypeOf => &["tipoDe", "typeof"],
            Keyword::True => &["verdadeiro", "true"],
            Keyword::False => &["falso", "false"],
            Keyword::Null => &["nulo", "null"],
            Keyword::This => &["isso", "this"],
            Keyword::Super => &["super"],
            Keyword::Of => &["de"],
            Keyword::Get => &["get"],
            Keyword::Set => &["set"],
            Keyword::Public => &["publico"],
            Keyword::Private => &["privado"],
            Keyword::Protected => &["protegido"],
            Keyword::Static => &["estatico"],
            Keyword::Abstract => &["abstrato"],
        }
    }

    /// Canonical source spelling
    pub fn canonical(self) -> &'static str {
        self.aliases()[0]
    }

    /// Look up a word in the keyword table
    pub fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL
            .iter()
            .copied()
            .find(|kw| kw.aliases().contains(&word))
    }

    /// Member modifiers accumulate in front of class members
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Keyword::Public | Keyword::Private | Keyword::Protected | Keyword::Static | Keyword::Abstract
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Primitive type names, lexed as `TokenType::Type`
pub const PRIMITIVE_TYPES: &[&str] = &["Texto", "Numero", "Booleano", "Nulo"];

/// Host objects, lexed as `TokenType::Builtin`
pub const BUILTINS: &[&str] = &[
    "console", "Math", "Array", "String", "Object", "JSON", "Date", "RegExp", "Map", "Set",
    "Promise", "Symbol", "Reflect", "Intl",
];

/// Token type for the VJS language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    // End of file
    Eof,

    // Words and literals
    Keyword(Keyword),
    Type,
    Builtin,
    Identifier,
    Number,
    String,
    Template,

    // Three-character operators
    StrictEqual,        // ===
    StrictNotEqual,     // !==
    Ellipsis,           // ...
    UnsignedRightShift, // >>>

    // Two-character operators
    Equal,             // ==
    NotEqual,          // !=
    LessEqual,         // <=
    GreaterEqual,      // >=
    LogicalAnd,        // &&
    LogicalOr,         // ||
    Increment,         // ++
    Decrement,         // --
    PlusAssign,        // +=
    MinusAssign,       // -=
    StarAssign,        // *=
    SlashAssign,       // /=
    PercentAssign,     // %=
    Arrow,             // =>
    OptionalChain,     // ?.
    Exponent,          // **
    LeftShift,         // <<
    RightShift,        // >>
    NullishCoalescing, // ??

    // Single-character operators
    Assign,       // =
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Semicolon,    // ;
    Colon,        // :
    Dot,          // .
    Comma,        // ,
    Greater,      // >
    Less,         // <
    Bang,         // !
    Ampersand,    // &
    Pipe,         // |
    Question,     // ?
    Hash,         // #
    At,           // @
}

/// Operator tables, tried longest first
pub(crate) const THREE_CHAR_OPERATORS: &[(&str, TokenType)] = &[
    ("===", TokenType::StrictEqual),
    ("!==", TokenType::StrictNotEqual),
    ("...", TokenType::Ellipsis),
    (">>>", TokenType::UnsignedRightShift),
];

pub(crate) const TWO_CHAR_OPERATORS: &[(&str, TokenType)] = &[
    ("==", TokenType::Equal),
    ("!=", TokenType::NotEqual),
    ("<=", TokenType::LessEqual),
    (">=", TokenType::GreaterEqual),
    ("&&", TokenType::LogicalAnd),
    ("||", TokenType::LogicalOr),
    ("++", TokenType::Increment),
    ("--", TokenType::Decrement),
    ("+=", TokenType::PlusAssign),
    ("-=", TokenType::MinusAssign),
    ("*=", TokenType::StarAssign),
    ("/=", TokenType::SlashAssign),
    ("%=", TokenType::PercentAssign),
    ("=>", TokenType::Arrow),
    ("?.", TokenType::OptionalChain),
    ("**", TokenType::Exponent),
    ("<<", TokenType::LeftShift),
    (">>", TokenType::RightShift),
    ("??", TokenType::NullishCoalescing),
];

pub(crate) const ONE_CHAR_OPERATORS: &[(&str, TokenType)] = &[
    ("=", TokenType::Assign),
    ("+", TokenType::Plus),
    ("-", TokenType::Minus),
    ("*", TokenType::Star),
    ("/", TokenType::Slash),
    ("%", TokenType::Percent),
    ("(", TokenType::LeftParen),
    (")", TokenType::RightParen),
    ("{", TokenType::LeftBrace),
    ("}", TokenType::RightBrace),
    ("[", TokenType::LeftBracket),
    ("]", TokenType::RightBracket),
    (";", TokenType::Semicolon),
    (":", TokenType::Colon),
    (".", TokenType::Dot),
    (",", TokenType::Comma),
    (">", TokenType::Greater),
    ("<", TokenType::Less),
    ("!", TokenType::Bang),
    ("&", TokenType::Ampersand),
    ("|", TokenType::Pipe),
    ("?", TokenType::Question),
    ("#", TokenType::Hash),
    ("@", TokenType::At),
];

impl TokenType {
    /// Word-like tokens can stand in for a property or object key name
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            TokenType::Keyword(_) | TokenType::Type | TokenType::Builtin | TokenType::Identifier
        )
    }

    /// Symbol for operator and punctuation kinds
    pub fn symbol(&self) -> Option<&'static str> {
        THREE_CHAR_OPERATORS
            .iter()
            .chain(TWO_CHAR_OPERATORS)
            .chain(ONE_CHAR_OPERATORS)
            .find(|(_, kind)| kind == self)
            .map(|(text, _)| *text)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Eof => write!(f, "end of input"),
            TokenType::Keyword(kw) => write!(f, "keyword '{}'", kw),
            TokenType::Type => write!(f, "type name"),
            TokenType::Builtin => write!(f, "builtin"),
            TokenType::Identifier => write!(f, "identifier"),
            TokenType::Number => write!(f, "number"),
            TokenType::String => write!(f, "string"),
            TokenType::Template => write!(f, "template"),
            other => match other.symbol() {
                Some(symbol) => write!(f, "'{}'", symbol),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

/// A token in the VJS language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The type of token
    pub token_type: TokenType,
    /// Exact source slice, delimiters included for strings and templates
    pub text: String,
    /// Position of the first character
    pub start: Position,
    /// Position just past the last character
    pub end: Position,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, text: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            token_type,
            text: text.into(),
            start,
            end,
        }
    }

    /// Returns true if the token is the given keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.token_type == TokenType::Keyword(keyword)
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}
