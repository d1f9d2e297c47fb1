//! Main Semantic Analyzer for VJS
//!
//! Two passes over a parsed program:
//! - collection: top-level class names (duplicates are reported) and hoisted
//!   function and class names
//! - validation: a scope-tracking walk that resolves every identifier
//!   reference and checks every type annotation
//!
//! All violations are collected; the AST is never modified.

use super::scope::{ScopeKind, ScopeStack};
use crate::ast::*;
use crate::lexer::{Position, BUILTINS, PRIMITIVE_TYPES};
use crate::parser::error::suggest_similar_identifiers;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// Identifiers usable without a declaration
pub const BUILTIN_IDENTIFIERS: &[&str] = &[
    "escreva",
    "mostrar",
    "imprime",
    "alerta",
    "aleatorio",
    "arredondar",
    "piso",
    "teto",
    "matematica",
    "verdadeiro",
    "falso",
    "nulo",
    "undefined",
    "NaN",
    "Infinity",
    "Number",
    "Boolean",
    "Error",
    "parseInt",
    "parseFloat",
    "isNaN",
];

/// Type names valid in annotations besides declared classes
pub const BUILTIN_TYPES: &[&str] = &[
    "vazio", "texto", "numero", "inteiro", "booleano", "decimal", "lista", "qualquer", "nulo",
];

/// Semantic errors that can occur during analysis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("Undefined variable '{name}' at {position}{}", did_you_mean(.suggestion))]
    UndefinedVariable {
        name: String,
        position: Position,
        suggestion: Option<String>,
    },

    #[error("Invalid type '{name}' at {position}")]
    InvalidType { name: String, position: Position },

    #[error("Duplicate class '{name}' at {position}")]
    DuplicateClass { name: String, position: Position },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

impl SemanticError {
    pub fn position(&self) -> Position {
        match self {
            SemanticError::UndefinedVariable { position, .. }
            | SemanticError::InvalidType { position, .. }
            | SemanticError::DuplicateClass { position, .. } => *position,
        }
    }
}

/// Configuration for semantic analysis
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Host-provided globals accepted as declared
    pub extra_builtins: Vec<String>,
    /// Host-provided type names accepted in annotations
    pub extra_types: Vec<String>,
    /// Maximum number of errors before stopping
    pub max_errors: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            extra_builtins: Vec::new(),
            extra_types: Vec::new(),
            max_errors: Some(100),
        }
    }
}

/// Analysis statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Identifier references looked up
    pub references_checked: usize,
    /// Type annotations validated
    pub annotations_checked: usize,
    /// Number of scopes created
    pub scopes_created: usize,
}

/// Result of semantic analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// All semantic errors found, in source order of discovery
    pub errors: Vec<SemanticError>,
    pub stats: AnalysisStats,
}

impl AnalysisResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), Vec<SemanticError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Main semantic analyzer
pub struct SemanticAnalyzer {
    /// Configuration options
    config: AnalyzerConfig,
    scopes: ScopeStack,
    /// Builtin and declared class type names
    types: HashSet<String>,
    builtins: HashSet<String>,
    /// Collected errors
    errors: Vec<SemanticError>,
    /// Analysis statistics
    stats: AnalysisStats,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    /// Create a new semantic analyzer with default configuration
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Create a new semantic analyzer with custom configuration
    pub fn with_config(config: AnalyzerConfig) -> Self {
        // Primitive type names double as constructors (`novo Numero(1)`)
        let builtins = BUILTIN_IDENTIFIERS
            .iter()
            .chain(BUILTINS)
            .chain(PRIMITIVE_TYPES)
            .map(|name| name.to_string())
            .chain(config.extra_builtins.iter().cloned())
            .collect();
        let types = BUILTIN_TYPES
            .iter()
            .chain(PRIMITIVE_TYPES)
            .map(|name| name.to_string())
            .chain(config.extra_types.iter().cloned())
            .collect();

        Self {
            config,
            scopes: ScopeStack::new(),
            types,
            builtins,
            errors: Vec::new(),
            stats: AnalysisStats::default(),
        }
    }

    /// Perform complete semantic analysis on a program
    pub fn analyze(&mut self, program: &Program) -> AnalysisResult {
        // Phase 1: class names and hoisted declarations
        self.collect_classes(program);
        self.hoist(&program.body);

        // Phase 2: scope-tracking walk
        for stmt in &program.body {
            self.check_statement(stmt);
        }

        self.stats.scopes_created = self.scopes.scopes_opened();
        for error in &self.errors {
            log::warn!("{}", error);
        }
        log::debug!(
            "semantic analysis: {} errors, {} references, {} annotations, {} scopes",
            self.errors.len(),
            self.stats.references_checked,
            self.stats.annotations_checked,
            self.stats.scopes_created
        );

        let result = AnalysisResult {
            errors: std::mem::take(&mut self.errors),
            stats: self.stats,
        };
        self.reset();
        result
    }

    /// Forget per-program state so the analyzer can be reused
    fn reset(&mut self) {
        let fresh = Self::with_config(self.config.clone());
        *self = fresh;
    }

    fn collect_classes(&mut self, program: &Program) {
        let mut seen = HashSet::new();
        for stmt in &program.body {
            if let Stmt::ClassDeclaration(class) = stmt {
                if !seen.insert(class.name.name.as_str()) {
                    self.add_error(SemanticError::DuplicateClass {
                        name: class.name.name.clone(),
                        position: class.name.span.start,
                    });
                }
                self.types.insert(class.name.name.clone());
            }
        }
    }

    /// Declare the function and class names of a statement list up front,
    /// so sibling code can refer to them before their declaration
    fn hoist(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::FunctionDeclaration(Function { name: Some(name), .. }) => {
                    self.scopes.declare(&name.name, name.span);
                }
                Stmt::ClassDeclaration(class) => {
                    self.scopes.declare(&class.name.name, class.name.span);
                }
                _ => {}
            }
        }
    }

    fn check_statements_in(&mut self, kind: ScopeKind, stmts: &[Stmt]) {
        self.scopes.enter_scope(kind);
        self.hoist(stmts);
        for stmt in stmts {
            self.check_statement(stmt);
        }
        self.scopes.exit_scope();
    }

    fn check_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration(decl) => self.check_variable_declaration(decl),
            Stmt::FunctionDeclaration(function) => self.check_function(function),
            Stmt::ClassDeclaration(class) => self.check_class(class),
            Stmt::Block(block) => self.check_statements_in(ScopeKind::Block, &block.body),
            Stmt::If { test, consequent, alternate, .. } => {
                self.check_expression(test);
                self.check_statement(consequent);
                if let Some(alternate) = alternate {
                    self.check_statement(alternate);
                }
            }
            Stmt::While { test, body, .. } => {
                self.check_expression(test);
                self.check_statement(body);
            }
            Stmt::For { init, test, update, body, .. } => {
                self.scopes.enter_scope(ScopeKind::Loop);
                match init {
                    Some(ForInit::Declaration(decl)) => self.check_variable_declaration(decl),
                    Some(ForInit::Expression(expr)) => self.check_expression(expr),
                    None => {}
                }
                if let Some(test) = test {
                    self.check_expression(test);
                }
                if let Some(update) = update {
                    self.check_expression(update);
                }
                self.check_statement(body);
                self.scopes.exit_scope();
            }
            Stmt::ForOf { binding, type_annotation, iterable, body, .. } => {
                self.check_expression(iterable);
                self.scopes.enter_scope(ScopeKind::Loop);
                self.check_annotation(type_annotation.as_ref());
                self.scopes.declare(&binding.name, binding.span);
                self.check_statement(body);
                self.scopes.exit_scope();
            }
            Stmt::Return { argument, .. } => {
                if let Some(argument) = argument {
                    self.check_expression(argument);
                }
            }
            Stmt::Expression { expression, .. } => self.check_expression(expression),
        }
    }

    /// The name is in scope for its own initializer
    fn check_variable_declaration(&mut self, decl: &VariableDeclaration) {
        for declarator in &decl.declarations {
            self.scopes.declare(&declarator.id.name, declarator.id.span);
            self.check_annotation(declarator.type_annotation.as_ref());
            if let Some(init) = &declarator.init {
                self.check_expression(init);
            }
        }
    }

    fn check_function(&mut self, function: &Function) {
        self.scopes.enter_scope(ScopeKind::Function);

        // A named function expression sees its own name
        if let Some(name) = &function.name {
            if !self.scopes.is_declared(&name.name) {
                self.scopes.declare(&name.name, name.span);
            }
        }

        for param in &function.params {
            self.check_annotation(param.type_annotation.as_ref());
            if let Some(default) = &param.default {
                self.check_expression(default);
            }
            self.scopes.declare(&param.name.name, param.name.span);
        }
        self.check_annotation(function.return_type.as_ref());

        if let Some(body) = &function.body {
            self.hoist(&body.body);
            for stmt in &body.body {
                self.check_statement(stmt);
            }
        }

        self.scopes.exit_scope();
    }

    fn check_class(&mut self, class: &Class) {
        // Nested classes become valid type names once reached
        self.types.insert(class.name.name.clone());
        if self.scopes.current_kind() != ScopeKind::Global {
            self.scopes.declare(&class.name.name, class.name.span);
        }

        if let Some(super_class) = &class.super_class {
            self.check_expression(super_class);
        }

        for member in &class.members {
            match member {
                ClassMember::Method(method) => self.check_function(&method.function),
                ClassMember::Field(field) => {
                    self.check_annotation(field.type_annotation.as_ref());
                    if let Some(value) = &field.value {
                        self.check_expression(value);
                    }
                }
            }
        }
    }

    fn check_expression(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier { name, span } => self.resolve(name, span.start),
            Expr::Literal { .. } | Expr::This { .. } | Expr::Super { .. } => {}
            Expr::Array { elements, .. } => {
                for element in elements {
                    self.check_expression(element);
                }
            }
            Expr::Object { properties, .. } => {
                for property in properties {
                    self.check_expression(&property.value);
                }
            }
            Expr::Function(function) => self.check_function(function),
            Expr::Unary { operand, .. } => self.check_expression(operand),
            Expr::Update { argument, .. } => self.check_expression(argument),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.check_expression(left);
                self.check_expression(right);
            }
            Expr::Assignment { target, value, .. } => {
                self.check_expression(target);
                self.check_expression(value);
            }
            Expr::Call { callee, arguments, .. } | Expr::New { callee, arguments, .. } => {
                self.check_expression(callee);
                for argument in arguments {
                    self.check_expression(argument);
                }
            }
            Expr::Member { object, property, .. } => {
                self.check_expression(object);
                if let MemberProperty::Computed(index) = property {
                    self.check_expression(index);
                }
            }
        }
    }

    fn resolve(&mut self, name: &str, position: Position) {
        self.stats.references_checked += 1;
        if self.builtins.contains(name) || self.scopes.is_declared(name) {
            return;
        }

        let mut candidates = self.scopes.visible_names();
        candidates.extend(self.builtins.iter().map(String::as_str));
        let suggestion = suggest_similar_identifiers(name, &candidates).into_iter().next();

        self.add_error(SemanticError::UndefinedVariable {
            name: name.to_string(),
            position,
            suggestion,
        });
    }

    /// Check a type annotation; `[]` list suffixes are stripped first
    fn check_annotation(&mut self, annotation: Option<&TypeAnnotation>) {
        let Some(annotation) = annotation else {
            return;
        };
        self.stats.annotations_checked += 1;

        let mut base = annotation.name.as_str();
        while let Some(element) = base.strip_suffix("[]") {
            base = element;
        }
        if !self.types.contains(base) {
            self.add_error(SemanticError::InvalidType {
                name: annotation.name.clone(),
                position: annotation.span.start,
            });
        }
    }

    /// Add a semantic error
    fn add_error(&mut self, error: SemanticError) {
        if let Some(max_errors) = self.config.max_errors {
            if self.errors.len() >= max_errors {
                return; // Stop collecting errors
            }
        }

        self.errors.push(error);
    }

    /// Get configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn analyze_source(source: &str) -> AnalysisResult {
        let tokens = tokenize(source).expect("source should lex");
        let program = parse(&tokens).expect("source should parse");
        SemanticAnalyzer::new().analyze(&program)
    }

    fn undefined_names(result: &AnalysisResult) -> Vec<&str> {
        result
            .errors
            .iter()
            .filter_map(|error| match error {
                SemanticError::UndefinedVariable { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_analyzer_config_defaults() {
        let analyzer = SemanticAnalyzer::new();
        assert_eq!(analyzer.config().max_errors, Some(100));
        assert!(analyzer.config().extra_builtins.is_empty());
    }

    #[test]
    fn test_clean_program() {
        let result = analyze_source(
            "variavel total: numero = 0\nfuncao soma(a: Numero, b) { retorne a + b }\ntotal = soma(1, 2)\nmostrar(total)",
        );
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn test_undefined_variable_position() {
        let result = analyze_source("variavel x = 1\nmostrar(y)");
        assert_eq!(
            result.errors,
            vec![SemanticError::UndefinedVariable {
                name: "y".to_string(),
                position: Position::new(2, 9, 23),
                suggestion: None,
            }]
        );
    }

    #[test]
    fn test_undefined_variable_suggestion() {
        let result = analyze_source("variavel contador = 1\ncontadr++");
        match &result.errors[..] {
            [SemanticError::UndefinedVariable { suggestion, .. }] => {
                assert_eq!(suggestion.as_deref(), Some("contador"));
            }
            other => panic!("Expected one undefined variable, got {:?}", other),
        }
        assert!(result.errors[0].to_string().contains("did you mean 'contador'?"));
    }

    #[test]
    fn test_functions_are_hoisted() {
        let result = analyze_source("principal()\nfuncao principal() { auxiliar() }\nfuncao auxiliar() { }");
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn test_block_scopes_end() {
        let result = analyze_source("se verdadeiro { variavel dentro = 1 }\nmostrar(dentro)");
        assert_eq!(undefined_names(&result), vec!["dentro"]);
    }

    #[test]
    fn test_parameters_are_local() {
        let result = analyze_source("funcao f(a) { retorne a }\nmostrar(a)");
        assert_eq!(undefined_names(&result), vec!["a"]);
    }

    #[test]
    fn test_loop_bindings() {
        let result = analyze_source(
            "para (variavel i = 0; i < 3; i++) { mostrar(i) }\npara constante item de [1, 2] { mostrar(item) }\nmostrar(i, item)",
        );
        assert_eq!(undefined_names(&result), vec!["i", "item"]);
    }

    #[test]
    fn test_member_names_are_not_references() {
        let result = analyze_source("variavel p = { nome: 1 }\np.nome = p.outro\np[chave] = 1");
        assert_eq!(undefined_names(&result), vec!["chave"]);
    }

    #[test]
    fn test_invalid_types() {
        let result = analyze_source("variavel a: Desconhecido = 1\nvariavel b: Numero[] = []\nfuncao f(): vazio { }");
        assert_eq!(
            result.errors,
            vec![SemanticError::InvalidType {
                name: "Desconhecido".to_string(),
                position: Position::new(1, 13, 12),
            }]
        );
    }

    #[test]
    fn test_primitive_types_are_values() {
        let result = analyze_source("variavel n: Numero = novo Numero(1)\nmostrar(Texto(n), Booleano)");
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(undefined_names(&analyze_source("mostrar(Numeros)")), vec!["Numeros"]);
    }

    #[test]
    fn test_class_names_are_types() {
        let result = analyze_source(
            "funcao criar(): Pessoa { retorne novo Pessoa() }\nclasse Pessoa { nome: texto\n construtor(nome) { isso.nome = nome } }\nvariavel grupo: Pessoa[] = []",
        );
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn test_duplicate_classes() {
        let result = analyze_source("classe A { }\nclasse A { }");
        assert_eq!(
            result.errors,
            vec![SemanticError::DuplicateClass {
                name: "A".to_string(),
                position: Position::new(2, 8, 20),
            }]
        );
    }

    #[test]
    fn test_errors_are_batched() {
        let result = analyze_source("a\nb\nvariavel c: X = d");
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn test_max_errors_caps_the_batch() {
        let tokens = tokenize("a; b; c; d").unwrap();
        let program = parse(&tokens).unwrap();
        let config = AnalyzerConfig {
            max_errors: Some(2),
            ..AnalyzerConfig::default()
        };
        let result = SemanticAnalyzer::with_config(config).analyze(&program);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_extra_builtins_and_types() {
        let tokens = tokenize("variavel el: Elemento = documento").unwrap();
        let program = parse(&tokens).unwrap();
        let config = AnalyzerConfig {
            extra_builtins: vec!["documento".to_string()],
            extra_types: vec!["Elemento".to_string()],
            max_errors: None,
        };
        assert!(SemanticAnalyzer::with_config(config).analyze(&program).is_ok());
    }

    #[test]
    fn test_analyzer_is_reusable() {
        let tokens = tokenize("classe A { }").unwrap();
        let program = parse(&tokens).unwrap();
        let mut analyzer = SemanticAnalyzer::new();
        assert!(analyzer.analyze(&program).is_ok());
        assert!(analyzer.analyze(&program).is_ok());
    }
}
