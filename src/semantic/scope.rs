//! Lexical scope management for VJS semantic analysis
//!
//! A stack of name tables with the global scope at the bottom. Each table maps
//! a declared name to the span of its declaration site.

use crate::ast::Span;
use std::collections::HashMap;

/// Kinds of scope the analyzer opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    Loop,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub bindings: HashMap<String, Span>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            bindings: HashMap::new(),
        }
    }
}

/// Scope stack; the global scope can never be popped
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    /// Total number of scopes opened, global included
    opened: usize,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global)],
            opened: 1,
        }
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
        self.opened += 1;
    }

    /// Exit current scope
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes_opened(&self) -> usize {
        self.opened
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.scopes.last().map(|scope| scope.kind).unwrap_or(ScopeKind::Global)
    }

    /// Declare in the innermost scope; a redeclaration replaces the old site
    pub fn declare(&mut self, name: &str, span: Span) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), span);
        }
    }

    /// Declare in the global scope regardless of the current depth
    pub fn declare_global(&mut self, name: &str, span: Span) {
        if let Some(scope) = self.scopes.first_mut() {
            scope.bindings.entry(name.to_string()).or_insert(span);
        }
    }

    /// Find the declaration site, searching from the innermost scope outwards
    pub fn lookup(&self, name: &str) -> Option<Span> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name).copied())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Every name visible from the current scope
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .scopes
            .iter()
            .flat_map(|scope| scope.bindings.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Position;

    fn span_at(line: usize) -> Span {
        Span::single(Position::new(line, 1, 0))
    }

    #[test]
    fn test_lookup_walks_outwards() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", span_at(1));
        scopes.enter_scope(ScopeKind::Function);
        scopes.declare("y", span_at(2));

        assert_eq!(scopes.lookup("x"), Some(span_at(1)));
        assert_eq!(scopes.lookup("y"), Some(span_at(2)));
        assert_eq!(scopes.current_kind(), ScopeKind::Function);

        scopes.exit_scope();
        assert!(scopes.lookup("y").is_none());
        assert!(scopes.is_declared("x"));
    }

    #[test]
    fn test_shadowing_prefers_innermost() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", span_at(1));
        scopes.enter_scope(ScopeKind::Block);
        scopes.declare("x", span_at(5));
        assert_eq!(scopes.lookup("x"), Some(span_at(5)));
    }

    #[test]
    fn test_global_scope_survives_extra_exits() {
        let mut scopes = ScopeStack::new();
        scopes.exit_scope();
        scopes.exit_scope();
        assert_eq!(scopes.depth(), 1);

        scopes.enter_scope(ScopeKind::Loop);
        scopes.declare_global("f", span_at(3));
        scopes.exit_scope();
        assert!(scopes.is_declared("f"));
        assert_eq!(scopes.scopes_opened(), 2);
    }

    #[test]
    fn test_visible_names_are_deduplicated() {
        let mut scopes = ScopeStack::new();
        scopes.declare("b", span_at(1));
        scopes.enter_scope(ScopeKind::Block);
        scopes.declare("a", span_at(2));
        scopes.declare("b", span_at(3));
        assert_eq!(scopes.visible_names(), vec!["a", "b"]);
    }
}
