//! Semantic analysis integration tests
//!
//! These tests run the analyzer over complete parsed VJS programs.

use vjs::ast::Program;
use vjs::lexer::{tokenize, Position};
use vjs::parser::parse;
use vjs::semantic::{analyze, AnalysisResult, AnalyzerConfig, SemanticAnalyzer, SemanticError};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source).expect("source should lex");
    parse(&tokens).expect("source should parse")
}

fn analyze_source(source: &str) -> AnalysisResult {
    SemanticAnalyzer::new().analyze(&parse_source(source))
}

/// Test semantic analysis of a program that uses every scope kind
#[test]
fn test_semantic_complete_program() {
    let source = r#"
        classe Contador estende Base {
            privado valor: Numero = 0;

            construtor(inicial: Numero) {
                super();
                isso.valor = inicial;
            }

            incrementar(): vazio {
                isso.valor++;
            }

            get atual(): Numero {
                retorne isso.valor;
            }
        }

        funcao criar(n: Numero): Contador {
            retorne novo Contador(n);
        }

        constante contadores: Contador[] = [];
        para (variavel i = 0; i < 3; i++) {
            contadores.adicionar(criar(i));
        }
        para constante c de contadores {
            c.incrementar();
            mostrar(c.atual, Math.max(1, 2), console);
        }
        enquanto (falso) {
            variavel interno = aleatorio();
            escreva(interno);
        }
    "#;

    let result = SemanticAnalyzer::with_config(AnalyzerConfig {
        extra_builtins: vec!["Base".to_string()],
        ..AnalyzerConfig::default()
    })
    .analyze(&parse_source(source));

    assert!(result.is_ok(), "Program should have no semantic errors: {:?}", result.errors);
    assert!(result.stats.references_checked > 10);
    assert_eq!(result.stats.annotations_checked, 7);
    assert!(result.stats.scopes_created > 5);
}

#[test]
fn test_semantic_reports_every_error() {
    let source = "classe A { }\nclasse A { }\nvariavel x: Desconhecido = y\nmostrar(z)";
    let errors = match analyze(&parse_source(source)) {
        Ok(()) => panic!("Expected semantic errors"),
        Err(errors) => errors,
    };

    assert_eq!(errors.len(), 4);
    assert_eq!(
        errors[0],
        SemanticError::DuplicateClass {
            name: "A".to_string(),
            position: Position::new(2, 8, 20),
        }
    );
    assert!(errors.iter().any(|e| matches!(e, SemanticError::InvalidType { name, .. } if name == "Desconhecido")));
    assert!(errors.iter().any(|e| matches!(e, SemanticError::UndefinedVariable { name, .. } if name == "y")));
    assert_eq!(errors.last().map(SemanticError::position), Some(Position::new(4, 9, 63)));
}

#[test]
fn test_semantic_block_scoping() {
    let result = analyze_source("se verdadeiro { variavel a = 1 }\nmostrar(a)");
    assert_eq!(result.errors.len(), 1);

    let result = analyze_source("para variavel item de [1] { }\nmostrar(item)");
    assert_eq!(result.errors.len(), 1);

    let result = analyze_source("funcao f(p) { }\nmostrar(p)");
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_semantic_self_reference_in_initializer() {
    assert!(analyze_source("variavel x = x").is_ok());
}

#[test]
fn test_semantic_does_not_change_the_tree() {
    let program = parse_source("variavel a = b; classe C { }");
    let before = program.clone();
    let _ = analyze(&program);
    assert_eq!(program, before);
}
