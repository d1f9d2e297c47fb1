//! Parser integration tests
//!
//! These tests parse complete VJS programs and check tree shapes, alias
//! independence and the errors reported for malformed input.

use serde_json::Value;
use vjs::ast::*;
use vjs::lexer::{tokenize, Position};
use vjs::parser::{parse, ParseContext, ParseError, ParseResult};

fn parse_source(source: &str) -> ParseResult<Program> {
    let tokens = tokenize(source).expect("source should lex");
    parse(&tokens)
}

fn parse_ok(source: &str) -> Program {
    match parse_source(source) {
        Ok(program) => program,
        Err(e) => panic!("Failed to parse {:?}: {}", source, e),
    }
}

/// Tree as JSON with every position removed
fn shape(program: &Program) -> Value {
    fn strip(value: &mut Value) {
        match value {
            Value::Object(map) => {
                map.remove("span");
                map.values_mut().for_each(strip);
            }
            Value::Array(items) => items.iter_mut().for_each(strip),
            _ => {}
        }
    }

    let mut value = serde_json::to_value(program).expect("AST should serialize");
    strip(&mut value);
    value
}

/// Test parsing a complete VJS program
#[test]
fn test_parse_complete_program() {
    let source = r#"
        classe Fila estende Base {
            privado itens: Numero[] = [];

            construtor() {
                super();
            }

            adicionar(item: Numero): vazio {
                isso.itens.adicionar(item);
            }

            abstrato processar(): vazio;
        }

        funcao fatorial(n: Numero): Numero {
            se n <= 1 {
                retorne 1;
            }
            retorne n * fatorial(n - 1);
        }

        constante fila = novo Fila();
        para (variavel i = 0; i < 5; i += 1) fila.adicionar(fatorial(i));
    "#;

    let program = parse_ok(source);
    assert_eq!(program.body.len(), 4);

    match &program.body[0] {
        Stmt::ClassDeclaration(class) => {
            assert_eq!(class.name.name, "Fila");
            assert!(matches!(class.super_class, Some(Expr::Identifier { ref name, .. }) if name == "Base"));
            assert_eq!(class.members.len(), 4);
            match &class.members[3] {
                ClassMember::Method(method) => {
                    assert!(method.modifiers.is_abstract);
                    assert!(method.function.body.is_none());
                }
                other => panic!("Expected abstract method, got {:?}", other),
            }
        }
        other => panic!("Expected class declaration, got {:?}", other),
    }

    match &program.body[1] {
        Stmt::FunctionDeclaration(function) => {
            assert_eq!(function.name.as_ref().map(|n| n.name.as_str()), Some("fatorial"));
            assert_eq!(function.params.len(), 1);
            assert!(function.return_type.is_some());
            assert_eq!(function.body.as_ref().map(|b| b.body.len()), Some(2));
        }
        other => panic!("Expected function declaration, got {:?}", other),
    }

    assert!(matches!(
        &program.body[2],
        Stmt::VariableDeclaration(VariableDeclaration { kind: DeclarationKind::Const, .. })
    ));

    match &program.body[3] {
        Stmt::For { init, test, update, body, .. } => {
            assert!(matches!(init, Some(ForInit::Declaration(_))));
            assert!(test.is_some());
            assert!(matches!(update, Some(Expr::Assignment { op: AssignOp::AddAssign, .. })));
            assert!(matches!(**body, Stmt::Expression { .. }));
        }
        other => panic!("Expected for statement, got {:?}", other),
    }
}

#[test]
fn test_aliases_produce_identical_trees() {
    let portuguese = parse_ok(
        "classe A estende B { construtor() { super(); } }\n\
         funcao f(x) { se (x instanciaDe A) { retorne verdadeiro; } senao { retorne nulo; } }\n\
         variavel a = novo A(); constante t = tipoDe isso;\n\
         para variavel v de [1] { enquanto (falso) { } }",
    );
    let english = parse_ok(
        "class A extends B { constructor() { super(); } }\n\
         function f(x) { if (x instanceof A) { return true; } else { return null; } }\n\
         let a = new A(); const t = typeof this;\n\
         for let v de [1] { while (false) { } }",
    );
    assert_eq!(shape(&portuguese), shape(&english));
}

#[test]
fn test_var_is_a_let_alias() {
    assert_eq!(shape(&parse_ok("var x = 1;")), shape(&parse_ok("variavel x = 1;")));
}

#[test]
fn test_dump_uses_node_type_names() {
    let json = shape(&parse_ok("f(a.b = 1)"));
    assert_eq!(json["type"], "Program");
    assert_eq!(json["body"][0]["type"], "ExpressionStatement");
    assert_eq!(json["body"][0]["expression"]["type"], "CallExpression");
    assert_eq!(json["body"][0]["expression"]["arguments"][0]["type"], "AssignmentExpression");
}

#[test]
fn test_precedence_ladder() {
    let program = parse_ok("a = b || c && d == e < f + g * h ** i");
    let Stmt::Expression { expression, .. } = &program.body[0] else {
        panic!("Expected expression statement");
    };

    let mut kinds = Vec::new();
    let mut current = expression;
    loop {
        kinds.push(current.kind_name());
        current = match current {
            Expr::Assignment { value, .. } => &**value,
            Expr::Logical { right, .. } | Expr::Binary { right, .. } => &**right,
            _ => break,
        };
    }
    assert_eq!(kinds, vec![
        "AssignmentExpression",
        "LogicalExpression",
        "LogicalExpression",
        "BinaryExpression",
        "BinaryExpression",
        "BinaryExpression",
        "BinaryExpression",
        "BinaryExpression",
        "Identifier",
    ]);
}

#[test]
fn test_invalid_assignment_targets() {
    for (source, kind) in [
        ("5 = x;", "Literal"),
        ("f() = 1;", "CallExpression"),
        ("(a + b) = 1;", "BinaryExpression"),
        ("a = b = 3 += 1;", "Literal"),
        ("isso = 1;", "ThisExpression"),
        ("1++;", "Literal"),
    ] {
        match parse_source(source) {
            Err(ParseError::InvalidAssignmentTarget { target_kind, .. }) => {
                assert_eq!(target_kind, kind, "wrong target kind for {:?}", source)
            }
            other => panic!("Expected invalid target for {:?}, got {:?}", source, other),
        }
    }

    assert!(parse_source("a.b[c] = d.e = 1;").is_ok());
    assert!(parse_source("isso.#saldo -= 1;").is_ok());
}

#[test]
fn test_missing_parenthesis_reports_context() {
    match parse_source("funcao soma(a b) {}") {
        Err(ParseError::UnexpectedToken {
            found_text,
            position,
            context,
            ..
        }) => {
            assert_eq!(found_text, "b");
            assert_eq!(position, Position::new(1, 15, 14));
            assert_eq!(context, ParseContext::FunctionParameters);
        }
        other => panic!("Expected unexpected token, got {:?}", other),
    }
}

#[test]
fn test_truncated_input() {
    for source in ["funcao f(", "se (x) {", "variavel x =", "classe A {"] {
        assert!(
            matches!(parse_source(source), Err(ParseError::UnexpectedEof { .. })),
            "expected end-of-input error for {:?}",
            source
        );
    }
}

#[test]
fn test_parse_is_deterministic() {
    let source = "variavel x: Texto = 'a' + b?.c ?? d;";
    assert_eq!(parse_ok(source), parse_ok(source));
}
