//! Code generator tests

use super::*;
use crate::ast::*;
use crate::lexer::{tokenize, Position};
use crate::parser::parse;

fn js(source: &str) -> String {
    let tokens = tokenize(source).expect("source should lex");
    let program = parse(&tokens).expect("source should parse");
    generate(&program).expect("program should generate")
}

fn span() -> Span {
    Span::single(Position::start())
}

fn ident(name: &str) -> Expr {
    Expr::Identifier {
        name: name.to_string(),
        span: span(),
    }
}

fn number(text: &str) -> Expr {
    Expr::Literal {
        value: Literal::Number(text.to_string()),
        span: span(),
    }
}

fn expression_statement(expression: Expr) -> Stmt {
    Stmt::Expression { expression, span: span() }
}

fn program(body: Vec<Stmt>) -> Program {
    Program { body, span: span() }
}

fn function(name: Option<&str>, body: Option<Vec<Stmt>>) -> Function {
    Function {
        name: name.map(|n| Identifier::new(n.to_string(), span())),
        params: Vec::new(),
        return_type: None,
        body: body.map(|body| Block { body, span: span() }),
        span: span(),
    }
}

#[test]
fn test_code_builder() {
    let mut builder = CodeBuilder::new();
    builder.open_block("function main()");
    builder.line("return 0;");
    builder.close_block();
    assert_eq!(builder.code(), "function main() {\n  return 0;\n}\n");
}

#[test]
fn test_code_builder_collapses_empty_blocks() {
    let mut builder = CodeBuilder::with_indent("    ".to_string(), 1);
    builder.open_block("if (x)");
    builder.reopen_block("else");
    builder.line("y();");
    builder.close_block();
    assert_eq!(builder.build(), "    if (x) {} else {\n        y();\n    }");
}

#[test]
fn test_code_builder_block_restores_indent_on_error() {
    let mut builder = CodeBuilder::new();
    let result: Result<(), &str> = builder.block("while (x)", |b| {
        b.line("f();");
        Err("boom")
    });
    assert!(result.is_err());
    assert_eq!(builder.indent_level(), 0);
    assert_eq!(builder.code(), "while (x) {\n  f();\n}\n");
}

#[test]
fn test_function_declaration() {
    assert_eq!(
        js("funcao soma(a, b) { retorne a + b; }"),
        "function soma(a, b) {\n  return a + b;\n}"
    );
}

#[test]
fn test_precedence_round_trip() {
    assert_eq!(js("1 + 2 * 3"), "1 + 2 * 3;");
    assert_eq!(js("(1 + 2) * 3"), "(1 + 2) * 3;");
    assert_eq!(js("a - (b - c)"), "a - (b - c);");
    assert_eq!(js("a - b - c"), "a - b - c;");
    assert_eq!(js("(a = b) + 1"), "(a = b) + 1;");
}

#[test]
fn test_exponent_grouping() {
    assert_eq!(js("2 ** 3 ** 2"), "2 ** 3 ** 2;");
    assert_eq!(js("(2 ** 3) ** 2"), "(2 ** 3) ** 2;");
    assert_eq!(js("-2 ** 2"), "(-2) ** 2;");
}

#[test]
fn test_logical_mixing_with_nullish() {
    assert_eq!(js("a ?? (b || c)"), "a ?? (b || c);");
    assert_eq!(js("(a && b) ?? c"), "(a && b) ?? c;");
    assert_eq!(js("a || b && c"), "a || b && c;");
    assert_eq!(js("(a || b) && c"), "(a || b) && c;");
}

#[test]
fn test_unary_operators_do_not_fuse() {
    assert_eq!(js("- -x"), "- -x;");
    assert_eq!(js("-(-x)"), "- -x;");
    assert_eq!(js("+ ++x"), "+ ++x;");
    assert_eq!(js("!(a && b)"), "!(a && b);");
    assert_eq!(js("tipoDe x"), "typeof x;");
}

#[test]
fn test_identifier_and_method_mapping() {
    assert_eq!(js("mostrar(\"oi\")"), "console.log(\"oi\");");
    assert_eq!(js("lista.adicionar(1)"), "lista.push(1);");
    assert_eq!(js("nome.tamanho"), "nome.length;");
    assert_eq!(js("texto.maiusculo()"), "texto.toUpperCase();");
    // Bare calls and non-call members keep their names
    assert_eq!(js("adicionar(1)"), "adicionar(1);");
    assert_eq!(js("obj.adicionar"), "obj.adicionar;");
    assert_eq!(js("x = piso(aleatorio() * 10)"), "x = Math.floor(Math.random() * 10);");
}

#[test]
fn test_binding_sites_are_not_remapped() {
    assert_eq!(
        js("funcao mostrar(tamanho) { retorne { tamanho: tamanho } }"),
        "function mostrar(tamanho) {\n  return { tamanho: tamanho };\n}"
    );
}

#[test]
fn test_declarations_erase_types() {
    assert_eq!(
        js("variavel a: Numero = 1, b\nconstante C: Texto[] = []"),
        "let a = 1, b;\nconst C = [];"
    );
}

#[test]
fn test_control_flow() {
    let source = "se (x > 1) mostrar(x) senao se x { y() } senao { }";
    assert_eq!(
        js(source),
        "if (x > 1) {\n  console.log(x);\n} else if (x) {\n  y();\n} else {}"
    );

    assert_eq!(js("enquanto i < 3 i++"), "while (i < 3) {\n  i++;\n}");
    assert_eq!(
        js("para (variavel i = 0; i < 3; i++) { }"),
        "for (let i = 0; i < 3; i++) {}"
    );
    assert_eq!(js("para (;;) { pare() }"), "for (;;) {\n  pare();\n}");
    assert_eq!(
        js("para constante x de lista mostrar(x)"),
        "for (const x of lista) {\n  console.log(x);\n}"
    );
}

#[test]
fn test_nested_blocks_indent() {
    let source = "funcao f() { se (a) { enquanto (b) { retorne } } }";
    assert_eq!(
        js(source),
        "function f() {\n  if (a) {\n    while (b) {\n      return;\n    }\n  }\n}"
    );
}

#[test]
fn test_custom_indent() {
    let tokens = tokenize("funcao f() { retorne 1 }").unwrap();
    let program = parse(&tokens).unwrap();
    let options = GeneratorOptions { indent: "\t".to_string() };
    assert_eq!(
        generate_with_options(&program, &options).unwrap(),
        "function f() {\n\treturn 1;\n}"
    );
}

#[test]
fn test_class_generation() {
    let source = r#"
        classe Cachorro estende Animal implementa Falante {
            @registrado
            privado estatico #total: Numero = 0
            nome: Texto
            construtor(nome) { super(nome); isso.nome = nome }
            get apelido() { retorne isso.nome }
            estatico criar() { retorne novo Cachorro("Rex") }
            abstrato mover(): vazio;
        }
    "#;
    let expected = "class Cachorro extends Animal {\n  static #total = 0;\n  nome;\n  constructor(nome) {\n    super(nome);\n    this.nome = nome;\n  }\n  get apelido() {\n    return this.nome;\n  }\n  static criar() {\n    return new Cachorro(\"Rex\");\n  }\n}";
    assert_eq!(js(source), expected);
}

#[test]
fn test_function_expression_indentation() {
    let source = "funcao f() { variavel g = funcao (a) { retorne a } }";
    assert_eq!(
        js(source),
        "function f() {\n  let g = function (a) {\n    return a;\n  };\n}"
    );
}

#[test]
fn test_ambiguous_statement_starts_are_wrapped() {
    assert_eq!(js("({ a: 1 }).a"), "({ a: 1 }.a);");
    assert_eq!(js("(funcao () { })()"), "(function () {}());");
    assert_eq!(js("functionName()"), "functionName();");
}

#[test]
fn test_member_and_call_forms() {
    assert_eq!(js("a?.b?.[0]?.(1)"), "a?.b?.[0]?.(1);");
    assert_eq!(js("isso.#segredo"), "this.#segredo;");
    assert_eq!(js("(a + b).c"), "(a + b).c;");
    assert_eq!(js("(1).paraTexto()"), "(1).toString();");
    assert_eq!(js("novo Map"), "new Map();");
    assert_eq!(js("novo (fabrica())()"), "new (fabrica())();");
    assert_eq!(js("novo a.B(1).c"), "new a.B(1).c;");
}

#[test]
fn test_literals_are_verbatim() {
    assert_eq!(js("x = 'a\\'b'"), "x = 'a\\'b';");
    assert_eq!(js("x = `ola ${nome}`"), "x = `ola ${nome}`;");
    assert_eq!(js("x = [0x1F, 1.5e3, verdadeiro, falso, nulo]"), "x = [0x1F, 1.5e3, true, false, null];");
    assert_eq!(js("x = {}"), "x = {};");
    assert_eq!(js("x = { \"a b\": 1, 2: c }"), "x = { \"a b\": 1, 2: c };");
}

#[test]
fn test_every_node_kind_generates() {
    let body = vec![
        Stmt::VariableDeclaration(VariableDeclaration {
            kind: DeclarationKind::Let,
            declarations: vec![VariableDeclarator {
                id: Identifier::new("x".to_string(), span()),
                type_annotation: None,
                init: None,
                span: span(),
            }],
            span: span(),
        }),
        Stmt::FunctionDeclaration(function(Some("f"), Some(Vec::new()))),
        Stmt::ClassDeclaration(Class {
            name: Identifier::new("C".to_string(), span()),
            super_class: None,
            implements: Vec::new(),
            members: vec![
                ClassMember::Method(MethodDefinition {
                    key: PropertyKey::Identifier("m".to_string()),
                    kind: MethodKind::Method,
                    function: function(None, Some(Vec::new())),
                    modifiers: Modifiers::default(),
                    decorators: Vec::new(),
                    span: span(),
                }),
                ClassMember::Field(FieldDefinition {
                    key: PropertyKey::Identifier("p".to_string()),
                    type_annotation: None,
                    value: None,
                    modifiers: Modifiers::default(),
                    decorators: Vec::new(),
                    span: span(),
                }),
            ],
            span: span(),
        }),
        Stmt::Block(Block { body: Vec::new(), span: span() }),
        Stmt::If {
            test: ident("a"),
            consequent: Box::new(Stmt::Block(Block { body: Vec::new(), span: span() })),
            alternate: None,
            span: span(),
        },
        Stmt::For {
            init: None,
            test: None,
            update: None,
            body: Box::new(Stmt::Block(Block { body: Vec::new(), span: span() })),
            span: span(),
        },
        Stmt::ForOf {
            kind: DeclarationKind::Const,
            binding: Identifier::new("v".to_string(), span()),
            type_annotation: None,
            iterable: ident("xs"),
            body: Box::new(Stmt::Block(Block { body: Vec::new(), span: span() })),
            span: span(),
        },
        Stmt::While {
            test: ident("a"),
            body: Box::new(Stmt::Block(Block { body: Vec::new(), span: span() })),
            span: span(),
        },
        Stmt::Return { argument: None, span: span() },
    ];

    let expressions = vec![
        number("1"),
        ident("a"),
        Expr::This { span: span() },
        Expr::Super { span: span() },
        Expr::Array { elements: Vec::new(), span: span() },
        Expr::Object { properties: Vec::new(), span: span() },
        Expr::Function(Box::new(function(None, Some(Vec::new())))),
        Expr::Unary { op: UnaryOp::Not, operand: Box::new(ident("a")), span: span() },
        Expr::Update {
            op: UpdateOp::Increment,
            prefix: false,
            argument: Box::new(ident("a")),
            span: span(),
        },
        Expr::Binary {
            left: Box::new(number("1")),
            op: BinaryOp::Add,
            right: Box::new(number("2")),
            span: span(),
        },
        Expr::Logical {
            left: Box::new(ident("a")),
            op: LogicalOp::And,
            right: Box::new(ident("b")),
            span: span(),
        },
        Expr::Assignment {
            op: AssignOp::Assign,
            target: Box::new(ident("a")),
            value: Box::new(number("1")),
            span: span(),
        },
        Expr::Call {
            callee: Box::new(ident("f")),
            arguments: Vec::new(),
            optional: false,
            span: span(),
        },
        Expr::New {
            callee: Box::new(ident("C")),
            arguments: Vec::new(),
            span: span(),
        },
        Expr::Member {
            object: Box::new(ident("a")),
            property: MemberProperty::Identifier("b".to_string()),
            optional: false,
            span: span(),
        },
    ];

    for stmt in body {
        let kind = stmt.kind_name();
        let code = generate(&program(vec![stmt])).unwrap_or_else(|e| panic!("{} failed: {}", kind, e));
        assert!(!code.is_empty(), "{} produced no text", kind);
    }
    for expr in expressions {
        let kind = expr.kind_name();
        let code = generate(&program(vec![expression_statement(expr)]))
            .unwrap_or_else(|e| panic!("{} failed: {}", kind, e));
        assert!(code.len() > 1, "{} produced no text", kind);
    }

    assert_eq!(generate(&program(Vec::new())).unwrap(), "");
}

#[test]
fn test_internal_errors_for_impossible_shapes() {
    let empty_declaration = Stmt::VariableDeclaration(VariableDeclaration {
        kind: DeclarationKind::Let,
        declarations: Vec::new(),
        span: span(),
    });
    let err = generate(&program(vec![empty_declaration])).unwrap_err();
    assert_eq!(err.node_kind, "VariableDeclaration");

    let bad_assignment = expression_statement(Expr::Assignment {
        op: AssignOp::Assign,
        target: Box::new(number("5")),
        value: Box::new(ident("x")),
        span: span(),
    });
    let err = generate(&program(vec![bad_assignment])).unwrap_err();
    assert_eq!(err.node_kind, "AssignmentExpression");

    let nameless = Stmt::FunctionDeclaration(function(None, Some(Vec::new())));
    assert!(generate(&program(vec![nameless])).is_err());

    let bodiless = Stmt::FunctionDeclaration(function(Some("f"), None));
    assert!(generate(&program(vec![bodiless])).is_err());
}

#[test]
fn test_failed_if_chain_restores_indent() {
    let bad_assignment = expression_statement(Expr::Assignment {
        op: AssignOp::Assign,
        target: Box::new(number("5")),
        value: Box::new(ident("x")),
        span: span(),
    });
    let chain = Stmt::If {
        test: ident("a"),
        consequent: Box::new(expression_statement(ident("b"))),
        alternate: Some(Box::new(Stmt::If {
            test: ident("c"),
            consequent: Box::new(bad_assignment),
            alternate: None,
            span: span(),
        })),
        span: span(),
    };

    let mut context = CodegenContext::default();
    let mut builder = context.builder_at(1);
    let err = StatementGenerator::new(&mut context)
        .generate_statement(&chain, &mut builder)
        .unwrap_err();
    assert_eq!(err.node_kind, "AssignmentExpression");
    assert_eq!(builder.indent_level(), 1);

    builder.line("depois();");
    assert!(builder.code().ends_with("\n  depois();\n"), "{:?}", builder.code());
}

#[test]
fn test_metrics_are_recorded() {
    let tokens = tokenize("variavel x = 1 + 2").unwrap();
    let program = parse(&tokens).unwrap();
    let mut generator = JsGenerator::default();
    generator.generate(&program).unwrap();
    assert_eq!(generator.metrics().statements_generated, 1);
    assert_eq!(generator.metrics().expressions_generated, 3);
}
