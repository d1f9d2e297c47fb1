//! Command-line front end tests
//!
//! These drive the `vjs` binary as a subprocess.

use std::fs;
use std::process::{Command, Output};

fn vjs(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vjs"))
        .args(args)
        .output()
        .expect("failed to run vjs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_compile_inline_source() {
    let output = vjs(&["compile", "-e", "funcao soma(a, b) { retorne a + b; }"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "function soma(a, b) {\n  return a + b;\n}\n");
}

#[test]
fn test_compile_file_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("programa.vjs");
    let target = dir.path().join("programa.js");
    fs::write(&input, "variavel nome: Texto = 'Ana'\nmostrar(nome.tamanho)\n").unwrap();

    let output = vjs(&["compile", input.to_str().unwrap(), "-o", target.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "let nome = 'Ana';\nconsole.log(nome.length);\n"
    );
}

#[test]
fn test_dump_tokens_and_ast() {
    let output = vjs(&["tokens", "-e", "x = 1"]);
    assert!(output.status.success());
    let tokens: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(tokens.as_array().map(Vec::len), Some(4));

    let output = vjs(&["ast", "--pretty", "-e", "x = 1"]);
    assert!(output.status.success());
    let ast: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(ast["type"], "Program");
    assert_eq!(ast["body"][0]["expression"]["type"], "AssignmentExpression");
}

#[test]
fn test_errors_carry_their_stage() {
    let output = vjs(&["compile", "-e", "variavel = 1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("[parse] "), "{}", stderr(&output));

    let output = vjs(&["tokens", "-e", "'aberta"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("[lex] "), "{}", stderr(&output));

    let output = vjs(&["compile", "--check", "-e", "mostrar(y)"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("[semantic] Undefined variable 'y' at 1:9"));
}

#[test]
fn test_check_lists_every_diagnostic() {
    let output = vjs(&["check", "-e", "mostrar(a)\nmostrar(b)"]);
    assert!(!output.status.success());
    let report = stderr(&output);
    assert!(report.contains("'a' at 1:9"));
    assert!(report.contains("'b' at 2:9"));

    let output = vjs(&["check", "-e", "variavel a = 1\nmostrar(a)"]);
    assert!(output.status.success());
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("vjs.json");
    fs::write(&config, r#"{ "indent": "    ", "analyze": true, "analyzer": { "extra_builtins": ["documento"] } }"#).unwrap();

    let output = vjs(&[
        "compile",
        "--config",
        config.to_str().unwrap(),
        "-e",
        "se documento { mostrar(1) }",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "if (documento) {\n    console.log(1);\n}\n");

    fs::write(&config, "{ not json").unwrap();
    let output = vjs(&["compile", "--config", config.to_str().unwrap(), "-e", "x"]);
    assert!(stderr(&output).starts_with("[config] "));
}

#[test]
fn test_run_without_node_is_an_execution_error() {
    let output = vjs(&["run", "--node", "/nonexistent/node", "-e", "mostrar(1)"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("[execute] Failed to start"), "{}", stderr(&output));
}

#[test]
fn test_input_is_required() {
    let output = vjs(&["compile"]);
    assert!(!output.status.success());
}
