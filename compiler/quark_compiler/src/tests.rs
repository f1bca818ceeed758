use pretty_assertions::assert_eq;
use quark_diagnostic::emitter::ColorMode;
use quark_diagnostic::{DiagnosticConfig, ErrorCode, ErrorKind, Severity};
use quark_mir::eval::{Evaluator, Value};

use crate::{
    check_unit, compile_unit, compile_units, lower_unit, render_diagnostics, render_json,
    CompileConfig, EmitKind, ErrorPhase,
};

const ADD: &str = "fn add(a: int32, b: int32) -> int32 { return a + b; }";

fn default_config() -> CompileConfig {
    CompileConfig {
        file_path: "test.qrk".to_string(),
        ..CompileConfig::default()
    }
}

fn ir_config() -> CompileConfig {
    CompileConfig {
        emit: EmitKind::Ir,
        ..default_config()
    }
}

// compile_unit

#[test]
fn compiles_to_assembly() {
    let output = compile_unit(ADD, &default_config());
    assert!(
        !output.has_errors(),
        "expected success, got phase={:?}, diagnostics={:?}",
        output.error_phase,
        output.diagnostics
    );
    assert_eq!(output.exit_code(), 0);
    assert!(output.error_phase.is_none());
    let asm = output.artifact.unwrap();
    assert!(asm.contains("\t.globl add\n"), "{asm}");
    assert!(asm.contains("add:\n"));
    assert!(asm.contains(".note.GNU-stack"));
}

#[test]
fn emits_textual_ir_on_request() {
    let output = compile_unit(ADD, &ir_config());
    let ir = output.artifact.unwrap();
    assert!(ir.starts_with("fn @add(v0: i32, v1: i32) -> i32 {\n"), "{ir}");
    assert!(ir.contains("add.i32"));
}

#[test]
fn duplicate_declaration_is_reported_once_at_the_second_site() {
    let source = "fn f() -> int32 { var x = 1; var x = 2; return x; }";
    let output = compile_unit(source, &default_config());
    assert_eq!(output.error_phase, Some(ErrorPhase::Check));
    assert!(output.artifact.is_none());

    let duplicates: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.kind() == ErrorKind::DuplicateDeclaration)
        .collect();
    assert_eq!(duplicates.len(), 1);
    let second = source.rfind("x =").unwrap() as u32;
    assert_eq!(duplicates[0].primary_span().unwrap().start, second);
}

#[test]
fn undeclared_name_stops_before_lowering() {
    let output = compile_unit("fn f() -> int32 { return y; }", &default_config());
    assert_eq!(output.error_phase, Some(ErrorPhase::Check));
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind(), ErrorKind::UndeclaredName);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2002);
    assert!(output.artifact.is_none());
    assert_eq!(output.exit_code(), 1);
}

#[test]
fn syntax_error_reports_parse_phase() {
    let output = compile_unit("fn f() -> int32 { return 1 }", &default_config());
    assert_eq!(output.error_phase, Some(ErrorPhase::Parse));
    assert!(output.artifact.is_none());
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.kind() == ErrorKind::SyntaxError));
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn lexical_and_syntax_errors_are_reported_together() {
    let source = "fn f() -> int32 {\n    var a = 1 $;\n    return a b;\n}";
    let output = compile_unit(source, &default_config());
    assert_eq!(output.error_phase, Some(ErrorPhase::Lex));
    let kinds: Vec<ErrorKind> = output.diagnostics.iter().map(|d| d.kind()).collect();
    assert_eq!(kinds[0], ErrorKind::InvalidCharacter);
    assert!(kinds[1..].contains(&ErrorKind::SyntaxError), "{kinds:?}");
}

#[test]
fn warnings_do_not_block_the_artifact() {
    let source = "fn f() -> int32 { return 1; var x = 2; x = 3; }";
    let output = compile_unit(source, &default_config());
    assert_eq!(output.exit_code(), 0);
    assert!(output.artifact.is_some());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Warning);
    assert_eq!(output.diagnostics[0].kind(), ErrorKind::UnreachableCode);
}

#[test]
fn error_limit_truncates_and_notes_the_rest() {
    let source = "fn f() -> int32 {\n    a = 1;\n    b = 2;\n    c = 3;\n    return 0;\n}";
    let config = CompileConfig {
        diagnostics: DiagnosticConfig {
            error_limit: 2,
            deduplicate: true,
        },
        ..default_config()
    };
    let output = compile_unit(source, &config);
    assert_eq!(output.diagnostics.len(), 3);
    let last = output.diagnostics.last().unwrap();
    assert_eq!(last.code, ErrorCode::E9002);
    assert_eq!(last.severity, Severity::Note);
}

// check_unit / lower_unit

#[test]
fn deeply_nested_blocks_compile() {
    let depth = 20_000;
    let source = format!(
        "fn f() -> int32 {{ {}return 1;{} }}",
        "{ ".repeat(depth),
        " }".repeat(depth)
    );
    let output = compile_unit(&source, &default_config());
    assert!(output.error_phase.is_none(), "{:?}", output.diagnostics);
    assert!(output.artifact.is_some());
}

#[test]
fn deeply_nested_ifs_compile() {
    let depth = 20_000;
    let source = format!(
        "fn f() -> int32 {{ {}return 1;{} return 0; }}",
        "if true { ".repeat(depth),
        " }".repeat(depth)
    );
    let output = compile_unit(&source, &default_config());
    assert!(output.error_phase.is_none(), "{:?}", output.diagnostics);
    assert!(output.artifact.unwrap().contains("f:\n"));
}

#[test]
fn check_unit_produces_no_artifact() {
    let clean = check_unit(ADD, &default_config());
    assert!(clean.artifact.is_none());
    assert!(clean.diagnostics.is_empty());
    assert!(clean.error_phase.is_none());

    let broken = check_unit("fn f() -> int32 { return y; }", &default_config());
    assert_eq!(broken.error_phase, Some(ErrorPhase::Check));
    assert_eq!(broken.exit_code(), 1);
}

#[test]
fn lowered_units_evaluate() {
    let lowered = lower_unit(ADD, &default_config()).unwrap();
    assert!(lowered.diagnostics.is_empty());
    let mut eval = Evaluator::new(&lowered.ir, &lowered.interner);
    let sum = eval
        .call("add", &[Value::from_i64(2), Value::from_i64(3)])
        .unwrap()
        .unwrap();
    assert_eq!(sum.as_i64(), Some(5));
}

#[test]
fn lower_unit_returns_front_end_diagnostics_on_failure() {
    let err = lower_unit("fn f() -> int32 { return true; }", &default_config()).unwrap_err();
    assert_eq!(err.error_phase, Some(ErrorPhase::Check));
    assert!(err.has_errors());
}

// compile_units

#[test]
fn parallel_units_keep_input_order() {
    let sources = [
        ADD.to_string(),
        "fn f() -> int32 { return y; }".to_string(),
        "fn g() -> int64 { return 7; }".to_string(),
    ];
    let outputs = compile_units(&sources, &default_config());
    assert_eq!(outputs.len(), 3);
    assert!(outputs[0].artifact.as_deref().unwrap().contains("add:"));
    assert_eq!(outputs[1].error_phase, Some(ErrorPhase::Check));
    assert!(outputs[2].artifact.as_deref().unwrap().contains("g:"));
}

// rendering

#[test]
fn renders_diagnostics_with_snippet_and_summary() {
    let source = "fn f() -> int32 { return y; }";
    let output = compile_unit(source, &default_config());
    let text = render_diagnostics(source, "test.qrk", &output.diagnostics, ColorMode::Never);
    assert!(text.starts_with("error[E2002]:"), "{text}");
    assert!(text.contains("--> test.qrk:1:26"));
    assert!(text.ends_with("error: aborting due to previous error\n"));
}

#[test]
fn renders_json_records() {
    let source = "fn f() -> int32 { return y; }";
    let output = compile_unit(source, &default_config());
    let json = render_json(source, "test.qrk", &output.diagnostics);
    assert!(json.starts_with("[\n"));
    assert!(json.contains("\"kind\": \"UndeclaredName\""));
    assert!(json.contains("\"column\": 26,"));
}

#[test]
fn artifact_extensions_follow_the_emit_kind() {
    assert_eq!(EmitKind::Assembly.extension(), "s");
    assert_eq!(EmitKind::Ir.extension(), "qir");
}

#[test]
fn tracing_init_is_idempotent() {
    crate::init_tracing();
    crate::init_tracing();
}
