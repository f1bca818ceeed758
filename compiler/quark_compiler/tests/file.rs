#![allow(clippy::unwrap_used)]

use std::fs;

use quark_compiler::{artifact_path, compile_file, CompileConfig, DriverError, EmitKind};

#[test]
fn writes_assembly_beside_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("main.qrk");
    fs::write(&input, "fn main() -> int32 { return 0; }").unwrap();

    let config = CompileConfig::default();
    let output = compile_file(&input, &config).unwrap();
    assert_eq!(output.unit.exit_code(), 0);

    let written = output.artifact_path.unwrap();
    assert_eq!(written, dir.path().join("main.s"));
    assert_eq!(written, artifact_path(&input, &config));
    assert!(fs::read_to_string(&written).unwrap().contains("main:\n"));
}

#[test]
fn writes_ir_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lib.qrk");
    fs::write(&input, "fn seven() -> int64 { return 7; }").unwrap();

    let config = CompileConfig {
        emit: EmitKind::Ir,
        ..CompileConfig::default()
    };
    let output = compile_file(&input, &config).unwrap();
    let written = output.artifact_path.unwrap();
    assert_eq!(written.extension().unwrap(), "qir");
    assert!(fs::read_to_string(written).unwrap().starts_with("fn @seven() -> i64 {"));
}

#[test]
fn compile_errors_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.qrk");
    fs::write(&input, "fn f() -> int32 { return y; }").unwrap();

    let output = compile_file(&input, &CompileConfig::default()).unwrap();
    assert_eq!(output.unit.exit_code(), 1);
    assert!(output.artifact_path.is_none());
    assert!(!dir.path().join("bad.s").exists());
    assert_eq!(output.source, "fn f() -> int32 { return y; }");
}

#[test]
fn missing_input_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.qrk");
    let err = compile_file(&input, &CompileConfig::default()).unwrap_err();
    assert!(matches!(err, DriverError::Read { ref path, .. } if *path == input));
    assert!(err.to_string().starts_with("cannot read `"));
}
