//! Checker tests over real source text.

use super::*;
use pretty_assertions::assert_eq;
use quark_diagnostic::ErrorCode;
use quark_ir::ExprKind;
use quark_parse::ParseOutput;

use crate::{ConstValue, StorageClass};

fn check_source(source: &str) -> (TypeCheckResult, ParseOutput, StringInterner) {
    let mut interner = StringInterner::new();
    let lexed = quark_lexer::lex(source, &mut interner);
    assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
    let parsed = quark_parse::parse(&lexed.tokens, &interner);
    assert!(!parsed.has_errors(), "{:?}", parsed.errors);
    let result = check_module(&parsed.module, &parsed.arena, &interner);
    (result, parsed, interner)
}

fn error_codes(source: &str) -> Vec<ErrorCode> {
    let (result, _, _) = check_source(source);
    result.errors.iter().map(TypeCheckError::code).collect()
}

const PROGRAM: &str = r"
struct Point { x: int32, y: int32 }

extern fn putchar(c: int32) -> int32;

var origin: int64 = 0;

fn dist2(p: *Point) -> int32 {
    var dx = p.x;
    var dy: int32 = (*p).y;
    return dx * dx + dy * dy;
}

fn main() -> int32 {
    var i = 0;
    while i < 10 {
        if i % 2 == 0 { putchar(48 + i); } else { i = i + 1; continue; }
        i = i + 1;
    }
    return 0;
}
";

#[test]
fn clean_program_has_no_diagnostics() {
    let (result, parsed, _) = check_source(PROGRAM);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    for (id, _) in parsed.arena.exprs() {
        assert!(
            !result.typed.expr_type(id).is_error(),
            "expression {id:?} has the error type"
        );
    }
}

#[test]
fn signatures_and_parameters_are_recorded() {
    let (result, _, interner) = check_source(PROGRAM);
    let typed = &result.typed;
    let main = &typed.functions[&interner.get("main").unwrap()];
    assert_eq!(main.ret, Idx::INT32);
    assert!(main.params.is_empty());
    let dist2 = &typed.functions[&interner.get("dist2").unwrap()];
    assert_eq!(dist2.param_symbols.len(), 1);
    assert!(typed.pool.is_pointer(dist2.params[0]));
    let putchar = &typed.functions[&interner.get("putchar").unwrap()];
    assert!(putchar.is_extern);
    let origin = &typed.globals[&interner.get("origin").unwrap()];
    assert_eq!(origin.ty, Idx::INT64);
    assert_eq!(origin.init, Some(ConstValue::Int(0)));
}

#[test]
fn add_checks_clean() {
    let (result, parsed, _) = check_source(
        "fn add(a: int32, b: int32) -> int32 { return a + b; }
         fn main() -> int32 { return add(2, 3); }",
    );
    assert!(!result.has_errors());
    let idents = parsed
        .arena
        .exprs()
        .filter(|(_, e)| matches!(e.kind, ExprKind::Ident(_)))
        .count();
    let resolved = parsed
        .arena
        .exprs()
        .filter(|(id, e)| {
            matches!(e.kind, ExprKind::Ident(_)) && result.typed.resolution(*id).is_some()
        })
        .count();
    assert_eq!(idents, resolved);
}

#[test]
fn duplicate_local_reported_once_at_second_name() {
    let source = "fn f() -> int32 { var x = 1; var x = 2; return x; }";
    let (result, _, _) = check_source(source);
    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    assert_eq!(error.code(), ErrorCode::E2005);
    let second = source.rfind("x =").unwrap();
    assert_eq!(error.span.start as usize, second);
}

#[test]
fn parameters_share_the_outermost_scope() {
    assert_eq!(
        error_codes("fn f(a: int32) -> int32 { var a = 1; return a; }"),
        vec![ErrorCode::E2005]
    );
}

#[test]
fn inner_blocks_may_shadow() {
    assert_eq!(
        error_codes("fn f(a: int32) -> int32 { { var a = 2; a = 3; } return a; }"),
        vec![]
    );
}

#[test]
fn undeclared_name_is_one_error() {
    assert_eq!(
        error_codes("fn f() -> int32 { return y; }"),
        vec![ErrorCode::E2002]
    );
}

#[test]
fn undeclared_name_suggests_close_match() {
    let (result, _, _) = check_source("fn f() -> int32 { var count = 1; return cout; }");
    assert_eq!(result.errors.len(), 1);
    match &result.errors[0].kind {
        TypeErrorKind::UndeclaredName { name, suggestion } => {
            assert_eq!(name, "cout");
            assert_eq!(suggestion.as_deref(), Some("count"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn errors_do_not_cascade() {
    assert_eq!(
        error_codes("fn f() -> int32 { var x = nope + 1; var y: int32 = x * 2; return y; }"),
        vec![ErrorCode::E2002]
    );
}

#[test]
fn struct_layout_pads_fields() {
    let (result, _, interner) =
        check_source("struct S { a: int8, b: int32 } fn f(s: *S) -> int32 { return s.b; }");
    assert!(!result.has_errors());
    let structs = &result.typed.structs;
    let id = structs.lookup(interner.get("S").unwrap()).unwrap();
    let def = structs.get(id);
    assert_eq!(def.fields[0].offset, 0);
    assert_eq!(def.fields[1].offset, 4);
    assert_eq!(def.size, 8);
}

#[test]
fn unknown_field_suggests_close_match() {
    let (result, _, _) = check_source(
        "struct Point { x: int32, y: int32 } fn f(p: *Point) -> int32 { return p.xx; }",
    );
    assert_eq!(result.errors.len(), 1);
    match &result.errors[0].kind {
        TypeErrorKind::UnknownField { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("x"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unknown_type_is_reported() {
    assert_eq!(
        error_codes("fn f(p: *Pointt) { }"),
        vec![ErrorCode::E2003]
    );
}

#[test]
fn recursive_struct_by_value() {
    assert_eq!(
        error_codes("struct A { b: B } struct B { a: A }"),
        vec![ErrorCode::E2009]
    );
    assert_eq!(error_codes("struct List { next: *List, v: int32 }"), vec![]);
}

#[test]
fn struct_by_value_in_signature() {
    assert_eq!(
        error_codes("struct S { a: int32 } fn f(s: S) { } fn g() -> S { }"),
        vec![ErrorCode::E2008, ErrorCode::E2008]
    );
}

#[test]
fn missing_return_is_reported_at_function_name() {
    let source = "fn sign(x: int32) -> int32 { if x > 0 { return 1; } }";
    let (result, _, _) = check_source(source);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code(), ErrorCode::E2006);
    assert_eq!(result.errors[0].span.start as usize, source.find("sign").unwrap());
}

#[test]
fn complete_returns_are_accepted() {
    assert_eq!(
        error_codes(
            "fn a(x: int32) -> int32 { if x > 0 { return 1; } else { return 2; } }
             fn b(x: int32) -> int32 { if x > 0 { return 1; } else if x < 0 { return 2; } else { return 0; } }
             fn c() -> int32 { while true { } }
             fn d() -> int32 { { return 1; } }"
        ),
        vec![]
    );
}

#[test]
fn loop_with_break_can_fall_through() {
    assert_eq!(
        error_codes("fn f() -> int32 { while true { break; } }"),
        vec![ErrorCode::E2006]
    );
}

#[test]
fn unreachable_statement_warns_once() {
    let source = "fn f() -> int32 { return 1; var x = 2; x = 3; }";
    let (result, _, _) = check_source(source);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    let TypeCheckWarning::UnreachableCode { span, cause } = result.warnings[0];
    assert!(source[span.to_range()].starts_with("var x"));
    assert!(source[cause.to_range()].starts_with("return 1"));
}

#[test]
fn literal_ranges() {
    assert_eq!(
        error_codes("fn f() { var a: int8 = 300; var b: int8 = -128; var c: uint8 = 255; }"),
        vec![ErrorCode::E2019]
    );
    assert_eq!(error_codes("fn f() { var a: int8 = -129; }"), vec![ErrorCode::E2019]);
}

#[test]
fn large_literal_defaults_to_int64() {
    let (result, parsed, _) = check_source("fn f() { var a = 3000000000; }");
    assert!(!result.has_errors());
    let (id, _) = parsed
        .arena
        .exprs()
        .find(|(_, e)| matches!(e.kind, ExprKind::Int { .. }))
        .unwrap();
    assert_eq!(result.typed.expr_type(id), Idx::INT64);
}

#[test]
fn negative_literal_rejects_unsigned_target() {
    assert_eq!(error_codes("fn f() { var a: uint8 = -1; }"), vec![ErrorCode::E2001]);
}

#[test]
fn widening_is_recorded_as_coercion() {
    let (result, parsed, _) = check_source("fn f(a: int8) -> int64 { return a; }");
    assert!(!result.has_errors());
    let (id, _) = parsed
        .arena
        .exprs()
        .find(|(_, e)| matches!(e.kind, ExprKind::Ident(_)))
        .unwrap();
    assert_eq!(result.typed.expr_type(id), Idx::INT8);
    assert_eq!(result.typed.coercions.get(&id), Some(&Idx::INT64));
}

#[test]
fn widening_rules() {
    assert_eq!(error_codes("fn f(a: uint8) -> int16 { return a; }"), vec![]);
    assert_eq!(
        error_codes("fn f(a: uint32) -> int32 { return a; }"),
        vec![ErrorCode::E2001]
    );
    assert_eq!(
        error_codes("fn f(a: int64) -> int8 { return a; }"),
        vec![ErrorCode::E2001]
    );
    assert_eq!(
        error_codes("fn f(a: float32) -> float64 { return a; }"),
        vec![ErrorCode::E2001]
    );
}

#[test]
fn operand_rules() {
    assert_eq!(
        error_codes("fn f(a: int32, b: float64) -> float64 { return a + b; }"),
        vec![ErrorCode::E2018]
    );
    assert_eq!(
        error_codes("fn f(a: float64) -> float64 { return a % 2.0; }"),
        vec![ErrorCode::E2018]
    );
    assert_eq!(
        error_codes("fn f(a: uint32) -> uint32 { return -a; }"),
        vec![ErrorCode::E2018]
    );
    assert_eq!(
        error_codes("fn f(a: int32) -> bool { return !a; }"),
        vec![ErrorCode::E2018]
    );
    assert_eq!(
        error_codes("fn f(a: int8, b: int64) -> bool { return a < b && a != 0; }"),
        vec![]
    );
    assert_eq!(
        error_codes("fn f(p: *int32, q: *int32) -> bool { return p == q; }"),
        vec![]
    );
}

#[test]
fn cast_rules() {
    assert_eq!(
        error_codes(
            "fn f(a: int64, b: bool, x: float32) -> int32 {
                var p = a as *int8;
                var q = p as *uint64;
                var n = q as uint64;
                var c = b as int32;
                return x as int32 + c;
            }"
        ),
        vec![]
    );
    assert_eq!(
        error_codes("fn f(a: int32) -> *int8 { return a as *int8; }"),
        vec![ErrorCode::E2015]
    );
    assert_eq!(
        error_codes("fn f(a: int32) -> bool { return a as bool; }"),
        vec![ErrorCode::E2015]
    );
}

#[test]
fn invalid_constructs() {
    assert_eq!(error_codes("fn f() { break; }"), vec![ErrorCode::E2016]);
    assert_eq!(error_codes("fn f() { continue; }"), vec![ErrorCode::E2016]);
    assert_eq!(
        error_codes("fn f() { var p = &1; }"),
        vec![ErrorCode::E2013]
    );
    assert_eq!(error_codes("fn f() { 1 = 2; }"), vec![ErrorCode::E2014]);
    assert_eq!(
        error_codes("fn g() { } fn f() { var h = g; }"),
        vec![ErrorCode::E2011]
    );
}

#[test]
fn calls_check_arity_and_arguments() {
    assert_eq!(
        error_codes("fn g(a: int32) { } fn f() { g(1, 2); }"),
        vec![ErrorCode::E2004]
    );
    assert_eq!(
        error_codes("fn g(a: *int32) { } fn f() { g(1); }"),
        vec![ErrorCode::E2001]
    );
    assert_eq!(
        error_codes("var g: int32 = 0; fn f() { g(1); }"),
        vec![ErrorCode::E2017]
    );
}

#[test]
fn address_taken_variables_are_tracked() {
    let (result, _, _) = check_source(
        "fn f() -> int32 { var a = 1; var b = 2; var p = &a; *p = b; return a; }",
    );
    assert!(!result.has_errors());
    let names: Vec<_> = result
        .typed
        .address_taken
        .iter()
        .map(|s| result.typed.symbols.get(*s).storage)
        .collect();
    assert_eq!(names, vec![StorageClass::Local]);
}

#[test]
fn globals_need_constant_initializers() {
    assert_eq!(
        error_codes("var g: int32 = 1 + 2;"),
        vec![ErrorCode::E2010]
    );
    let (result, _, interner) = check_source("var g: float64 = -1.5; var h: bool = true;");
    assert!(!result.has_errors());
    let g = &result.typed.globals[&interner.get("g").unwrap()];
    assert_eq!(g.init, Some(ConstValue::Float((-1.5f64).to_bits())));
    let h = &result.typed.globals[&interner.get("h").unwrap()];
    assert_eq!(h.init, Some(ConstValue::Bool(true)));
}

#[test]
fn string_literals_are_byte_pointers() {
    let (result, parsed, _) = check_source(
        "extern fn puts(s: *uint8) -> int32;
         fn f() -> uint8 { var s = \"hi\"; puts(s); return *s; }",
    );
    assert!(!result.has_errors(), "{:?}", result.errors);
    let (id, _) = parsed
        .arena
        .exprs()
        .find(|(_, e)| matches!(e.kind, ExprKind::Str(_)))
        .unwrap();
    let ty = result.typed.expr_type(id);
    assert_eq!(result.typed.pool.pointee(ty), Some(Idx::UINT8));

    assert_eq!(
        error_codes("fn f() -> int32 { return \"x\"; }"),
        vec![ErrorCode::E2001]
    );
    assert_eq!(error_codes("var g: *uint8 = \"x\";"), vec![ErrorCode::E2010]);
    assert_eq!(error_codes("fn f() { \"x\" = \"y\"; }"), vec![ErrorCode::E2014]);
}

#[test]
fn void_variables_are_rejected() {
    assert_eq!(
        error_codes("fn g() { } fn f() { var x = g(); }"),
        vec![ErrorCode::E2012]
    );
    assert_eq!(error_codes("fn f() { var x; }"), vec![ErrorCode::E2012]);
}

#[test]
fn return_value_must_match() {
    assert_eq!(error_codes("fn f() { return 1; }"), vec![ErrorCode::E2001]);
    assert_eq!(error_codes("fn f() -> int32 { return; }"), vec![ErrorCode::E2001]);
}

#[test]
fn checking_is_deterministic() {
    let (a, _, _) = check_source(PROGRAM);
    let (b, _, _) = check_source(PROGRAM);
    assert_eq!(a.typed.expr_types, b.typed.expr_types);
    assert_eq!(a.diagnostics(), b.diagnostics());
}

#[test]
fn deeply_nested_statements_check() {
    let depth = 20_000;
    let blocks = format!(
        "fn f() -> int32 {{ {}return 1;{} }}",
        "{ ".repeat(depth),
        " }".repeat(depth)
    );
    let (result, _, _) = check_source(&blocks);
    assert!(!result.has_errors());

    let ifs = format!(
        "fn f(x: int32) -> int32 {{ {}return x;{} return 0; }}",
        "if x > 0 { ".repeat(depth),
        " }".repeat(depth)
    );
    let (result, _, _) = check_source(&ifs);
    assert!(!result.has_errors());
}
