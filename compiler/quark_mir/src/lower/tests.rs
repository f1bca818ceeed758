use pretty_assertions::assert_eq;
use quark_ir::StringInterner;

use super::*;
use crate::ir::{Instr, Terminator};
use crate::print::print_function;

fn lower_source(source: &str) -> (IrModule, StringInterner) {
    let mut interner = StringInterner::new();
    let lexed = quark_lexer::lex(source, &mut interner);
    assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
    let parsed = quark_parse::parse(&lexed.tokens, &interner);
    assert!(!parsed.has_errors(), "{:?}", parsed.errors);
    let checked = quark_types::check_module(&parsed.module, &parsed.arena, &interner);
    assert!(!checked.has_errors(), "{:?}", checked.errors);
    let ir = lower_module(&parsed.module, &parsed.arena, &checked.typed, &interner).unwrap();
    (ir, interner)
}

fn function<'m>(ir: &'m IrModule, interner: &StringInterner, name: &str) -> &'m IrFunction {
    ir.function(interner.get(name).unwrap()).unwrap()
}

fn instrs(func: &IrFunction) -> impl Iterator<Item = &Instr> {
    func.blocks.iter().flat_map(|b| b.body.iter())
}

fn calls_to(block: &crate::ir::Block, callee: quark_ir::Name) -> bool {
    block
        .body
        .iter()
        .any(|i| matches!(i, Instr::Call { func, .. } if *func == callee))
}

#[test]
fn straight_line_function() {
    let (ir, interner) = lower_source("fn add(a: int32, b: int32) -> int32 { return a + b; }");
    assert_eq!(
        print_function(function(&ir, &interner, "add"), &interner),
        "fn @add(v0: i32, v1: i32) -> i32 {\nbb0:\n  v2 = add.i32 v0, v1\n  ret v2\n}\n"
    );
}

#[test]
fn logical_or_evaluates_rhs_only_on_false_path() {
    let (ir, interner) = lower_source(
        "fn f() -> bool { return true; }
         fn g() -> bool { return false; }
         fn h() -> bool { return f() || g(); }",
    );
    let h = function(&ir, &interner, "h");
    let g = interner.get("g").unwrap();

    let entry = &h.blocks[0];
    let Terminator::CondBranch {
        then_block,
        else_block,
        ..
    } = entry.terminator
    else {
        panic!("expected a conditional branch, got {:?}", entry.terminator);
    };
    assert!(!calls_to(entry, g));
    assert!(!calls_to(h.block(then_block), g));
    assert!(calls_to(h.block(else_block), g));
    assert!(!instrs(h).any(|i| matches!(
        i,
        Instr::BinOp {
            op: quark_ir::BinaryOp::Or,
            ..
        }
    )));
}

#[test]
fn logical_and_merges_through_a_bool_param() {
    let (ir, interner) = lower_source("fn both(a: bool, b: bool) -> bool { return a && b; }");
    let func = function(&ir, &interner, "both");
    let merge = func
        .blocks
        .iter()
        .find(|b| matches!(b.terminator, Terminator::Return(Some(_))))
        .unwrap();
    assert_eq!(merge.params.len(), 1);
    assert_eq!(merge.params[0].1, IrType::Bool);
    assert_eq!(merge.terminator, Terminator::Return(Some(merge.params[0].0)));
}

#[test]
fn scalar_locals_are_promoted() {
    let (ir, interner) = lower_source(
        "fn f(x: int32) -> int32 { var y = x + 1; y = y * 2; return y; }",
    );
    let func = function(&ir, &interner, "f");
    assert!(!instrs(func).any(|i| matches!(i, Instr::Alloca { .. } | Instr::Load { .. })));
}

#[test]
fn address_taken_and_struct_locals_live_in_memory() {
    let (ir, interner) = lower_source(
        "struct S { a: int8, b: int32 }
         fn f() -> int32 { var y = 1; var p = &y; *p = 5; return y; }
         fn g() -> int32 { var s: S; s.b = 7; return s.b; }",
    );
    let f = function(&ir, &interner, "f");
    let allocas: Vec<&Instr> = instrs(f)
        .filter(|i| matches!(i, Instr::Alloca { .. }))
        .collect();
    assert_eq!(allocas.len(), 1);
    assert!(matches!(allocas[0], Instr::Alloca { size: 4, align: 4, .. }));

    let g = function(&ir, &interner, "g");
    assert!(matches!(g.blocks[0].body[0], Instr::Alloca { size: 8, align: 4, .. }));
    assert!(instrs(g).any(|i| matches!(i, Instr::GetFieldPtr { offset: 4, .. })));
}

#[test]
fn if_join_adds_params_only_for_changed_variables() {
    let (ir, interner) = lower_source(
        "fn m(c: bool) -> int32 { var x = 1; var y = 2; if c { x = 3; } return x + y; }",
    );
    let func = function(&ir, &interner, "m");
    let merge = func.blocks.iter().find(|b| !b.params.is_empty()).unwrap();
    assert_eq!(merge.params.len(), 1);
    assert_eq!(merge.params[0].1, IrType::I32);
}

#[test]
fn loop_header_carries_every_visible_variable() {
    let (ir, interner) = lower_source(
        "fn sum(n: int32) -> int32 {
             var i = 0;
             var s = 0;
             while i < n { s = s + i; i = i + 1; }
             return s;
         }",
    );
    let func = function(&ir, &interner, "sum");
    let header = func.block(crate::ir::BlockId::new(1));
    assert_eq!(header.params.len(), 3);
    assert!(matches!(header.terminator, Terminator::CondBranch { .. }));
}

#[test]
fn returning_branches_leave_no_dead_blocks() {
    let (ir, interner) = lower_source(
        "fn sign(x: int32) -> int32 {
             if x < 0 { return -1; } else { return 1; }
         }",
    );
    let func = function(&ir, &interner, "sign");
    assert_eq!(func.blocks.len(), 3);
    assert!(crate::graph::reachable(func).iter().all(|&r| r));
    assert!(func
        .blocks
        .iter()
        .all(|b| b.terminator != Terminator::Unreachable));
}

#[test]
fn uninitialized_locals_are_zeroed() {
    let (ir, interner) = lower_source(
        "struct P { x: float64, on: bool }
         fn f() -> int32 { var x: int32; var p: P; return x; }",
    );
    let func = function(&ir, &interner, "f");
    let stores = instrs(func)
        .filter(|i| matches!(i, Instr::Store { .. }))
        .count();
    assert_eq!(stores, 2);
    assert!(instrs(func).any(|i| matches!(
        i,
        Instr::Const {
            ty: IrType::I32,
            value: Constant::Int(0),
            ..
        }
    )));
}

#[test]
fn globals_and_externs_are_declared() {
    let (ir, interner) = lower_source(
        "extern fn putchar(c: int32) -> int32;
         var limit: int16 = -3;
         var flag: bool;
         fn main() -> int32 { return putchar(limit); }",
    );
    assert_eq!(ir.externs.len(), 1);
    assert_eq!(ir.externs[0].params, vec![IrType::I32]);
    assert_eq!(ir.globals.len(), 2);
    assert_eq!(ir.globals[0].size, 2);
    assert_eq!(ir.globals[0].init.map(|i| i.ty), Some(IrType::I16));
    assert_eq!(ir.globals[1].init, None);

    let main = function(&ir, &interner, "main");
    assert!(instrs(main).any(|i| matches!(i, Instr::GlobalAddr { .. })));
    assert!(instrs(main).any(|i| matches!(
        i,
        Instr::Cast {
            from: IrType::I16,
            to: IrType::I32,
            ..
        }
    )));
}

#[test]
fn every_lowered_function_verifies() {
    let (ir, interner) = lower_source(
        "struct Node { value: int64, next: *Node }
         fn len(n: *Node) -> int32 {
             var count = 0;
             while n != n { count = count + 1; if count > 10 { break; } else { continue; } }
             return count;
         }
         fn total(n: *Node) -> int64 { return n.value + (*n).value; }",
    );
    for func in &ir.functions {
        crate::verify::verify_function(func, &interner).unwrap();
    }
}

#[test]
fn negated_literals_fold_into_one_constant() {
    let (ir, interner) = lower_source(
        "fn a() -> int8 { return -128; }
         fn b() -> int64 { return -9223372036854775808; }
         fn c() -> float64 { return -2.5; }
         fn d(x: int32) -> int32 { return -x; }",
    );
    let a = function(&ir, &interner, "a");
    assert!(!instrs(a).any(|i| matches!(i, Instr::Unary { .. })));
    assert!(print_function(a, &interner).contains("= const.i8 -128\n"));

    let b = function(&ir, &interner, "b");
    assert_eq!(
        instrs(b).collect::<Vec<_>>(),
        vec![&Instr::Const {
            dst: crate::ir::VarId::new(0),
            ty: crate::ir::IrType::I64,
            value: crate::ir::Constant::Int(i64::MIN as u64),
        }]
    );

    let c = function(&ir, &interner, "c");
    assert!(print_function(c, &interner).contains("= const.f64 -2.5\n"));

    let d = function(&ir, &interner, "d");
    assert!(instrs(d).any(|i| matches!(i, Instr::Unary { .. })));
}

#[test]
fn string_literals_are_shared_across_functions() {
    let (ir, interner) = lower_source(
        "extern fn puts(s: *uint8) -> int32;
         fn a() { puts(\"hi\"); puts(\"bye\"); }
         fn b() { puts(\"hi\"); }",
    );
    let hi = interner.get("hi").unwrap();
    let bye = interner.get("bye").unwrap();
    assert_eq!(ir.strings, vec![hi, bye]);
    assert_eq!(ir.string_index(bye), Some(1));
    assert!(print_function(function(&ir, &interner, "b"), &interner)
        .contains("v0 = straddr \"hi\"\n"));
}

#[cfg(feature = "eval")]
mod eval {
    use super::lower_source;
    use crate::eval::{EvalError, Evaluator, Value};

    fn run(source: &str, name: &str, args: &[Value]) -> Result<Option<Value>, EvalError> {
        let (ir, interner) = lower_source(source);
        let mut eval = Evaluator::new(&ir, &interner).with_step_limit(1_000_000);
        eval.call(name, args)
    }

    fn run_int(source: &str, name: &str, args: &[i64]) -> i64 {
        let args: Vec<Value> = args.iter().map(|&a| Value::from_i64(a)).collect();
        run(source, name, &args).unwrap().unwrap().as_i64().unwrap()
    }

    #[test]
    fn add_two_and_three() {
        let source = "fn add(a: int32, b: int32) -> int32 { return a + b; }";
        assert_eq!(run_int(source, "add", &[2, 3]), 5);
    }

    #[test]
    fn loops_with_break_and_continue() {
        let source = "fn f(n: int32) -> int32 {
            var i = 0;
            var s = 0;
            while true {
                i = i + 1;
                if i > n { break; }
                if i % 2 == 0 { continue; }
                s = s + i;
            }
            return s;
        }";
        assert_eq!(run_int(source, "f", &[10]), 25);
    }

    #[test]
    fn string_bytes_are_nul_terminated() {
        let source = "fn len(s: *uint8) -> int32 {
                var n = 0;
                var p = s;
                while *p != 0 {
                    n = n + 1;
                    p = (p as uint64 + 1) as *uint8;
                }
                return n;
            }
            fn f() -> int32 { return len(\"h\u{e9}\\n\") * 1000 + (*\"A\" as int32); }";
        assert_eq!(run_int(source, "f", &[]), 4065);
    }

    #[test]
    fn recursion() {
        let source = "fn fib(n: int64) -> int64 {
            if n < 2 { return n; }
            return fib(n - 1) + fib(n - 2);
        }";
        assert_eq!(run_int(source, "fib", &[15]), 610);
    }

    #[test]
    fn structs_pointers_and_globals() {
        let source = "struct P { x: int32, y: int32 }
            var scale: int32 = 3;
            fn set(p: *P, v: int32) { p.x = v; (*p).y = v * scale; }
            fn f() -> int32 {
                var a: P;
                set(&a, 2);
                var b: P = a;
                b.x = 10;
                return a.x + a.y + b.x;
            }";
        assert_eq!(run_int(source, "f", &[]), 18);
    }

    #[test]
    fn short_circuit_skips_side_effects() {
        let source = "var calls: int32 = 0;
            fn bump() -> bool { calls = calls + 1; return true; }
            fn f() -> int32 {
                if true || bump() { }
                if false && bump() { }
                if false || bump() { }
                return calls;
            }";
        assert_eq!(run_int(source, "f", &[]), 1);
    }

    #[test]
    fn integer_widths_wrap_and_extend() {
        let source = "fn f() -> int32 {
            var a: uint8 = 250;
            a = a + 10u8;
            var b: int8 = -128;
            b = b - 1i8;
            return a as int32 + b as int32;
        }";
        assert_eq!(run_int(source, "f", &[]), 4 + 127);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let source = "fn f(x: int32) -> int32 { return 10 / x; }";
        let err = run(source, "f", &[Value::from_i64(0)]).unwrap_err();
        assert_eq!(err, EvalError::DivisionByZero);
    }

    #[test]
    fn extern_calls_are_reported() {
        let source = "extern fn putchar(c: int32) -> int32;
            fn f() -> int32 { return putchar(65); }";
        let err = run(source, "f", &[]).unwrap_err();
        assert_eq!(err, EvalError::ExternCall("putchar".to_owned()));
    }

    #[test]
    fn float_arithmetic() {
        let source = "fn avg(a: float64, b: float64) -> float64 { return (a + b) / 2.0; }";
        let result = run(source, "avg", &[Value::Float(1.0), Value::Float(2.0)])
            .unwrap()
            .unwrap();
        assert_eq!(result, Value::Float(1.5));
    }
}
