use pretty_assertions::assert_eq;
use quark_ir::{BinaryOp, StringInterner, UnaryOp};

use super::*;
use crate::builder::IrBuilder;
use crate::ir::{GlobalInit, IrGlobal};

fn module_with(func: IrFunction) -> IrModule {
    IrModule {
        globals: vec![],
        functions: vec![func],
        ..IrModule::default()
    }
}

#[test]
fn binops_follow_signedness() {
    let minus_one = Value::from_i64(-1);
    let one = Value::Int(1);
    assert_eq!(
        binop(BinaryOp::Lt, IrType::I32, minus_one, one).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        binop(BinaryOp::Lt, IrType::U32, Value::Int(0xffff_ffff), one).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        binop(BinaryOp::Shr, IrType::I32, minus_one, one).unwrap(),
        minus_one
    );
    assert_eq!(
        binop(BinaryOp::Shr, IrType::U8, Value::Int(0x80), one).unwrap(),
        Value::Int(0x40)
    );
    assert_eq!(
        binop(BinaryOp::Div, IrType::I64, Value::from_i64(-7), Value::Int(2)).unwrap(),
        Value::from_i64(-3)
    );
    assert_eq!(
        binop(BinaryOp::Mod, IrType::I32, one, Value::Int(0)),
        Err(EvalError::DivisionByZero)
    );
}

#[test]
fn casts_convert_between_representations() {
    assert_eq!(cast(IrType::I32, IrType::I8, Value::Int(300)), Value::Int(44));
    assert_eq!(
        cast(IrType::I8, IrType::F64, Value::from_i64(-2)),
        Value::Float(-2.0)
    );
    assert_eq!(
        cast(IrType::F64, IrType::I32, Value::Float(-3.75)),
        Value::from_i64(-3)
    );
    assert_eq!(cast(IrType::Bool, IrType::U8, Value::Bool(true)), Value::Int(1));
    assert_eq!(cast(IrType::Ptr, IrType::U64, Value::Ptr(64)), Value::Int(64));
    assert_eq!(
        unary(UnaryOp::Neg, IrType::I8, Value::from_i64(-128)).unwrap(),
        Value::from_i64(-128)
    );
}

#[test]
fn memory_round_trips_through_allocas() {
    let mut interner = StringInterner::new();
    let name = interner.intern("f");
    let mut builder = IrBuilder::new();
    let slot = builder.emit_alloca(8, 8);
    let value = builder.emit_const(IrType::F32, Constant::Float(0.5f64.to_bits()));
    builder.emit_store(IrType::F32, slot, value);
    let loaded = builder.emit_load(IrType::F32, slot);
    builder.terminate_return(Some(loaded));
    let module = module_with(builder.finish(name, vec![], Some(IrType::F32)));

    let mut eval = Evaluator::new(&module, &interner);
    assert_eq!(eval.call("f", &[]).unwrap(), Some(Value::Float(0.5)));
}

#[test]
fn null_dereference_faults() {
    let mut interner = StringInterner::new();
    let name = interner.intern("f");
    let mut builder = IrBuilder::new();
    let null = builder.emit_zero(IrType::Ptr);
    let loaded = builder.emit_load(IrType::I32, null);
    builder.terminate_return(Some(loaded));
    let module = module_with(builder.finish(name, vec![], Some(IrType::I32)));

    let mut eval = Evaluator::new(&module, &interner);
    assert_eq!(eval.call("f", &[]), Err(EvalError::BadAddress(0)));
}

#[test]
fn infinite_loops_hit_the_step_limit() {
    let mut interner = StringInterner::new();
    let name = interner.intern("spin");
    let mut builder = IrBuilder::new();
    builder.terminate_branch(IrFunction::ENTRY, vec![]);
    let module = module_with(builder.finish(name, vec![], None));

    let mut eval = Evaluator::new(&module, &interner).with_step_limit(100);
    assert_eq!(eval.call("spin", &[]), Err(EvalError::StepLimit(100)));
}

#[test]
fn globals_start_with_their_initializer() {
    let mut interner = StringInterner::new();
    let g = interner.intern("g");
    let module = IrModule {
        globals: vec![IrGlobal {
            name: g,
            size: 2,
            align: 2,
            init: Some(GlobalInit {
                ty: IrType::I16,
                value: Constant::Int(0xfffe),
            }),
        }],
        ..IrModule::default()
    };
    let eval = Evaluator::new(&module, &interner);
    assert_eq!(
        eval.read_global("g", IrType::I16).unwrap(),
        Value::from_i64(-2)
    );
    assert!(Evaluator::new(&module, &interner).call("missing", &[]).is_err());
}
