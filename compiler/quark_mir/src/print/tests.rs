use pretty_assertions::assert_eq;
use quark_ir::{BinaryOp, StringInterner};

use super::*;
use crate::builder::IrBuilder;
use crate::ir::{GlobalInit, IrExtern, IrGlobal};

#[test]
fn prints_a_function_with_block_params() {
    let mut interner = StringInterner::new();
    let name = interner.intern("max");
    let mut builder = IrBuilder::new();
    let a = builder.fresh_var(IrType::I32);
    let b = builder.fresh_var(IrType::I32);
    let gt = builder.emit_binop(BinaryOp::Gt, IrType::I32, a, b);
    let then_b = builder.new_block();
    let else_b = builder.new_block();
    let merge = builder.new_block();
    let result = builder.add_block_param(merge, IrType::I32);
    builder.terminate_cond_branch(gt, then_b, else_b);
    builder.position_at(then_b);
    builder.terminate_branch(merge, vec![a]);
    builder.position_at(else_b);
    builder.terminate_branch(merge, vec![b]);
    builder.position_at(merge);
    builder.terminate_return(Some(result));
    let func = builder.finish(name, vec![(a, IrType::I32), (b, IrType::I32)], Some(IrType::I32));

    assert_eq!(
        print_function(&func, &interner),
        "fn @max(v0: i32, v1: i32) -> i32 {\n\
         bb0:\n  v2 = gt.i32 v0, v1\n  condbr v2, bb1, bb2\n\
         bb1:\n  br bb3(v0)\n\
         bb2:\n  br bb3(v1)\n\
         bb3(v3: i32):\n  ret v3\n\
         }\n"
    );
}

#[test]
fn prints_memory_and_call_instructions() {
    let mut interner = StringInterner::new();
    let g = interner.intern("counter");
    let f = interner.intern("tick");
    let mut builder = IrBuilder::new();
    let slot = builder.emit_alloca(8, 4);
    let field = builder.emit_field_ptr(slot, 4);
    let addr = builder.emit_global_addr(g);
    let value = builder.emit_load(IrType::I8, addr);
    let wide = builder.emit_cast(value, IrType::I64);
    builder.emit_store(IrType::I64, field, wide);
    builder.emit_call(f, vec![wide], None);
    builder.terminate_return(None);
    let func = builder.finish(f, vec![], None);

    let lines: Vec<String> = func.blocks[0]
        .body
        .iter()
        .map(|instr| format_instr(instr, &interner))
        .collect();
    assert_eq!(
        lines,
        vec![
            "v0 = alloca 8, align 4",
            "v1 = fieldptr v0, 4",
            "v2 = globaladdr @counter",
            "v3 = load.i8 v2",
            "v4 = cast.i8.i64 v3",
            "store.i64 v4, v1",
            "call @tick(v4)",
        ]
    );
}

#[test]
fn prints_module_header_items() {
    let mut interner = StringInterner::new();
    let g = interner.intern("limit");
    let z = interner.intern("buffer");
    let putchar = interner.intern("putchar");
    let module = IrModule {
        globals: vec![
            IrGlobal {
                name: g,
                size: 1,
                align: 1,
                init: Some(GlobalInit {
                    ty: IrType::I8,
                    value: Constant::Int(0xff),
                }),
            },
            IrGlobal {
                name: z,
                size: 16,
                align: 8,
                init: None,
            },
        ],
        externs: vec![IrExtern {
            name: putchar,
            params: vec![IrType::I32],
            ret: Some(IrType::I32),
        }],
        ..IrModule::default()
    };
    assert_eq!(
        print_module(&module, &interner),
        "global @limit: size 1, align 1 = i8 -1\n\
         global @buffer: size 16, align 8 = zeroed\n\
         extern fn @putchar(i32) -> i32\n"
    );
}

#[test]
fn constants_respect_their_type() {
    assert_eq!(format_constant(IrType::U8, Constant::Int(0x1ff)), "255");
    assert_eq!(format_constant(IrType::I64, Constant::Int(u64::MAX)), "-1");
    assert_eq!(format_constant(IrType::F64, Constant::Float(1.5f64.to_bits())), "1.5");
    assert_eq!(format_constant(IrType::Bool, Constant::Bool(true)), "true");
}
