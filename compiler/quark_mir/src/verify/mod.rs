//! IR well-formedness checks.
//!
//! Run on every lowered function after dead-block elimination. A failure is
//! a lowering bug, reported as an [`InternalCompilerFault`] whose context is
//! the printed offending instruction.

use quark_diagnostic::{FaultPhase, InternalCompilerFault};
use quark_ir::StringInterner;

use crate::graph::{self, DominatorTree};
use crate::ir::{BlockId, Instr, IrFunction, IrType, Terminator, VarId};
use crate::print::{format_instr, format_terminator};

/// Where a variable is defined: block, and position within it. Block
/// parameters and function parameters sit at position 0; the instruction at
/// index `i` defines at `i + 1`.
#[derive(Copy, Clone)]
struct Def {
    block: BlockId,
    pos: usize,
}

/// Check that `func` is well-formed SSA:
///
/// - every variable is defined exactly once, and every definition dominates
///   its uses;
/// - branch targets exist; `Branch` arguments match the target's parameters
///   in number and type; `CondBranch` targets take no parameters;
/// - `Alloca` appears only in the entry block;
/// - `Return` matches the function's return type;
/// - every block is reachable from the entry.
#[tracing::instrument(level = "trace", skip_all, fields(function = interner.lookup(func.name)))]
pub fn verify_function(
    func: &IrFunction,
    interner: &StringInterner,
) -> Result<(), InternalCompilerFault> {
    let name = interner.lookup(func.name);
    let fail = |message: String, context: String| {
        InternalCompilerFault::new(FaultPhase::Verify, format!("in `{name}`: {message}"))
            .with_context(context)
    };

    if func.blocks.is_empty() {
        return Err(fail("function has no blocks".into(), String::new()));
    }
    for (idx, block) in func.blocks.iter().enumerate() {
        if block.id.index() != idx {
            return Err(fail(
                format!("block at position {idx} is numbered bb{}", block.id.raw()),
                String::new(),
            ));
        }
    }

    // Definitions.
    let mut defs: Vec<Option<Def>> = vec![None; func.var_count()];
    let mut define = |var: VarId, def: Def, context: &dyn Fn() -> String| {
        match defs.get_mut(var.index()) {
            None => Err(fail(format!("v{} has no type", var.raw()), context())),
            Some(Some(_)) => Err(fail(format!("v{} is defined twice", var.raw()), context())),
            Some(slot) => {
                *slot = Some(def);
                Ok(())
            }
        }
    };
    let entry = Def {
        block: IrFunction::ENTRY,
        pos: 0,
    };
    for &(var, _) in &func.params {
        define(var, entry, &|| format!("parameter v{}", var.raw()))?;
    }
    for block in &func.blocks {
        for &(var, _) in &block.params {
            define(
                var,
                Def {
                    block: block.id,
                    pos: 0,
                },
                &|| format!("bb{} parameter v{}", block.id.raw(), var.raw()),
            )?;
        }
        for (i, instr) in block.body.iter().enumerate() {
            if let Some(var) = instr.defined_var() {
                define(
                    var,
                    Def {
                        block: block.id,
                        pos: i + 1,
                    },
                    &|| format_instr(instr, interner),
                )?;
            }
        }
    }

    let reachable = graph::reachable(func);
    if let Some(dead) = reachable.iter().position(|&r| !r) {
        return Err(fail(format!("bb{dead} is unreachable"), String::new()));
    }

    let dom = DominatorTree::build(func);
    let check_use = |var: VarId, block: BlockId, pos: usize, context: &dyn Fn() -> String| {
        let Some(Some(def)) = defs.get(var.index()) else {
            return Err(fail(format!("v{} is never defined", var.raw()), context()));
        };
        let ok = if def.block == block {
            def.pos < pos
        } else {
            dom.dominates(def.block, block)
        };
        if ok {
            Ok(())
        } else {
            Err(fail(
                format!("definition of v{} does not dominate its use", var.raw()),
                context(),
            ))
        }
    };

    for block in &func.blocks {
        for (i, instr) in block.body.iter().enumerate() {
            let context = || format_instr(instr, interner);
            for var in instr.used_vars() {
                check_use(var, block.id, i + 1, &context)?;
            }
            if matches!(instr, Instr::Alloca { .. }) && block.id != IrFunction::ENTRY {
                return Err(fail("`alloca` outside the entry block".into(), context()));
            }
        }

        let term = &block.terminator;
        let context = || format_terminator(term);
        let end = block.body.len() + 1;
        for var in term.used_vars() {
            check_use(var, block.id, end, &context)?;
        }

        match term {
            Terminator::Branch { target, args } => {
                let Some(target_block) = func.blocks.get(target.index()) else {
                    return Err(fail(format!("branch to missing bb{}", target.raw()), context()));
                };
                if args.len() != target_block.params.len() {
                    return Err(fail(
                        format!(
                            "bb{} takes {} arguments, branch passes {}",
                            target.raw(),
                            target_block.params.len(),
                            args.len()
                        ),
                        context(),
                    ));
                }
                for (&arg, &(param, ty)) in args.iter().zip(&target_block.params) {
                    if func.var_type(arg) != ty {
                        return Err(fail(
                            format!(
                                "v{} has type {}, bb{} parameter v{} expects {ty}",
                                arg.raw(),
                                func.var_type(arg),
                                target.raw(),
                                param.raw()
                            ),
                            context(),
                        ));
                    }
                }
            }
            Terminator::CondBranch {
                cond,
                then_block,
                else_block,
            } => {
                if func.var_type(*cond) != IrType::Bool {
                    return Err(fail("branch condition is not `bool`".into(), context()));
                }
                for target in [then_block, else_block] {
                    match func.blocks.get(target.index()) {
                        None => {
                            return Err(fail(
                                format!("branch to missing bb{}", target.raw()),
                                context(),
                            ))
                        }
                        Some(b) if !b.params.is_empty() => {
                            return Err(fail(
                                format!("conditional branch to bb{} which takes arguments", target.raw()),
                                context(),
                            ))
                        }
                        Some(_) => {}
                    }
                }
            }
            Terminator::Return(value) => {
                let actual = value.map(|v| func.var_type(v));
                if actual != func.ret {
                    return Err(fail("return does not match the signature".into(), context()));
                }
            }
            Terminator::Unreachable => {}
        }
    }

    Ok(())
}
