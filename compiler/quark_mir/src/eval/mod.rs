//! Reference evaluator: executes IR directly.
//!
//! Used by tests to check that lowering preserves source semantics without
//! going through the backend. Memory is one flat little-endian byte array:
//! globals first, then string literals, then each call's `Alloca`s,
//! released when the call returns. Addresses below [`NULL_GUARD`] are never
//! valid, so null dereferences fault.

use quark_ir::{BinaryOp, Name, StringInterner, UnaryOp};
use quark_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ir::{Constant, Instr, IrFunction, IrModule, IrType, Terminator, VarId};

const NULL_GUARD: usize = 16;
const DEFAULT_STEP_LIMIT: u64 = 10_000_000;

/// A runtime value. Integers are stored sign- or zero-extended to 64 bits
/// according to their type; `float32` values are stored widened.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    Int(u64),
    Float(f64),
    Bool(bool),
    Ptr(u64),
}

impl Value {
    pub fn from_i64(value: i64) -> Self {
        Value::Int(value as u64)
    }

    /// The value as a signed integer; `None` for non-integers.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Value::Int(bits) => Some(bits as i64),
            _ => None,
        }
    }

    fn bits(self) -> u64 {
        match self {
            Value::Int(bits) | Value::Ptr(bits) => bits,
            Value::Bool(b) => u64::from(b),
            Value::Float(f) => f.to_bits(),
        }
    }

    fn float(self) -> f64 {
        match self {
            Value::Float(f) => f,
            other => other.bits() as f64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("reached `unreachable` in `{0}`")]
    Unreachable(String),
    #[error("step limit of {0} exceeded")]
    StepLimit(u64),
    #[error("no function named `{0}`")]
    UnknownFunction(String),
    #[error("cannot evaluate a call to external function `{0}`")]
    ExternCall(String),
    #[error("`{function}` expects {expected} arguments, got {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid memory access at {0:#x}")]
    BadAddress(u64),
    #[error("v{0} read before it was defined")]
    UndefinedVariable(u32),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

pub struct Evaluator<'a> {
    interner: &'a StringInterner,
    functions: FxHashMap<Name, &'a IrFunction>,
    externs: Vec<Name>,
    globals: FxHashMap<Name, u64>,
    strings: FxHashMap<Name, u64>,
    memory: Vec<u8>,
    steps: u64,
    step_limit: u64,
}

impl<'a> Evaluator<'a> {
    pub fn new(module: &'a IrModule, interner: &'a StringInterner) -> Self {
        let mut eval = Evaluator {
            interner,
            functions: module.functions.iter().map(|f| (f.name, f)).collect(),
            externs: module.externs.iter().map(|e| e.name).collect(),
            globals: FxHashMap::default(),
            strings: FxHashMap::default(),
            memory: vec![0; NULL_GUARD],
            steps: 0,
            step_limit: DEFAULT_STEP_LIMIT,
        };
        for global in &module.globals {
            let addr = eval.allocate(global.size, global.align);
            eval.globals.insert(global.name, addr);
            if let Some(init) = global.init {
                let value = constant(init.ty, init.value);
                // Freshly allocated, so always in bounds.
                let _ = eval.write(init.ty, addr, value);
            }
        }
        for &value in &module.strings {
            let bytes = interner.lookup(value).as_bytes();
            let addr = eval.allocate(bytes.len() as u32 + 1, 1);
            let start = addr as usize;
            eval.memory[start..start + bytes.len()].copy_from_slice(bytes);
            eval.strings.insert(value, addr);
        }
        eval
    }

    #[must_use]
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = limit;
        self
    }

    /// Call a function by name.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, EvalError> {
        let func = self
            .interner
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_owned()))?;
        self.call_function(func, args.to_vec())
    }

    /// Current value of a global.
    pub fn read_global(&self, name: &str, ty: IrType) -> Result<Value, EvalError> {
        let addr = self
            .interner
            .get(name)
            .and_then(|n| self.globals.get(&n))
            .ok_or_else(|| EvalError::InvalidOperation(format!("no global named `{name}`")))?;
        self.read(ty, *addr)
    }

    fn call_function(&mut self, name: Name, args: Vec<Value>) -> Result<Option<Value>, EvalError> {
        let Some(&func) = self.functions.get(&name) else {
            let text = self.interner.lookup(name).to_owned();
            return Err(if self.externs.contains(&name) {
                EvalError::ExternCall(text)
            } else {
                EvalError::UnknownFunction(text)
            });
        };
        if func.params.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                function: self.interner.lookup(name).to_owned(),
                expected: func.params.len(),
                found: args.len(),
            });
        }
        let frame = self.memory.len();
        let result = ensure_sufficient_stack(|| self.run(func, &args));
        self.memory.truncate(frame);
        result
    }

    fn run(&mut self, func: &'a IrFunction, args: &[Value]) -> Result<Option<Value>, EvalError> {
        let mut vars: Vec<Option<Value>> = vec![None; func.var_count()];
        for (&(var, ty), &arg) in func.params.iter().zip(args) {
            vars[var.index()] = Some(retype(ty, arg));
        }

        let mut block = func.block(IrFunction::ENTRY);
        loop {
            for instr in &block.body {
                self.tick()?;
                self.exec(instr, &mut vars)?;
            }
            self.tick()?;
            match &block.terminator {
                Terminator::Branch { target, args } => {
                    let values = args
                        .iter()
                        .map(|&a| get(&vars, a))
                        .collect::<Result<Vec<_>, _>>()?;
                    block = func.block(*target);
                    for (&(param, _), value) in block.params.iter().zip(values) {
                        vars[param.index()] = Some(value);
                    }
                }
                Terminator::CondBranch {
                    cond,
                    then_block,
                    else_block,
                } => {
                    let taken = get(&vars, *cond)?.bits() != 0;
                    block = func.block(if taken { *then_block } else { *else_block });
                }
                Terminator::Return(value) => {
                    return value.map(|v| get(&vars, v)).transpose();
                }
                Terminator::Unreachable => {
                    return Err(EvalError::Unreachable(
                        self.interner.lookup(func.name).to_owned(),
                    ));
                }
            }
        }
    }

    fn exec(&mut self, instr: &Instr, vars: &mut [Option<Value>]) -> Result<(), EvalError> {
        let (dst, value) = match instr {
            Instr::Const { dst, ty, value } => (*dst, constant(*ty, *value)),
            Instr::Load { dst, ty, ptr } => {
                let addr = get(vars, *ptr)?.bits();
                (*dst, self.read(*ty, addr)?)
            }
            Instr::Store { ty, ptr, value } => {
                let addr = get(vars, *ptr)?.bits();
                let value = get(vars, *value)?;
                return self.write(*ty, addr, value);
            }
            Instr::BinOp {
                dst,
                op,
                ty,
                lhs,
                rhs,
            } => (*dst, binop(*op, *ty, get(vars, *lhs)?, get(vars, *rhs)?)?),
            Instr::Unary {
                dst,
                op,
                ty,
                operand,
            } => (*dst, unary(*op, *ty, get(vars, *operand)?)?),
            Instr::Cast {
                dst,
                from,
                to,
                value,
            } => (*dst, cast(*from, *to, get(vars, *value)?)),
            Instr::Call { dst, func, args, .. } => {
                let values = args
                    .iter()
                    .map(|&a| get(vars, a))
                    .collect::<Result<Vec<_>, _>>()?;
                let result = self.call_function(*func, values)?;
                match (dst, result) {
                    (Some(dst), Some(value)) => (*dst, value),
                    (None, _) => return Ok(()),
                    (Some(_), None) => {
                        return Err(EvalError::InvalidOperation(format!(
                            "`{}` returned no value",
                            self.interner.lookup(*func)
                        )))
                    }
                }
            }
            Instr::Alloca { dst, size, align } => (*dst, Value::Ptr(self.allocate(*size, *align))),
            Instr::GetFieldPtr { dst, base, offset } => {
                let base = get(vars, *base)?.bits();
                (*dst, Value::Ptr(base.wrapping_add(u64::from(*offset))))
            }
            Instr::GlobalAddr { dst, name } => {
                let addr = self.globals.get(name).copied().ok_or_else(|| {
                    EvalError::InvalidOperation(format!(
                        "no global named `{}`",
                        self.interner.lookup(*name)
                    ))
                })?;
                (*dst, Value::Ptr(addr))
            }
            Instr::StrAddr { dst, value } => {
                let addr = self.strings.get(value).copied().ok_or_else(|| {
                    EvalError::InvalidOperation(format!(
                        "string {:?} is missing from the module",
                        self.interner.lookup(*value)
                    ))
                })?;
                (*dst, Value::Ptr(addr))
            }
        };
        vars[dst.index()] = Some(value);
        Ok(())
    }

    fn tick(&mut self) -> Result<(), EvalError> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(EvalError::StepLimit(self.step_limit));
        }
        Ok(())
    }

    // === Memory ===

    fn allocate(&mut self, size: u32, align: u32) -> u64 {
        let align = align.max(1) as usize;
        let start = self.memory.len().div_ceil(align) * align;
        self.memory.resize(start + size.max(1) as usize, 0);
        start as u64
    }

    fn range(&self, addr: u64, size: u32) -> Result<std::ops::Range<usize>, EvalError> {
        let start = usize::try_from(addr).map_err(|_| EvalError::BadAddress(addr))?;
        let end = start
            .checked_add(size as usize)
            .ok_or(EvalError::BadAddress(addr))?;
        if start < NULL_GUARD || end > self.memory.len() {
            return Err(EvalError::BadAddress(addr));
        }
        Ok(start..end)
    }

    fn read(&self, ty: IrType, addr: u64) -> Result<Value, EvalError> {
        let range = self.range(addr, ty.size())?;
        let mut buf = [0u8; 8];
        buf[..range.len()].copy_from_slice(&self.memory[range]);
        Ok(from_bits(ty, u64::from_le_bytes(buf)))
    }

    fn write(&mut self, ty: IrType, addr: u64, value: Value) -> Result<(), EvalError> {
        let range = self.range(addr, ty.size())?;
        let bits = match (ty, value) {
            (IrType::F32, Value::Float(f)) => u64::from((f as f32).to_bits()),
            (_, value) => value.bits(),
        };
        let len = range.len();
        self.memory[range].copy_from_slice(&bits.to_le_bytes()[..len]);
        Ok(())
    }
}

fn get(vars: &[Option<Value>], var: VarId) -> Result<Value, EvalError> {
    vars.get(var.index())
        .copied()
        .flatten()
        .ok_or(EvalError::UndefinedVariable(var.raw()))
}

/// Interpret raw memory bits as a value of `ty`.
fn from_bits(ty: IrType, bits: u64) -> Value {
    match ty {
        IrType::Bool => Value::Bool(bits & 0xff != 0),
        IrType::Ptr => Value::Ptr(bits),
        IrType::F32 => Value::Float(f64::from(f32::from_bits(bits as u32))),
        IrType::F64 => Value::Float(f64::from_bits(bits)),
        _ => Value::Int(ty.canonical(bits)),
    }
}

/// Coerce a caller-supplied argument to its parameter type.
fn retype(ty: IrType, value: Value) -> Value {
    match (ty, value) {
        (IrType::F32, Value::Float(f)) => Value::Float(f64::from(f as f32)),
        (IrType::F32 | IrType::F64, v) => Value::Float(v.float()),
        (_, v) => from_bits(ty, v.bits()),
    }
}

fn constant(ty: IrType, value: Constant) -> Value {
    match value {
        Constant::Int(bits) => from_bits(ty, bits),
        Constant::Float(bits) => retype(ty, Value::Float(f64::from_bits(bits))),
        Constant::Bool(b) => Value::Bool(b),
    }
}

fn invalid(op: &str, ty: IrType) -> EvalError {
    EvalError::InvalidOperation(format!("`{op}` on {ty}"))
}

fn binop(op: BinaryOp, ty: IrType, a: Value, b: Value) -> Result<Value, EvalError> {
    if ty.is_float() {
        let (x, y) = (a.float(), b.float());
        let result = match op {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
            BinaryOp::Eq => return Ok(Value::Bool(x == y)),
            BinaryOp::NotEq => return Ok(Value::Bool(x != y)),
            BinaryOp::Lt => return Ok(Value::Bool(x < y)),
            BinaryOp::LtEq => return Ok(Value::Bool(x <= y)),
            BinaryOp::Gt => return Ok(Value::Bool(x > y)),
            BinaryOp::GtEq => return Ok(Value::Bool(x >= y)),
            _ => return Err(invalid(op.as_symbol(), ty)),
        };
        return Ok(retype(ty, Value::Float(result)));
    }

    if ty == IrType::Bool {
        let (x, y) = (a.bits() != 0, b.bits() != 0);
        return match op {
            BinaryOp::Eq => Ok(Value::Bool(x == y)),
            BinaryOp::NotEq => Ok(Value::Bool(x != y)),
            BinaryOp::And => Ok(Value::Bool(x && y)),
            BinaryOp::Or => Ok(Value::Bool(x || y)),
            _ => Err(invalid(op.as_symbol(), ty)),
        };
    }

    let (x, y) = (a.bits(), b.bits());
    let signed = ty.is_signed();
    let shift = (y & if ty.size() == 8 { 63 } else { 31 }) as u32;
    let result = match op {
        BinaryOp::Add => x.wrapping_add(y),
        BinaryOp::Sub => x.wrapping_sub(y),
        BinaryOp::Mul => x.wrapping_mul(y),
        BinaryOp::Div | BinaryOp::Mod if y == 0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div if signed => (x as i64).wrapping_div(y as i64) as u64,
        BinaryOp::Div => x / y,
        BinaryOp::Mod if signed => (x as i64).wrapping_rem(y as i64) as u64,
        BinaryOp::Mod => x % y,
        BinaryOp::BitAnd => x & y,
        BinaryOp::BitOr => x | y,
        BinaryOp::BitXor => x ^ y,
        BinaryOp::Shl => x.wrapping_shl(shift),
        BinaryOp::Shr if signed => ((x as i64) >> shift) as u64,
        BinaryOp::Shr => x >> shift,
        BinaryOp::Eq => return Ok(Value::Bool(x == y)),
        BinaryOp::NotEq => return Ok(Value::Bool(x != y)),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ord = if signed {
                (x as i64).cmp(&(y as i64))
            } else {
                x.cmp(&y)
            };
            return Ok(Value::Bool(match op {
                BinaryOp::Lt => ord.is_lt(),
                BinaryOp::LtEq => ord.is_le(),
                BinaryOp::Gt => ord.is_gt(),
                _ => ord.is_ge(),
            }));
        }
        BinaryOp::And | BinaryOp::Or => return Err(invalid(op.as_symbol(), ty)),
    };
    Ok(from_bits(ty, result))
}

fn unary(op: UnaryOp, ty: IrType, value: Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Neg if ty.is_float() => Ok(retype(ty, Value::Float(-value.float()))),
        UnaryOp::Neg if ty.is_integer() => Ok(from_bits(ty, 0u64.wrapping_sub(value.bits()))),
        UnaryOp::Not if ty == IrType::Bool => Ok(Value::Bool(value.bits() == 0)),
        UnaryOp::BitNot if ty.is_integer() => Ok(from_bits(ty, !value.bits())),
        _ => Err(invalid(op.as_symbol(), ty)),
    }
}

fn cast(from: IrType, to: IrType, value: Value) -> Value {
    if to.is_float() {
        let f = match value {
            Value::Float(f) => f,
            Value::Int(bits) if from.is_signed() => bits as i64 as f64,
            other => other.bits() as f64,
        };
        return retype(to, Value::Float(f));
    }
    if to == IrType::Bool {
        return Value::Bool(value.bits() != 0);
    }
    let bits = match value {
        Value::Float(f) if to.is_signed() || to.size() < 8 => f as i64 as u64,
        Value::Float(f) => f as u64,
        other => other.bits(),
    };
    from_bits(to, bits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
