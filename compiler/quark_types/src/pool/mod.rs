//! Interned type storage.
//!
//! Each distinct [`TypeData`] is stored once; [`Pool::intern`] returns the
//! existing index for structurally equal data. Structs intern by declared
//! identity ([`StructId`]), so two structs with identical fields stay
//! distinct types.

use quark_ir::StringInterner;
use rustc_hash::FxHashMap;

use crate::{Idx, StructId, StructTable};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Error,
    Void,
    Bool,
    Int { bits: u8, signed: bool },
    Float { bits: u8 },
    Pointer(Idx),
    Struct(StructId),
    Function { params: Vec<Idx>, ret: Idx },
}

/// Unified type pool.
#[derive(Clone, Debug)]
pub struct Pool {
    types: Vec<TypeData>,
    map: FxHashMap<TypeData, Idx>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool with the primitive types at their fixed indices.
    pub fn new() -> Self {
        let mut pool = Pool {
            types: Vec::with_capacity(64),
            map: FxHashMap::default(),
        };
        let primitives = [
            TypeData::Error,                           // 0 = Idx::ERROR
            TypeData::Void,                            // 1 = Idx::VOID
            TypeData::Bool,                            // 2 = Idx::BOOL
            TypeData::Int { bits: 8, signed: true },   // 3
            TypeData::Int { bits: 16, signed: true },  // 4
            TypeData::Int { bits: 32, signed: true },  // 5
            TypeData::Int { bits: 64, signed: true },  // 6
            TypeData::Int { bits: 8, signed: false },  // 7
            TypeData::Int { bits: 16, signed: false }, // 8
            TypeData::Int { bits: 32, signed: false }, // 9
            TypeData::Int { bits: 64, signed: false }, // 10
            TypeData::Float { bits: 32 },              // 11
            TypeData::Float { bits: 64 },              // 12
        ];
        for data in primitives {
            pool.intern(data);
        }
        debug_assert_eq!(pool.types.len() as u32, Idx::PRIMITIVE_COUNT);
        pool
    }

    pub fn intern(&mut self, data: TypeData) -> Idx {
        if let Some(&idx) = self.map.get(&data) {
            return idx;
        }
        let idx = Idx::from_raw(self.types.len() as u32);
        self.types.push(data.clone());
        self.map.insert(data, idx);
        idx
    }

    #[inline]
    pub fn get(&self, idx: Idx) -> &TypeData {
        &self.types[idx.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn pointer_to(&mut self, pointee: Idx) -> Idx {
        self.intern(TypeData::Pointer(pointee))
    }

    pub fn struct_type(&mut self, id: StructId) -> Idx {
        self.intern(TypeData::Struct(id))
    }

    pub fn function(&mut self, params: Vec<Idx>, ret: Idx) -> Idx {
        self.intern(TypeData::Function { params, ret })
    }

    // === Queries ===

    /// `(bits, signed)` for integer types.
    #[inline]
    pub fn int_info(&self, idx: Idx) -> Option<(u8, bool)> {
        match *self.get(idx) {
            TypeData::Int { bits, signed } => Some((bits, signed)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_int(&self, idx: Idx) -> bool {
        self.int_info(idx).is_some()
    }

    #[inline]
    pub fn is_signed_int(&self, idx: Idx) -> bool {
        matches!(self.int_info(idx), Some((_, true)))
    }

    #[inline]
    pub fn is_float(&self, idx: Idx) -> bool {
        matches!(self.get(idx), TypeData::Float { .. })
    }

    #[inline]
    pub fn is_numeric(&self, idx: Idx) -> bool {
        self.is_int(idx) || self.is_float(idx)
    }

    #[inline]
    pub fn is_pointer(&self, idx: Idx) -> bool {
        matches!(self.get(idx), TypeData::Pointer(_))
    }

    pub fn pointee(&self, idx: Idx) -> Option<Idx> {
        match *self.get(idx) {
            TypeData::Pointer(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_struct(&self, idx: Idx) -> Option<StructId> {
        match *self.get(idx) {
            TypeData::Struct(id) => Some(id),
            _ => None,
        }
    }

    /// Scalars fit in one register: integers, floats, bools and pointers.
    pub fn is_scalar(&self, idx: Idx) -> bool {
        matches!(
            self.get(idx),
            TypeData::Bool | TypeData::Int { .. } | TypeData::Float { .. } | TypeData::Pointer(_)
        )
    }

    /// Implicit conversion from `from` to `to` without loss: integers of the
    /// same signedness to an equal or wider width, unsigned to a strictly
    /// wider signed integer. Nothing else converts implicitly.
    pub fn can_widen(&self, from: Idx, to: Idx) -> bool {
        if from == to {
            return true;
        }
        match (self.int_info(from), self.int_info(to)) {
            (Some((from_bits, from_signed)), Some((to_bits, to_signed))) => {
                if from_signed == to_signed {
                    to_bits >= from_bits
                } else {
                    !from_signed && to_signed && to_bits > from_bits
                }
            }
            _ => false,
        }
    }

    /// Render a type as it would be written in source.
    pub fn display(&self, idx: Idx, structs: &StructTable, interner: &StringInterner) -> String {
        match self.get(idx) {
            TypeData::Pointer(inner) => format!("*{}", self.display(*inner, structs, interner)),
            TypeData::Struct(id) => interner.lookup(structs.get(*id).name).to_string(),
            TypeData::Function { params, ret } => {
                let params: Vec<String> = params
                    .iter()
                    .map(|p| self.display(*p, structs, interner))
                    .collect();
                format!(
                    "fn({}) -> {}",
                    params.join(", "),
                    self.display(*ret, structs, interner)
                )
            }
            _ => idx.name().unwrap_or("<unknown>").to_string(),
        }
    }
}
