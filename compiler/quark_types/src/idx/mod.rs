//! Type index handle.
//!
//! `Idx` is the canonical type representation: every type lives in the
//! [`Pool`](crate::Pool) and is referenced by a 32-bit index. Interning makes
//! index equality structural equality.
//!
//! Primitive types are pre-interned at fixed indices so they can be named
//! without a pool.

use std::fmt;

use quark_ir::PrimTy;

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-12) ===

    /// Placeholder for an ill-typed expression. Silently compatible with
    /// everything so one mistake produces one diagnostic.
    pub const ERROR: Self = Self(0);
    pub const VOID: Self = Self(1);
    pub const BOOL: Self = Self(2);
    pub const INT8: Self = Self(3);
    pub const INT16: Self = Self(4);
    pub const INT32: Self = Self(5);
    pub const INT64: Self = Self(6);
    pub const UINT8: Self = Self(7);
    pub const UINT16: Self = Self(8);
    pub const UINT32: Self = Self(9);
    pub const UINT64: Self = Self(10);
    pub const FLOAT32: Self = Self(11);
    pub const FLOAT64: Self = Self(12);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 13;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    #[inline]
    pub const fn is_void(self) -> bool {
        self.0 == Self::VOID.0
    }

    pub const fn from_prim(prim: PrimTy) -> Self {
        match prim {
            PrimTy::Int8 => Self::INT8,
            PrimTy::Int16 => Self::INT16,
            PrimTy::Int32 => Self::INT32,
            PrimTy::Int64 => Self::INT64,
            PrimTy::Uint8 => Self::UINT8,
            PrimTy::Uint16 => Self::UINT16,
            PrimTy::Uint32 => Self::UINT32,
            PrimTy::Uint64 => Self::UINT64,
            PrimTy::Float32 => Self::FLOAT32,
            PrimTy::Float64 => Self::FLOAT64,
            PrimTy::Bool => Self::BOOL,
            PrimTy::Void => Self::VOID,
        }
    }

    /// Source name of a primitive type; `None` for pool-allocated types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("<error>"),
            1 => Some("void"),
            2 => Some("bool"),
            3 => Some("int8"),
            4 => Some("int16"),
            5 => Some("int32"),
            6 => Some("int64"),
            7 => Some("uint8"),
            8 => Some("uint16"),
            9 => Some("uint32"),
            10 => Some("uint64"),
            11 => Some("float32"),
            12 => Some("float64"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}
