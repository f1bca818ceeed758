//! Struct table and memory layout.
//!
//! Layout is part of the ABI: fields are placed in declaration order, each at
//! the next offset aligned to its own alignment. A scalar's alignment equals
//! its size; a struct's alignment is its largest field alignment and its size
//! is rounded up to that alignment.

use quark_ir::{Name, Span};
use rustc_hash::FxHashMap;

use crate::{Idx, Pool, TypeData};

/// Declared identity of a struct.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct StructId(u32);

impl StructId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        StructId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Name,
    pub ty: Idx,
    pub span: Span,
    /// Byte offset from the start of the struct.
    pub offset: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDef {
    pub name: Name,
    pub span: Span,
    pub fields: Vec<FieldDef>,
    pub size: u32,
    pub align: u32,
}

#[derive(Clone, Debug, Default)]
pub struct StructTable {
    defs: Vec<StructDef>,
    by_name: FxHashMap<Name, StructId>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Visit {
    Pending,
    Active,
    Done,
}

impl StructTable {
    /// Register a struct with no fields yet. A later declaration with the
    /// same name does not replace the first in name lookup.
    pub fn declare(&mut self, name: Name, span: Span) -> StructId {
        let id = StructId::new(self.defs.len() as u32);
        self.defs.push(StructDef {
            name,
            span,
            fields: Vec::new(),
            size: 0,
            align: 1,
        });
        self.by_name.entry(name).or_insert(id);
        id
    }

    pub fn lookup(&self, name: Name) -> Option<StructId> {
        self.by_name.get(&name).copied()
    }

    #[inline]
    pub fn get(&self, id: StructId) -> &StructDef {
        &self.defs[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: StructId) -> &mut StructDef {
        &mut self.defs[id.index()]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StructId, &StructDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (StructId::new(i as u32), def))
    }

    /// Field by name, with its position in declaration order.
    pub fn field(&self, id: StructId, name: Name) -> Option<(usize, &FieldDef)> {
        self.get(id)
            .fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.by_name.keys().copied()
    }

    /// Compute every struct's layout, dependencies first.
    ///
    /// A field that contains its own struct by value (directly or through
    /// other structs) can have no finite layout. Each such field is retyped
    /// to `Idx::ERROR` and returned as `(struct, field index)`.
    pub fn layout_all(&mut self, pool: &Pool) -> Vec<(StructId, usize)> {
        let mut state = vec![Visit::Pending; self.defs.len()];
        let mut cycles = Vec::new();
        for i in 0..self.defs.len() {
            self.layout_one(StructId::new(i as u32), pool, &mut state, &mut cycles);
        }
        cycles
    }

    fn layout_one(
        &mut self,
        id: StructId,
        pool: &Pool,
        state: &mut [Visit],
        cycles: &mut Vec<(StructId, usize)>,
    ) {
        if state[id.index()] != Visit::Pending {
            return;
        }
        state[id.index()] = Visit::Active;

        for field_index in 0..self.get(id).fields.len() {
            let ty = self.get(id).fields[field_index].ty;
            let Some(dep) = pool.as_struct(ty) else {
                continue;
            };
            match state[dep.index()] {
                Visit::Active => {
                    self.get_mut(id).fields[field_index].ty = Idx::ERROR;
                    cycles.push((id, field_index));
                }
                Visit::Pending => self.layout_one(dep, pool, state, cycles),
                Visit::Done => {}
            }
        }

        let mut offset = 0u32;
        let mut max_align = 1u32;
        for field_index in 0..self.get(id).fields.len() {
            let ty = self.get(id).fields[field_index].ty;
            let (size, align) = (self.size_of(pool, ty), self.align_of(pool, ty));
            offset = align_to(offset, align);
            self.get_mut(id).fields[field_index].offset = offset;
            offset += size;
            max_align = max_align.max(align);
        }
        let def = self.get_mut(id);
        def.align = max_align;
        def.size = align_to(offset, max_align);
        state[id.index()] = Visit::Done;
    }

    /// Size in bytes. Only meaningful for structs after [`Self::layout_all`].
    pub fn size_of(&self, pool: &Pool, ty: Idx) -> u32 {
        match *pool.get(ty) {
            TypeData::Bool => 1,
            TypeData::Int { bits, .. } | TypeData::Float { bits } => u32::from(bits / 8),
            TypeData::Pointer(_) => 8,
            TypeData::Struct(id) => self.get(id).size,
            TypeData::Error | TypeData::Void | TypeData::Function { .. } => 0,
        }
    }

    pub fn align_of(&self, pool: &Pool, ty: Idx) -> u32 {
        match *pool.get(ty) {
            TypeData::Struct(id) => self.get(id).align,
            _ => self.size_of(pool, ty).max(1),
        }
    }
}

#[inline]
fn align_to(offset: u32, align: u32) -> u32 {
    offset.div_ceil(align) * align
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
