//! Lexical scopes.
//!
//! Scopes live in an arena and point at their parent for lookup. Entering a
//! block pushes a child of the current scope; leaving it pops the scope and
//! drops its bindings, so names never leak out of their block.

use quark_ir::Name;
use rustc_hash::FxHashMap;

use crate::SymbolId;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The module-level scope holding functions, externs and globals.
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    bindings: FxHashMap<Name, SymbolId>,
}

#[derive(Debug)]
pub struct Scopes {
    scopes: Vec<ScopeData>,
    current: ScopeId,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    pub fn new() -> Self {
        Scopes {
            scopes: vec![ScopeData {
                parent: None,
                bindings: FxHashMap::default(),
            }],
            current: ScopeId::GLOBAL,
        }
    }

    #[inline]
    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Enter a child of the current scope.
    pub fn push(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            parent: Some(self.current),
            bindings: FxHashMap::default(),
        });
        self.current = id;
        id
    }

    /// Leave the current scope, discarding its bindings. The global scope is
    /// never popped.
    pub fn pop(&mut self) {
        let scope = &mut self.scopes[self.current.index()];
        if let Some(parent) = scope.parent {
            scope.bindings.clear();
            self.current = parent;
        }
    }

    /// Bind `name` in the current scope. On a clash within the same scope
    /// the existing binding is kept and returned as the error.
    pub fn declare(&mut self, name: Name, symbol: SymbolId) -> Result<(), SymbolId> {
        let bindings = &mut self.scopes[self.current.index()].bindings;
        if let Some(&existing) = bindings.get(&name) {
            return Err(existing);
        }
        bindings.insert(name, symbol);
        Ok(())
    }

    /// Resolve `name` through the scope chain, innermost first.
    pub fn lookup(&self, name: Name) -> Option<SymbolId> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let data = &self.scopes[id.index()];
            if let Some(&symbol) = data.bindings.get(&name) {
                return Some(symbol);
            }
            scope = data.parent;
        }
        None
    }

    /// Every name visible from the current scope, for suggestions.
    pub fn visible_names(&self) -> Vec<Name> {
        let mut names = Vec::new();
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let data = &self.scopes[id.index()];
            names.extend(data.bindings.keys().copied());
            scope = data.parent;
        }
        names
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
