use super::*;
use quark_ir::StringInterner;

#[test]
fn inner_scope_shadows_and_pops() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");
    let mut scopes = Scopes::new();
    scopes.declare(x, SymbolId::new(0)).unwrap();

    let inner = scopes.push();
    assert_ne!(inner, ScopeId::GLOBAL);
    assert_eq!(scopes.lookup(x), Some(SymbolId::new(0)));
    scopes.declare(x, SymbolId::new(1)).unwrap();
    assert_eq!(scopes.lookup(x), Some(SymbolId::new(1)));

    scopes.pop();
    assert_eq!(scopes.current(), ScopeId::GLOBAL);
    assert_eq!(scopes.lookup(x), Some(SymbolId::new(0)));
}

#[test]
fn duplicate_in_same_scope_returns_existing() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");
    let mut scopes = Scopes::new();
    scopes.push();
    scopes.declare(x, SymbolId::new(3)).unwrap();
    assert_eq!(scopes.declare(x, SymbolId::new(4)), Err(SymbolId::new(3)));
    assert_eq!(scopes.lookup(x), Some(SymbolId::new(3)));
}

#[test]
fn popped_bindings_are_gone() {
    let mut interner = StringInterner::new();
    let y = interner.intern("y");
    let mut scopes = Scopes::new();
    scopes.push();
    scopes.declare(y, SymbolId::new(0)).unwrap();
    scopes.pop();
    assert_eq!(scopes.lookup(y), None);
    scopes.push();
    assert_eq!(scopes.lookup(y), None);
}

#[test]
fn global_scope_is_never_popped() {
    let mut scopes = Scopes::new();
    scopes.pop();
    assert_eq!(scopes.current(), ScopeId::GLOBAL);
}

#[test]
fn visible_names_walks_the_chain() {
    let mut interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let mut scopes = Scopes::new();
    scopes.declare(a, SymbolId::new(0)).unwrap();
    scopes.push();
    scopes.declare(b, SymbolId::new(1)).unwrap();
    let mut names = scopes.visible_names();
    names.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(names, expected);
}
