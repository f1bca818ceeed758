use super::*;
use pretty_assertions::assert_eq;
use quark_ir::StringInterner;

fn field(interner: &mut StringInterner, name: &str, ty: Idx) -> FieldDef {
    FieldDef {
        name: interner.intern(name),
        ty,
        span: Span::DUMMY,
        offset: 0,
    }
}

#[test]
fn int8_then_int32_pads_to_four() {
    let mut interner = StringInterner::new();
    let pool = Pool::new();
    let mut structs = StructTable::default();
    let id = structs.declare(interner.intern("S"), Span::DUMMY);
    structs.get_mut(id).fields = vec![
        field(&mut interner, "a", Idx::INT8),
        field(&mut interner, "b", Idx::INT32),
    ];
    assert!(structs.layout_all(&pool).is_empty());
    let def = structs.get(id);
    assert_eq!(def.fields[1].offset, 4);
    assert_eq!(def.size, 8);
    assert_eq!(def.align, 4);
}

#[test]
fn trailing_padding_rounds_to_alignment() {
    let mut interner = StringInterner::new();
    let mut pool = Pool::new();
    let ptr = pool.pointer_to(Idx::UINT8);
    let mut structs = StructTable::default();
    let id = structs.declare(interner.intern("T"), Span::DUMMY);
    structs.get_mut(id).fields = vec![
        field(&mut interner, "p", ptr),
        field(&mut interner, "flag", Idx::BOOL),
    ];
    structs.layout_all(&pool);
    let def = structs.get(id);
    assert_eq!(
        def.fields.iter().map(|f| f.offset).collect::<Vec<_>>(),
        vec![0, 8]
    );
    assert_eq!(def.size, 16);
    assert_eq!(def.align, 8);
}

#[test]
fn nested_struct_is_laid_out_first() {
    let mut interner = StringInterner::new();
    let mut pool = Pool::new();
    let mut structs = StructTable::default();
    // Outer is declared before Inner but depends on it.
    let outer = structs.declare(interner.intern("Outer"), Span::DUMMY);
    let inner = structs.declare(interner.intern("Inner"), Span::DUMMY);
    let inner_ty = pool.struct_type(inner);
    structs.get_mut(inner).fields = vec![
        field(&mut interner, "x", Idx::INT16),
        field(&mut interner, "y", Idx::INT64),
    ];
    structs.get_mut(outer).fields = vec![
        field(&mut interner, "tag", Idx::UINT8),
        field(&mut interner, "inner", inner_ty),
    ];
    assert!(structs.layout_all(&pool).is_empty());
    assert_eq!(structs.get(inner).size, 16);
    assert_eq!(structs.get(outer).fields[1].offset, 8);
    assert_eq!(structs.get(outer).size, 24);
}

#[test]
fn self_containing_struct_is_reported() {
    let mut interner = StringInterner::new();
    let mut pool = Pool::new();
    let mut structs = StructTable::default();
    let a = structs.declare(interner.intern("A"), Span::DUMMY);
    let b = structs.declare(interner.intern("B"), Span::DUMMY);
    let (a_ty, b_ty) = (pool.struct_type(a), pool.struct_type(b));
    structs.get_mut(a).fields = vec![field(&mut interner, "b", b_ty)];
    structs.get_mut(b).fields = vec![field(&mut interner, "a", a_ty)];
    let cycles = structs.layout_all(&pool);
    assert_eq!(cycles, vec![(b, 0)]);
    assert_eq!(structs.get(b).fields[0].ty, Idx::ERROR);
}

#[test]
fn pointer_to_self_is_fine() {
    let mut interner = StringInterner::new();
    let mut pool = Pool::new();
    let mut structs = StructTable::default();
    let node = structs.declare(interner.intern("Node"), Span::DUMMY);
    let node_ty = pool.struct_type(node);
    let next = pool.pointer_to(node_ty);
    structs.get_mut(node).fields = vec![
        field(&mut interner, "value", Idx::INT32),
        field(&mut interner, "next", next),
    ];
    assert!(structs.layout_all(&pool).is_empty());
    assert_eq!(structs.get(node).size, 16);
}

#[test]
fn field_lookup_by_name() {
    let mut interner = StringInterner::new();
    let mut structs = StructTable::default();
    let id = structs.declare(interner.intern("P"), Span::DUMMY);
    structs.get_mut(id).fields = vec![
        field(&mut interner, "x", Idx::INT32),
        field(&mut interner, "y", Idx::INT32),
    ];
    let y = interner.intern("y");
    let (index, def) = structs.field(id, y).unwrap();
    assert_eq!(index, 1);
    assert_eq!(def.ty, Idx::INT32);
    assert!(structs.field(id, interner.intern("z")).is_none());
}
