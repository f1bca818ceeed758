use super::*;
use crate::ExprArena;

#[test]
fn precedence_table_orders_operators() {
    assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
    assert!(BinaryOp::Add.precedence() > BinaryOp::Shl.precedence());
    assert!(BinaryOp::Shl.precedence() > BinaryOp::Lt.precedence());
    assert!(BinaryOp::Lt.precedence() > BinaryOp::Eq.precedence());
    assert!(BinaryOp::Eq.precedence() > BinaryOp::BitAnd.precedence());
    assert!(BinaryOp::BitAnd.precedence() > BinaryOp::BitXor.precedence());
    assert!(BinaryOp::BitXor.precedence() > BinaryOp::BitOr.precedence());
    assert!(BinaryOp::BitOr.precedence() > BinaryOp::And.precedence());
    assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    assert_eq!(BinaryOp::Or.precedence(), BinaryOp::MIN_PRECEDENCE);
    assert!(BinaryOp::ASSIGN_PRECEDENCE < BinaryOp::MIN_PRECEDENCE);
}

#[test]
fn operator_classes() {
    assert!(BinaryOp::LtEq.is_comparison());
    assert!(!BinaryOp::LtEq.is_equality());
    assert!(BinaryOp::NotEq.is_equality());
    assert!(BinaryOp::Or.is_logical());
    assert!(BinaryOp::Shr.is_integer_only());
    assert!(!BinaryOp::Div.is_integer_only());
    assert_eq!(BinaryOp::BitXor.as_symbol(), "^");
    assert_eq!(UnaryOp::BitNot.as_symbol(), "~");
}

#[test]
fn arena_ids_are_sequential() {
    let mut arena = ExprArena::new();
    let a = arena.alloc_expr(Expr::new(ExprKind::Bool(true), Span::new(0, 4)));
    let b = arena.alloc_expr(Expr::new(ExprKind::Bool(false), Span::new(5, 10)));
    let s = arena.alloc_stmt(Stmt::new(StmtKind::Expr(b), Span::new(5, 11)));
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(s.index(), 0);
    assert_eq!(arena.expr_count(), 2);
    assert_eq!(arena[b].kind, ExprKind::Bool(false));
    assert_eq!(arena[s].span, Span::new(5, 11));
}

#[test]
fn module_functions_filters_items() {
    let body = Block {
        stmts: Vec::new(),
        span: Span::new(10, 12),
    };
    let module = Module {
        items: vec![
            Item::Struct(StructDecl {
                name: Name::from_raw(1),
                name_span: Span::new(7, 8),
                fields: Vec::new(),
                span: Span::new(0, 11),
            }),
            Item::Function(FunctionDecl {
                name: Name::from_raw(2),
                name_span: Span::new(3, 4),
                params: Vec::new(),
                ret: None,
                body,
                span: Span::new(0, 12),
            }),
        ],
    };
    assert_eq!(module.functions().count(), 1);
    assert_eq!(module.items[0].name(), Name::from_raw(1));
    assert_eq!(module.items[1].span(), Span::new(0, 12));
}
