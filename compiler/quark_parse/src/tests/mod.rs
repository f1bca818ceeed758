//! Whole-parser tests: determinism, recovery across items, stack safety.

use super::*;
use pretty_assertions::assert_eq;
use quark_diagnostic::ErrorCode;
use quark_ir::{ExprArena, ExprId, Item, Span, StmtId, StmtKind};

use visitor::{walk_expr, walk_stmt, Visitor};

mod visitor;

fn parse_source(source: &str) -> (ParseOutput, StringInterner) {
    let mut interner = StringInterner::new();
    let lexed = quark_lexer::lex(source, &mut interner);
    (parse(&lexed.tokens, &interner), interner)
}

const PROGRAM: &str = r"
struct Point { x: int32, y: int32 }

extern fn putchar(c: int32) -> int32;

var origin: int64 = 0;

fn dist2(p: *Point) -> int32 {
    var dx = p.x;
    var dy: int32 = (*p).y;
    return dx * dx + dy * dy;
}

fn main() -> int32 {
    var i = 0;
    while i < 10 {
        if i % 2 == 0 { putchar(48 + i); } else { i = i + 1; continue; }
        i = i + 1;
    }
    return 0;
}
";

#[test]
fn parses_full_program() {
    let (output, _) = parse_source(PROGRAM);
    assert!(!output.has_errors(), "{:?}", output.errors);
    let kinds: Vec<&str> = output
        .module
        .items
        .iter()
        .map(|item| match item {
            Item::Function(_) => "fn",
            Item::Extern(_) => "extern",
            Item::Struct(_) => "struct",
            Item::Global(_) => "global",
        })
        .collect();
    assert_eq!(kinds, vec!["struct", "extern", "global", "fn", "fn"]);
}

#[test]
fn parsing_twice_is_identical() {
    let (first, _) = parse_source(PROGRAM);
    let (second, _) = parse_source(PROGRAM);
    assert_eq!(first, second);
}

/// Every node lies inside its parent, after its previous sibling.
#[derive(Default)]
struct SpanNesting {
    parents: Vec<Span>,
    sibling_end: Vec<u32>,
    nodes: usize,
}

impl SpanNesting {
    fn enter(&mut self, span: Span) {
        if let Some(parent) = self.parents.last() {
            assert!(parent.contains_span(span), "{span:?} escapes {parent:?}");
        }
        if let Some(end) = self.sibling_end.last_mut() {
            assert!(span.start >= *end, "{span:?} overlaps its previous sibling");
            *end = span.end;
        }
        self.nodes += 1;
        self.parents.push(span);
        self.sibling_end.push(span.start);
    }

    fn leave(&mut self) {
        self.parents.pop();
        self.sibling_end.pop();
    }
}

impl<'ast> Visitor<'ast> for SpanNesting {
    fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
        self.enter(arena.get_stmt(id).span);
        walk_stmt(self, id, arena);
        self.leave();
    }

    fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
        self.enter(arena.get_expr(id).span);
        walk_expr(self, id, arena);
        self.leave();
    }
}

#[test]
fn spans_nest_and_siblings_do_not_overlap() {
    let (output, _) = parse_source(PROGRAM);
    let mut nesting = SpanNesting::default();
    for item in &output.module.items {
        if let Item::Function(func) = item {
            nesting.enter(func.body.span);
            nesting.visit_block(&func.body, &output.arena);
            nesting.leave();
        }
    }
    assert!(nesting.nodes > 30, "visited only {} nodes", nesting.nodes);
}

#[test]
fn errors_in_separate_items_are_all_reported() {
    let source = "fn a( { } struct S { x int32 } fn ok() { return; } var g: = 1;";
    let (output, _) = parse_source(source);
    assert_eq!(output.errors.len(), 3);
    assert_eq!(output.module.items.len(), 1);
    assert!(matches!(output.module.items[0], Item::Function(_)));
}

#[test]
fn broken_body_does_not_leak_globals() {
    // The `var` inside the unparsable signature's body is a local, not an item.
    let (output, _) = parse_source("fn f(: int32) { var x = 1; } fn g() { }");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.module.items.len(), 1);
}

#[test]
fn lexer_error_tokens_are_transparent() {
    let (output, _) = parse_source("fn f() { var x = 1 @ ; }");
    assert!(!output.has_errors(), "{:?}", output.errors);
}

#[test]
fn parse_errors_convert_to_syntax_diagnostics() {
    let (output, _) = parse_source("fn f() { return 1 }");
    assert_eq!(output.errors.len(), 1);
    let diag = output.errors[0].to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E1001);
    assert!(diag.message.contains("expected `;`"));
    assert!(diag.message.contains("found `}`"));
}

#[test]
fn empty_source_is_empty_module() {
    let (output, _) = parse_source("");
    assert!(!output.has_errors());
    assert!(output.module.items.is_empty());
}

#[test]
fn deep_parenthesized_nesting() {
    let depth = 5_000;
    let source = format!(
        "fn f() -> int32 {{ return {}1{}; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let (output, _) = parse_source(&source);
    assert!(!output.has_errors());
}

#[test]
fn deep_unary_nesting() {
    let source = format!("fn f() {{ var x = {}1; }}", "-".repeat(5_000));
    let (output, _) = parse_source(&source);
    assert!(!output.has_errors());
    let Item::Function(func) = &output.module.items[0] else {
        panic!("expected a function");
    };
    assert!(matches!(
        output.arena.get_stmt(func.body.stmts[0]).kind,
        StmtKind::Var(_)
    ));
}

#[test]
fn deep_block_nesting() {
    let depth = 20_000;
    let source = format!(
        "fn f() -> int32 {{ {}return 1;{} }}",
        "{ ".repeat(depth),
        " }".repeat(depth)
    );
    let (output, _) = parse_source(&source);
    assert!(!output.has_errors(), "{:?}", output.errors);
    assert_eq!(output.module.items.len(), 1);
}

#[test]
fn deep_if_nesting() {
    let depth = 20_000;
    let source = format!(
        "fn f() -> int32 {{ {}return 1;{} return 0; }}",
        "if true { ".repeat(depth),
        " }".repeat(depth)
    );
    let (output, _) = parse_source(&source);
    assert!(!output.has_errors(), "{:?}", output.errors);
}

#[test]
fn long_else_if_chain() {
    let source = format!(
        "fn f(x: int32) -> int32 {{ if x == 0 {{ return 0; }}{} return 1; }}",
        " else if x == 1 { return 1; }".repeat(20_000)
    );
    let (output, _) = parse_source(&source);
    assert!(!output.has_errors(), "{:?}", output.errors);
}
