//! Stack growth for deeply recursive compiler passes.
//!
//! The parser, the checker and the lowerer all recurse over the expression
//! tree. Source like `((((...))))` or `-(-(-(...)))` nested tens of
//! thousands deep would overflow a fixed thread stack, so each recursive
//! entry point wraps its body in [`ensure_sufficient_stack`].
//!
//! On native targets the `stacker` crate allocates a fresh segment when the
//! remaining stack drops below the red zone. On `wasm32` the call is a plain
//! passthrough.
//!
//! ```text
//! fn parse_unary(&mut self) -> ExprId {
//!     ensure_sufficient_stack(|| {
//!         // ... may call parse_unary again ...
//!     })
//! }
//! ```

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
