//! Raw tokenizer for Quark source text.
//!
//! This crate is the bottom layer of the lexer. It turns bytes into
//! `(RawTag, len)` pairs and nothing more: no keyword lookup, no numeric
//! value parsing, no interning, no diagnostics. The cooking layer in
//! `quark_lexer` does all of that.
//!
//! The scan is lossless. Every byte of the input belongs to exactly one raw
//! token, trivia included, so the lengths always sum to the source length.
//!
//! ```text
//! let buf = SourceBuffer::new("var x = 1;");
//! let mut scanner = RawScanner::new(buf.cursor());
//! let tok = scanner.next_token(); // RawToken { tag: Ident, len: 3 }
//! ```

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::{tokenize, RawScanner};
pub use source_buffer::{EncodingIssue, EncodingIssueKind, SourceBuffer};
pub use tag::{RawTag, RawToken};
