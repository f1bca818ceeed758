//! Type parsing.
//!
//! ```text
//! type := prim | '*' type | IDENT
//! ```

use quark_ir::{ParsedType, ParsedTypeKind, PrimTy, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a type annotation.
    pub(crate) fn parse_type(&mut self) -> Result<ParsedType, ParseError> {
        let start = self.cursor.current_span();
        if let Some(prim) = prim_ty(self.cursor.current_kind()) {
            self.cursor.advance();
            return Ok(ParsedType {
                kind: ParsedTypeKind::Prim(prim),
                span: start,
            });
        }
        match self.cursor.current_kind() {
            TokenKind::Star => {
                self.cursor.advance();
                let pointee = self.parse_type()?;
                Ok(ParsedType {
                    kind: ParsedTypeKind::Pointer(Box::new(pointee)),
                    span: self.span_from(start),
                })
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(ParsedType {
                    kind: ParsedTypeKind::Named(name),
                    span: start,
                })
            }
            _ => Err(ParseError::expected_type(self.cursor.current_tag(), start)),
        }
    }
}

fn prim_ty(kind: TokenKind) -> Option<PrimTy> {
    Some(match kind {
        TokenKind::Int8 => PrimTy::Int8,
        TokenKind::Int16 => PrimTy::Int16,
        TokenKind::Int32 => PrimTy::Int32,
        TokenKind::Int64 => PrimTy::Int64,
        TokenKind::Uint8 => PrimTy::Uint8,
        TokenKind::Uint16 => PrimTy::Uint16,
        TokenKind::Uint32 => PrimTy::Uint32,
        TokenKind::Uint64 => PrimTy::Uint64,
        TokenKind::Float32 => PrimTy::Float32,
        TokenKind::Float64 => PrimTy::Float64,
        TokenKind::Bool => PrimTy::Bool,
        TokenKind::Void => PrimTy::Void,
        _ => return None,
    })
}
