//! Top-level item parsing.
//!
//! ```text
//! item   := fn_decl | extern_decl | struct_decl | global
//! fn_decl     := 'fn' IDENT '(' params? ')' ('->' type)? block
//! extern_decl := 'extern' 'fn' IDENT '(' params? ')' ('->' type)? ';'
//! struct_decl := 'struct' IDENT '{' (field (',' field)* ','?)? '}'
//! global      := 'var' IDENT ':' type ('=' expr)? ';'
//! ```

use quark_ir::{
    ExternDecl, FieldDecl, FunctionDecl, GlobalDecl, Item, Param, ParsedType, Span, StructDecl,
    TokenKind, TokenTag,
};

use crate::{ErrorContext, ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    pub(crate) fn parse_item(&mut self) -> Result<Item, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Fn => self
                .parse_function()
                .map(Item::Function)
                .map_err(|e| e.in_context(ErrorContext::FunctionDecl)),
            TokenKind::Extern => self
                .parse_extern()
                .map(Item::Extern)
                .map_err(|e| e.in_context(ErrorContext::ExternDecl)),
            TokenKind::Struct => self
                .parse_struct()
                .map(Item::Struct)
                .map_err(|e| e.in_context(ErrorContext::StructDecl)),
            TokenKind::Var => self
                .parse_global()
                .map(Item::Global)
                .map_err(|e| e.in_context(ErrorContext::GlobalDecl)),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedItem {
                    found: self.cursor.current_tag(),
                },
                self.cursor.current_span(),
            )),
        }
    }

    fn parse_function(&mut self) -> Result<FunctionDecl, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenTag::Fn)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        let params = self.parse_params()?;
        let ret = self.parse_return_type()?;
        let body = self.parse_block()?;
        Ok(FunctionDecl {
            name,
            name_span,
            params,
            ret,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_extern(&mut self) -> Result<ExternDecl, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenTag::Extern)?;
        self.cursor.expect(TokenTag::Fn)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        let params = self.parse_params()?;
        let ret = self.parse_return_type()?;
        self.cursor.expect(TokenTag::Semicolon)?;
        Ok(ExternDecl {
            name,
            name_span,
            params,
            ret,
            span: self.span_from(start),
        })
    }

    fn parse_struct(&mut self) -> Result<StructDecl, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenTag::Struct)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(TokenTag::LBrace)?;
        let mut fields = Vec::new();
        while !self.cursor.check(TokenTag::RBrace) && !self.cursor.is_at_end() {
            let field_start = self.cursor.current_span();
            let (field, field_span) = self.cursor.expect_ident()?;
            self.cursor.expect(TokenTag::Colon)?;
            let ty = self.parse_type()?;
            fields.push(FieldDecl {
                name: field,
                name_span: field_span,
                ty,
                span: self.span_from(field_start),
            });
            if !self.cursor.eat(TokenTag::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenTag::RBrace)?;
        Ok(StructDecl {
            name,
            name_span,
            fields,
            span: self.span_from(start),
        })
    }

    fn parse_global(&mut self) -> Result<GlobalDecl, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenTag::Var)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(TokenTag::Colon)?;
        let ty = self.parse_type()?;
        let init = if self.cursor.eat(TokenTag::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.cursor.expect(TokenTag::Semicolon)?;
        Ok(GlobalDecl {
            name,
            name_span,
            ty,
            init,
            span: self.span_from(start),
        })
    }

    /// `'(' (param (',' param)* ','?)? ')'`
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.cursor
            .expect(TokenTag::LParen)
            .map_err(|e| e.in_context(ErrorContext::Params))?;
        let mut params = Vec::new();
        while !self.cursor.check(TokenTag::RParen) && !self.cursor.is_at_end() {
            let param = self
                .parse_param()
                .map_err(|e| e.in_context(ErrorContext::Params))?;
            params.push(param);
            if !self.cursor.eat(TokenTag::Comma) {
                break;
            }
        }
        self.cursor
            .expect(TokenTag::RParen)
            .map_err(|e| e.in_context(ErrorContext::Params))?;
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start: Span = self.cursor.current_span();
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(TokenTag::Colon)?;
        let ty = self.parse_type()?;
        Ok(Param {
            name,
            name_span,
            ty,
            span: self.span_from(start),
        })
    }

    /// `('->' type)?`; absent means `void`.
    fn parse_return_type(&mut self) -> Result<Option<ParsedType>, ParseError> {
        if self.cursor.eat(TokenTag::Arrow) {
            self.parse_type().map(Some)
        } else {
            Ok(None)
        }
    }
}
