//! Expression parsing: precedence climbing, primaries and postfix chains.

use crate::ast::{BinOp, Expr, FunctionDef, PostOp, SetLine, TokenKind, UnaryOp};
use crate::parser::{ParseResult, Parser, describe};

impl Parser {
    /// A full expression, including a trailing `if cond else other`.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        let value = self.parse_binary()?;
        let Some(token) = self.cursor.accept_one(TokenKind::If) else {
            return Ok(value);
        };
        let condition = self.parse_binary()?;
        if let Err(token) = self.cursor.accept(&[TokenKind::Else]) {
            return self.invalid_token("conditional expression", &token);
        }
        let otherwise = self.parse_expr()?;
        Ok(Expr::Conditional {
            pos: token.pos,
            condition: Box::new(condition),
            then: Box::new(value),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_binary(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_primary()?;
        self.parse_binop_rhs(0, lhs)
    }

    /// Folds binary operators binding at least as tightly as `min_prec`
    /// into `lhs`.
    fn parse_binop_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> ParseResult<Expr> {
        loop {
            let prec = self.cursor.peek().precedence();
            if prec < min_prec {
                return Ok(lhs);
            }

            let token = self.cursor.next();
            let Some(op) = BinOp::from_token(token.kind) else {
                return self.invalid_token("binary expression", &token);
            };

            let mut rhs = self.parse_primary()?;
            // Let a tighter operator after the right side take it first
            if prec < self.cursor.peek().precedence() {
                rhs = self.parse_binop_rhs(prec + 1, rhs)?;
            }

            lhs = Expr::Binary {
                pos: token.pos,
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
    }

    /// Comma-separated expressions on one line.
    pub(crate) fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut exprs = Vec::new();
        loop {
            exprs.push(self.parse_expr()?);
            if self.cursor.accept_one(TokenKind::Comma).is_none() {
                return Ok(exprs);
            }
        }
    }

    /// A bracketed list that may also be written one item per line:
    ///
    /// ```text
    /// call(
    ///     first,
    ///     second
    /// )
    /// ```
    fn parse_ml_expr_list(&mut self, start: TokenKind, end: TokenKind) -> ParseResult<Vec<Expr>> {
        if let Err(token) = self.cursor.accept(&[start]) {
            return self.invalid_token("expression list", &token);
        }

        let mut exprs = Vec::new();
        if !self.cursor.is_next(end) {
            if self.cursor.accept(&[TokenKind::Eol, TokenKind::Indent]).is_ok() {
                loop {
                    exprs.push(self.parse_expr()?);
                    let closing = [TokenKind::Eol, TokenKind::Dedent, TokenKind::Eol];
                    if self.cursor.accept(&closing).is_ok() {
                        break;
                    }
                    if let Err(token) = self.cursor.accept(&[TokenKind::Comma]) {
                        return self.invalid_token("expression list", &token);
                    }
                    let _ = self.cursor.accept(&[TokenKind::Eol]);
                }
            } else {
                exprs = self.parse_expr_list()?;
            }
        }

        if let Err(token) = self.cursor.accept(&[end]) {
            return self.invalid_token("expression list", &token);
        }
        Ok(exprs)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.cursor.peek().clone();
        let pos = token.pos.clone();

        let mut expr = match token.kind {
            TokenKind::Function => Expr::Function(self.parse_fn_literal()?),
            TokenKind::Literal => Expr::Identifier {
                path: self.parse_path("identifier")?,
                pos,
            },
            TokenKind::LeftBracket => Expr::Array {
                items: self.parse_ml_expr_list(TokenKind::LeftBracket, TokenKind::RightBracket)?,
                pos,
            },
            TokenKind::LeftCurly => self.parse_object()?,
            TokenKind::LeftParen => {
                self.cursor.next();
                let inner = self.parse_expr()?;
                if let Err(token) = self.cursor.accept(&[TokenKind::RightParen]) {
                    return self.invalid_token("()", &token);
                }
                inner
            }
            TokenKind::Number => Expr::Number {
                pos,
                value: self.cursor.next().value,
            },
            TokenKind::String => Expr::String {
                pos,
                value: self.cursor.next().value,
            },
            TokenKind::Regex => Expr::Regex {
                pos,
                value: self.cursor.next().value,
            },
            TokenKind::True | TokenKind::False => Expr::Bool {
                pos,
                value: self.cursor.next().kind == TokenKind::True,
            },
            TokenKind::Null | TokenKind::Undefined => Expr::LitExpr {
                pos,
                value: self.cursor.next().value,
            },
            kind if kind.is_unary_op() => {
                self.cursor.next();
                let Some(op) = UnaryOp::from_token(kind) else {
                    return self.invalid_token("unary expression", &token);
                };
                Expr::Unary {
                    pos,
                    op,
                    expr: Box::new(self.parse_primary()?),
                }
            }
            _ => {
                let message = format!("Token is not an expression: {}", describe(&token));
                return self.fail(pos, message);
            }
        };

        loop {
            let pos = self.cursor.peek().pos.clone();
            expr = match self.cursor.peek().kind {
                TokenKind::LeftBracket => {
                    self.cursor.next();
                    let index = self.parse_expr()?;
                    if let Err(token) = self.cursor.accept(&[TokenKind::RightBracket]) {
                        return self.invalid_token("accessor", &token);
                    }
                    Expr::Accessor {
                        pos,
                        object: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                TokenKind::LeftCurly => Expr::Constructor {
                    pos,
                    ty: Box::new(expr),
                    args: self.parse_ml_expr_list(TokenKind::LeftCurly, TokenKind::RightCurly)?,
                },
                TokenKind::LeftParen => Expr::Call {
                    pos,
                    function: Box::new(expr),
                    args: self.parse_ml_expr_list(TokenKind::LeftParen, TokenKind::RightParen)?,
                },
                kind if kind.is_postfix_op() => {
                    self.cursor.next();
                    let op = match kind {
                        TokenKind::Increment => PostOp::Increment,
                        _ => PostOp::Decrement,
                    };
                    Expr::PostOp {
                        pos,
                        op,
                        expr: Box::new(expr),
                    }
                }
                _ => return Ok(expr),
            };
        }
    }

    /// `fn(params)` with an optional indented body.
    fn parse_fn_literal(&mut self) -> ParseResult<FunctionDef> {
        let pos = self.cursor.next().pos;
        let params = self.parse_params("function definition")?;

        let mut body = Vec::new();
        if self.cursor.accept(&[TokenKind::Eol, TokenKind::Indent]).is_ok() {
            while !self.cursor.peek().kind.is_dedent_stop() {
                body.push(self.parse_stmt());
            }
            match self.cursor.accept(&[TokenKind::Dedent, TokenKind::Eol]) {
                // Hand the line end back to the statement that holds the
                // literal, unless the literal sits inside a bracketed list
                Ok(_) if !self.cursor.peek().kind.is_in_block() => self.cursor.backup(1),
                Ok(_) => {}
                Err(token) => {
                    let message =
                        format!("Invalid token in function definition: {}", describe(&token));
                    body.push(self.report(token.pos, message).into_stmt());
                }
            }
        }

        Ok(FunctionDef { pos, params, body })
    }

    /// `{}`, `{name: value, ...}`, or an indented block of set lines.
    fn parse_object(&mut self) -> ParseResult<Expr> {
        let pos = self.cursor.next().pos;
        let mut lines = Vec::new();

        if self.cursor.accept(&[TokenKind::Eol, TokenKind::Indent]).is_ok() {
            while !self.cursor.peek().kind.is_dedent_stop() {
                let line_pos = self.cursor.peek().pos.clone();
                let names = self.parse_keys()?;
                if let Err(token) = self.cursor.accept(&[TokenKind::Assign]) {
                    return self.invalid_token("object literal", &token);
                }
                let values = self.parse_expr_list()?;
                self.expect_eol("object literal")?;
                lines.push(SetLine {
                    pos: line_pos,
                    names,
                    values,
                });
            }
            if let Err(token) = self.cursor.accept(&[TokenKind::Dedent, TokenKind::Eol]) {
                return self.invalid_token("object literal", &token);
            }
        } else if !self.cursor.is_next(TokenKind::RightCurly) {
            loop {
                let line_pos = self.cursor.peek().pos.clone();
                let key = self.cursor.next();
                if !matches!(key.kind, TokenKind::Literal | TokenKind::String) {
                    self.cursor.backup(1);
                    return self.invalid_token("object literal", &key);
                }
                if let Err(token) = self.cursor.accept(&[TokenKind::Assign]) {
                    return self.invalid_token("object literal", &token);
                }
                let value = self.parse_expr()?;
                lines.push(SetLine {
                    pos: line_pos,
                    names: vec![key.value],
                    values: vec![value],
                });
                if self.cursor.accept_one(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        if let Err(token) = self.cursor.accept(&[TokenKind::RightCurly]) {
            return self.invalid_token("object literal", &token);
        }
        Ok(Expr::Object { pos, lines })
    }

    /// Keys of a set line: names or quoted strings.
    fn parse_keys(&mut self) -> ParseResult<Vec<String>> {
        let mut keys = Vec::new();
        loop {
            let token = self.cursor.next();
            if !matches!(token.kind, TokenKind::Literal | TokenKind::String) {
                self.cursor.backup(1);
                return self.invalid_token("object literal", &token);
            }
            keys.push(token.value);
            if self.cursor.accept_one(TokenKind::Comma).is_none() {
                return Ok(keys);
            }
        }
    }
}
