//! Statement parsing: var, if, for, while, loop, try, jumps and expression
//! statements, plus the file-level `use` and JS blocks.

use crate::ast::tokens::{KEYWORD_BY, KEYWORD_TO};
use crate::ast::{
    AssignOp, BinOp, Catch, Condition, For, If, IfSection, Stmt, TokenKind, Use, UseItem, VarLine,
};
use crate::parser::{ParseResult, Parser, Recovered, describe};

impl Parser {
    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        self.parse_stmt_inner().unwrap_or_else(Recovered::into_stmt)
    }

    fn parse_stmt_inner(&mut self) -> ParseResult<Stmt> {
        match self.cursor.peek().kind {
            TokenKind::Break => self.parse_jump(TokenKind::Break),
            TokenKind::Continue => self.parse_jump(TokenKind::Continue),
            TokenKind::For | TokenKind::Loop | TokenKind::While => self.parse_loop(None),
            TokenKind::If => self.parse_if(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Var => self.parse_var(),
            TokenKind::JsBlock => self.parse_js_block(),
            TokenKind::Literal
                if matches!(
                    self.cursor.peek_second().kind,
                    TokenKind::For | TokenKind::Loop | TokenKind::While
                ) =>
            {
                let label = self.cursor.next().value;
                self.parse_loop(Some(label))
            }
            _ => self.parse_expr_stmt(),
        }
    }

    pub(crate) fn parse_js_block(&mut self) -> ParseResult<Stmt> {
        match self.cursor.accept(&[TokenKind::JsBlock, TokenKind::Eol]) {
            Ok(tokens) => Ok(Stmt::JsBlock {
                pos: tokens[0].pos.clone(),
                code: tokens[0].value.clone(),
            }),
            Err(token) => self.invalid_token("Javascript block", &token),
        }
    }

    /// `use a.b.C, d.E` or `use X for a.b.C`
    pub(crate) fn parse_use(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let mut items = Vec::new();

        if self.cursor.is_next(TokenKind::Literal) && self.cursor.peek_second().kind == TokenKind::For
        {
            let alias = self.cursor.next();
            self.cursor.next();
            let path = self.parse_path("use")?;
            items.push(UseItem {
                pos: alias.pos,
                alias: alias.value,
                path,
            });
        } else {
            loop {
                let item_pos = self.cursor.peek().pos.clone();
                let path = self.parse_path("use")?;
                let alias = path.last().cloned().unwrap_or_default();
                items.push(UseItem {
                    pos: item_pos,
                    alias,
                    path,
                });
                if self.cursor.accept_one(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect_eol("use")?;
        Ok(Stmt::Use(Use { pos, items }))
    }

    fn parse_jump(&mut self, kind: TokenKind) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let label = self.cursor.accept_one(TokenKind::Literal).map(|t| t.value);
        if kind == TokenKind::Break {
            self.expect_eol("break")?;
            Ok(Stmt::Break { pos, label })
        } else {
            self.expect_eol("continue")?;
            Ok(Stmt::Continue { pos, label })
        }
    }

    fn parse_loop(&mut self, label: Option<String>) -> ParseResult<Stmt> {
        let token = self.cursor.peek().clone();
        match token.kind {
            TokenKind::For => self.parse_for(label),
            TokenKind::While => {
                self.cursor.next();
                let condition = self.parse_expr()?;
                let body = self.parse_body("while")?;
                Ok(Stmt::While {
                    pos: token.pos,
                    label,
                    condition,
                    body,
                })
            }
            TokenKind::Loop => {
                self.cursor.next();
                let body = self.parse_body("loop")?;
                Ok(Stmt::Loop {
                    pos: token.pos,
                    label,
                    body,
                })
            }
            _ => self.invalid_token("for or loop", &token),
        }
    }

    /// `for v in from [to to] [by step]`
    fn parse_for(&mut self, label: Option<String>) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let var = match self.cursor.accept(&[TokenKind::Literal, TokenKind::In]) {
            Ok(tokens) => tokens[0].value.clone(),
            Err(token) => return self.invalid_token("for", &token),
        };

        let from = self.parse_expr()?;
        let mut to = None;
        let mut by = None;
        if self.cursor.peek().is_literal(KEYWORD_TO) {
            self.cursor.next();
            to = Some(self.parse_expr()?);
        }
        if self.cursor.peek().is_literal(KEYWORD_BY) {
            self.cursor.next();
            by = Some(self.parse_expr()?);
        }

        let body = self.parse_body("for")?;
        Ok(Stmt::For(For {
            pos,
            label,
            var,
            from,
            to,
            by,
            body,
        }))
    }

    /// Plain if/else chains, if-sugar, and bare `if` blocks of `is` sections.
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let subject = if self.cursor.is_next(TokenKind::Eol) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if let Err(token) = self.cursor.accept(&[TokenKind::Eol, TokenKind::Indent]) {
            return self.invalid_token("if", &token);
        }

        match subject {
            Some(subject) if self.cursor.peek().kind.is_comparison() => {
                let sections = self.parse_sections("if", |p| {
                    let token = p.cursor.next();
                    let op = match BinOp::from_token(token.kind) {
                        Some(op) if token.kind.is_comparison() => op,
                        _ => {
                            p.cursor.backup(1);
                            return p.invalid_token("if", &token);
                        }
                    };
                    let values = p.parse_expr_list()?;
                    Ok(Condition::Compare { op, values })
                })?;
                Ok(Stmt::If(If {
                    pos,
                    subject: Some(subject),
                    sections,
                }))
            }
            Some(condition) => {
                let body = self.parse_block_rest("if");
                let mut sections = vec![IfSection {
                    pos: pos.clone(),
                    condition: Condition::Expr(condition),
                    body,
                }];
                self.parse_else_chain(&mut sections)?;
                Ok(Stmt::If(If {
                    pos,
                    subject: None,
                    sections,
                }))
            }
            None => {
                let sections = self.parse_sections("is", |p| {
                    let token = p.cursor.next();
                    if token.kind != TokenKind::Is {
                        p.cursor.backup(1);
                        return p.invalid_token("if", &token);
                    }
                    Ok(Condition::Expr(p.parse_expr()?))
                })?;
                Ok(Stmt::If(If {
                    pos,
                    subject: None,
                    sections,
                }))
            }
        }
    }

    /// Sections of an if block up to its `DEDENT EOL`. Each section is a
    /// condition read by `condition`, or `else`, followed by a body.
    fn parse_sections(
        &mut self,
        context: &str,
        condition: impl Fn(&mut Parser) -> ParseResult<Condition>,
    ) -> ParseResult<Vec<IfSection>> {
        let mut sections = Vec::new();
        while !self.cursor.peek().kind.is_dedent_stop() {
            let pos = self.cursor.peek().pos.clone();
            let parsed = if self.cursor.accept_one(TokenKind::Else).is_some() {
                Ok(Condition::Else)
            } else {
                condition(self)
            };
            // A broken section header has already skipped its body
            let Ok(condition) = parsed else { continue };
            match self.parse_body(context) {
                Ok(body) => sections.push(IfSection {
                    pos,
                    condition,
                    body,
                }),
                Err(_) => continue,
            }
        }
        if let Err(token) = self.cursor.accept(&[TokenKind::Dedent, TokenKind::Eol]) {
            return self.invalid_token(context, &token);
        }
        Ok(sections)
    }

    /// `else if cond` and `else` blocks after a plain if.
    fn parse_else_chain(&mut self, sections: &mut Vec<IfSection>) -> ParseResult<()> {
        while let Some(token) = self.cursor.accept_one(TokenKind::Else) {
            if self.cursor.accept_one(TokenKind::If).is_some() {
                let condition = self.parse_expr()?;
                let body = self.parse_body("else if")?;
                sections.push(IfSection {
                    pos: token.pos,
                    condition: Condition::Expr(condition),
                    body,
                });
            } else {
                let body = self.parse_body("else")?;
                sections.push(IfSection {
                    pos: token.pos,
                    condition: Condition::Else,
                    body,
                });
                break;
            }
        }
        Ok(())
    }

    fn parse_try(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let body = self.parse_body("try")?;

        let mut catch = None;
        if let Some(token) = self.cursor.accept_one(TokenKind::Catch) {
            let name = self.cursor.accept_one(TokenKind::Literal).map(|t| t.value);
            let body = self.parse_body("catch")?;
            catch = Some(Catch {
                pos: token.pos,
                name,
                body,
            });
        }

        let mut finally = None;
        if self.cursor.accept_one(TokenKind::Finally).is_some() {
            finally = Some(self.parse_body("finally")?);
        }

        if catch.is_none() && finally.is_none() {
            return Err(self.report(pos, "A try block needs a catch or finally block."));
        }
        Ok(Stmt::Try {
            pos,
            body,
            catch,
            finally,
        })
    }

    fn parse_throw(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let value = self.parse_expr()?;
        self.expect_eol("throw")?;
        Ok(Stmt::Throw { pos, value })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let value = if self.cursor.is_next(TokenKind::Eol) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_eol("return")?;
        Ok(Stmt::Return { pos, value })
    }

    /// `var a, b : 1, 2`, optionally followed by an indented group of lines.
    fn parse_var(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.next().pos;
        let mut lines = vec![self.parse_var_line()?];

        if self.cursor.accept_one(TokenKind::Indent).is_some() {
            while !self.cursor.peek().kind.is_dedent_stop() {
                lines.push(self.parse_var_line()?);
            }
            if let Err(token) = self.cursor.accept(&[TokenKind::Dedent, TokenKind::Eol]) {
                return self.invalid_token("var statement", &token);
            }
        }

        Ok(Stmt::Var { pos, lines })
    }

    fn parse_var_line(&mut self) -> ParseResult<VarLine> {
        let pos = self.cursor.peek().pos.clone();
        let names = self.parse_names();
        if names.is_empty() {
            return self.fail(pos, "No variables specified after var.");
        }
        if self.cursor.accept_one(TokenKind::Assign).is_none() {
            return self.fail(pos, "Var statement must be an assignment.");
        }
        let values = self.parse_expr_list()?;
        self.expect_eol("var statement")?;
        Ok(VarLine { pos, names, values })
    }

    /// An expression list, optionally assigned to, optionally followed by an
    /// indented chain block.
    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.peek().pos.clone();
        let exprs = self.parse_expr_list()?;

        if let Some(op) = AssignOp::from_token(self.cursor.peek().kind) {
            self.cursor.next();
            let right = self.parse_expr_list()?;
            self.expect_eol("assignment")?;
            return Ok(Stmt::Assign {
                pos,
                op,
                left: exprs,
                right,
            });
        }

        let token = self.cursor.peek().clone();
        if token.kind != TokenKind::Eol {
            let message = format!("Invalid token in expression statement: {}", describe(&token));
            return self.fail(token.pos, message);
        }
        self.cursor.next();

        let chain = if self.cursor.accept_one(TokenKind::Indent).is_some() {
            self.parse_block_rest("chain block")
        } else {
            Vec::new()
        };
        Ok(Stmt::Expr { pos, exprs, chain })
    }
}
