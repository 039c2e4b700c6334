//! Class declarations and class-body statements.

use crate::ast::tokens::{KEYWORD_GET, KEYWORD_SET};
use crate::ast::{ClassDecl, ClassStmt, FunctionDef, Property, Stmt, TokenKind};
use crate::parser::{ParseResult, Parser, Recovered};

impl Parser {
    /// `A.B, A.C` followed by an indented body.
    pub(crate) fn parse_class(&mut self) -> ParseResult<Stmt> {
        let pos = self.cursor.peek().pos.clone();
        let mut names = Vec::new();
        loop {
            names.push(self.parse_path("class name")?);
            if self.cursor.accept_one(TokenKind::Comma).is_none() {
                break;
            }
        }

        let display: Vec<String> = names.iter().map(|n| n.join(".")).collect();
        let context = format!("class {} declaration", display.join(", "));
        if let Err(token) = self.cursor.accept(&[TokenKind::Eol, TokenKind::Indent]) {
            return self.invalid_token(&context, &token);
        }

        let mut body = Vec::new();
        while !self.cursor.peek().kind.is_dedent_stop() {
            body.push(self.parse_class_stmt());
        }
        if let Err(token) = self.cursor.accept(&[TokenKind::Dedent, TokenKind::Eol]) {
            let error: ParseResult<()> = self.invalid_token(&context, &token);
            body.extend(error.err().map(Recovered::into_class_stmt));
        }

        Ok(Stmt::Class(ClassDecl { pos, names, body }))
    }

    fn parse_class_stmt(&mut self) -> ClassStmt {
        self.parse_class_stmt_inner()
            .unwrap_or_else(Recovered::into_class_stmt)
    }

    fn parse_class_stmt_inner(&mut self) -> ParseResult<ClassStmt> {
        let pos = self.cursor.peek().pos.clone();
        if self.cursor.is_next(TokenKind::JsBlock) {
            return match self.cursor.accept(&[TokenKind::JsBlock, TokenKind::Eol]) {
                Ok(tokens) => Ok(ClassStmt::JsBlock {
                    pos,
                    code: tokens[0].value.clone(),
                }),
                Err(token) => self.invalid_token("Javascript block", &token),
            };
        }

        let mut props = Vec::new();
        loop {
            let prop_pos = self.cursor.peek().pos.clone();
            let dotted = self.cursor.accept_one(TokenKind::Dot).is_some();
            match self.cursor.accept(&[TokenKind::Literal]) {
                Ok(tokens) => props.push(Property {
                    pos: prop_pos,
                    name: tokens[0].value.clone(),
                    is_static: !dotted,
                }),
                Err(token) => return self.invalid_token("class statement", &token),
            }
            if self.cursor.accept_one(TokenKind::Comma).is_none() {
                break;
            }
        }

        if props.len() == 1 {
            if self.cursor.is_next(TokenKind::LeftParen) {
                let prop = props.remove(0);
                let params = self.parse_params("method")?;
                let body = self.parse_body("method")?;
                return Ok(ClassStmt::Method {
                    pos: pos.clone(),
                    prop,
                    function: FunctionDef { pos, params, body },
                });
            }
            if self.cursor.accept(&[TokenKind::Eol, TokenKind::Indent]).is_ok() {
                return self.parse_accessors(props.remove(0));
            }
        }

        let values = if self.cursor.accept_one(TokenKind::Assign).is_some() {
            Some(self.parse_expr_list()?)
        } else {
            None
        };
        self.expect_eol("class statement")?;

        Ok(ClassStmt::PropertySet { pos, props, values })
    }

    /// The `get` and `set v` blocks under a property name. The opening
    /// `EOL INDENT` has been consumed.
    fn parse_accessors(&mut self, prop: Property) -> ParseResult<ClassStmt> {
        let mut getter = None;
        let mut setter = None;

        while !self.cursor.peek().kind.is_dedent_stop() {
            let token = self.cursor.peek().clone();
            if token.is_literal(KEYWORD_GET) {
                self.cursor.next();
                let Ok(body) = self.parse_body("get") else { continue };
                if getter.is_some() {
                    let message = format!("Property {} has more than one get block.", prop.name);
                    self.report(token.pos.clone(), message);
                }
                getter = Some(FunctionDef {
                    pos: token.pos,
                    params: Vec::new(),
                    body,
                });
            } else if token.is_literal(KEYWORD_SET) {
                self.cursor.next();
                let param = match self.cursor.accept(&[TokenKind::Literal]) {
                    Ok(tokens) => tokens[0].value.clone(),
                    Err(token) => {
                        let _: ParseResult<()> = self.invalid_token("set", &token);
                        continue;
                    }
                };
                let Ok(body) = self.parse_body("set") else { continue };
                if setter.is_some() {
                    let message = format!("Property {} has more than one set block.", prop.name);
                    self.report(token.pos.clone(), message);
                }
                setter = Some(FunctionDef {
                    pos: token.pos,
                    params: vec![param],
                    body,
                });
            } else {
                let _: ParseResult<()> = self.invalid_token("property accessor", &token);
            }
        }

        if let Err(token) = self.cursor.accept(&[TokenKind::Dedent, TokenKind::Eol]) {
            return self.invalid_token("property accessor", &token);
        }
        if getter.is_none() && setter.is_none() {
            let message = format!("Property {} has no get or set block.", prop.name);
            return Err(self.report(prop.pos.clone(), message));
        }

        Ok(ClassStmt::Accessors {
            pos: prop.pos.clone(),
            prop,
            getter,
            setter,
        })
    }
}
