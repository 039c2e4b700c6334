//! Debug dump of a syntax tree.
//!
//! One node per line, children indented with `|   ` guides:
//!
//! ```text
//! test.mn
//! |   class Point
//! |   |   prop set: .x, .y
//! |   |   |   num 0
//! ```

use crate::ast::{ClassStmt, Condition, Expr, File, FunctionDef, Property, Stmt, VarLine};

pub struct AstPrinter {
    buf: String,
}

impl AstPrinter {
    pub fn new() -> Self {
        AstPrinter { buf: String::new() }
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn line(&mut self, indent: usize, text: &str) {
        self.buf.push_str(&"|   ".repeat(indent));
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn file(&mut self, file: &File, indent: usize) {
        self.line(indent, &file.name);
        for stmt in &file.statements {
            self.stmt(stmt, indent + 1);
        }
    }

    fn block(&mut self, body: &[Stmt], indent: usize) {
        for stmt in body {
            self.stmt(stmt, indent);
        }
    }

    pub fn stmt(&mut self, stmt: &Stmt, indent: usize) {
        match stmt {
            Stmt::Assign {
                op, left, right, ..
            } => {
                self.line(indent, &format!("assign{}", op.js().trim_end()));
                self.exprs("targets", left, indent + 1);
                self.exprs("values", right, indent + 1);
            }
            Stmt::Var { lines, .. } => {
                self.line(indent, "var set");
                for line in lines {
                    self.var_line(line, indent + 1);
                }
            }
            Stmt::If(stmt) => {
                self.line(indent, "if");
                if let Some(subject) = &stmt.subject {
                    self.expr(subject, indent + 1);
                }
                for section in &stmt.sections {
                    match &section.condition {
                        Condition::Expr(cond) => {
                            self.line(indent + 1, "is");
                            self.expr(cond, indent + 2);
                        }
                        Condition::Compare { op, values } => {
                            self.line(indent + 1, &format!("is{}", op.js().trim_end()));
                            for value in values {
                                self.expr(value, indent + 2);
                            }
                        }
                        Condition::Else => self.line(indent + 1, "else"),
                    }
                    self.line(indent + 1, "then");
                    self.block(&section.body, indent + 2);
                }
            }
            Stmt::For(stmt) => {
                let label = labelled(&stmt.label);
                self.line(indent, &format!("{}for {} in", label, stmt.var));
                self.expr(&stmt.from, indent + 2);
                if let Some(to) = &stmt.to {
                    self.line(indent + 1, "to");
                    self.expr(to, indent + 2);
                }
                if let Some(by) = &stmt.by {
                    self.line(indent + 1, "by");
                    self.expr(by, indent + 2);
                }
                self.block(&stmt.body, indent + 1);
            }
            Stmt::While {
                label,
                condition,
                body,
                ..
            } => {
                self.line(indent, &format!("{}while", labelled(label)));
                self.expr(condition, indent + 2);
                self.block(body, indent + 1);
            }
            Stmt::Loop { label, body, .. } => {
                self.line(indent, &format!("{}loop", labelled(label)));
                self.block(body, indent + 1);
            }
            Stmt::Try {
                body,
                catch,
                finally,
                ..
            } => {
                self.line(indent, "try");
                self.block(body, indent + 1);
                if let Some(catch) = catch {
                    match &catch.name {
                        Some(name) => self.line(indent, &format!("catch {}", name)),
                        None => self.line(indent, "catch"),
                    }
                    self.block(&catch.body, indent + 1);
                }
                if let Some(finally) = finally {
                    self.line(indent, "finally");
                    self.block(finally, indent + 1);
                }
            }
            Stmt::Throw { value, .. } => {
                self.line(indent, "throw");
                self.expr(value, indent + 1);
            }
            Stmt::Break { label, .. } => self.line(indent, &jump("break", label)),
            Stmt::Continue { label, .. } => self.line(indent, &jump("continue", label)),
            Stmt::Return { value, .. } => {
                self.line(indent, "return");
                if let Some(value) = value {
                    self.expr(value, indent + 1);
                }
            }
            Stmt::Expr { exprs, chain, .. } => {
                self.line(indent, "expression statement");
                for expr in exprs {
                    self.expr(expr, indent + 1);
                }
                if !chain.is_empty() {
                    self.line(indent + 1, "chain");
                    self.block(chain, indent + 2);
                }
            }
            Stmt::Use(stmt) => {
                for item in &stmt.items {
                    self.line(indent, &format!("use {} for {}", item.alias, item.path.join(".")));
                }
            }
            Stmt::Class(decl) => {
                let names: Vec<String> = decl.names.iter().map(|n| n.join(".")).collect();
                self.line(indent, &format!("class {}", names.join(", ")));
                for stmt in &decl.body {
                    self.class_stmt(stmt, indent + 1);
                }
            }
            Stmt::JsBlock { code, .. } => self.line(indent, &format!("JS: {}", code)),
            Stmt::Error { message, .. } => self.line(indent, &format!("ERROR: {}", message)),
        }
    }

    fn class_stmt(&mut self, stmt: &ClassStmt, indent: usize) {
        match stmt {
            ClassStmt::PropertySet { props, values, .. } => {
                let names: Vec<String> = props.iter().map(property_name).collect();
                self.line(indent, &format!("prop set: {}", names.join(", ")));
                if let Some(values) = values {
                    for value in values {
                        self.expr(value, indent + 1);
                    }
                }
            }
            ClassStmt::Accessors {
                prop,
                getter,
                setter,
                ..
            } => {
                self.line(indent, &format!("property {}", property_name(prop)));
                if let Some(getter) = getter {
                    self.line(indent + 1, "get");
                    self.block(&getter.body, indent + 2);
                }
                if let Some(setter) = setter {
                    self.line(indent + 1, &format!("set {}", setter.params.join(", ")));
                    self.block(&setter.body, indent + 2);
                }
            }
            ClassStmt::Method { prop, function, .. } => {
                self.line(indent, &format!("method {}", property_name(prop)));
                self.function(function, indent + 1);
            }
            ClassStmt::JsBlock { code, .. } => self.line(indent, &format!("JS: {}", code)),
            ClassStmt::Error { message, .. } => self.line(indent, &format!("ERROR: {}", message)),
        }
    }

    fn var_line(&mut self, line: &VarLine, indent: usize) {
        self.line(indent, &line.names.join(", "));
        for value in &line.values {
            self.expr(value, indent + 1);
        }
    }

    fn exprs(&mut self, title: &str, exprs: &[Expr], indent: usize) {
        self.line(indent, title);
        for expr in exprs {
            self.expr(expr, indent + 1);
        }
    }

    fn function(&mut self, def: &FunctionDef, indent: usize) {
        self.line(indent, &format!("fn({})", def.params.join(", ")));
        self.block(&def.body, indent + 1);
    }

    pub fn expr(&mut self, expr: &Expr, indent: usize) {
        match expr {
            Expr::Identifier { path, .. } => self.line(indent, &path.join(".")),
            Expr::Number { value, .. } => self.line(indent, &format!("num {}", value)),
            Expr::String { value, .. } => self.line(indent, &format!("string {}", value)),
            Expr::Regex { value, .. } => self.line(indent, &format!("regex {}", value)),
            Expr::Bool { value, .. } => self.line(indent, &format!("bool {}", value)),
            Expr::LitExpr { value, .. } => self.line(indent, value),
            Expr::Binary {
                op, left, right, ..
            } => {
                self.line(indent, &format!("{:?}", op));
                self.expr(left, indent + 1);
                self.expr(right, indent + 1);
            }
            Expr::Unary { op, expr, .. } => {
                self.line(indent, &format!("{:?}", op));
                self.expr(expr, indent + 1);
            }
            Expr::PostOp { op, expr, .. } => {
                self.line(indent, &format!("post {:?}", op));
                self.expr(expr, indent + 1);
            }
            Expr::Call { function, args, .. } => {
                self.line(indent, "func");
                self.expr(function, indent + 2);
                self.exprs("params", args, indent + 1);
            }
            Expr::Constructor { ty, args, .. } => {
                self.line(indent, "cons");
                self.expr(ty, indent + 2);
                self.exprs("params", args, indent + 1);
            }
            Expr::Accessor { object, index, .. } => {
                self.line(indent, "accessor");
                self.expr(object, indent + 2);
                self.line(indent + 1, "index");
                self.expr(index, indent + 2);
            }
            Expr::Array { items, .. } => self.exprs("array value list", items, indent),
            Expr::Object { lines, .. } => {
                self.line(indent, "object");
                for line in lines {
                    self.line(indent + 1, &line.names.join(", "));
                    for value in &line.values {
                        self.expr(value, indent + 2);
                    }
                }
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
                ..
            } => {
                self.line(indent, "conditional");
                self.expr(condition, indent + 1);
                self.line(indent + 1, "then");
                self.expr(then, indent + 2);
                self.line(indent + 1, "else");
                self.expr(otherwise, indent + 2);
            }
            Expr::Function(def) => self.function(def, indent),
            Expr::Error { message, .. } => self.line(indent, &format!("ERROR: {}", message)),
        }
    }
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self::new()
    }
}

fn labelled(label: &Option<String>) -> String {
    label.as_ref().map(|l| format!("{}: ", l)).unwrap_or_default()
}

fn jump(keyword: &str, label: &Option<String>) -> String {
    match label {
        Some(label) => format!("{} {}", keyword, label),
        None => keyword.to_string(),
    }
}

fn property_name(prop: &Property) -> String {
    if prop.is_static {
        format!("static {}", prop.name)
    } else {
        format!(".{}", prop.name)
    }
}

/// Dumps a whole file, starting at the given indent.
pub fn print_file(file: &File, indent: usize) -> String {
    let mut printer = AstPrinter::new();
    printer.file(file, indent);
    printer.finish()
}
