use rust_decimal::Decimal;

use crate::ast::{AssignOp, BinOp, Catch, Condition, Expr, For, If, Position, Stmt, VarLine};
use crate::codegen::expressions::{expr_to_js, member_to_js, paren_if_binary};
use crate::codegen::{INTERNAL_PREFIX, internal, push_line};
use crate::context::BuildContext;

/// Generates a list of statements at the current indentation.
pub fn stmts_to_js(stmts: &[Stmt], ctx: &mut BuildContext) -> String {
    let mut out = String::new();
    for stmt in stmts {
        stmt_to_js(stmt, ctx, &mut out);
    }
    out
}

/// Generates a nested block: one level deeper, in a fresh scope.
fn block_to_js(stmts: &[Stmt], ctx: &mut BuildContext) -> String {
    ctx.indent += 1;
    ctx.vars.increment_depth();
    let out = stmts_to_js(stmts, ctx);
    ctx.vars.decrement_depth();
    ctx.indent -= 1;
    out
}

fn labelled(label: &Option<String>, text: String) -> String {
    match label {
        Some(label) => format!("{}: {}", label, text),
        None => text,
    }
}

fn jump(keyword: &str, label: &Option<String>) -> String {
    match label {
        Some(label) => format!("{} {};", keyword, label),
        None => format!("{};", keyword),
    }
}

pub(crate) fn stmt_to_js(stmt: &Stmt, ctx: &mut BuildContext, out: &mut String) {
    match stmt {
        Stmt::Assign {
            pos,
            op,
            left,
            right,
        } => assign_to_js(pos, *op, left, right, ctx, out),
        Stmt::Var { lines, .. } => {
            for line in lines {
                var_line_to_js(line, ctx, out);
            }
        }
        Stmt::If(stmt) => if_to_js(stmt, ctx, out),
        Stmt::For(stmt) => for_to_js(stmt, ctx, out),

        Stmt::While {
            label,
            condition,
            body,
            ..
        } => {
            let condition = expr_to_js(condition, ctx);
            let header = labelled(label, format!("while ({}) {{", condition));
            push_line(out, ctx, &header);
            out.push_str(&block_to_js(body, ctx));
            push_line(out, ctx, "}");
        }
        Stmt::Loop { label, body, .. } => {
            push_line(out, ctx, &labelled(label, "while (true) {".to_string()));
            out.push_str(&block_to_js(body, ctx));
            push_line(out, ctx, "}");
        }
        Stmt::Try {
            body,
            catch,
            finally,
            ..
        } => try_to_js(body, catch.as_ref(), finally.as_deref(), ctx, out),

        Stmt::Throw { value, .. } => {
            let value = expr_to_js(value, ctx);
            push_line(out, ctx, &format!("throw {};", value));
        }
        Stmt::Break { label, .. } => push_line(out, ctx, &jump("break", label)),
        Stmt::Continue { label, .. } => push_line(out, ctx, &jump("continue", label)),
        Stmt::Return { value, .. } => {
            let line = match value {
                Some(value) => format!("return {};", expr_to_js(value, ctx)),
                None => "return;".to_string(),
            };
            push_line(out, ctx, &line);
        }

        Stmt::Expr { pos, exprs, chain } => expr_stmt_to_js(pos, exprs, chain, ctx, out),

        Stmt::Use(stmt) => ctx.error(&stmt.pos, "Use statements are only allowed at file level."),
        Stmt::Class(decl) => ctx.error(&decl.pos, "Cannot directly generate JS for a class."),
        Stmt::JsBlock { code, .. } => push_line(out, ctx, code),
        Stmt::Error { message, .. } => push_line(out, ctx, &format!("// Error: {}", message)),
    }
}

/// Target of an assignment, prefixed by the chain receiver when inside a
/// chain block.
fn target_to_js(target: &Expr, ctx: &mut BuildContext) -> String {
    let assignable = matches!(
        target,
        Expr::Identifier { .. }
            | Expr::Accessor { .. }
            | Expr::Error { .. }
            | Expr::Binary {
                op: BinOp::Member,
                ..
            }
    );
    if !assignable {
        ctx.error(target.pos(), "Invalid assignment target");
    }
    match ctx.chain.clone() {
        Some(chain) => format!("{}.{}", chain, member_to_js(target, ctx)),
        None => expr_to_js(target, ctx),
    }
}

fn assign_to_js(
    pos: &Position,
    op: AssignOp,
    left: &[Expr],
    right: &[Expr],
    ctx: &mut BuildContext,
    out: &mut String,
) {
    let (targets, values) = (left.len(), right.len());

    if op == AssignOp::Unpack {
        if values != 1 {
            let message = format!("Unpack needs exactly one value, found {}", values);
            ctx.error(pos, message);
            return;
        }
        let temp = internal("t", ctx.temp);
        ctx.temp += 1;
        let value = expr_to_js(&right[0], ctx);
        push_line(out, ctx, &format!("var {} = {};", temp, value));
        for (i, target) in left.iter().enumerate() {
            let target = target_to_js(target, ctx);
            push_line(out, ctx, &format!("{} = {}[{}];", target, temp, i));
        }
        ctx.temp -= 1;
        return;
    }

    if targets == 1 && values == 1 {
        let target = target_to_js(&left[0], ctx);
        let value = expr_to_js(&right[0], ctx);
        push_line(out, ctx, &format!("{}{}{};", target, op.js(), value));
    } else if values == 1 {
        let temp = internal("t", ctx.temp);
        ctx.temp += 1;
        let value = expr_to_js(&right[0], ctx);
        push_line(out, ctx, &format!("var {} = {};", temp, value));
        for target in left {
            let target = target_to_js(target, ctx);
            push_line(out, ctx, &format!("{}{}{};", target, op.js(), temp));
        }
        ctx.temp -= 1;
    } else if targets == values {
        // All values are computed before any target changes, so swaps work
        let base = ctx.temp;
        ctx.temp += targets;
        let mut resolved = Vec::with_capacity(targets);
        for (i, (target, value)) in left.iter().zip(right).enumerate() {
            let target = target_to_js(target, ctx);
            let js = expr_to_js(value, ctx);
            let js = match op {
                AssignOp::Compound(bin) => {
                    format!("{}{}{}", target, bin.js(), paren_if_binary(value, js))
                }
                AssignOp::Assign | AssignOp::Unpack => js,
            };
            let temp = internal("t", base + i);
            push_line(out, ctx, &format!("var {} = {};", temp, js));
            resolved.push((target, temp));
        }
        for (target, temp) in resolved {
            push_line(out, ctx, &format!("{} = {};", target, temp));
        }
        ctx.temp -= targets;
    } else {
        let message = format!("Mismatched expression count, {} != {}", targets, values);
        ctx.error(pos, message);
    }
}

fn var_line_to_js(line: &VarLine, ctx: &mut BuildContext, out: &mut String) {
    for name in &line.names {
        ctx.declare_local(name, &line.pos);
    }

    let (names, values) = (line.names.len(), line.values.len());
    if names == values {
        let mut decls = Vec::with_capacity(names);
        for (name, value) in line.names.iter().zip(&line.values) {
            decls.push(format!("{} = {}", name, expr_to_js(value, ctx)));
        }
        push_line(out, ctx, &format!("var {};", decls.join(", ")));
    } else if values == 1 {
        let temp = internal("t", ctx.temp);
        ctx.temp += 1;
        let value = expr_to_js(&line.values[0], ctx);
        push_line(out, ctx, &format!("var {} = {};", temp, value));
        let decls: Vec<String> = line
            .names
            .iter()
            .map(|name| format!("{} = {}", name, temp))
            .collect();
        push_line(out, ctx, &format!("var {};", decls.join(", ")));
        ctx.temp -= 1;
    } else {
        let message = format!(
            "Mismatched vars and values in var statement, {} != {}",
            names, values
        );
        ctx.error(&line.pos, message);
    }
}

fn if_to_js(stmt: &If, ctx: &mut BuildContext, out: &mut String) {
    let subject = match &stmt.subject {
        Some(subject) => {
            let name = internal("c", ctx.cond);
            let value = expr_to_js(subject, ctx);
            push_line(out, ctx, &format!("var {} = {};", name, value));
            ctx.cond += 1;
            Some(name)
        }
        None => None,
    };

    let last = stmt.sections.len().saturating_sub(1);
    for (i, section) in stmt.sections.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "} else if" };
        let header = match &section.condition {
            Condition::Else => {
                if i == 0 || i != last {
                    let message = "An else section must come last, after another section.";
                    ctx.error(&section.pos, message);
                }
                if i == 0 {
                    "if (true) {".to_string()
                } else {
                    "} else {".to_string()
                }
            }
            Condition::Expr(condition) => {
                format!("{} ({}) {{", keyword, expr_to_js(condition, ctx))
            }
            Condition::Compare { op, values } => {
                let subject = subject.clone().unwrap_or_default();
                let tests: Vec<String> = values
                    .iter()
                    .map(|value| {
                        let value = expr_to_js(value, ctx);
                        format!("{}{}{}", subject, op.js(), value)
                    })
                    .collect();
                format!("{} ({}) {{", keyword, tests.join(" || "))
            }
        };
        push_line(out, ctx, &header);
        out.push_str(&block_to_js(&section.body, ctx));
    }
    if !stmt.sections.is_empty() {
        push_line(out, ctx, "}");
    }

    if subject.is_some() {
        ctx.cond -= 1;
    }
}

/// Direction of a range loop. Descending when the step is negative, when
/// the bounds are reversed, or when counting down to zero.
fn is_ascending(from: &Expr, to: Option<&Expr>, by: Option<&Expr>) -> bool {
    let by = by.and_then(Expr::static_number);
    if by.is_some_and(|by| by < Decimal::ZERO) {
        return false;
    }
    let Some(to) = to.and_then(Expr::static_number) else {
        return true;
    };
    if to == Decimal::ZERO {
        return false;
    }
    match from.static_number() {
        Some(from) => from <= to,
        None => true,
    }
}

fn for_to_js(stmt: &For, ctx: &mut BuildContext, out: &mut String) {
    ctx.vars.increment_depth();
    ctx.declare_local(&stmt.var, &stmt.pos);

    let asc = is_ascending(&stmt.from, stmt.to.as_ref(), stmt.by.as_ref());
    let from = expr_to_js(&stmt.from, ctx);
    let by = stmt.by.as_ref().map(|by| expr_to_js(by, ctx));
    let var = &stmt.var;

    let step = |index: &str| match &by {
        Some(by) => format!("{} += {}", index, by),
        None if asc => format!("{}++", index),
        None => format!("{}--", index),
    };

    let mut element = None;
    let header = match &stmt.to {
        Some(to) => {
            let to = expr_to_js(to, ctx);
            if asc {
                format!("for (var {v} = {}; {v} < {}; {})", from, to, step(var), v = var)
            } else {
                format!(
                    "for (var {v} = ({}) - 1; {v} >= {}; {})",
                    from,
                    to,
                    step(var),
                    v = var
                )
            }
        }
        None => {
            let index = internal("i", ctx.for_index);
            let length = internal("l", ctx.for_index);
            ctx.for_index += 1;
            element = Some(format!("var {} = {}[{}];", var, from, index));
            if asc {
                format!(
                    "for (var {i} = 0, {l} = {}.length; {i} < {l}; {})",
                    from,
                    step(&index),
                    i = index,
                    l = length
                )
            } else {
                format!(
                    "for (var {l} = {}.length, {i} = {l} - 1; {i} >= 0; {})",
                    from,
                    step(&index),
                    i = index,
                    l = length
                )
            }
        }
    };

    push_line(out, ctx, &labelled(&stmt.label, format!("{} {{", header)));
    // The body shares the scope of the loop variable
    ctx.indent += 1;
    if let Some(element) = &element {
        push_line(out, ctx, element);
    }
    out.push_str(&stmts_to_js(&stmt.body, ctx));
    ctx.indent -= 1;
    push_line(out, ctx, "}");

    if element.is_some() {
        ctx.for_index -= 1;
    }
    ctx.vars.decrement_depth();
}

fn try_to_js(
    body: &[Stmt],
    catch: Option<&Catch>,
    finally: Option<&[Stmt]>,
    ctx: &mut BuildContext,
    out: &mut String,
) {
    push_line(out, ctx, "try {");
    out.push_str(&block_to_js(body, ctx));

    if let Some(catch) = catch {
        let name = catch
            .name
            .clone()
            .unwrap_or_else(|| format!("{}e", INTERNAL_PREFIX));
        push_line(out, ctx, &format!("}} catch ({}) {{", name));
        ctx.vars.increment_depth();
        ctx.declare_local(&name, &catch.pos);
        out.push_str(&block_to_js(&catch.body, ctx));
        ctx.vars.decrement_depth();
    }
    if let Some(finally) = finally {
        push_line(out, ctx, "} finally {");
        out.push_str(&block_to_js(finally, ctx));
    }
    push_line(out, ctx, "}");
}

fn expr_stmt_to_js(
    pos: &Position,
    exprs: &[Expr],
    chain: &[Stmt],
    ctx: &mut BuildContext,
    out: &mut String,
) {
    if chain.is_empty() {
        for expr in exprs {
            if !expr.is_valid_stmt() {
                ctx.error(expr.pos(), "Expression is not a valid statement");
            }
            let js = match ctx.chain.clone() {
                Some(receiver) => format!("{}.{}", receiver, member_to_js(expr, ctx)),
                None => expr_to_js(expr, ctx),
            };
            push_line(out, ctx, &format!("{};", js));
        }
        return;
    }

    if exprs.is_empty() {
        ctx.error(pos, "A chain block needs a receiver.");
    }
    for expr in exprs {
        let receiver = match ctx.chain.clone() {
            Some(outer) => format!("{}.{}", outer, member_to_js(expr, ctx)),
            None => expr_to_js(expr, ctx),
        };
        let outer = ctx.chain.replace(receiver);
        ctx.vars.increment_depth();
        out.push_str(&stmts_to_js(chain, ctx));
        ctx.vars.decrement_depth();
        ctx.chain = outer;
    }
}
