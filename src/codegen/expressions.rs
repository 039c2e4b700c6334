use std::collections::HashSet;

use crate::ast::{BinOp, Expr, FunctionDef, Position, SetLine};
use crate::codegen::{push_line, statements::stmts_to_js};
use crate::context::BuildContext;

/// Resolves a dotted name to the JavaScript path it stands for.
///
/// The head segment is replaced by its binding until it maps to itself or
/// nothing; each name is expanded at most once so alias cycles terminate.
/// `this` inside a nested function becomes `_this`.
pub(crate) fn resolve(path: &[String], pos: &Position, ctx: &mut BuildContext) -> String {
    let mut idents = path.to_vec();
    let mut found = false;
    let mut expanded = HashSet::new();

    while let Some(head) = idents.first().cloned() {
        // Static members have no `this` to hoist
        if head == "this" && ctx.fn_depth > 1 && !ctx.current_fn_static {
            ctx.needs_this = true;
            idents[0] = "_this".to_string();
            found = true;
            continue;
        }

        let binding = ctx.vars.get(&head).map(<[String]>::to_vec).or_else(|| {
            ctx.file_aliases()
                .and_then(|aliases| aliases.get(&head))
                .cloned()
        });
        let Some(binding) = binding else { break };
        found = true;

        let is_self = binding.len() == 1 && binding[0] == head;
        if is_self || !expanded.insert(head) {
            break;
        }
        idents.splice(0..1, binding);
    }

    if !found {
        let name = path.first().map(String::as_str).unwrap_or_default();
        ctx.error(pos, format!("Use of undeclared variable {}", name));
    }
    idents.join(".")
}

pub(crate) fn paren_if_binary(expr: &Expr, js: String) -> String {
    match expr {
        Expr::Binary { op, .. } if *op != BinOp::Member => format!("({})", js),
        _ => js,
    }
}

fn list_to_js(exprs: &[Expr], ctx: &mut BuildContext) -> String {
    exprs
        .iter()
        .map(|e| expr_to_js(e, ctx))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generates one expression.
pub fn expr_to_js(expr: &Expr, ctx: &mut BuildContext) -> String {
    match expr {
        Expr::Identifier { pos, path } => resolve(path, pos, ctx),
        Expr::Number { value, .. }
        | Expr::String { value, .. }
        | Expr::Regex { value, .. }
        | Expr::LitExpr { value, .. } => value.clone(),
        Expr::Bool { value, .. } => value.to_string(),

        Expr::Binary {
            op: BinOp::Member,
            left,
            right,
            ..
        } => {
            let object = expr_to_js(left, ctx);
            format!("{}.{}", paren_if_binary(left, object), member_to_js(right, ctx))
        }
        Expr::Binary {
            op, left, right, ..
        } => {
            let lhs = expr_to_js(left, ctx);
            let rhs = expr_to_js(right, ctx);
            format!(
                "{}{}{}",
                paren_if_binary(left, lhs),
                op.js(),
                paren_if_binary(right, rhs)
            )
        }

        Expr::Unary { op, expr, .. } => {
            let operand = expr_to_js(expr, ctx);
            let operand = match **expr {
                Expr::Unary { .. } => format!("({})", operand),
                _ => paren_if_binary(expr, operand),
            };
            format!("{}{}", op.js(), operand)
        }
        Expr::PostOp { op, expr, .. } => format!("{}{}", expr_to_js(expr, ctx), op.js()),

        Expr::Call { function, args, .. } => {
            let function = expr_to_js(function, ctx);
            format!("{}({})", function, list_to_js(args, ctx))
        }
        Expr::Constructor { pos, ty, args } => {
            let is_type = matches!(
                **ty,
                Expr::Identifier { .. }
                    | Expr::Accessor { .. }
                    | Expr::Binary {
                        op: BinOp::Member,
                        ..
                    }
            );
            if !is_type {
                ctx.error(pos, "Invalid constructor type");
            }
            let ty = expr_to_js(ty, ctx);
            format!("new {}({})", ty, list_to_js(args, ctx))
        }
        Expr::Accessor { object, index, .. } => {
            let object = expr_to_js(object, ctx);
            format!("{}[{}]", object, expr_to_js(index, ctx))
        }

        Expr::Array { items, .. } => format!("[{}]", list_to_js(items, ctx)),
        Expr::Object { lines, .. } => object_to_js(lines, ctx),
        Expr::Conditional {
            condition,
            then,
            otherwise,
            ..
        } => {
            let condition = expr_to_js(condition, ctx);
            let then = expr_to_js(then, ctx);
            let otherwise = expr_to_js(otherwise, ctx);
            format!("({} ? {} : {})", condition, then, otherwise)
        }

        Expr::Function(def) => function_to_js(def, ctx),
        Expr::Error { message, .. } => format!("/* Error: {} */", message),
    }
}

/// Generates the right side of a member access.
///
/// Names after a `.` belong to the object on the left and are written as
/// they are; call arguments and indices are still resolved.
pub(crate) fn member_to_js(expr: &Expr, ctx: &mut BuildContext) -> String {
    match expr {
        Expr::Identifier { path, .. } => path.join("."),
        Expr::Call { function, args, .. } => {
            let function = member_to_js(function, ctx);
            format!("{}({})", function, list_to_js(args, ctx))
        }
        Expr::Accessor { object, index, .. } => {
            let object = member_to_js(object, ctx);
            format!("{}[{}]", object, expr_to_js(index, ctx))
        }
        Expr::PostOp { op, expr, .. } => format!("{}{}", member_to_js(expr, ctx), op.js()),
        Expr::Binary {
            op: BinOp::Member,
            left,
            right,
            ..
        } => {
            let object = member_to_js(left, ctx);
            format!("{}.{}", object, member_to_js(right, ctx))
        }
        other => expr_to_js(other, ctx),
    }
}

fn object_to_js(lines: &[SetLine], ctx: &mut BuildContext) -> String {
    let mut fields = Vec::new();
    for line in lines {
        let (names, values) = (line.names.len(), line.values.len());
        if names == values {
            for (name, value) in line.names.iter().zip(&line.values) {
                let value = expr_to_js(value, ctx);
                fields.push(format!("{}: {}", name, value));
            }
        } else if values == 1 {
            for name in &line.names {
                let value = expr_to_js(&line.values[0], ctx);
                fields.push(format!("{}: {}", name, value));
            }
        } else {
            let message = format!(
                "Mismatched name and value counts in set line, {} != {}",
                names, values
            );
            ctx.error(&line.pos, message);
        }
    }
    format!("{{{}}}", fields.join(", "))
}

/// Generates a function literal.
///
/// The outermost function of a member binds `this` unless it is static,
/// and gets a `var _this = this;` line when a nested function used `this`.
pub(crate) fn function_to_js(def: &FunctionDef, ctx: &mut BuildContext) -> String {
    ctx.fn_depth += 1;
    ctx.vars.increment_depth();
    if ctx.fn_depth == 1 {
        ctx.needs_this = false;
        if !ctx.current_fn_static {
            ctx.declare_local("this", &def.pos);
        }
    }
    for param in &def.params {
        ctx.declare_local(param, &def.pos);
    }

    // A chain receiver does not reach into function bodies
    let chain = ctx.chain.take();
    ctx.indent += 1;
    let body = stmts_to_js(&def.body, ctx);
    let mut out = format!("function ({}) {{\n", def.params.join(", "));
    if ctx.fn_depth == 1 && ctx.needs_this {
        push_line(&mut out, ctx, "var _this = this;");
    }
    out.push_str(&body);
    ctx.indent -= 1;
    ctx.chain = chain;

    out.push_str(&ctx.tabs());
    out.push('}');

    ctx.vars.decrement_depth();
    ctx.fn_depth -= 1;
    out
}
