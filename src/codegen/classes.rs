//! One class, emitted as an immediately invoked function that returns the
//! constructor. Nested classes are attached to their outer class inside
//! that function.

use log::debug;

use crate::ast::{ClassStmt, Expr, FunctionDef, Position, Property};
use crate::codegen::expressions::{expr_to_js, function_to_js};
use crate::codegen::push_line;
use crate::codegen::statements::stmts_to_js;
use crate::context::BuildContext;
use crate::forest::{ClassNode, Sourced};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Static,
    Instance,
}

/// Output regions of a class, concatenated in field order.
#[derive(Debug, Default)]
struct ClassBuffers {
    params: Vec<String>,
    has_constructor: bool,
    this_alias: bool,
    /// Instance member defaults, run before the constructor body
    defaults: String,
    constructor: String,
    nested: String,
    instance: String,
    statics: String,
    js: String,
}

/// Pairs each property with the value it receives. A single value is
/// shared by every property. `None` means the counts do not match.
fn pair_values<'a>(
    props: &'a [Property],
    values: &'a [Expr],
) -> Option<Vec<(&'a Property, &'a Expr)>> {
    if props.len() == values.len() {
        Some(props.iter().zip(values).collect())
    } else if values.len() == 1 {
        Some(props.iter().map(|p| (p, &values[0])).collect())
    } else {
        None
    }
}

pub(crate) fn build_class(
    node: &ClassNode,
    outer: Option<&str>,
    ctx: &mut BuildContext,
    out: &mut String,
) {
    let name = node.name.as_str();
    let prior_class = std::mem::replace(&mut ctx.class, name.to_string());
    let prior_chain = ctx.class_chain.clone();
    ctx.class_chain = ctx.chain_class_name(name);
    debug!("Generating class {}", ctx.class_chain);

    let mut buffers = ClassBuffers::default();

    // Class scope: the class itself, nested classes and static members
    ctx.vars.increment_depth();
    ctx.vars.add_local(name).ok();
    for child in &node.children {
        let path = vec![name.to_string(), child.name.clone()];
        ctx.vars.add(&child.name, path).ok();
    }
    bind_members(node, Phase::Static, ctx);
    emit_members(node, Phase::Static, ctx, &mut buffers);

    // Instance scope: `this` and instance members
    ctx.vars.increment_depth();
    ctx.vars.add_local("this").ok();
    bind_members(node, Phase::Instance, ctx);
    emit_members(node, Phase::Instance, ctx, &mut buffers);

    // Children see the outer instance scope, `this` and instance members included
    ctx.indent += 1;
    for child in &node.children {
        build_class(child, Some(name), ctx, &mut buffers.nested);
    }
    ctx.indent -= 1;

    ctx.vars.decrement_depth();
    ctx.vars.decrement_depth();

    let binding = match outer {
        Some(outer) => format!("{}.{}", outer, name),
        None => format!("var {}", name),
    };
    push_line(out, ctx, &format!("{} = (function () {{", binding));
    ctx.indent += 1;
    let signature = format!("function {}({}) {{", name, buffers.params.join(", "));
    push_line(out, ctx, &signature);
    if buffers.this_alias {
        ctx.indent += 1;
        push_line(out, ctx, "var _this = this;");
        ctx.indent -= 1;
    }
    out.push_str(&buffers.defaults);
    out.push_str(&buffers.constructor);
    push_line(out, ctx, "}");
    out.push_str(&buffers.nested);
    out.push_str(&buffers.instance);
    out.push_str(&buffers.statics);
    out.push_str(&buffers.js);
    push_line(out, ctx, &format!("return {};", name));
    ctx.indent -= 1;
    push_line(out, ctx, "})();");

    ctx.class = prior_class;
    ctx.class_chain = prior_chain;
}

fn phase_of(prop: &Property, class: &str) -> Phase {
    if prop.is_static && prop.name != class {
        Phase::Static
    } else {
        Phase::Instance
    }
}

fn bind_members(node: &ClassNode, phase: Phase, ctx: &mut BuildContext) {
    let owner = match phase {
        Phase::Static => node.name.clone(),
        Phase::Instance => "this".to_string(),
    };
    for Sourced { file, item } in &node.statements {
        ctx.file = *file;
        for prop in item.props() {
            // The constructor shares the class name, already bound
            if prop.name == node.name || phase_of(prop, &node.name) != phase {
                continue;
            }
            let path = vec![owner.clone(), prop.name.clone()];
            ctx.declare(&prop.name, path, &prop.pos);
        }
    }
}

fn emit_members(
    node: &ClassNode,
    phase: Phase,
    ctx: &mut BuildContext,
    buffers: &mut ClassBuffers,
) {
    for Sourced { file, item } in &node.statements {
        ctx.file = *file;
        match item {
            ClassStmt::PropertySet {
                pos,
                props,
                values: Some(values),
            } => {
                let Some(pairs) = pair_values(props, values) else {
                    if phase == Phase::Static {
                        let message = format!(
                            "Mismatched property / value counts, {} != {}",
                            props.len(),
                            values.len()
                        );
                        ctx.error(pos, message);
                    }
                    continue;
                };
                for (prop, value) in pairs {
                    if phase_of(prop, &node.name) == phase {
                        emit_property(&node.name, prop, value, ctx, buffers);
                    }
                }
            }
            ClassStmt::PropertySet { values: None, .. } => {}
            ClassStmt::Method { prop, function, .. } => {
                if phase_of(prop, &node.name) == phase {
                    emit_function(&node.name, prop, function, ctx, buffers);
                }
            }
            ClassStmt::Accessors {
                prop,
                getter,
                setter,
                ..
            } => {
                if phase_of(prop, &node.name) == phase {
                    let (getter, setter) = (getter.as_ref(), setter.as_ref());
                    emit_accessors(&node.name, prop, getter, setter, ctx, buffers);
                }
            }
            ClassStmt::JsBlock { code, .. } => {
                if phase == Phase::Static {
                    ctx.indent += 1;
                    push_line(&mut buffers.js, ctx, code);
                    ctx.indent -= 1;
                }
            }
            ClassStmt::Error { .. } => {}
        }
    }
}

fn emit_property(
    class: &str,
    prop: &Property,
    value: &Expr,
    ctx: &mut BuildContext,
    buffers: &mut ClassBuffers,
) {
    if let Expr::Function(def) = value {
        emit_function(class, prop, def, ctx, buffers);
        return;
    }
    if prop.name == class {
        let message = format!(
            "Property {} matches the class name, so it must be a function.",
            prop.name
        );
        ctx.error(&prop.pos, message);
        return;
    }

    if prop.is_static {
        ctx.indent += 1;
        let value = expr_to_js(value, ctx);
        let line = format!("{}.{} = {};", class, prop.name, value);
        push_line(&mut buffers.statics, ctx, &line);
        ctx.indent -= 1;
    } else {
        ctx.indent += 2;
        let value = expr_to_js(value, ctx);
        let line = format!("this.{} = {};", prop.name, value);
        push_line(&mut buffers.defaults, ctx, &line);
        ctx.indent -= 2;
    }
}

fn emit_function(
    class: &str,
    prop: &Property,
    def: &FunctionDef,
    ctx: &mut BuildContext,
    buffers: &mut ClassBuffers,
) {
    if prop.name == class {
        emit_constructor(class, prop, def, ctx, buffers);
        return;
    }

    ctx.current_fn_static = prop.is_static;
    ctx.indent += 1;
    let function = function_to_js(def, ctx);
    let (target, buffer) = if prop.is_static {
        if prop.name == "Main" {
            register_main(&prop.pos, ctx);
        }
        (format!("{}.{}", class, prop.name), &mut buffers.statics)
    } else {
        (format!("{}.prototype.{}", class, prop.name), &mut buffers.instance)
    };
    push_line(buffer, ctx, &format!("{} = {};", target, function));
    ctx.indent -= 1;
    ctx.current_fn_static = false;
}

fn register_main(pos: &Position, ctx: &mut BuildContext) {
    let path = ctx.chain_class_name("Main");
    match &ctx.main {
        Some(existing) => {
            let message = format!("Main is already defined as {}", existing);
            ctx.error(pos, message);
        }
        None => ctx.main = Some(path),
    }
}

/// The function assigned to the class name becomes the constructor: its
/// parameters go into the signature and its body after the defaults.
fn emit_constructor(
    class: &str,
    prop: &Property,
    def: &FunctionDef,
    ctx: &mut BuildContext,
    buffers: &mut ClassBuffers,
) {
    if buffers.has_constructor {
        let message = format!("Class {} already has a constructor.", class);
        ctx.error(&prop.pos, message);
        return;
    }
    buffers.has_constructor = true;
    buffers.params = def.params.clone();

    ctx.current_fn_static = false;
    ctx.fn_depth += 1;
    ctx.needs_this = false;
    ctx.vars.increment_depth();
    for param in &def.params {
        ctx.declare_local(param, &def.pos);
    }

    ctx.indent += 2;
    buffers.constructor = stmts_to_js(&def.body, ctx);
    buffers.this_alias = ctx.needs_this;
    ctx.indent -= 2;

    ctx.vars.decrement_depth();
    ctx.fn_depth -= 1;
}

fn emit_accessors(
    class: &str,
    prop: &Property,
    getter: Option<&FunctionDef>,
    setter: Option<&FunctionDef>,
    ctx: &mut BuildContext,
    buffers: &mut ClassBuffers,
) {
    let target = if prop.is_static {
        class.to_string()
    } else {
        format!("{}.prototype", class)
    };

    ctx.current_fn_static = prop.is_static;
    ctx.indent += 1;
    let mut parts = Vec::new();
    ctx.indent += 1;
    for (keyword, def) in [("get", getter), ("set", setter)] {
        if let Some(def) = def {
            parts.push(format!("{}{}: {}", ctx.tabs(), keyword, function_to_js(def, ctx)));
        }
    }
    ctx.indent -= 1;

    let buffer = if prop.is_static {
        &mut buffers.statics
    } else {
        &mut buffers.instance
    };
    let header = format!("Object.defineProperty({}, \"{}\", {{", target, prop.name);
    push_line(buffer, ctx, &header);
    buffer.push_str(&parts.join(",\n"));
    buffer.push('\n');
    push_line(buffer, ctx, "});");
    ctx.indent -= 1;
    ctx.current_fn_static = false;
}
