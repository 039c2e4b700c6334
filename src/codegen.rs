//! JavaScript generation.
//!
//! Walks the class forest depth first, resolving every identifier through
//! the scope table and the file's `use` aliases, and desugars multi-value
//! assignment, unpacking, range and array loops, if-sugar and chain blocks.
//!
//! Semantic errors are recorded in the [`BuildContext`] and generation goes
//! on with a placeholder, so one build reports every error it can find.

mod classes;
mod expressions;
mod statements;

use log::info;

use crate::context::BuildContext;
use crate::forest::Project;

pub use expressions::expr_to_js;
pub use statements::stmts_to_js;

/// Name written into the header of every generated file.
pub const PROGRAM: &str = concat!("Minet Compiler ", env!("CARGO_PKG_VERSION"));

/// Prefix of every generated helper variable.
pub const INTERNAL_PREFIX: &str = "_";

/// Appends `text` as one line at the current indentation.
pub(crate) fn push_line(buf: &mut String, ctx: &BuildContext, text: &str) {
    buf.push_str(&ctx.tabs());
    buf.push_str(text);
    buf.push('\n');
}

pub(crate) fn internal(name: &str, counter: usize) -> String {
    format!("{}{}{}", INTERNAL_PREFIX, name, counter)
}

/// Generates the whole output file for an assembled project.
pub fn build(project: &Project, ctx: &mut BuildContext) -> String {
    info!("Building {} classes", project.class_count());

    let mut out = String::new();
    out.push_str(&format!("/* Built with {}\n", PROGRAM));
    out.push_str(&format!(" * Input Files: {}\n", project.file_names.join(", ")));
    out.push_str(" */\n\n");

    if !project.js_blocks.is_empty() {
        out.push_str("// Javascript Blocks\n");
        for block in &project.js_blocks {
            out.push_str(block);
            out.push('\n');
        }
        out.push('\n');
    }

    if !project.classes.is_empty() {
        out.push_str("// Classes\n");

        // Top-level classes are visible from everywhere
        let pos = crate::ast::Position::new("".into(), 1, 1);
        for class in &project.classes {
            ctx.declare_local(&class.name, &pos);
        }
        for class in &project.classes {
            classes::build_class(class, None, ctx, &mut out);
        }
    }

    if let Some(main) = &ctx.main {
        out.push_str("window.onload = function () {\n");
        out.push_str(&format!("\t{}();\n", main));
        out.push_str("};\n");
    }

    out
}
