//! The compile pipeline: lex and parse every file, then assemble the class
//! forest and generate JavaScript when nothing has failed so far.

use log::info;

use crate::ast::{File, TokenKind, print_file};
use crate::codegen;
use crate::context::BuildContext;
use crate::diagnostics::Diagnostic;
use crate::forest::Project;
use crate::lexer::tokenize;
use crate::parser::Parser;

/// One input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Generate JavaScript; without it files are only checked
    pub build: bool,
    pub print_tokens: bool,
    pub print_ast: bool,
}

/// Result of a compile run.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    /// The text destined for the output file: dumps, then the generated
    /// JavaScript or the error report
    pub output: String,
    pub errors: Vec<Diagnostic>,
    pub files: Vec<File>,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn dump_tokens(name: &str, source: &str, out: &mut String) {
    out.push_str(&format!("/* Tokens {}\n", name));
    for token in tokenize(source, name) {
        out.push_str(&token.to_string());
        if token.kind != TokenKind::Eol {
            out.push('\n');
        }
    }
    out.push_str("*/\n");
}

/// Formats diagnostics as the `/* Errors */` block of the output file.
pub fn error_report(errors: &[Diagnostic]) -> String {
    let mut out = String::from("/* Errors\n");
    for error in errors {
        out.push_str(&error.to_string());
        out.push('\n');
    }
    out.push_str("*/\n");
    out
}

pub fn compile(sources: &[Source], options: &CompileOptions) -> Compilation {
    let mut result = Compilation::default();

    for source in sources {
        info!("Parsing file {}", source.name);
        if options.print_tokens {
            dump_tokens(&source.name, &source.text, &mut result.output);
        }

        let tokens = tokenize(&source.text, &source.name);
        let parsed = Parser::new(tokens, &source.name).parse();
        result.errors.extend(parsed.errors);

        if parsed.ok && result.errors.is_empty() && options.print_ast {
            result.output.push_str("/* AST\n");
            result.output.push_str(&print_file(&parsed.file, 1));
            result.output.push_str("*/\n");
        }
        if parsed.ok {
            result.files.push(parsed.file);
        }
    }

    if options.build && result.errors.is_empty() {
        let mut ctx = BuildContext::new();
        let project = Project::assemble(&result.files, &mut ctx);
        let js = if ctx.has_errors() {
            String::new()
        } else {
            codegen::build(&project, &mut ctx)
        };
        result.errors.append(&mut ctx.errors);
        if result.errors.is_empty() {
            result.output.push_str(&js);
        }
    }

    if !result.errors.is_empty() {
        info!("Compile finished with {} errors", result.errors.len());
        result.output.push_str(&error_report(&result.errors));
    }
    result
}

/// Compiles `sources` to JavaScript alone, without dumps.
pub fn build_js(sources: &[Source]) -> Result<String, Vec<Diagnostic>> {
    let options = CompileOptions {
        build: true,
        ..CompileOptions::default()
    };
    let result = compile(sources, &options);
    if result.is_ok() {
        Ok(result.output)
    } else {
        Err(result.errors)
    }
}
