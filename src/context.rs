use std::collections::HashMap;

use crate::ast::Position;
use crate::diagnostics::Diagnostic;
use crate::scope::VarTracker;

/// `use` aliases of one file: alias name to dotted path.
pub type AliasMap = HashMap<String, Vec<String>>;

/// State shared by every step of one build.
///
/// Passed by `&mut` through assembly and code generation. The temp
/// counters go up when a construct that needs a temporary is entered and
/// back down when it is left, so sibling constructs reuse the same names.
#[derive(Debug, Default)]
pub struct BuildContext {
    pub errors: Vec<Diagnostic>,

    /// Output indentation, in tabs
    pub indent: usize,
    /// Name of the class being generated
    pub class: String,
    /// Dotted path of the class being generated
    pub class_chain: String,
    /// Receiver prepended to targets inside a chain block
    pub chain: Option<String>,

    pub vars: VarTracker,
    /// Aliases per input file, indexed like the input files
    pub aliases: Vec<AliasMap>,
    /// Index of the file the current statement came from
    pub file: usize,

    /// Nesting depth of function literals
    pub fn_depth: usize,
    /// Set when a nested function referred to `this`
    pub needs_this: bool,
    pub current_fn_static: bool,
    /// Dotted path of the static `Main` entry point
    pub main: Option<String>,

    /// Counter behind `_t<n>`
    pub temp: usize,
    /// Counter behind `_i<n>` and `_l<n>`
    pub for_index: usize,
    /// Counter behind `_c<n>`
    pub cond: usize,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, pos: &Position, message: impl Into<String>) {
        self.errors.push(Diagnostic::semantic(pos.clone(), message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Binds `name` to `ident` in the innermost scope, reporting duplicates.
    pub fn declare(&mut self, name: &str, ident: Vec<String>, pos: &Position) {
        if let Err(err) = self.vars.add(name, ident) {
            self.error(pos, err.to_string());
        }
    }

    pub fn declare_local(&mut self, name: &str, pos: &Position) {
        self.declare(name, vec![name.to_string()], pos);
    }

    /// The alias table of the file being generated.
    pub fn file_aliases(&self) -> Option<&AliasMap> {
        self.aliases.get(self.file)
    }

    /// `part` qualified by the current class path.
    pub fn chain_class_name(&self, part: &str) -> String {
        if self.class_chain.is_empty() {
            part.to_string()
        } else {
            format!("{}.{}", self.class_chain, part)
        }
    }

    /// `part` qualified by the chain-block receiver, if any.
    pub fn chain_name(&self, part: &str) -> String {
        match &self.chain {
            Some(chain) => format!("{}.{}", chain, part),
            None => part.to_string(),
        }
    }

    pub fn tabs(&self) -> String {
        "\t".repeat(self.indent)
    }
}
