//! Depth-scoped symbol table used during code generation.
//!
//! Every name maps to a stack of bindings. A binding's depth counts how
//! many blocks have been entered since it was declared: 0 means it belongs
//! to the innermost block. Leaving a block lowers every depth and evicts the
//! bindings that fall below zero.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("A variable named {0} has already been declared at this scope.")]
    AlreadyDeclared(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    ident: Vec<String>,
    depth: usize,
}

/// Maps names to the dotted JavaScript path they stand for.
#[derive(Debug, Clone, Default)]
pub struct VarTracker {
    items: HashMap<String, Vec<Binding>>,
}

impl VarTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `ident` in the innermost block.
    ///
    /// A name already bound in the innermost block is an error; a binding
    /// from an outer block is shadowed until this block is left.
    pub fn add(&mut self, name: &str, ident: Vec<String>) -> Result<(), ScopeError> {
        let stack = self.items.entry(name.to_string()).or_default();
        match stack.last() {
            Some(binding) if binding.depth == 0 => {
                return Err(ScopeError::AlreadyDeclared(name.to_string()));
            }
            Some(binding) => {
                debug!(
                    "{} shadows a binding to {} from {} block(s) out",
                    name,
                    binding.ident.join("."),
                    binding.depth
                );
            }
            None => {}
        }
        stack.push(Binding { ident, depth: 0 });
        Ok(())
    }

    /// Binds `name` to itself.
    pub fn add_local(&mut self, name: &str) -> Result<(), ScopeError> {
        self.add(name, vec![name.to_string()])
    }

    /// The innermost binding of `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.items
            .get(name)
            .and_then(|stack| stack.last())
            .map(|binding| binding.ident.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn increment_depth(&mut self) {
        for binding in self.items.values_mut().flatten() {
            binding.depth += 1;
        }
    }

    pub fn decrement_depth(&mut self) {
        for stack in self.items.values_mut() {
            stack.retain(|binding| binding.depth > 0);
            for binding in stack.iter_mut() {
                binding.depth -= 1;
            }
        }
        self.items.retain(|_, stack| !stack.is_empty());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
