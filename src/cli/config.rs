use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::cli::CliError;
use crate::compiler::CompileOptions;

static FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([A-Za-z][A-Za-z0-9_]*)(?::(.*))?$").expect("flag pattern is valid")
});

pub const FLAG_BUILD: &str = "build";
pub const FLAG_OUT: &str = "out";
pub const FLAG_PRINT_AST: &str = "printAST";
pub const FLAG_PRINT_TOKENS: &str = "printTokens";
pub const FLAG_JSON: &str = "json";

/// Input files and flags of one compiler run.
///
/// # Example
/// ```
/// use minet_lang::cli::BuildConfig;
///
/// let config = BuildConfig::from_args(["app.mn", "/build", "/out:app.js"]);
/// assert_eq!(config.files, vec!["app.mn".to_string()]);
/// assert!(config.is_set("build"));
/// assert_eq!(config.get("out"), Some("app.js"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub files: Vec<String>,
    pub flags: HashMap<String, Option<String>>,
}

impl BuildConfig {
    /// Sorts arguments into flags (`/name` or `/name:value`) and files.
    /// A repeated flag keeps its last value.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = BuildConfig::default();
        for arg in args {
            let arg = arg.as_ref();
            match FLAG.captures(arg) {
                Some(caps) => {
                    let value = caps.get(2).map(|m| m.as_str().to_string());
                    config.flags.insert(caps[1].to_string(), value);
                }
                None => config.files.push(arg.to_string()),
            }
        }
        config
    }

    pub fn is_set(&self, flag: &str) -> bool {
        self.flags.contains_key(flag)
    }

    /// The value given to `flag`, if it was set with one.
    pub fn get(&self, flag: &str) -> Option<&str> {
        self.flags.get(flag).and_then(|v| v.as_deref())
    }

    /// Checks the arguments before any file is read. `has_stdin` tells
    /// whether piped input can stand in for input files.
    pub fn validate(&self, has_stdin: bool) -> Result<(), CliError> {
        let mut errors = Vec::new();
        if self.files.is_empty() && !has_stdin {
            errors.push("You must specify at least one file to build.".to_string());
        }
        if self.is_set(FLAG_BUILD) && self.get(FLAG_OUT).is_none_or(str::is_empty) {
            errors.push(
                "You must specify an output file name with /out:filename when building."
                    .to_string(),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CliError::Config(errors))
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            build: self.is_set(FLAG_BUILD),
            print_tokens: self.is_set(FLAG_PRINT_TOKENS),
            print_ast: self.is_set(FLAG_PRINT_AST),
        }
    }

    pub fn json(&self) -> bool {
        self.is_set(FLAG_JSON)
    }
}
