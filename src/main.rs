use clap::Parser as ClapParser;
use minet_lang::cli::{self, BuildConfig, CliError};
use minet_lang::codegen::PROGRAM;
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "minet")]
#[command(about = "Minet - compiles indentation-sensitive class files to JavaScript")]
#[command(version)]
#[command(after_help = "Parameters:
    /build            Builds the output file.
    /out:filename     Sets the output file to use, eg: /out:project.js
    /printAST         Prints out the abstract syntax tree of the input.
    /printTokens      Prints out the parsed tokens of the input.
    /json             Prints errors as JSON.")]
struct Cli {
    /// Input files and /flag[:value] parameters
    #[arg(value_name = "FILES AND PARAMETERS")]
    args: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = BuildConfig::from_args(&cli.args);

    if let Err(e) = run(&config) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &BuildConfig) -> Result<(), CliError> {
    let stdin = if config.files.is_empty() && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Some(buffer)
    } else {
        None
    };

    if !config.json() {
        eprintln!("{}", PROGRAM);
    }
    let report = cli::execute_build(config, stdin)?;
    let errors = &report.compilation.errors;

    if config.json() {
        let json: Vec<_> = errors.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if report.written_to.is_none() {
        print!("{}", report.compilation.output);
    }
    if !errors.is_empty() {
        eprintln!("\nErrors:");
        for error in errors {
            eprintln!("{}", error);
        }
    }
    eprintln!("\nDone");
    Ok(())
}
