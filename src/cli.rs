//! Command-line argument definitions.
//!
//! Replaces the original driver's manual `argv` scan with `clap`'s derive
//! API, while preserving the exact three invocation forms of spec.md §6.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Polyscript — a tree-walking interpreter for the Polyscript scripting
/// language.
#[derive(Parser, Debug)]
#[command(name = "polyscript")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A tree-walking interpreter for the Polyscript scripting language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Dump the lexer's token stream to stdout before parsing.
    #[arg(long = "showTokens", global = true)]
    pub show_tokens: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a script file and exit.
    Run {
        /// Path to the `.ps` script to run.
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_means_repl() {
        let cli = Cli::parse_from(["polyscript"]);
        assert!(cli.command.is_none());
        assert!(!cli.show_tokens);
    }

    #[test]
    fn run_subcommand_takes_a_file() {
        let cli = Cli::parse_from(["polyscript", "run", "hello.ps"]);
        match cli.command {
            Some(Command::Run { file }) => assert_eq!(file, PathBuf::from("hello.ps")),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn show_tokens_is_global() {
        let cli = Cli::parse_from(["polyscript", "run", "hello.ps", "--showTokens"]);
        assert!(cli.show_tokens);
        let cli = Cli::parse_from(["polyscript", "--showTokens"]);
        assert!(cli.show_tokens);
    }
}
