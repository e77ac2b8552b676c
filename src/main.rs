//! CLI entry point.
//!
//! Wires argument parsing, logging, configuration, and the two run modes
//! (`run <file>`, interactive REPL) together, mirroring the shape of
//! `original_source/Polyscript/Polyscript.cpp`'s `main()`.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use polyscript::cli::{Cli, Command};
use polyscript::config::Config;
use polyscript::runtime::bootstrap_global;
use polyscript::{repl, run};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    let config = Config::load();

    match cli.command {
        None => {
            repl::run(cli.show_tokens, &config);
            ExitCode::SUCCESS
        }
        Some(Command::Run { file }) => run_file(&file, cli.show_tokens, &config),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

fn run_file(path: &std::path::Path, show_tokens: bool, config: &Config) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("polyscript: cannot read {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let global = bootstrap_global();
    let file_name = path.display().to_string();
    tracing::debug!(file = %file_name, "running script");

    if run(&file_name, &source, &global, show_tokens, true, config.color) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
