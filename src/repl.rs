//! The interactive read-eval-print loop (spec.md §6).
//!
//! Grounded in `original_source/Polyscript/Polyscript.cpp`'s `main()`: the
//! banner, the `> ` prompt, the literal `exit()` sentinel checked against
//! the raw input line before lexing, and the trailing newline printed
//! after every line's evaluation.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::config::Config;
use crate::runtime::bootstrap_global;

const BANNER_PLAIN: &str = "Polyscript V0.4.0 | use exit() to exit.";

/// Runs the REPL against stdin/stdout until `exit()` or EOF.
pub fn run(show_tokens: bool, config: &Config) {
    if config.banner {
        println!("{}", banner(config.color));
    }

    let global = bootstrap_global();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let Some(Ok(input)) = lines.next() else {
            break;
        };

        if input == "exit()" {
            break;
        }
        if input.is_empty() {
            if config.color {
                println!("{}", "null".dimmed());
            } else {
                println!("null");
            }
            continue;
        }

        crate::run("<stdin>", &input, &global, show_tokens, false, config.color);
        println!();
    }
}

fn banner(use_color: bool) -> String {
    if use_color {
        format!("Polyscript {} | use exit() to exit.", "V0.4.0".bright_blue())
    } else {
        BANNER_PLAIN.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_banner_matches_spec_text() {
        assert_eq!(banner(false), BANNER_PLAIN);
    }

    #[test]
    fn global_scope_persists_across_lines() {
        use crate::runtime::value::Value;

        let global = bootstrap_global();
        assert!(crate::run("<stdin>", "var x = 1", &global, false, false, true));
        assert!(crate::run("<stdin>", "x + 1", &global, false, false, true));
        assert!(!crate::run("<stdin>", "x +", &global, false, false, true));
        assert!(matches!(global.borrow().get("x"), Some(Value::Integer(1))));
    }
}
