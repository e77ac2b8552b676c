//! Library surface: re-exports used by `main.rs`, `repl.rs`, and the
//! integration tests under `tests/`.

pub mod cli;
pub mod config;
pub mod error;
pub mod lang;
pub mod message;
pub mod position;
pub mod repl;
pub mod runtime;

use colored::Colorize;

use runtime::context::Context;
use runtime::control::Unwind;
use runtime::value::Value;
use runtime::Evaluator;
use std::cell::RefCell;
use std::rc::Rc;

/// Lexes, parses, and evaluates `source` against `ctx`.
///
/// Mirrors the original driver's `run()`/`read_run()`: in REPL mode
/// (`from_file = false`) the top-level result (or a function's `return`ed
/// value) is printed; `Break`/`Continue` escaping to the top level are
/// swallowed silently; in file mode nothing is printed beyond what the
/// script writes itself via `print`/`clear`. Errors are rendered to stderr
/// in both modes, colored per `use_color` (threaded from `Config.color`).
/// Returns `true` on success (used for the process exit code in file mode).
pub fn run(
    file_name: &str,
    source: &str,
    ctx: &Rc<RefCell<Context>>,
    show_tokens: bool,
    from_file: bool,
    use_color: bool,
) -> bool {
    let tokens = match lang::lexer::Lexer::new(file_name, source).make_tokens() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", message::render(&e, source, use_color));
            return false;
        }
    };

    if show_tokens {
        print!("TOKENS [ ");
        for token in &tokens {
            print!("{token} ");
        }
        println!("]");
    }

    let ast = match lang::parser::Parser::new(tokens).parse() {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{}", message::render(&e, source, use_color));
            return false;
        }
    };

    let evaluator = Evaluator::new();
    match evaluator.eval(&ast, ctx) {
        Ok(value) => {
            print_result(&value, from_file, use_color);
            true
        }
        Err(Unwind::Return(value)) => {
            print_result(&value, from_file, use_color);
            true
        }
        Err(Unwind::Break) | Err(Unwind::Continue) => true,
        Err(Unwind::Error(e)) => {
            eprintln!("{}", message::render(&e, source, use_color));
            false
        }
    }
}

fn print_result(value: &Value, from_file: bool, use_color: bool) {
    if from_file {
        return;
    }
    match value {
        Value::Null if use_color => println!("{}", "null".dimmed()),
        Value::Null => println!("null"),
        other => println!("{}", other.bare()),
    }
}
