//! Front end: characters to tokens to AST.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

use crate::error::PolyscriptError;
use ast::Node;

/// Lexes and parses `source` (from `file_name`) into a program AST.
pub fn parse_source(file_name: &str, source: &str) -> Result<Node, PolyscriptError> {
    let tokens = lexer::Lexer::new(file_name, source).make_tokens()?;
    parser::Parser::new(tokens).parse()
}
