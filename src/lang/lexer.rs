//! Character stream to token stream.
//!
//! One token per logical lexeme. Whitespace (space, tab) is skipped;
//! newlines become [`TokenKind::Newline`] (statement terminators); `#`
//! starts a line comment. Two-character operators (`==`, `!=`, `<=`, `>=`,
//! `->`) take precedence over their single-character prefixes.

use crate::error::PolyscriptError;
use crate::lang::token::{Token, TokenKind, KEYWORDS};
use crate::position::Position;

pub struct Lexer {
    chars: Vec<char>,
    pos: Position,
    idx: usize,
}

type LexResult<T> = Result<T, PolyscriptError>;

impl Lexer {
    pub fn new(file_name: impl Into<String>, text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: Position::start(file_name),
            idx: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    fn advance(&mut self) {
        let ch = self.current();
        self.idx += 1;
        self.pos.advance(ch);
    }

    /// Lexes the entire input, returning tokens terminated by `EOF`, or the
    /// first error encountered.
    pub fn make_tokens(&mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let Some(ch) = self.current() else {
                let pos = self.pos.copy();
                tokens.push(Token::new(TokenKind::Eof, pos.clone(), pos));
                break;
            };

            match ch {
                ' ' | '\t' => self.advance(),
                '#' => {
                    while let Some(c) = self.current() {
                        if c == '\n' { break; }
                        self.advance();
                    }
                }
                '\n' => {
                    let start = self.pos.copy();
                    self.advance();
                    tokens.push(Token::new(TokenKind::Newline, start, self.pos.copy()));
                }
                '\r' => self.advance(),
                '0'..='9' => tokens.push(self.make_number()),
                '"' => tokens.push(self.make_string()?),
                c if is_ident_start(c) => tokens.push(self.make_ident()),
                _ => tokens.push(self.make_operator()?),
            }
        }

        Ok(tokens)
    }

    fn make_number(&mut self) -> Token {
        let start = self.pos.copy();
        let mut text = String::new();
        let mut is_float = false;

        while let Some(c) = self.current() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' && !is_float && self.peek(1).is_some_and(|d| d.is_ascii_digit()) {
                is_float = true;
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let end = self.pos.copy();
        let kind = if is_float {
            TokenKind::Float(text.parse().unwrap_or(0.0))
        } else {
            TokenKind::Int(text.parse().unwrap_or(0))
        };
        Token::new(kind, start, end)
    }

    fn make_string(&mut self) -> LexResult<Token> {
        let start = self.pos.copy();
        self.advance(); // opening quote
        let mut text = String::new();

        loop {
            match self.current() {
                None => return Err(PolyscriptError::illegal_char('"', start)),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.current() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(other) => other,
                        None => return Err(PolyscriptError::illegal_char('"', start)),
                    };
                    text.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        let end = self.pos.copy();
        Ok(Token::new(TokenKind::String(text), start, end))
    }

    fn make_ident(&mut self) -> Token {
        let start = self.pos.copy();
        let mut text = String::new();

        while let Some(c) = self.current() {
            if is_ident_char(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let end = self.pos.copy();
        let kind = if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword(text)
        } else {
            TokenKind::Ident(text)
        };
        Token::new(kind, start, end)
    }

    fn make_operator(&mut self) -> LexResult<Token> {
        let start = self.pos.copy();
        let ch = self.current().expect("checked by caller");
        self.advance();

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => {
                if self.current() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            '^' => TokenKind::Pow,
            '%' => TokenKind::Mod,
            '=' => {
                if self.current() == Some('=') {
                    self.advance();
                    TokenKind::Ee
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.current() == Some('=') {
                    self.advance();
                    TokenKind::Ne
                } else {
                    return Err(PolyscriptError::expected_char('=', self.pos.copy()));
                }
            }
            '<' => {
                if self.current() == Some('=') {
                    self.advance();
                    TokenKind::Lte
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.current() == Some('=') {
                    self.advance();
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            _ => return Err(PolyscriptError::illegal_char(ch, start)),
        };

        let end = self.pos.copy();
        Ok(Token::new(kind, start, end))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new("<test>", src)
            .make_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn integer_and_float_distinguished_by_dot() {
        assert_eq!(kinds("1"), vec![TokenKind::Int(1), TokenKind::Eof]);
        assert_eq!(kinds("1.5"), vec![TokenKind::Float(1.5), TokenKind::Eof]);
    }

    #[test]
    fn second_dot_terminates_number() {
        assert_eq!(
            kinds("1.2.3"),
            vec![
                TokenKind::Float(1.2),
                TokenKind::Dot,
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn two_char_operators_take_precedence() {
        assert_eq!(kinds("=="), vec![TokenKind::Ee, TokenKind::Eof]);
        assert_eq!(kinds("!="), vec![TokenKind::Ne, TokenKind::Eof]);
        assert_eq!(kinds("<="), vec![TokenKind::Lte, TokenKind::Eof]);
        assert_eq!(kinds("->"), vec![TokenKind::Arrow, TokenKind::Eof]);
    }

    #[test]
    fn bang_without_equal_is_expected_char_error() {
        let result = Lexer::new("<test>", "!").make_tokens();
        assert!(matches!(result, Err(PolyscriptError::ExpectedChar { .. })));
    }

    #[test]
    fn illegal_character_is_reported() {
        let result = Lexer::new("<test>", "`").make_tokens();
        assert!(matches!(result, Err(PolyscriptError::IllegalChar { .. })));
    }

    #[test]
    fn unterminated_string_is_illegal_char() {
        let result = Lexer::new("<test>", "\"abc").make_tokens();
        assert!(matches!(result, Err(PolyscriptError::IllegalChar { .. })));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""a\nb""#),
            vec![TokenKind::String("a\nb".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("1 # comment\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_vs_ident() {
        assert_eq!(kinds("if"), vec![TokenKind::Keyword("if".into()), TokenKind::Eof]);
        assert_eq!(kinds("ifx"), vec![TokenKind::Ident("ifx".into()), TokenKind::Eof]);
    }

    #[test]
    fn non_ascii_outside_strings_is_illegal() {
        let result = Lexer::new("<test>", "é").make_tokens();
        assert!(matches!(result, Err(PolyscriptError::IllegalChar { .. })));
    }
}
