//! Recursive-descent / precedence-climbing parser.
//!
//! One token of lookahead. `consume` advances; `expect` advances or raises
//! `InvalidSyntaxError`. No panic-mode recovery: parsing aborts on first
//! error (spec.md §4.2).

use crate::error::PolyscriptError;
use crate::lang::ast::{IfCase, Node, NodeKind};
use crate::lang::token::{Token, TokenKind};
use crate::position::Span;

type PResult<T> = Result<T, PolyscriptError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // -- token stream helpers ------------------------------------------------

    fn at(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at_offset(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn is_eof(&self) -> bool {
        matches!(self.at().kind, TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.at().kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, word: &str) -> bool {
        self.at().is_keyword(word)
    }

    /// A contextual keyword: the `to` separator in `for` loops is lexed as a
    /// plain identifier (it is not in the closed keyword set) but is
    /// recognized here by its text.
    fn check_contextual(&self, word: &str) -> bool {
        matches!(&self.at().kind, TokenKind::Ident(s) if s == word)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            let tok = self.at().clone();
            Err(PolyscriptError::invalid_syntax(
                format!("expected {what}, found {}", tok.kind),
                tok.start,
                tok.end,
            ))
        }
    }

    fn expect_keyword(&mut self, word: &str) -> PResult<Token> {
        if self.check_keyword(word) {
            Ok(self.advance())
        } else {
            let tok = self.at().clone();
            Err(PolyscriptError::invalid_syntax(
                format!("expected '{word}', found {}", tok.kind),
                tok.start,
                tok.end,
            ))
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<(String, Span)> {
        let tok = self.at().clone();
        match tok.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, Span::new(tok.start, tok.end)))
            }
            _ => Err(PolyscriptError::invalid_syntax(
                format!("expected {what}, found {}", tok.kind),
                tok.start,
                tok.end,
            )),
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.at().kind, TokenKind::Newline) {
            self.advance();
        }
    }

    // -- entry point ----------------------------------------------------------

    /// Parses the whole token stream as a program, consuming through `EOF`.
    pub fn parse(&mut self) -> PResult<Node> {
        let start = self.at().start.clone();
        let stmts = self.parse_statements(|k| matches!(k, TokenKind::Eof))?;
        let end = self.at().end.clone();
        if !self.is_eof() {
            let tok = self.at().clone();
            return Err(PolyscriptError::invalid_syntax(
                format!("expected end of input, found {}", tok.kind),
                tok.start,
                tok.end,
            ));
        }
        Ok(Node::new(NodeKind::Block(stmts), Span::new(start, end)))
    }

    /// `statements := NEWLINE* statement (NEWLINE+ statement)* NEWLINE*`,
    /// stopping at any token for which `terminator` returns true.
    fn parse_statements(&mut self, terminator: impl Fn(&TokenKind) -> bool) -> PResult<Vec<Node>> {
        let mut stmts = Vec::new();
        self.skip_newlines();

        while !terminator(&self.at().kind) {
            stmts.push(self.parse_statement()?);

            if terminator(&self.at().kind) {
                break;
            }
            if !matches!(self.at().kind, TokenKind::Newline) {
                let tok = self.at().clone();
                return Err(PolyscriptError::invalid_syntax(
                    format!("expected newline between statements, found {}", tok.kind),
                    tok.start,
                    tok.end,
                ));
            }
            self.skip_newlines();
        }

        Ok(stmts)
    }

    /// `statement := 'return' expr? | 'break' | 'continue' | expr`
    fn parse_statement(&mut self) -> PResult<Node> {
        if self.check_keyword("return") {
            let tok = self.advance();
            let start = tok.start.clone();
            let has_value = !matches!(self.at().kind, TokenKind::Newline | TokenKind::Eof | TokenKind::RBrace);
            let value = if has_value { Some(Box::new(self.parse_expr()?)) } else { None };
            let end = value.as_ref().map(|v| v.span.end.clone()).unwrap_or(tok.end);
            return Ok(Node::new(NodeKind::Return(value), Span::new(start, end)));
        }
        if self.check_keyword("break") {
            let tok = self.advance();
            return Ok(Node::new(NodeKind::Break, Span::new(tok.start, tok.end)));
        }
        if self.check_keyword("continue") {
            let tok = self.advance();
            return Ok(Node::new(NodeKind::Continue, Span::new(tok.start, tok.end)));
        }
        self.parse_expr()
    }

    /// `expr := 'var' IDENT '=' expr | 'const' IDENT '=' expr
    ///        | IDENT '=' expr
    ///        | call '.' IDENT '=' expr
    ///        | comp (('and'|'or') comp)*`
    fn parse_expr(&mut self) -> PResult<Node> {
        if self.check_keyword("var") || self.check_keyword("const") {
            let decl = self.advance();
            let writable = decl.is_keyword("var");
            let (name, _) = self.expect_ident("identifier after var/const")?;
            self.expect(TokenKind::Eq, "'='")?;
            let value = self.parse_expr()?;
            let span = Span::new(decl.start, value.span.end.clone());
            return Ok(Node::new(
                NodeKind::VarAssign { name, value: Box::new(value), writable, declare: true },
                span,
            ));
        }

        if let TokenKind::Ident(name) = &self.at().kind {
            if matches!(self.at_offset(1).kind, TokenKind::Eq) {
                let name = name.clone();
                let start = self.at().start.clone();
                self.advance(); // ident
                self.advance(); // '='
                let value = self.parse_expr()?;
                let span = Span::new(start, value.span.end.clone());
                return Ok(Node::new(
                    NodeKind::VarAssign { name, value: Box::new(value), writable: true, declare: false },
                    span,
                ));
            }
        }

        let mut left = self.parse_comp()?;

        if matches!(self.at().kind, TokenKind::Eq) {
            if let NodeKind::Attribute { target, name } = left.kind {
                self.advance();
                let value = self.parse_expr()?;
                let span = left.span.to(&value.span);
                return Ok(Node::new(
                    NodeKind::AttributeAssign { target, name, value: Box::new(value) },
                    span,
                ));
            } else {
                return Err(PolyscriptError::invalid_syntax(
                    "left-hand side of '=' is not assignable",
                    left.span.start,
                    left.span.end,
                ));
            }
        }

        while self.check_keyword("and") || self.check_keyword("or") {
            let op_tok = self.advance();
            let right = self.parse_comp()?;
            let span = left.span.to(&right.span);
            left = Node::new(
                NodeKind::BinOp { left: Box::new(left), op: op_tok.kind, right: Box::new(right) },
                span,
            );
        }
        Ok(left)
    }

    /// `comp := 'not' comp | arith (('=='|'!='|'<'|'>'|'<='|'>=') arith)*`
    fn parse_comp(&mut self) -> PResult<Node> {
        if self.check_keyword("not") {
            let tok = self.advance();
            let operand = self.parse_comp()?;
            let span = Span::new(tok.start, operand.span.end.clone());
            return Ok(Node::new(NodeKind::UnaryOp { op: tok.kind, operand: Box::new(operand) }, span));
        }

        let mut left = self.parse_arith()?;
        loop {
            let is_cmp = matches!(
                self.at().kind,
                TokenKind::Ee | TokenKind::Ne | TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte
            );
            if !is_cmp {
                break;
            }
            let op_tok = self.advance();
            let right = self.parse_arith()?;
            let span = left.span.to(&right.span);
            left = Node::new(
                NodeKind::BinOp { left: Box::new(left), op: op_tok.kind, right: Box::new(right) },
                span,
            );
        }
        Ok(left)
    }

    /// `arith := term (('+'|'-') term)*`
    fn parse_arith(&mut self) -> PResult<Node> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.at().kind {
                TokenKind::Plus | TokenKind::Minus => self.advance(),
                _ => break,
            };
            let right = self.parse_term()?;
            let span = left.span.to(&right.span);
            left = Node::new(NodeKind::BinOp { left: Box::new(left), op: op.kind, right: Box::new(right) }, span);
        }
        Ok(left)
    }

    /// `term := factor (('*'|'/'|'%') factor)*`
    fn parse_term(&mut self) -> PResult<Node> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.at().kind {
                TokenKind::Mul | TokenKind::Div | TokenKind::Mod => self.advance(),
                _ => break,
            };
            let right = self.parse_factor()?;
            let span = left.span.to(&right.span);
            left = Node::new(NodeKind::BinOp { left: Box::new(left), op: op.kind, right: Box::new(right) }, span);
        }
        Ok(left)
    }

    /// `factor := ('+'|'-') factor | power`
    fn parse_factor(&mut self) -> PResult<Node> {
        if matches!(self.at().kind, TokenKind::Plus | TokenKind::Minus) {
            let op = self.advance();
            let operand = self.parse_factor()?;
            let span = Span::new(op.start.clone(), operand.span.end.clone());
            return Ok(Node::new(NodeKind::UnaryOp { op: op.kind, operand: Box::new(operand) }, span));
        }
        self.parse_power()
    }

    /// `power := call ('^' factor)?` — right-associative via recursion into
    /// `factor`.
    fn parse_power(&mut self) -> PResult<Node> {
        let base = self.parse_call()?;
        if matches!(self.at().kind, TokenKind::Pow) {
            self.advance();
            let exponent = self.parse_factor()?;
            let span = base.span.to(&exponent.span);
            return Ok(Node::new(
                NodeKind::BinOp { left: Box::new(base), op: TokenKind::Pow, right: Box::new(exponent) },
                span,
            ));
        }
        Ok(base)
    }

    /// `call := atom ('(' args? ')' | '.' IDENT | '.' '(' expr ')')*`
    fn parse_call(&mut self) -> PResult<Node> {
        let mut node = self.parse_atom()?;

        loop {
            match &self.at().kind {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_args()?;
                    let end_tok = self.expect(TokenKind::RParen, "')'")?;
                    let span = node.span.to(&Span::point(end_tok.end));
                    node = Node::new(NodeKind::Call { callee: Box::new(node), args }, span);
                }
                TokenKind::Dot => {
                    self.advance();
                    if matches!(self.at().kind, TokenKind::LParen) {
                        self.advance();
                        let index = self.parse_expr()?;
                        let end_tok = self.expect(TokenKind::RParen, "')'")?;
                        let span = node.span.to(&Span::point(end_tok.end));
                        node = Node::new(
                            NodeKind::Index { target: Box::new(node), index: Box::new(index) },
                            span,
                        );
                    } else {
                        let (name, name_span) = self.expect_ident("identifier after '.'")?;
                        let span = node.span.to(&name_span);
                        node = Node::new(NodeKind::Attribute { target: Box::new(node), name }, span);
                    }
                }
                _ => break,
            }
        }

        Ok(node)
    }

    fn parse_args(&mut self) -> PResult<Vec<Node>> {
        let mut args = Vec::new();
        if matches!(self.at().kind, TokenKind::RParen) {
            return Ok(args);
        }
        args.push(self.parse_expr()?);
        while matches!(self.at().kind, TokenKind::Comma) {
            self.advance();
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    /// `atom := INT|FLOAT|STRING|IDENT | '(' expr ')' | list
    ///        | if-expr | while-expr | for-expr | fn-decl
    ///        | 'new' IDENT '(' args? ')'
    ///        | enum-decl | namespace-decl | object-decl`
    fn parse_atom(&mut self) -> PResult<Node> {
        let tok = self.at().clone();

        match &tok.kind {
            TokenKind::Int(v) => {
                self.advance();
                Ok(Node::new(NodeKind::IntLit(*v), Span::new(tok.start, tok.end)))
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(Node::new(NodeKind::FloatLit(*v), Span::new(tok.start, tok.end)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Node::new(NodeKind::StringLit(s.clone()), Span::new(tok.start, tok.end)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Node::new(NodeKind::VarAccess { name: name.clone() }, Span::new(tok.start, tok.end)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::Keyword(word) => match word.as_str() {
                "if" => self.parse_if(),
                "while" => self.parse_while(),
                "for" => self.parse_for(),
                "fn" => self.parse_fn_decl(),
                "new" => self.parse_new(),
                "enum" => self.parse_enum_decl(),
                "namespace" => self.parse_namespace_decl(),
                "object" => self.parse_object_decl(),
                other => Err(PolyscriptError::invalid_syntax(
                    format!("unexpected keyword '{other}'"),
                    tok.start,
                    tok.end,
                )),
            },
            other => Err(PolyscriptError::invalid_syntax(
                format!("unexpected token {other}"),
                tok.start,
                tok.end,
            )),
        }
    }

    fn parse_list(&mut self) -> PResult<Node> {
        let open = self.expect(TokenKind::LBracket, "'['")?;
        let mut elements = Vec::new();
        if !matches!(self.at().kind, TokenKind::RBracket) {
            elements.push(self.parse_expr()?);
            while matches!(self.at().kind, TokenKind::Comma) {
                self.advance();
                elements.push(self.parse_expr()?);
            }
        }
        let close = self.expect(TokenKind::RBracket, "']'")?;
        Ok(Node::new(NodeKind::ListLit(elements), Span::new(open.start, close.end)))
    }

    /// `block := '{' statements '}'`
    fn parse_block(&mut self) -> PResult<Node> {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let stmts = self.parse_statements(|k| matches!(k, TokenKind::RBrace))?;
        let close = self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Node::new(NodeKind::Block(stmts), Span::new(open.start, close.end)))
    }

    /// `if-expr := 'if' expr block ('elif' expr block)* ('else' block)?`
    fn parse_if(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("if")?.start;
        let mut cases = Vec::new();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        let mut end = body.span.end.clone();
        cases.push(IfCase { cond: Box::new(cond), body: Box::new(body) });

        while self.check_keyword("elif") {
            self.advance();
            let cond = self.parse_expr()?;
            let body = self.parse_block()?;
            end = body.span.end.clone();
            cases.push(IfCase { cond: Box::new(cond), body: Box::new(body) });
        }

        let else_body = if self.check_keyword("else") {
            self.advance();
            let body = self.parse_block()?;
            end = body.span.end.clone();
            Some(Box::new(body))
        } else {
            None
        };

        Ok(Node::new(NodeKind::If { cases, else_body }, Span::new(start, end)))
    }

    /// `while-expr := 'while' expr block`
    fn parse_while(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("while")?.start;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        let end = body.span.end.clone();
        Ok(Node::new(NodeKind::While { cond: Box::new(cond), body: Box::new(body) }, Span::new(start, end)))
    }

    /// `for-expr := 'for' IDENT '=' expr 'to' expr ('step' expr)? block`
    ///
    /// `to` is a contextual keyword (lexed as a plain identifier; spec.md
    /// §3's keyword list omits it even though §4.2's grammar names it).
    fn parse_for(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("for")?.start;
        let (name, _) = self.expect_ident("loop variable")?;
        self.expect(TokenKind::Eq, "'='")?;
        let start_expr = self.parse_expr()?;

        if !self.check_contextual("to") {
            let tok = self.at().clone();
            return Err(PolyscriptError::invalid_syntax(
                format!("expected 'to', found {}", tok.kind),
                tok.start,
                tok.end,
            ));
        }
        self.advance();

        let end_expr = self.parse_expr()?;
        let step = if self.check_keyword("step") {
            self.advance();
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let body = self.parse_block()?;
        let end = body.span.end.clone();

        Ok(Node::new(
            NodeKind::For { name, start: Box::new(start_expr), end: Box::new(end_expr), step, body: Box::new(body) },
            Span::new(start, end),
        ))
    }

    /// `fn-decl := 'fn' IDENT? '(' params? ')' ('->' expr | block)`
    ///
    /// `-> expr` desugars to a block containing a single `Return(expr)`.
    fn parse_fn_decl(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("fn")?.start;

        let name = if let TokenKind::Ident(n) = &self.at().kind {
            let n = n.clone();
            self.advance();
            Some(n)
        } else {
            None
        };

        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !matches!(self.at().kind, TokenKind::RParen) {
            let (p, _) = self.expect_ident("parameter name")?;
            params.push(p);
            while matches!(self.at().kind, TokenKind::Comma) {
                self.advance();
                let (p, _) = self.expect_ident("parameter name")?;
                params.push(p);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;

        let (body, end) = if matches!(self.at().kind, TokenKind::Arrow) {
            self.advance();
            let expr = self.parse_expr()?;
            let end = expr.span.end.clone();
            let span = expr.span.clone();
            let ret = Node::new(NodeKind::Return(Some(Box::new(expr))), span.clone());
            (Node::new(NodeKind::Block(vec![ret]), span), end)
        } else {
            let block = self.parse_block()?;
            let end = block.span.end.clone();
            (block, end)
        };

        Ok(Node::new(
            NodeKind::FnDecl { name: name.clone(), params, body: Box::new(body), anonymous: name.is_none() },
            Span::new(start, end),
        ))
    }

    /// `'new' IDENT '(' args? ')'`
    fn parse_new(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("new")?.start;
        let (name, _) = self.expect_ident("blueprint name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let args = self.parse_args()?;
        let end_tok = self.expect(TokenKind::RParen, "')'")?;
        Ok(Node::new(NodeKind::New { name, args }, Span::new(start, end_tok.end)))
    }

    /// `'enum' IDENT '{' (IDENT (',' IDENT)* ','?)? '}'`
    fn parse_enum_decl(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("enum")?.start;
        let (name, _) = self.expect_ident("enum name")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();

        let mut members = Vec::new();
        if !matches!(self.at().kind, TokenKind::RBrace) {
            let (m, _) = self.expect_ident("enum member")?;
            members.push(m);
            self.skip_newlines();
            while matches!(self.at().kind, TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
                if matches!(self.at().kind, TokenKind::RBrace) {
                    break;
                }
                let (m, _) = self.expect_ident("enum member")?;
                members.push(m);
                self.skip_newlines();
            }
        }

        let close = self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Node::new(NodeKind::EnumDecl { name, members }, Span::new(start, close.end)))
    }

    /// `'namespace' IDENT block`
    fn parse_namespace_decl(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("namespace")?.start;
        let (name, _) = self.expect_ident("namespace name")?;
        let body = self.parse_block()?;
        let end = body.span.end.clone();
        Ok(Node::new(NodeKind::NamespaceDecl { name, body: Box::new(body) }, Span::new(start, end)))
    }

    /// `'object' IDENT block`
    fn parse_object_decl(&mut self) -> PResult<Node> {
        let start = self.expect_keyword("object")?.start;
        let (name, _) = self.expect_ident("object name")?;
        let body = self.parse_block()?;
        let end = body.span.end.clone();
        Ok(Node::new(NodeKind::ObjectDecl { name, body: Box::new(body) }, Span::new(start, end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::lexer::Lexer;

    fn parse_ok(src: &str) -> Node {
        let tokens = Lexer::new("<test>", src).make_tokens().expect("lex");
        Parser::new(tokens).parse().expect("parse")
    }

    fn parse_err(src: &str) -> PolyscriptError {
        let tokens = Lexer::new("<test>", src).make_tokens().expect("lex");
        Parser::new(tokens).parse().expect_err("expected parse error")
    }

    #[test]
    fn precedence_mul_over_add() {
        let ast = parse_ok("1 + 2 * 3");
        match &ast.kind {
            NodeKind::Block(stmts) => match &stmts[0].kind {
                NodeKind::BinOp { op: TokenKind::Plus, right, .. } => {
                    assert!(matches!(right.kind, NodeKind::BinOp { op: TokenKind::Mul, .. }));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let ast = parse_ok("2 ^ 3 ^ 2");
        match &ast.kind {
            NodeKind::Block(stmts) => match &stmts[0].kind {
                NodeKind::BinOp { op: TokenKind::Pow, right, .. } => {
                    assert!(matches!(right.kind, NodeKind::BinOp { op: TokenKind::Pow, .. }));
                }
                other => panic!("unexpected: {other:?}"),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn for_loop_requires_to() {
        let err = parse_err("for i = 1 5 { }");
        assert!(matches!(err, PolyscriptError::InvalidSyntax { .. }));
    }

    #[test]
    fn arrow_fn_desugars_to_return_block() {
        let ast = parse_ok("fn() -> 1");
        match &ast.kind {
            NodeKind::Block(stmts) => match &stmts[0].kind {
                NodeKind::FnDecl { body, .. } => match &body.kind {
                    NodeKind::Block(inner) => {
                        assert_eq!(inner.len(), 1);
                        assert!(matches!(inner[0].kind, NodeKind::Return(Some(_))));
                    }
                    _ => panic!("expected block body"),
                },
                _ => panic!("expected FnDecl"),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn unclosed_paren_is_syntax_error() {
        let err = parse_err("(1 + 2");
        assert!(matches!(err, PolyscriptError::InvalidSyntax { .. }));
    }

    #[test]
    fn parses_assignment_vs_equality() {
        let ast = parse_ok("x = 1");
        match &ast.kind {
            NodeKind::Block(stmts) => {
                assert!(matches!(stmts[0].kind, NodeKind::VarAssign { declare: false, .. }));
            }
            _ => unreachable!(),
        }

        let ast = parse_ok("x == 1");
        match &ast.kind {
            NodeKind::Block(stmts) => {
                assert!(matches!(stmts[0].kind, NodeKind::BinOp { op: TokenKind::Ee, .. }));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn list_index_call_form() {
        let ast = parse_ok("xs.(0)");
        match &ast.kind {
            NodeKind::Block(stmts) => {
                assert!(matches!(stmts[0].kind, NodeKind::Index { .. }));
            }
            _ => unreachable!(),
        }
    }
}
