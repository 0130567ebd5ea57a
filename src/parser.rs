use std::iter::Peekable;

use crate::{
    error::{Diagnostics, Error, Result},
    expr::Expr,
    stmt::Stmt,
    token::*,
    value::Value,
};

const EQUALITY_TOKENS: &[&TokenKind] = &[
    &TokenKind::BangEqual,
    &TokenKind::EqualEqual,
];

const COMPARISON_TOKENS: &[&TokenKind] = &[
    &TokenKind::Greater,
    &TokenKind::GreaterEqual,
    &TokenKind::Less,
    &TokenKind::LessEqual,
];

const TERM_TOKENS: &[&TokenKind] = &[
    &TokenKind::Minus,
    &TokenKind::Plus,
];

const FACTOR_TOKENS: &[&TokenKind] = &[
    &TokenKind::Star,
    &TokenKind::Slash,
];

const UNARY_TOKENS: &[&TokenKind] = &[
    &TokenKind::Bang,
    &TokenKind::Minus,
];

/// Deepest expression tree the parser will build. Groups, prefix operators
/// and each operator in a binary chain count one level. Evaluating, printing
/// and dropping a tree all recurse on its depth.
pub const MAX_DEPTH: usize = 128;

pub struct Parser<T> {
    tokens: T,
    line: usize,
    depth: usize,
}

impl <T: Iterator<Item = Token>> Parser<Peekable<T>> {
    pub fn new(tokens: T) -> Self {
        let tokens = tokens.peekable();
        Parser { tokens, line: 1, depth: 0 }
    }

    /// Parses a whole program. A statement that fails to parse is recorded in
    /// the returned diagnostics and skipped; parsing resumes at the next
    /// statement boundary.
    pub fn parse(&mut self) -> (Vec<Stmt>, Diagnostics) {
        let mut statements = Vec::new();
        let mut errors = Diagnostics::new();

        while !self.is_at_end() {
            self.depth = 0;
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(e) => {
                    errors.push(e);
                    self.synchronise();
                }
            }
        }

        (statements, errors)
    }

    /// Parses a single expression spanning all of the input.
    pub fn parse_expression(&mut self) -> Result<Expr> {
        let expression = self.expression()?;
        if !self.is_at_end() {
            return Err(self.error_at_next("expect end of expression"));
        }
        Ok(expression)
    }

    fn statement(&mut self) -> Result<Stmt> {
        if self.match_single(&TokenKind::Print).is_some() {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let expression = self.expression()?;
        self.consume(&TokenKind::Semicolon, "expect ';' after value")?;
        Ok(Stmt::new_print(expression))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expression = self.expression()?;
        self.consume(&TokenKind::Semicolon, "expect ';' after expression")?;
        Ok(Stmt::new_expression(expression))
    }

    fn expression(&mut self) -> Result<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::comparison,
            EQUALITY_TOKENS
        )
    }

    fn comparison(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::term,
            COMPARISON_TOKENS
        )
    }

    fn term(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::factor,
            TERM_TOKENS
        )
    }

    fn factor(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::unary,
            FACTOR_TOKENS
        )
    }

    fn unary(&mut self) -> Result<Expr> {
        if let Some(token) = self.match_any(UNARY_TOKENS) {
            let operand = Box::new(self.nested(Self::unary)?);
            Ok(Expr::new_unary(token, operand))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let literal = match self.tokens.peek().map(|t| &t.kind) {
            Some(TokenKind::False) => Some(Value::Bool(false)),
            Some(TokenKind::True) => Some(Value::Bool(true)),
            Some(TokenKind::Nil) => Some(Value::Nil),
            Some(TokenKind::Number(n)) => Some(Value::Number(*n)),
            Some(TokenKind::String(s)) => Some(Value::String(s.clone())),
            _ => None,
        };

        if let Some(value) = literal {
            self.advance();
            return Ok(Expr::new_literal(value));
        }

        if self.match_single(&TokenKind::LeftParen).is_some() {
            let inner = Box::new(self.nested(Self::expression)?);
            self.consume(&TokenKind::RightParen, "expect ')' after expression")?;
            return Ok(Expr::new_group(inner));
        }

        Err(self.error_at_next("expect expression"))
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.next();
        if let Some(t) = &token {
            self.line = t.line;
        }
        token
    }

    fn is_at_end(&mut self) -> bool {
        self.tokens.peek().map_or(true, Token::is_end_of_file)
    }

    fn check_next(&mut self, kind: &TokenKind) -> bool {
        self.tokens.peek()
            .map(|t| &t.kind == kind)
            .unwrap_or(false)
    }

    /// Builds an error located at the next, unconsumed token.
    fn error_at_next(&mut self, message: &str) -> Error {
        let line = self.line;
        let token = self.tokens.peek()
            .cloned()
            .unwrap_or_else(|| Token::end_of_file(line));
        Error::syntactic(token, message)
    }

    fn consume(&mut self, kind: &TokenKind, error_msg: &str) -> Result<Token> {
        match self.match_single(kind) {
            Some(token) => Ok(token),
            None => Err(self.error_at_next(error_msg)),
        }
    }

    fn match_binary_precedence_with_tokens(
        &mut self,
        parse: impl Fn(&mut Self) -> Result<Expr>,
        kinds: &[&TokenKind]
    ) -> Result<Expr> {
        let mut e = parse(self)?;

        // Each operator deepens the left spine, so the chain holds its levels
        // until the whole chain is parsed.
        let outer = self.depth;
        while let Some(token) = self.match_any(kinds) {
            let right = self.deepen().and_then(|_| parse(self));
            let right = match right {
                Ok(right) => Box::new(right),
                Err(err) => {
                    self.depth = outer;
                    return Err(err);
                },
            };
            e = Expr::new_binary(Box::new(e), token, right)
        }
        self.depth = outer;

        Ok(e)
    }

    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<Expr>) -> Result<Expr> {
        self.deepen()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn deepen(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at_next("too much nesting"));
        }
        self.depth += 1;
        Ok(())
    }

    fn match_single(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check_next(kind) {
            self.advance()
        } else {
            None
        }
    }

    fn match_any(&mut self, kinds: &[&TokenKind]) -> Option<Token> {
        kinds.iter().find_map(|k| self.match_single(k))
    }

    /// Discards tokens up to and including the next `;`, or up to the next
    /// token that starts a statement. Always consumes at least one token
    /// unless the input is exhausted.
    fn synchronise(&mut self) {
        while !self.is_at_end() {
            let current = self.advance();
            if current.map_or(true, |t| t.kind == TokenKind::Semicolon) { break }

            if self.tokens.peek().map_or(false, |t| t.kind.starts_statement()) { break }
        }
    }
}
