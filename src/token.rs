use crate::value::Value;

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) lexeme: String,
    pub(crate) line: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    LeftParen, RightParen, LeftBrace, RightBrace,
    Comma, Dot, Minus, Plus, Semicolon, Slash, Star,

    Bang, BangEqual,
    Equal, EqualEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Identifier, String(String), Number(f64),

    And, Class, Else, False, Fun, For, If, Nil, Or,
    Print, Return, Super, This, True, Var, While,

    EndOfFile,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, lexeme: S, line: usize) -> Self {
        Token { kind, lexeme: lexeme.into(), line }
    }

    pub(crate) fn end_of_file(line: usize) -> Self {
        Token::new(TokenKind::EndOfFile, "", line)
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// The decoded value of a string or number literal.
    pub fn literal(&self) -> Option<Value> {
        match &self.kind {
            TokenKind::String(s) => Some(Value::String(s.clone())),
            TokenKind::Number(n) => Some(Value::Number(*n)),
            _ => None,
        }
    }

    pub fn is_end_of_file(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }
}

impl TokenKind {
    /// Tokens that begin a statement; the parser resumes at these after an error.
    pub(crate) fn starts_statement(&self) -> bool {
        use TokenKind::*;
        matches!(self, Class | Fun | Var | For | If | While | Print | Return)
    }
}
