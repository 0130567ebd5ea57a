use std::result;
use std::fmt::{self, Display};

use crate::token::Token;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    Lexical { line: usize },
    Syntactic { token: Token },
    Runtime { token: Token },
    Io(std::io::Error),
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn lexical<S: Into<String>>(line: usize, message: S) -> Error {
        let kind = ErrorKind::Lexical { line };
        Error { kind, message: message.into() }
    }

    pub fn syntactic<S: Into<String>>(token: Token, message: S) -> Error {
        let kind = ErrorKind::Syntactic { token };
        Error { kind, message: message.into() }
    }

    pub fn runtime<S: Into<String>>(token: Token, message: S) -> Error {
        let kind = ErrorKind::Runtime { token };
        Error { kind, message: message.into() }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The 1-based source line the error was detected on, if it has one.
    pub fn line(&self) -> Option<usize> {
        use ErrorKind::*;
        match self.kind() {
            Lexical { line } => Some(*line),
            Syntactic { token } | Runtime { token } => Some(token.line),
            Io(_) => None,
        }
    }

    pub fn is_syntax_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Lexical { .. } | ErrorKind::Syntactic { .. })
    }

    pub fn is_runtime_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Runtime { .. })
    }

    fn loc(token: &Token) -> String {
        if token.is_end_of_file() {
            "end".to_string()
        } else {
            format!("'{}'", token.lexeme)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;
        match self.kind() {
            Lexical { line } => write!(f, "[line {}] Error: {}", line, self.message),
            Syntactic { token } => write!(
                f,
                "[line {}] syntax error at {}: {}",
                token.line,
                Error::loc(token),
                self.message
            ),
            Runtime { token } => write!(f, "[line {}] runtime error: {}", token.line, self.message),
            Io(e) => write!(f, "{}: {}", self.message, e),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> std::io::Error {
        match e.kind {
            ErrorKind::Io(inner) => inner,
            _ => std::io::Error::new(std::io::ErrorKind::Other, e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error { kind: ErrorKind::Io(e), message: "IO error".into() }
    }
}

/// Every error found in one pass over a source chunk, in the order found.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn first(&self) -> Option<&Error> {
        self.errors.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn lexical_errors_render_with_line() {
        let e = Error::lexical(3, "unexpected character");
        assert_eq!("[line 3] Error: unexpected character", e.to_string());
    }

    #[test]
    fn syntax_errors_render_offending_lexeme() {
        let token = Token::new(TokenKind::RightParen, ")", 2);
        let e = Error::syntactic(token, "expect expression");
        assert_eq!("[line 2] syntax error at ')': expect expression", e.to_string());
    }

    #[test]
    fn syntax_errors_at_end_of_file_render_at_end() {
        let e = Error::syntactic(Token::end_of_file(4), "expect ';' after value");
        assert_eq!("[line 4] syntax error at end: expect ';' after value", e.to_string());
    }

    #[test]
    fn runtime_errors_render_with_operator_line() {
        let token = Token::new(TokenKind::Minus, "-", 7);
        let e = Error::runtime(token, "operand to - must be a number");
        assert_eq!("[line 7] runtime error: operand to - must be a number", e.to_string());
        assert!(e.is_runtime_error());
        assert!(!e.is_syntax_error());
    }

    #[test]
    fn diagnostics_join_errors_with_newlines() {
        let mut d = Diagnostics::new();
        d.push(Error::lexical(1, "unexpected character"));
        d.push(Error::lexical(2, "unterminated string"));
        assert_eq!(2, d.len());
        assert_eq!(
            "[line 1] Error: unexpected character\n[line 2] Error: unterminated string",
            d.to_string()
        );
    }
}
