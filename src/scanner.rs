use crate::{
    error::{Diagnostics, Error, Result},
    token::{Token, TokenKind},
};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::str::Chars;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "and" => TokenKind::And,
    "class" => TokenKind::Class,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "nil" => TokenKind::Nil,
    "or" => TokenKind::Or,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "super" => TokenKind::Super,
    "this" => TokenKind::This,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
};

/// Yields one `Result<Token>` per lexeme and finishes with a single
/// `EndOfFile` token. A lexical error does not stop the scan.
pub struct Scanner<'a> {
    src: PeekMoreIterator<Chars<'a>>,
    lexeme_buffer: String,
    line: usize,
    finished: bool,
}

impl <'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        loop {
            if self.finished {
                return None;
            }

            let kind = match self.next_token_kind() {
                Some(kind) => kind,
                None => {
                    self.lexeme_buffer.clear();
                    if self.src.peek().is_some() { continue }
                    self.finished = true;
                    Ok(TokenKind::EndOfFile)
                },
            };

            let lexeme = self.lexeme_buffer.clone();
            self.lexeme_buffer.clear();

            return Some(kind.map(|kind| Token {
                kind,
                lexeme,
                line: self.line,
            }));
        }
    }
}

impl <'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.chars().peekmore(),
            lexeme_buffer: String::new(),
            line: 1,
            finished: false,
        }
    }

    /// Scans the whole source. The token list always ends in `EndOfFile`,
    /// even when errors were found.
    pub fn scan_tokens(self) -> (Vec<Token>, Diagnostics) {
        let mut tokens = Vec::new();
        let mut errors = Diagnostics::new();
        for t in self {
            match t {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }
        (tokens, errors)
    }

    /// `None` means the characters consumed produce no token.
    fn next_token_kind(&mut self) -> Option<Result<TokenKind>> {
        let next_char = self.src.next()?;
        self.lexeme_buffer.push(next_char);

        use TokenKind::*;
        match next_char {
            '(' => Some(Ok(LeftParen)),
            ')' => Some(Ok(RightParen)),
            '{' => Some(Ok(LeftBrace)),
            '}' => Some(Ok(RightBrace)),
            ',' => Some(Ok(Comma)),
            '.' => Some(Ok(Dot)),
            '-' => Some(Ok(Minus)),
            '+' => Some(Ok(Plus)),
            ';' => Some(Ok(Semicolon)),
            '*' => Some(Ok(Star)),
            '!' => Some(Ok(if self.does_next_match('=') { BangEqual } else { Bang })),
            '=' => Some(Ok(if self.does_next_match('=') { EqualEqual } else { Equal })),
            '<' => Some(Ok(if self.does_next_match('=') { LessEqual } else { Less })),
            '>' => Some(Ok(if self.does_next_match('=') { GreaterEqual } else { Greater })),
            '/' => {
                if self.does_next_match('/') { // is this a comment?
                    self.advance_until_match('\n');
                    None
                } else {
                    Some(Ok(Slash))
                }
            },
            ' ' | '\r' | '\t' => None,
            '\n' => {
                self.line += 1;
                None
            },
            '"' => Some(self.extract_string()),
            c if c.is_ascii_digit() => Some(self.extract_number()),
            c if can_start_identifier(&c) => Some(self.extract_identifier()),
            _ => Some(Err(Error::lexical(self.line, "unexpected character"))),
        }
    }

    fn does_next_match(&mut self, c: char) -> bool {
        match self.src.peek() {
            Some(next) if c == *next => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.src.next()?;
        self.lexeme_buffer.push(next);
        Some(next)
    }

    fn extract_string(&mut self) -> Result<TokenKind> {
        let mut newline_count = 0;
        self.advance_until_match_for_each('"', |c| if c == '\n' { newline_count += 1 });
        self.line += newline_count;
        match self.advance() {
            None => Err(Error::lexical(self.line, "unterminated string")),
            Some(_) => {
                let contents = &self.lexeme_buffer[1..self.lexeme_buffer.len() - 1];
                Ok(TokenKind::String(contents.to_string()))
            },
        }
    }

    fn extract_number(&mut self) -> Result<TokenKind> {
        self.advance_until(|n| !n.is_ascii_digit());

        // A trailing '.' is only part of the number when a digit follows it.
        let is_fraction = self.src.peek() == Some(&'.')
            && self.src.peek_nth(1).map_or(false, |c| c.is_ascii_digit());
        if is_fraction {
            self.advance();
            self.advance_until(|n| !n.is_ascii_digit());
        }

        match self.lexeme_buffer.parse() {
            Err(_) => Err(Error::lexical(self.line, "unparseable number")),
            Ok(number) => Ok(TokenKind::Number(number)),
        }
    }

    fn extract_identifier(&mut self) -> Result<TokenKind> {
        self.advance_until(|n| !is_part_of_valid_identifier(n));

        let text = self.lexeme_buffer.as_str();
        match KEYWORDS.get(text) {
            Some(token) => Ok(token.clone()),
            None => Ok(TokenKind::Identifier)
        }
    }

    fn advance_until_match(&mut self, c: char) {
        self.advance_until(|n| n == &c)
    }

    fn advance_until(&mut self, should_stop: impl Fn(&char) -> bool) {
        self.advance_until_for_each(should_stop, |_| {})
    }

    fn advance_until_match_for_each(
        &mut self,
        c: char,
        f: impl FnMut(char),
    ) {
        self.advance_until_for_each(|n| n == &c, f);
    }

    fn advance_until_for_each(
        &mut self,
        should_stop: impl Fn(&char) -> bool,
        mut f: impl FnMut(char),
    ) {
        while let Some(next) = self.src.peek() {
            if should_stop(next) {
                break;
            }
            if let Some(next) = self.advance() {
                f(next);
            }
        }
    }
}

fn can_start_identifier(c: &char) -> bool {
    c.is_ascii_alphabetic() || c == &'_'
}

fn is_part_of_valid_identifier(c: &char) -> bool {
    can_start_identifier(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Scanner::new(src).scan_tokens();
        assert!(errors.is_empty(), "unexpected errors: {}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn first_error(src: &str) -> String {
        let (_, errors) = Scanner::new(src).scan_tokens();
        errors.first().map(|e| e.to_string()).unwrap_or_default()
    }

    #[test]
    fn empty_source_is_just_end_of_file() {
        let (tokens, errors) = Scanner::new("").scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(vec![Token::end_of_file(1)], tokens);
    }

    #[test]
    fn single_character_punctuation() {
        use TokenKind::*;
        assert_eq!(
            vec![LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus, Semicolon, Star, EndOfFile],
            kinds("(){},.-+;*")
        );
    }

    #[test]
    fn one_or_two_character_operators() {
        use TokenKind::*;
        assert_eq!(
            vec![Bang, BangEqual, Equal, EqualEqual, Less, LessEqual, Greater, GreaterEqual, EndOfFile],
            kinds("! != = == < <= > >=")
        );
    }

    #[test]
    fn two_character_operators_keep_their_lexeme() {
        let (tokens, _) = Scanner::new(">=").scan_tokens();
        assert_eq!(">=", tokens[0].lexeme());
    }

    #[test]
    fn comments_run_to_end_of_line() {
        use TokenKind::*;
        assert_eq!(vec![Slash, Plus, EndOfFile], kinds("/ // ignored ( ) \"\n+"));
    }

    #[test]
    fn comment_at_end_of_input() {
        assert_eq!(vec![TokenKind::EndOfFile], kinds("// nothing else"));
    }

    #[test]
    fn literals_scan_to_one_token_and_end_of_file() {
        let cases = vec![
            ("123", TokenKind::Number(123.0)),
            ("45.67", TokenKind::Number(45.67)),
            ("\"hello\"", TokenKind::String("hello".into())),
            ("\"\"", TokenKind::String("".into())),
            ("true", TokenKind::True),
            ("false", TokenKind::False),
            ("nil", TokenKind::Nil),
        ];
        for (src, expected) in cases {
            let (tokens, errors) = Scanner::new(src).scan_tokens();
            assert!(errors.is_empty());
            assert_eq!(2, tokens.len(), "{}", src);
            assert_eq!(expected, tokens[0].kind);
            assert_eq!(src, tokens[0].lexeme);
            assert_eq!(1, tokens[0].line);
            assert_eq!(Token::end_of_file(1), tokens[1]);
        }
    }

    #[test]
    fn string_literal_value_excludes_quotes() {
        let (tokens, _) = Scanner::new("\"a b\"").scan_tokens();
        assert_eq!(Some(crate::value::Value::String("a b".into())), tokens[0].literal());
    }

    #[test]
    fn strings_count_embedded_newlines() {
        let (tokens, _) = Scanner::new("\"a\nb\nc\" +").scan_tokens();
        assert_eq!(TokenKind::String("a\nb\nc".into()), tokens[0].kind);
        assert_eq!(3, tokens[1].line);
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        use TokenKind::*;
        assert_eq!(vec![Number(123.0), Dot, EndOfFile], kinds("123."));
        assert_eq!(vec![Number(1.0), Dot, Identifier, EndOfFile], kinds("1.a"));
    }

    #[test]
    fn leading_dot_is_not_part_of_number() {
        use TokenKind::*;
        assert_eq!(vec![Dot, Number(5.0), EndOfFile], kinds(".5"));
    }

    #[test]
    fn keywords_are_case_sensitive() {
        use TokenKind::*;
        assert_eq!(vec![Print, Identifier, Identifier, EndOfFile], kinds("print Print PRINT"));
    }

    #[test]
    fn all_keywords_are_recognised() {
        use TokenKind::*;
        assert_eq!(
            vec![And, Class, Else, False, Fun, For, If, Nil, Or, Print, Return, Super, This, True, Var, While, EndOfFile],
            kinds("and class else false fun for if nil or print return super this true var while")
        );
    }

    #[test]
    fn identifiers_allow_underscores_and_digits() {
        let (tokens, _) = Scanner::new("_foo_1 bar2").scan_tokens();
        assert_eq!(TokenKind::Identifier, tokens[0].kind);
        assert_eq!("_foo_1", tokens[0].lexeme);
        assert_eq!("bar2", tokens[1].lexeme);
    }

    #[test]
    fn newlines_advance_the_line() {
        let (tokens, _) = Scanner::new("1\n2\n\n3").scan_tokens();
        let lines: Vec<_> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(vec![1, 2, 4, 4], lines);
    }

    #[test]
    fn unexpected_character_reports_line() {
        assert_eq!("[line 1] Error: unexpected character", first_error("@"));
        assert_eq!("[line 3] Error: unexpected character", first_error("1\n2\n#"));
        assert_eq!("[line 2] Error: unexpected character", first_error("// note\n$"));
    }

    #[test]
    fn scanning_continues_after_unexpected_character() {
        let (tokens, errors) = Scanner::new("1 @ 2 # 3").scan_tokens();
        assert_eq!(2, errors.len());
        let numbers: Vec<_> = tokens.iter().filter_map(|t| t.literal()).collect();
        assert_eq!(3, numbers.len());
        assert!(tokens.last().map_or(false, Token::is_end_of_file));
    }

    #[test]
    fn unterminated_string_reports_last_line() {
        assert_eq!("[line 1] Error: unterminated string", first_error("\"abc"));
        assert_eq!("[line 3] Error: unterminated string", first_error("\"a\nb\nc"));
        assert_eq!("[line 2] Error: unterminated string", first_error("\"abc\n"));
    }

    #[test]
    fn end_of_file_is_on_final_line() {
        let (tokens, _) = Scanner::new("1\n2\n").scan_tokens();
        assert_eq!(Some(&Token::end_of_file(3)), tokens.last());
    }
}
