//! SQL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// Collapses SQL text into a single line.
///
/// `--` and `/* */` comments outside quoted literals are removed, runs of
/// whitespace (including inside literals) become one space, and the result
/// is trimmed. Every later span refers to this normalized text.
#[must_use]
pub fn normalize(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    let flush = |out: &mut String, pending_space: &mut bool| {
        if *pending_space && !out.is_empty() {
            out.push(' ');
        }
        *pending_space = false;
    };

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            flush(&mut out, &mut pending_space);
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(if escaped.is_whitespace() { ' ' } else { escaped });
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            c if c.is_whitespace() => pending_space = true,
            '-' if chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
                pending_space = true;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
                pending_space = true;
            }
            '\'' | '"' | '`' => {
                flush(&mut out, &mut pending_space);
                out.push(c);
                quote = Some(c);
            }
            _ => {
                flush(&mut out, &mut pending_space);
                out.push(c);
            }
        }
    }

    out
}

/// A lexer that tokenizes normalized SQL.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances if the current character is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn lexeme(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = self.lexeme();
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Scans an unsigned number (`12`, `12.5`).
    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let rest = &self.input[self.pos..];
        let mut ahead = rest.chars();
        if ahead.next() == Some('.') && ahead.next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        self.make_token(TokenKind::Number(self.lexeme().to_string()))
    }

    /// Scans a quoted literal, keeping the quotes in the lexeme.
    ///
    /// Backslash escapes the next character and a doubled quote stands for
    /// one quote. An unterminated literal runs to the end of input.
    fn scan_quoted(&mut self, quote: char) -> Token {
        loop {
            match self.advance() {
                Some('\\') => {
                    self.advance();
                }
                Some(c) if c == quote => {
                    if !self.eat(quote) {
                        break;
                    }
                }
                Some(_) => {}
                None => break,
            }
        }

        self.make_token(TokenKind::String(self.lexeme().to_string()))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            '.' => self.make_token(TokenKind::Dot),
            '*' => self.make_token(TokenKind::Star),
            ';' => self.make_token(TokenKind::Semicolon),
            '=' => {
                // `==` is accepted as a sloppy spelling of `=`.
                self.eat('=');
                self.make_token(TokenKind::Eq)
            }
            '<' => {
                if self.eat('=') {
                    self.make_token(TokenKind::LtEq)
                } else if self.eat('>') {
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.eat('=') {
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' => {
                if self.eat('=') {
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Symbol(String::from("!")))
                }
            }
            '|' | ':' => {
                self.eat(c);
                self.make_token(TokenKind::Symbol(self.lexeme().to_string()))
            }
            '\'' | '"' | '`' => self.scan_quoted(c),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            _ => self.make_token(TokenKind::Symbol(c.to_string())),
        }
    }

    /// Tokenizes the entire input.
    ///
    /// The returned vector does not contain the trailing EOF token: callers
    /// work on sub-slices of it and treat the slice end as end of input.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.is_eof() {
                break;
            }
            tokens.push(token);
        }
        tokens
    }
}
