use crate::{
    ast::Token,
    error::{Error, Result},
};

/// Scanner turning predicate text into tokens.
///
/// Input must be ASCII. Every token is reported with the byte offset where
/// it starts; once the input is exhausted [`Lexer::scan`] keeps returning
/// [`Token::Eof`].
pub struct Lexer {
    input: Vec<u8>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.as_bytes().to_vec(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<u8> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.current_char() {
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    fn read_string(&mut self) -> Result<String> {
        let start = self.position;
        self.advance(); // opening quote

        let mut result = String::new();
        loop {
            match self.current_char() {
                Some(b'\'') => {
                    self.advance();
                    return Ok(result);
                }
                Some(b'\\') => {
                    return Err(Error::lex(
                        self.position,
                        "backslash is not allowed in string literals",
                    ));
                }
                None | Some(b'\n') => {
                    return Err(Error::lex(start, "unterminated string literal"));
                }
                Some(ch) if !ch.is_ascii() => {
                    return Err(Error::lex(self.position, "non-ASCII input"));
                }
                Some(ch) => {
                    result.push(ch as char);
                    self.advance();
                }
            }
        }
    }

    fn read_digits(&mut self, radix: u32) -> &[u8] {
        let start = self.position;
        while self
            .current_char()
            .is_some_and(|c| (c as char).is_digit(radix))
        {
            self.advance();
        }
        &self.input[start..self.position]
    }

    /// Reject an identifier character glued onto a number, such as `12ab`.
    fn expect_number_end(&self, start: usize) -> Result<()> {
        match self.current_char() {
            Some(ch) if ch.is_ascii_alphanumeric() || ch == b'_' => {
                Err(Error::lex(start, "malformed integer literal"))
            }
            _ => Ok(()),
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;

        if self.current_char() == Some(b'0') {
            match self.peek_char(1) {
                Some(b'x' | b'X') => {
                    self.advance();
                    self.advance();
                    let digits = self.read_digits(16);
                    if digits.is_empty() {
                        return Err(Error::lex(start, "malformed hexadecimal literal"));
                    }
                    let text = String::from_utf8_lossy(digits).into_owned();
                    self.expect_number_end(start)?;
                    return i64::from_str_radix(&text, 16)
                        .map(Token::Integer)
                        .map_err(|_| Error::lex(start, "integer literal out of range"));
                }
                Some(ch) if ch.is_ascii_digit() => {
                    return Err(Error::lex(start, "integer literal with leading zero"));
                }
                _ => {}
            }
        }

        let text = String::from_utf8_lossy(self.read_digits(10)).into_owned();
        self.expect_number_end(start)?;
        text.parse::<i64>()
            .map(Token::Integer)
            .map_err(|_| Error::lex(start, "integer literal out of range"))
    }

    fn read_placeholder(&mut self) -> Result<Token> {
        let start = self.position;
        self.advance(); // '$'

        let digits = String::from_utf8_lossy(self.read_digits(10)).into_owned();
        if digits.is_empty() {
            return Err(Error::lex(start, "'$' must be followed by a placeholder index"));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(Error::lex(start, "placeholder index with leading zero"));
        }
        self.expect_number_end(start)?;
        digits
            .parse::<usize>()
            .map(Token::Placeholder)
            .map_err(|_| Error::lex(start, "placeholder index out of range"))
    }

    fn single(&mut self, token: Token) -> Result<Token> {
        self.advance();
        Ok(token)
    }

    /// One character, or two when followed by `=`.
    fn with_optional_eq(&mut self, short: Token, long: Token) -> Result<Token> {
        self.advance();
        if self.current_char() == Some(b'=') {
            self.advance();
            Ok(long)
        } else {
            Ok(short)
        }
    }

    /// Next token with its byte offset and literal text.
    pub fn scan(&mut self) -> Result<(usize, Token, String)> {
        let (pos, token) = self.next_token()?;
        let literal = token.literal();
        Ok((pos, token, literal))
    }

    /// Next token with its byte offset.
    pub fn next_token(&mut self) -> Result<(usize, Token)> {
        self.skip_whitespace();
        let pos = self.position;

        let token = match self.current_char() {
            None => Ok(Token::Eof),
            Some(ch) if !ch.is_ascii() => Err(Error::lex(pos, "non-ASCII input")),
            Some(b'(') => self.single(Token::LParen),
            Some(b')') => self.single(Token::RParen),
            Some(b'.') => self.single(Token::Dot),
            Some(b'=') => self.single(Token::Eq),
            Some(b'<') => self.with_optional_eq(Token::Lt, Token::LtEq),
            Some(b'>') => self.with_optional_eq(Token::Gt, Token::GtEq),
            Some(b'!') => {
                if self.peek_char(1) == Some(b'=') {
                    self.advance();
                    self.single(Token::NotEq)
                } else {
                    Err(Error::lex(pos, "unexpected '!' (did you mean '!='?)"))
                }
            }
            Some(b'\'') => self.read_string().map(Token::String),
            Some(b'$') => self.read_placeholder(),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_ascii_alphabetic() || ch == b'_' => {
                let ident = self.read_identifier();
                if ident.eq_ignore_ascii_case("and") {
                    Ok(Token::And)
                } else if ident.eq_ignore_ascii_case("or") {
                    Ok(Token::Or)
                } else {
                    Ok(Token::Ident(ident))
                }
            }
            Some(ch) => Err(Error::lex(
                pos,
                format!("unexpected character '{}'", ch as char),
            )),
        }?;

        Ok((pos, token))
    }
}
