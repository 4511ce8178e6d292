//! Tokenizes mew source text into a stream of [`Token`]s.

use mew_base::{Diagnostic, Interner, Span};

use crate::token::{Token, TokenKind};

/// Converts UTF-8 source into a token stream with positional tracking.
///
/// Whitespace (spaces/tabs) and comments (`//`, `///`, `/* ... */`) are
/// consumed without producing tokens; a `/* ... */` spanning multiple
/// lines still advances `lineno` for every embedded newline.
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    lineno: i64,
    filename: String,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, filename: impl Into<String>) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            lineno: 1,
            filename: filename.into(),
        }
    }

    /// Lexes the entire source, returning all tokens (with a trailing
    /// `Eof`) or the first illegal-character diagnostic encountered.
    pub fn tokenize(mut self, interner: &mut Interner) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            self.skip_ignored();
            if self.at_end() {
                tokens.push(Token::new(
                    TokenKind::Eof,
                    mew_base::Symbol::EMPTY,
                    Span::new(self.lineno, self.pos as i64),
                ));
                return Ok(tokens);
            }
            tokens.push(self.next_token(interner)?);
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn advance(&mut self) -> u8 {
        let c = self.peek();
        self.pos += 1;
        c
    }

    /// Skips spaces/tabs and comments. Newlines are NOT skipped here — they
    /// are significant statement terminators and are tokenized explicitly.
    fn skip_ignored(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\t' => {
                    self.pos += 1;
                }
                b'/' if self.peek_at(1) == b'/' => {
                    while !self.at_end() && self.peek() != b'\n' {
                        self.pos += 1;
                    }
                }
                b'/' if self.peek_at(1) == b'*' => {
                    self.pos += 2;
                    while !self.at_end() && !(self.peek() == b'*' && self.peek_at(1) == b'/') {
                        if self.peek() == b'\n' {
                            self.lineno += 1;
                        }
                        self.pos += 1;
                    }
                    if !self.at_end() {
                        self.pos += 2; // consume `*/`
                    }
                }
                _ => return,
            }
        }
    }

    fn next_token(&mut self, interner: &mut Interner) -> Result<Token, Diagnostic> {
        let start_pos = self.pos;
        let start_line = self.lineno;
        let c = self.peek();

        if c == b'\n' {
            self.pos += 1;
            self.lineno += 1;
            return Ok(Token::new(
                TokenKind::Newline,
                mew_base::Symbol::EMPTY,
                Span::new(start_line, start_pos as i64),
            ));
        }

        if c.is_ascii_digit() {
            return Ok(self.lex_number(interner, start_line, start_pos));
        }

        if c == b'"' {
            return self.lex_string(interner, start_line, start_pos);
        }

        if c == b'_' || c.is_ascii_alphabetic() {
            return Ok(self.lex_ident(interner, start_line, start_pos));
        }

        self.lex_punct(start_line, start_pos)
    }

    fn lex_number(&mut self, interner: &mut Interner, line: i64, start: usize) -> Token {
        if self.peek() == b'0' && matches!(self.peek_at(1), b'x' | b'o' | b'b') {
            self.pos += 2;
            while self.peek().is_ascii_alphanumeric() {
                self.pos += 1;
            }
        } else {
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
            if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
                self.pos += 1;
                while self.peek().is_ascii_digit() {
                    self.pos += 1;
                }
                let text = &self.source[start..self.pos];
                let sym = interner.intern(text);
                return Token::new(TokenKind::Float, sym, Span::new(line, start as i64));
            }
        }
        let text = &self.source[start..self.pos];
        let sym = interner.intern(text);
        Token::new(TokenKind::Integer, sym, Span::new(line, start as i64))
    }

    fn lex_string(
        &mut self,
        interner: &mut Interner,
        line: i64,
        start: usize,
    ) -> Result<Token, Diagnostic> {
        self.pos += 1; // opening quote
        loop {
            if self.at_end() {
                return Err(Diagnostic::error(
                    self.filename.as_str(),
                    Span::new(line, start as i64),
                    "unterminated string literal",
                ));
            }
            match self.advance() {
                b'\\' => {
                    if !self.at_end() {
                        self.pos += 1;
                    }
                }
                b'"' => break,
                b'\n' => self.lineno += 1,
                _ => {}
            }
        }
        // Store the raw text between the quotes, with `\"` unescaped,
        // matching the original parser's extern/string handling.
        let raw = &self.source[start + 1..self.pos - 1];
        let unescaped = raw.replace("\\\"", "\"");
        let sym = interner.intern(&unescaped);
        Ok(Token::new(TokenKind::String, sym, Span::new(line, start as i64)))
    }

    fn lex_ident(&mut self, interner: &mut Interner, line: i64, start: usize) -> Token {
        while self.peek() == b'_' || self.peek().is_ascii_alphanumeric() {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        let sym = interner.intern(text);
        let kind = TokenKind::lookup_reserved(text).unwrap_or(TokenKind::Id);
        Token::new(kind, sym, Span::new(line, start as i64))
    }

    fn lex_punct(&mut self, line: i64, start: usize) -> Result<Token, Diagnostic> {
        let two = (self.peek(), self.peek_at(1));
        let (kind, len) = match two {
            (b'=', b'=') => (TokenKind::Equal, 2),
            (b'!', b'=') => (TokenKind::NotEqual, 2),
            (b'<', b'=') => (TokenKind::LessEq, 2),
            (b'>', b'=') => (TokenKind::GreaterEq, 2),
            (b'-', b'>') => (TokenKind::Arrow, 2),
            (b'+', b'+') => (TokenKind::PlusPlus, 2),
            (b'-', b'-') => (TokenKind::MinusMinus, 2),
            (b'+', b'=') => (TokenKind::PlusAssign, 2),
            (b'-', b'=') => (TokenKind::MinusAssign, 2),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', _) => (TokenKind::Mul, 1),
            (b'/', _) => (TokenKind::Div, 1),
            (b'=', _) => (TokenKind::Assign, 1),
            (b'<', _) => (TokenKind::Less, 1),
            (b'>', _) => (TokenKind::Greater, 1),
            (b'(', _) => (TokenKind::ParenOpen, 1),
            (b')', _) => (TokenKind::ParenClose, 1),
            (b'{', _) => (TokenKind::CurlyOpen, 1),
            (b'}', _) => (TokenKind::CurlyClose, 1),
            (b'[', _) => (TokenKind::BracketOpen, 1),
            (b']', _) => (TokenKind::BracketClose, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b'.', _) => (TokenKind::Dot, 1),
            (b';', _) => (TokenKind::Semicolon, 1),
            (b'#', _) => (TokenKind::Hash, 1),
            _ => {
                let bad = self.peek() as char;
                return Err(Diagnostic::error(
                    self.filename.as_str(),
                    Span::new(line, start as i64),
                    format!("illegal character {:?}", bad),
                ));
            }
        };
        self.pos += len;
        Ok(Token::new(kind, mew_base::Symbol::EMPTY, Span::new(line, start as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        Lexer::new(src, "test.mew")
            .tokenize(&mut interner)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_integer_declaration() {
        let kinds = kinds("u32 a = 1;");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Id,
                TokenKind::Id,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_hex_octal_binary_integers() {
        let mut interner = Interner::new();
        let toks = Lexer::new("0xFF 0o17 0b101", "t.mew")
            .tokenize(&mut interner)
            .unwrap();
        assert_eq!(interner.resolve(toks[0].lexeme), "0xFF");
        assert_eq!(interner.resolve(toks[1].lexeme), "0o17");
        assert_eq!(interner.resolve(toks[2].lexeme), "0b101");
    }

    #[test]
    fn tokenizes_reserved_words() {
        let kinds = kinds("if else while func return new struct warning extern loop break continue true false use");
        assert_eq!(
            kinds,
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Func,
                TokenKind::Return,
                TokenKind::New,
                TokenKind::Struct,
                TokenKind::Warning,
                TokenKind::Extern,
                TokenKind::Loop,
                TokenKind::Break,
                TokenKind::Continue,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Use,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_compound_operators() {
        let kinds = kinds("== != <= >= -> ++ -- += -=");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::Arrow,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusAssign,
                TokenKind::MinusAssign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_unescapes_quotes() {
        let mut interner = Interner::new();
        let toks = Lexer::new(r#""hello \"world\"""#, "t.mew")
            .tokenize(&mut interner)
            .unwrap();
        assert_eq!(interner.resolve(toks[0].lexeme), "hello \"world\"");
    }

    #[test]
    fn line_comment_is_ignored() {
        let kinds = kinds("u32 a = 1; // a comment\n");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Id,
                TokenKind::Id,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn block_comment_advances_lineno() {
        let mut interner = Interner::new();
        let toks = Lexer::new("/* line1\nline2 */ u32", "t.mew")
            .tokenize(&mut interner)
            .unwrap();
        assert_eq!(toks[0].span.line, 3);
    }

    #[test]
    fn newline_advances_lineno() {
        let mut interner = Interner::new();
        let toks = Lexer::new("a\nb", "t.mew").tokenize(&mut interner).unwrap();
        // a, newline, b, eof
        assert_eq!(toks[2].span.line, 2);
    }

    #[test]
    fn illegal_character_produces_diagnostic() {
        let mut interner = Interner::new();
        let err = Lexer::new("u32 a = 1 $ 2;", "t.mew")
            .tokenize(&mut interner)
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.message.contains('$'));
    }

    #[test]
    fn lex_position_is_within_its_line() {
        let mut interner = Interner::new();
        let source = "u32 a = 1;\nu32 b = 2;\n";
        let toks = Lexer::new(source, "t.mew").tokenize(&mut interner).unwrap();
        let line_lens: Vec<usize> = source.split('\n').map(|l| l.len() + 1).collect();
        for tok in &toks {
            if tok.span.line < 1 {
                continue;
            }
            let line_start: usize = line_lens[..(tok.span.line - 1) as usize].iter().sum();
            let line_end = line_start + line_lens[(tok.span.line - 1) as usize];
            assert!((tok.span.pos as usize) >= line_start && (tok.span.pos as usize) < line_end);
        }
    }
}
