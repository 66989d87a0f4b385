//! # Lexer Module
//!
//! Tokenization is, per the front-end's own charter, an "external"
//! collaborator in a full toolchain: a real build normally feeds this crate
//! a token stream produced by a shared lexer. This module nonetheless owns
//! the `Token`/`Terminal`/`Span` contract types (see [`token`]) and ships a
//! small hand-rolled scanner, used by this crate's own test fixtures and its
//! `bin` entry point, so that literal program text can be turned into a
//! token stream without pulling in a separate crate.

mod token;

pub use token::*;

use std::{error::Error, fmt::Display};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LexError(String);

pub type LexResult<T> = Result<T, LexError>;

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Error for LexError {}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    chars: Vec<char>,
    position: usize,
    col: usize,
    line: usize,
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: vec![],
            chars: input.chars().collect(),
            position: 0,
            col: 0,
            line: 0,
            input,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn here(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    fn span(&self, start: (usize, usize)) -> Span {
        Span::new(start, self.here(), self.input.to_string())
    }

    fn eat_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            while let Some(c) = self.peek() {
                if !c.is_whitespace() {
                    break;
                }
                self.advance();
            }

            if self.peek() == Some('/') && self.peek_at(1) == Some('/') {
                let start = self.here();
                let mut value = String::new();
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    value.push(c);
                    self.advance();
                }
                return Some(Token::Comment {
                    value,
                    position: self.span(start),
                });
            }

            return None;
        }
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let start = self.here();
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let position = self.span(start);
        match lookup_keyword(&word) {
            Some(terminal) => Token::from_keyword(terminal, position),
            None => Token::Id {
                value: word,
                position,
            },
        }
    }

    fn lex_number(&mut self) -> Token {
        let start = self.here();
        let mut number = String::new();
        let mut is_float = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                number.push(c);
                self.advance();
            } else if c == '.'
                && !is_float
                && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit())
            {
                is_float = true;
                number.push(c);
                self.advance();
            } else {
                break;
            }
        }

        self.skip_numeric_suffix();
        let position = self.span(start);

        if is_float {
            Token::FloatingPoint {
                value: number.parse().unwrap_or_default(),
                position,
            }
        } else {
            Token::Integer {
                value: number.parse().unwrap_or_default(),
                position,
            }
        }
    }

    /// Consumes an optional trailing width suffix (`i8`, `u32`, `f64`, ...)
    /// on a numeric literal. Widths are not yet threaded into the AST; this
    /// only prevents the suffix from being re-lexed as a separate identifier.
    fn skip_numeric_suffix(&mut self) {
        let save = (self.position, self.line, self.col);
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let is_width = matches!(
            word.as_str(),
            "i8" | "u8" | "i16" | "u16" | "i32" | "u32" | "i64" | "u64" | "f32" | "f64"
        );

        if !is_width {
            (self.position, self.line, self.col) = save;
        }
    }

    fn lex_escaped_char(&mut self) -> LexResult<char> {
        match self.advance() {
            Some('\\') => match self.advance() {
                Some('0') => Ok('\0'),
                Some('n') => Ok('\n'),
                Some('t') => Ok('\t'),
                Some('r') => Ok('\r'),
                Some('\'') => Ok('\''),
                Some('"') => Ok('"'),
                Some('\\') => Ok('\\'),
                Some(other) => Err(LexError(format!("unrecognized escape sequence '\\{other}'"))),
                None => Err(LexError("unterminated escape sequence".into())),
            },
            Some(c) => Ok(c),
            None => Err(LexError("unterminated literal".into())),
        }
    }

    fn lex_char(&mut self) -> LexResult<Token> {
        let start = self.here();
        self.advance(); // opening quote
        let c = self.lex_escaped_char()?;
        if self.peek() != Some('\'') {
            return Err(LexError("unterminated character literal".into()));
        }
        self.advance();
        Ok(Token::Character {
            value: format!("'{c}'"),
            position: self.span(start),
        })
    }

    fn lex_string(&mut self) -> LexResult<Token> {
        let start = self.here();
        self.advance(); // opening quote
        let mut value = String::new();
        while self.peek() != Some('"') {
            if self.peek().is_none() {
                return Err(LexError("unterminated string literal".into()));
            }
            value.push(self.lex_escaped_char()?);
        }
        self.advance();
        Ok(Token::Str {
            value,
            position: self.span(start),
        })
    }

    /// Tries to match one of the fixed operator/punctuation tokens at the
    /// current position, preferring the longest match.
    fn lex_operator(&mut self) -> LexResult<Token> {
        use Terminal::*;

        const TWO: &[(&str, Terminal)] = &[
            ("::", ColonColon),
            ("->", SmallRightArrow),
            ("=>", BigRightArrow),
            ("==", EqEq),
            ("!=", Ne),
            ("<=", Le),
            (">=", Ge),
            ("&&", AmpAmp),
            ("||", PipePipe),
            ("<<", Shl),
            (">>", Shr),
            ("+=", PlusEq),
            ("-=", MinusEq),
            ("*=", StarEq),
            ("/=", SlashEq),
            ("%=", PercentEq),
            ("&=", AmpEq),
            ("|=", PipeEq),
            ("^=", CaretEq),
            ("++", PlusPlus),
            ("--", MinusMinus),
        ];

        let start = self.here();
        let rest: String = self.chars[self.position..].iter().take(2).collect();

        for (lexeme, terminal) in TWO {
            if rest.starts_with(lexeme) {
                self.advance();
                self.advance();
                return Ok(Token::from_operator(*terminal, self.span(start)));
            }
        }

        let terminal = match self.peek() {
            Some('(') => LParen,
            Some(')') => RParen,
            Some('{') => LBrace,
            Some('}') => RBrace,
            Some('[') => LBracket,
            Some(']') => RBracket,
            Some(',') => Comma,
            Some(';') => Semicolon,
            Some(':') => Colon,
            Some('.') => Dot,
            Some('?') => Question,
            Some('#') => Hash,
            Some('@') => At,
            Some('+') => Plus,
            Some('-') => Minus,
            Some('*') => Star,
            Some('/') => Slash,
            Some('%') => Percent,
            Some('&') => Ampersand,
            Some('|') => Pipe,
            Some('^') => Caret,
            Some('~') => Tilde,
            Some('!') => ExclamationMark,
            Some('=') => Assign,
            Some('<') => Lt,
            Some('>') => Gt,
            Some('\\') => Backslash,
            Some(other) => return Err(LexError(format!("unrecognized character '{other}'"))),
            None => return Err(LexError("unexpected end of input".into())),
        };
        self.advance();
        Ok(Token::from_operator(terminal, self.span(start)))
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            if let Some(comment) = self.eat_whitespace_and_comments() {
                self.tokens.push(comment);
                continue;
            }

            let Some(c) = self.peek() else {
                return Ok(self.tokens);
            };

            let token = if c.is_alphabetic() || c == '_' {
                self.lex_ident_or_keyword()
            } else if c.is_ascii_digit() {
                self.lex_number()
            } else if c == '\'' {
                self.lex_char()?
            } else if c == '"' {
                self.lex_string()?
            } else {
                self.lex_operator()?
            };

            self.tokens.push(token);
        }
    }
}

impl Token {
    /// Builds the non-keyword operator/punctuation/delimiter variant for a
    /// given [`Terminal`]. Panics if `terminal` names a keyword or literal
    /// terminal, which is always a lexer bug.
    fn from_operator(terminal: Terminal, position: Span) -> Token {
        use Terminal::*;
        match terminal {
            LParen => Token::LParen { position },
            RParen => Token::RParen { position },
            LBrace => Token::LBrace { position },
            RBrace => Token::RBrace { position },
            LBracket => Token::LBracket { position },
            RBracket => Token::RBracket { position },
            Comma => Token::Comma { position },
            Semicolon => Token::Semicolon { position },
            Colon => Token::Colon { position },
            ColonColon => Token::ColonColon { position },
            SmallRightArrow => Token::SmallRightArrow { position },
            BigRightArrow => Token::BigRightArrow { position },
            Dot => Token::Dot { position },
            Question => Token::Question { position },
            Hash => Token::Hash { position },
            At => Token::At { position },
            Assign => Token::Assign { position },
            Minus => Token::Minus { position },
            Plus => Token::Plus { position },
            Star => Token::Star { position },
            Slash => Token::Slash { position },
            Percent => Token::Percent { position },
            Ampersand => Token::Ampersand { position },
            Pipe => Token::Pipe { position },
            Caret => Token::Caret { position },
            Tilde => Token::Tilde { position },
            ExclamationMark => Token::ExclamationMark { position },
            Shl => Token::Shl { position },
            Shr => Token::Shr { position },
            AmpAmp => Token::AmpAmp { position },
            PipePipe => Token::PipePipe { position },
            EqEq => Token::EqEq { position },
            Ne => Token::Ne { position },
            Lt => Token::Lt { position },
            Le => Token::Le { position },
            Gt => Token::Gt { position },
            Ge => Token::Ge { position },
            PlusEq => Token::PlusEq { position },
            MinusEq => Token::MinusEq { position },
            StarEq => Token::StarEq { position },
            SlashEq => Token::SlashEq { position },
            PercentEq => Token::PercentEq { position },
            AmpEq => Token::AmpEq { position },
            PipeEq => Token::PipeEq { position },
            CaretEq => Token::CaretEq { position },
            ShlEq => Token::ShlEq { position },
            ShrEq => Token::ShrEq { position },
            PlusPlus => Token::PlusPlus { position },
            MinusMinus => Token::MinusMinus { position },
            Backslash => Token::Backslash { position },
            other => unreachable!("{other:?} is not an operator terminal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_alphabetic_id() {
        let lexer = Lexer::new("letter");

        assert_eq!(
            Ok(vec![Token::Id {
                value: "letter".into(),
                position: Span::default(),
            }]),
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_numeric() {
        let lexer = Lexer::new("1337");

        assert_eq!(
            Ok(vec![Token::Integer {
                value: 1337,
                position: Span::default(),
            }]),
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_function() {
        let lexer = Lexer::new("fn () {}");

        assert_eq!(
            Ok(vec![
                Token::FnKeyword {
                    position: Span::default()
                },
                Token::LParen {
                    position: Span::default()
                },
                Token::RParen {
                    position: Span::default()
                },
                Token::LBrace {
                    position: Span::default()
                },
                Token::RBrace {
                    position: Span::default()
                },
            ]),
            lexer.lex()
        );
    }

    #[test]
    fn test_lex_let() {
        let lexer = Lexer::new("let foo = 42;");

        assert_eq!(
            Ok(vec![
                Token::Let {
                    position: Span::default()
                },
                Token::Id {
                    value: "foo".into(),
                    position: Span::default()
                },
                Token::Assign {
                    position: Span::default()
                },
                Token::Integer {
                    value: 42,
                    position: Span::default()
                },
                Token::Semicolon {
                    position: Span::default()
                },
            ]),
            lexer.lex()
        );
    }

    #[test]
    fn test_lex_compound_assignment_and_arrows() {
        let lexer = Lexer::new("x += 1; fn(x: i32): i32 => x");
        let tokens = lexer.lex().expect("should lex");
        assert!(tokens.iter().any(|t| matches!(t, Token::PlusEq { .. })));
        assert!(tokens
            .iter()
            .any(|t| matches!(t, Token::BigRightArrow { .. })));
    }

    #[test]
    fn test_lex_string_and_char_escapes() {
        let lexer = Lexer::new(r#" "a\nb" '\t' "#);
        let tokens = lexer.lex().expect("should lex");
        assert_eq!(
            tokens[0],
            Token::Str {
                value: "a\nb".into(),
                position: Span::default(),
            }
        );
        assert_eq!(
            tokens[1],
            Token::Character {
                value: "'\t'".into(),
                position: Span::default(),
            }
        );
    }

    #[test]
    fn test_lex_rejects_unknown_escape() {
        let lexer = Lexer::new(r#" "\q" "#);
        assert!(lexer.lex().is_err());
    }

    #[test]
    fn test_lex_comment() {
        let lexer = Lexer::new("// hello\nlet x");
        let tokens = lexer.lex().expect("should lex");
        assert!(matches!(tokens[0], Token::Comment { .. }));
        assert!(matches!(tokens[1], Token::Let { .. }));
    }
}
