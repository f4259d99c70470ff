//! Hand-written scanner for the Pascal subset.
//!
//! The scanner walks the source once, byte position plus 1-based
//! line/column, and applies an ordered rule list where the first matching
//! rule wins and each rule takes the longest prefix it can:
//!
//! 1. `{# ... #}` comments (multi-line, non-nesting, discarded)
//! 2. `"..."` string literals with `\`-escape pairs
//! 3. numeric literals `d+` optionally `.d+`
//! 4. relational operators `<= >= <> < > =`
//! 5. assignment `:=`
//! 6. arithmetic operators `+ - * /`
//! 7. punctuation `; , : . ( ) [ ]`
//! 8. identifiers `[A-Za-z_][A-Za-z0-9_]*`, promoted to a keyword kind
//!    when the lowercased text is reserved
//! 9. whitespace and newlines (skipped, position-tracked)
//!
//! Anything else is a [`LexError`] naming the character and position.
//! Tokens come out lazily: [`Lexer`] implements `Iterator`, and
//! [`tokenize`] collects the whole stream (ending with one `EOF`
//! sentinel) for the parser.

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use pascaline_base::{Interner, Span, Symbol};

/// Streaming scanner over a source string.
pub struct Lexer<'src, 'int> {
    source: &'src str,
    interner: &'int mut Interner,
    /// Byte offset of the next unread character.
    pos: usize,
    line: u32,
    column: u32,
    /// Set once the EOF token has been produced.
    finished: bool,
}

impl<'src, 'int> Lexer<'src, 'int> {
    pub fn new(source: &'src str, interner: &'int mut Interner) -> Self {
        Lexer {
            source,
            interner,
            pos: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Consumes one character, keeping line/column in sync.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Skips whitespace, newlines, and comments until a token can start.
    ///
    /// An unterminated comment is reported as an unexpected `{` at the
    /// position where it opened.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.bump();
                }
                Some('{') if self.peek_second() == Some('#') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek_char() {
                            Some('#') if self.peek_second() == Some('}') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                            None => {
                                return Err(LexError {
                                    ch: '{',
                                    line,
                                    column,
                                })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn make_token(&mut self, kind: TokenKind, start: usize, line: u32, column: u32) -> Token {
        let lexeme = self.interner.intern(&self.source[start..self.pos]);
        Token::new(kind, lexeme, line, column, Span::new(start, self.pos))
    }

    /// Produces the next token, or the EOF sentinel at end of input.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let start = self.pos;
        let (line, column) = (self.line, self.column);

        let c = match self.peek_char() {
            Some(c) => c,
            None => {
                return Ok(Token::new(
                    TokenKind::Eof,
                    Symbol::EMPTY,
                    line,
                    column,
                    Span::new(start, start),
                ))
            }
        };

        let kind = match c {
            '"' => {
                self.bump();
                loop {
                    match self.peek_char() {
                        Some('"') => {
                            self.bump();
                            break;
                        }
                        Some('\\') => {
                            self.bump();
                            if self.bump().is_none() {
                                return Err(LexError {
                                    ch: '"',
                                    line,
                                    column,
                                });
                            }
                        }
                        Some(_) => {
                            self.bump();
                        }
                        None => {
                            return Err(LexError {
                                ch: '"',
                                line,
                                column,
                            })
                        }
                    }
                }
                TokenKind::Str
            }
            '0'..='9' => {
                while matches!(self.peek_char(), Some('0'..='9')) {
                    self.bump();
                }
                if self.peek_char() == Some('.')
                    && matches!(self.peek_second(), Some('0'..='9'))
                {
                    self.bump();
                    while matches!(self.peek_char(), Some('0'..='9')) {
                        self.bump();
                    }
                }
                TokenKind::Num
            }
            '<' => {
                self.bump();
                if matches!(self.peek_char(), Some('=') | Some('>')) {
                    self.bump();
                }
                TokenKind::OpRel
            }
            '>' => {
                self.bump();
                if self.peek_char() == Some('=') {
                    self.bump();
                }
                TokenKind::OpRel
            }
            '=' => {
                self.bump();
                TokenKind::OpRel
            }
            ':' => {
                self.bump();
                if self.peek_char() == Some('=') {
                    self.bump();
                    TokenKind::OpAssign
                } else {
                    TokenKind::Colon
                }
            }
            '+' | '-' | '*' | '/' => {
                self.bump();
                TokenKind::OpMat
            }
            ';' => {
                self.bump();
                TokenKind::Semi
            }
            ',' => {
                self.bump();
                TokenKind::Comma
            }
            '.' => {
                self.bump();
                TokenKind::Dot
            }
            '(' => {
                self.bump();
                TokenKind::LParen
            }
            ')' => {
                self.bump();
                TokenKind::RParen
            }
            '[' => {
                self.bump();
                TokenKind::LBracket
            }
            ']' => {
                self.bump();
                TokenKind::RBracket
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while matches!(
                    self.peek_char(),
                    Some(c) if c.is_ascii_alphanumeric() || c == '_'
                ) {
                    self.bump();
                }
                let text = &self.source[start..self.pos];
                let keyword = if text.chars().any(|c| c.is_ascii_uppercase()) {
                    TokenKind::keyword(&text.to_ascii_lowercase())
                } else {
                    TokenKind::keyword(text)
                };
                keyword.unwrap_or(TokenKind::Ident)
            }
            other => {
                return Err(LexError {
                    ch: other,
                    line,
                    column,
                })
            }
        };

        Ok(self.make_token(kind, start, line, column))
    }
}

impl<'src, 'int> Iterator for Lexer<'src, 'int> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.next_token();
        if matches!(&item, Ok(token) if token.kind == TokenKind::Eof) || item.is_err() {
            self.finished = true;
        }
        Some(item)
    }
}

/// Scans the whole source into a token vector ending with `EOF`.
pub fn tokenize(source: &str, interner: &mut Interner) -> Result<Vec<Token>, LexError> {
    Lexer::new(source, interner).collect()
}
