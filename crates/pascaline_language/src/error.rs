//! Error and diagnostic types for the front end.
//!
//! Three disjoint failure kinds exist:
//!
//! - [`LexError`]: fail-fast; the scanner stops at the first character it
//!   cannot match.
//! - [`ParseError`]: fail-fast for syntax; the parser stops at the first
//!   token that does not fit the grammar.
//! - [`Diagnostic`]: accumulated semantic findings; parsing continues and
//!   the collected list is surfaced once at the end of the parse as
//!   [`ParseErrorKind::Semantic`].

use crate::token::TokenKind;
use serde::Serialize;
use std::fmt;

/// A lexical error: the first character no scanner rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// The offending character. For an unterminated comment or string
    /// this is the opening delimiter.
    pub ch: char,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unexpected character '{}' at line {}, column {}",
            self.ch, self.line, self.column
        )
    }
}

impl std::error::Error for LexError {}

/// A syntax or batched-semantic failure from the parser.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based line of the token the parser stopped at.
    pub line: u32,
    /// 1-based column of that token.
    pub column: u32,
}

#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    /// A specific kind was required and something else appeared.
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        lexeme: String,
    },
    /// A specific operator lexeme was required (e.g. `=` in a type
    /// definition) and a different one appeared.
    UnexpectedOperator {
        expected: &'static str,
        found: String,
    },
    /// The token stream ended mid-construct.
    UnexpectedEof,
    /// Statement position held a token no statement can start with.
    ExpectedStatement { found: TokenKind, lexeme: String },
    /// Factor position held a token no factor can start with.
    ExpectedFactor { found: TokenKind, lexeme: String },
    /// A type reference held neither a primitive type nor an identifier.
    ExpectedTypeName { found: TokenKind, lexeme: String },
    /// Semantic analysis finished with findings; parsing itself succeeded.
    Semantic { diagnostics: Vec<Diagnostic> },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnexpectedToken {
                expected,
                found,
                lexeme,
            } => write!(f, "Expected {expected}, found {found} ({lexeme})"),
            ParseErrorKind::UnexpectedOperator { expected, found } => {
                write!(f, "Expected '{expected}', found '{found}'")
            }
            ParseErrorKind::UnexpectedEof => write!(f, "Unexpected end of input"),
            ParseErrorKind::ExpectedStatement { found, lexeme } => {
                write!(f, "Expected a statement, found {found} ({lexeme})")
            }
            ParseErrorKind::ExpectedFactor { found, lexeme } => {
                write!(f, "Expected an expression, found {found} ({lexeme})")
            }
            ParseErrorKind::ExpectedTypeName { found, lexeme } => {
                write!(f, "Expected a type name, found {found} ({lexeme})")
            }
            ParseErrorKind::Semantic { diagnostics } => {
                writeln!(f, "semantic analysis found {} error(s):", diagnostics.len())?;
                for (i, diagnostic) in diagnostics.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{diagnostic}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Category of a semantic finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UndeclaredIdentifier,
    Redeclaration,
    TypeMismatch,
    WrongArity,
    NonBooleanCondition,
    AssignmentToConstant,
}

impl DiagnosticKind {
    /// The category prefix shown before each finding.
    pub fn prefix(self) -> &'static str {
        match self {
            DiagnosticKind::UndeclaredIdentifier => "undeclared identifier",
            DiagnosticKind::Redeclaration => "redeclaration",
            DiagnosticKind::TypeMismatch => "type mismatch",
            DiagnosticKind::WrongArity => "wrong arity",
            DiagnosticKind::NonBooleanCondition => "non-boolean condition",
            DiagnosticKind::AssignmentToConstant => "assignment to constant",
        }
    }
}

/// One semantic finding. Renders as `<category>: <message>`.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.prefix(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_uses_reference_format() {
        let err = LexError {
            ch: '@',
            line: 2,
            column: 9,
        };
        assert_eq!(err.to_string(), "Unexpected character '@' at line 2, column 9");
    }

    #[test]
    fn unexpected_token_uses_reference_format() {
        let err = ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                expected: TokenKind::Semi,
                found: TokenKind::Dot,
                lexeme: ".".to_string(),
            },
            line: 1,
            column: 10,
        };
        assert_eq!(err.to_string(), "Expected SEMI, found DOT (.)");
    }

    #[test]
    fn diagnostic_is_prefixed_by_category() {
        let d = Diagnostic::new(
            DiagnosticKind::UndeclaredIdentifier,
            "variable 'y' is not declared",
        );
        assert_eq!(d.to_string(), "undeclared identifier: variable 'y' is not declared");
    }

    #[test]
    fn semantic_error_lists_every_finding() {
        let err = ParseError {
            kind: ParseErrorKind::Semantic {
                diagnostics: vec![
                    Diagnostic::new(DiagnosticKind::TypeMismatch, "first"),
                    Diagnostic::new(DiagnosticKind::Redeclaration, "second"),
                ],
            },
            line: 4,
            column: 1,
        };
        let shown = err.to_string();
        assert!(shown.contains("2 error(s)"));
        assert!(shown.contains("type mismatch: first"));
        assert!(shown.contains("redeclaration: second"));
    }
}
