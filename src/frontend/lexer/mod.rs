//! Lexer for the Logo-derived language.
//!
//! Handles tokenization of:
//! - Reserved words (`to`, `if`, `then`, `else`, `end`, `while`, ...),
//!   matched case-insensitively
//! - Identifiers and integer literals
//! - Single-character punctuation (`:`, `+`, `-`, `*`, `/`, `(`, `)`)
//!
//! Space and tab are discarded. Newlines are discarded too but advance the
//! line counter used for diagnostics. An unrecognized character is the one
//! locally recovered error in the whole pipeline: it is reported, skipped,
//! and scanning continues.

pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::frontend::diagnostics::CompileError;
use tokens::KEYWORDS;

/// Lexer state.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: u32,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// Always produces a complete token vector ending in `Eof`; recovered
    /// lexical errors are returned alongside it and never truncate the
    /// stream.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<CompileError>) {
        while self.peek().is_some() {
            self.scan_token();
        }
        self.tokens.push(Token::new(TokenKind::Eof, self.line));
        (self.tokens, self.errors)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let Some(c) = self.advance() else {
            return;
        };

        match c {
            // Space and tab are discarded without producing a token.
            ' ' | '\t' | '\r' => {}

            // Newlines never terminate the stream; they only advance the
            // line counter.
            '\n' => self.line += 1,

            // Single-character punctuation and operators.
            ':' => self.add_token(TokenKind::Colon),
            '+' => self.add_token(TokenKind::Plus),
            '-' => self.add_token(TokenKind::Minus),
            '*' => self.add_token(TokenKind::Star),
            '/' => self.add_token(TokenKind::Slash),
            '(' => self.add_token(TokenKind::LParen),
            ')' => self.add_token(TokenKind::RParen),

            '0'..='9' => self.scan_number(c),

            _ if is_ident_start(c) => self.scan_identifier(c),

            _ => {
                // Recovered locally: report, skip the character, continue.
                tracing::warn!(line = self.line, "illegal character {c:?}");
                self.errors
                    .push(CompileError::lexical(format!("Illegal character '{c}'"), self.line));
            }
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.line));
    }

    // ========================================================================
    // Literal and identifier scanning
    // ========================================================================

    fn scan_number(&mut self, first: char) {
        let mut text = String::from(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match text.parse::<i64>() {
            Ok(value) => self.add_token(TokenKind::Number(value)),
            Err(_) => {
                // Out-of-range literal; recovered the same way as an illegal
                // character.
                tracing::warn!(line = self.line, "integer literal out of range: {text}");
                self.errors.push(CompileError::lexical(
                    format!("Integer literal out of range: '{text}'"),
                    self.line,
                ));
            }
        }
    }

    fn scan_identifier(&mut self, first: char) {
        let mut name = String::from(first);
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // Reserved-word matching is case-insensitive; the map keys are
        // lowercase.
        let kind = KEYWORDS
            .get(name.to_ascii_lowercase().as_str())
            .cloned()
            .unwrap_or(TokenKind::Ident(name));

        self.add_token(kind);
    }
}

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> (Vec<Token>, Vec<CompileError>) {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::diagnostics::ErrorKind;

    #[test]
    fn test_keywords_case_insensitive() {
        let (tokens, errors) = lex("IF If if");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::If);
        assert_eq!(tokens[1].kind, TokenKind::If);
        assert_eq!(tokens[2].kind, TokenKind::If);
    }

    #[test]
    fn test_all_reserved_words() {
        let (tokens, errors) = lex("to if then else end while not and or set");
        assert!(errors.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::To,
                TokenKind::If,
                TokenKind::Then,
                TokenKind::Else,
                TokenKind::End,
                TokenKind::While,
                TokenKind::Not,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Set,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_numbers() {
        let (tokens, errors) = lex("v1 _x 80 007");
        assert!(errors.is_empty());
        assert!(matches!(&tokens[0].kind, TokenKind::Ident(s) if s == "v1"));
        assert!(matches!(&tokens[1].kind, TokenKind::Ident(s) if s == "_x"));
        assert_eq!(tokens[2].kind, TokenKind::Number(80));
        assert_eq!(tokens[3].kind, TokenKind::Number(7));
    }

    #[test]
    fn test_punctuation() {
        let (tokens, errors) = lex(": + - * / ( )");
        assert!(errors.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Colon,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newlines_advance_line_counter() {
        let (tokens, errors) = lex("to\nv1\n\n80");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_illegal_character_is_recovered() {
        let (tokens, errors) = lex("v1 $ 80");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Lexical);
        assert!(errors[0].message.contains("Illegal character '$'"));
        // Scanning continued: the rest of the stream is intact.
        assert!(matches!(&tokens[0].kind, TokenKind::Ident(s) if s == "v1"));
        assert_eq!(tokens[1].kind, TokenKind::Number(80));
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_keyword_glued_to_punctuation() {
        let (tokens, errors) = lex(":length");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Colon);
        assert!(matches!(&tokens[1].kind, TokenKind::Ident(s) if s == "length"));
    }

    #[test]
    fn test_empty_source() {
        let (tokens, errors) = lex("");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }
}
