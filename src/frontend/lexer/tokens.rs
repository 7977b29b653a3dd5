//! Token types for the lexer.

use phf::phf_map;

/// Token kinds for the Logo-derived language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // ========== Reserved words ==========
    To,    // procedure declaration
    If,    // single- or two-branch conditional
    Then,  // conditional body opener
    Else,  // two-branch conditional alternative
    End,   // block terminator
    While, // loop
    Not,   // reserved for boolean expressions
    And,   // reserved for boolean expressions
    Or,    // reserved for boolean expressions
    Set,   // reserved for assignment

    // ========== Identifiers and literals ==========
    Ident(String),
    Number(i64),

    // ========== Punctuation and operators ==========
    Colon,  // :
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    LParen, // (
    RParen, // )

    // ========== Special ==========
    Eof, // end of input
}

impl TokenKind {
    /// Source-facing rendering, used in syntax error messages.
    pub fn display_value(&self) -> String {
        match self {
            TokenKind::To => "to".to_string(),
            TokenKind::If => "if".to_string(),
            TokenKind::Then => "then".to_string(),
            TokenKind::Else => "else".to_string(),
            TokenKind::End => "end".to_string(),
            TokenKind::While => "while".to_string(),
            TokenKind::Not => "not".to_string(),
            TokenKind::And => "and".to_string(),
            TokenKind::Or => "or".to_string(),
            TokenKind::Set => "set".to_string(),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// Reserved-word lookup table, perfect-hashed for O(1) lookup.
///
/// Keys are the lowercase spellings; the lexer lowercases scanned identifiers
/// before the lookup, which is what makes reserved-word matching
/// case-insensitive.
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "to" => TokenKind::To,
    "if" => TokenKind::If,
    "then" => TokenKind::Then,
    "else" => TokenKind::Else,
    "end" => TokenKind::End,
    "while" => TokenKind::While,
    "not" => TokenKind::Not,
    "and" => TokenKind::And,
    "or" => TokenKind::Or,
    "set" => TokenKind::Set,
};

/// A token with its kind and the 1-based source line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32) -> Self {
        Self { kind, line }
    }
}
