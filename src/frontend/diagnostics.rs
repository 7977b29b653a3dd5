//! Diagnostics and error reporting.
//!
//! Every stage reports through [`CompileError`]. Only the lexical
//! illegal-character condition is recovered locally (the lexer skips the
//! character and keeps scanning); every other error aborts the compilation of
//! the current source unit.

use crate::frontend::symbols::SymbolError;

/// A compile-time error with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
    pub line: u32,
    pub kind: ErrorKind,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: String, line: u32) -> Self {
        Self { message, line, kind }
    }

    pub fn lexical(message: String, line: u32) -> Self {
        Self::new(ErrorKind::Lexical, message, line)
    }

    pub fn syntax(message: String, line: u32) -> Self {
        Self::new(ErrorKind::Syntax, message, line)
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} (line {})", self.kind, self.message, self.line)
    }
}

impl std::error::Error for CompileError {}

/// Kind of compile error, one per recovery class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized character; recovered locally by the lexer.
    Lexical,
    /// Token not valid at the current parse state; fatal for the parse.
    Syntax,
    /// Re-declaration of a symbol that already has a real declaration line.
    Redefinition,
    /// Disallowed symbol attribute mutation or operation on an unknown symbol.
    Internal,
    /// A function symbol reached the loader without generated code.
    UndefinedReference,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Redefinition => write!(f, "redefinition error"),
            ErrorKind::Internal => write!(f, "internal error"),
            ErrorKind::UndefinedReference => write!(f, "undefined reference"),
        }
    }
}

impl From<SymbolError> for CompileError {
    fn from(err: SymbolError) -> Self {
        let kind = match &err {
            SymbolError::Redefinition { .. } => ErrorKind::Redefinition,
            SymbolError::NotDefined(_) | SymbolError::LineFixed(_) => ErrorKind::Internal,
            SymbolError::Unknown { .. } => ErrorKind::Internal,
        };
        let line = match &err {
            SymbolError::Redefinition { line, .. } => *line,
            SymbolError::Unknown { line, .. } => *line,
            _ => 0,
        };
        CompileError::new(kind, err.to_string(), line)
    }
}
