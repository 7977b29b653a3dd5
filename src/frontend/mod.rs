//! Compiler frontend components:
//! - `lexer`: tokenization of source code
//! - `parser`: parsing tokens into AST
//! - `ast`: abstract syntax tree definitions
//! - `symbols`: symbol table shared across compilation stages
//! - `diagnostics`: error reporting

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod symbols;
