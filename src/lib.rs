#![forbid(unsafe_code)]
//! Compiler frontend for a small Logo-derived procedural language targeting a
//! stack-based virtual machine.
//!
//! The crate covers the stages up to (but not including) code generation, plus
//! the post-codegen loader:
//!
//! - `frontend::lexer`: tokenization of source text
//! - `frontend::parser`: parsing tokens into an AST, registering declarations
//!   in the symbol table as a side effect
//! - `frontend::symbols`: per-session symbol table shared by parser, code
//!   generator, and loader
//! - `frontend::diagnostics`: error reporting
//! - `backend::loader`: resolution of `LABEL` pseudo-instructions to
//!   program-counter offsets, run after code generation
//!
//! Code generation and the VM itself live elsewhere; they interact with this
//! crate only through the AST and the symbol table.
//!
//! ## Panic Policy
//!
//! Production code uses `Result` with `?` / `ok_or` / `map_err`; `.unwrap()`
//! and `.expect()` are acceptable in tests only.
//!
//! ## Examples
//! ```rust
//! use logoc::frontend::{lexer, parser};
//! use logoc::frontend::symbols::SymbolTable;
//!
//! let (tokens, lex_errors) = lexer::lex("to square :side end\n");
//! assert!(lex_errors.is_empty());
//! let mut symbols = SymbolTable::new();
//! let program = parser::parse(&tokens, &mut symbols).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod backend;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::symbols;

pub use backend::loader;
