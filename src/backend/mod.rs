//! Post-parse stages. Code generation itself lives outside this crate; the
//! loader consumes its output through the symbol table.

pub mod loader;
