//! Loader pass: resolve `LABEL` pseudo-instructions to program-counter
//! offsets.
//!
//! Runs once, after the external code generator has populated each `Func`
//! symbol's `code` attribute with its instruction sequence. For every `Func`
//! symbol the pass scans the instructions in order; an instruction whose
//! first word is `LABEL` marks a jump target, and the instruction's index is
//! recorded as that label's `pc`. No other instruction text is interpreted —
//! opcodes are not validated here.

use thiserror::Error;

use crate::frontend::symbols::{SymbolAttrs, SymbolClass, SymbolError, SymbolTable};

/// Pseudo-operation marking a jump target in generated code.
const LABEL_MARKER: &str = "LABEL";

/// Error raised by the loader pass. Both variants abort loading; a program
/// with unresolved references cannot become a runnable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// A `Func` symbol reached the loader without generated code.
    #[error("Undefined reference: {kind}: {name}")]
    UndefinedReference { kind: &'static str, name: String },

    /// A `LABEL` instruction named a symbol the code generator never
    /// created, or another table contract was violated.
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Resolve label addresses for every function in the table.
///
/// ## Errors
/// - [`LoaderError::UndefinedReference`] if any `Func` symbol has no `code`.
/// - [`LoaderError::Symbol`] if a scanned label has no symbol table entry.
#[tracing::instrument(skip_all)]
pub fn load(symbols: &mut SymbolTable) -> Result<(), LoaderError> {
    // Collect first: resolving writes back into the same table.
    let mut resolved: Vec<(String, usize)> = Vec::new();

    for symbol in symbols.symbols_by_class(SymbolClass::Func) {
        let Some(code) = symbol.code.as_ref() else {
            tracing::error!(function = symbol.name(), "undefined function");
            return Err(LoaderError::UndefinedReference {
                kind: "FUNCTION",
                name: symbol.name().to_string(),
            });
        };
        for (addr, instruction) in code.iter().enumerate() {
            if let Some((marker, name)) = instruction.split_once(' ') {
                if marker == LABEL_MARKER {
                    resolved.push((name.to_string(), addr));
                }
            }
        }
    }

    for (name, addr) in resolved {
        symbols.set_symbol(&name, SymbolAttrs::with_pc(addr))?;
    }

    Ok(())
}
