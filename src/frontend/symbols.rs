//! Symbol table shared across the declaration and resolution stages.
//!
//! Tracks every named entity the compiler sees (procedures, labels,
//! variables). Entries are created by the parser, filled in by the code
//! generator (`code`) and the loader (`pc`), and never destroyed implicitly.
//!
//! The table is a per-session object: callers construct one, thread it
//! through the stages by `&mut`, and `clear()` it if they want to reuse it.
//! There is no internal synchronization; concurrent compilations need a table
//! each.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use thiserror::Error;

/// Error raised by symbol table operations.
///
/// Redefinitions are user-facing; the rest are internal errors (a stage asked
/// for something the table's contracts forbid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Redeclaration of symbol '{name}':{line}: original declaration at line {original}")]
    Redefinition { name: String, line: u32, original: u32 },

    #[error("Internal error: symbol not defined: {0}")]
    NotDefined(String),

    #[error("Internal error: cannot modify symbol '{0}' attribute 'line'")]
    LineFixed(String),

    #[error("Unknown symbol:{line}:'{name}'")]
    Unknown { name: String, line: u32 },
}

/// Class of a symbol table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolClass {
    /// Callable procedure (declared with `to`).
    Func,
    /// Jump target inside a procedure's generated code.
    Label,
    /// Variable reference.
    Var,
}

impl std::fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolClass::Func => write!(f, "FUNC"),
            SymbolClass::Label => write!(f, "LABEL"),
            SymbolClass::Var => write!(f, "VAR"),
        }
    }
}

/// Where a symbol was declared.
///
/// `Forward` marks a symbol that has been referenced but not yet declared; it
/// is upgraded to `Line` exactly once, when the real declaration is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclSite {
    #[default]
    Forward,
    Line(u32),
}

impl DeclSite {
    pub fn is_declared(&self) -> bool {
        matches!(self, DeclSite::Line(_))
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            DeclSite::Line(l) => Some(*l),
            DeclSite::Forward => None,
        }
    }
}

/// A symbol table entry.
///
/// `name` and `class` are fixed at creation; there is deliberately no way to
/// change them afterwards. `usage` only increases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    name: String,
    class: SymbolClass,
    site: DeclSite,
    usage: u32,
    /// Instruction sequence, assigned by the external code generator.
    pub code: Option<Vec<String>>,
    /// Program-counter offset, assigned by the loader.
    pub pc: Option<usize>,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> SymbolClass {
        self.class
    }

    pub fn site(&self) -> DeclSite {
        self.site
    }

    pub fn usage(&self) -> u32 {
        self.usage
    }
}

/// Attribute updates for [`SymbolTable::add_symbol`] and
/// [`SymbolTable::set_symbol`]. Only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default)]
pub struct SymbolAttrs {
    pub site: Option<DeclSite>,
    pub code: Option<Vec<String>>,
    pub pc: Option<usize>,
}

impl SymbolAttrs {
    /// Attrs carrying just a declaration line.
    pub fn at_line(line: u32) -> Self {
        Self {
            site: Some(DeclSite::Line(line)),
            ..Self::default()
        }
    }

    /// Attrs carrying just generated code.
    pub fn with_code(code: Vec<String>) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// Attrs carrying just a program-counter offset.
    pub fn with_pc(pc: usize) -> Self {
        Self {
            pc: Some(pc),
            ..Self::default()
        }
    }
}

/// Symbol table for one compilation session.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
    case_insensitive: bool,
}

impl SymbolTable {
    /// Create a case-sensitive table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table that normalizes names to uppercase for lookup and
    /// storage. Error messages keep the original spelling.
    pub fn case_insensitive() -> Self {
        Self {
            symbols: HashMap::new(),
            case_insensitive: true,
        }
    }

    fn key(&self, name: &str) -> String {
        if self.case_insensitive {
            name.to_ascii_uppercase()
        } else {
            name.to_string()
        }
    }

    /// Create a new symbol, or upgrade a forward reference in place.
    ///
    /// ## Errors
    /// [`SymbolError::Redefinition`] if the symbol already has a real
    /// declaration line. The new declaration line for the message is taken
    /// from `attrs.site` (0 if none was given).
    pub fn add_symbol(&mut self, name: &str, class: SymbolClass, attrs: SymbolAttrs) -> Result<(), SymbolError> {
        let key = self.key(name);
        match self.symbols.entry(key) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                if let Some(original) = existing.site.line() {
                    return Err(SymbolError::Redefinition {
                        name: name.to_string(),
                        line: attrs.site.and_then(|s| s.line()).unwrap_or(0),
                        original,
                    });
                }
                // Forward reference being upgraded; the class recorded at
                // first sight stays.
                existing.apply(attrs);
                Ok(())
            }
            Entry::Vacant(entry) => {
                let mut symbol = Symbol {
                    name: entry.key().clone(),
                    class,
                    site: DeclSite::Forward,
                    usage: 0,
                    code: None,
                    pc: None,
                };
                symbol.apply(attrs);
                entry.insert(symbol);
                Ok(())
            }
        }
    }

    /// Update attributes of an existing symbol.
    ///
    /// ## Errors
    /// - [`SymbolError::NotDefined`] if the symbol is unknown.
    /// - [`SymbolError::LineFixed`] if `attrs.site` is set while the entry
    ///   already holds a real declaration line.
    pub fn set_symbol(&mut self, name: &str, attrs: SymbolAttrs) -> Result<(), SymbolError> {
        let key = self.key(name);
        let symbol = self
            .symbols
            .get_mut(&key)
            .ok_or_else(|| SymbolError::NotDefined(name.to_string()))?;
        if attrs.site.is_some() && symbol.site.is_declared() {
            return Err(SymbolError::LineFixed(name.to_string()));
        }
        symbol.apply(attrs);
        Ok(())
    }

    /// Retrieve a symbol. Never fails; an unknown name is `None`.
    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(&self.key(name))
    }

    /// All symbols of the given class, in table iteration order.
    pub fn symbols_by_class(&self, class: SymbolClass) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().filter(move |s| s.class == class)
    }

    /// Remove a symbol, returning it.
    ///
    /// ## Errors
    /// [`SymbolError::NotDefined`] if the symbol is unknown.
    pub fn remove_symbol(&mut self, name: &str) -> Result<Symbol, SymbolError> {
        let key = self.key(name);
        self.symbols
            .remove(&key)
            .ok_or_else(|| SymbolError::NotDefined(name.to_string()))
    }

    /// Add `amount` to a symbol's usage counter.
    ///
    /// ## Errors
    /// [`SymbolError::Unknown`] (reporting `line`) if the symbol is unknown.
    pub fn increment_usage(&mut self, name: &str, line: u32, amount: u32) -> Result<(), SymbolError> {
        let key = self.key(name);
        let symbol = self.symbols.get_mut(&key).ok_or_else(|| SymbolError::Unknown {
            name: name.to_string(),
            line,
        })?;
        symbol.usage += amount;
        Ok(())
    }

    /// Drop every entry. Tables are never reset implicitly between sessions;
    /// this is the explicit way to reuse one.
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Symbol {
    fn apply(&mut self, attrs: SymbolAttrs) {
        if let Some(site) = attrs.site {
            self.site = site;
        }
        if let Some(code) = attrs.code {
            self.code = Some(code);
        }
        if let Some(pc) = attrs.pc {
            self.pc = Some(pc);
        }
    }
}
