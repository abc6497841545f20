//! Symbol table.
//!
//! A caller-owned map from sigil-prefixed key (`$PLAYER_1`) to text value.
//! Values are stored as text whatever their original type; typed reads go
//! through [`FromSymbol`].  One table per execution context: there is no
//! hidden global, so independent tables never observe each other.

use std::collections::HashMap;

use crate::convert::{FromSymbol, IntoSymbol};
use crate::interpolate;

/// Character that marks a symbol reference.
pub const SIGIL: char = '$';

/// Default bound on nested symbol expansion.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Symbol name → text value store.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, String>,
    max_depth: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable {
            symbols: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table whose interpolation quotes references nested deeper than
    /// `max_depth` instead of expanding them.
    pub fn with_max_depth(max_depth: usize) -> Self {
        SymbolTable {
            max_depth,
            ..Self::default()
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Set (or overwrite) a symbol.  `name` may be given with or without the
    /// leading `$`.
    pub fn set(&mut self, name: &str, value: impl IntoSymbol) {
        self.symbols.insert(key(name), value.into_symbol());
    }

    /// Current text of a symbol, or `""` if it is not defined.
    ///
    /// Unlike [`locate`](Self::locate) this never creates an entry.
    pub fn get(&self, name: &str) -> String {
        self.lookup(name).map(str::to_owned).unwrap_or_default()
    }

    /// Current text of a symbol, or `None` if it is not defined.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.symbols.get(key(name).as_str()).map(String::as_str)
    }

    /// Mutable access to a symbol's text, creating an empty entry first if
    /// it does not exist.
    pub fn locate(&mut self, name: &str) -> &mut String {
        self.symbols.entry(key(name)).or_default()
    }

    /// Read a symbol converted to `T`.  Missing symbols read as `""`.
    pub fn get_as<T: FromSymbol>(&self, name: &str) -> T {
        T::from_symbol(self.lookup(name).unwrap_or(""))
    }

    /// Returns `true` if the symbol is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(key(name).as_str())
    }

    /// Iterate over all symbols.  Keys carry their `$`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.symbols.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Expand every `$name` reference in `text`.
    pub fn interpolate(&self, text: &str) -> String {
        interpolate::interpolate(self, text)
    }
}

/// Store `value` under `$name`.
pub fn set_symbol(table: &mut SymbolTable, name: &str, value: impl IntoSymbol) {
    table.set(name, value);
}

/// Text of `$name`, or `""` if undefined.
pub fn get_symbol(table: &SymbolTable, name: &str) -> String {
    table.get(name)
}

/// Canonical key for a symbol name: always exactly one leading `$`.
pub(crate) fn key(name: &str) -> String {
    if name.starts_with(SIGIL) {
        name.to_owned()
    } else {
        format!("{SIGIL}{name}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
