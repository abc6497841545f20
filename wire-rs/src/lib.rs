//! String interpolation and arithmetic evaluation.
//!
//! Two independent engines:
//!
//! - [`interpolate`] expands `$name` references against a caller-owned
//!   [`SymbolTable`], recursively, quoting anything undefined or cyclic.
//! - [`eval`] evaluates `+ - * /` arithmetic with parentheses and unary
//!   signs, reporting failures with a kind and a byte offset.
//!
//! # Quick start
//!
//! ```rust
//! use wire::{evaluate, SymbolTable};
//!
//! let mut table = SymbolTable::new();
//! table.set("PLAYER_1", "Mark");
//! table.set("GREETING", "Hi $PLAYER_1!");
//! assert_eq!(table.interpolate("$GREETING"), "Hi Mark!");
//!
//! table.set("items", 100);
//! assert_eq!(table.get_as::<i32>("items"), 100);
//!
//! assert_eq!(evaluate("5*(4+4+1)"), Ok(45.0));
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod eval;
pub mod interpolate;
pub mod symbol;

// Re-exports for convenience.
pub use convert::{FromSymbol, IntoSymbol};
pub use eval::{evaluate, EvalError, EvalErrorKind};
pub use interpolate::{extract, interpolate, interpolate_with_parent};
pub use symbol::{get_symbol, set_symbol, SymbolTable};
