//! Symbol definition files.
//!
//! One definition per line:
//!
//! | Line                        | Action                                   |
//! |-----------------------------|------------------------------------------|
//! | `NAME=value`                | define `$NAME`                           |
//! | `NAME = "  quoted value  "` | same; quotes keep surrounding spaces     |
//! | `/set NAME=value`           | same, alternate form                     |
//! | `/set NAME value words`     | same, value is the remaining words       |
//! | Lines starting `;` or `#`   | comment, ignored                         |
//!
//! Values are stored unexpanded, so a file may reference symbols defined
//! later in the file or supplied on the command line.

use std::path::Path;

use crate::interpolate::is_ident_continue;
use crate::symbol::{SymbolTable, SIGIL};

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error on one line of a definition file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Symbols loaded from a definition file.
#[derive(Debug, Default)]
pub struct Config {
    pub symbols: SymbolTable,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse definition text.
    ///
    /// Bad lines are skipped and reported; the remaining definitions are
    /// still loaded.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            let parsed = match line.strip_prefix('/') {
                Some(rest) => parse_directive(rest),
                None => parse_assignment(line),
            };
            match parsed {
                Ok((name, value)) => config.symbols.set(&name, value),
                Err(message) => errors.push(ConfigError { line: lineno, message }),
            }
        }

        tracing::debug!(
            symbols = config.symbols.len(),
            errors = errors.len(),
            "loaded symbol definitions"
        );
        (config, errors)
    }

    /// Read and parse a definition file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "reading symbol definitions");
        Ok(Self::load_str(&s))
    }
}

/// Parse a `NAME=value` definition, as found in files and `-D` arguments.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let Some((name, value)) = s.split_once('=') else {
        return Err(format!("expected NAME=value, found '{s}'"));
    };
    let name = validate_name(name.trim())?;
    Ok((name.to_owned(), unquote(value.trim())))
}

// ── Directives ────────────────────────────────────────────────────────────────

fn parse_directive(rest: &str) -> Result<(String, String), String> {
    let (cmd, args) = rest
        .split_once(|c: char| c.is_ascii_whitespace())
        .unwrap_or((rest, ""));
    let args = args.trim();

    match cmd {
        "set" => parse_set(args),
        _ => Err(format!("unknown directive '/{cmd}'")),
    }
}

/// Parse the arguments of `/set <name>=<value>` or `/set <name> <value>`.
fn parse_set(args: &str) -> Result<(String, String), String> {
    if args.is_empty() {
        return Err("/set: requires an argument".into());
    }
    let first = args.split_ascii_whitespace().next().unwrap_or(args);
    if first.contains('=') {
        return parse_assignment(args);
    }
    match args.split_once(|c: char| c.is_ascii_whitespace()) {
        Some((name, value)) => {
            let name = validate_name(name)?;
            Ok((name.to_owned(), unquote(value.trim())))
        }
        None => Err(format!("/set: missing value for '{args}'")),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validate_name(name: &str) -> Result<&str, String> {
    let bare = name.strip_prefix(SIGIL).unwrap_or(name);
    if bare.is_empty() {
        return Err("symbol name cannot be empty".into());
    }
    if let Some(bad) = bare.chars().find(|&c| !is_ident_continue(c)) {
        return Err(format!("invalid character '{bad}' in symbol name '{name}'"));
    }
    Ok(bare)
}

/// Strip one pair of surrounding double quotes, honouring `\"` and `\\`
/// escapes inside them.  Unquoted text is returned as-is.
fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_owned();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            },
            c => out.push(c),
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
