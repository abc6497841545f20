//! Command-line argument parsing.
//!
//! Usage:
//!   wire [-f[<file>]] [-D NAME=VALUE]... [-m<depth>] [-e | -x] [-d] [<text>...]
//!
//! With no `<text>`, each line of standard input is processed in turn.

use std::path::PathBuf;

use crate::config::parse_assignment;
use crate::convert::IntoSymbol;
use crate::eval::evaluate;
use crate::interpolate::extract;
use crate::symbol::{SymbolTable, SIGIL};

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Symbol definition file specification.
    pub symbols_file: SymbolsFile,
    /// `-D NAME=VALUE` definitions, applied after the file.
    pub defines: Vec<(String, String)>,
    /// Expansion depth override (`-m<depth>`).
    pub max_depth: Option<usize>,
    /// What to do with each input text.
    pub mode: Mode,
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Positional arguments joined with spaces; `None` means read stdin.
    pub text: Option<String>,
}

/// How to choose the symbol definition file.
#[derive(Debug, Default)]
pub enum SymbolsFile {
    /// `$WIRE_SYMBOLS`, then `<config dir>/symbols` (default).
    #[default]
    Search,
    /// `-f` with no file argument: load no definitions.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

/// Action applied to each input text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the interpolated text (default).
    #[default]
    Interpolate,
    /// Interpolate, then evaluate the result as arithmetic (`-e`).
    Evaluate,
    /// List the symbol references found in the text (`-x`).
    Extract,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        // Non-flag argument; a leading `-` followed by a digit, `.` or `(`
        // is an expression, not a flag.
        if !arg.starts_with('-')
            || arg == "-"
            || arg[1..].starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '(')
        {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                'e' => set_mode(&mut args, Mode::Evaluate)?,
                'x' => set_mode(&mut args, Mode::Extract)?,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.symbols_file = SymbolsFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else {
                        args.symbols_file = SymbolsFile::Skip;
                    }
                }

                // -D<NAME=VALUE> or -D <NAME=VALUE>
                'D' => {
                    let def = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-D requires a NAME=VALUE argument".to_owned());
                    };
                    args.defines.push(parse_assignment(&def)?);
                }

                // -m<depth> or -m <depth>
                'm' => {
                    let depth = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-m requires a depth argument".to_owned());
                    };
                    let depth = depth
                        .parse::<usize>()
                        .map_err(|_| format!("invalid depth: {depth}"))?;
                    args.max_depth = Some(depth);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    if !positional.is_empty() {
        args.text = Some(positional.join(" "));
    }
    Ok(args)
}

fn set_mode(args: &mut CliArgs, mode: Mode) -> Result<(), String> {
    if args.mode != Mode::Interpolate && args.mode != mode {
        return Err("-e and -x are mutually exclusive".to_owned());
    }
    args.mode = mode;
    Ok(())
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Apply `mode` to one input text.  An evaluation failure is returned as its
/// display message.
pub fn run(mode: Mode, table: &SymbolTable, text: &str) -> Result<String, String> {
    match mode {
        Mode::Interpolate => Ok(table.interpolate(text)),
        Mode::Evaluate => {
            let expanded = table.interpolate(text);
            evaluate(&expanded)
                .map(IntoSymbol::into_symbol)
                .map_err(|e| format!("{expanded}: {e}"))
        }
        Mode::Extract => Ok(extract(text, &[SIGIL]).join("\n")),
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Determine which symbol definition file to load, if any.
///
/// Priority: `-f<file>` → `WIRE_SYMBOLS` env var → `symbols` in the
/// per-user config directory, when it exists.
pub fn resolve_symbols_file(spec: &SymbolsFile) -> Option<PathBuf> {
    match spec {
        SymbolsFile::Explicit(path) => Some(path.clone()),
        SymbolsFile::Skip => None,
        SymbolsFile::Search => {
            if let Ok(p) = std::env::var("WIRE_SYMBOLS") {
                return Some(PathBuf::from(p));
            }
            directories::ProjectDirs::from("", "", "wire")
                .map(|dirs| dirs.config_dir().join("symbols"))
                .filter(|p| p.exists())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
