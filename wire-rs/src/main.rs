use std::io::BufRead;

use tracing_subscriber::EnvFilter;
use wire::cli::{self, CliArgs, SymbolsFile};
use wire::config::Config;
use wire::symbol::SymbolTable;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("wire: {e}");
            eprintln!(
                "Usage: wire [-f[<file>]] [-D NAME=VALUE]... [-m<depth>] [-e | -x] [-d] [<text>...]"
            );
            std::process::exit(2);
        }
    };

    init_tracing(args.debug);

    let table = load_symbols(&args);

    // ── Process the positional text, or stdin line by line ───────────────────
    let mut failed = false;
    let mut emit = |text: &str| match cli::run(args.mode, &table, text) {
        Ok(out) => {
            if !out.is_empty() || args.mode != cli::Mode::Extract {
                println!("{out}");
            }
        }
        Err(e) => {
            eprintln!("wire: {e}");
            failed = true;
        }
    };

    match &args.text {
        Some(text) => emit(text),
        None => {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => emit(&line),
                    Err(e) => {
                        eprintln!("wire: stdin: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// `WIRE_LOG` takes a standard filter directive; `-d` defaults it to debug.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_env("WIRE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if debug { "wire=debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the symbol table: definition file first, then `-D` overrides.
fn load_symbols(args: &CliArgs) -> SymbolTable {
    let mut table = match cli::resolve_symbols_file(&args.symbols_file) {
        Some(path) => match Config::load_file(&path) {
            Ok((config, errors)) => {
                for e in errors {
                    eprintln!("wire: {}: {e}", path.display());
                }
                config.symbols
            }
            Err(e) if matches!(args.symbols_file, SymbolsFile::Explicit(_)) => {
                eprintln!("wire: can't read {}: {e}", path.display());
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("wire: warning: {}: {e}", path.display());
                SymbolTable::new()
            }
        },
        None => SymbolTable::new(),
    };

    for (name, value) in &args.defines {
        table.set(name, value);
    }
    if let Some(depth) = args.max_depth {
        table.set_max_depth(depth);
    }
    tracing::debug!(symbols = table.len(), "symbol table ready");
    table
}
