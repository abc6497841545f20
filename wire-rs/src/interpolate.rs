//! `$name` interpolation.
//!
//! Scans text left to right.  A `$` starts a reference; ASCII letters,
//! digits, `_` and `-` continue it; any other character ends it.
//!
//! | Reference                                  | Output                          |
//! |--------------------------------------------|---------------------------------|
//! | defined, not already being expanded        | its value, itself interpolated  |
//! | undefined                                  | the reference text, `$` kept    |
//! | already being expanded (direct or mutual)  | the reference text, `$` kept    |
//! | nested deeper than the table's `max_depth` | the reference text, `$` kept    |
//!
//! The character that ends a reference is copied verbatim, so in `$A$B` the
//! second `$` is literal text rather than the start of a new reference.
//!
//! Values are resolved when `interpolate` runs, not when they are set, so
//! redefining a symbol changes every expansion that reaches it.

use crate::symbol::{self, SymbolTable, SIGIL};

/// Expand all `$name` references in `text` against `table`.
///
/// Never fails: anything that cannot be expanded is copied literally.
pub fn interpolate(table: &SymbolTable, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    expand(table, text, &mut Vec::new(), &mut out);
    out
}

/// Like [`interpolate`], treating `parent` as the symbol currently being
/// expanded, so references to it are quoted.
pub fn interpolate_with_parent(table: &SymbolTable, text: &str, parent: &str) -> String {
    let mut chain = Vec::new();
    if !parent.is_empty() {
        chain.push(symbol::key(parent));
    }
    let mut out = String::with_capacity(text.len());
    expand(table, text, &mut chain, &mut out);
    out
}

/// List the references in `text` in order of appearance, each with its
/// leading sigil.  Any character in `sigils` opens a reference; a sigil with
/// no name after it is reported on its own.  As in [`interpolate`], the
/// character that ends a reference is not rescanned.
pub fn extract(text: &str, sigils: &[char]) -> Vec<String> {
    let mut found = Vec::new();
    let mut id = String::new();

    for ch in text.chars() {
        if id.is_empty() {
            if sigils.contains(&ch) {
                id.push(ch);
            }
        } else if is_ident_continue(ch) {
            id.push(ch);
        } else {
            flush_extracted(&mut id, &mut found);
        }
    }
    flush_extracted(&mut id, &mut found);
    found
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Characters that continue a reference after its sigil.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// `chain` holds the keys currently being expanded, outermost first.
fn expand(table: &SymbolTable, text: &str, chain: &mut Vec<String>, out: &mut String) {
    let mut id = String::new();

    for ch in text.chars() {
        if id.is_empty() {
            if ch == SIGIL {
                id.push(ch);
            } else {
                out.push(ch);
            }
        } else if is_ident_continue(ch) {
            id.push(ch);
        } else {
            resolve(table, &id, chain, out);
            out.push(ch);
            id.clear();
        }
    }

    if !id.is_empty() {
        resolve(table, &id, chain, out);
    }
}

fn resolve(table: &SymbolTable, id: &str, chain: &mut Vec<String>, out: &mut String) {
    let Some(value) = table.lookup(id) else {
        out.push_str(id);
        return;
    };

    if chain.iter().any(|ancestor| ancestor == id) {
        tracing::trace!(symbol = id, depth = chain.len(), "quoting recursive reference");
        out.push_str(id);
        return;
    }
    if chain.len() >= table.max_depth() {
        tracing::debug!(symbol = id, max_depth = table.max_depth(), "expansion depth exceeded");
        out.push_str(id);
        return;
    }

    chain.push(id.to_owned());
    expand(table, value, chain, out);
    chain.pop();
}

fn flush_extracted(id: &mut String, found: &mut Vec<String>) {
    if !id.is_empty() {
        found.push(std::mem::take(id));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.set("PLAYER_1", "Mark");
        table.set("PLAYER_2", "John");
        table
    }

    #[test]
    fn no_substitution() {
        let table = players();
        assert_eq!(interpolate(&table, "hello world"), "hello world");
    }

    #[test]
    fn defined_symbols_are_replaced() {
        let table = players();
        assert_eq!(interpolate(&table, "Hi $PLAYER_1 and $PLAYER_2"), "Hi Mark and John");
    }

    #[test]
    fn undefined_symbols_are_quoted() {
        let table = players();
        assert_eq!(interpolate(&table, "Hi $PLAYER_3"), "Hi $PLAYER_3");
        assert_eq!(
            interpolate(&table, "$PLAYER_3 joined the game"),
            "$PLAYER_3 joined the game"
        );
    }

    #[test]
    fn lookup_does_not_create_entries() {
        let table = players();
        let _ = interpolate(&table, "$GHOST");
        assert!(!table.contains("GHOST"));
    }

    #[test]
    fn recursive_lookup() {
        let mut table = SymbolTable::new();
        table.set("HEY", "Hello stranger");
        table.set("GREETING", "$HEY! How are you?");
        assert_eq!(interpolate(&table, "$GREETING"), "Hello stranger! How are you?");
    }

    #[test]
    fn loopback_is_quoted() {
        let mut table = SymbolTable::new();
        table.set("LOOPBACK", "$LOOPBACK is quoted.");
        assert_eq!(interpolate(&table, "$LOOPBACK"), "$LOOPBACK is quoted.");
    }

    #[test]
    fn hot_swap() {
        let mut table = players();
        table.set("HEY", "Hello stranger");
        table.set("GREETING", "$HEY! How are you?");
        assert_eq!(interpolate(&table, "$GREETING"), "Hello stranger! How are you?");

        table.set("HEY", "Hey $PLAYER_1 and $PLAYER_2");
        assert_eq!(interpolate(&table, "$GREETING"), "Hey Mark and John! How are you?");
    }

    #[test]
    fn mutual_cycle_terminates() {
        let mut table = SymbolTable::new();
        table.set("A", "a($B)");
        table.set("B", "b($A)");
        assert_eq!(interpolate(&table, "$A"), "a(b($A))");
        assert_eq!(interpolate(&table, "$B"), "b(a($B))");
    }

    #[test]
    fn sibling_references_are_not_cycles() {
        let mut table = SymbolTable::new();
        table.set("X", "x");
        table.set("PAIR", "$X$X");
        // the second `$` terminates the first reference and is copied as-is
        assert_eq!(interpolate(&table, "$PAIR"), "x$X");
        table.set("PAIR", "$X $X");
        assert_eq!(interpolate(&table, "$PAIR"), "x x");
    }

    #[test]
    fn depth_bound_quotes_deep_references() {
        let mut table = SymbolTable::with_max_depth(2);
        table.set("L1", "[$L2]");
        table.set("L2", "[$L3]");
        table.set("L3", "end");
        assert_eq!(interpolate(&table, "$L1"), "[[$L3]]");
    }

    #[test]
    fn terminator_is_copied() {
        let table = players();
        assert_eq!(interpolate(&table, "($PLAYER_1)"), "(Mark)");
        assert_eq!(interpolate(&table, "$PLAYER_1, $PLAYER_2."), "Mark, John.");
    }

    #[test]
    fn identifier_characters() {
        let mut table = SymbolTable::new();
        table.set("a-b_9", "ok");
        table.set("a", "short");
        assert_eq!(interpolate(&table, "$a-b_9!"), "ok!");
        assert_eq!(interpolate(&table, "$a.b"), "short.b");
    }

    #[test]
    fn bare_sigil_is_literal() {
        let table = players();
        assert_eq!(interpolate(&table, "costs 5 $"), "costs 5 $");
        assert_eq!(interpolate(&table, "$ 5"), "$ 5");
    }

    #[test]
    fn explicit_parent_is_quoted() {
        let mut table = SymbolTable::new();
        table.set("SELF", "me");
        assert_eq!(interpolate_with_parent(&table, "$SELF", "SELF"), "$SELF");
        assert_eq!(interpolate_with_parent(&table, "$SELF", "$SELF"), "$SELF");
        assert_eq!(interpolate_with_parent(&table, "$SELF", "OTHER"), "me");
    }

    #[test]
    fn non_ascii_text_passes_through() {
        let mut table = SymbolTable::new();
        table.set("who", "Zoë");
        assert_eq!(interpolate(&table, "¡Hola $who…"), "¡Hola Zoë…");
    }

    #[test]
    fn extract_references() {
        assert_eq!(
            extract("Hi $PLAYER_1 and $PLAYER_2!", &['$']),
            vec!["$PLAYER_1", "$PLAYER_2"]
        );
        assert_eq!(extract("no refs here", &['$']), Vec::<String>::new());
        assert_eq!(extract("costs $ 5", &['$']), vec!["$"]);
        assert_eq!(extract("total: 5$", &['$']), vec!["$"]);
        assert_eq!(extract("$a$b $c", &['$']), vec!["$a", "$c"]);
    }

    #[test]
    fn extract_with_two_sigils() {
        assert_eq!(extract("$a and @b", &['$', '@']), vec!["$a", "@b"]);
    }

    #[test]
    fn method_delegates() {
        let table = players();
        assert_eq!(table.interpolate("$PLAYER_2"), "John");
    }
}
