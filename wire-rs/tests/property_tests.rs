use proptest::prelude::*;
use wire::convert::{from_hex_float, to_hex_float};
use wire::{evaluate, extract, interpolate, SymbolTable};

fn symbol_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}"
}

proptest! {
    /// Text without a sigil comes back unchanged, whatever is defined.
    #[test]
    fn dollar_free_text_is_identity(s in "[^$]*", value in "\\PC*") {
        let mut table = SymbolTable::new();
        table.set("x", value);
        prop_assert_eq!(interpolate(&table, &s), s);
    }
}

proptest! {
    /// Interpolation never panics and always terminates, even when values
    /// reference each other in arbitrary cycles.
    #[test]
    fn arbitrary_graphs_terminate(
        defs in prop::collection::vec(("[a-c]", "[a-c$ ]{0,12}"), 0..6),
        text in "[a-c$ ]{0,16}",
    ) {
        let mut table = SymbolTable::new();
        for (name, value) in &defs {
            table.set(name, value.as_str());
        }
        let _ = interpolate(&table, &text);
    }
}

proptest! {
    /// The final values decide the output, not the order of definition.
    #[test]
    fn definition_order_does_not_matter(
        leaf in "[a-z ]{0,10}",
        middle in "[a-z ]{0,10}",
        top in "[a-z ]{0,10}",
    ) {
        let defs = [
            ("LEAF", leaf.clone()),
            ("MIDDLE", format!("{middle} $LEAF.")),
            ("TOP", format!("{top} $MIDDLE!")),
        ];

        let mut forward = SymbolTable::new();
        for (name, value) in defs.iter() {
            forward.set(name, value);
        }
        let mut backward = SymbolTable::new();
        for (name, value) in defs.iter().rev() {
            backward.set(name, value);
        }

        let a = interpolate(&forward, "$TOP");
        let b = interpolate(&backward, "$TOP");
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, format!("{top} {middle} {leaf}.!"));
    }
}

proptest! {
    /// Booleans, characters and integers survive a trip through the table.
    #[test]
    fn scalar_round_trip(b: bool, c: char, i: i64, u: u32) {
        let mut table = SymbolTable::new();
        table.set("b", b);
        table.set("c", c);
        table.set("i", i);
        table.set("u", u);
        prop_assert_eq!(table.get_as::<bool>("b"), b);
        prop_assert_eq!(table.get_as::<char>("c"), c);
        prop_assert_eq!(table.get_as::<i64>("i"), i);
        prop_assert_eq!(table.get_as::<u32>("u"), u);
    }
}

proptest! {
    /// Hex-float text reproduces every finite double bit for bit.
    #[test]
    fn hex_float_round_trip(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let text = to_hex_float(x);
        prop_assert_eq!(from_hex_float(&text).map(f64::to_bits), Some(x.to_bits()));
    }
}

proptest! {
    /// Evaluation never panics on arbitrary input.
    #[test]
    fn evaluator_does_not_panic(s in "\\PC*") {
        let _ = evaluate(&s);
    }
}

proptest! {
    /// Integer sums and products evaluate exactly.
    #[test]
    fn small_integer_arithmetic(a in -1000i32..1000, b in -1000i32..1000, c in 1i32..1000) {
        let expr = format!("{a} + {b} * ({c})");
        prop_assert_eq!(evaluate(&expr), Ok(f64::from(a + b * c)));
    }
}

proptest! {
    /// Every extracted reference is a sigil followed by name characters.
    #[test]
    fn extracted_references_are_well_formed(s in "\\PC*") {
        for id in extract(&s, &['$']) {
            prop_assert!(id.starts_with('$'));
            prop_assert!(id[1..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }

    /// Names round-trip through the table with or without their sigil.
    #[test]
    fn sigil_is_optional_in_names(name in symbol_name(), value in "[a-z]{0,8}") {
        let mut table = SymbolTable::new();
        table.set(&name, value.as_str());
        prop_assert_eq!(table.get(&format!("${name}")), value);
    }
}
