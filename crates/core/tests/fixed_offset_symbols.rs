use secureboot_core::loader::annotate::define_fixed_offset_symbols;
use secureboot_core::loader::tables::{FixedOffsetSymbol, KNOWN_FIXED_OFFSET_SYMBOLS};
use secureboot_core::model::{SymbolDurability, SymbolKind};
use secureboot_core::symbols::SymbolTable;

const TWO_ENTRIES: &[FixedOffsetSymbol] = &[
    FixedOffsetSymbol { offset: 0x0, kind: SymbolKind::Function, name: "_start" },
    FixedOffsetSymbol { offset: 0x200, kind: SymbolKind::Data, name: "build_banner_string" },
];

#[test]
fn defines_exactly_the_table_relative_to_base() {
    let base = 0x1800000000;
    let mut symbols = SymbolTable::new();
    define_fixed_offset_symbols(base, TWO_ENTRIES, SymbolDurability::User, &mut symbols);

    assert_eq!(symbols.len(), 2);

    let start = symbols.get(base).unwrap();
    assert_eq!(start.name, "_start");
    assert_eq!(start.kind, SymbolKind::Function);

    let banner = symbols.get(base + 0x200).unwrap();
    assert_eq!(banner.name, "build_banner_string");
    assert_eq!(banner.kind, SymbolKind::Data);
}

#[test]
fn reapplication_is_idempotent() {
    let base = 0x1800000000;
    let mut symbols = SymbolTable::new();
    define_fixed_offset_symbols(base, TWO_ENTRIES, SymbolDurability::User, &mut symbols);
    let first = symbols.to_vec();

    define_fixed_offset_symbols(base, TWO_ENTRIES, SymbolDurability::User, &mut symbols);
    assert_eq!(symbols.to_vec(), first);
}

#[test]
fn unknown_base_degrades_to_absolute_offsets() {
    let mut symbols = SymbolTable::new();
    define_fixed_offset_symbols(0, TWO_ENTRIES, SymbolDurability::User, &mut symbols);

    assert!(symbols.get(0x0).is_some());
    assert!(symbols.get(0x200).is_some());
}

#[test]
fn known_table_has_the_expected_entries() {
    let base = 0x100000;
    let mut symbols = SymbolTable::new();
    define_fixed_offset_symbols(
        base,
        KNOWN_FIXED_OFFSET_SYMBOLS,
        SymbolDurability::User,
        &mut symbols,
    );

    assert_eq!(symbols.len(), 4);
    assert_eq!(symbols.get(base).unwrap().name, "_start");
    assert_eq!(symbols.get(base + 0x200).unwrap().name, "build_banner_string");
    assert_eq!(symbols.get(base + 0x240).unwrap().name, "build_style_string");
    assert_eq!(symbols.get(base + 0x280).unwrap().name, "build_tag_string");
}

#[test]
fn durability_choice_is_respected() {
    let mut symbols = SymbolTable::new();
    define_fixed_offset_symbols(0x1000, TWO_ENTRIES, SymbolDurability::Auto, &mut symbols);
    assert_eq!(symbols.get(0x1000).unwrap().durability, SymbolDurability::Auto);

    // A later, authoritative pass may replace the provisional records.
    define_fixed_offset_symbols(0x1000, TWO_ENTRIES, SymbolDurability::User, &mut symbols);
    assert_eq!(symbols.get(0x1000).unwrap().durability, SymbolDurability::User);
}
