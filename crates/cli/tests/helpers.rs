use std::fs;

use secureboot_cli::{load_options_from_yaml, parse_address, sha256_file};
use secureboot_core::model::SymbolDurability;
use tempfile::tempdir;

#[test]
fn parse_address_accepts_hex_and_decimal() {
    assert_eq!(parse_address("0x1800000000").unwrap(), 0x1800000000);
    assert_eq!(parse_address("0X20").unwrap(), 0x20);
    assert_eq!(parse_address("4096").unwrap(), 4096);
}

#[test]
fn parse_address_rejects_garbage() {
    assert!(parse_address("base").is_err());
    assert!(parse_address("0xZZ").is_err());
    assert!(parse_address("").is_err());
}

#[test]
fn load_options_default_from_an_empty_mapping() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("options.yaml");
    fs::write(&path, "{}\n").expect("write options");

    let options = load_options_from_yaml(path.to_str().unwrap()).expect("parse options");
    assert!(options.define_fixed_offset_symbols);
    assert!(options.use_string_heuristics);
    assert_eq!(options.base_address, None);
    assert_eq!(options.fixed_symbol_durability, SymbolDurability::User);
}

#[test]
fn load_options_parse_partial_yaml() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("options.yaml");
    fs::write(
        &path,
        "use_string_heuristics: false\nbase_address: 8192\nfixed_symbol_durability: auto\n",
    )
    .expect("write options");

    let options = load_options_from_yaml(path.to_str().unwrap()).expect("parse options");
    assert!(options.define_fixed_offset_symbols);
    assert!(!options.use_string_heuristics);
    assert_eq!(options.base_address, Some(8192));
    assert_eq!(options.fixed_symbol_durability, SymbolDurability::Auto);
}

#[test]
fn load_options_fail_for_missing_file() {
    assert!(load_options_from_yaml("/definitely/not/here.yaml").is_err());
}

#[test]
fn sha256_file_matches_known_digest() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("abc.bin");
    fs::write(&path, b"abc").expect("write file");

    let digest = sha256_file(&path).expect("hash file");
    assert_eq!(digest, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}
