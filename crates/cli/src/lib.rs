//! Support library for the `secureboot` CLI.
//!
//! The CLI is a thin wrapper around `secureboot-core`; all substantive logic
//! lives in the library so it can be tested thoroughly and reused from other
//! frontends. This crate only parses arguments, wires the pipeline together,
//! and formats reports.

use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use secureboot_core::config::LoadOptions;

pub mod commands;

/// Parse an address argument, accepting `0x`-prefixed hex or plain decimal.
pub fn parse_address(value: &str) -> Result<u64> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.with_context(|| format!("Invalid address: {value}"))
}

/// Read [`LoadOptions`] from a YAML file.
pub fn load_options_from_yaml(path: &str) -> Result<LoadOptions> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file {path}"))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse options file {path}"))
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open image for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read image for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}
