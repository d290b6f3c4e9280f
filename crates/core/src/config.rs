//! Load-time configuration.
//!
//! A serializable options struct so frontends can read settings from a config
//! file or flip them per-flag. Every field has a default, so an empty config
//! means "the standard pipeline".

use serde::{Deserialize, Serialize};

use crate::model::SymbolDurability;

fn default_true() -> bool {
    true
}

/// Options governing a single image load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Define the well-known fixed-offset symbols during the synchronous load.
    #[serde(default = "default_true")]
    pub define_fixed_offset_symbols: bool,

    /// Run the string-correlation heuristics once code analysis completes.
    #[serde(default = "default_true")]
    pub use_string_heuristics: bool,

    /// Explicit base address. When set, it replaces whatever the predictor
    /// recovers from the relocation preamble.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_address: Option<u64>,

    /// Architecture name for the instruction decoder (e.g. `aarch64`).
    /// Unresolvable names are reported and the default is retained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,

    /// Durability of the fixed-offset symbol records. Historical versions of
    /// this loader disagreed on auto vs. user here, so the choice is explicit
    /// configuration rather than a baked-in policy.
    #[serde(default)]
    pub fixed_symbol_durability: SymbolDurability,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            define_fixed_offset_symbols: true,
            use_string_heuristics: true,
            base_address: None,
            arch: None,
            fixed_symbol_durability: SymbolDurability::default(),
        }
    }
}
