//! The two symbol annotators.
//!
//! Fixed-offset annotation runs synchronously at load time; string-correlated
//! annotation runs once code analysis is complete. Both are additive and
//! idempotent, and the string heuristics are best-effort: a miss skips one
//! entry and never aborts the pipeline.

use crate::image::RawImage;
use crate::loader::tables::{FixedOffsetSymbol, StringAssociatedSymbol};
use crate::model::{SymbolDurability, SymbolKind};
use crate::services::analysis::{CodeAnalysis, StringRef};
use crate::symbols::SymbolTable;

/// Define one symbol per table entry at `base + offset`.
///
/// A zero (unknown) base degrades to absolute offsets from zero; that is
/// deliberate and deterministic, not a failure.
pub fn define_fixed_offset_symbols(
    base: u64,
    table: &[FixedOffsetSymbol],
    durability: SymbolDurability,
    symbols: &mut SymbolTable,
) {
    for def in table {
        let address = base + u64::from(def.offset);
        symbols.define(address, def.kind, def.name, durability);
        log::info!("Defined fixed-offset symbol `{}` at {address:#x}.", def.name);
    }
}

/// Decoded text of a recovered string, read back from the raw image.
///
/// `start` is a virtual address; the single-segment mapping puts file offset
/// 0 at `base`. Returns `None` when the string falls outside the image.
pub fn string_value(image: &RawImage, base: u64, string: &StringRef) -> Option<String> {
    let offset = string.start.checked_sub(base)?;
    let bytes = image.read(offset, string.length).ok()?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

fn first_string_containing(
    image: &RawImage,
    base: u64,
    analysis: &dyn CodeAnalysis,
    pattern: &str,
) -> Option<StringRef> {
    analysis
        .strings()
        .iter()
        .find(|s| {
            string_value(image, base, s).is_some_and(|text| text.contains(pattern))
        })
        .copied()
}

/// Name functions by the diagnostic strings they reference.
///
/// For each table entry, in order: find the first string whose text contains
/// the pattern, take the first code reference to it, and define the entry's
/// name at the referencing function's start. Entries that miss are logged and
/// skipped.
pub fn define_string_associated_symbols(
    image: &RawImage,
    base: u64,
    table: &[StringAssociatedSymbol],
    analysis: &dyn CodeAnalysis,
    symbols: &mut SymbolTable,
) {
    for def in table {
        let Some(string) = first_string_containing(image, base, analysis, def.pattern) else {
            log::debug!("Failed to find string with pattern \"{}\".", def.pattern);
            continue;
        };

        let refs = analysis.code_refs_to(string.start);
        let Some(first_ref) = refs.first() else {
            log::debug!(
                "Failed to find code references to string with pattern \"{}\".",
                def.pattern
            );
            continue;
        };

        let address = first_ref.function_start;
        symbols.define(address, SymbolKind::Function, def.name, SymbolDurability::User);
        log::info!(
            "Defined symbol `{}` for function at {address:#x} based on string reference(s).",
            def.name
        );
    }
}
