//! Reference implementation of the post-load code analysis services.
//!
//! The deferred annotation stage needs a string table and a cross-reference
//! index, which a full analysis host would provide. [`AnalysisIndex`] is the
//! in-crate stand-in: a single sweep over the mapped image that recovers
//! printable strings and attributes string-operand hits to the function
//! containing them. It implements [`CodeAnalysis`] so the loader cannot tell
//! it apart from a real host engine.

pub mod strings;
pub mod xrefs;

use std::collections::{HashMap, HashSet};

use crate::image::RawImage;
use crate::services::analysis::{CodeAnalysis, CodeRef, StringRef};
use crate::services::decoder::InstructionDecoder;

pub use strings::{scan_strings, MIN_STRING_LEN};
pub use xrefs::scan_code_references;

/// String table plus cross-reference index over one loaded image.
#[derive(Debug, Clone, Default)]
pub struct AnalysisIndex {
    strings: Vec<StringRef>,
    refs: HashMap<u64, Vec<CodeRef>>,
}

impl AnalysisIndex {
    /// Sweep `image`, mapped at `base` with execution starting at
    /// `entry_point`, and build the index.
    pub fn build(
        image: &RawImage,
        base: u64,
        entry_point: u64,
        decoder: &dyn InstructionDecoder,
    ) -> Self {
        let strings = scan_strings(image, base, MIN_STRING_LEN);
        let string_starts: HashSet<u64> = strings.iter().map(|s| s.start).collect();
        let refs = scan_code_references(image, base, entry_point, decoder, &string_starts);

        log::info!(
            "Analysis index built: {} strings, {} referenced addresses.",
            strings.len(),
            refs.len()
        );

        Self { strings, refs }
    }
}

impl CodeAnalysis for AnalysisIndex {
    fn strings(&self) -> &[StringRef] {
        &self.strings
    }

    fn code_refs_to(&self, address: u64) -> Vec<CodeRef> {
        self.refs.get(&address).cloned().unwrap_or_default()
    }
}
