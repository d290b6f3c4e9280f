//! The code-analysis services consumed by the deferred annotation stage.
//!
//! String extraction and cross-reference indexing happen after full code
//! analysis, outside the synchronous load path. The heuristics only need the
//! two queries below; [`crate::analysis::AnalysisIndex`] is the in-crate
//! implementation, and a host with its own analysis engine can supply one
//! instead.

use serde::{Deserialize, Serialize};

/// A string recovered from the image, by virtual address.
///
/// Only the location is recorded; the text is re-read from the raw image when
/// needed so the index stays small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringRef {
    pub start: u64,
    pub length: u64,
}

/// A code reference to some address, attributed to the function containing
/// the referencing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRef {
    pub from: u64,
    pub function_start: u64,
}

/// String table and cross-reference index over a fully analyzed image.
pub trait CodeAnalysis {
    /// All recovered strings, in discovery order.
    fn strings(&self) -> &[StringRef];

    /// Code references to `address`, in discovery order.
    fn code_refs_to(&self, address: u64) -> Vec<CodeRef>;
}
