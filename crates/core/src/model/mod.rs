//! Core data model for loaded firmware images: symbols, segments, sections.
//!
//! Everything here is plain data. The loading pipeline produces these records
//! and the symbol store in [`crate::symbols`] owns the symbol set; nothing in
//! this module reads the image or talks to a decoder.

use serde::{Deserialize, Serialize};

/// What a symbol labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Data,
}

/// Who a symbol definition belongs to, which decides whether later analysis
/// may replace it.
///
/// `Auto` records are provisional and yield to anything more authoritative;
/// `User` records are durable and survive automatic re-definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolDurability {
    Auto,
    #[default]
    User,
}

/// A single named address in the loaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub address: u64,
    pub kind: SymbolKind,
    pub name: String,
    pub durability: SymbolDurability,
}

impl SymbolRecord {
    pub fn new(
        address: u64,
        kind: SymbolKind,
        name: impl Into<String>,
        durability: SymbolDurability,
    ) -> Self {
        Self { address, kind, name: name.into(), durability }
    }
}

bitflags::bitflags! {
    /// Access permissions of a mapped segment.
    ///
    /// Serde impls come from the `bitflags` serde feature.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SegmentPermissions: u8 {
        const READ = 1;
        const WRITE = 1 << 1;
        const EXECUTE = 1 << 2;
    }
}

/// A contiguous file-backed mapping of the image into the address space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub base: u64,
    pub length: u64,
    pub file_offset: u64,
    pub file_length: u64,
    pub permissions: SegmentPermissions,
}

/// Display semantics of a section's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSemantics {
    ReadOnlyCode,
    ReadOnlyData,
    ReadWriteData,
}

/// A named range inside a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub base: u64,
    pub length: u64,
    pub semantics: SectionSemantics,
}

impl Section {
    pub fn new(name: impl Into<String>, base: u64, length: u64, semantics: SectionSemantics) -> Self {
        Self { name: name.into(), base, length, semantics }
    }
}
