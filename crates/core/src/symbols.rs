//! The symbol store produced by annotation.
//!
//! Definitions carry a durability: user records are authoritative and replace
//! whatever is already at an address, while auto records only fill empty
//! slots. Re-defining an identical record is a no-op, which keeps every
//! annotator in this crate idempotent.

use std::collections::BTreeMap;

use crate::model::{SymbolDurability, SymbolKind, SymbolRecord};

/// Address-ordered set of symbol records, one per address.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: BTreeMap<u64, SymbolRecord>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol, honoring durability.
    ///
    /// Returns `true` when the table changed.
    pub fn define(
        &mut self,
        address: u64,
        kind: SymbolKind,
        name: impl Into<String>,
        durability: SymbolDurability,
    ) -> bool {
        let record = SymbolRecord::new(address, kind, name, durability);

        match self.records.get(&address) {
            None => {
                self.records.insert(address, record);
                true
            }
            Some(existing) if *existing == record => false,
            Some(existing) => {
                // Auto definitions never clobber an existing record.
                if durability == SymbolDurability::Auto {
                    log::debug!(
                        "Keeping existing symbol `{}` at {address:#x}; auto definition `{}` skipped.",
                        existing.name,
                        record.name
                    );
                    return false;
                }
                self.records.insert(address, record);
                true
            }
        }
    }

    /// The record at `address`, if any.
    pub fn get(&self, address: u64) -> Option<&SymbolRecord> {
        self.records.get(&address)
    }

    /// All records in address order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clone the records out in address order, for reports.
    pub fn to_vec(&self) -> Vec<SymbolRecord> {
        self.records.values().cloned().collect()
    }
}
