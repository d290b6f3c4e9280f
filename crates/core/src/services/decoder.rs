//! The instruction-decoding service.
//!
//! Decoding is a black box to the loader: it hands the service raw bytes and
//! an address, and gets back a mnemonic plus operand tokens. The one contract
//! the loader leans on is that a resolved load instruction exposes the
//! numeric value of its final operand (the literal-pool byte offset the load
//! targets).

use thiserror::Error;

/// A single decoded operand token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// Rendered form, e.g. `x0` or `#0x100`. May be empty when the backend
    /// cannot attribute text to individual operands.
    pub text: String,
    /// Resolved numeric value, when the backend knows one.
    pub value: Option<u64>,
}

impl Operand {
    pub fn new(text: impl Into<String>, value: Option<u64>) -> Self {
        Self { text: text.into(), value }
    }

    /// An operand carrying only a resolved immediate.
    pub fn imm(value: u64) -> Self {
        Self { text: format!("#{value:#x}"), value: Some(value) }
    }
}

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(mnemonic: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self { mnemonic: mnemonic.into(), operands }
    }

    /// The resolved value of the final operand, if present.
    pub fn last_operand_value(&self) -> Option<u64> {
        self.operands.last().and_then(|op| op.value)
    }
}

/// Error type for instruction decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes did not decode to any instruction.
    #[error("No instruction could be decoded at {address:#x}")]
    Unrecognized { address: u64 },

    /// The decoding backend itself failed.
    #[error("Decoder error at {address:#x}: {message}")]
    Backend { address: u64, message: String },
}

/// Trait implemented by instruction-decoding backends (e.g. Capstone).
pub trait InstructionDecoder {
    /// Decode one instruction from `bytes`, which start at `address`.
    fn decode(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError>;

    /// Returns a human-readable name for the backend.
    fn name(&self) -> &'static str;
}
