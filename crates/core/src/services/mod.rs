//! Collaborator services the loading pipeline is written against.
//!
//! The pipeline itself never hard-codes a disassembler or an analysis engine;
//! it consumes the traits defined here. Production implementations live in
//! [`backends`] (Capstone) and [`crate::analysis`] (the reference string and
//! cross-reference index); tests substitute scripted fakes.

pub mod analysis;
pub mod backends;
pub mod decoder;

pub use analysis::{CodeAnalysis, CodeRef, StringRef};
pub use decoder::{DecodeError, Instruction, InstructionDecoder, Operand};
