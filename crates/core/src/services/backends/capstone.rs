//! Capstone-backed instruction decoding.

use capstone::{arch, prelude::*, Capstone};

use crate::services::decoder::{DecodeError, Instruction, InstructionDecoder, Operand};

/// Default architecture for this image family: every observed variant since
/// the 64-bit transition is AArch64.
pub const DEFAULT_ARCH: &str = "aarch64";

/// Instruction decoder built on Capstone, in detail mode so resolved
/// immediate operands are available.
pub struct CapstoneDecoder {
    cs: Capstone,
}

fn build_cs(arch: &str) -> Result<Capstone, capstone::Error> {
    match arch {
        "aarch64" | "arm64" => {
            Capstone::new().arm64().mode(arch::arm64::ArchMode::Arm).detail(true).build()
        }
        "arm" | "armv7" => {
            Capstone::new().arm().mode(arch::arm::ArchMode::Arm).detail(true).build()
        }
        "x86_64" | "amd64" => {
            Capstone::new().x86().mode(arch::x86::ArchMode::Mode64).detail(true).build()
        }
        _ => Capstone::new().arm64().mode(arch::arm64::ArchMode::Arm).detail(true).build(),
    }
}

impl CapstoneDecoder {
    /// Decoder for the default AArch64 architecture.
    pub fn aarch64() -> Result<Self, DecodeError> {
        Self::for_arch(None)
    }

    /// Decoder for an optional architecture override.
    ///
    /// An override name that does not resolve is reported and the AArch64
    /// default is retained.
    pub fn for_arch(name: Option<&str>) -> Result<Self, DecodeError> {
        let requested = name.map(|n| n.to_lowercase());
        let arch = match requested.as_deref() {
            None => DEFAULT_ARCH,
            Some(known @ ("aarch64" | "arm64" | "arm" | "armv7" | "x86_64" | "amd64")) => known,
            Some(other) => {
                log::error!("Unknown architecture override `{other}`; keeping {DEFAULT_ARCH}.");
                DEFAULT_ARCH
            }
        };

        let cs = build_cs(arch).map_err(|e| DecodeError::Backend {
            address: 0,
            message: format!("capstone init failed for {arch}: {e}"),
        })?;
        Ok(Self { cs })
    }
}

/// Resolved immediate value of one Capstone operand, if it carries one.
fn operand_value(op: &arch::ArchOperand) -> Option<u64> {
    match op {
        arch::ArchOperand::Arm64Operand(op) => {
            if let arch::arm64::Arm64OperandType::Imm(imm) = op.op_type {
                Some(imm as u64)
            } else {
                None
            }
        }
        arch::ArchOperand::ArmOperand(op) => {
            if let arch::arm::ArmOperandType::Imm(imm) = op.op_type {
                Some(imm as u64)
            } else {
                None
            }
        }
        arch::ArchOperand::X86Operand(op) => {
            if let arch::x86::X86OperandType::Imm(imm) = op.op_type {
                Some(imm as u64)
            } else {
                None
            }
        }
        _ => None,
    }
}

impl InstructionDecoder for CapstoneDecoder {
    fn decode(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError> {
        let insns = self
            .cs
            .disasm_count(bytes, address, 1)
            .map_err(|e| DecodeError::Backend { address, message: e.to_string() })?;
        let insn = insns.iter().next().ok_or(DecodeError::Unrecognized { address })?;

        let mnemonic = insn.mnemonic().unwrap_or("").to_string();

        let values: Vec<Option<u64>> = match self.cs.insn_detail(insn) {
            Ok(detail) => detail.arch_detail().operands().iter().map(operand_value).collect(),
            Err(_) => Vec::new(),
        };

        // Operand text comes from the rendered operand string. The split is
        // only trusted when it lines up with Capstone's operand list; memory
        // operands render with embedded commas.
        let texts: Vec<String> = insn
            .op_str()
            .unwrap_or("")
            .split(", ")
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let operands = if texts.len() == values.len() {
            texts.into_iter().zip(values).map(|(text, value)| Operand::new(text, value)).collect()
        } else {
            values.into_iter().map(|value| Operand::new("", value)).collect()
        };

        Ok(Instruction::new(mnemonic, operands))
    }

    fn name(&self) -> &'static str {
        "capstone"
    }
}
