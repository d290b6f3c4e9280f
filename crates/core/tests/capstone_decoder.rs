#![cfg(feature = "capstone-backend")]

use secureboot_core::image::RawImage;
use secureboot_core::loader::base::predict_base_address;
use secureboot_core::services::backends::CapstoneDecoder;
use secureboot_core::services::decoder::InstructionDecoder;

// AArch64 encodings used below:
//   d503201f  nop
//   580007e0  ldr x0, #0x100   (literal, resolved from pc = 4)
//   94000002  bl  #8           (relative, resolved from pc = 0)
const NOP: u32 = 0xd503201f;
const LDR_X0_LITERAL: u32 = 0x580007e0;
const BL_PLUS_8: u32 = 0x94000002;

#[test]
fn decodes_a_nop() {
    let decoder = CapstoneDecoder::aarch64().unwrap();
    let insn = decoder.decode(&NOP.to_le_bytes(), 0).unwrap();
    assert_eq!(insn.mnemonic, "nop");
    assert!(insn.operands.is_empty());
}

#[test]
fn literal_load_exposes_the_resolved_pool_offset() {
    let decoder = CapstoneDecoder::aarch64().unwrap();
    let insn = decoder.decode(&LDR_X0_LITERAL.to_le_bytes(), 4).unwrap();
    assert_eq!(insn.mnemonic, "ldr");
    assert_eq!(insn.last_operand_value(), Some(0x100));
}

#[test]
fn branch_exposes_the_resolved_target() {
    let decoder = CapstoneDecoder::aarch64().unwrap();
    let insn = decoder.decode(&BL_PLUS_8.to_le_bytes(), 0).unwrap();
    assert_eq!(insn.mnemonic, "bl");
    assert_eq!(insn.last_operand_value(), Some(8));
}

#[test]
fn undecodable_word_is_an_error() {
    let decoder = CapstoneDecoder::aarch64().unwrap();
    assert!(decoder.decode(&[0u8; 4], 0).is_err());
}

#[test]
fn unknown_architecture_override_retains_the_default() {
    let decoder = CapstoneDecoder::for_arch(Some("pdp11")).unwrap();
    let insn = decoder.decode(&NOP.to_le_bytes(), 0).unwrap();
    assert_eq!(insn.mnemonic, "nop");
}

#[test]
fn predicts_the_base_from_a_real_relocation_preamble() {
    let base: u64 = 0x1800000000;
    let mut bytes = vec![0u8; 0x400];
    bytes[0..4].copy_from_slice(&NOP.to_le_bytes());
    bytes[4..8].copy_from_slice(&LDR_X0_LITERAL.to_le_bytes());
    bytes[0x100..0x108].copy_from_slice(&base.to_le_bytes());

    let image = RawImage::new(bytes);
    let decoder = CapstoneDecoder::aarch64().unwrap();

    assert_eq!(predict_base_address(&image, &decoder), base);
}
