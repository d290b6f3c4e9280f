use std::collections::HashMap;

use secureboot_core::analysis::{scan_strings, AnalysisIndex};
use secureboot_core::image::RawImage;
use secureboot_core::services::analysis::CodeAnalysis;
use secureboot_core::services::decoder::{DecodeError, Instruction, InstructionDecoder, Operand};

const BASE: u64 = 0x10000;

/// Decoder scripted by virtual address; everything else fails to decode, the
/// way data regions do.
struct ScriptedDecoder {
    insns: HashMap<u64, Instruction>,
}

impl InstructionDecoder for ScriptedDecoder {
    fn decode(&self, _bytes: &[u8], address: u64) -> Result<Instruction, DecodeError> {
        self.insns.get(&address).cloned().ok_or(DecodeError::Unrecognized { address })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn bl(target: u64) -> Instruction {
    Instruction::new("bl", vec![Operand::imm(target)])
}

fn adr(target: u64) -> Instruction {
    Instruction::new("adr", vec![Operand::new("x0", None), Operand::imm(target)])
}

#[test]
fn scan_strings_recovers_printable_runs_at_virtual_addresses() {
    let mut bytes = vec![0u8; 0x100];
    bytes[0x10..0x13].copy_from_slice(b"abc"); // below the minimum, dropped
    bytes[0x20..0x35].copy_from_slice(b"Combo image too large");
    bytes[0xfc..0x100].copy_from_slice(b"tail"); // unterminated tail run

    let image = RawImage::new(bytes);
    let strings = scan_strings(&image, BASE, 4);

    assert_eq!(strings.len(), 2);
    assert_eq!(strings[0].start, BASE + 0x20);
    assert_eq!(strings[0].length, 21);
    assert_eq!(strings[1].start, BASE + 0xfc);
    assert_eq!(strings[1].length, 4);
}

#[test]
fn index_attributes_references_to_the_containing_function() {
    let text = b"Combo image too large";
    let mut bytes = vec![0u8; 0x400];
    bytes[0x240..0x240 + text.len()].copy_from_slice(text);
    let image = RawImage::new(bytes);

    // The entry function references the string from BASE+4; a called
    // function starting at BASE+0x20 references it again.
    let insns = HashMap::from([
        (BASE, bl(BASE + 0x20)),
        (BASE + 4, adr(BASE + 0x240)),
        (BASE + 0x20, adr(BASE + 0x240)),
    ]);
    let decoder = ScriptedDecoder { insns };

    let index = AnalysisIndex::build(&image, BASE, BASE, &decoder);

    assert_eq!(index.strings().len(), 1);
    assert_eq!(index.strings()[0].start, BASE + 0x240);

    let refs = index.code_refs_to(BASE + 0x240);
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].from, BASE + 4);
    assert_eq!(refs[0].function_start, BASE);
    assert_eq!(refs[1].from, BASE + 0x20);
    assert_eq!(refs[1].function_start, BASE + 0x20);
}

#[test]
fn operands_not_hitting_string_starts_produce_no_references() {
    let text = b"Combo image too large";
    let mut bytes = vec![0u8; 0x400];
    bytes[0x240..0x240 + text.len()].copy_from_slice(text);
    let image = RawImage::new(bytes);

    // Points into the middle of the string, not at its start.
    let insns = HashMap::from([(BASE, adr(BASE + 0x244))]);
    let decoder = ScriptedDecoder { insns };

    let index = AnalysisIndex::build(&image, BASE, BASE, &decoder);
    assert!(index.code_refs_to(BASE + 0x240).is_empty());
    assert!(index.code_refs_to(BASE + 0x244).is_empty());
}

#[test]
fn out_of_image_branch_targets_do_not_become_functions() {
    let text = b"idle task";
    let mut bytes = vec![0u8; 0x400];
    bytes[0x240..0x240 + text.len()].copy_from_slice(text);
    let image = RawImage::new(bytes);

    // The branch target lies outside the mapped image, so the later
    // reference still belongs to the entry function.
    let insns = HashMap::from([
        (BASE, bl(BASE + 0x10000)),
        (BASE + 8, adr(BASE + 0x240)),
    ]);
    let decoder = ScriptedDecoder { insns };

    let index = AnalysisIndex::build(&image, BASE, BASE, &decoder);
    let refs = index.code_refs_to(BASE + 0x240);
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].function_start, BASE);
}

#[test]
fn empty_index_answers_queries_harmlessly() {
    let image = RawImage::new(vec![0u8; 0x100]);
    let decoder = ScriptedDecoder { insns: HashMap::new() };

    let index = AnalysisIndex::build(&image, BASE, BASE, &decoder);
    assert!(index.strings().is_empty());
    assert!(index.code_refs_to(BASE).is_empty());
}
