//! Cross-reference recovery: which function touches which string.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::image::RawImage;
use crate::services::analysis::CodeRef;
use crate::services::decoder::{Instruction, InstructionDecoder};

/// Sweep the mapped image and collect code references to string starts.
///
/// Function boundaries are approximated the cheap way: execution enters at
/// `entry_point`, and every in-image `bl` target starts a function. A
/// referencing instruction belongs to the nearest preceding start. Words that
/// fail to decode are skipped — data regions are expected mid-image, so this
/// sweep is lenient where the base-address scan is not.
pub fn scan_code_references(
    image: &RawImage,
    base: u64,
    entry_point: u64,
    decoder: &dyn InstructionDecoder,
    string_starts: &HashSet<u64>,
) -> HashMap<u64, Vec<CodeRef>> {
    let end = base + image.len();

    let mut decoded: Vec<(u64, Instruction)> = Vec::new();
    let mut function_starts: BTreeSet<u64> = BTreeSet::new();
    function_starts.insert(entry_point);

    for offset in (0..image.len()).step_by(4) {
        let Ok(word) = image.read(offset, 4) else {
            break;
        };
        let address = base + offset;
        let Ok(insn) = decoder.decode(word, address) else {
            continue;
        };

        if insn.mnemonic == "bl" {
            if let Some(target) = insn.last_operand_value() {
                if target >= base && target < end {
                    function_starts.insert(target);
                }
            }
        }

        decoded.push((address, insn));
    }

    let mut refs: HashMap<u64, Vec<CodeRef>> = HashMap::new();
    for (address, insn) in &decoded {
        for operand in &insn.operands {
            let Some(value) = operand.value else {
                continue;
            };
            if !string_starts.contains(&value) {
                continue;
            }

            let function_start =
                function_starts.range(..=*address).next_back().copied().unwrap_or(entry_point);
            refs.entry(value).or_default().push(CodeRef { from: *address, function_start });
        }
    }

    refs
}
