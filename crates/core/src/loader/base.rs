//! Base address prediction.
//!
//! Images in this family begin with a short relocation preamble that loads
//! the destination address from a literal pool before copying the image
//! there. The predictor walks the first instruction words until it hits that
//! load, then reads the pool entry it targets.

use crate::image::RawImage;
use crate::services::decoder::InstructionDecoder;

/// The scan window: 128 aligned instruction words.
pub const SCAN_WINDOW: u64 = 0x200;

/// Sentinel meaning the base address could not be determined.
pub const UNKNOWN_BASE: u64 = 0;

/// Recover the address `image` expects to be relocated to at boot.
///
/// Never fails outright: the return value is [`UNKNOWN_BASE`] when prediction
/// is impossible, and failures are reported through logging only. A decode
/// failure inside the window is a hard stop, not a skip — an image whose
/// leading words do not decode is not well-formed enough to keep scanning.
pub fn predict_base_address(image: &RawImage, decoder: &dyn InstructionDecoder) -> u64 {
    for offset in (0..SCAN_WINDOW).step_by(4) {
        let word = match image.read(offset, 4) {
            Ok(word) => word,
            Err(err) => {
                log::error!("Failed to read instruction word at offset {offset:#x}: {err}");
                return UNKNOWN_BASE;
            }
        };

        let insn = match decoder.decode(word, offset) {
            Ok(insn) if !insn.mnemonic.is_empty() => insn,
            Ok(_) => {
                log::error!("Decoder produced no tokens at offset {offset:#x}.");
                return UNKNOWN_BASE;
            }
            Err(err) => {
                log::error!("Failed to decode instruction at offset {offset:#x}: {err}");
                return UNKNOWN_BASE;
            }
        };

        // A LDR should be present in the first few instructions to get the
        // address the image should be copied to.
        if insn.mnemonic != "ldr" {
            continue;
        }

        // The last operand is the literal-pool offset the load references,
        // already resolved to an integer by the decoder.
        let Some(pool_offset) = insn.last_operand_value() else {
            log::error!(
                "Load instruction at offset {offset:#x} carries no resolved literal offset."
            );
            return UNKNOWN_BASE;
        };

        return match image.read_u64_le(pool_offset) {
            Ok(base) => base,
            Err(err) => {
                log::error!("Failed to read literal pool while predicting base address: {err}");
                UNKNOWN_BASE
            }
        };
    }

    UNKNOWN_BASE
}
