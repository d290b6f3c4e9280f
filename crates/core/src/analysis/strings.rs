//! Printable-string recovery from the raw image.

use crate::image::RawImage;
use crate::services::analysis::StringRef;

/// Minimum run length worth recording.
pub const MIN_STRING_LEN: usize = 4;

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// Scan `image` for runs of printable ASCII of at least `min_len` bytes.
///
/// Results are reported at virtual addresses: file offset 0 maps to `base`.
/// Run length excludes the terminator, matching how the firmware stores its
/// C strings.
pub fn scan_strings(image: &RawImage, base: u64, min_len: usize) -> Vec<StringRef> {
    let bytes = image.bytes();
    let mut strings = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, &byte) in bytes.iter().enumerate() {
        if is_printable(byte) {
            run_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = run_start.take() {
            if i - start >= min_len {
                strings.push(StringRef { start: base + start as u64, length: (i - start) as u64 });
            }
        }
    }

    if let Some(start) = run_start {
        if bytes.len() - start >= min_len {
            strings.push(StringRef {
                start: base + start as u64,
                length: (bytes.len() - start) as u64,
            });
        }
    }

    strings
}
