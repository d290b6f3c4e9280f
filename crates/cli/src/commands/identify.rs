use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use secureboot_core::image::RawImage;
use secureboot_core::loader::variant::{self, Variant, HEADER_TAG_OFFSET, MIN_IMAGE_LEN};

use crate::sha256_file;

#[derive(Serialize)]
struct IdentifyReport {
    variant: Variant,
    is_rom: bool,
    length: u64,
    sha256: String,
}

/// Classify an image and report the result.
///
/// Rejected images (too short, or no family tag in the header window) exit
/// non-zero: the loader does not apply to them.
pub fn identify_command(image_path: &str, json: bool) -> Result<()> {
    let image = RawImage::from_file(image_path)
        .with_context(|| format!("Failed to open image {image_path}"))?;

    if image.len() < MIN_IMAGE_LEN {
        bail!(
            "Image is {:#x} bytes, below the {MIN_IMAGE_LEN:#x}-byte minimum for this family",
            image.len()
        );
    }
    if !variant::accepts(&image) {
        bail!("No iBoot-family tag at offset {HEADER_TAG_OFFSET:#x}; this loader does not apply");
    }

    let detected = variant::identify(&image);
    let report = IdentifyReport {
        variant: detected,
        is_rom: detected.is_rom(),
        length: image.len(),
        sha256: sha256_file(Path::new(image_path))?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Variant: {detected}");
        println!("ROM image: {}", if report.is_rom { "yes" } else { "no" });
        println!("Length: {:#x}", report.length);
        println!("SHA-256: {}", report.sha256);
    }

    Ok(())
}
