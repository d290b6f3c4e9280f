use anyhow::{Context, Result};

use secureboot_core::image::RawImage;
use secureboot_core::loader::{predict_base_address, UNKNOWN_BASE};
use secureboot_core::services::backends::CapstoneDecoder;

/// Run the base-address predictor alone and print what it recovers.
pub fn predict_base_command(image_path: &str, arch: Option<&str>) -> Result<()> {
    let image = RawImage::from_file(image_path)
        .with_context(|| format!("Failed to open image {image_path}"))?;
    let decoder =
        CapstoneDecoder::for_arch(arch).context("Failed to initialize instruction decoder")?;

    let base = predict_base_address(&image, &decoder);
    if base == UNKNOWN_BASE {
        println!("Base address: unknown (0x0)");
    } else {
        println!("Base address: {base:#x}");
    }

    Ok(())
}
