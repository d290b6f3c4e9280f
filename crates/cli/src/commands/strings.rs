use anyhow::{Context, Result};
use serde::Serialize;

use secureboot_core::analysis::scan_strings;
use secureboot_core::image::RawImage;

#[derive(Serialize)]
struct StringReport {
    offset: u64,
    length: u64,
    text: String,
}

/// List printable strings recovered from the raw image, by file offset.
pub fn strings_command(image_path: &str, min_length: usize, json: bool) -> Result<()> {
    let image = RawImage::from_file(image_path)
        .with_context(|| format!("Failed to open image {image_path}"))?;

    // Base 0 keeps the report in file-offset terms.
    let strings = scan_strings(&image, 0, min_length);

    let reports: Vec<StringReport> = strings
        .iter()
        .filter_map(|s| {
            let bytes = image.read(s.start, s.length).ok()?;
            Some(StringReport {
                offset: s.start,
                length: s.length,
                text: String::from_utf8_lossy(bytes).into_owned(),
            })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("Strings ({}):", reports.len());
        for report in &reports {
            println!("  {:#x} {}", report.offset, report.text);
        }
    }

    Ok(())
}
