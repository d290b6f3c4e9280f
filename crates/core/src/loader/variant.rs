//! Firmware variant identification.
//!
//! Every image in this family carries a human-readable build tag in a fixed
//! 9-byte header window at offset 0x200 (e.g. `iBoot-8419`, `SecureROM for
//! t8030si`). Identification is substring containment over that window — no
//! structured parsing — which matches how the tags actually appear across
//! builds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::image::RawImage;

/// File offset of the header tag window.
pub const HEADER_TAG_OFFSET: u64 = 0x200;

/// Length of the header tag window.
pub const HEADER_TAG_LEN: usize = 9;

/// Minimum length of a loadable image: the header tag plus the fixed-offset
/// structures the rest of the pipeline reads. Shorter images are rejected
/// before any byte is read, so later fixed-offset reads stay in bounds.
pub const MIN_IMAGE_LEN: u64 = 0x400;

/// The firmware variants this loader supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    #[serde(rename = "SecureROM")]
    SecureRom,
    #[serde(rename = "iBoot")]
    IBoot,
    #[serde(rename = "iBEC")]
    IBec,
    #[serde(rename = "iBSS")]
    IBss,
    #[serde(rename = "AVPBooter")]
    AvpBooter,
}

impl Variant {
    /// All known variants, in naming precedence order: when a header window
    /// contains more than one tag, the first match here wins.
    pub const ALL: [Variant; 5] =
        [Variant::SecureRom, Variant::IBoot, Variant::IBec, Variant::IBss, Variant::AvpBooter];

    /// The tag string this variant carries in its header window.
    pub fn tag(&self) -> &'static str {
        match self {
            Variant::SecureRom => "SecureROM",
            Variant::IBoot => "iBoot",
            Variant::IBec => "iBEC",
            Variant::IBss => "iBSS",
            Variant::AvpBooter => "AVPBooter",
        }
    }

    /// Whether this variant executes from ROM rather than a relocated RAM
    /// copy.
    pub fn is_rom(&self) -> bool {
        matches!(self, Variant::SecureRom)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn contains_tag(window: &[u8], tag: &str) -> bool {
    let tag = tag.as_bytes();
    window.len() >= tag.len() && window.windows(tag.len()).any(|w| w == tag)
}

fn header_window(image: &RawImage) -> Option<[u8; HEADER_TAG_LEN]> {
    let bytes = image.read(HEADER_TAG_OFFSET, HEADER_TAG_LEN as u64).ok()?;
    let mut window = [0u8; HEADER_TAG_LEN];
    window.copy_from_slice(bytes);
    Some(window)
}

/// Whether `image` belongs to this family at all: long enough to hold the
/// structures the pipeline reads, with at least one known tag in the header
/// window.
pub fn accepts(image: &RawImage) -> bool {
    if image.len() < MIN_IMAGE_LEN {
        return false;
    }

    match header_window(image) {
        Some(window) => Variant::ALL.iter().any(|v| contains_tag(&window, v.tag())),
        None => false,
    }
}

/// Identify which variant `image` is.
///
/// Pure classification: the first variant (in [`Variant::ALL`] order) whose
/// tag appears in the header window, defaulting to iBoot when none match.
pub fn identify(image: &RawImage) -> Variant {
    let Some(window) = header_window(image) else {
        return Variant::IBoot;
    };

    Variant::ALL
        .into_iter()
        .find(|v| contains_tag(&window, v.tag()))
        .unwrap_or(Variant::IBoot)
}
