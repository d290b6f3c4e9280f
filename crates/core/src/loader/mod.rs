//! The image-loading pipeline.
//!
//! [`load`] runs the synchronous path: acceptance gate, variant
//! identification, base-address prediction (or an explicit override), segment
//! and section registration, and fixed-offset annotation. The returned
//! [`LoadedImage`] then waits in the `Loading` state; when the caller's
//! analysis engine finishes, one call to [`LoadedImage::analysis_complete`]
//! runs the string-correlation heuristics and the state machine terminates in
//! `Annotated`. If that signal never arrives the image simply stays in
//! `Loading`, which is acceptable.
//!
//! Nothing past the acceptance gate is fatal: the worst outcome is a base of
//! zero, fewer symbols, and errors in the log.

pub mod annotate;
pub mod base;
pub mod tables;
pub mod variant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LoadOptions;
use crate::image::RawImage;
use crate::model::{Section, SectionSemantics, Segment, SegmentPermissions};
use crate::services::analysis::CodeAnalysis;
use crate::services::decoder::InstructionDecoder;
use crate::symbols::SymbolTable;

pub use base::{predict_base_address, UNKNOWN_BASE};
pub use variant::{accepts, identify, Variant, MIN_IMAGE_LEN};

/// Why an image was rejected by the acceptance gate.
///
/// Rejection means "this loader does not apply", not that loading failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Image is {len:#x} bytes, shorter than the 0x400-byte minimum")]
    TooShort { len: u64 },

    #[error("No iBoot-family tag found in the image header window")]
    UnrecognizedHeader,
}

/// Pipeline state of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Annotated,
}

/// A firmware image after the synchronous load path.
///
/// Owns the raw bytes, so the deferred annotation step can never outlive the
/// image it reads from.
#[derive(Debug)]
pub struct LoadedImage {
    image: RawImage,
    variant: Variant,
    base_address: u64,
    entry_point: u64,
    segments: Vec<Segment>,
    sections: Vec<Section>,
    symbols: SymbolTable,
    options: LoadOptions,
    state: LoadState,
}

/// Load `image`, returning a [`LoadedImage`] ready for code analysis.
///
/// This is the capability-checked factory: it returns [`LoadError`] only when
/// the image is not a member of this family at all. Every later failure
/// degrades annotation quality instead of failing the load.
pub fn load(
    image: RawImage,
    decoder: &dyn InstructionDecoder,
    options: LoadOptions,
) -> Result<LoadedImage, LoadError> {
    if image.len() < MIN_IMAGE_LEN {
        return Err(LoadError::TooShort { len: image.len() });
    }
    if !variant::accepts(&image) {
        return Err(LoadError::UnrecognizedHeader);
    }

    let variant = variant::identify(&image);
    log::info!("Loading image as {variant}.");

    let mut base_address = base::predict_base_address(&image, decoder);
    if let Some(override_base) = options.base_address {
        log::info!("Using configured base address {override_base:#x}.");
        base_address = override_base;
    } else if base_address == UNKNOWN_BASE {
        log::error!("Failed to predict base address via relocation loop; analysis will be poor!");
    } else {
        log::info!("Predicted base address is {base_address:#x}.");
    }

    let length = image.len();
    let segments = vec![Segment {
        base: base_address,
        length,
        file_offset: 0,
        file_length: length,
        permissions: SegmentPermissions::READ | SegmentPermissions::EXECUTE,
    }];
    let sections =
        vec![Section::new(variant.tag(), base_address, length, SectionSemantics::ReadOnlyCode)];

    let mut symbols = SymbolTable::new();
    if options.define_fixed_offset_symbols {
        annotate::define_fixed_offset_symbols(
            base_address,
            tables::KNOWN_FIXED_OFFSET_SYMBOLS,
            options.fixed_symbol_durability,
            &mut symbols,
        );
    }

    Ok(LoadedImage {
        image,
        variant,
        base_address,
        entry_point: base_address,
        segments,
        sections,
        symbols,
        options,
        state: LoadState::Loading,
    })
}

impl LoadedImage {
    /// Deliver the one-shot "code analysis is complete" signal.
    ///
    /// The first call runs the string-correlation heuristics (when enabled)
    /// and moves the state machine to `Annotated`; every later call is a
    /// no-op returning `false`.
    pub fn analysis_complete(&mut self, analysis: &dyn CodeAnalysis) -> bool {
        if self.state == LoadState::Annotated {
            log::debug!("Ignoring repeated analysis-completion signal.");
            return false;
        }
        self.state = LoadState::Annotated;

        if self.options.use_string_heuristics {
            log::info!("Analysis complete, searching for strings to help define symbols...");
            annotate::define_string_associated_symbols(
                &self.image,
                self.base_address,
                tables::KNOWN_STRING_ASSOCIATED_SYMBOLS,
                analysis,
                &mut self.symbols,
            );
        }

        true
    }

    pub fn image(&self) -> &RawImage {
        &self.image
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The resolved base address; [`UNKNOWN_BASE`] when prediction failed and
    /// no override was configured. Frozen once the segments are registered.
    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    pub fn entry_point(&self) -> u64 {
        self.entry_point
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn state(&self) -> LoadState {
        self.state
    }
}
