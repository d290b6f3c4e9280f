use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use secureboot_core::analysis::AnalysisIndex;
use secureboot_core::config::LoadOptions;
use secureboot_core::image::RawImage;
use secureboot_core::loader::{self, LoadState, Variant};
use secureboot_core::model::{
    Section, Segment, SegmentPermissions, SymbolDurability, SymbolKind, SymbolRecord,
};
use secureboot_core::services::backends::CapstoneDecoder;

use crate::{load_options_from_yaml, parse_address};

/// Arguments for the `load` command.
#[derive(Debug, Default)]
pub struct LoadArgs {
    pub image: String,
    pub json: bool,
    pub base: Option<String>,
    pub arch: Option<String>,
    pub config: Option<String>,
    pub no_fixed_symbols: bool,
    pub no_string_heuristics: bool,
}

#[derive(Serialize)]
struct LoadReport {
    variant: Variant,
    base_address: u64,
    entry_point: u64,
    state: LoadState,
    segments: Vec<Segment>,
    sections: Vec<Section>,
    symbols: Vec<SymbolRecord>,
}

/// Run the full pipeline: synchronous load, then the reference analysis
/// engine, then the deferred string-heuristic annotation.
pub fn load_command(args: &LoadArgs) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => load_options_from_yaml(path)?,
        None => LoadOptions::default(),
    };
    if args.no_fixed_symbols {
        options.define_fixed_offset_symbols = false;
    }
    if args.no_string_heuristics {
        options.use_string_heuristics = false;
    }
    if let Some(base) = &args.base {
        options.base_address = Some(parse_address(base)?);
    }
    if let Some(arch) = &args.arch {
        options.arch = Some(arch.clone());
    }

    let image = RawImage::from_file(&args.image)
        .with_context(|| format!("Failed to open image {}", args.image))?;
    let decoder = CapstoneDecoder::for_arch(options.arch.as_deref())
        .context("Failed to initialize instruction decoder")?;

    let mut loaded = loader::load(image, &decoder, options)
        .map_err(|e| anyhow!("{e}; this loader does not apply"))?;

    // Stand in for the host's analysis engine, then deliver the one-shot
    // completion signal that unlocks the string heuristics.
    let index = AnalysisIndex::build(
        loaded.image(),
        loaded.base_address(),
        loaded.entry_point(),
        &decoder,
    );
    loaded.analysis_complete(&index);

    let report = LoadReport {
        variant: loaded.variant(),
        base_address: loaded.base_address(),
        entry_point: loaded.entry_point(),
        state: loaded.state(),
        segments: loaded.segments().to_vec(),
        sections: loaded.sections().to_vec(),
        symbols: loaded.symbols().to_vec(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn permissions_display(perms: SegmentPermissions) -> String {
    let mut out = String::new();
    out.push(if perms.contains(SegmentPermissions::READ) { 'r' } else { '-' });
    out.push(if perms.contains(SegmentPermissions::WRITE) { 'w' } else { '-' });
    out.push(if perms.contains(SegmentPermissions::EXECUTE) { 'x' } else { '-' });
    out
}

fn kind_display(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Function => "function",
        SymbolKind::Data => "data",
    }
}

fn durability_display(durability: SymbolDurability) -> &'static str {
    match durability {
        SymbolDurability::Auto => "auto",
        SymbolDurability::User => "user",
    }
}

fn print_report(report: &LoadReport) {
    println!("Variant: {}", report.variant);
    if report.base_address == loader::UNKNOWN_BASE {
        println!("Base address: unknown (0x0)");
    } else {
        println!("Base address: {:#x}", report.base_address);
    }
    println!("Entry point: {:#x}", report.entry_point);

    println!("Segments:");
    for seg in &report.segments {
        println!(
            "  {:#x}..{:#x} (file {:#x}..{:#x}) [{}]",
            seg.base,
            seg.base + seg.length,
            seg.file_offset,
            seg.file_offset + seg.file_length,
            permissions_display(seg.permissions)
        );
    }

    println!("Sections:");
    for sec in &report.sections {
        println!("  {}: {:#x}..{:#x}", sec.name, sec.base, sec.base + sec.length);
    }

    println!("Symbols ({}):", report.symbols.len());
    for sym in &report.symbols {
        println!(
            "  {:#x} {} {} ({})",
            sym.address,
            kind_display(sym.kind),
            sym.name,
            durability_display(sym.durability)
        );
    }
}
