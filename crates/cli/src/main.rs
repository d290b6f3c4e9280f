use anyhow::Result;
use clap::{Parser, Subcommand};

use secureboot_cli::commands::{
    identify_command, load_command, predict_base_command, strings_command, LoadArgs,
};

/// Loader and symbol-annotation toolkit for Apple iBoot-family firmware
/// images.
///
/// This CLI is a thin wrapper around `secureboot-core` (exposed in code as
/// `secureboot_core`). All substantive logic lives in the library so it can
/// be tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "secureboot",
    version,
    about = "Load and annotate Apple iBoot-family firmware images",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Identify which firmware variant an image is.
    ///
    /// Exits non-zero when the image is not a member of the family (too
    /// short, or no known tag in the header window).
    Identify {
        /// Path to the raw firmware image.
        image: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Predict the runtime base address from the relocation preamble.
    PredictBase {
        /// Path to the raw firmware image.
        image: String,

        /// Architecture override for the instruction decoder (e.g. aarch64).
        #[arg(long)]
        arch: Option<String>,
    },

    /// Run the full load-and-annotate pipeline and print the result.
    ///
    /// This performs the synchronous load (variant, base address, segments,
    /// fixed-offset symbols), then builds the string/cross-reference index
    /// and applies the string-correlation heuristics.
    Load {
        /// Path to the raw firmware image.
        image: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Explicit base address, overriding prediction (hex or decimal).
        #[arg(long)]
        base: Option<String>,

        /// Architecture override for the instruction decoder (e.g. aarch64).
        #[arg(long)]
        arch: Option<String>,

        /// Read load options from a YAML file; per-flag overrides still win.
        #[arg(long)]
        config: Option<String>,

        /// Skip the fixed-offset symbol table.
        #[arg(long, default_value_t = false)]
        no_fixed_symbols: bool,

        /// Skip the string-correlation heuristics.
        #[arg(long, default_value_t = false)]
        no_string_heuristics: bool,
    },

    /// List printable strings recovered from the raw image.
    Strings {
        /// Path to the raw firmware image.
        image: String,

        /// Minimum run length worth reporting.
        #[arg(long, default_value_t = 4)]
        min_length: usize,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Identify { image, json } => identify_command(&image, json),
        Command::PredictBase { image, arch } => predict_base_command(&image, arch.as_deref()),
        Command::Load {
            image,
            json,
            base,
            arch,
            config,
            no_fixed_symbols,
            no_string_heuristics,
        } => load_command(&LoadArgs {
            image,
            json,
            base,
            arch,
            config,
            no_fixed_symbols,
            no_string_heuristics,
        }),
        Command::Strings { image, min_length, json } => {
            strings_command(&image, min_length, json)
        }
    }
}
