//! `tactics-assets` command line: frame import and single-frame previews.
//!
//! ```sh
//! tactics-assets import raw/knight raw/archer --pack
//! tactics-assets render --unit knight --state walk_left --elapsed-ms 240 --out knight.png
//! ```
//!
//! `RUST_LOG` controls log verbosity (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glam::{IVec2, Vec2};
use log::{error, info, warn};

use tactics_assets::AssetError;
use tactics_assets::animation::AnimationCatalog;
use tactics_assets::config::PipelineConfig;
use tactics_assets::import::{ImportOptions, import_folders};
use tactics_assets::renderer::{ImageCanvas, UnitRendererShim};

/// Asset pipeline for the tactics game.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON pipeline config; flags below override its fields.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory manifest paths are relative to.
    #[arg(long, global = true, value_name = "DIR")]
    asset_root: Option<PathBuf>,

    /// Animation manifest location.
    #[arg(long, global = true, value_name = "PATH")]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import unit folders of raw frames into the manifest.
    Import {
        /// One folder per unit; the folder name is the unit key.
        #[arg(required = true)]
        folders: Vec<PathBuf>,

        /// Unit key to use instead of the folder name (single folder only).
        #[arg(long)]
        unit: Option<String>,

        /// Pack each state into a horizontal sprite strip.
        #[arg(long)]
        pack: bool,

        /// Milliseconds per walk frame.
        #[arg(long)]
        frame_ms: Option<i64>,

        /// Where packed strips go (default: <asset-root>/sheets).
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Draw one unit frame onto a 3×3 tile canvas and save it as PNG.
    Render {
        #[arg(long)]
        unit: String,

        #[arg(long)]
        state: String,

        /// Time since the animation started.
        #[arg(long, default_value_t = 0)]
        elapsed_ms: u64,

        #[arg(long, default_value = "preview.png")]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AssetError> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(root) = cli.asset_root {
        config.asset_root = root;
    }
    if let Some(manifest) = cli.manifest {
        config.manifest = manifest;
    }

    match cli.command {
        Command::Import { folders, unit, pack, frame_ms, out_dir } => {
            if unit.is_some() && folders.len() > 1 {
                warn!("--unit ignored: it only applies to a single folder");
            }
            let options = ImportOptions {
                out_dir: out_dir.unwrap_or_else(|| config.sheet_dir()),
                asset_root: config.asset_root.clone(),
                pack,
                frame_ms: frame_ms.unwrap_or(config.frame_ms),
            };
            let reports = import_folders(&folders, unit.as_deref(), &options, &config.manifest)?;
            for r in &reports {
                info!(
                    "{}: {} ({} strips written, {} frames skipped)",
                    r.unit,
                    r.states.join(", "),
                    r.written.len(),
                    r.skipped_frames
                );
            }
            Ok(())
        }
        Command::Render { unit, state, elapsed_ms, out } => {
            let catalog = AnimationCatalog::open(&config.asset_root, &config.manifest)?;
            let mut shim = UnitRendererShim::new(catalog, config.tile_size);
            let side = config.tile_size * 3;
            let mut canvas = ImageCanvas::new(side, side);
            if !shim.draw_unit(&mut canvas, &unit, &state, IVec2::ONE, Vec2::ZERO, elapsed_ms) {
                warn!("nothing drawn for {unit}/{state}");
            }
            canvas.save(&out)?;
            info!("wrote {}", out.display());
            Ok(())
        }
    }
}
