//! Offline import of raw frame folders into the animation manifest.
//!
//! A unit folder holds loose PNGs named by [`naming`] convention. Import
//! groups them into states, optionally packs each state into a horizontal
//! strip, and merges the resulting entries into the manifest.

pub mod naming;
mod pack;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use image::RgbaImage;
use log::{debug, info, warn};

pub use naming::{FrameName, Pose, parse_frame_name};
pub use pack::pack_strip;

use crate::error::AssetError;
use crate::manifest::{AnimationManifest, FileListSpec, FrameSpec, Playback, SheetSpec, UnitStates};

/// Default per-frame time for imported walk cycles.
pub const DEFAULT_FRAME_MS: i64 = 120;

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Group the PNGs directly inside `folder` into states.
///
/// Each state's files are ordered by their numeric suffix (then by file
/// name), never by directory listing order. Files outside the naming
/// convention are ignored.
pub fn discover<P: AsRef<Path>>(folder: P) -> Result<BTreeMap<String, Vec<PathBuf>>, AssetError> {
    let folder = folder.as_ref();
    let meta = fs::metadata(folder).map_err(|e| AssetError::io(folder, e))?;
    if !meta.is_dir() {
        return Err(AssetError::io(folder, io::Error::from(io::ErrorKind::NotADirectory)));
    }

    let mut found: BTreeMap<String, Vec<(u32, PathBuf)>> = BTreeMap::new();
    for entry in walkdir::WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_png = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if !is_png {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).and_then(parse_frame_name) else {
            debug!("import: ignoring {}", path.display());
            continue;
        };
        found.entry(name.state()).or_default().push((name.index, path.to_path_buf()));
    }

    Ok(found
        .into_iter()
        .map(|(state, mut frames)| {
            frames.sort();
            (state, frames.into_iter().map(|(_, p)| p).collect())
        })
        .collect())
}

// ── Import ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ImportOptions {
    /// Directory manifest paths are made relative to.
    pub asset_root: PathBuf,
    /// Where packed strips are written (`<out_dir>/<unit>/<state>.png`).
    pub out_dir: PathBuf,
    /// Pack each state into one strip instead of listing the files.
    pub pack: bool,
    /// Per-frame time for walk states. Idle states always get 0.
    pub frame_ms: i64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            out_dir: PathBuf::from("assets/sheets"),
            pack: false,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

/// What one folder import changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub unit: String,
    /// States written to the manifest, sorted.
    pub states: Vec<String>,
    /// Strip images written in pack mode.
    pub written: Vec<PathBuf>,
    /// Frames that failed to decode and were left out of a strip.
    pub skipped_frames: usize,
}

/// Import one unit folder and merge its states into `manifest`.
///
/// States not present in the folder keep their existing manifest entries.
pub fn import_folder(
    folder: &Path,
    unit: &str,
    options: &ImportOptions,
    manifest: &mut AnimationManifest,
) -> Result<ImportReport, AssetError> {
    let groups = discover(folder)?;
    let mut report = ImportReport { unit: unit.to_string(), ..ImportReport::default() };
    let mut states = UnitStates::new();

    for (state, paths) in groups {
        let duration_ms = if state.starts_with("idle_") { 0 } else { options.frame_ms };

        let spec = if options.pack {
            let frames = decode_frames(&paths, &mut report.skipped_frames);
            if frames.is_empty() {
                warn!("import: {unit}/{state} has no decodable frames; skipping");
                continue;
            }
            let strip = pack_strip(&frames)?;
            let out = options.out_dir.join(unit).join(format!("{state}.png"));
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
            }
            strip.save(&out).map_err(|e| AssetError::image(&out, e))?;
            debug!("import: wrote {} ({} frames)", out.display(), frames.len());

            let (frame_width, frame_height) = frames[0].dimensions();
            let sheet = relative_to(&options.asset_root, &out);
            report.written.push(out);
            FrameSpec::Sheet(SheetSpec {
                sheet,
                frame_width,
                frame_height,
                playback: Playback { frames: frames.len() as u32, duration_ms, ..Playback::default() },
            })
        } else {
            let files: Vec<PathBuf> = paths.iter().map(|p| relative_to(&options.asset_root, p)).collect();
            let frames = files.len() as u32;
            FrameSpec::Files(FileListSpec {
                files,
                playback: Playback { frames, duration_ms, ..Playback::default() },
            })
        };

        report.states.push(state.clone());
        states.insert(state, spec);
    }

    manifest.merge_unit(unit, states);
    info!("import: {unit}: {} states from {}", report.states.len(), folder.display());
    Ok(report)
}

/// Import several unit folders into the manifest at `manifest_path` and
/// save it. The unit key is the folder name unless `unit` is given, which is
/// only allowed for a single folder.
pub fn import_folders(
    folders: &[PathBuf],
    unit: Option<&str>,
    options: &ImportOptions,
    manifest_path: &Path,
) -> Result<Vec<ImportReport>, AssetError> {
    let mut manifest = AnimationManifest::load_or_default(manifest_path);
    let mut reports = Vec::with_capacity(folders.len());

    for folder in folders {
        let key = match unit {
            Some(u) if folders.len() == 1 => u.to_string(),
            _ => match folder.file_name().and_then(|s| s.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    warn!("import: cannot derive a unit name from {}; skipping", folder.display());
                    continue;
                }
            },
        };
        reports.push(import_folder(folder, &key, options, &mut manifest)?);
    }

    manifest.save(manifest_path)?;
    info!("import: saved {}", manifest_path.display());
    Ok(reports)
}

fn decode_frames(paths: &[PathBuf], skipped: &mut usize) -> Vec<RgbaImage> {
    paths
        .iter()
        .filter_map(|p| match image::open(p) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn!("import: failed to load {}: {e}", p.display());
                *skipped += 1;
                None
            }
        })
        .collect()
}

/// Manifest form of `path`: relative to `root` with `/` separators when it
/// lives under `root`, otherwise absolute so the catalog can still open it.
fn relative_to(root: &Path, path: &Path) -> PathBuf {
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    match path.strip_prefix(&root) {
        Ok(rel) if rel.components().all(|c| matches!(c, Component::Normal(_))) => PathBuf::from(
            rel.components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/"),
        ),
        _ => path,
    }
}
