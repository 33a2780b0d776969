use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};

use super::frame_index;
use crate::error::AssetError;
use crate::manifest::{AnimationManifest, FileListSpec, FrameSpec, SheetSpec};

// ── FrameCache ────────────────────────────────────────────────────────────────

/// Decoded images, kept for the lifetime of the catalog. Nothing is evicted.
#[derive(Default)]
struct FrameCache {
    /// Sheet images by resolved path. `None` records a failed load so the
    /// file is not retried for every state it backs.
    sheets: HashMap<PathBuf, Option<RgbaImage>>,
    /// Decoded frame sequences by [`FrameSpec::cache_key`].
    sequences: HashMap<String, Vec<RgbaImage>>,
}

impl FrameCache {
    fn frames(&mut self, root: &Path, spec: &FrameSpec) -> &[RgbaImage] {
        let FrameCache { sheets, sequences } = self;
        sequences.entry(spec.cache_key()).or_insert_with(|| match spec {
            FrameSpec::Sheet(s) => cut_sheet(sheets, root, s),
            FrameSpec::Files(f) => decode_files(root, f),
        })
    }
}

fn cut_sheet(
    sheets: &mut HashMap<PathBuf, Option<RgbaImage>>,
    root: &Path,
    spec: &SheetSpec,
) -> Vec<RgbaImage> {
    let path = root.join(&spec.sheet);
    let sheet = sheets.entry(path.clone()).or_insert_with(|| match image::open(&path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            warn!("catalog: failed to load sheet {}: {e}", path.display());
            None
        }
    });
    let Some(sheet) = sheet.as_ref() else { return Vec::new() };

    let (fw, fh) = (spec.frame_width, spec.frame_height);
    if fw == 0 || fh == 0 {
        return Vec::new();
    }

    // Row-major grid; a single-row strip is the common case.
    let cols = sheet.width() / fw;
    let rows = sheet.height() / fh;
    let count = spec.playback.frames.min(cols * rows);
    if count < spec.playback.frames {
        warn!(
            "catalog: {} holds {count} of {} requested {fw}x{fh} frames",
            path.display(),
            spec.playback.frames
        );
    }

    (0..count)
        .map(|i| {
            let x = (i % cols) * fw;
            let y = (i / cols) * fh;
            image::imageops::crop_imm(sheet, x, y, fw, fh).to_image()
        })
        .collect()
}

fn decode_files(root: &Path, spec: &FileListSpec) -> Vec<RgbaImage> {
    spec.files
        .iter()
        .filter_map(|rel| {
            let path = root.join(rel);
            match image::open(&path) {
                Ok(img) => Some(img.to_rgba8()),
                Err(e) => {
                    warn!("catalog: skipping frame {}: {e}", path.display());
                    None
                }
            }
        })
        .collect()
}

// ── ResolvedAnimation ─────────────────────────────────────────────────────────

/// A manifest entry together with its decoded frames.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedAnimation<'a> {
    pub spec: &'a FrameSpec,
    pub frames: &'a [RgbaImage],
}

impl<'a> ResolvedAnimation<'a> {
    /// Frames actually available, which is fewer than the declared count
    /// when some failed to decode.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The frame visible after `elapsed_ms`, with its draw origin.
    pub fn frame_at(&self, elapsed_ms: u64) -> Option<(&'a RgbaImage, [i32; 2])> {
        let pb = self.spec.playback();
        let idx = frame_index(elapsed_ms, pb.duration_ms, self.frames.len(), pb.looping);
        let frame = self.frames.get(idx)?;
        Some((frame, pb.origin_for(frame.width(), frame.height())))
    }
}

// ── AnimationCatalog ──────────────────────────────────────────────────────────

/// Read path from `(unit, state)` to decoded frames.
///
/// Decoding happens on first access; the results stay cached until the
/// catalog is dropped.
pub struct AnimationCatalog {
    root: PathBuf,
    manifest: AnimationManifest,
    cache: FrameCache,
}

impl AnimationCatalog {
    /// `root` is the directory manifest paths are relative to.
    pub fn new(root: impl Into<PathBuf>, manifest: AnimationManifest) -> Self {
        Self { root: root.into(), manifest, cache: FrameCache::default() }
    }

    /// Load the manifest at `manifest_path` and wrap it in a catalog.
    pub fn open(root: impl Into<PathBuf>, manifest_path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let manifest = AnimationManifest::load(manifest_path)?;
        Ok(Self::new(root, manifest))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &AnimationManifest {
        &self.manifest
    }

    pub fn spec(&self, unit: &str, state: &str) -> Option<&FrameSpec> {
        self.manifest.get(unit, state)
    }

    /// Decoded frames for `spec`, possibly empty. The spec does not have to
    /// come from this catalog's manifest.
    pub fn frames(&mut self, spec: &FrameSpec) -> &[RgbaImage] {
        self.cache.frames(&self.root, spec)
    }

    /// Look up `unit`/`state` and decode its frames. `None` when the
    /// manifest has no such entry.
    pub fn animation(&mut self, unit: &str, state: &str) -> Option<ResolvedAnimation<'_>> {
        let Some(spec) = self.manifest.get(unit, state) else {
            debug!("catalog: no entry for {unit}/{state}");
            return None;
        };
        let frames = self.cache.frames(&self.root, spec);
        Some(ResolvedAnimation { spec, frames })
    }

    /// Number of decoded frame sequences held in the cache.
    pub fn cached_sequences(&self) -> usize {
        self.cache.sequences.len()
    }
}
