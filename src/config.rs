use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::import::DEFAULT_FRAME_MS;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// Pipeline settings shared by the import and render commands.
///
/// Any field missing from a config file keeps its default.
///
/// ```json
/// { "asset_root": "assets", "manifest": "assets/animations.json",
///   "tile_size": 32, "frame_ms": 120 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory manifest paths are relative to.
    pub asset_root: PathBuf,
    /// Animation manifest location.
    pub manifest: PathBuf,
    /// Grid tile edge in pixels.
    pub tile_size: u32,
    /// Per-frame time given to imported walk cycles.
    pub frame_ms: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            manifest: PathBuf::from("assets/animations.json"),
            tile_size: DEFAULT_TILE_SIZE,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        info!(
            "loaded config {}: root={}, manifest={}, tile={}px, frame={}ms",
            path.display(),
            config.asset_root.display(),
            config.manifest.display(),
            config.tile_size,
            config.frame_ms
        );
        Ok(config)
    }

    /// Directory packed strips are written to.
    pub fn sheet_dir(&self) -> PathBuf {
        self.asset_root.join("sheets")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let c: PipelineConfig = serde_json::from_str(r#"{ "tile_size": 24 }"#).unwrap();
        assert_eq!(c.tile_size, 24);
        assert_eq!(c.asset_root, PathBuf::from("assets"));
        assert_eq!(c.frame_ms, DEFAULT_FRAME_MS);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(&path, r#"{ "asset_root": "art", "frame_ms": 90 }"#).unwrap();
        let c = PipelineConfig::load(&path).unwrap();
        assert_eq!(c.asset_root, PathBuf::from("art"));
        assert_eq!(c.sheet_dir(), PathBuf::from("art/sheets"));
        assert_eq!(c.frame_ms, 90);
    }
}
