//! Animation manifest: unit key → state name → frame specification.
//!
//! Produced by the import tooling, read once at startup by
//! [`AnimationCatalog`](crate::animation::AnimationCatalog). Paths inside the
//! manifest are relative to the asset root the catalog is opened with.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Manifest schema version written by this crate.
pub const MANIFEST_VERSION: u32 = 1;

/// States of one unit, keyed by state name (`idle_down`, `walk_left`, ...).
pub type UnitStates = BTreeMap<String, FrameSpec>;

// ── Playback ──────────────────────────────────────────────────────────────────

/// Timing and anchor fields shared by both frame-spec variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playback {
    /// Number of frames in the animation.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Milliseconds each frame stays on screen. `<= 0` pins the first frame.
    #[serde(default)]
    pub duration_ms: i64,
    /// Draw anchor in frame pixels. `None` means bottom-centre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<[i32; 2]>,
    #[serde(rename = "loop", default = "default_loop")]
    pub looping: bool,
}

fn default_frames() -> u32 {
    1
}

fn default_loop() -> bool {
    true
}

impl Default for Playback {
    fn default() -> Self {
        Self { frames: 1, duration_ms: 0, origin: None, looping: true }
    }
}

impl Playback {
    /// Anchor for a `width × height` frame: the explicit origin, or
    /// `[width / 2, height]` when none was given.
    pub fn origin_for(&self, width: u32, height: u32) -> [i32; 2] {
        self.origin.unwrap_or([(width / 2) as i32, height as i32])
    }
}

// ── FrameSpec ─────────────────────────────────────────────────────────────────

/// Frames cut from one packed image on a fixed grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub sheet: PathBuf,
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(flatten)]
    pub playback: Playback,
}

/// Frames stored as one image file each, in playback order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListSpec {
    pub files: Vec<PathBuf>,
    #[serde(flatten)]
    pub playback: Playback,
}

/// How one animation state finds its frames.
///
/// On disk the variant is picked by the presence of a `sheet` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameSpec {
    Sheet(SheetSpec),
    Files(FileListSpec),
}

impl FrameSpec {
    pub fn playback(&self) -> &Playback {
        match self {
            FrameSpec::Sheet(s) => &s.playback,
            FrameSpec::Files(f) => &f.playback,
        }
    }

    /// Deterministic identity used as the decoded-frame cache key.
    ///
    /// File lists use the concatenated paths. Sheets use the sheet path plus
    /// the grid geometry, so two states cut differently from one sheet do not
    /// share an entry.
    pub fn cache_key(&self) -> String {
        match self {
            FrameSpec::Sheet(s) => format!(
                "{}#{}x{}*{}",
                s.sheet.display(),
                s.frame_width,
                s.frame_height,
                s.playback.frames
            ),
            FrameSpec::Files(f) => f
                .files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

impl FrameSpec {
    /// Parse one manifest entry, picking the variant by the `sheet` key so
    /// the error names the field that is actually wrong.
    fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.get("sheet").is_some() {
            serde_json::from_value(value).map(FrameSpec::Sheet)
        } else {
            serde_json::from_value(value).map(FrameSpec::Files)
        }
    }
}

// ── AnimationManifest ─────────────────────────────────────────────────────────

/// Wire form read before entries are checked one by one.
#[derive(Deserialize)]
struct RawManifest {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    units: BTreeMap<String, serde_json::Value>,
}

impl From<RawManifest> for AnimationManifest {
    /// Entries that do not parse are logged and dropped; the rest load.
    fn from(raw: RawManifest) -> Self {
        let mut units = BTreeMap::new();
        for (unit, value) in raw.units {
            let serde_json::Value::Object(entries) = value else {
                warn!("manifest: dropping unit {unit}: not an object");
                continue;
            };
            let mut states = UnitStates::new();
            for (state, entry) in entries {
                match FrameSpec::from_value(entry) {
                    Ok(spec) => {
                        states.insert(state, spec);
                    }
                    Err(e) => warn!("manifest: dropping {unit}/{state}: {e}"),
                }
            }
            units.insert(unit, states);
        }
        Self { version: raw.version, units }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawManifest")]
pub struct AnimationManifest {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub units: BTreeMap<String, UnitStates>,
}

fn default_version() -> u32 {
    MANIFEST_VERSION
}

impl Default for AnimationManifest {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationManifest {
    pub fn new() -> Self {
        Self { version: MANIFEST_VERSION, units: BTreeMap::new() }
    }

    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, AssetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a manifest for runtime use. Unreadable or malformed files are
    /// errors; individual bad entries are only logged.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        let manifest = Self::from_json(&text)?;
        if manifest.version != MANIFEST_VERSION {
            warn!(
                "manifest {}: version {} (expected {MANIFEST_VERSION})",
                path.display(),
                manifest.version
            );
        }
        for problem in manifest.validate() {
            warn!("manifest {}: {problem}", path.display());
        }
        debug!("loaded {} units from {}", manifest.units.len(), path.display());
        Ok(manifest)
    }

    /// Read a manifest for merging. A missing or malformed file yields an
    /// empty manifest.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("manifest {} does not exist yet; starting empty", path.display());
            return Self::new();
        }
        match Self::load(path) {
            Ok(m) => m,
            Err(e) => {
                warn!("manifest {} unusable ({e}); starting empty", path.display());
                Self::new()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AssetError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
        }
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json).map_err(|e| AssetError::io(path, e))
    }

    pub fn get(&self, unit: &str, state: &str) -> Option<&FrameSpec> {
        self.units.get(unit)?.get(state)
    }

    pub fn insert(&mut self, unit: impl Into<String>, state: impl Into<String>, spec: FrameSpec) {
        self.units.entry(unit.into()).or_default().insert(state.into(), spec);
    }

    /// Overwrite the given states of `unit`; its other states and all other
    /// units are left alone.
    pub fn merge_unit(&mut self, unit: &str, states: UnitStates) {
        let entry = self.units.entry(unit.to_string()).or_default();
        for (state, spec) in states {
            entry.insert(state, spec);
        }
    }

    /// Entries that can never produce a frame.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (unit, states) in &self.units {
            for (state, spec) in states {
                match spec {
                    FrameSpec::Sheet(s) => {
                        if s.playback.frames == 0 {
                            problems.push(format!("{unit}/{state}: sheet has zero frames"));
                        }
                        if s.frame_width == 0 || s.frame_height == 0 {
                            problems.push(format!("{unit}/{state}: zero frame size"));
                        }
                    }
                    FrameSpec::Files(f) => {
                        if f.files.is_empty() {
                            problems.push(format!("{unit}/{state}: empty file list"));
                        }
                    }
                }
            }
        }
        problems
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 1,
        "units": {
            "knight": {
                "idle_down": { "sheet": "knight/idle_down.png", "frame_width": 32,
                               "frame_height": 32, "frames": 1, "duration_ms": 200 },
                "walk_left": { "files": ["knight/a.png", "knight/b.png"], "frames": 2,
                               "duration_ms": 120, "origin": [16, 30], "loop": false }
            }
        }
    }"#;

    #[test]
    fn sheet_key_selects_sheet_variant() {
        let m = AnimationManifest::from_json(SAMPLE).unwrap();
        assert!(matches!(m.get("knight", "idle_down"), Some(FrameSpec::Sheet(_))));
        assert!(matches!(m.get("knight", "walk_left"), Some(FrameSpec::Files(_))));
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let m = AnimationManifest::from_json(SAMPLE).unwrap();
        let pb = m.get("knight", "idle_down").unwrap().playback();
        assert!(pb.looping);
        assert_eq!(pb.origin, None);
    }

    #[test]
    fn explicit_loop_false_is_kept() {
        let m = AnimationManifest::from_json(SAMPLE).unwrap();
        let pb = m.get("knight", "walk_left").unwrap().playback();
        assert!(!pb.looping);
        assert_eq!(pb.origin, Some([16, 30]));
    }

    #[test]
    fn origin_defaults_to_bottom_centre() {
        assert_eq!(Playback::default().origin_for(32, 48), [16, 48]);
        assert_eq!(Playback::default().origin_for(15, 20), [7, 20]);
    }

    #[test]
    fn missing_unit_or_state_is_none() {
        let m = AnimationManifest::from_json(SAMPLE).unwrap();
        assert!(m.get("archer", "idle_down").is_none());
        assert!(m.get("knight", "attack_up").is_none());
    }

    #[test]
    fn merge_unit_keeps_other_states() {
        let mut m = AnimationManifest::from_json(SAMPLE).unwrap();
        let mut states = UnitStates::new();
        states.insert(
            "walk_left".into(),
            FrameSpec::Files(FileListSpec { files: vec!["x.png".into()], playback: Playback::default() }),
        );
        m.merge_unit("knight", states);
        assert!(m.get("knight", "idle_down").is_some());
        match m.get("knight", "walk_left").unwrap() {
            FrameSpec::Files(f) => assert_eq!(f.files, vec![PathBuf::from("x.png")]),
            other => panic!("unexpected spec {other:?}"),
        }
    }

    #[test]
    fn validate_flags_zero_frame_sheet_and_empty_list() {
        let mut m = AnimationManifest::new();
        m.insert(
            "u",
            "a",
            FrameSpec::Sheet(SheetSpec {
                sheet: "s.png".into(),
                frame_width: 8,
                frame_height: 8,
                playback: Playback { frames: 0, ..Playback::default() },
            }),
        );
        m.insert("u", "b", FrameSpec::Files(FileListSpec { files: vec![], playback: Playback::default() }));
        assert_eq!(m.validate().len(), 2);
    }

    #[test]
    fn cache_keys_distinguish_geometry() {
        let sheet = |w| {
            FrameSpec::Sheet(SheetSpec {
                sheet: "s.png".into(),
                frame_width: w,
                frame_height: 8,
                playback: Playback::default(),
            })
        };
        assert_ne!(sheet(8).cache_key(), sheet(16).cache_key());
    }

    #[test]
    fn bad_entry_is_dropped_and_neighbours_load() {
        let json = r#"{
            "version": 1,
            "units": {
                "knight": {
                    "idle_down": { "sheet": "knight/idle_down.png", "frame_height": 32 },
                    "walk_left": { "files": ["knight/a.png"], "duration_ms": 120 }
                },
                "archer": {
                    "idle_down": { "files": ["archer/a.png"], "frames": -1 },
                    "idle_up": { "sheet": "archer/up.png", "frame_width": 16, "frame_height": 16 }
                }
            }
        }"#;
        let m = AnimationManifest::from_json(json).unwrap();
        assert!(m.get("knight", "idle_down").is_none());
        assert!(matches!(m.get("knight", "walk_left"), Some(FrameSpec::Files(_))));
        assert!(m.get("archer", "idle_down").is_none());
        assert!(matches!(m.get("archer", "idle_up"), Some(FrameSpec::Sheet(_))));
    }

    #[test]
    fn non_object_unit_is_dropped() {
        let json = r#"{ "units": { "ghost": 5, "knight": { "idle_down": { "files": ["k.png"] } } } }"#;
        let m = AnimationManifest::from_json(json).unwrap();
        assert!(!m.units.contains_key("ghost"));
        assert!(m.get("knight", "idle_down").is_some());
    }

    #[test]
    fn load_survives_bad_entry_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("animations.json");
        fs::write(
            &path,
            r#"{ "version": 1, "units": { "knight": {
                "walk_up": { "sheet": "k.png", "frames": 2 },
                "walk_down": { "files": ["k0.png", "k1.png"], "frames": 2 } } } }"#,
        )
        .unwrap();
        let m = AnimationManifest::load(&path).unwrap();
        assert!(m.get("knight", "walk_up").is_none());
        assert_eq!(m.get("knight", "walk_down").unwrap().playback().frames, 2);
    }

    #[test]
    fn malformed_json_is_still_an_error() {
        assert!(matches!(AnimationManifest::from_json("{ nope"), Err(AssetError::Json(_))));
    }

    #[test]
    fn serialized_manifest_parses_back() {
        let m = AnimationManifest::from_json(SAMPLE).unwrap();
        let json = m.to_json_pretty().unwrap();
        assert!(json.contains("\"loop\""));
        assert_eq!(AnimationManifest::from_json(&json).unwrap(), m);
    }
}
