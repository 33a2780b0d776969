pub mod animation;
pub mod camera;
pub mod config;
pub mod error;
pub mod import;
pub mod manifest;
pub mod renderer;
pub mod targeting;

pub use animation::{AnimationCatalog, ResolvedAnimation, frame_index};
pub use error::AssetError;
pub use manifest::{AnimationManifest, FrameSpec, MANIFEST_VERSION};
