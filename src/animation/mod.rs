//! Animation playback: the stateless frame-index rule and the catalog that
//! turns manifest entries into decoded frames.

mod catalog;

pub use catalog::{AnimationCatalog, ResolvedAnimation};

/// Index of the frame visible `elapsed_ms` after an animation started.
///
/// `elapsed / duration`, wrapped modulo `frame_count` when looping and held
/// on the last frame otherwise. A non-positive duration or an empty
/// animation always shows frame 0.
pub fn frame_index(elapsed_ms: u64, duration_ms: i64, frame_count: usize, looping: bool) -> usize {
    if duration_ms <= 0 || frame_count == 0 {
        return 0;
    }
    let step = elapsed_ms / duration_ms as u64;
    if looping {
        (step % frame_count as u64) as usize
    } else {
        step.min(frame_count as u64 - 1) as usize
    }
}
