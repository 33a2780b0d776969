use image::RgbaImage;

use crate::error::AssetError;

/// Lay `frames` side by side into one horizontal strip.
///
/// All frames must share the first frame's size `w × h`; the strip is
/// `frames.len() * w` wide and `h` tall with frame `i` at columns
/// `[i * w, (i + 1) * w)`.
pub fn pack_strip(frames: &[RgbaImage]) -> Result<RgbaImage, AssetError> {
    let first = frames.first().ok_or(AssetError::EmptyFrameSet)?;
    let (w, h) = first.dimensions();

    for (index, frame) in frames.iter().enumerate() {
        if frame.dimensions() != (w, h) {
            return Err(AssetError::FrameSizeMismatch {
                index,
                expected: (w, h),
                actual: frame.dimensions(),
            });
        }
    }

    let mut strip = RgbaImage::new(w * frames.len() as u32, h);
    for (i, frame) in frames.iter().enumerate() {
        let x0 = i as u32 * w;
        for dy in 0..h {
            for dx in 0..w {
                strip.put_pixel(x0 + dx, dy, *frame.get_pixel(dx, dy));
            }
        }
    }
    Ok(strip)
}
