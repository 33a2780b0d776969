use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::error::AssetError;

/// Drawing surface the renderer shim blits frames onto.
pub trait Canvas {
    /// Pixel dimensions of the surface.
    fn size(&self) -> (u32, u32);

    /// Draw `image` with its top-left corner at `(x, y)`. Parts falling
    /// outside the surface are clipped.
    fn blit(&mut self, image: &RgbaImage, x: i32, y: i32);

    /// Blend `color` over the whole surface (screen flash).
    fn overlay(&mut self, color: [u8; 4]);
}

/// Software canvas backed by an [`RgbaImage`].
pub struct ImageCanvas {
    image: RgbaImage,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self { image: RgbaImage::from_pixel(width, height, Rgba(color)) }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AssetError> {
        let path = path.as_ref();
        self.image.save(path).map_err(|e| AssetError::image(path, e))
    }
}

/// Source-over blend of `src` onto `dst`.
fn blend(dst: Rgba<u8>, src: [u8; 4]) -> Rgba<u8> {
    let sa = src[3] as u32;
    if sa == 255 {
        return Rgba(src);
    }
    if sa == 0 {
        return dst;
    }
    let da = dst[3] as u32;
    // Output alpha scaled by 255: sa*255 + da*(255 - sa).
    let out_a = sa * 255 + da * (255 - sa);
    let mut out = [0u8; 4];
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
        out[c] = (num / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    Rgba(out)
}

impl Canvas for ImageCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn blit(&mut self, image: &RgbaImage, x: i32, y: i32) {
        let (cw, ch) = (self.image.width() as i64, self.image.height() as i64);
        let (x, y) = (x as i64, y as i64);
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + image.width() as i64).min(cw);
        let y1 = (y + image.height() as i64).min(ch);

        for dy in y0..y1 {
            for dx in x0..x1 {
                let src = image.get_pixel((dx - x) as u32, (dy - y) as u32).0;
                let dst = self.image.get_pixel_mut(dx as u32, dy as u32);
                *dst = blend(*dst, src);
            }
        }
    }

    fn overlay(&mut self, color: [u8; 4]) {
        for px in self.image.pixels_mut() {
            *px = blend(*px, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_replaces_destination() {
        assert_eq!(blend(Rgba([1, 2, 3, 255]), [9, 8, 7, 255]), Rgba([9, 8, 7, 255]));
    }

    #[test]
    fn transparent_source_keeps_destination() {
        assert_eq!(blend(Rgba([1, 2, 3, 255]), [9, 8, 7, 0]), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn half_alpha_over_opaque_mixes_evenly() {
        let out = blend(Rgba([0, 0, 0, 255]), [255, 255, 255, 128]);
        assert_eq!(out[3], 255);
        assert!((127..=129).contains(&out[0]), "got {}", out[0]);
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut canvas = ImageCanvas::new(4, 4);
        let red = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
        canvas.blit(&red, -2, 2);
        let img = canvas.image();
        assert_eq!(img.get_pixel(0, 2)[0], 255);
        assert_eq!(img.get_pixel(0, 3)[0], 255);
        assert_eq!(img.get_pixel(1, 2)[3], 0);
        assert_eq!(img.get_pixel(0, 1)[3], 0);
    }

    #[test]
    fn blit_fully_offscreen_is_noop() {
        let mut canvas = ImageCanvas::new(4, 4);
        let red = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
        canvas.blit(&red, 10, -10);
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }
}
