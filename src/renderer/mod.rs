//! Sprite drawing for units on the tactics grid.
//!
//! [`UnitRendererShim`] resolves a unit's current frame through the
//! [`AnimationCatalog`] and blits it onto any [`Canvas`]. Missing manifest
//! entries and missing frames draw nothing.

pub mod canvas;

use glam::{IVec2, Vec2};
use log::trace;

pub use canvas::{Canvas, ImageCanvas};

use crate::animation::AnimationCatalog;
use crate::camera::Camera;

/// Top-left screen pixel for a frame anchored at the bottom-centre of
/// grid cell `grid`.
///
/// ```text
/// x = gx * ts + ts / 2 - camera.x - origin.x
/// y = gy * ts + ts     - camera.y - origin.y
/// ```
///
/// Computed in 64-bit; results beyond the `i32` range clamp to its bounds.
pub fn screen_position(grid: IVec2, tile_size: u32, camera_offset: Vec2, origin: [i32; 2]) -> IVec2 {
    let ts = i64::from(tile_size);
    let axis = |cell: i32, anchor: i64, origin: i32, cam: f32| {
        let world = i64::from(cell)
            .saturating_mul(ts)
            .saturating_add(anchor)
            .saturating_sub(i64::from(origin));
        // float -> int `as` saturates
        (world as f64 - f64::from(cam)).floor() as i32
    };
    IVec2::new(
        axis(grid.x, ts / 2, origin[0], camera_offset.x),
        axis(grid.y, ts, origin[1], camera_offset.y),
    )
}

pub struct UnitRendererShim {
    catalog: AnimationCatalog,
    tile_size: u32,
}

impl UnitRendererShim {
    pub fn new(catalog: AnimationCatalog, tile_size: u32) -> Self {
        Self { catalog, tile_size }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn catalog(&self) -> &AnimationCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut AnimationCatalog {
        &mut self.catalog
    }

    /// Draw the frame of `unit`/`state` active after `elapsed_ms`.
    ///
    /// Returns whether anything was drawn.
    pub fn draw_unit(
        &mut self,
        canvas: &mut dyn Canvas,
        unit: &str,
        state: &str,
        grid: IVec2,
        camera_offset: Vec2,
        elapsed_ms: u64,
    ) -> bool {
        let tile_size = self.tile_size;
        let Some(anim) = self.catalog.animation(unit, state) else { return false };
        let Some((frame, origin)) = anim.frame_at(elapsed_ms) else {
            trace!("renderer: {unit}/{state} has no frames");
            return false;
        };
        let pos = screen_position(grid, tile_size, camera_offset, origin);
        canvas.blit(frame, pos.x, pos.y);
        true
    }

    /// [`draw_unit`](Self::draw_unit) using the camera's offset, shake included.
    pub fn draw_unit_with_camera(
        &mut self,
        canvas: &mut dyn Canvas,
        unit: &str,
        state: &str,
        grid: IVec2,
        camera: &Camera,
        elapsed_ms: u64,
    ) -> bool {
        self.draw_unit(canvas, unit, state, grid, camera.offset(), elapsed_ms)
    }
}

/// Blend the camera's active flash, if any, over the finished frame.
pub fn apply_flash(canvas: &mut dyn Canvas, camera: &Camera) {
    if let Some(color) = camera.flash.color() {
        canvas.overlay(color);
    }
}
