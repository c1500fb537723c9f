//! Boundary between simulation units and presentation pixels.
//!
//! The simulation measures everything in tiles (1 unit = 1 tile). Nothing
//! on the simulation side ever sees a pixel.

use glam::Vec2;

pub const DEFAULT_TILE_PIXELS: f32 = 16.0;

pub fn world_to_screen_pixels(v: Vec2, tile_pixel_size: f32) -> Vec2 {
    v * tile_pixel_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_both_axes_by_tile_size() {
        let px = world_to_screen_pixels(Vec2::new(2.5, -1.0), DEFAULT_TILE_PIXELS);
        assert_eq!(px, Vec2::new(40.0, -16.0));
    }
}
