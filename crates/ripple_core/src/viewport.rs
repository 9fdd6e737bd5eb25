//! Surface-to-grid geometry
//!
//! The grid spans the full surface width. The visible height is snapped to a
//! whole number of texels and never exceeds the width, so only the top
//! `1 / aspect_ratio` of the square grid is ever shown.

use glam::Vec2;

/// Pixel rectangle inside a grid texture, origin at the top-left texel row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    resolution: u32,
    aspect_ratio: f32,
}

impl Viewport {
    /// Derive the visible viewport from the host surface size.
    pub fn from_surface(surface_width: u32, surface_height: u32, resolution: u32) -> Self {
        let width = surface_width.max(1);
        let texel = width as f32 / resolution as f32;
        let snapped = ((surface_height.max(1) as f32 / texel).ceil() * texel).round() as u32;
        let height = snapped.clamp(1, width);
        Self {
            width,
            height,
            resolution,
            aspect_ratio: width as f32 / height as f32,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Width over height; at least 1.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Fraction of grid rows that reach the screen.
    pub fn visible_fraction(&self) -> f32 {
        1.0 / self.aspect_ratio
    }

    /// Range of grid y (origin bottom-left) shown on screen.
    pub fn visible_band(&self) -> (f32, f32) {
        (1.0 - self.visible_fraction(), 1.0)
    }

    /// Region of a grid texture the simulation and splash passes render into.
    pub fn grid_rect(&self) -> GridRect {
        let res = self.resolution as f32;
        GridRect {
            x: 0.0,
            y: 0.0,
            width: res,
            height: res * self.visible_fraction(),
        }
    }

    /// Convert a surface-local press position to grid coordinates.
    ///
    /// Both axes divide by the surface width since texels are square; y flips
    /// because the grid origin is bottom-left.
    pub fn normalize_pointer(&self, x: f64, y: f64) -> Vec2 {
        let w = f64::from(self.width);
        Vec2::new((x / w) as f32, (1.0 - y / w) as f32)
    }

    /// Map a unit sample onto the visible band, used for random splash placement.
    pub fn band_point(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(u, 1.0 + (v - 1.0) * self.visible_fraction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_snaps_to_whole_texels() {
        // 1024 px over 512 texels: 2 px per texel, 767 rounds up to 768
        let vp = Viewport::from_surface(1024, 767, 512);
        assert_eq!(vp.height(), 768);
        assert!((vp.aspect_ratio() - 1024.0 / 768.0).abs() < 1e-6);
    }

    #[test]
    fn height_never_exceeds_width() {
        let vp = Viewport::from_surface(400, 900, 512);
        assert_eq!(vp.height(), 400);
        assert_eq!(vp.aspect_ratio(), 1.0);
        assert_eq!(vp.visible_band(), (0.0, 1.0));
    }

    #[test]
    fn pointer_flips_and_scales_by_width() {
        let vp = Viewport::from_surface(1024, 768, 512);
        let top_left = vp.normalize_pointer(0.0, 0.0);
        assert_eq!(top_left, Vec2::new(0.0, 1.0));

        let bottom_right = vp.normalize_pointer(1024.0, 768.0);
        assert_eq!(bottom_right.x, 1.0);
        assert!((bottom_right.y - vp.visible_band().0).abs() < 1e-6);
    }

    #[test]
    fn grid_rect_covers_visible_rows() {
        let vp = Viewport::from_surface(1024, 512, 512);
        let rect = vp.grid_rect();
        assert_eq!(rect.width, 512.0);
        assert_eq!(rect.height, 256.0);
    }

    #[test]
    fn band_point_stays_in_band() {
        let vp = Viewport::from_surface(1024, 512, 512);
        let (lo, hi) = vp.visible_band();
        assert_eq!(vp.band_point(0.3, 0.0).y, lo);
        assert_eq!(vp.band_point(0.3, 1.0).y, hi);
    }
}
