//! CPU reference passes
//!
//! Same arithmetic as the GPU programs, on plain `f32` grids. Used for headless
//! runs and for checking invariants the GPU path cannot easily expose.

use crate::mask::MaskImage;
use crate::passes::WavePasses;
use crate::ring::{BufferRing, RingPointer, SLOT_COUNT};
use crate::settings::WaveSettings;
use crate::splash::{Splash, SplashPlan};
use crate::viewport::Viewport;
use glam::Vec2;

pub struct ReferencePasses {
    resolution: usize,
    visible_rows: usize,
    damping: f32,
    courant_sq: f32,
    walls: Vec<bool>,
    ring: BufferRing<Vec<f32>>,
    writes: [u64; SLOT_COUNT],
    frame: Vec<f32>,
    presents: u64,
}

impl ReferencePasses {
    /// # Panics
    ///
    /// Panics if the mask resolution differs from `settings.resolution`.
    pub fn new(settings: &WaveSettings, viewport: &Viewport, mask: &MaskImage) -> Self {
        let resolution = settings.resolution as usize;
        assert_eq!(
            mask.resolution(),
            settings.resolution,
            "mask resolution must match the grid"
        );
        let visible_rows = (viewport.grid_rect().height.round() as usize).clamp(1, resolution);
        let walls = mask
            .texels()
            .iter()
            .map(|&t| t >= crate::mask::WALL_THRESHOLD)
            .collect();
        let courant = settings.courant();
        Self {
            resolution,
            visible_rows,
            damping: settings.damping,
            courant_sq: courant * courant,
            walls,
            ring: BufferRing::from_fn(|_| vec![0.0; resolution * resolution]),
            writes: [0; SLOT_COUNT],
            frame: Vec::new(),
            presents: 0,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Heights of one slot, row-major, row 0 at the top.
    pub fn slot(&self, index: usize) -> &[f32] {
        self.ring.get(index)
    }

    pub fn height(&self, slot: usize, col: usize, row: usize) -> f32 {
        self.ring.get(slot)[row * self.resolution + col]
    }

    /// How many times each slot has been written.
    pub fn write_counts(&self) -> [u64; SLOT_COUNT] {
        self.writes
    }

    /// Content of the last present: visible rows of the newest slot, walls zeroed.
    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn is_wall(&self, col: usize, row: usize) -> bool {
        self.walls[row * self.resolution + col]
    }

    /// Largest absolute height on any wall texel of a slot.
    pub fn wall_amplitude(&self, slot: usize) -> f32 {
        self.ring
            .get(slot)
            .iter()
            .zip(&self.walls)
            .filter(|(_, &wall)| wall)
            .map(|(h, _)| h.abs())
            .fold(0.0, f32::max)
    }

    fn texel_center(&self, col: usize, row: usize) -> Vec2 {
        // grid y grows upwards, texture rows grow downwards
        Vec2::new(col as f32 + 0.5, (self.resolution - row) as f32 - 0.5)
    }

    fn render_splash(&mut self, target: usize, base: usize, splash: &Splash, use_base: bool) {
        let res = self.resolution;
        let visible = self.visible_rows;
        let center = splash.center * res as f32;
        let points: Vec<Vec2> = (0..visible * res)
            .map(|i| self.texel_center(i % res, i / res))
            .collect();

        let walls = &self.walls;
        let (out, [base]) = self.ring.split(target, [base]);
        out.fill(0.0);
        for (i, point) in points.into_iter().enumerate() {
            if walls[i] {
                continue;
            }
            let under = if use_base { base[i] } else { 0.0 };
            out[i] = under + splash.profile(point.distance(center));
        }
        self.writes[target] += 1;
    }
}

impl WavePasses for ReferencePasses {
    fn add_splash(&mut self, plan: &SplashPlan) {
        for write in &plan.writes {
            self.render_splash(write.target, write.base, &write.splash, plan.use_base);
        }
    }

    fn step(&mut self, pointer: RingPointer) {
        let res = self.resolution;
        let visible = self.visible_rows;
        let (damping, courant_sq) = (self.damping, self.courant_sq);
        let walls = &self.walls;
        let (next, [oldest, current]) = self.ring.split(pointer.newest(), [pointer.oldest(), pointer.previous()]);

        // walls and the grid edge read as zero height
        let sample = |col: isize, row: isize| -> f32 {
            if col < 0 || row < 0 || col >= res as isize || row >= res as isize {
                return 0.0;
            }
            let i = row as usize * res + col as usize;
            if walls[i] {
                0.0
            } else {
                current[i]
            }
        };

        next.fill(0.0);
        for row in 0..visible {
            for col in 0..res {
                let i = row * res + col;
                if walls[i] {
                    continue;
                }
                let (c, r) = (col as isize, row as isize);
                let u = current[i];
                let laplacian = sample(c - 1, r) + sample(c + 1, r) + sample(c, r - 1)
                    + sample(c, r + 1)
                    - 4.0 * u;
                next[i] = u + damping * (u - oldest[i]) + courant_sq * laplacian;
            }
        }
        self.writes[pointer.newest()] += 1;
    }

    fn present(&mut self, pointer: RingPointer) {
        let res = self.resolution;
        let newest = self.ring.get(pointer.newest());
        self.frame = newest[..self.visible_rows * res]
            .iter()
            .zip(&self.walls)
            .map(|(&h, &wall)| if wall { 0.0 } else { h })
            .collect();
        self.presents += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splash::SplashShape;

    fn small_settings() -> WaveSettings {
        WaveSettings {
            resolution: 32,
            ..Default::default()
        }
    }

    #[test]
    #[should_panic(expected = "mask resolution must match the grid")]
    fn mismatched_mask_is_refused() {
        let settings = small_settings();
        let viewport = Viewport::from_surface(320, 320, 32);
        ReferencePasses::new(&settings, &viewport, &MaskImage::open(64));
    }

    #[test]
    fn blank_seed_leaves_zero_state() {
        let settings = small_settings();
        let viewport = Viewport::from_surface(320, 320, 32);
        let mut passes = ReferencePasses::new(&settings, &viewport, &MaskImage::open(32));
        let shape = SplashShape::from_settings(&settings);
        let plan = SplashPlan::new(RingPointer::new(0), false, crate::splash::OFFSCREEN, &shape);
        passes.add_splash(&plan);
        assert!(passes.slot(0).iter().all(|&h| h == 0.0));
        assert!(passes.slot(1).iter().all(|&h| h == 0.0));
        assert_eq!(passes.write_counts(), [1, 1, 0]);
    }

    #[test]
    fn splash_second_copy_is_wider() {
        let settings = small_settings();
        let viewport = Viewport::from_surface(320, 320, 32);
        let mut passes = ReferencePasses::new(&settings, &viewport, &MaskImage::open(32));
        let shape = SplashShape::from_settings(&settings);
        let plan = SplashPlan::new(RingPointer::new(0), true, Vec2::splat(0.5), &shape);
        passes.add_splash(&plan);

        let mass = |slot: usize| passes.slot(slot).iter().sum::<f32>();
        assert!(mass(0) > 0.0);
        assert!(mass(1) > mass(0));
    }

    #[test]
    fn step_of_flat_state_stays_flat() {
        let settings = small_settings();
        let viewport = Viewport::from_surface(320, 320, 32);
        let mut passes = ReferencePasses::new(&settings, &viewport, &MaskImage::open(32));
        passes.step(RingPointer::new(1));
        assert!(passes.slot(0).iter().all(|&h| h == 0.0));
        assert_eq!(passes.write_counts(), [1, 0, 0]);
    }

    #[test]
    fn hidden_rows_are_not_simulated() {
        let settings = small_settings();
        // aspect 2: only the top 16 rows are visible
        let viewport = Viewport::from_surface(320, 160, 32);
        let mut passes = ReferencePasses::new(&settings, &viewport, &MaskImage::open(32));
        let shape = SplashShape::from_settings(&settings);
        let plan = SplashPlan::new(RingPointer::new(0), true, Vec2::new(0.5, 0.2), &shape);
        passes.add_splash(&plan);
        for row in 16..32 {
            for col in 0..32 {
                assert_eq!(passes.height(0, col, row), 0.0);
            }
        }
    }
}
