//! Splash planning
//!
//! A splash is a thin expanding annulus written into two consecutive history
//! slots. The second copy is larger by exactly one step of wavefront travel, so
//! the pair reads to the stepper as a ring already moving outwards.

use crate::ring::RingPointer;
use crate::settings::WaveSettings;
use glam::Vec2;

/// Grid position meaning "nowhere"; used for the silent startup seed.
pub const OFFSCREEN: Vec2 = Vec2::new(-1.0, -1.0);

/// One annulus to render, sizes in texels, center in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splash {
    pub center: Vec2,
    pub radius: f32,
    pub width: f32,
    pub height: f32,
}

impl Splash {
    /// Height added at `distance` texels from the center.
    ///
    /// Raised-cosine bump of full width `width` peaking at `radius`.
    pub fn profile(&self, distance: f32) -> f32 {
        let offset = distance - self.radius;
        if offset.abs() >= self.width * 0.5 {
            return 0.0;
        }
        self.height * 0.5 * (1.0 + (std::f32::consts::TAU * offset / self.width).cos())
    }
}

/// Splash geometry shared by every splash of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplashShape {
    pub radius: f32,
    pub width: f32,
    pub height: f32,
    /// Radius gained between the two copies: `c * dt`.
    pub growth: f32,
}

impl SplashShape {
    pub fn from_settings(settings: &WaveSettings) -> Self {
        Self {
            radius: settings.splash_radius,
            width: settings.splash_width,
            height: settings.splash_height,
            growth: settings.splash_growth(),
        }
    }

    /// The two copies of a splash at `center`, smaller first.
    pub fn copies(&self, center: Vec2) -> [Splash; 2] {
        let first = Splash {
            center,
            radius: self.radius,
            width: self.width,
            height: self.height,
        };
        let second = Splash {
            radius: self.radius + self.growth,
            ..first
        };
        [first, second]
    }
}

/// One render of a splash copy: `target = base (or blank) + splash`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplashWrite {
    pub target: usize,
    pub base: usize,
    pub splash: Splash,
}

/// Everything a backend needs to inject one splash.
///
/// Writes run in order: the first reads the slot the second overwrites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplashPlan {
    pub writes: [SplashWrite; 2],
    /// Composite over the base slots; false renders onto a blank state.
    pub use_base: bool,
}

impl SplashPlan {
    /// Plan a splash whose first copy lands in the slot `target` points at.
    pub fn new(target: RingPointer, use_base: bool, center: Vec2, shape: &SplashShape) -> Self {
        let [small, large] = shape.copies(center);
        Self {
            writes: [
                SplashWrite {
                    target: target.slot(0),
                    base: target.slot(1),
                    splash: small,
                },
                SplashWrite {
                    target: target.slot(1),
                    base: target.slot(2),
                    splash: large,
                },
            ],
            use_base,
        }
    }

    /// Slots this splash leaves untouched.
    pub fn untouched(&self) -> usize {
        3 - self.writes[0].target - self.writes[1].target
    }

    pub fn center(&self) -> Vec2 {
        self.writes[0].splash.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> SplashShape {
        SplashShape::from_settings(&WaveSettings::default())
    }

    #[test]
    fn second_copy_grows_by_one_step() {
        // resolution 512, 60 fps, c = 40
        let [a, b] = shape().copies(Vec2::new(0.5, 0.5));
        assert_eq!(a.radius, 8.0);
        assert!((b.radius - (8.0 + 0.667)).abs() < 1e-3);
        assert_eq!(a.width, b.width);
        assert_eq!(a.center, b.center);
    }

    #[test]
    fn plan_follows_target_offsets() {
        for start in 0..3 {
            let target = RingPointer::new(start);
            let plan = SplashPlan::new(target, true, Vec2::splat(0.5), &shape());
            assert_eq!(plan.writes[0].target, target.slot(0));
            assert_eq!(plan.writes[0].base, target.slot(1));
            assert_eq!(plan.writes[1].target, target.slot(1));
            assert_eq!(plan.writes[1].base, target.slot(2));
            assert_eq!(plan.untouched(), target.slot(2));
        }
    }

    #[test]
    fn profile_peaks_on_ring() {
        let [s, _] = shape().copies(Vec2::ZERO);
        assert!((s.profile(8.0) - s.height).abs() < 1e-6);
        assert_eq!(s.profile(8.0 + 7.5), 0.0);
        assert_eq!(s.profile(0.0), 0.0);
        assert!(s.profile(10.0) > 0.0);
    }
}
