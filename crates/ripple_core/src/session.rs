//! Running simulation session
//!
//! A session only exists once its passes exist, and passes need a loaded
//! boundary mask, so nothing can tick before initialization has finished.

use crate::passes::WavePasses;
use crate::ring::RingPointer;
use crate::scheduler::FrameScheduler;
use crate::settings::WaveSettings;
use crate::splash::{SplashPlan, SplashShape, OFFSCREEN};
use crate::stats::TickStats;
use crate::viewport::Viewport;
use glam::Vec2;
use rand::Rng;
use std::time::Duration;

pub struct Session<P, R> {
    passes: P,
    scheduler: FrameScheduler<R>,
}

impl<P: WavePasses, R: Rng> Session<P, R> {
    /// Seed the history slots with a silent splash and start at pointer 0.
    pub fn start(mut passes: P, settings: &WaveSettings, viewport: Viewport, rng: R) -> Self {
        let shape = SplashShape::from_settings(settings);
        let seed = SplashPlan::new(RingPointer::new(0), false, OFFSCREEN, &shape);
        passes.add_splash(&seed);

        tracing::info!(
            resolution = settings.resolution,
            fps = settings.fps,
            aspect_ratio = viewport.aspect_ratio(),
            "session started"
        );

        Self {
            passes,
            scheduler: FrameScheduler::new(settings, viewport, rng),
        }
    }

    /// Advance by `elapsed` wall-clock time; returns ticks run.
    pub fn tick(&mut self, elapsed: Duration) -> u32 {
        self.scheduler.tick(elapsed, &mut self.passes)
    }

    /// Queue a splash at grid coordinates.
    pub fn request_splash(&mut self, at: Vec2) {
        self.scheduler.request_splash(at);
    }

    /// Queue a splash at a surface-local pixel position.
    pub fn press(&mut self, x: f64, y: f64) {
        let at = self.scheduler.viewport().normalize_pointer(x, y);
        self.scheduler.request_splash(at);
    }

    /// Present the newest completed frame again without stepping.
    pub fn redraw(&mut self) {
        // the pointer already moved past the last step, so its newest slot
        // sits one rotation back
        let shown = self.scheduler.pointer().after_splash();
        self.passes.present(shown);
    }

    pub fn pointer(&self) -> RingPointer {
        self.scheduler.pointer()
    }

    pub fn stats(&self) -> TickStats {
        self.scheduler.stats()
    }

    pub fn scheduler(&self) -> &FrameScheduler<R> {
        &self.scheduler
    }

    pub fn passes(&self) -> &P {
        &self.passes
    }

    pub fn passes_mut(&mut self) -> &mut P {
        &mut self.passes
    }
}
