//! Fixed-timestep frame scheduler
//!
//! Owns the ring pointer and the pending splash request. Each tick runs, in
//! order: random splash, user splash, step, present, pointer advance. Splashes
//! must land in the history slots before the step reads them.

use crate::passes::WavePasses;
use crate::ring::RingPointer;
use crate::settings::WaveSettings;
use crate::splash::{SplashPlan, SplashShape};
use crate::stats::TickStats;
use crate::time::FixedStep;
use crate::viewport::Viewport;
use glam::Vec2;
use rand::Rng;
use std::time::Duration;

/// Origin of a splash, for logging and stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashSource {
    Random,
    User,
}

pub struct FrameScheduler<R> {
    clock: FixedStep,
    pointer: RingPointer,
    pending: Option<Vec2>,
    shape: SplashShape,
    random_splash_p: f32,
    viewport: Viewport,
    rng: R,
    stats: TickStats,
}

impl<R: Rng> FrameScheduler<R> {
    pub fn new(settings: &WaveSettings, viewport: Viewport, rng: R) -> Self {
        Self {
            clock: FixedStep::new(settings.interval(), settings.max_catch_up),
            pointer: RingPointer::default(),
            pending: None,
            shape: SplashShape::from_settings(settings),
            random_splash_p: settings.random_splash_p,
            viewport,
            rng,
            stats: TickStats::default(),
        }
    }

    pub fn pointer(&self) -> RingPointer {
        self.pointer
    }

    pub fn pending(&self) -> Option<Vec2> {
        self.pending
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn clock(&self) -> &FixedStep {
        &self.clock
    }

    pub fn shape(&self) -> &SplashShape {
        &self.shape
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Queue a splash for the next tick. A newer request replaces an older one.
    pub fn request_splash(&mut self, at: Vec2) {
        if let Some(previous) = self.pending.replace(at) {
            tracing::trace!(?previous, replacement = ?at, "splash request overwritten");
        }
    }

    /// Feed wall-clock time and run every tick that became due.
    ///
    /// Returns the number of ticks run.
    pub fn tick<P: WavePasses + ?Sized>(&mut self, elapsed: Duration, passes: &mut P) -> u32 {
        let budget = self.clock.advance(elapsed);
        if budget.dropped > 0 {
            tracing::warn!(dropped = budget.dropped, "host fell behind, skipping ticks");
            self.stats.dropped += u64::from(budget.dropped);
        }
        for _ in 0..budget.due {
            self.run_tick(passes);
        }
        budget.due
    }

    /// One tick of the pipeline, regardless of the clock.
    pub fn run_tick<P: WavePasses + ?Sized>(&mut self, passes: &mut P) {
        if self.random_splash_p > 0.0 && self.rng.gen::<f32>() < self.random_splash_p {
            let (u, v) = (self.rng.gen::<f32>(), self.rng.gen::<f32>());
            let at = self.viewport.band_point(u, v);
            self.splash(at, SplashSource::Random, passes);
        }

        if let Some(at) = self.pending.take() {
            self.splash(at, SplashSource::User, passes);
        }

        passes.step(self.pointer);
        passes.present(self.pointer);
        self.pointer = self.pointer.after_step();

        self.stats.ticks += 1;
        tracing::trace!(tick = self.stats.ticks, pointer = self.pointer.index(), "tick");
    }

    fn splash<P: WavePasses + ?Sized>(&mut self, at: Vec2, source: SplashSource, passes: &mut P) {
        self.pointer = self.pointer.after_splash();
        let plan = SplashPlan::new(self.pointer, true, at, &self.shape);
        tracing::debug!(
            ?source,
            x = at.x,
            y = at.y,
            first = plan.writes[0].target,
            second = plan.writes[1].target,
            "splash"
        );
        passes.add_splash(&plan);

        match source {
            SplashSource::Random => self.stats.random_splashes += 1,
            SplashSource::User => self.stats.user_splashes += 1,
        }
    }
}
