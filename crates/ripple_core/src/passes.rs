//! The three programs a session drives each tick.

use crate::ring::RingPointer;
use crate::splash::SplashPlan;

/// Backend executing the splash, simulation and display passes.
///
/// Passes are issued in program order and complete before the next one reads
/// their output. None of them can fail once the backend exists; setup errors
/// are reported when the backend is constructed.
pub trait WavePasses {
    /// Run both writes of `plan` in order, then refresh sampling data of the
    /// written slots.
    fn add_splash(&mut self, plan: &SplashPlan);

    /// Read `pointer.oldest()` and `pointer.previous()`, write `pointer.newest()`.
    fn step(&mut self, pointer: RingPointer);

    /// Show `pointer.newest()` on the visible surface. Splash and step already
    /// refreshed the slot's sampling data, so presenting writes no wave state.
    fn present(&mut self, pointer: RingPointer);
}

impl<P: WavePasses + ?Sized> WavePasses for &mut P {
    fn add_splash(&mut self, plan: &SplashPlan) {
        (**self).add_splash(plan)
    }

    fn step(&mut self, pointer: RingPointer) {
        (**self).step(pointer)
    }

    fn present(&mut self, pointer: RingPointer) {
        (**self).present(pointer)
    }
}
