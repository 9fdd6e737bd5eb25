//! Ripple Core
//!
//! GPU-free heart of the wave simulation:
//! - Triple-buffered ring pointer arithmetic
//! - Splash planning (which slots, which radii)
//! - Fixed-timestep clock and frame scheduler
//! - Session object tying the scheduler to a set of wave passes
//! - CPU reference passes for headless runs

pub mod mask;
pub mod passes;
pub mod reference;
pub mod ring;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod splash;
pub mod stats;
pub mod time;
pub mod viewport;

pub use glam;

pub use mask::MaskImage;
pub use passes::WavePasses;
pub use ring::{BufferRing, RingPointer, SLOT_COUNT};
pub use scheduler::FrameScheduler;
pub use session::Session;
pub use settings::{SettingsError, WaveSettings};
pub use splash::{Splash, SplashPlan, SplashShape};
pub use stats::TickStats;
pub use time::FixedStep;
pub use viewport::{GridRect, Viewport};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
