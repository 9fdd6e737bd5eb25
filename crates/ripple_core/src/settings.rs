//! Simulation settings
//!
//! A small fixed set of constants, optionally overridden from a JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Largest stable Courant number for the explicit 2D five-point scheme.
pub const MAX_COURANT: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Highest accepted tick rate.
pub const MAX_FPS: u32 = 1000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("frame rate must be positive")]
    ZeroFrameRate,

    #[error("frame rate {fps} exceeds the maximum of {max}")]
    FrameRateTooHigh { fps: u32, max: u32 },

    #[error("grid resolution {0} must be a power of two between 16 and 4096")]
    BadResolution(u32),

    #[error("propagation speed must be positive, got {0}")]
    BadSpeed(f32),

    #[error("damping must lie in (0, 1], got {0}")]
    BadDamping(f32),

    #[error("random splash probability must lie in [0, 1], got {0}")]
    BadProbability(f32),

    #[error("splash ring width must be positive, got {0}")]
    BadSplashWidth(f32),

    #[error("courant number {courant:.3} exceeds the stability limit {limit:.3}")]
    Unstable { courant: f32, limit: f32 },

    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Simulation and window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSettings {
    /// Fixed simulation rate, ticks per second.
    pub fps: u32,
    /// Side length of the square simulation grid, in texels.
    pub resolution: u32,
    /// Wave propagation speed, texels per second.
    pub speed: f32,
    /// Fraction of the previous velocity kept each step.
    pub damping: f32,
    /// Radius of the first splash copy, texels.
    pub splash_radius: f32,
    /// Thickness of the splash annulus, texels.
    pub splash_width: f32,
    /// Peak height of the splash annulus.
    pub splash_height: f32,
    /// Chance per tick of an autonomous splash.
    pub random_splash_p: f32,
    /// Ticks allowed to run in one host callback before backlog is dropped.
    pub max_catch_up: u32,
    /// Boundary-condition image, white marks rigid walls.
    pub mask_path: PathBuf,
    pub window: WindowSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            resolution: 512,
            speed: 40.0,
            damping: 0.98,
            splash_radius: 8.0,
            splash_width: 15.0,
            splash_height: 0.6,
            random_splash_p: 1.0 / 30.0,
            max_catch_up: 4,
            mask_path: PathBuf::from("assets/boundary.png"),
            window: WindowSettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Ripple".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

impl WaveSettings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fps == 0 {
            return Err(SettingsError::ZeroFrameRate);
        }
        if self.fps > MAX_FPS {
            return Err(SettingsError::FrameRateTooHigh {
                fps: self.fps,
                max: MAX_FPS,
            });
        }
        if !self.resolution.is_power_of_two() || !(16..=4096).contains(&self.resolution) {
            return Err(SettingsError::BadResolution(self.resolution));
        }
        if !(self.speed > 0.0) {
            return Err(SettingsError::BadSpeed(self.speed));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(SettingsError::BadDamping(self.damping));
        }
        if !(0.0..=1.0).contains(&self.random_splash_p) {
            return Err(SettingsError::BadProbability(self.random_splash_p));
        }
        if !(self.splash_width > 0.0) {
            return Err(SettingsError::BadSplashWidth(self.splash_width));
        }
        let courant = self.courant();
        if courant > MAX_COURANT {
            return Err(SettingsError::Unstable {
                courant,
                limit: MAX_COURANT,
            });
        }
        Ok(())
    }

    /// Simulation timestep in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Wall-clock time between ticks.
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps))
    }

    /// Distance a wavefront travels in one step, texels.
    pub fn splash_growth(&self) -> f32 {
        self.speed * self.dt()
    }

    /// `c * dt / ds` with a grid spacing of one texel.
    pub fn courant(&self) -> f32 {
        self.speed * self.dt()
    }
}
