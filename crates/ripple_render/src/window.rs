//! Window configuration
//!
//! Windows are created inside winit's `resumed` callback; this only builds the
//! attributes.

use ripple_core::settings::WindowSettings;
use winit::window::Window;

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowSettings::default().into()
    }
}

impl From<WindowSettings> for WindowConfig {
    fn from(settings: WindowSettings) -> Self {
        Self {
            title: settings.title,
            width: settings.width,
            height: settings.height,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: WindowConfig) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}
