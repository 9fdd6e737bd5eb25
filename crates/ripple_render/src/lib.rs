//! Ripple Render
//!
//! wgpu backend for the wave passes: the texture ring, the boundary mask, mip
//! generation and the splash, simulation and display programs.

pub mod backend;
pub mod error;
pub mod gpu;
pub mod mask;
pub mod mipmap;
pub mod passes;
pub mod ring;
pub mod window;

pub use error::RenderError;
pub use gpu::GpuContext;
pub use passes::GpuPasses;

pub use wgpu;
pub use winit;

/// Format of the wave-state textures; height lives in the red channel.
pub const WAVE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Format of the boundary mask texture.
pub const MASK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;

/// Number of mip levels in a full chain for a square texture.
pub fn mip_levels(size: u32) -> u32 {
    size.max(1).ilog2() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mip_chain() {
        assert_eq!(mip_levels(1), 1);
        assert_eq!(mip_levels(512), 10);
        assert_eq!(mip_levels(16), 5);
    }
}
