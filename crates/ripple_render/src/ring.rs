//! The three wave-state textures

use crate::mipmap::{MipChain, MipGenerator};
use crate::{mip_levels, WAVE_FORMAT};
use ripple_core::{BufferRing, RingPointer};

/// One ring slot: a texture, its sampling view and its render target.
pub struct RingSlot {
    pub texture: wgpu::Texture,
    /// Whole mip chain, bound when the slot is read.
    pub sample_view: wgpu::TextureView,
    /// Level 0 only, attached when the slot is written.
    pub target_view: wgpu::TextureView,
    pub mips: MipChain,
}

/// wgpu zero-initializes new textures, so every slot starts at rest.
pub struct RingTextures {
    slots: BufferRing<RingSlot>,
}

impl RingTextures {
    pub fn new(device: &wgpu::Device, resolution: u32, mip_generator: &MipGenerator) -> Self {
        let slots = BufferRing::from_fn(|index| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(["Wave Slot 0", "Wave Slot 1", "Wave Slot 2"][index]),
                size: wgpu::Extent3d {
                    width: resolution,
                    height: resolution,
                    depth_or_array_layers: 1,
                },
                mip_level_count: mip_levels(resolution),
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: WAVE_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            let sample_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let target_view = texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("Wave Slot Target"),
                base_mip_level: 0,
                mip_level_count: Some(1),
                ..Default::default()
            });
            let mips = mip_generator.chain(device, &texture);
            RingSlot {
                texture,
                sample_view,
                target_view,
                mips,
            }
        });
        Self { slots }
    }

    #[inline]
    pub fn slot(&self, index: usize) -> &RingSlot {
        self.slots.get(index)
    }

    #[inline]
    pub fn at(&self, pointer: RingPointer, offset: usize) -> &RingSlot {
        self.slots.at(pointer, offset)
    }
}
