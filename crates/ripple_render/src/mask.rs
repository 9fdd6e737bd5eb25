//! Boundary mask texture

use crate::mipmap::MipGenerator;
use crate::{mip_levels, MASK_FORMAT};
use ripple_core::MaskImage;

pub struct MaskTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl MaskTexture {
    /// Upload `mask` and build its mip chain. Image rows are top-down, which is
    /// also wgpu's texel row order, so no flip is needed.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mip_generator: &MipGenerator,
        mask: &MaskImage,
    ) -> Self {
        let resolution = mask.resolution();
        let size = wgpu::Extent3d {
            width: resolution,
            height: resolution,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Boundary Mask"),
            size,
            mip_level_count: mip_levels(resolution),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: MASK_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            mask.texels(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(resolution),
                rows_per_image: Some(resolution),
            },
            size,
        );

        let chain = mip_generator.chain(device, &texture);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Mask Mip Encoder"),
        });
        mip_generator.generate(&mut encoder, &chain);
        queue.submit(std::iter::once(encoder.finish()));

        tracing::debug!(
            resolution,
            walls = mask.wall_count(),
            levels = chain.levels(),
            "boundary mask uploaded"
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}
