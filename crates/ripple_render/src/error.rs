use thiserror::Error;

/// Setup failures. Once a [`crate::GpuPasses`] exists, drawing has no error path.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a surface for the window: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter can present to this window")]
    NoAdapter,

    #[error("failed to open the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats on this adapter")]
    NoSurfaceFormat,

    #[error("grid resolution {resolution} exceeds the adapter's texture limit {limit}")]
    ResolutionTooLarge { resolution: u32, limit: u32 },

    #[error("mask is {mask}x{mask} but the grid is {grid}x{grid}")]
    MaskSize { mask: u32, grid: u32 },

    #[error("shader program setup failed: {0}")]
    Program(String),

    #[error("GPU ran out of memory")]
    OutOfMemory,
}
