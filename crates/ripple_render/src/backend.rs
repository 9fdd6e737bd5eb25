//! Adapter capability probe

/// Rendering backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Metal (macOS, iOS)
    Metal,
    /// DirectX 12 (Windows)
    DirectX12,
    /// Vulkan (cross-platform)
    Vulkan,
    /// OpenGL / GLES (fallback)
    OpenGL,
    /// WebGPU in a browser
    WebGpu,
    Unknown,
}

impl From<wgpu::Backend> for BackendType {
    fn from(backend: wgpu::Backend) -> Self {
        match backend {
            wgpu::Backend::Metal => Self::Metal,
            wgpu::Backend::Dx12 => Self::DirectX12,
            wgpu::Backend::Vulkan => Self::Vulkan,
            wgpu::Backend::Gl => Self::OpenGL,
            wgpu::Backend::BrowserWebGpu => Self::WebGpu,
            _ => Self::Unknown,
        }
    }
}

/// Capability probe result
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    pub backend: BackendType,
    pub adapter_name: String,
    pub max_texture_size: u32,
}

/// Probe what the chosen adapter can do.
pub fn probe_capabilities(adapter: &wgpu::Adapter) -> DeviceCapabilities {
    let info = adapter.get_info();
    DeviceCapabilities {
        backend: info.backend.into(),
        adapter_name: info.name,
        max_texture_size: adapter.limits().max_texture_dimension_2d,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_wgpu_backends() {
        assert_eq!(BackendType::from(wgpu::Backend::Vulkan), BackendType::Vulkan);
        assert_eq!(BackendType::from(wgpu::Backend::Dx12), BackendType::DirectX12);
        assert_eq!(BackendType::from(wgpu::Backend::Empty), BackendType::Unknown);
    }
}
