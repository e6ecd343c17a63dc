/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// Scene colors are authored as sRGB hex values and lit in linear space,
    /// so an sRGB target gives the correct encode on write.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO paces the redraw loop to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Requested MSAA sample count. Falls back to 1 when the surface format
    /// does not support it.
    pub sample_count: u32,

    /// Depth attachment format shared by every 3D pipeline.
    pub depth_format: wgpu::TextureFormat,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            sample_count: 4,
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}
