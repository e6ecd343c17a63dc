use winit::dpi::PhysicalSize;

/// Depth buffer and optional multisampled color target.
///
/// Both textures always match the configured surface size. They are recreated
/// on resize; a zero-area size keeps the previous textures until the window
/// becomes visible again.
pub struct Attachments {
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    sample_count: u32,
}

impl Attachments {
    pub(crate) fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sample_count: u32,
        size: PhysicalSize<u32>,
    ) -> Self {
        let (depth_view, msaa_view) =
            create_views(device, color_format, depth_format, sample_count, size);
        Self {
            depth_view,
            msaa_view,
            color_format,
            depth_format,
            sample_count,
        }
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        let (depth_view, msaa_view) = create_views(
            device,
            self.color_format,
            self.depth_format,
            self.sample_count,
            size,
        );
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Multisampled color view, `None` when MSAA is off.
    pub fn msaa_view(&self) -> Option<&wgpu::TextureView> {
        self.msaa_view.as_ref()
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

fn create_views(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    sample_count: u32,
    size: PhysicalSize<u32>,
) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
    let extent = wgpu::Extent3d {
        width: size.width.max(1),
        height: size.height.max(1),
        depth_or_array_layers: 1,
    };

    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("selene depth"),
        size: extent,
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: depth_format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

    let msaa_view = (sample_count > 1).then(|| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("selene msaa color"),
                size: extent,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: color_format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    });

    (depth_view, msaa_view)
}
