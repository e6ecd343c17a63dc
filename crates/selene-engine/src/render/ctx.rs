use crate::coords::Viewport;

/// Renderer-facing context (device/queue + target formats + viewport).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub viewport: Viewport, // logical px
}

/// Target for drawing: encoder, color view (MSAA or swapchain) and depth view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    /// Swapchain view the MSAA color resolves into. `None` without MSAA.
    pub resolve_target: Option<&'a wgpu::TextureView>,
    pub depth_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    /// Color attachment with the given load op; always stores and resolves.
    pub fn color_attachment(
        &self,
        load: wgpu::LoadOp<wgpu::Color>,
    ) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: self.resolve_target,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }

    pub fn depth_attachment(
        &self,
        load: wgpu::LoadOp<f32>,
    ) -> wgpu::RenderPassDepthStencilAttachment<'a> {
        wgpu::RenderPassDepthStencilAttachment {
            view: self.depth_view,
            depth_ops: Some(wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }
}
