use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputState;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        logical_size(self.window)
    }

    pub fn viewport(&self) -> Viewport {
        let (w, h) = self.logical_size();
        Viewport::new(w, h)
    }
}

pub(crate) fn logical_size(window: &Window) -> (f32, f32) {
    let logi: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    (logi.width as f32, logi.height as f32)
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears color to `clear` and depth to 1.0, calls `draw` with a ready
    /// [`RenderCtx`] and [`RenderTarget`], then presents the frame.
    ///
    /// With MSAA the target's color view is the multisampled texture and the
    /// swapchain image is its resolve target.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let viewport = self.window.viewport();
        if !viewport.is_valid() {
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let attachments = self.gpu.attachments();
        let (color_view, resolve_target) = match attachments.msaa_view() {
            Some(msaa) => (msaa, Some(&frame.view)),
            None => (&frame.view, None),
        };

        // Target borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget {
                encoder: &mut frame.encoder,
                color_view,
                resolve_target,
                depth_view: attachments.depth_view(),
            };

            {
                let color = target.color_attachment(wgpu::LoadOp::Clear(clear.to_wgpu()));
                let depth = target.depth_attachment(wgpu::LoadOp::Clear(1.0));
                let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("selene clear"),
                    color_attachments: &[Some(color)],
                    depth_stencil_attachment: Some(depth),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });
            }

            let rctx = RenderCtx {
                device: self.gpu.device(),
                queue: self.gpu.queue(),
                surface_format: self.gpu.surface_format(),
                depth_format: attachments.depth_format(),
                sample_count: attachments.sample_count(),
                viewport,
            };

            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
