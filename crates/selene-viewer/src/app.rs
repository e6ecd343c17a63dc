use selene_engine::coords::Viewport;
use selene_engine::core::{App, AppControl, FrameCtx};
use selene_engine::input::{InputEvent, InputState};
use selene_engine::render::mesh::MeshRenderer;

use crate::config::ViewerConfig;
use crate::context::SceneContext;

/// Seconds between frame-rate log lines.
const FPS_LOG_INTERVAL: f32 = 5.0;

/// Engine application hosting one [`SceneContext`].
///
/// The context is built on the first frame, once the window size is known.
pub struct MoonApp {
    config: ViewerConfig,
    context: Option<SceneContext>,
    renderer: Option<MeshRenderer>,
    since_fps_log: f32,
}

impl MoonApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            context: None,
            renderer: None,
            since_fps_log: 0.0,
        }
    }
}

impl App for MoonApp {
    fn on_input(&mut self, event: &InputEvent, _state: &InputState) -> AppControl {
        if let Some(context) = self.context.as_mut() {
            context.handle_input(event);
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, viewport: Viewport) {
        log::debug!("viewport {}x{}", viewport.width, viewport.height);
        if let Some(context) = self.context.as_mut() {
            context.on_resize(viewport);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.context.is_none() {
            let viewport = ctx.window.viewport();
            if !viewport.is_valid() {
                return AppControl::Continue;
            }
            self.context = Some(SceneContext::new(self.config.clone(), viewport));
            self.renderer = Some(MeshRenderer::new());
        }

        let (Some(context), Some(renderer)) = (self.context.as_mut(), self.renderer.as_mut()) else {
            return AppControl::Continue;
        };

        if !context.tick() {
            return AppControl::Continue;
        }

        self.since_fps_log += ctx.time.dt;
        if self.since_fps_log >= FPS_LOG_INTERVAL {
            self.since_fps_log = 0.0;
            log::debug!("{:.1} fps (frame {})", ctx.time.fps, ctx.time.frame_index);
        }

        let scene = context.scene();
        let camera = context.camera();
        ctx.render(scene.background, |rctx, target| {
            renderer.render(rctx, target, scene, camera);
        })
    }

    fn on_teardown(&mut self) {
        if let Some(context) = self.context.as_mut() {
            if context.teardown() {
                log::info!("moon viewer torn down");
            }
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.release();
        }
    }
}
