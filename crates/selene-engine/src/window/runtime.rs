use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{logical_size, App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "selene".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until the window closes or the app
    /// requests exit. `App::on_teardown` runs exactly once before returning.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        // `exiting` is not delivered on every platform.
        state.teardown();

        match state.setup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    torn_down: bool,
    setup_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            torn_down: false,
            setup_error: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        log::info!(
            "window created: \"{}\" {}x{} @{}x",
            self.config.title,
            size.width,
            size.height,
            window.scale_factor()
        );

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()?;

        entry.with_gpu(|gpu| {
            let info = gpu.adapter_info();
            log::info!("using adapter {:?} ({:?})", info.name, info.backend);
        });

        Ok(entry)
    }

    /// Runs `App::on_teardown` once, then drops the window and GPU state.
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.app.on_teardown();
        self.window = None;
    }

    fn resize(&mut self) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };
        let new_size = entry.with_window(|w| w.inner_size());
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        let (w, h) = entry.with_window(|w| logical_size(w));
        entry.with_window(|w| w.request_redraw());
        self.app.on_resize(Viewport::new(w, h));
    }

    fn redraw(&mut self, window_id: WindowId) -> RuntimeCtx {
        let mut runtime_ctx = RuntimeCtx::default();
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return runtime_ctx;
        };

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input_state,
                time: ft,
                runtime: &mut runtime_ctx,
            };

            if app.on_frame(&mut ctx) == AppControl::Exit {
                ctx.runtime.exit();
            }
        });

        runtime_ctx
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create initial window: {e:#}");
                self.setup_error = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw, paced by presentation.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        let mut exit_from_input = false;
        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, fields.input_state, &event) {
                fields.input_state.apply_event(&ev);
                if app.on_input(&ev, fields.input_state) == AppControl::Exit {
                    exit_from_input = true;
                }
            }
        });

        if exit_from_input {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),

            WindowEvent::RedrawRequested => {
                if self.redraw(window_id).exit_requested() {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct CountingApp {
        teardowns: Rc<Cell<u32>>,
    }

    impl CoreApp for CountingApp {
        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }

        fn on_teardown(&mut self) {
            self.teardowns.set(self.teardowns.get() + 1);
        }
    }

    #[test]
    fn teardown_reaches_app_once() {
        let teardowns = Rc::new(Cell::new(0));
        let app = CountingApp {
            teardowns: Rc::clone(&teardowns),
        };
        let mut state = AppState::new(RuntimeConfig::default(), GpuInit::default(), app);

        // `exiting`, then the call after `run_app` returns.
        state.teardown();
        state.teardown();

        assert_eq!(teardowns.get(), 1);
        assert!(state.window.is_none());
    }

    #[test]
    fn runtime_ctx_records_exit() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.exit_requested());
        ctx.exit();
        assert!(ctx.exit_requested());
    }
}
