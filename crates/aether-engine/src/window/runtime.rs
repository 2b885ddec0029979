use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::{translate_device_event, translate_window_event};
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "aether".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it exits or the window closes.
    ///
    /// Setup failures that happen inside the event loop (window or GPU creation)
    /// end the loop and are returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver::new(config, gpu_init, app);

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        match driver.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The window and everything bound to its lifetime.
///
/// `Gpu` borrows the window for its surface, so the two live in one
/// self-referencing cell.
#[self_referencing]
struct Canvas {
    input: InputState,
    frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Canvas {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        CanvasTryBuilder {
            input: InputState::default(),
            frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    fn resize_to_window(&mut self) {
        let size = self.with_window(|w| w.inner_size());
        log::debug!("resize to {}x{}", size.width, size.height);
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }
}

struct Driver<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    canvas: Option<Canvas>,
    exiting: bool,
    /// First unrecoverable error, reported from `Runtime::run`.
    fatal: Option<anyhow::Error>,
}

impl<A: App + 'static> Driver<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            canvas: None,
            exiting: false,
            fatal: None,
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exiting = true;
        // Drop the surface before the window goes away.
        self.canvas = None;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.exit(event_loop);
    }

    fn frame(&mut self) -> AppControl {
        let app = &mut self.app;
        let Some(canvas) = self.canvas.as_mut() else {
            return AppControl::Continue;
        };

        canvas.with_mut(|c| {
            let time = c.clock.tick();
            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx { window: c.window },
                    gpu: c.gpu,
                    input: c.input,
                    input_frame: c.frame,
                    time,
                };
                app.on_frame(&mut ctx)
            };
            // Per-frame transitions are consumed exactly once.
            c.frame.clear();
            control
        })
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.canvas.is_some() || self.exiting {
            return;
        }

        match Canvas::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(canvas) => {
                log::info!("window open: {}", self.config.title);
                canvas.request_redraw();
                self.canvas = Some(canvas);
            }
            Err(err) => self.fail(event_loop, err.context("failed to open the canvas window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }

        // The camera and the open stroke change every frame.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(canvas) = self.canvas.as_ref() {
            canvas.request_redraw();
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(ev) = translate_device_event(&event) else {
            return;
        };
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        // Raw motion is not tied to a window; only a focused canvas takes it.
        canvas.with_mut(|c| {
            if c.input.focused {
                c.input.apply_event(c.frame, ev);
            }
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let app = &mut self.app;
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        if canvas.id() != window_id {
            return;
        }

        canvas.with_mut(|c| {
            if let Some(ev) = translate_window_event(c.input, &event) {
                c.input.apply_event(c.frame, ev);
            }
        });
        if app.on_window_event(&event) == AppControl::Exit {
            self.exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.exit(event_loop);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                canvas.resize_to_window();
                canvas.request_redraw();
            }
            // Avoid one huge dt after the window was hidden.
            WindowEvent::Occluded(false) => canvas.with_clock_mut(|clock| clock.reset()),
            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    self.exit(event_loop);
                }
            }
            _ => {}
        }
    }
}
