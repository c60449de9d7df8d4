use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::config::EngineConfig;
use crate::core::App;
use crate::device::{GpuInit, GpuPresenter};
use crate::fatal;
use crate::runloop::{Command, LoopThread, RunLoop};
use crate::time::SystemClock;

/// How often the event thread wakes to check on the loop thread.
const WATCH_INTERVAL: Duration = Duration::from_millis(50);

/// Entry point for windowed applications.
pub struct Runtime;

impl Runtime {
    /// Opens the window, starts the run loop thread and services window
    /// events until the window closes or the app exits.
    ///
    /// Failures after the window opens (app errors, presenter errors, loop
    /// thread panics) are fatal: the window and GPU are torn down and the
    /// process exits through [`fatal::crash`].
    pub fn run<A: App>(config: EngineConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        config.validate().context("invalid engine configuration")?;

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = Host::new(config, gpu_init, app);

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        host.shutdown();
        if let Some(err) = host.failure.take() {
            let Host { window, .. } = host;
            fatal::crash(&err, move || drop(window));
        }
        log::info!("runtime finished");
        Ok(())
    }
}

fn window_attributes(config: &EngineConfig) -> WindowAttributes {
    let mut attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height));
    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    attrs
}

struct Host<A> {
    config: EngineConfig,
    gpu_init: GpuInit,
    app: Option<A>,
    window: Option<Arc<Window>>,
    running: Option<LoopThread>,
    failure: Option<anyhow::Error>,
}

impl<A: App> Host<A> {
    fn new(config: EngineConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app: Some(app),
            window: None,
            running: None,
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(window_attributes(&self.config))
            .context("failed to create window")?;
        let window = Arc::new(window);
        self.window = Some(Arc::clone(&window));

        let presenter = pollster::block_on(GpuPresenter::new(window, &self.gpu_init))?;
        let app = self.app.take().context("application already started")?;

        let run_loop = RunLoop::new(app, presenter, SystemClock, &self.config)
            .context("invalid run loop configuration")?;
        self.running = Some(run_loop.spawn()?);

        log::info!(
            "started {:?} at {}x{} (pixel size {}, {} Hz)",
            self.config.title,
            self.config.width,
            self.config.height,
            self.config.pixel_size,
            self.config.target_fps
        );
        Ok(())
    }

    fn post(&self, command: Command) {
        if let Some(thread) = &self.running {
            thread.handle().post(command);
        }
    }

    /// Stops and joins the loop thread, recording its failure if any.
    fn shutdown(&mut self) {
        let Some(thread) = self.running.take() else {
            return;
        };
        if let Err(err) = thread.stop() {
            self.fail(err);
        }
    }

    fn fail(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
    }
}

impl<A: App> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.fail(err);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.as_ref().is_some_and(LoopThread::is_finished) {
            self.shutdown();
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + WATCH_INTERVAL));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.post(Command::Resize(size.into())),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    self.post(Command::Resize(window.inner_size().into()));
                }
            }
            WindowEvent::Occluded(occluded) => self.post(Command::SetShowing(!occluded)),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
