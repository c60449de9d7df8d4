use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use crossbeam_channel::{Receiver, Sender};

use crate::canvas::{BufferStrategy, Canvas};
use crate::config::EngineConfig;
use crate::core::{App, AppControl, EngineCtx};
use crate::error::{ConfigError, LoopError};
use crate::fatal;
use crate::time::{Clock, FrameClock};

use super::handle::Shared;
use super::{Command, LoopHandle, LoopStats};

const STATS_WINDOW: Duration = Duration::from_secs(1);

/// Fixed-step update loop with one render per pass.
///
/// Each pass:
/// 1. applies posted commands
/// 2. runs one `App::update` per step owed by the frame clock
/// 3. applies configuration requested during update
/// 4. prepares the canvas and, if a batch is available, renders and presents
/// 5. sleeps one step period unless running unlimited
pub struct RunLoop<A, S, C> {
    app: A,
    canvas: Canvas<S>,
    clock: C,
    frame_clock: FrameClock,
    ctx: EngineCtx,
    unlimited: bool,
    initialized: bool,

    shared: Arc<Shared>,
    sender: Sender<Command>,
    commands: Receiver<Command>,

    frames: u32,
    updates: u32,
    marker: Instant,
}

impl<A, S, C> RunLoop<A, S, C>
where
    A: App,
    S: BufferStrategy + 'static,
    C: Clock,
{
    /// Validates `config` and applies its pixel size against the strategy's
    /// current size.
    pub fn new(app: A, strategy: S, clock: C, config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let frame_clock = FrameClock::new(config.target_fps)?;

        let mut canvas = Canvas::new(strategy);
        canvas.set_pixel_size(config.pixel_size)?;

        let ctx = EngineCtx::new(canvas.strategy().parent_size());
        let (sender, commands) = crossbeam_channel::unbounded();
        let marker = clock.now();

        Ok(Self {
            app,
            canvas,
            clock,
            frame_clock,
            ctx,
            unlimited: config.unlimited_fps,
            initialized: false,
            shared: Arc::new(Shared::default()),
            sender,
            commands,
            frames: 0,
            updates: 0,
            marker,
        })
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle::new(Arc::clone(&self.shared), self.sender.clone())
    }

    #[inline]
    pub fn app(&self) -> &A {
        &self.app
    }

    #[inline]
    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    #[inline]
    pub fn ctx(&self) -> &EngineCtx {
        &self.ctx
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Runs passes until a stop is requested or the app exits.
    ///
    /// Calls `App::init` before the first run. Errors from the app or the
    /// presenter end the loop and are returned.
    pub fn run(&mut self) -> anyhow::Result<()> {
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return Err(LoopError::AlreadyRunning.into());
        }
        let _running = RunningGuard(Arc::clone(&self.shared));

        self.begin()?;
        log::info!("run loop started ({} Hz, unlimited: {})", self.frame_clock.rate(), self.unlimited);

        while !self.shared.stop.load(Ordering::Acquire) {
            if !self.pass()? {
                break;
            }
        }

        log::info!("run loop stopped");
        Ok(())
    }

    /// Moves the loop onto a dedicated thread.
    pub fn spawn(mut self) -> anyhow::Result<LoopThread> {
        let handle = self.handle();
        let thread = thread::Builder::new()
            .name("kiln-loop".to_string())
            .spawn(move || self.run())
            .context("failed to spawn run loop thread")?;
        Ok(LoopThread { handle, thread })
    }

    fn begin(&mut self) -> anyhow::Result<()> {
        self.sync_ctx();
        if !self.initialized {
            self.app.init(&mut self.ctx).context("application init failed")?;
            self.initialized = true;
            self.apply_pending();
        }

        let now = self.clock.now();
        self.frame_clock.start(now);
        self.marker = now;
        self.frames = 0;
        self.updates = 0;
        Ok(())
    }

    /// One update/render pass. Returns `false` when the app asked to exit.
    fn pass(&mut self) -> anyhow::Result<bool> {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
        self.sync_ctx();

        let steps = self.frame_clock.tick(self.clock.now());
        for delta in steps {
            self.updates += 1;
            let control = self.app.update(&mut self.ctx, delta).context("application update failed")?;
            if control == AppControl::Exit {
                log::info!("application requested exit");
                return Ok(false);
            }
        }
        self.apply_pending();

        if self.canvas.prepare() {
            self.sync_ctx();
        }
        let rendered = match self.canvas.batch(&mut self.ctx.assets) {
            Some(mut batch) => {
                self.app.render(&mut batch).context("application render failed")?;
                true
            }
            None => false,
        };
        if rendered {
            self.frames += 1;
            self.canvas.present().context("failed to present frame")?;
        }

        if !self.unlimited {
            self.clock.sleep(self.frame_clock.sleep_period());
        }
        self.roll_stats();
        Ok(true)
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetPixelSize(pixel_size) => {
                if let Err(err) = self.canvas.set_pixel_size(pixel_size) {
                    log::warn!("ignoring pixel size change: {err}");
                }
            }
            Command::SetHint(key, value) => {
                if let Err(err) = self.canvas.set_hint(key, value) {
                    log::warn!("ignoring hint: {err}");
                }
            }
            Command::Resize(size) => self.canvas.resize(size),
            Command::Invalidate => self.canvas.invalidate(),
            Command::SetShowing(showing) => self.canvas.set_showing(showing),
        }
    }

    fn apply_pending(&mut self) {
        for command in self.ctx.take_pending() {
            self.apply(command);
        }
    }

    fn sync_ctx(&mut self) {
        let parent = self.canvas.strategy().parent_size();
        self.ctx.sync(parent, self.canvas.pixel_size(), self.shared.stats());
    }

    fn roll_stats(&mut self) {
        let now = self.clock.now();
        if now.saturating_duration_since(self.marker) < STATS_WINDOW {
            return;
        }

        let stats = LoopStats { fps: self.frames, ups: self.updates };
        self.shared.publish(stats);
        log::trace!("{stats}");
        self.frames = 0;
        self.updates = 0;

        self.marker += STATS_WINDOW;
        if now.saturating_duration_since(self.marker) >= STATS_WINDOW {
            self.marker = now;
        }
    }
}

/// Clears the running flag, and any pending stop, when `run` returns.
struct RunningGuard(Arc<Shared>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.stop.store(false, Ordering::Release);
        self.0.running.store(false, Ordering::Release);
    }
}

/// A run loop on its own thread.
pub struct LoopThread {
    handle: LoopHandle,
    thread: JoinHandle<anyhow::Result<()>>,
}

impl LoopThread {
    #[inline]
    pub fn handle(&self) -> &LoopHandle {
        &self.handle
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the thread. A panic on the loop thread becomes an error.
    pub fn join(self) -> anyhow::Result<()> {
        match self.thread.join() {
            Ok(result) => result,
            Err(payload) => Err(fatal::panic_error(payload)),
        }
    }

    /// Requests a stop and waits for the thread.
    pub fn stop(self) -> anyhow::Result<()> {
        self.handle.stop();
        self.join()
    }
}
