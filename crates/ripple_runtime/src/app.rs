//! Application handler
//!
//! The window and device come up in `resumed`. The session starts on the first
//! redraw after the boundary mask has finished loading; until then redraws
//! only poll the loader.

use anyhow::{anyhow, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ripple_asset::MaskLoader;
use ripple_core::{Session, TickStats, Viewport, WaveSettings};
use ripple_render::window::{window_attributes, WindowConfig};
use ripple_render::{GpuContext, GpuPasses};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

const REPORT_INTERVAL: Duration = Duration::from_secs(2);

type WaveSession = Session<GpuPasses, StdRng>;

enum State {
    Loading {
        loader: MaskLoader,
        gpu: Option<GpuContext>,
    },
    Running(Box<WaveSession>),
    Stopped,
}

pub struct App {
    settings: WaveSettings,
    window: Option<Arc<Window>>,
    state: State,
    cursor: Option<PhysicalPosition<f64>>,
    last_frame: Instant,
    last_report: Instant,
    reported: TickStats,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(settings: WaveSettings, loader: MaskLoader) -> Self {
        let now = Instant::now();
        Self {
            settings,
            window: None,
            state: State::Loading { loader, gpu: None },
            cursor: None,
            last_frame: now,
            last_report: now,
            reported: TickStats::default(),
            error: None,
        }
    }

    /// Setup or device error that ended the loop, if any.
    pub fn into_error(self) -> Option<anyhow::Error> {
        self.error
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        self.state = State::Stopped;
        event_loop.exit();
    }

    /// Poll the mask loader and start the session once it is done.
    fn try_start(&mut self) -> anyhow::Result<()> {
        let State::Loading { loader, gpu } = &mut self.state else {
            return Ok(());
        };
        if gpu.is_none() {
            return Ok(());
        }
        let Some(loaded) = loader.poll() else {
            return Ok(());
        };
        let (mask, source) = loaded.context("failed to load boundary mask")?;
        let gpu = gpu.take().ok_or_else(|| anyhow!("GPU context missing"))?;
        tracing::info!(?source, walls = mask.wall_count(), "boundary mask ready");

        let (width, height) = gpu.size();
        let viewport = Viewport::from_surface(width, height, self.settings.resolution);
        let passes = pollster::block_on(GpuPasses::new(gpu, &self.settings, viewport, &mask))
            .context("failed to build wave passes")?;

        let session = Session::start(passes, &self.settings, viewport, StdRng::from_entropy());
        self.state = State::Running(Box::new(session));

        let now = Instant::now();
        self.last_frame = now;
        self.last_report = now;
        self.reported = TickStats::default();
        Ok(())
    }

    fn frame(&mut self) -> anyhow::Result<()> {
        let State::Running(session) = &mut self.state else {
            return Ok(());
        };

        let now = Instant::now();
        let elapsed = now - self.last_frame;
        self.last_frame = now;
        session.tick(elapsed);

        if let Some(error) = session.passes_mut().take_fatal() {
            return Err(error).context("presentation failed");
        }

        if self.last_report.elapsed() >= REPORT_INTERVAL {
            let window = self.last_report.elapsed().as_secs_f64();
            self.last_report = Instant::now();

            let stats = session.stats();
            let delta = stats.since(&self.reported);
            self.reported = stats;
            tracing::info!(
                tick_rate = format_args!("{:.1}", delta.ticks as f64 / window),
                random_splashes = delta.random_splashes,
                user_splashes = delta.user_splashes,
                dropped = delta.dropped,
                simulated_secs = session.scheduler().clock().total_time().as_secs_f64(),
                "simulation"
            );
        }
        Ok(())
    }

    /// Time until the next tick is due, once the session is running.
    fn next_tick(&self) -> Option<Instant> {
        let State::Running(session) = &self.state else {
            return None;
        };
        let clock = session.scheduler().clock();
        let wait = clock.interval().saturating_sub(clock.leftover());
        Some(self.last_frame + wait)
    }

    fn resize(&mut self, width: u32, height: u32) {
        match &mut self.state {
            State::Loading { gpu: Some(gpu), .. } => gpu.resize(width, height),
            State::Running(session) => {
                if width == 0 || height == 0 {
                    return;
                }
                session.passes_mut().resize(width, height);
                session.redraw();
            }
            _ => {}
        }
    }

    fn press(&mut self) {
        let (State::Running(session), Some(cursor)) = (&mut self.state, self.cursor) else {
            return;
        };
        // the session keeps the startup viewport; rescale to its width
        let (width, _) = session.passes().gpu().size();
        let scale = f64::from(session.scheduler().viewport().width()) / f64::from(width.max(1));
        session.press(cursor.x * scale, cursor.y * scale);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = WindowConfig::from(self.settings.window.clone());
        let window = match event_loop.create_window(window_attributes(config)) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                self.fail(event_loop, anyhow!(error).context("failed to create window"));
                return;
            }
        };

        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(error) => {
                self.fail(event_loop, anyhow!(error).context("failed to initialize GPU"));
                return;
            }
        };

        if let State::Loading { gpu: slot, .. } = &mut self.state {
            *slot = Some(gpu);
        }
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.press(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let result = self.try_start().and_then(|()| self.frame());
                if let Err(error) = result {
                    self.fail(event_loop, error);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        match self.next_tick() {
            Some(deadline) if deadline > Instant::now() => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Poll);
                window.request_redraw();
            }
        }
    }
}
