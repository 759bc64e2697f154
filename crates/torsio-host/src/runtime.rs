use anyhow::{Context, Result};
use ouroboros::self_referencing;
use torsio_sync::coords::{Bounds, SurfaceSize};
use torsio_sync::pose::{Pose, poll_pose};
use torsio_sync::touch::{TouchEvent, TouchPhase};
use torsio_sync::{FrameCoordinator, FrameReport, ParameterStore, SensorSampler};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::HostConfig;
use crate::device::{Gpu, SurfaceErrorAction, pixel_format_of};
use crate::engine::DiagnosticEngine;
use crate::input::{
    DragTouches, HeldKeys, KeyAction, PointerFeed, map_key, map_touch_phase, to_logical,
    window_bounds,
};
use crate::tracker::OrbitTracker;

/// Background behind the engine's drawing (stands in for the camera image).
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.07,
    a: 1.0,
};

/// Entry point for the host event loop.
pub struct Runtime;

impl Runtime {
    /// Runs until the window closes. Returns the error that stopped the
    /// loop, if any.
    pub fn run(config: HostConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Window, GPU and coordinator; exists once the surface format is known.
struct Session {
    entry: WindowEntry,
    coordinator: FrameCoordinator<DiagnosticEngine>,
}

struct HostState {
    config: HostConfig,

    params: ParameterStore,
    pointer: PointerFeed,
    sampler: SensorSampler,
    tracker: OrbitTracker,

    keys: HeldKeys,
    drag: DragTouches,

    session: Option<Session>,
    /// Latest size not yet handed to the coordinator.
    pending_resize: Option<SurfaceSize>,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl HostState {
    fn new(config: HostConfig) -> Self {
        let params = ParameterStore::new(config.strength);
        log::info!("torsional spring strength: {:.2}", params.get());

        let pointer = PointerFeed::new();
        let sampler =
            SensorSampler::start(pointer.accelerometer(config.sensor_enabled), config.sampler);

        let size = config.initial_size;
        let tracker = OrbitTracker::new((size.width / size.height) as f32);

        Self {
            config,
            params,
            pointer,
            sampler,
            tracker,
            keys: HeldKeys::default(),
            drag: DragTouches::default(),
            session: None,
            pending_resize: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.request_exit(event_loop);
    }

    fn create_session(&mut self, event_loop: &ActiveEventLoop) -> Result<Session> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.config.gpu.clone();
        let entry = WindowEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))
            .context("GPU initialization failed")?;

        let gpu = entry.borrow_gpu();
        let engine = DiagnosticEngine::new(gpu.device().clone(), gpu.queue().clone());
        let format = pixel_format_of(gpu.surface_format());

        let mut coordinator = FrameCoordinator::new(
            engine,
            self.params.clone(),
            self.sampler.reader(),
            self.config.coordinator,
        );
        coordinator
            .create_pipeline_states(format)
            .context("engine could not build its pipelines")?;

        self.surface_changed(window_bounds(entry.borrow_window()));
        entry.borrow_window().request_redraw();

        Ok(Session { entry, coordinator })
    }

    /// Queues the new size for the next refresh and keeps the tracker's
    /// projection in step.
    fn surface_changed(&mut self, bounds: Bounds) {
        let size = SurfaceSize::new(bounds.size.x, bounds.size.y);
        if let Some(aspect) = size.aspect() {
            self.tracker.set_aspect(aspect as f32);
        }
        self.pending_resize = Some(size);
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: PhysicalKey, state: ElementState) {
        if !self.keys.apply(key, state) {
            return;
        }
        match map_key(key) {
            Some(KeyAction::Exit) => self.request_exit(event_loop),
            Some(KeyAction::ToggleTracking) => {
                self.tracker.toggle_tracking();
            }
            // Applied once per refresh while held.
            Some(KeyAction::Raise | KeyAction::Lower) | None => {}
        }
    }

    fn apply_held_keys(&self) {
        let delta = self.keys.strength_delta(self.config.strength_step);
        if delta == 0.0 {
            return;
        }
        let before = self.params.get();
        let after = self.params.nudge(delta);
        if after != before {
            log::info!("torsional spring strength: {after:.2}");
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_none() {
            return;
        }
        self.apply_held_keys();

        let resize = self.pending_resize.take();
        let pose = poll_pose(&mut self.tracker);

        let Some(session) = self.session.as_mut() else {
            return;
        };

        match render_frame(session, resize, pose) {
            Ok(report) => log::trace!("{report:?}"),
            Err(e) => self.fail(event_loop, e.context("frame failed")),
        }
    }
}

/// One refresh: acquire, run the coordinator inside a render pass, submit.
///
/// When no surface frame is available the coordinator still runs without an
/// encoder so the world keeps advancing.
fn render_frame(
    session: &mut Session,
    resize: Option<SurfaceSize>,
    pose: Option<Pose>,
) -> Result<FrameReport> {
    let Session { entry, coordinator } = session;

    entry.with_mut(|fields| {
        let gpu = fields.gpu;

        let frame = match gpu.begin_frame() {
            Ok(frame) => Some(frame),
            Err(err) => {
                let reason = err.to_string();
                match gpu.recover(err) {
                    SurfaceErrorAction::Fatal => {
                        anyhow::bail!("surface error is not recoverable: {reason}")
                    }
                    action => {
                        log::debug!("no surface frame ({reason}); {action:?}");
                        None
                    }
                }
            }
        };

        let Some(mut frame) = frame else {
            return Ok(coordinator.run_frame(resize, pose, None)?);
        };

        // The pass is ended (dropped) before submit on every path.
        let report = {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("torsio frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            coordinator.run_frame(resize, pose, Some(&mut pass))
        };
        let report = report?;

        fields.window.pre_present_notify();
        gpu.submit(frame);
        Ok(report)
    })
}

fn deliver_touch(coordinator: &FrameCoordinator<DiagnosticEngine>, touch: TouchEvent) {
    match touch.phase {
        TouchPhase::Began => coordinator.touches_began(touch.location, touch.bounds),
        TouchPhase::Moved => coordinator.touches_moved(touch.location, touch.bounds),
        TouchPhase::Ended => coordinator.touches_ended(touch.location, touch.bounds),
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        match self.create_session(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: the engine advances once per refresh.
        if let Some(session) = &self.session {
            session.entry.borrow_window().request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let window = session.entry.borrow_window();
        let bounds = window_bounds(window);

        match event {
            WindowEvent::CloseRequested => self.request_exit(event_loop),

            WindowEvent::Resized(new_size) => {
                session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                session.entry.borrow_window().request_redraw();
                self.surface_changed(bounds);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = window.inner_size();
                session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                self.surface_changed(bounds);
            }

            WindowEvent::Focused(false) => self.keys.clear(),

            WindowEvent::KeyboardInput { event, .. } => {
                self.on_key(event_loop, event.physical_key, event.state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let position = to_logical(window, position);
                self.pointer.moved(position, bounds);
                if let Some(touch) = self.drag.cursor_moved(position, bounds) {
                    deliver_touch(&session.coordinator, touch);
                }
            }

            WindowEvent::CursorLeft { .. } => self.drag.cursor_left(),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(touch) = self.drag.left_button(state, bounds) {
                    deliver_touch(&session.coordinator, touch);
                }
            }

            WindowEvent::Touch(touch) => {
                let location = to_logical(window, touch.location);
                let touch = TouchEvent::new(map_touch_phase(touch.phase), location, bounds);
                deliver_touch(&session.coordinator, touch);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Surface before window; the sensor thread last.
        self.session = None;
        self.sampler.stop();
        log::info!("host stopped");
    }
}
