use super::camera::Camera;
use super::error::SceneError;
use super::pointer::{PointerTarget, Viewport};
use super::scene::{SceneGraph, SceneParams};
use rand::Rng;

pub type FrameHandle = i32;
pub type TimerHandle = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Building,
    Running,
    Suspended,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Absent,
    Active,
    Lost,
}

/// Inbound messages; every host callback is translated into one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Frame,
    Visibility { intersecting: bool },
    ContextLost,
    ContextRestored,
    DeviceLost(String),
    Resize(Viewport),
    ResizeSettled,
    PointerMove { client_x: f64, client_y: f64 },
}

/// Everything the controller needs from the platform.
///
/// Implementations schedule callbacks that later come back as [`SceneEvent`]s;
/// none of these methods may call back into the controller synchronously.
pub trait SceneHost {
    /// Whether a hardware-accelerated context can be created. Must not panic.
    fn probe(&mut self) -> bool;
    fn viewport(&self) -> Viewport;
    /// Create GPU-side buffers for a freshly built scene.
    fn upload(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), SceneError>;
    /// Register the visibility watcher and context-loss listeners.
    fn watch(&mut self, visibility_threshold: f64) -> Result<(), SceneError>;
    fn request_frame(&mut self) -> Result<FrameHandle, SceneError>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn start_timer(&mut self, delay_ms: u32) -> Result<TimerHandle, SceneError>;
    fn clear_timer(&mut self, handle: TimerHandle);
    /// Resize the drawing surface; the pixel ratio cap is applied by [`Viewport`].
    fn configure(&mut self, viewport: Viewport);
    fn draw(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), SceneError>;
    fn apply_fallback(&mut self);
    /// Explicitly destroy GPU resources and stop observing. Must be idempotent.
    fn release(&mut self);
}

/// Owns the background scene and drives it through
/// `Uninitialized → Building → Running ⇄ Suspended`, or into `Failed`.
///
/// The loop keeps at most one frame callback pending: each frame schedules only
/// its successor, and suspension cancels that one handle.
pub struct SceneController<H: SceneHost> {
    host: H,
    params: SceneParams,
    phase: Phase,
    context: ContextState,
    running: bool,
    scene: SceneGraph,
    camera: Option<Camera>,
    pointer: PointerTarget,
    viewport: Viewport,
    pending_frame: Option<FrameHandle>,
    pending_resize: Option<TimerHandle>,
    stale_surface: Option<Viewport>,
    /// Viewport the platform surface is being built at.
    build_viewport: Option<Viewport>,
    fallback_applied: bool,
    frames_rendered: u64,
}

impl<H: SceneHost> SceneController<H> {
    pub fn new(host: H, params: SceneParams) -> Self {
        let viewport = host.viewport();
        Self {
            host,
            params,
            phase: Phase::Uninitialized,
            context: ContextState::Absent,
            running: false,
            scene: SceneGraph::default(),
            camera: None,
            pointer: PointerTarget::default(),
            viewport,
            pending_frame: None,
            pending_resize: None,
            stale_surface: None,
            build_viewport: None,
            fallback_applied: false,
            frames_rendered: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn context(&self) -> ContextState {
        self.context
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn pending_resize(&self) -> Option<TimerHandle> {
        self.pending_resize
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn pointer(&self) -> PointerTarget {
        self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Size the platform surface should be created at while `Building`.
    pub fn build_viewport(&self) -> Option<Viewport> {
        self.build_viewport
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Run the capability probe. Returns true if scene construction should follow.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Uninitialized {
            return self.phase == Phase::Building;
        }
        if !self.host.probe() {
            log::warn!(
                "[scene] {}, using static background",
                SceneError::CapabilityUnavailable
            );
            self.phase = Phase::Failed;
            self.show_fallback();
            return false;
        }
        self.phase = Phase::Building;
        self.build_viewport = Some(self.viewport);
        log::info!("[scene] building");
        true
    }

    /// Complete construction once the platform surface is ready (or failed).
    pub fn finish_build<R: Rng + ?Sized>(
        &mut self,
        surface: Result<(), SceneError>,
        rng: &mut R,
    ) {
        if self.phase != Phase::Building {
            log::warn!("[scene] build finished in phase {:?}, ignoring", self.phase);
            return;
        }
        match self.assemble(surface, rng) {
            Ok(()) => {
                self.phase = Phase::Running;
                self.running = true;
                log::info!(
                    "[scene] running: {} points, {} torus lines",
                    self.scene.points.as_ref().map_or(0, |p| p.positions.len()),
                    self.scene
                        .torus
                        .as_ref()
                        .map_or(0, |t| t.geometry.line_indices.len() / 2)
                );
                self.schedule_frame();
            }
            Err(e) => {
                log::error!("[scene] {}", e);
                self.fail();
            }
        }
    }

    fn assemble<R: Rng + ?Sized>(
        &mut self,
        surface: Result<(), SceneError>,
        rng: &mut R,
    ) -> Result<(), SceneError> {
        surface?;
        self.context = ContextState::Active;
        // A resize that settled mid-build found no surface to resize
        if self.build_viewport.take() != Some(self.viewport) {
            self.host.configure(self.viewport);
        }
        let scene = SceneGraph::build(&self.params, rng);
        let camera = Camera::new(self.viewport.aspect());
        self.host.upload(&scene, &camera)?;
        self.host.watch(self.params.visibility_threshold)?;
        self.scene = scene;
        self.camera = Some(camera);
        Ok(())
    }

    pub fn handle(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::Frame => self.on_frame(),
            SceneEvent::Visibility { intersecting } => self.on_visibility(intersecting),
            SceneEvent::ContextLost => self.on_context_lost(),
            SceneEvent::ContextRestored => self.on_context_restored(),
            SceneEvent::DeviceLost(reason) => self.on_device_lost(&reason),
            SceneEvent::Resize(viewport) => self.on_resize(viewport),
            SceneEvent::ResizeSettled => self.on_resize_settled(),
            SceneEvent::PointerMove { client_x, client_y } => {
                self.on_pointer_move(client_x, client_y)
            }
        }
    }

    /// One scheduled frame: reschedule, spin, ease the camera, draw.
    pub fn on_frame(&mut self) {
        self.pending_frame = None;
        if !self.running {
            return;
        }
        self.schedule_frame();

        self.scene.spin_points(self.params.particle_spin);
        self.scene.spin_torus(self.params.torus_spin);
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        camera.ease_toward_pointer(self.pointer, self.params.camera_ease);
        let camera = *camera;

        match self.host.draw(&self.scene, &camera) {
            Ok(()) => self.frames_rendered += 1,
            Err(e) if e.is_permanent() => {
                log::error!("[scene] {}", e);
                self.fail();
            }
            Err(e) => log::error!("[scene] {}", e),
        }
    }

    pub fn on_visibility(&mut self, intersecting: bool) {
        match (intersecting, self.phase) {
            (true, Phase::Suspended) => self.resume("visible"),
            (false, Phase::Running) => self.suspend("offscreen"),
            _ => {}
        }
    }

    pub fn on_context_lost(&mut self) {
        if !matches!(self.phase, Phase::Running | Phase::Suspended) {
            return;
        }
        log::warn!("[scene] {}", SceneError::ContextLost);
        self.context = ContextState::Lost;
        self.suspend("context lost");
    }

    /// GPU buffers are not rebuilt here; they are assumed to survive a short loss.
    /// Resumes even when offscreen; the next non-intersecting report suspends again.
    pub fn on_context_restored(&mut self) {
        if self.context != ContextState::Lost {
            return;
        }
        log::info!("[scene] rendering context restored");
        self.context = ContextState::Active;
        self.resume("context restored");
    }

    /// Permanent loss: nothing can be drawn again without a page reload.
    pub fn on_device_lost(&mut self, reason: &str) {
        if matches!(self.phase, Phase::Uninitialized | Phase::Failed) {
            return;
        }
        log::error!("[scene] {}", SceneError::DeviceLost(reason.to_string()));
        self.fail();
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.phase == Phase::Failed {
            return;
        }
        if let Some(timer) = self.pending_resize.take() {
            self.host.clear_timer(timer);
        }
        match self.host.start_timer(self.params.resize_debounce_ms) {
            Ok(timer) => self.pending_resize = Some(timer),
            Err(e) => {
                log::warn!("[scene] resize debounce unavailable: {}", e);
                self.on_resize_settled();
            }
        }
    }

    pub fn on_resize_settled(&mut self) {
        self.pending_resize = None;
        if self.context == ContextState::Absent {
            return;
        }
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        camera.set_aspect(self.viewport.aspect());
        if self.context == ContextState::Active {
            self.host.configure(self.viewport);
        } else {
            self.stale_surface = Some(self.viewport);
        }
    }

    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64) {
        self.pointer = PointerTarget::from_client(client_x, client_y, &self.viewport);
    }

    fn schedule_frame(&mut self) {
        if self.pending_frame.is_some() {
            return;
        }
        match self.host.request_frame() {
            Ok(handle) => self.pending_frame = Some(handle),
            Err(e) => log::error!("[scene] {}", e),
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }
    }

    fn suspend(&mut self, reason: &str) {
        self.running = false;
        self.cancel_frame();
        if self.phase == Phase::Running {
            self.phase = Phase::Suspended;
            log::info!("[scene] suspended ({})", reason);
        }
    }

    fn resume(&mut self, reason: &str) {
        if self.phase != Phase::Suspended || self.context != ContextState::Active {
            return;
        }
        if let Some(viewport) = self.stale_surface.take() {
            self.host.configure(viewport);
        }
        self.phase = Phase::Running;
        self.running = true;
        log::info!("[scene] resumed ({})", reason);
        self.schedule_frame();
    }

    fn fail(&mut self) {
        self.running = false;
        self.cancel_frame();
        if let Some(timer) = self.pending_resize.take() {
            self.host.clear_timer(timer);
        }
        self.host.release();
        self.scene = SceneGraph::default();
        self.camera = None;
        self.context = ContextState::Absent;
        self.phase = Phase::Failed;
        self.show_fallback();
    }

    fn show_fallback(&mut self) {
        if !self.fallback_applied {
            self.host.apply_fallback();
            self.fallback_applied = true;
        }
    }
}
