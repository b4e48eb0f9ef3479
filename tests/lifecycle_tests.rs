// Host-side tests for the scene controller state machine.
// The main crate is wasm-only, so we include the pure-Rust modules directly
// and drive the controller through a recording host.

#![allow(dead_code)]
mod core {
    pub mod camera {
        include!("../src/core/camera.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod error {
        include!("../src/core/error.rs");
    }
    pub mod lifecycle {
        include!("../src/core/lifecycle.rs");
    }
    pub mod pointer {
        include!("../src/core/pointer.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
}

use crate::core::camera::Camera;
use crate::core::constants::*;
use crate::core::error::SceneError;
use crate::core::lifecycle::*;
use crate::core::pointer::Viewport;
use crate::core::scene::{SceneGraph, SceneParams};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Upload,
    Watch(f64),
    RequestFrame(FrameHandle),
    CancelFrame(FrameHandle),
    StartTimer(TimerHandle),
    ClearTimer(TimerHandle),
    Configure(Viewport),
    Draw,
    Fallback,
    Release,
}

struct FakeHost {
    probe_ok: bool,
    viewport: Viewport,
    upload_err: Option<SceneError>,
    draw_err: Option<SceneError>,
    timers_fail: bool,
    next_handle: i32,
    live_frames: BTreeSet<FrameHandle>,
    live_timers: BTreeSet<TimerHandle>,
    calls: Vec<Call>,
}

impl FakeHost {
    fn new() -> Self {
        Self {
            probe_ok: true,
            viewport: Viewport::new(800.0, 600.0, 1.0),
            upload_err: None,
            draw_err: None,
            timers_fail: false,
            next_handle: 0,
            live_frames: BTreeSet::new(),
            live_timers: BTreeSet::new(),
            calls: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn configures(&self) -> Vec<Viewport> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Configure(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

impl SceneHost for FakeHost {
    fn probe(&mut self) -> bool {
        self.probe_ok
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn upload(&mut self, _scene: &SceneGraph, _camera: &Camera) -> Result<(), SceneError> {
        self.calls.push(Call::Upload);
        match self.upload_err.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn watch(&mut self, visibility_threshold: f64) -> Result<(), SceneError> {
        self.calls.push(Call::Watch(visibility_threshold));
        Ok(())
    }

    fn request_frame(&mut self) -> Result<FrameHandle, SceneError> {
        self.next_handle += 1;
        self.live_frames.insert(self.next_handle);
        self.calls.push(Call::RequestFrame(self.next_handle));
        Ok(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.live_frames.remove(&handle);
        self.calls.push(Call::CancelFrame(handle));
    }

    fn start_timer(&mut self, _delay_ms: u32) -> Result<TimerHandle, SceneError> {
        if self.timers_fail {
            return Err(SceneError::frame("timers unavailable"));
        }
        self.next_handle += 1;
        self.live_timers.insert(self.next_handle);
        self.calls.push(Call::StartTimer(self.next_handle));
        Ok(self.next_handle)
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        self.live_timers.remove(&handle);
        self.calls.push(Call::ClearTimer(handle));
    }

    fn configure(&mut self, viewport: Viewport) {
        self.calls.push(Call::Configure(viewport));
    }

    fn draw(&mut self, _scene: &SceneGraph, _camera: &Camera) -> Result<(), SceneError> {
        self.calls.push(Call::Draw);
        match self.draw_err.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn apply_fallback(&mut self) {
        self.calls.push(Call::Fallback);
    }

    fn release(&mut self) {
        self.calls.push(Call::Release);
    }
}

type Controller = SceneController<FakeHost>;

fn controller_with(host: FakeHost) -> Controller {
    SceneController::new(host, SceneParams::default())
}

fn running() -> Controller {
    let mut c = controller_with(FakeHost::new());
    assert!(c.start());
    c.finish_build(Ok(()), &mut StdRng::seed_from_u64(7));
    assert_eq!(c.phase(), Phase::Running);
    c
}

/// Fire the single outstanding frame callback, as the browser would.
fn tick(c: &mut Controller) -> bool {
    let Some(handle) = c.host().live_frames.iter().next().copied() else {
        return false;
    };
    c.host_mut().live_frames.remove(&handle);
    c.handle(SceneEvent::Frame);
    true
}

fn fire_timer(c: &mut Controller) {
    let Some(handle) = c.host().live_timers.iter().next().copied() else {
        panic!("no pending timer");
    };
    c.host_mut().live_timers.remove(&handle);
    c.handle(SceneEvent::ResizeSettled);
}

#[test]
fn unsupported_platform_falls_back_without_scheduling() {
    let mut host = FakeHost::new();
    host.probe_ok = false;
    let mut c = controller_with(host);

    assert!(!c.start());
    assert!(!c.start());
    c.handle(SceneEvent::Visibility { intersecting: true });
    c.handle(SceneEvent::Resize(Viewport::new(1024.0, 768.0, 1.0)));
    c.handle(SceneEvent::ContextRestored);

    assert_eq!(c.phase(), Phase::Failed);
    let host = c.host();
    assert_eq!(host.count(|c| matches!(c, Call::RequestFrame(_))), 0);
    assert_eq!(host.count(|c| matches!(c, Call::Fallback)), 1);
    assert_eq!(host.count(|c| matches!(c, Call::StartTimer(_))), 0);
}

#[test]
fn successful_build_schedules_exactly_one_frame() {
    let c = running();
    assert!(c.is_running());
    assert_eq!(c.context(), ContextState::Active);
    assert_eq!(c.host().live_frames.len(), 1);
    assert!(c.pending_frame().is_some());
    assert_eq!(c.host().count(|c| matches!(c, Call::Upload)), 1);
    assert_eq!(
        c.host().count(|c| matches!(c, Call::Watch(t) if *t == VISIBILITY_THRESHOLD)),
        1
    );
    assert_eq!(
        c.scene().points.as_ref().map(|p| p.positions.len()),
        Some(PARTICLE_COUNT)
    );
    assert!(c.scene().torus.is_some());
    assert!(c.camera().is_some());
    // No frame has been drawn yet; the first one is only scheduled
    assert_eq!(c.host().count(|c| matches!(c, Call::Draw)), 0);
}

#[test]
fn surface_failure_releases_and_falls_back() {
    let mut c = controller_with(FakeHost::new());
    assert!(c.start());
    c.finish_build(
        Err(SceneError::construction("no adapter")),
        &mut StdRng::seed_from_u64(1),
    );

    assert_eq!(c.phase(), Phase::Failed);
    assert!(c.camera().is_none());
    assert!(c.scene().points.is_none());
    assert_eq!(c.host().count(|c| matches!(c, Call::Release)), 1);
    assert_eq!(c.host().count(|c| matches!(c, Call::Fallback)), 1);
    assert!(c.host().live_frames.is_empty());
}

#[test]
fn upload_failure_is_a_construction_failure() {
    let mut host = FakeHost::new();
    host.upload_err = Some(SceneError::construction("buffer allocation"));
    let mut c = controller_with(host);
    assert!(c.start());
    c.finish_build(Ok(()), &mut StdRng::seed_from_u64(1));

    assert_eq!(c.phase(), Phase::Failed);
    assert_eq!(c.context(), ContextState::Absent);
    assert_eq!(c.host().count(|c| matches!(c, Call::Watch(_))), 0);
    assert_eq!(c.host().count(|c| matches!(c, Call::Fallback)), 1);
}

#[test]
fn second_finish_build_is_ignored() {
    let mut c = running();
    c.finish_build(Ok(()), &mut StdRng::seed_from_u64(99));
    assert_eq!(c.host().count(|c| matches!(c, Call::Upload)), 1);
    assert_eq!(c.host().live_frames.len(), 1);
}

#[test]
fn each_frame_schedules_only_its_successor() {
    let mut c = running();
    for _ in 0..20 {
        assert!(tick(&mut c));
        assert_eq!(c.host().live_frames.len(), 1);
    }
    assert_eq!(c.frames_rendered(), 20);
    assert_eq!(c.host().count(|c| matches!(c, Call::Draw)), 20);
}

#[test]
fn visibility_toggles_never_stack_callbacks() {
    let mut c = running();
    let pattern = [
        false, true, true, false, false, true, false, true, true, true, false, true,
    ];
    for (i, &visible) in pattern.iter().enumerate() {
        c.handle(SceneEvent::Visibility {
            intersecting: visible,
        });
        assert!(c.host().live_frames.len() <= 1, "step {}", i);
        if i % 3 == 0 {
            tick(&mut c);
            assert!(c.host().live_frames.len() <= 1, "tick after step {}", i);
        }
        let expected = if visible {
            Phase::Running
        } else {
            Phase::Suspended
        };
        assert_eq!(c.phase(), expected, "step {}", i);
    }
}

#[test]
fn suspend_cancels_the_pending_frame() {
    let mut c = running();
    let pending = c.pending_frame().expect("frame scheduled");
    c.handle(SceneEvent::Visibility {
        intersecting: false,
    });

    assert_eq!(c.phase(), Phase::Suspended);
    assert!(c.pending_frame().is_none());
    assert!(c.host().live_frames.is_empty());
    assert!(c.host().calls.contains(&Call::CancelFrame(pending)));

    // A callback that was already in flight must not draw or reschedule
    c.handle(SceneEvent::Frame);
    assert_eq!(c.host().count(|c| matches!(c, Call::Draw)), 0);
    assert!(c.host().live_frames.is_empty());
}

#[test]
fn suspend_and_resume_keeps_camera_continuous() {
    let mut c = running();
    c.handle(SceneEvent::PointerMove {
        client_x: 600.0,
        client_y: 150.0,
    });
    for _ in 0..10 {
        tick(&mut c);
    }
    let before = c.camera().expect("camera").position;

    c.handle(SceneEvent::Visibility {
        intersecting: false,
    });
    assert_eq!(c.camera().expect("camera").position, before);
    c.handle(SceneEvent::Visibility { intersecting: true });
    assert_eq!(c.camera().expect("camera").position, before);

    tick(&mut c);
    let after = c.camera().expect("camera").position;
    let target = glam::Vec3::new(0.5, 0.5, before.z);
    let expected = before + (target - before) * CAMERA_EASE;
    assert!((after - expected).length() < 1e-6);
}

#[test]
fn camera_converges_geometrically_toward_pointer() {
    let mut c = running();
    // (600, 150) on 800x600 normalizes to (0.5, -0.5)
    c.handle(SceneEvent::PointerMove {
        client_x: 600.0,
        client_y: 150.0,
    });
    let target = glam::Vec2::new(0.5, 0.5);
    let start = c.camera().expect("camera").position.truncate();
    let initial = (start - target).length();

    let mut last = initial;
    for _ in 0..100 {
        tick(&mut c);
        let pos = c.camera().expect("camera").position.truncate();
        let dist = (pos - target).length();
        assert!(dist <= last);
        last = dist;
    }
    assert!(last < 0.05 * initial);
    assert_eq!(c.camera().expect("camera").position.z, CAMERA_Z);
}

#[test]
fn resize_burst_configures_once_with_final_size() {
    let mut c = running();
    for i in 0..10 {
        let w = 900.0 + i as f64 * 10.0;
        c.handle(SceneEvent::Resize(Viewport::new(w, 500.0, 2.0)));
        assert_eq!(c.host().live_timers.len(), 1);
    }
    assert_eq!(c.host().count(|c| matches!(c, Call::ClearTimer(_))), 9);
    assert!(c.host().configures().is_empty());

    fire_timer(&mut c);
    let final_size = Viewport::new(990.0, 500.0, 2.0);
    assert_eq!(c.host().configures(), vec![final_size]);
    assert!(c.pending_resize().is_none());
    let aspect = c.camera().expect("camera").aspect;
    assert!((aspect - 990.0 / 500.0).abs() < 1e-6);
}

#[test]
fn resize_without_timers_settles_immediately() {
    let mut host = FakeHost::new();
    host.timers_fail = true;
    let mut c = controller_with(host);
    assert!(c.start());
    c.finish_build(Ok(()), &mut StdRng::seed_from_u64(3));

    let vp = Viewport::new(640.0, 480.0, 1.0);
    c.handle(SceneEvent::Resize(vp));
    assert_eq!(c.host().configures(), vec![vp]);
}

#[test]
fn resize_settled_during_build_reaches_the_surface() {
    let mut c = controller_with(FakeHost::new());
    assert!(c.start());
    assert_eq!(c.build_viewport(), Some(Viewport::new(800.0, 600.0, 1.0)));
    let vp = Viewport::new(1280.0, 720.0, 1.0);
    c.handle(SceneEvent::Resize(vp));
    fire_timer(&mut c);
    // No surface yet
    assert!(c.host().configures().is_empty());

    c.finish_build(Ok(()), &mut StdRng::seed_from_u64(3));
    for _ in 0..5 {
        tick(&mut c);
    }
    assert_eq!(c.host().configures(), vec![vp]);
    assert!(c.build_viewport().is_none());
    let aspect = c.camera().expect("camera").aspect;
    assert!((aspect - 1280.0 / 720.0).abs() < 1e-6);
}

#[test]
fn unchanged_viewport_during_build_skips_configure() {
    let mut c = running();
    for _ in 0..3 {
        tick(&mut c);
    }
    assert!(c.host().configures().is_empty());
}

#[test]
fn context_loss_then_restore_resumes_within_one_tick() {
    let mut c = running();
    tick(&mut c);

    c.handle(SceneEvent::ContextLost);
    assert_eq!(c.phase(), Phase::Suspended);
    assert_eq!(c.context(), ContextState::Lost);
    assert!(c.host().live_frames.is_empty());

    c.handle(SceneEvent::ContextRestored);
    assert_eq!(c.phase(), Phase::Running);
    assert_eq!(c.context(), ContextState::Active);
    assert_eq!(c.host().live_frames.len(), 1);

    let drawn = c.frames_rendered();
    assert!(tick(&mut c));
    assert_eq!(c.frames_rendered(), drawn + 1);
}

#[test]
fn visibility_does_not_resume_a_lost_context() {
    let mut c = running();
    c.handle(SceneEvent::ContextLost);
    c.handle(SceneEvent::Visibility {
        intersecting: false,
    });
    c.handle(SceneEvent::Visibility { intersecting: true });
    assert_eq!(c.phase(), Phase::Suspended);
    assert!(c.host().live_frames.is_empty());
}

#[test]
fn restore_while_offscreen_resumes_until_next_report() {
    let mut c = running();
    c.handle(SceneEvent::Visibility {
        intersecting: false,
    });
    c.handle(SceneEvent::ContextLost);
    c.handle(SceneEvent::ContextRestored);
    assert_eq!(c.phase(), Phase::Running);
    assert_eq!(c.context(), ContextState::Active);
    assert_eq!(c.host().live_frames.len(), 1);

    c.handle(SceneEvent::Visibility {
        intersecting: false,
    });
    assert_eq!(c.phase(), Phase::Suspended);
    assert!(c.host().live_frames.is_empty());
}

#[test]
fn restore_without_loss_is_ignored() {
    let mut c = running();
    c.handle(SceneEvent::ContextRestored);
    assert_eq!(c.phase(), Phase::Running);
    assert_eq!(c.host().live_frames.len(), 1);
}

#[test]
fn resize_during_loss_is_applied_on_resume() {
    let mut c = running();
    c.handle(SceneEvent::ContextLost);
    let vp = Viewport::new(1024.0, 768.0, 3.0);
    c.handle(SceneEvent::Resize(vp));
    fire_timer(&mut c);
    assert!(c.host().configures().is_empty());

    c.handle(SceneEvent::ContextRestored);
    assert_eq!(c.host().configures(), vec![vp]);
    assert_eq!(c.phase(), Phase::Running);
}

#[test]
fn device_loss_while_drawing_is_permanent() {
    let mut c = running();
    tick(&mut c);
    c.host_mut().draw_err = Some(SceneError::DeviceLost("driver reset".into()));
    tick(&mut c);

    assert_eq!(c.phase(), Phase::Failed);
    assert!(c.host().live_frames.is_empty());
    assert_eq!(c.host().count(|c| matches!(c, Call::Release)), 1);
    assert_eq!(c.host().count(|c| matches!(c, Call::Fallback)), 1);

    // Nothing brings it back
    c.handle(SceneEvent::ContextRestored);
    c.handle(SceneEvent::Visibility { intersecting: true });
    c.handle(SceneEvent::Frame);
    assert_eq!(c.phase(), Phase::Failed);
    assert!(c.host().live_frames.is_empty());
}

#[test]
fn device_lost_event_clears_pending_resize() {
    let mut c = running();
    c.handle(SceneEvent::Resize(Viewport::new(500.0, 500.0, 1.0)));
    assert!(c.pending_resize().is_some());
    c.handle(SceneEvent::DeviceLost("gone".into()));

    assert_eq!(c.phase(), Phase::Failed);
    assert!(c.pending_resize().is_none());
    assert!(c.host().live_timers.is_empty());
}

#[test]
fn transient_draw_error_keeps_the_loop_alive() {
    let mut c = running();
    c.host_mut().draw_err = Some(SceneError::frame("surface timeout"));
    tick(&mut c);
    tick(&mut c);

    assert_eq!(c.phase(), Phase::Running);
    assert_eq!(c.frames_rendered(), 0);
    assert_eq!(c.host().live_frames.len(), 1);
}

#[test]
fn frames_skip_missing_entities() {
    let mut c = running();
    c.scene_mut().points = None;
    for _ in 0..5 {
        tick(&mut c);
    }
    assert_eq!(c.frames_rendered(), 5);
    let torus = c.scene().torus.as_ref().expect("torus");
    assert!((torus.rotation.x - 5.0 * TORUS_SPIN.x).abs() < 1e-6);
}

#[test]
fn pointer_uses_latest_viewport() {
    let mut c = running();
    c.handle(SceneEvent::Resize(Viewport::new(400.0, 200.0, 1.0)));
    c.handle(SceneEvent::PointerMove {
        client_x: 300.0,
        client_y: 50.0,
    });
    let p = c.pointer();
    assert!((p.x - 0.5).abs() < 1e-6);
    assert!((p.y + 0.5).abs() < 1e-6);
}

#[test]
fn end_to_end_fifty_frames() {
    let mut c = controller_with(FakeHost::new());
    assert!(c.start());
    c.finish_build(Ok(()), &mut StdRng::seed_from_u64(42));
    c.handle(SceneEvent::Visibility { intersecting: true });
    c.handle(SceneEvent::PointerMove {
        client_x: 600.0,
        client_y: 150.0,
    });
    let p = c.pointer();
    assert!((p.x - 0.5).abs() < 1e-6 && (p.y + 0.5).abs() < 1e-6);

    for _ in 0..50 {
        assert!(tick(&mut c));
    }

    let torus = c.scene().torus.as_ref().expect("torus");
    let tau = std::f32::consts::TAU;
    assert!((torus.rotation.x.rem_euclid(tau) - 0.3).abs() < 1e-4);
    let points = c.scene().points.as_ref().expect("points");
    assert!((points.rotation.y - 50.0 * 0.0006).abs() < 1e-5);

    let cam = c.camera().expect("camera").position;
    assert!(cam.x > 0.0 && cam.x < 0.5);
    assert!(cam.y > 0.0 && cam.y < 0.5);
    assert_eq!(c.frames_rendered(), 50);
}
