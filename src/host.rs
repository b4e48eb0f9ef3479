use crate::constants::{
    CONTEXT_LOST_EVENT, CONTEXT_RESTORED_EVENT, FALLBACK_BACKGROUND,
};
use crate::core::{
    Camera, FrameHandle, SceneController, SceneError, SceneEvent, SceneGraph, SceneHost,
    TimerHandle, Viewport,
};
use crate::dom;
use crate::probe;
use crate::render::GpuState;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedController = Rc<RefCell<SceneController<WebHost>>>;
type WeakController = Weak<RefCell<SceneController<WebHost>>>;

/// Deliver an event to the controller unless it is gone or already borrowed.
pub fn dispatch(controller: &WeakController, event: SceneEvent) {
    let Some(controller) = controller.upgrade() else {
        return;
    };
    let Ok(mut c) = controller.try_borrow_mut() else {
        log::warn!("[scene] dropped re-entrant {:?}", event);
        return;
    };
    c.handle(event);
}

struct HostCallbacks {
    frame: Closure<dyn FnMut()>,
    resize_settled: Closure<dyn FnMut()>,
    visibility: Closure<dyn FnMut(js_sys::Array)>,
    context_lost: Closure<dyn FnMut(web::Event)>,
    context_restored: Closure<dyn FnMut(web::Event)>,
}

/// Browser implementation of [`SceneHost`]: requestAnimationFrame, setTimeout,
/// IntersectionObserver and a wgpu surface on `#three-canvas`.
pub struct WebHost {
    window: web::Window,
    document: web::Document,
    canvas: web::HtmlCanvasElement,
    gpu: Option<GpuState>,
    callbacks: Option<HostCallbacks>,
    observer: Option<web::IntersectionObserver>,
    watching_context: bool,
}

impl WebHost {
    pub fn new(
        window: web::Window,
        document: web::Document,
        canvas: web::HtmlCanvasElement,
    ) -> Self {
        Self {
            window,
            document,
            canvas,
            gpu: None,
            callbacks: None,
            observer: None,
            watching_context: false,
        }
    }

    /// Create the JS callbacks that feed events back into `controller`.
    pub fn bind(controller: &SharedController) {
        let weak = Rc::downgrade(controller);

        let w = weak.clone();
        let frame = Closure::wrap(Box::new(move || {
            dispatch(&w, SceneEvent::Frame);
        }) as Box<dyn FnMut()>);

        let w = weak.clone();
        let resize_settled = Closure::wrap(Box::new(move || {
            dispatch(&w, SceneEvent::ResizeSettled);
        }) as Box<dyn FnMut()>);

        let w = weak.clone();
        let visibility = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() {
                    dispatch(
                        &w,
                        SceneEvent::Visibility {
                            intersecting: entry.is_intersecting(),
                        },
                    );
                }
            }
        }) as Box<dyn FnMut(js_sys::Array)>);

        let w = weak.clone();
        let context_lost = Closure::wrap(Box::new(move |ev: web::Event| {
            // Without this the browser will never attempt a restore
            ev.prevent_default();
            dispatch(&w, SceneEvent::ContextLost);
        }) as Box<dyn FnMut(web::Event)>);

        let w = weak;
        let context_restored = Closure::wrap(Box::new(move |_ev: web::Event| {
            dispatch(&w, SceneEvent::ContextRestored);
        }) as Box<dyn FnMut(web::Event)>);

        controller.borrow_mut().host_mut().callbacks = Some(HostCallbacks {
            frame,
            resize_settled,
            visibility,
            context_lost,
            context_restored,
        });
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    pub fn attach(&mut self, gpu: GpuState) {
        self.gpu = Some(gpu);
    }

    fn callbacks(&self) -> Result<&HostCallbacks, SceneError> {
        self.callbacks
            .as_ref()
            .ok_or_else(|| SceneError::construction("host callbacks not bound"))
    }

    fn unwatch_context(&mut self) {
        if !self.watching_context {
            return;
        }
        if let Some(cb) = &self.callbacks {
            _ = self.canvas.remove_event_listener_with_callback(
                CONTEXT_LOST_EVENT,
                cb.context_lost.as_ref().unchecked_ref(),
            );
            _ = self.canvas.remove_event_listener_with_callback(
                CONTEXT_RESTORED_EVENT,
                cb.context_restored.as_ref().unchecked_ref(),
            );
        }
        self.watching_context = false;
    }
}

impl SceneHost for WebHost {
    fn probe(&mut self) -> bool {
        probe::accelerated_context_available(&self.document)
    }

    fn viewport(&self) -> Viewport {
        dom::viewport(&self.window)
    }

    fn upload(&mut self, scene: &SceneGraph, _camera: &Camera) -> Result<(), SceneError> {
        let gpu = self
            .gpu
            .as_mut()
            .ok_or_else(|| SceneError::construction("no GPU surface"))?;
        gpu.upload(scene);
        Ok(())
    }

    fn watch(&mut self, visibility_threshold: f64) -> Result<(), SceneError> {
        let cb = self.callbacks()?;
        let options = web::IntersectionObserverInit::new();
        options.set_threshold(&visibility_threshold.into());
        let observer = web::IntersectionObserver::new_with_options(
            cb.visibility.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| SceneError::construction(dom::js_err(e)))?;
        let container: web::Element = self
            .canvas
            .parent_element()
            .unwrap_or_else(|| self.canvas.clone().unchecked_into());
        observer.observe(&container);

        self.canvas
            .add_event_listener_with_callback(
                CONTEXT_LOST_EVENT,
                cb.context_lost.as_ref().unchecked_ref(),
            )
            .map_err(|e| SceneError::construction(dom::js_err(e)))?;
        self.canvas
            .add_event_listener_with_callback(
                CONTEXT_RESTORED_EVENT,
                cb.context_restored.as_ref().unchecked_ref(),
            )
            .map_err(|e| SceneError::construction(dom::js_err(e)))?;

        self.observer = Some(observer);
        self.watching_context = true;
        Ok(())
    }

    fn request_frame(&mut self) -> Result<FrameHandle, SceneError> {
        let cb = self.callbacks().map_err(|e| SceneError::frame(e))?;
        self.window
            .request_animation_frame(cb.frame.as_ref().unchecked_ref())
            .map_err(|e| SceneError::frame(dom::js_err(e)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        _ = self.window.cancel_animation_frame(handle);
    }

    fn start_timer(&mut self, delay_ms: u32) -> Result<TimerHandle, SceneError> {
        let cb = self.callbacks().map_err(|e| SceneError::frame(e))?;
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.resize_settled.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .map_err(|e| SceneError::frame(dom::js_err(e)))
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle);
    }

    fn configure(&mut self, viewport: Viewport) {
        dom::size_canvas(&self.canvas, viewport);
        if let Some(gpu) = &mut self.gpu {
            let (w, h) = viewport.physical_size();
            gpu.resize(w, h);
        }
    }

    fn draw(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), SceneError> {
        match &mut self.gpu {
            Some(gpu) => gpu.render(scene, camera),
            None => Ok(()),
        }
    }

    fn apply_fallback(&mut self) {
        _ = self
            .canvas
            .style()
            .set_property("background", FALLBACK_BACKGROUND);
    }

    fn release(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.unwatch_context();
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
    }
}
