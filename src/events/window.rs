use crate::core::SceneEvent;
use crate::dom;
use crate::host::{dispatch, SharedController};
use std::rc::Rc;
use web_sys as web;

/// Forward every resize to the controller; it owns the debounce.
pub fn wire_resize(window: &web::Window, controller: &SharedController) {
    let weak = Rc::downgrade(controller);
    let wnd = window.clone();
    dom::add_listener(window, "resize", move |_ev| {
        dispatch(&weak, SceneEvent::Resize(dom::viewport(&wnd)));
    });
}
