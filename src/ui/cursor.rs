use crate::constants::{CURSOR_FOLLOWER_SELECTOR, CURSOR_SELECTOR};
use crate::core::page::CursorTrail;
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn place(el: &web::Element, pos: [f64; 2]) {
    dom::set_style(el, "left", &format!("{}px", pos[0]));
    dom::set_style(el, "top", &format!("{}px", pos[1]));
}

/// Custom cursor: the dot tracks the pointer, the ring eases after it every frame.
/// Pointer positions arrive through the shared trail (see `events::pointer`).
pub fn start_follower(document: &web::Document, trail: Rc<RefCell<CursorTrail>>) {
    let (Ok(Some(cursor)), Ok(Some(follower))) = (
        document.query_selector(CURSOR_SELECTOR),
        document.query_selector(CURSOR_FOLLOWER_SELECTOR),
    ) else {
        log::info!("[cursor] no cursor elements, skipping");
        return;
    };

    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let snapshot = {
            let mut t = trail.borrow_mut();
            t.step();
            *t
        };
        place(&cursor, snapshot.cursor);
        place(&follower, snapshot.follower);
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
