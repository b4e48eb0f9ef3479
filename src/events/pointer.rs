use crate::core::page::CursorTrail;
use crate::core::SceneEvent;
use crate::dom;
use crate::host::{dispatch, SharedController};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub document: web::Document,
    /// Absent when the page has no scene canvas; the cursor still follows.
    pub controller: Option<SharedController>,
    pub cursor: Rc<RefCell<CursorTrail>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
}

// Passive so scrolling is never held up by the scene.
fn wire_pointermove(w: &InputWiring) {
    let weak = w.controller.as_ref().map(Rc::downgrade);
    let cursor = w.cursor.clone();

    dom::add_passive_listener(&w.document, "pointermove", move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        let x = ev.client_x() as f64;
        let y = ev.client_y() as f64;

        cursor.borrow_mut().point_at(x, y);
        if let Some(weak) = &weak {
            dispatch(
                weak,
                SceneEvent::PointerMove {
                    client_x: x,
                    client_y: y,
                },
            );
        }
    });
}
