#![cfg(target_arch = "wasm32")]
use crate::constants::CANVAS_ID;
use crate::core::page::CursorTrail;
use crate::core::{SceneController, SceneError, SceneParams, ANTIALIAS_MAX_DEVICE_RATIO};
use crate::host::{SharedController, WebHost};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod host;
mod probe;
mod render;
mod ui;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-backdrop starting");

    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        dom::add_listener(&document, "DOMContentLoaded", move |_ev| run(&window));
    } else {
        run(&window);
    }
    Ok(())
}

fn run(window: &web::Window) {
    if let Err(e) = init(window) {
        log::error!("init error: {:?}", e);
    }
}

fn init(window: &web::Window) -> anyhow::Result<()> {
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let cursor = Rc::new(RefCell::new(CursorTrail::default()));
    ui::init_page(window, &document, cursor.clone());

    // Page interactions keep working without the scene
    let controller = start_scene(window, &document).unwrap_or_else(|e| {
        log::error!("[scene] disabled: {:?}", e);
        None
    });
    events::wire_input_handlers(events::InputWiring {
        document,
        controller,
        cursor,
    });
    Ok(())
}

/// Build the background scene if the page has a canvas for it.
fn start_scene(
    window: &web::Window,
    document: &web::Document,
) -> anyhow::Result<Option<SharedController>> {
    let Some(canvas_el) = document.get_element_by_id(CANVAS_ID) else {
        log::info!("[scene] no #{}, background disabled", CANVAS_ID);
        return Ok(None);
    };
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let host = WebHost::new(window.clone(), document.clone(), canvas);
    let controller: SharedController = Rc::new(RefCell::new(SceneController::new(
        host,
        SceneParams::default(),
    )));
    WebHost::bind(&controller);
    events::wire_resize(window, &controller);

    if !controller.borrow_mut().start() {
        return Ok(Some(controller));
    }

    let building = controller.clone();
    spawn_local(async move {
        let (canvas, viewport) = {
            let c = building.borrow();
            let viewport = c.build_viewport().unwrap_or_else(|| c.viewport());
            (c.host().canvas().clone(), viewport)
        };
        dom::size_canvas(&canvas, viewport);
        let antialias = viewport.device_pixel_ratio <= ANTIALIAS_MAX_DEVICE_RATIO;
        let surface = match render::GpuState::new(&canvas, antialias).await {
            Ok(gpu) => {
                building.borrow_mut().host_mut().attach(gpu);
                Ok(())
            }
            Err(e) => Err(SceneError::construction(format!("{:?}", e))),
        };
        building
            .borrow_mut()
            .finish_build(surface, &mut rand::thread_rng());
    });
    Ok(Some(controller))
}
