use wasm_bindgen::JsCast;
use web_sys as web;

/// Context ids tried in order; any one succeeding counts as accelerated.
const CONTEXT_IDS: [&str; 4] = ["webgpu", "webgl2", "webgl", "experimental-webgl"];

/// Try to obtain an accelerated context on a throwaway canvas that is never
/// attached to the document. Errors thrown by the browser count as "no".
pub fn accelerated_context_available(document: &web::Document) -> bool {
    let Ok(el) = document.create_element("canvas") else {
        return false;
    };
    let Ok(canvas) = el.dyn_into::<web::HtmlCanvasElement>() else {
        return false;
    };
    CONTEXT_IDS.iter().any(|id| match canvas.get_context(id) {
        Ok(Some(_)) => {
            log::info!("[probe] {} context available", id);
            true
        }
        Ok(None) => false,
        Err(e) => {
            log::debug!("[probe] {} threw: {:?}", id, e);
            false
        }
    })
}
