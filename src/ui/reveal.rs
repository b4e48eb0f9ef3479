use crate::constants::{
    REVEAL_CLASS, REVEAL_ROOT_MARGIN, REVEAL_SELECTOR, SKILL_BAR_CLASS, SKILL_FILL_SELECTOR,
};
use crate::core::{page, SKILL_FILL_DELAY_MS, VISIBILITY_THRESHOLD};
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn fill_skill_bar(window: &web::Window, bar: &web::Element) {
    let Ok(Some(fill)) = bar.query_selector(SKILL_FILL_SELECTOR) else {
        return;
    };
    let width = page::skill_width(&fill.get_attribute("data-skill").unwrap_or_default());
    dom::set_timeout(window, SKILL_FILL_DELAY_MS, move || {
        dom::set_style(&fill, "width", &width);
    });
}

/// Add the reveal class to `[data-aos]` blocks as they scroll into view, and
/// grow skill bars to their stated percentage.
pub fn wire_scroll_reveal(window: &web::Window, document: &web::Document) -> anyhow::Result<()> {
    let targets = dom::query_all(document, REVEAL_SELECTOR);
    if targets.is_empty() {
        return Ok(());
    }

    let wnd = window.clone();
    let on_intersect = Closure::wrap(Box::new(move |entries: js_sys::Array| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() else {
                continue;
            };
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            _ = target.class_list().add_1(REVEAL_CLASS);
            if target.class_list().contains(SKILL_BAR_CLASS) {
                fill_skill_bar(&wnd, &target);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array)>);

    let options = web::IntersectionObserverInit::new();
    options.set_threshold(&VISIBILITY_THRESHOLD.into());
    options.set_root_margin(REVEAL_ROOT_MARGIN);
    let observer =
        web::IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)
            .map_err(dom::js_err)?;
    for target in &targets {
        observer.observe(target);
    }
    // Page-lifetime observer
    on_intersect.forget();
    log::debug!("[reveal] observing {} blocks", targets.len());
    Ok(())
}
